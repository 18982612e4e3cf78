//! Commands that add structure under `paths`.

use apidoc_model::{Dialect, Document, PathItem, Response, Responses};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::command::{from_fields, to_fields, Command};
use crate::errors::CommandError;
use crate::node_path::{NodeMut, NodePath};

/// Insert an empty path item under a path name.
///
/// If a path item already exists under the name, execute records that and
/// changes nothing, so undo will not delete somebody else's path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPathCommand {
    dialect: Dialect,
    path_name: String,
    #[serde(default)]
    path_existed: bool,
}

impl NewPathCommand {
    pub fn new(dialect: Dialect, path_name: impl Into<String>) -> Self {
        Self {
            dialect,
            path_name: path_name.into(),
            path_existed: false,
        }
    }
}

impl Command for NewPathCommand {
    fn command_type(&self) -> &'static str {
        match self.dialect {
            Dialect::V2 => "new-path-20",
            Dialect::V3 => "new-path-30",
        }
    }

    fn execute(&mut self, doc: &mut Document) -> Result<(), CommandError> {
        self.path_existed = doc.paths.contains_key(&self.path_name);
        if self.path_existed {
            tracing::debug!(path = %self.path_name, "NewPath: path already exists, skipping");
        } else {
            doc.paths
                .insert(self.path_name.clone(), PathItem::default());
        }
        Ok(())
    }

    fn undo(&mut self, doc: &mut Document) -> Result<(), CommandError> {
        if !self.path_existed {
            doc.paths.remove(&self.path_name);
        }
        Ok(())
    }

    fn marshall(&self) -> Result<Value, CommandError> {
        to_fields(self)
    }

    fn unmarshall(&mut self, data: &Value) -> Result<(), CommandError> {
        *self = from_fields(data)?;
        Ok(())
    }
}

/// Insert an empty response under a status code on one operation.
///
/// Captures whether the operation's responses container existed at all:
/// when this command created it, undo removes the container entirely
/// instead of leaving an empty shell behind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewResponseCommand {
    dialect: Dialect,
    operation: NodePath,
    status_code: String,
    #[serde(default)]
    responses_was_absent: bool,
    #[serde(default)]
    response_existed: bool,
}

impl NewResponseCommand {
    pub fn new(dialect: Dialect, operation: NodePath, status_code: impl Into<String>) -> Self {
        Self {
            dialect,
            operation,
            status_code: status_code.into(),
            responses_was_absent: false,
            response_existed: false,
        }
    }
}

impl Command for NewResponseCommand {
    fn command_type(&self) -> &'static str {
        match self.dialect {
            Dialect::V2 => "new-response-20",
            Dialect::V3 => "new-response-30",
        }
    }

    fn execute(&mut self, doc: &mut Document) -> Result<(), CommandError> {
        self.responses_was_absent = false;
        self.response_existed = false;
        let Some(NodeMut::Operation(op)) = self.operation.resolve_mut(doc) else {
            tracing::debug!(operation = %self.operation, "NewResponse: operation did not resolve, skipping");
            return Ok(());
        };
        self.responses_was_absent = op.responses.is_none();
        let responses = op.responses.get_or_insert_with(Responses::default);
        if responses.0.contains_key(&self.status_code) {
            self.response_existed = true;
            tracing::debug!(code = %self.status_code, "NewResponse: response already exists, skipping");
        } else {
            responses
                .0
                .insert(self.status_code.clone(), Response::default());
        }
        Ok(())
    }

    fn undo(&mut self, doc: &mut Document) -> Result<(), CommandError> {
        if self.response_existed {
            return Ok(());
        }
        let Some(NodeMut::Operation(op)) = self.operation.resolve_mut(doc) else {
            return Ok(());
        };
        if self.responses_was_absent {
            op.responses = None;
        } else if let Some(responses) = op.responses.as_mut() {
            responses.0.remove(&self.status_code);
        }
        Ok(())
    }

    fn marshall(&self) -> Result<Value, CommandError> {
        to_fields(self)
    }

    fn unmarshall(&mut self, data: &Value) -> Result<(), CommandError> {
        *self = from_fields(data)?;
        Ok(())
    }
}

/// Build the new-path command matching the document's dialect.
pub fn new_path(doc: &Document, path_name: impl Into<String>) -> Box<dyn Command> {
    Box::new(NewPathCommand::new(doc.dialect, path_name))
}

/// Build the new-response command matching the document's dialect.
pub fn new_response(
    doc: &Document,
    path: &str,
    method: &str,
    status_code: impl Into<String>,
) -> Box<dyn Command> {
    let operation = NodePath::root().prop("paths").prop(path).prop(method);
    Box::new(NewResponseCommand::new(doc.dialect, operation, status_code))
}
