//! Generic removal of one named child node.
//!
//! `DeleteNodeCommand` resolves a parent by path, serializes the child it
//! is about to remove as the undo snapshot, and detaches it. Undo
//! deserializes the snapshot into a fresh node of the right concrete type
//! and splices it back onto the parent, which is also the moment the
//! restored node regains its owner (ownership is structural in the owned
//! tree).
//!
//! The concrete deserializer depends on node kind and dialect, so each
//! specialization supplies a [`NodeKind`] tag instead of a subclass; the
//! constructors at the bottom of this file are the full set of
//! specializations.

use apidoc_model::{
    Contact, Dialect, Document, Operation, RequestBody, Responses, METHODS,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::command::{from_fields, to_fields, Command};
use crate::errors::CommandError;
use crate::node_path::{NodeMut, NodePath};

/// Which concrete node type the snapshot deserializes into on undo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    Contact,
    Operation,
    Responses,
    RequestBody,
}

/// Remove the named child property from the parent at `parent`, keeping a
/// serialized snapshot so undo can restore it exactly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteNodeCommand {
    dialect: Dialect,
    parent: NodePath,
    property: String,
    kind: NodeKind,
    #[serde(default)]
    old_value: Option<Value>,
}

impl DeleteNodeCommand {
    pub fn new(
        dialect: Dialect,
        parent: NodePath,
        property: impl Into<String>,
        kind: NodeKind,
    ) -> Self {
        Self {
            dialect,
            parent,
            property: property.into(),
            kind,
            old_value: None,
        }
    }

    /// Serialize and detach the child, or yield `None` when the property
    /// is already absent (or the parent has the wrong shape).
    fn detach(&self, parent: NodeMut<'_>) -> Result<Option<Value>, CommandError> {
        let removed = match (self.kind, parent) {
            (NodeKind::Contact, NodeMut::Info(info)) if self.property == "contact" => info
                .contact
                .take()
                .map(|node| serde_json::to_value(node))
                .transpose()?,
            (NodeKind::Operation, NodeMut::PathItem(item)) => item
                .operation_slot_mut(&self.property)
                .and_then(Option::take)
                .map(|node| serde_json::to_value(node))
                .transpose()?,
            (NodeKind::Responses, NodeMut::Operation(op)) if self.property == "responses" => op
                .responses
                .take()
                .map(|node| serde_json::to_value(node))
                .transpose()?,
            (NodeKind::RequestBody, NodeMut::Operation(op)) if self.property == "requestBody" => {
                op.request_body
                    .take()
                    .map(|node| serde_json::to_value(node))
                    .transpose()?
            }
            _ => None,
        };
        Ok(removed)
    }

    /// Deserialize the snapshot and splice it back onto the parent under
    /// the original property name.
    fn attach(&self, parent: NodeMut<'_>, snapshot: &Value) -> Result<(), CommandError> {
        match (self.kind, parent) {
            (NodeKind::Contact, NodeMut::Info(info)) if self.property == "contact" => {
                info.contact = Some(serde_json::from_value::<Contact>(snapshot.clone())?);
            }
            (NodeKind::Operation, NodeMut::PathItem(item)) => {
                if let Some(slot) = item.operation_slot_mut(&self.property) {
                    *slot = Some(serde_json::from_value::<Operation>(snapshot.clone())?);
                }
            }
            (NodeKind::Responses, NodeMut::Operation(op)) if self.property == "responses" => {
                op.responses = Some(serde_json::from_value::<Responses>(snapshot.clone())?);
            }
            (NodeKind::RequestBody, NodeMut::Operation(op)) if self.property == "requestBody" => {
                op.request_body = Some(serde_json::from_value::<RequestBody>(snapshot.clone())?);
            }
            _ => {
                tracing::debug!(
                    parent = %self.parent,
                    property = %self.property,
                    "DeleteNode: parent shape changed, nothing to restore onto"
                );
            }
        }
        Ok(())
    }
}

impl Command for DeleteNodeCommand {
    fn command_type(&self) -> &'static str {
        match (self.kind, self.dialect) {
            (NodeKind::Contact, Dialect::V2) => "delete-contact-20",
            (NodeKind::Contact, Dialect::V3) => "delete-contact-30",
            (NodeKind::Operation, Dialect::V2) => "delete-operation-20",
            (NodeKind::Operation, Dialect::V3) => "delete-operation-30",
            (NodeKind::Responses, Dialect::V2) => "delete-all-responses-20",
            (NodeKind::Responses, Dialect::V3) => "delete-all-responses-30",
            // Request bodies only exist in 3.0; construction rejects 2.0.
            (NodeKind::RequestBody, _) => "delete-request-body-30",
        }
    }

    fn execute(&mut self, doc: &mut Document) -> Result<(), CommandError> {
        let Some(parent) = self.parent.resolve_mut(doc) else {
            tracing::debug!(parent = %self.parent, "DeleteNode: parent did not resolve, skipping");
            self.old_value = None;
            return Ok(());
        };
        self.old_value = self.detach(parent)?;
        Ok(())
    }

    fn undo(&mut self, doc: &mut Document) -> Result<(), CommandError> {
        let Some(snapshot) = self.old_value.clone() else {
            return Ok(());
        };
        let Some(parent) = self.parent.resolve_mut(doc) else {
            tracing::debug!(parent = %self.parent, "DeleteNode: parent did not resolve, nothing to undo");
            return Ok(());
        };
        self.attach(parent, &snapshot)
    }

    fn marshall(&self) -> Result<Value, CommandError> {
        to_fields(self)
    }

    fn unmarshall(&mut self, data: &Value) -> Result<(), CommandError> {
        *self = from_fields(data)?;
        Ok(())
    }
}

fn operation_path(path: &str, method: &str) -> NodePath {
    NodePath::root().prop("paths").prop(path).prop(method)
}

/// Delete `info.contact`.
pub fn delete_contact(doc: &Document) -> Box<dyn Command> {
    Box::new(DeleteNodeCommand::new(
        doc.dialect,
        NodePath::root().prop("info"),
        "contact",
        NodeKind::Contact,
    ))
}

/// Delete one operation from a path item. `method` must be one of
/// [`METHODS`].
pub fn delete_operation(doc: &Document, path: &str, method: &str) -> Box<dyn Command> {
    debug_assert!(METHODS.contains(&method));
    Box::new(DeleteNodeCommand::new(
        doc.dialect,
        NodePath::root().prop("paths").prop(path),
        method,
        NodeKind::Operation,
    ))
}

/// Delete an operation's whole responses container.
pub fn delete_all_responses(doc: &Document, path: &str, method: &str) -> Box<dyn Command> {
    Box::new(DeleteNodeCommand::new(
        doc.dialect,
        operation_path(path, method),
        "responses",
        NodeKind::Responses,
    ))
}

/// Delete an operation's request body. Valid only in dialect 3.0; the 2.0
/// dialect has no request-body node, so construction fails fast.
pub fn delete_request_body(
    doc: &Document,
    path: &str,
    method: &str,
) -> Result<Box<dyn Command>, CommandError> {
    if doc.dialect == Dialect::V2 {
        return Err(CommandError::UnsupportedDialect(doc.dialect));
    }
    Ok(Box::new(DeleteNodeCommand::new(
        doc.dialect,
        operation_path(path, method),
        "requestBody",
        NodeKind::RequestBody,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Document {
        serde_json::from_value(json!({
            "dialect": "3.0",
            "info": { "title": "Pets", "contact": { "name": "Ana", "email": "a@b.c" } },
            "paths": {
                "/pets": {
                    "get": {
                        "operationId": "listPets",
                        "responses": { "200": { "description": "ok" } }
                    },
                    "post": {
                        "requestBody": { "description": "a pet", "required": true },
                        "responses": { "201": { "description": "created" } }
                    }
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_delete_and_restore_contact() {
        let mut doc = sample();
        let before = serde_json::to_value(&doc).unwrap();

        let mut cmd = delete_contact(&doc);
        cmd.execute(&mut doc).unwrap();
        assert!(doc.info.as_ref().unwrap().contact.is_none());

        cmd.undo(&mut doc).unwrap();
        assert_eq!(serde_json::to_value(&doc).unwrap(), before);
    }

    #[test]
    fn test_delete_and_restore_operation() {
        let mut doc = sample();
        let before = serde_json::to_value(&doc).unwrap();

        let mut cmd = delete_operation(&doc, "/pets", "get");
        cmd.execute(&mut doc).unwrap();
        assert!(doc.paths.get("/pets").unwrap().get.is_none());
        assert!(doc.paths.get("/pets").unwrap().post.is_some());

        cmd.undo(&mut doc).unwrap();
        assert_eq!(serde_json::to_value(&doc).unwrap(), before);
        assert_eq!(
            doc.paths
                .get("/pets")
                .unwrap()
                .get
                .as_ref()
                .unwrap()
                .operation_id
                .as_deref(),
            Some("listPets")
        );
    }

    #[test]
    fn test_delete_all_responses_roundtrip() {
        let mut doc = sample();
        let before = serde_json::to_value(&doc).unwrap();

        let mut cmd = delete_all_responses(&doc, "/pets", "get");
        cmd.execute(&mut doc).unwrap();
        assert!(doc
            .paths
            .get("/pets")
            .unwrap()
            .get
            .as_ref()
            .unwrap()
            .responses
            .is_none());

        cmd.undo(&mut doc).unwrap();
        assert_eq!(serde_json::to_value(&doc).unwrap(), before);
    }

    #[test]
    fn test_delete_request_body_rejected_for_v2() {
        let doc = Document::new(Dialect::V2);
        let err = delete_request_body(&doc, "/pets", "post").unwrap_err();
        assert!(matches!(err, CommandError::UnsupportedDialect(Dialect::V2)));
    }

    #[test]
    fn test_delete_request_body_roundtrip() {
        let mut doc = sample();
        let before = serde_json::to_value(&doc).unwrap();

        let mut cmd = delete_request_body(&doc, "/pets", "post").unwrap();
        cmd.execute(&mut doc).unwrap();
        assert!(doc
            .paths
            .get("/pets")
            .unwrap()
            .post
            .as_ref()
            .unwrap()
            .request_body
            .is_none());

        cmd.undo(&mut doc).unwrap();
        assert_eq!(serde_json::to_value(&doc).unwrap(), before);
    }

    #[test]
    fn test_missing_parent_is_noop() {
        let mut doc = sample();
        let before = serde_json::to_value(&doc).unwrap();

        let mut cmd = delete_all_responses(&doc, "/gone", "get");
        cmd.execute(&mut doc).unwrap();
        cmd.undo(&mut doc).unwrap();
        assert_eq!(serde_json::to_value(&doc).unwrap(), before);
    }

    #[test]
    fn test_already_absent_property_restores_nothing() {
        let mut doc = sample();
        let mut cmd = delete_request_body(&doc, "/pets", "get").unwrap();
        cmd.execute(&mut doc).unwrap();

        let after_execute = serde_json::to_value(&doc).unwrap();
        cmd.undo(&mut doc).unwrap();
        assert_eq!(serde_json::to_value(&doc).unwrap(), after_execute);
        assert!(doc
            .paths
            .get("/pets")
            .unwrap()
            .get
            .as_ref()
            .unwrap()
            .request_body
            .is_none());
    }
}
