//! Security-scheme commands.
//!
//! `ChangeSecuritySchemeCommand` rewrites the fields of one named scheme.
//! Which fields it rewrites depends on the dialect: the two dialects give
//! schemes structurally different shapes, so each dialect has its own
//! field-reset list and the factory picks the variant from the document.
//!
//! `RenameSecuritySchemeCommand` renames the map entry and then fixes up
//! every security-requirement node that references the old name. The
//! algorithm is its own inverse, so undo just runs it with the names
//! swapped and no extra state is captured.

use apidoc_model::{Dialect, Document, SecurityScheme};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::command::{from_fields, to_fields, Command};
use crate::errors::CommandError;

/// Replace the dialect-relevant fields of the scheme stored under
/// `scheme_name`. No-op when the scheme does not exist.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeSecuritySchemeCommand {
    dialect: Dialect,
    scheme_name: String,
    scheme: SecurityScheme,
    #[serde(default)]
    old_scheme: Option<SecurityScheme>,
}

impl ChangeSecuritySchemeCommand {
    pub fn new(dialect: Dialect, scheme_name: impl Into<String>, scheme: SecurityScheme) -> Self {
        Self {
            dialect,
            scheme_name: scheme_name.into(),
            scheme,
            old_scheme: None,
        }
    }

    /// Overwrite the fields named in this dialect's reset list, leaving
    /// fields that belong to the other dialect untouched.
    fn apply_fields(&self, target: &mut SecurityScheme) {
        target.scheme_type = self.scheme.scheme_type.clone();
        target.description = self.scheme.description.clone();
        target.name = self.scheme.name.clone();
        target.location = self.scheme.location.clone();
        match self.dialect {
            Dialect::V2 => {
                target.flow = self.scheme.flow.clone();
                target.authorization_url = self.scheme.authorization_url.clone();
                target.token_url = self.scheme.token_url.clone();
                target.scopes = self.scheme.scopes.clone();
            }
            Dialect::V3 => {
                target.scheme = self.scheme.scheme.clone();
                target.bearer_format = self.scheme.bearer_format.clone();
                target.open_id_connect_url = self.scheme.open_id_connect_url.clone();
            }
        }
    }
}

impl Command for ChangeSecuritySchemeCommand {
    fn command_type(&self) -> &'static str {
        match self.dialect {
            Dialect::V2 => "change-security-scheme-20",
            Dialect::V3 => "change-security-scheme-30",
        }
    }

    fn execute(&mut self, doc: &mut Document) -> Result<(), CommandError> {
        self.old_scheme = None;
        let Some(existing) = doc
            .security_schemes_mut()
            .and_then(|schemes| schemes.get_mut(&self.scheme_name))
        else {
            tracing::debug!(scheme = %self.scheme_name, "ChangeSecurityScheme: scheme not found, skipping");
            return Ok(());
        };
        self.old_scheme = Some(existing.clone());
        self.apply_fields(existing);
        Ok(())
    }

    fn undo(&mut self, doc: &mut Document) -> Result<(), CommandError> {
        let Some(old) = self.old_scheme.clone() else {
            return Ok(());
        };
        if let Some(existing) = doc
            .security_schemes_mut()
            .and_then(|schemes| schemes.get_mut(&self.scheme_name))
        {
            *existing = old;
        } else {
            tracing::debug!(scheme = %self.scheme_name, "ChangeSecurityScheme: scheme is gone, nothing to undo");
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

/// Rename a scheme and move every reference to it.
///
/// The rename never overwrites: if no scheme sits under `old_name`, or one
/// already sits under `new_name`, the whole command is a no-op and the
/// requirement fixup does not run either.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameSecuritySchemeCommand {
    old_name: String,
    new_name: String,
}

impl RenameSecuritySchemeCommand {
    pub fn new(old_name: impl Into<String>, new_name: impl Into<String>) -> Self {
        Self {
            old_name: old_name.into(),
            new_name: new_name.into(),
        }
    }

    fn rename(doc: &mut Document, from: &str, to: &str) {
        let moved = match doc.security_schemes_mut() {
            Some(schemes) => {
                if !schemes.contains_key(from) || schemes.contains_key(to) {
                    tracing::debug!(from, to, "RenameSecurityScheme: source missing or target taken, skipping");
                    false
                } else if let Some(mut scheme) = schemes.remove(from) {
                    scheme.name = Some(to.to_string());
                    schemes.insert(to.to_string(), scheme);
                    true
                } else {
                    false
                }
            }
            None => false,
        };

        if moved {
            for requirement in doc.security_requirements_mut() {
                requirement.rename_scheme(from, to);
            }
        }
    }
}

impl Command for RenameSecuritySchemeCommand {
    fn command_type(&self) -> &'static str {
        "rename-security-scheme"
    }

    fn execute(&mut self, doc: &mut Document) -> Result<(), CommandError> {
        Self::rename(doc, &self.old_name, &self.new_name);
        Ok(())
    }

    fn undo(&mut self, doc: &mut Document) -> Result<(), CommandError> {
        Self::rename(doc, &self.new_name, &self.old_name);
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

/// Build the scheme-change command matching the document's dialect.
pub fn change_security_scheme(
    doc: &Document,
    scheme_name: impl Into<String>,
    scheme: SecurityScheme,
) -> Box<dyn Command> {
    Box::new(ChangeSecuritySchemeCommand::new(
        doc.dialect,
        scheme_name,
        scheme,
    ))
}

/// Build a reference-fixing rename. Dialect-independent: the container is
/// located through the document at execute time.
pub fn rename_security_scheme(
    old_name: impl Into<String>,
    new_name: impl Into<String>,
) -> Box<dyn Command> {
    Box::new(RenameSecuritySchemeCommand::new(old_name, new_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc_with_scheme() -> Document {
        serde_json::from_value(json!({
            "dialect": "2.0",
            "securityDefinitions": {
                "api_key": { "type": "apiKey", "name": "api_key", "in": "header" }
            },
            "security": [ { "api_key": ["read", "write"] } ],
            "paths": {
                "/pets": {
                    "get": { "security": [ { "api_key": [] } ] }
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_change_scheme_restores_old_fields() {
        let mut doc = doc_with_scheme();
        let before = serde_json::to_value(&doc).unwrap();

        let mut cmd = ChangeSecuritySchemeCommand::new(
            Dialect::V2,
            "api_key",
            SecurityScheme {
                scheme_type: Some("apiKey".into()),
                name: Some("api_key".into()),
                location: Some("query".into()),
                description: Some("key in query".into()),
                ..Default::default()
            },
        );
        cmd.execute(&mut doc).unwrap();
        let changed = doc.security_schemes().unwrap().get("api_key").unwrap();
        assert_eq!(changed.location.as_deref(), Some("query"));

        cmd.undo(&mut doc).unwrap();
        assert_eq!(serde_json::to_value(&doc).unwrap(), before);
    }

    #[test]
    fn test_change_scheme_missing_is_noop() {
        let mut doc = doc_with_scheme();
        let before = serde_json::to_value(&doc).unwrap();

        let mut cmd = ChangeSecuritySchemeCommand::new(
            Dialect::V2,
            "nope",
            SecurityScheme::default(),
        );
        cmd.execute(&mut doc).unwrap();
        cmd.undo(&mut doc).unwrap();
        assert_eq!(serde_json::to_value(&doc).unwrap(), before);
    }

    #[test]
    fn test_rename_moves_references_and_is_self_inverse() {
        let mut doc = doc_with_scheme();
        let before = serde_json::to_value(&doc).unwrap();

        let mut cmd = RenameSecuritySchemeCommand::new("api_key", "apiKey2");
        cmd.execute(&mut doc).unwrap();

        let schemes = doc.security_schemes().unwrap();
        assert!(!schemes.contains_key("api_key"));
        assert_eq!(
            schemes.get("apiKey2").unwrap().name.as_deref(),
            Some("apiKey2")
        );
        assert_eq!(
            doc.security[0].0.get("apiKey2"),
            Some(&vec!["read".to_string(), "write".to_string()])
        );
        assert!(doc.security[0].0.get("api_key").is_none());

        cmd.undo(&mut doc).unwrap();
        assert_eq!(serde_json::to_value(&doc).unwrap(), before);
    }

    #[test]
    fn test_rename_collision_leaves_both_untouched() {
        let mut doc = doc_with_scheme();
        doc.security_schemes_mut().unwrap().insert(
            "apiKey2".to_string(),
            SecurityScheme {
                scheme_type: Some("basic".into()),
                name: Some("apiKey2".into()),
                ..Default::default()
            },
        );
        let before = serde_json::to_value(&doc).unwrap();

        let mut cmd = RenameSecuritySchemeCommand::new("api_key", "apiKey2");
        cmd.execute(&mut doc).unwrap();
        assert_eq!(serde_json::to_value(&doc).unwrap(), before);
    }
}
