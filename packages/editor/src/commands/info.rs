//! Commands editing the document's `info` node.
//!
//! All three follow the capture/mutate/restore pattern: `execute` records
//! the previous field value and whether the `info` container had to be
//! created; `undo` puts the old value back, or removes `info` entirely
//! when this command created it (so `info: null` undoes to `null`, not to
//! an empty shell).

use apidoc_model::{Contact, Dialect, Document, Info};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::command::{from_fields, to_fields, Command};
use crate::errors::CommandError;

/// Replace the document title.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeTitleCommand {
    dialect: Dialect,
    title: String,
    #[serde(default)]
    old_title: Option<String>,
    #[serde(default)]
    info_was_absent: bool,
}

impl ChangeTitleCommand {
    pub fn new(dialect: Dialect, title: impl Into<String>) -> Self {
        Self {
            dialect,
            title: title.into(),
            old_title: None,
            info_was_absent: false,
        }
    }
}

impl Command for ChangeTitleCommand {
    fn command_type(&self) -> &'static str {
        match self.dialect {
            Dialect::V2 => "change-title-20",
            Dialect::V3 => "change-title-30",
        }
    }

    fn execute(&mut self, doc: &mut Document) -> Result<(), CommandError> {
        self.info_was_absent = doc.info.is_none();
        let info = doc.info.get_or_insert_with(Info::default);
        self.old_title = info.title.replace(self.title.clone());
        Ok(())
    }

    fn undo(&mut self, doc: &mut Document) -> Result<(), CommandError> {
        if self.info_was_absent {
            doc.info = None;
        } else if let Some(info) = doc.info.as_mut() {
            info.title = self.old_title.clone();
        } else {
            tracing::debug!("ChangeTitle: info node is gone, nothing to undo");
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

/// Replace the document description.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeDescriptionCommand {
    dialect: Dialect,
    description: String,
    #[serde(default)]
    old_description: Option<String>,
    #[serde(default)]
    info_was_absent: bool,
}

impl ChangeDescriptionCommand {
    pub fn new(dialect: Dialect, description: impl Into<String>) -> Self {
        Self {
            dialect,
            description: description.into(),
            old_description: None,
            info_was_absent: false,
        }
    }
}

impl Command for ChangeDescriptionCommand {
    fn command_type(&self) -> &'static str {
        match self.dialect {
            Dialect::V2 => "change-description-20",
            Dialect::V3 => "change-description-30",
        }
    }

    fn execute(&mut self, doc: &mut Document) -> Result<(), CommandError> {
        self.info_was_absent = doc.info.is_none();
        let info = doc.info.get_or_insert_with(Info::default);
        self.old_description = info.description.replace(self.description.clone());
        Ok(())
    }

    fn undo(&mut self, doc: &mut Document) -> Result<(), CommandError> {
        if self.info_was_absent {
            doc.info = None;
        } else if let Some(info) = doc.info.as_mut() {
            info.description = self.old_description.clone();
        } else {
            tracing::debug!("ChangeDescription: info node is gone, nothing to undo");
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

/// Replace the whole contact node under `info`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeContactCommand {
    dialect: Dialect,
    contact: Contact,
    #[serde(default)]
    old_contact: Option<Contact>,
    #[serde(default)]
    contact_was_absent: bool,
    #[serde(default)]
    info_was_absent: bool,
}

impl ChangeContactCommand {
    pub fn new(dialect: Dialect, contact: Contact) -> Self {
        Self {
            dialect,
            contact,
            old_contact: None,
            contact_was_absent: false,
            info_was_absent: false,
        }
    }
}

impl Command for ChangeContactCommand {
    fn command_type(&self) -> &'static str {
        match self.dialect {
            Dialect::V2 => "change-contact-20",
            Dialect::V3 => "change-contact-30",
        }
    }

    fn execute(&mut self, doc: &mut Document) -> Result<(), CommandError> {
        self.info_was_absent = doc.info.is_none();
        let info = doc.info.get_or_insert_with(Info::default);
        self.old_contact = info.contact.replace(self.contact.clone());
        self.contact_was_absent = self.old_contact.is_none();
        Ok(())
    }

    fn undo(&mut self, doc: &mut Document) -> Result<(), CommandError> {
        if self.info_was_absent {
            doc.info = None;
        } else if let Some(info) = doc.info.as_mut() {
            info.contact = if self.contact_was_absent {
                None
            } else {
                self.old_contact.clone()
            };
        } else {
            tracing::debug!("ChangeContact: info node is gone, nothing to undo");
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

/// Build the title command matching the document's dialect.
pub fn change_title(doc: &Document, title: impl Into<String>) -> Box<dyn Command> {
    Box::new(ChangeTitleCommand::new(doc.dialect, title))
}

/// Build the description command matching the document's dialect.
pub fn change_description(doc: &Document, description: impl Into<String>) -> Box<dyn Command> {
    Box::new(ChangeDescriptionCommand::new(doc.dialect, description))
}

/// Build the contact command matching the document's dialect.
pub fn change_contact(doc: &Document, contact: Contact) -> Box<dyn Command> {
    Box::new(ChangeContactCommand::new(doc.dialect, contact))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_title_undo_removes_created_info() {
        let mut doc = Document::new(Dialect::V3);
        let before = serde_json::to_value(&doc).unwrap();

        let mut cmd = ChangeTitleCommand::new(Dialect::V3, "T");
        cmd.execute(&mut doc).unwrap();
        assert_eq!(
            serde_json::to_value(&doc).unwrap(),
            json!({ "dialect": "3.0", "info": { "title": "T" } })
        );

        cmd.undo(&mut doc).unwrap();
        assert_eq!(serde_json::to_value(&doc).unwrap(), before);
        assert!(doc.info.is_none());
    }

    #[test]
    fn test_title_undo_restores_previous_value() {
        let mut doc: Document = serde_json::from_value(json!({
            "dialect": "2.0",
            "info": { "title": "Old", "version": "1.0" }
        }))
        .unwrap();
        let before = serde_json::to_value(&doc).unwrap();

        let mut cmd = ChangeTitleCommand::new(Dialect::V2, "New");
        cmd.execute(&mut doc).unwrap();
        assert_eq!(doc.info.as_ref().unwrap().title.as_deref(), Some("New"));

        cmd.undo(&mut doc).unwrap();
        assert_eq!(serde_json::to_value(&doc).unwrap(), before);
    }

    #[test]
    fn test_contact_replacement_roundtrip() {
        let mut doc: Document = serde_json::from_value(json!({
            "dialect": "3.0",
            "info": { "title": "T", "contact": { "name": "Ana" } }
        }))
        .unwrap();
        let before = serde_json::to_value(&doc).unwrap();

        let mut cmd = ChangeContactCommand::new(
            Dialect::V3,
            Contact {
                name: Some("Bo".into()),
                ..Default::default()
            },
        );
        cmd.execute(&mut doc).unwrap();
        assert_eq!(
            doc.info
                .as_ref()
                .unwrap()
                .contact
                .as_ref()
                .unwrap()
                .name
                .as_deref(),
            Some("Bo")
        );

        cmd.undo(&mut doc).unwrap();
        assert_eq!(serde_json::to_value(&doc).unwrap(), before);
    }
}
