//! # Command Registry
//!
//! Tag → constructor map used to reconstruct commands from their
//! marshalled form. The registry is closed: every concrete command type
//! registers its tags here, and an unrecognized tag is a hard error, not
//! a fallback.

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::command::{from_fields, Command, TYPE_KEY};
use crate::commands::aggregate::AggregateCommand;
use crate::commands::delete_node::DeleteNodeCommand;
use crate::commands::info::{ChangeContactCommand, ChangeDescriptionCommand, ChangeTitleCommand};
use crate::commands::paths::{NewPathCommand, NewResponseCommand};
use crate::commands::schema::NewSchemaPropertyCommand;
use crate::commands::security::{ChangeSecuritySchemeCommand, RenameSecuritySchemeCommand};
use crate::errors::CommandError;

type Constructor = fn(&Value) -> Result<Box<dyn Command>, CommandError>;

fn construct<T>(data: &Value) -> Result<Box<dyn Command>, CommandError>
where
    T: Command + DeserializeOwned + 'static,
{
    Ok(Box::new(from_fields::<T>(data)?))
}

fn construct_aggregate(data: &Value) -> Result<Box<dyn Command>, CommandError> {
    let mut command = AggregateCommand::default();
    command.unmarshall(data)?;
    Ok(Box::new(command))
}

pub struct CommandRegistry {
    constructors: BTreeMap<&'static str, Constructor>,
}

impl CommandRegistry {
    pub fn empty() -> Self {
        Self {
            constructors: BTreeMap::new(),
        }
    }

    /// Registry covering every command type in this crate. Both dialect
    /// variants of a family map to the same constructor; the payload's
    /// dialect field selects the behavior.
    pub fn standard() -> Self {
        let mut registry = Self::empty();

        registry.register("change-title-20", construct::<ChangeTitleCommand>);
        registry.register("change-title-30", construct::<ChangeTitleCommand>);
        registry.register("change-description-20", construct::<ChangeDescriptionCommand>);
        registry.register("change-description-30", construct::<ChangeDescriptionCommand>);
        registry.register("change-contact-20", construct::<ChangeContactCommand>);
        registry.register("change-contact-30", construct::<ChangeContactCommand>);
        registry.register(
            "change-security-scheme-20",
            construct::<ChangeSecuritySchemeCommand>,
        );
        registry.register(
            "change-security-scheme-30",
            construct::<ChangeSecuritySchemeCommand>,
        );
        registry.register(
            "rename-security-scheme",
            construct::<RenameSecuritySchemeCommand>,
        );
        registry.register("new-path-20", construct::<NewPathCommand>);
        registry.register("new-path-30", construct::<NewPathCommand>);
        registry.register("new-response-20", construct::<NewResponseCommand>);
        registry.register("new-response-30", construct::<NewResponseCommand>);
        registry.register(
            "new-schema-property-20",
            construct::<NewSchemaPropertyCommand>,
        );
        registry.register(
            "new-schema-property-30",
            construct::<NewSchemaPropertyCommand>,
        );
        registry.register("delete-contact-20", construct::<DeleteNodeCommand>);
        registry.register("delete-contact-30", construct::<DeleteNodeCommand>);
        registry.register("delete-operation-20", construct::<DeleteNodeCommand>);
        registry.register("delete-operation-30", construct::<DeleteNodeCommand>);
        registry.register("delete-all-responses-20", construct::<DeleteNodeCommand>);
        registry.register("delete-all-responses-30", construct::<DeleteNodeCommand>);
        registry.register("delete-request-body-30", construct::<DeleteNodeCommand>);
        registry.register("aggregate", construct_aggregate);

        registry
    }

    pub fn register(&mut self, tag: &'static str, constructor: Constructor) {
        self.constructors.insert(tag, constructor);
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.constructors.contains_key(tag)
    }

    pub fn tags(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.constructors.keys().copied()
    }

    /// Reconstruct a command from its marshalled form.
    pub fn unmarshall(&self, data: &Value) -> Result<Box<dyn Command>, CommandError> {
        let tag = data
            .get(TYPE_KEY)
            .and_then(Value::as_str)
            .ok_or(CommandError::MissingTypeTag)?;
        let constructor = self
            .constructors
            .get(tag)
            .ok_or_else(|| CommandError::UnknownCommandType(tag.to_string()))?;
        constructor(data)
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

/// Reconstruct a command through the standard registry.
pub fn unmarshall_command(data: &Value) -> Result<Box<dyn Command>, CommandError> {
    CommandRegistry::standard().unmarshall(data)
}
