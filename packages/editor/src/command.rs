//! # Command Contract
//!
//! A command is one reversible, serializable edit:
//!
//! - `execute` captures the minimal prior state it is about to change,
//!   then mutates the document. A target that no longer resolves records
//!   "nothing to undo" and leaves the document untouched.
//! - `undo` restores what the most recent `execute` changed, including
//!   removing an ancestor container `execute` had to create. Calling
//!   `undo` before `execute` is a host error and its effect is undefined.
//! - `marshall`/`unmarshall` convert the command to and from a plain JSON
//!   mapping so an edit history can be persisted, transmitted, and
//!   replayed elsewhere. The mapping always carries the command's type
//!   tag under [`TYPE_KEY`].
//!
//! Commands never own the document; they reach into it through node paths
//! only for the duration of a call.

use apidoc_model::Document;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

use crate::errors::CommandError;

/// Reserved key carrying the type tag inside a marshalled command.
pub const TYPE_KEY: &str = "__type";

pub trait Command: fmt::Debug + Send {
    /// Type tag, unique per concrete command variant.
    fn command_type(&self) -> &'static str;

    fn execute(&mut self, doc: &mut Document) -> Result<(), CommandError>;

    fn undo(&mut self, doc: &mut Document) -> Result<(), CommandError>;

    /// Plain field-name → value mapping, without the type tag (the tag is
    /// added by [`marshall_command`]).
    fn marshall(&self) -> Result<Value, CommandError>;

    /// Copy every field from the mapping back onto this command, ignoring
    /// the type-tag key.
    fn unmarshall(&mut self, data: &Value) -> Result<(), CommandError>;
}

/// Marshall a command of any concrete type, tagging it with its type.
pub fn marshall_command(command: &dyn Command) -> Result<Value, CommandError> {
    let mut value = command.marshall()?;
    match value.as_object_mut() {
        Some(fields) => {
            fields.insert(
                TYPE_KEY.to_string(),
                Value::String(command.command_type().to_string()),
            );
            Ok(value)
        }
        None => Err(CommandError::InvalidPayload(
            "marshalled command must be an object".to_string(),
        )),
    }
}

/// Serialize a command's own fields to the plain mapping form.
pub(crate) fn to_fields<T: Serialize>(command: &T) -> Result<Value, CommandError> {
    Ok(serde_json::to_value(command)?)
}

/// Deserialize a command from a plain mapping, dropping the type tag.
pub(crate) fn from_fields<T: DeserializeOwned>(data: &Value) -> Result<T, CommandError> {
    let mut fields = data
        .as_object()
        .cloned()
        .ok_or_else(|| CommandError::InvalidPayload("expected an object".to_string()))?;
    fields.remove(TYPE_KEY);
    Ok(serde_json::from_value(Value::Object(fields))?)
}
