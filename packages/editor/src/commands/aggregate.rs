//! Composite command.

use apidoc_model::Document;
use serde_json::{Map, Value};
use std::fmt;

use crate::command::{marshall_command, Command, TYPE_KEY};
use crate::errors::CommandError;
use crate::registry::CommandRegistry;

/// An ordered list of child commands executed as one edit.
///
/// Children execute in list order and undo in reverse order, which keeps
/// overlapping targets correct (the later edit is unwound before the
/// earlier one). Marshalling emits each child fully inline, tag included,
/// so an aggregate round-trips with no external context; unmarshalling
/// reconstructs the children through the command registry.
///
/// Known sharp edge: a child failing mid-`execute` aborts the remaining
/// children and nothing is rolled back. Hosts needing atomicity must
/// pre-validate or wrap their own rollback.
pub struct AggregateCommand {
    /// Opaque caller-supplied label/metadata, carried through marshalling
    /// unchanged.
    name: Value,
    commands: Vec<Box<dyn Command>>,
}

impl AggregateCommand {
    pub fn new(name: Value, commands: Vec<Box<dyn Command>>) -> Self {
        Self { name, commands }
    }

    pub fn push(&mut self, command: Box<dyn Command>) {
        self.commands.push(command);
    }

    pub fn name(&self) -> &Value {
        &self.name
    }

    pub fn commands(&self) -> &[Box<dyn Command>] {
        &self.commands
    }
}

impl Default for AggregateCommand {
    fn default() -> Self {
        Self::new(Value::Null, Vec::new())
    }
}

impl fmt::Debug for AggregateCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AggregateCommand")
            .field("name", &self.name)
            .field(
                "commands",
                &self
                    .commands
                    .iter()
                    .map(|c| c.command_type())
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Command for AggregateCommand {
    fn command_type(&self) -> &'static str {
        "aggregate"
    }

    fn execute(&mut self, doc: &mut Document) -> Result<(), CommandError> {
        for command in &mut self.commands {
            command.execute(doc)?;
        }
        Ok(())
    }

    fn undo(&mut self, doc: &mut Document) -> Result<(), CommandError> {
        for command in self.commands.iter_mut().rev() {
            command.undo(doc)?;
        }
        Ok(())
    }

    fn marshall(&self) -> Result<Value, CommandError> {
        let children = self
            .commands
            .iter()
            .map(|command| marshall_command(command.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        let mut fields = Map::new();
        fields.insert("name".to_string(), self.name.clone());
        fields.insert("commands".to_string(), Value::Array(children));
        Ok(Value::Object(fields))
    }

    fn unmarshall(&mut self, data: &Value) -> Result<(), CommandError> {
        let fields = data
            .as_object()
            .ok_or_else(|| CommandError::InvalidPayload("expected an object".to_string()))?;

        self.name = fields.get("name").cloned().unwrap_or(Value::Null);

        let children = fields
            .get("commands")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                CommandError::InvalidPayload("aggregate requires a commands array".to_string())
            })?;

        let registry = CommandRegistry::standard();
        self.commands = children
            .iter()
            .map(|child| registry.unmarshall(child))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::info::{change_description, change_title};
    use apidoc_model::Dialect;
    use serde_json::json;

    #[test]
    fn test_execute_in_order_undo_in_reverse() {
        let mut doc = Document::new(Dialect::V3);
        let before = serde_json::to_value(&doc).unwrap();

        // Overlapping targets: both children edit the title.
        let mut aggregate = AggregateCommand::new(
            json!("retitle twice"),
            vec![change_title(&doc, "First"), change_title(&doc, "Second")],
        );

        aggregate.execute(&mut doc).unwrap();
        assert_eq!(doc.info.as_ref().unwrap().title.as_deref(), Some("Second"));

        aggregate.undo(&mut doc).unwrap();
        assert_eq!(serde_json::to_value(&doc).unwrap(), before);
        assert!(doc.info.is_none());
    }

    #[test]
    fn test_marshalled_form_carries_children_and_name() {
        let doc = Document::new(Dialect::V2);
        let aggregate = AggregateCommand::new(
            json!({ "label": "setup" }),
            vec![change_title(&doc, "T"), change_description(&doc, "D")],
        );

        let value = marshall_command(&aggregate).unwrap();
        assert_eq!(value[TYPE_KEY], json!("aggregate"));
        assert_eq!(value["name"], json!({ "label": "setup" }));
        assert_eq!(value["commands"][0][TYPE_KEY], json!("change-title-20"));
        assert_eq!(
            value["commands"][1][TYPE_KEY],
            json!("change-description-20")
        );
    }
}
