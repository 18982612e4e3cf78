//! Schema-property command.

use apidoc_model::{Dialect, Document, Schema};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::command::{from_fields, to_fields, Command};
use crate::errors::CommandError;
use crate::node_path::{NodeMut, NodePath};

/// Add an empty property to a schema located by path.
///
/// Same container bookkeeping as the response command: if this command
/// created the `properties` map, undo deletes the map, not just the
/// entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSchemaPropertyCommand {
    dialect: Dialect,
    schema: NodePath,
    property_name: String,
    #[serde(default)]
    properties_was_absent: bool,
    #[serde(default)]
    property_existed: bool,
}

impl NewSchemaPropertyCommand {
    pub fn new(dialect: Dialect, schema: NodePath, property_name: impl Into<String>) -> Self {
        Self {
            dialect,
            schema,
            property_name: property_name.into(),
            properties_was_absent: false,
            property_existed: false,
        }
    }
}

impl Command for NewSchemaPropertyCommand {
    fn command_type(&self) -> &'static str {
        match self.dialect {
            Dialect::V2 => "new-schema-property-20",
            Dialect::V3 => "new-schema-property-30",
        }
    }

    fn execute(&mut self, doc: &mut Document) -> Result<(), CommandError> {
        self.properties_was_absent = false;
        self.property_existed = false;
        let Some(NodeMut::Schema(schema)) = self.schema.resolve_mut(doc) else {
            tracing::debug!(schema = %self.schema, "NewSchemaProperty: schema did not resolve, skipping");
            return Ok(());
        };
        self.properties_was_absent = schema.properties.is_none();
        let properties = schema.properties.get_or_insert_with(BTreeMap::new);
        if properties.contains_key(&self.property_name) {
            self.property_existed = true;
            tracing::debug!(property = %self.property_name, "NewSchemaProperty: property already exists, skipping");
        } else {
            properties.insert(self.property_name.clone(), Schema::default());
        }
        Ok(())
    }

    fn undo(&mut self, doc: &mut Document) -> Result<(), CommandError> {
        if self.property_existed {
            return Ok(());
        }
        let Some(NodeMut::Schema(schema)) = self.schema.resolve_mut(doc) else {
            return Ok(());
        };
        if self.properties_was_absent {
            schema.properties = None;
        } else if let Some(properties) = schema.properties.as_mut() {
            properties.remove(&self.property_name);
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

/// Path to a named top-level schema in the dialect's schema container.
fn schema_path(dialect: Dialect, schema_name: &str) -> NodePath {
    match dialect {
        Dialect::V2 => NodePath::root().prop("definitions").prop(schema_name),
        Dialect::V3 => NodePath::root()
            .prop("components")
            .prop("schemas")
            .prop(schema_name),
    }
}

/// Build the schema-property command matching the document's dialect.
pub fn new_schema_property(
    doc: &Document,
    schema_name: &str,
    property_name: impl Into<String>,
) -> Box<dyn Command> {
    Box::new(NewSchemaPropertyCommand::new(
        doc.dialect,
        schema_path(doc.dialect, schema_name),
        property_name,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_property_added_to_v2_definition() {
        let mut doc: Document = serde_json::from_value(json!({
            "dialect": "2.0",
            "definitions": { "Pet": { "type": "object" } }
        }))
        .unwrap();
        let before = serde_json::to_value(&doc).unwrap();

        let mut cmd = new_schema_property(&doc, "Pet", "name");
        cmd.execute(&mut doc).unwrap();
        assert!(doc
            .definitions
            .as_ref()
            .unwrap()
            .get("Pet")
            .unwrap()
            .properties
            .as_ref()
            .unwrap()
            .contains_key("name"));

        cmd.undo(&mut doc).unwrap();
        assert_eq!(serde_json::to_value(&doc).unwrap(), before);
    }

    #[test]
    fn test_undo_removes_created_properties_map() {
        let mut doc: Document = serde_json::from_value(json!({
            "dialect": "3.0",
            "components": { "schemas": { "Pet": { "type": "object" } } }
        }))
        .unwrap();

        let mut cmd = new_schema_property(&doc, "Pet", "name");
        cmd.execute(&mut doc).unwrap();
        cmd.undo(&mut doc).unwrap();

        let pet = doc
            .components
            .as_ref()
            .unwrap()
            .schemas
            .as_ref()
            .unwrap()
            .get("Pet")
            .unwrap();
        assert!(pet.properties.is_none());
    }

    #[test]
    fn test_existing_property_untouched() {
        let mut doc: Document = serde_json::from_value(json!({
            "dialect": "3.0",
            "components": {
                "schemas": {
                    "Pet": { "properties": { "name": { "type": "string" } } }
                }
            }
        }))
        .unwrap();
        let before = serde_json::to_value(&doc).unwrap();

        let mut cmd = new_schema_property(&doc, "Pet", "name");
        cmd.execute(&mut doc).unwrap();
        cmd.undo(&mut doc).unwrap();
        assert_eq!(serde_json::to_value(&doc).unwrap(), before);
    }

    #[test]
    fn test_missing_schema_is_noop() {
        let mut doc = Document::new(Dialect::V3);
        let before = serde_json::to_value(&doc).unwrap();

        let mut cmd = new_schema_property(&doc, "Missing", "name");
        cmd.execute(&mut doc).unwrap();
        cmd.undo(&mut doc).unwrap();
        assert_eq!(serde_json::to_value(&doc).unwrap(), before);
    }
}
