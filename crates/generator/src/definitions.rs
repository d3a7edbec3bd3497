//! Nested type declarations for schema definitions
//!
//! Object schemas become `export interface` declarations paired with a
//! `toJson_<Name>` function that maps camelCase fields back to the schema
//! property names. Inline object properties are hoisted into their own
//! interfaces named after the parent and the property.

use cdk_import_common::{ImportError, Result};
use serde_json::{Map, Value};
use std::collections::HashSet;

#[cfg(test)]
use mockall::automock;

use crate::code::CodeWriter;
use crate::naming::{field_name, pascal_case};

const DEFINITIONS_PREFIX: &str = "#/definitions/";

/// Emits declarations for named schemas
#[cfg_attr(test, automock)]
pub trait TypeEmitter {
    /// Emit `name` and every type it reaches
    fn emit_type(&mut self, name: &str, schema: &Value) -> Result<()>;

    /// Emitted declarations, in emission order
    fn render(&self) -> String;
}

/// Shape of a value as seen by the declaration and the JSON conversion
#[derive(Debug, Clone, PartialEq, Eq)]
enum Shape {
    Primitive(&'static str),
    Named(String),
    Array(Box<Shape>),
    Map(Box<Shape>),
}

impl Shape {
    fn ts_type(&self) -> String {
        match self {
            Shape::Primitive(ts) => ts.to_string(),
            Shape::Named(name) => name.clone(),
            Shape::Array(item) => format!("{}[]", item.ts_type()),
            Shape::Map(value) => format!("{{ [key: string]: {} }}", value.ts_type()),
        }
    }

    fn is_plain(&self) -> bool {
        match self {
            Shape::Primitive(_) => true,
            Shape::Named(_) => false,
            Shape::Array(item) | Shape::Map(item) => item.is_plain(),
        }
    }

    /// JSON conversion expression for `value`
    fn to_json(&self, value: &str, depth: usize) -> String {
        if self.is_plain() {
            return value.to_string();
        }

        match self {
            Shape::Named(name) => format!("toJson_{}({})", name, value),
            Shape::Array(item) => {
                let var = format!("y{}", depth);
                format!("{}?.map({} => {})", value, var, item.to_json(&var, depth + 1))
            }
            Shape::Map(item) => {
                let var = format!("i{}", depth);
                format!(
                    "(({value}) === undefined) ? undefined : (Object.entries({value}).reduce((r, {var}) => ({var}[1] === undefined) ? r : ({{ ...r, [{var}[0]]: {inner} }}), {{}}))",
                    value = value,
                    var = var,
                    inner = item.to_json(&format!("{}[1]", var), depth + 1)
                )
            }
            Shape::Primitive(_) => value.to_string(),
        }
    }
}

/// Default [`TypeEmitter`] producing TypeScript interfaces
#[derive(Debug, Clone, Default)]
pub struct InterfaceEmitter {
    definitions: Map<String, Value>,
    emitted: HashSet<String>,
    blocks: Vec<String>,
}

impl InterfaceEmitter {
    pub fn new(definitions: Map<String, Value>) -> Self {
        Self {
            definitions,
            ..Default::default()
        }
    }

    /// Emit every definition, including ones no emitted type reaches
    pub fn emit_definitions(&mut self) -> Result<()> {
        let definitions: Vec<(String, Value)> = self
            .definitions
            .iter()
            .map(|(name, schema)| (name.clone(), schema.clone()))
            .collect();

        for (name, schema) in definitions {
            self.emit_type(&name, &schema)?;
        }
        Ok(())
    }

    fn resolve_reference(&mut self, reference: &str) -> Result<Shape> {
        let name = reference.strip_prefix(DEFINITIONS_PREFIX).ok_or_else(|| {
            ImportError::Generation(format!("Unsupported schema reference {}", reference))
        })?;
        let schema = self.definitions.get(name).cloned().ok_or_else(|| {
            ImportError::Generation(format!("Schema reference {} has no definition", reference))
        })?;

        self.emit_type(name, &schema)?;
        Ok(Shape::Named(name.to_string()))
    }

    fn shape_of(&mut self, parent: &str, property: &str, schema: &Value) -> Result<Shape> {
        if let Some(reference) = schema.get("$ref").and_then(Value::as_str) {
            return self.resolve_reference(reference);
        }

        let shape = match schema.get("type").and_then(Value::as_str) {
            Some("string") => Shape::Primitive("string"),
            Some("number") | Some("integer") => Shape::Primitive("number"),
            Some("boolean") => Shape::Primitive("boolean"),
            Some("array") => {
                let item = match schema.get("items") {
                    Some(items) => self.shape_of(parent, property, items)?,
                    None => Shape::Primitive("any"),
                };
                Shape::Array(Box::new(item))
            }
            Some("object") | None if has_properties(schema) => {
                let name = format!("{}{}", parent, pascal_case(property));
                self.emit_type(&name, schema)?;
                Shape::Named(name)
            }
            Some("object") => match map_value_schema(schema) {
                Some(value) => Shape::Map(Box::new(self.shape_of(parent, property, &value)?)),
                None => Shape::Primitive("any"),
            },
            _ => Shape::Primitive("any"),
        };

        Ok(shape)
    }

    fn emit_interface(&mut self, name: &str, schema: &Value) -> Result<String> {
        let required: HashSet<&str> = schema
            .get("required")
            .and_then(Value::as_array)
            .map(|names| names.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();

        let mut members = Vec::new();
        if let Some(properties) = schema.get("properties").and_then(Value::as_object) {
            for (property, property_schema) in properties {
                let shape = self.shape_of(name, property, property_schema)?;
                members.push((property.clone(), property_schema.clone(), shape));
            }
        }

        let mut code = CodeWriter::new();
        if let Some(description) = schema.get("description").and_then(Value::as_str) {
            code.doc(description);
        }
        code.open_block(format!("export interface {}", name));
        for (index, (property, property_schema, shape)) in members.iter().enumerate() {
            if index > 0 {
                code.blank();
            }
            let mut doc = String::new();
            if let Some(description) = property_schema.get("description").and_then(Value::as_str) {
                doc.push_str(description);
                doc.push_str("\n\n");
            }
            doc.push_str(&format!("@schema {}#{}", name, property));
            code.doc(&doc);

            let optional = if required.contains(property.as_str()) { "" } else { "?" };
            code.line(format!(
                "readonly {}{}: {};",
                field_name(property),
                optional,
                shape.ts_type()
            ));
        }
        code.close_block();
        code.blank();

        code.doc(&format!("Converts an object of type '{}' to JSON representation.", name));
        code.line("/* eslint-disable max-len, quote-props */");
        code.open_block(format!(
            "export function toJson_{name}(obj: {name} | undefined): Record<string, any> | undefined",
            name = name
        ));
        code.line("if (obj === undefined) { return undefined; }");
        code.open_block("const result =");
        for (property, _, shape) in &members {
            let value = format!("obj.{}", field_name(property));
            code.line(format!(
                "'{}': {},",
                property.replace('\'', "\\'"),
                shape.to_json(&value, 0)
            ));
        }
        code.close_block_with("};");
        code.line("// filter undefined values");
        code.line("return Object.entries(result).reduce((r, i) => (i[1] === undefined) ? r : ({ ...r, [i[0]]: i[1] }), {});");
        code.close_block();
        code.line("/* eslint-enable max-len, quote-props */");

        Ok(code.render())
    }

    fn emit_alias(&mut self, name: &str, schema: &Value) -> Result<String> {
        let shape = self.shape_of(name, "Item", schema)?;

        let mut code = CodeWriter::new();
        if let Some(description) = schema.get("description").and_then(Value::as_str) {
            code.doc(description);
        }
        code.line(format!("export type {} = {};", name, shape.ts_type()));
        code.blank();
        code.line("/* eslint-disable max-len, quote-props */");
        code.open_block(format!(
            "export function toJson_{name}(obj: {name} | undefined): any",
            name = name
        ));
        code.line("if (obj === undefined) { return undefined; }");
        code.line(format!("return {};", shape.to_json("obj", 0)));
        code.close_block();
        code.line("/* eslint-enable max-len, quote-props */");

        Ok(code.render())
    }
}

impl TypeEmitter for InterfaceEmitter {
    fn emit_type(&mut self, name: &str, schema: &Value) -> Result<()> {
        if !self.emitted.insert(name.to_string()) {
            return Ok(());
        }

        // reserve the slot so a type precedes the types it reaches
        let slot = self.blocks.len();
        self.blocks.push(String::new());

        let object_like = matches!(
            schema.get("type").and_then(Value::as_str),
            None | Some("object")
        ) && schema.get("$ref").is_none();
        let is_object =
            has_properties(schema) || object_like && map_value_schema(schema).is_none();
        let block = if is_object {
            self.emit_interface(name, schema)?
        } else {
            self.emit_alias(name, schema)?
        };
        self.blocks[slot] = block;

        Ok(())
    }

    fn render(&self) -> String {
        self.blocks.join("\n")
    }
}

fn has_properties(schema: &Value) -> bool {
    schema
        .get("properties")
        .and_then(Value::as_object)
        .is_some_and(|properties| !properties.is_empty())
}

/// Value schema of a map-like object, from `additionalProperties` or the
/// first `patternProperties` entry
fn map_value_schema(schema: &Value) -> Option<Value> {
    if let Some(additional) = schema.get("additionalProperties").filter(|v| v.is_object()) {
        return Some(additional.clone());
    }
    schema
        .get("patternProperties")
        .and_then(Value::as_object)
        .and_then(|patterns| patterns.values().next().cloned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn definitions() -> Map<String, Value> {
        json!({
            "Tag": {
                "type": "object",
                "properties": {
                    "Key": {"type": "string", "description": "Tag key"},
                    "Value": {"type": "string"}
                },
                "required": ["Key"]
            },
            "Unused": {"type": "string"}
        })
        .as_object()
        .cloned()
        .unwrap()
    }

    #[test]
    fn test_props_reach_referenced_definitions() {
        let mut emitter = InterfaceEmitter::new(definitions());
        emitter
            .emit_type(
                "CfnBucketProps",
                &json!({
                    "properties": {
                        "Name": {"type": "string"},
                        "Tags": {"type": "array", "items": {"$ref": "#/definitions/Tag"}}
                    },
                    "required": ["Name"]
                }),
            )
            .unwrap();
        let code = emitter.render();

        assert!(code.contains("export interface CfnBucketProps {"));
        assert!(code.contains("  readonly name: string;"));
        assert!(code.contains("  readonly tags?: Tag[];"));
        assert!(code.contains("'Tags': obj.tags?.map(y0 => toJson_Tag(y0)),"));
        assert!(code.contains("export interface Tag {"));
        assert!(code.contains("  readonly key: string;"));
        assert!(code.contains("   * Tag key"));
        assert!(!code.contains("Unused"));

        let props_at = code.find("export interface CfnBucketProps").unwrap();
        let tag_at = code.find("export interface Tag").unwrap();
        assert!(props_at < tag_at);
    }

    #[test]
    fn test_emit_definitions_includes_unreached() {
        let mut emitter = InterfaceEmitter::new(definitions());
        emitter.emit_definitions().unwrap();
        let code = emitter.render();

        assert!(code.contains("export type Unused = string;"));
        assert_eq!(code.matches("export interface Tag {").count(), 1);
    }

    #[test]
    fn test_inline_objects_and_maps() {
        let mut emitter = InterfaceEmitter::new(Map::new());
        emitter
            .emit_type(
                "CfnThingProps",
                &json!({
                    "properties": {
                        "Config": {
                            "type": "object",
                            "properties": {"Enabled": {"type": "boolean"}}
                        },
                        "Labels": {
                            "type": "object",
                            "additionalProperties": {"type": "string"}
                        },
                        "Free": {"type": "object"}
                    }
                }),
            )
            .unwrap();
        let code = emitter.render();

        assert!(code.contains("readonly config?: CfnThingPropsConfig;"));
        assert!(code.contains("export interface CfnThingPropsConfig {"));
        assert!(code.contains("readonly enabled?: boolean;"));
        assert!(code.contains("readonly labels?: { [key: string]: string };"));
        assert!(code.contains("readonly free?: any;"));
        assert!(code.contains("'Config': toJson_CfnThingPropsConfig(obj.config),"));
        assert!(code.contains("'Labels': obj.labels,"));
    }

    #[test]
    fn test_recursive_definitions_terminate() {
        let definitions = json!({
            "Node": {
                "type": "object",
                "properties": {
                    "Children": {"type": "array", "items": {"$ref": "#/definitions/Node"}}
                }
            }
        });
        let mut emitter = InterfaceEmitter::new(definitions.as_object().cloned().unwrap());
        emitter.emit_definitions().unwrap();

        let code = emitter.render();
        assert_eq!(code.matches("export interface Node {").count(), 1);
        assert!(code.contains("readonly children?: Node[];"));
    }

    #[test]
    fn test_missing_definition_is_an_error() {
        let mut emitter = InterfaceEmitter::new(Map::new());
        let result = emitter.emit_type(
            "CfnProps",
            &json!({"properties": {"Missing": {"$ref": "#/definitions/Nope"}}}),
        );

        assert!(matches!(result, Err(ImportError::Generation(_))));
    }
}
