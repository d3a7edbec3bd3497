//! JSON-Schema documents describing registry types
//!
//! Only the parts of the schema that drive generation are typed; the raw
//! document is kept alongside so the nested-type emitter sees everything.

use crate::SchemaError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Prefix of every read-only property pointer
pub const PROPERTIES_POINTER_PREFIX: &str = "/properties/";

/// Schema of a single property
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertySchema {
    /// JSON-Schema `type`; only the string form is interpreted
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<Value>,

    /// Raw `items` keyword; boolean and tuple forms are kept as-is
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Value>,

    #[serde(
        rename = "$ref",
        default,
        deserialize_with = "string_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub reference: Option<String>,

    #[serde(
        default,
        deserialize_with = "string_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
}

impl PropertySchema {
    /// Read a property schema, treating anything that is not an object as
    /// an empty (untyped) schema
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(_) => serde_json::from_value(value).unwrap_or_default(),
            _ => Self::default(),
        }
    }

    /// The `type` keyword when it is a single type name
    pub fn type_name(&self) -> Option<&str> {
        self.schema_type.as_ref().and_then(Value::as_str)
    }

    /// Item schema of an array, when `items` is a single schema object
    pub fn item_schema(&self) -> Option<PropertySchema> {
        self.items
            .as_ref()
            .filter(|items| items.is_object())
            .map(|items| Self::from_value(items.clone()))
    }
}

fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(text)) => Some(text),
        _ => None,
    })
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSchema {
    #[serde(default)]
    type_name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    properties: Map<String, Value>,
    #[serde(default)]
    required: Vec<String>,
    #[serde(default)]
    read_only_properties: Vec<String>,
    #[serde(default)]
    definitions: Map<String, Value>,
}

/// Parsed type schema
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDocument {
    pub type_name: Option<String>,
    pub description: Option<String>,
    /// Declared properties, in document order
    pub properties: Vec<(String, PropertySchema)>,
    pub required: Vec<String>,
    /// JSON pointers rooted at `/properties/`; only `/properties/<name>`
    /// marks a top-level attribute
    pub read_only_properties: Vec<String>,
    pub definitions: Map<String, Value>,
    raw: Value,
}

impl SchemaDocument {
    /// Parse a schema document and check its invariants
    pub fn parse(text: &str) -> Result<Self, SchemaError> {
        let raw: Value = serde_json::from_str(text)?;
        Self::from_value(raw)
    }

    pub fn from_value(raw: Value) -> Result<Self, SchemaError> {
        let parsed: RawSchema = serde_json::from_value(raw.clone())?;

        let mut properties = Vec::with_capacity(parsed.properties.len());
        for (name, value) in parsed.properties {
            properties.push((name, PropertySchema::from_value(value)));
        }

        let document = Self {
            type_name: parsed.type_name,
            description: parsed.description,
            properties,
            required: parsed.required,
            read_only_properties: parsed.read_only_properties,
            definitions: parsed.definitions,
            raw,
        };
        document.validate()?;
        Ok(document)
    }

    fn validate(&self) -> Result<(), SchemaError> {
        // nested pointers such as `/properties/Endpoint/Address` are accepted
        // when their top-level segment is declared
        for pointer in &self.read_only_properties {
            let known = pointer
                .strip_prefix(PROPERTIES_POINTER_PREFIX)
                .and_then(|path| path.split('/').next())
                .is_some_and(|name| self.property(name).is_some());
            if !known {
                return Err(SchemaError::UnknownReadOnlyProperty {
                    pointer: pointer.clone(),
                });
            }
        }

        for name in &self.required {
            if self.property(name).is_none() {
                return Err(SchemaError::UnknownRequiredProperty { name: name.clone() });
            }
        }

        Ok(())
    }

    pub fn property(&self, name: &str) -> Option<&PropertySchema> {
        self.properties
            .iter()
            .find(|(candidate, _)| candidate == name)
            .map(|(_, schema)| schema)
    }

    pub fn is_read_only(&self, name: &str) -> bool {
        let pointer = format!("{}{}", PROPERTIES_POINTER_PREFIX, name);
        self.read_only_properties.contains(&pointer)
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|required| required == name)
    }

    /// The unmodified JSON document
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// Copy of the document with every read-only property removed, used as
    /// the input-props schema
    pub fn writable_schema(&self) -> Value {
        let mut schema = self.raw.clone();

        if let Some(properties) = schema.get_mut("properties").and_then(Value::as_object_mut) {
            properties.retain(|name, _| !self.is_read_only(name));
        }
        if let Some(required) = schema.get_mut("required").and_then(Value::as_array_mut) {
            required.retain(|name| name.as_str().map_or(true, |name| !self.is_read_only(name)));
        }

        schema
    }
}
