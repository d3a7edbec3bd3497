//! Writable/attribute partition of schema properties

use cdk_import_common::SchemaDocument;
use serde::Serialize;

use crate::naming::{attribute_field_name, field_name};
use crate::type_mapper::TargetType;

/// One schema property as it appears on the generated class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedProperty {
    /// Property name as declared in the schema
    pub name: String,
    pub field_name: String,
    pub target_type: TargetType,
    pub optional: bool,
    pub is_attribute: bool,
    pub description: Option<String>,
}

impl GeneratedProperty {
    fn view(&self) -> PropertyView {
        let accessor = if self.is_attribute {
            self.target_type.attribute_accessor(&self.name)
        } else {
            format!("props.{}", self.field_name)
        };

        PropertyView {
            name: self.name.clone(),
            field: self.field_name.clone(),
            ts_type: self.target_type.to_string(),
            optional: self.optional,
            description: self.description.clone(),
            accessor,
        }
    }
}

/// Template-facing shape of a [`GeneratedProperty`]
#[derive(Debug, Clone, Serialize)]
pub struct PropertyView {
    pub name: String,
    pub field: String,
    pub ts_type: String,
    pub optional: bool,
    pub description: Option<String>,
    pub accessor: String,
}

/// Properties of a schema split into writable fields and attributes,
/// both in declaration order
#[derive(Debug, Clone, Default)]
pub struct PropertyModel {
    pub writable: Vec<GeneratedProperty>,
    pub attributes: Vec<GeneratedProperty>,
}

impl PropertyModel {
    pub fn from_schema(schema: &SchemaDocument) -> Self {
        let mut model = Self::default();

        for (name, property) in &schema.properties {
            let is_attribute = schema.is_read_only(name);
            let generated = GeneratedProperty {
                name: name.clone(),
                field_name: if is_attribute {
                    attribute_field_name(name)
                } else {
                    field_name(name)
                },
                target_type: TargetType::from_schema(property),
                optional: !is_attribute && !schema.is_required(name),
                is_attribute,
                description: property.description.clone(),
            };

            if is_attribute {
                model.attributes.push(generated);
            } else {
                model.writable.push(generated);
            }
        }

        model
    }

    pub fn writable_views(&self) -> Vec<PropertyView> {
        self.writable.iter().map(GeneratedProperty::view).collect()
    }

    pub fn attribute_views(&self) -> Vec<PropertyView> {
        self.attributes.iter().map(GeneratedProperty::view).collect()
    }

    /// Field names of required writable properties
    pub fn required_fields(&self) -> Vec<String> {
        self.writable
            .iter()
            .filter(|p| !p.optional)
            .map(|p| p.field_name.clone())
            .collect()
    }
}
