//! Schema property type to TypeScript type mapping

use cdk_import_common::PropertySchema;
use std::fmt;

const DEFINITIONS_PREFIX: &str = "#/definitions/";

/// Target type of a field declared on the generated construct class
///
/// This covers only the types that get token wrapping as attributes.
/// The props interface is typed by the declaration emitter, which also knows
/// `boolean` and map types, so a `boolean` property is `boolean` on the props
/// interface but `any` on the class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetType {
    String,
    Number,
    List(Box<TargetType>),
    /// A nested declaration emitted from the schema definitions
    Named(String),
    /// Fallback for anything the mapping does not recognize
    Any,
}

impl TargetType {
    /// Map a property schema; unknown or missing types become [`TargetType::Any`]
    pub fn from_schema(schema: &PropertySchema) -> Self {
        match schema.type_name() {
            Some("string") => TargetType::String,
            Some("number") | Some("integer") => TargetType::Number,
            Some("array") => {
                let item = schema
                    .item_schema()
                    .map(|items| TargetType::from_schema(&items))
                    .unwrap_or(TargetType::Any);
                TargetType::List(Box::new(item))
            }
            Some(_) => TargetType::Any,
            None => match &schema.reference {
                Some(reference) => {
                    TargetType::Named(reference.trim_start_matches(DEFINITIONS_PREFIX).to_string())
                }
                None => TargetType::Any,
            },
        }
    }

    /// Accessor expression for a runtime attribute of this type
    pub fn attribute_accessor(&self, attribute: &str) -> String {
        let get_att = format!("this.getAtt('{}')", attribute);
        match self {
            TargetType::String => format!("cdk.Token.asString({})", get_att),
            TargetType::List(item) if **item == TargetType::String => {
                format!("cdk.Token.asList({})", get_att)
            }
            TargetType::Number => format!("cdk.Token.asNumber({})", get_att),
            _ => get_att,
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetType::String => write!(f, "string"),
            TargetType::Number => write!(f, "number"),
            TargetType::List(item) => write!(f, "{}[]", item),
            TargetType::Named(name) => write!(f, "{}", name),
            TargetType::Any => write!(f, "any"),
        }
    }
}
