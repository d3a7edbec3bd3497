//! Template loading and management

use cdk_import_common::{ImportError, Result};
use std::collections::HashMap;
use tera::{Tera, Value};

pub const CFN_RESOURCE_TEMPLATE: &str = "cfn_resource.ts";
pub const SC_PRODUCT_TEMPLATE: &str = "sc_product.ts";

/// Load all templates
pub fn load_templates() -> Result<Tera> {
    let mut tera = Tera::default();

    tera.register_filter("quote", quote_filter);
    tera.register_filter("doc", doc_filter);

    tera.add_raw_template(
        CFN_RESOURCE_TEMPLATE,
        include_str!("../templates/cfn_resource.ts.tera"),
    )
    .map_err(|e| {
        ImportError::Generation(format!("Failed to load cfn_resource.ts template: {}", e))
    })?;

    tera.add_raw_template(
        SC_PRODUCT_TEMPLATE,
        include_str!("../templates/sc_product.ts.tera"),
    )
    .map_err(|e| ImportError::Generation(format!("Failed to load sc_product.ts template: {}", e)))?;

    Ok(tera)
}

/// Filter to render a string as a TypeScript string literal
fn quote_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let s = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("quote filter expects a string"))?;

    let literal = serde_json::to_string(s).map_err(|e| tera::Error::msg(e.to_string()))?;
    Ok(Value::String(literal))
}

/// Filter to make a string safe inside a single `/** */` comment line
fn doc_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let s = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("doc filter expects a string"))?;

    let flattened = s.split_whitespace().collect::<Vec<_>>().join(" ");
    Ok(Value::String(flattened.replace("*/", "*\\/")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_templates_load() {
        let tera = load_templates().unwrap();
        let names: Vec<&str> = tera.get_template_names().collect();
        assert!(names.contains(&CFN_RESOURCE_TEMPLATE));
        assert!(names.contains(&SC_PRODUCT_TEMPLATE));
    }

    #[test]
    fn test_quote_filter() {
        let quoted = quote_filter(&json!("Acme::\"Quoted\""), &HashMap::new()).unwrap();
        assert_eq!(quoted, json!("\"Acme::\\\"Quoted\\\"\""));
    }

    #[test]
    fn test_doc_filter() {
        let doc = doc_filter(&json!("multi\nline */ text"), &HashMap::new()).unwrap();
        assert_eq!(doc, json!("multi line *\\/ text"));
    }
}
