//! Construct generation for catalog products

use cdk_import_common::{ImportError, ProductDataAggregate, Result};
use serde::Serialize;
use tera::{Context, Tera};
use tracing::debug;

use crate::naming::{field_name, product_class_name};
use crate::templates::{self, SC_PRODUCT_TEMPLATE};

/// Props field the construct itself declares
const PROVISIONED_PRODUCT_NAME_FIELD: &str = "provisionedProductName";

/// Props field for a provisioning parameter; keys clashing with the built-in
/// field get a `Parameter` suffix
fn parameter_field(key: &str) -> String {
    let field = field_name(key);
    if field == PROVISIONED_PRODUCT_NAME_FIELD {
        format!("{}Parameter", field)
    } else {
        field
    }
}

#[derive(Debug, Clone, Serialize)]
struct ParameterView {
    key: String,
    field: String,
    optional: bool,
    default_value: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
struct OutputView {
    key: String,
    field: String,
    attribute: String,
    description: Option<String>,
}

/// Product construct generator
///
/// Renders a construct that provisions one product through a
/// `CfnCloudFormationProvisionedProduct`, with a props field per
/// provisioning parameter and a token field per artifact output.
pub struct ProductConstructGenerator<'a> {
    aggregate: &'a ProductDataAggregate,
    class_name: String,
    tera: Tera,
}

impl<'a> ProductConstructGenerator<'a> {
    pub fn new(aggregate: &'a ProductDataAggregate) -> Result<Self> {
        let product_name = aggregate
            .product
            .name
            .as_deref()
            .unwrap_or(&aggregate.product.product_id);

        let mut class_name = product_class_name(product_name);
        if !class_name.starts_with(|c: char| c.is_ascii_alphabetic()) {
            class_name = format!("Product{}", class_name);
        }

        Ok(Self {
            aggregate,
            class_name,
            tera: templates::load_templates()?,
        })
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn render(&self) -> Result<String> {
        let product = &self.aggregate.product;
        let parameters: Vec<ParameterView> = self
            .aggregate
            .provisioning_parameters
            .provisioning_artifact_parameters
            .iter()
            .map(|p| ParameterView {
                key: p.parameter_key.clone(),
                field: parameter_field(&p.parameter_key),
                optional: p.default_value.is_some(),
                default_value: p.default_value.clone().filter(|_| !p.is_no_echo),
                description: p.description.clone(),
            })
            .collect();
        let outputs: Vec<OutputView> = self
            .aggregate
            .provisioning_parameters
            .provisioning_artifact_outputs
            .iter()
            .map(|o| OutputView {
                key: o.key.clone(),
                field: format!("{}Output", field_name(&o.key)),
                attribute: format!("Outputs.{}", o.key),
                description: o.description.clone(),
            })
            .collect();

        debug!(
            product_id = %product.product_id,
            parameters = parameters.len(),
            outputs = outputs.len(),
            "Rendering product construct"
        );

        let mut context = Context::new();
        context.insert("class_name", &self.class_name);
        context.insert("props_name", &format!("{}Props", self.class_name));
        context.insert(
            "product_name",
            product.name.as_deref().unwrap_or(&product.product_id),
        );
        context.insert("product_description", &product.short_description);
        context.insert("product_id", &product.product_id);
        context.insert(
            "provisioning_artifact_id",
            &self.aggregate.provisioning_artifact.id,
        );
        context.insert("path_id", &self.aggregate.launch_path.id);
        context.insert("all_optional", &parameters.iter().all(|p| p.optional));
        context.insert("parameters", &parameters);
        context.insert("outputs", &outputs);

        self.tera
            .render(SC_PRODUCT_TEMPLATE, &context)
            .map_err(|e| ImportError::Generation(format!("Template error: {:?}", e)))
    }
}

/// Generate the construct source for a product aggregate (convenience function)
pub fn generate_product(aggregate: &ProductDataAggregate) -> Result<(String, String)> {
    let generator = ProductConstructGenerator::new(aggregate)?;
    let source = generator.render()?;
    Ok((generator.class_name().to_string(), source))
}
