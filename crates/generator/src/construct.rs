//! L1 construct generation for registry types

use cdk_import_common::{ImportError, Result, SchemaDocument, TypeDescriptor};
use tera::{Context, Tera};
use tracing::debug;

use crate::definitions::{InterfaceEmitter, TypeEmitter};
use crate::naming::sanitize_type_name;
use crate::properties::PropertyModel;
use crate::templates::{self, CFN_RESOURCE_TEMPLATE};

/// Construct generator
///
/// Renders a `Cfn<Name>` class extending `cdk.CfnResource`, its props
/// interface and every nested declaration of the schema into one
/// TypeScript source file.
pub struct CfnResourceGenerator<'a> {
    type_name: &'a str,
    descriptor: &'a TypeDescriptor,
    schema: &'a SchemaDocument,
    class_name: String,
    tera: Tera,
}

impl<'a> CfnResourceGenerator<'a> {
    pub fn new(
        type_name: &'a str,
        descriptor: &'a TypeDescriptor,
        schema: &'a SchemaDocument,
    ) -> Result<Self> {
        let tera = templates::load_templates()?;
        Ok(Self {
            type_name,
            descriptor,
            schema,
            class_name: format!("Cfn{}", sanitize_type_name(type_name)),
            tera,
        })
    }

    /// `Cfn<Name>`
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// `Cfn<Name>Props`
    pub fn props_name(&self) -> String {
        format!("{}Props", self.class_name)
    }

    /// Render with the default interface emitter
    pub fn render(&self) -> Result<String> {
        let mut emitter = InterfaceEmitter::new(self.schema.definitions.clone());
        self.emit_nested_types(&mut emitter)?;
        emitter.emit_definitions()?;
        self.render_with(&emitter)
    }

    /// Emit the props declaration over the schema without attribute properties
    pub fn emit_nested_types(&self, emitter: &mut dyn TypeEmitter) -> Result<()> {
        emitter.emit_type(&self.props_name(), &self.schema.writable_schema())
    }

    /// Render the source file around the declarations already in `emitter`
    pub fn render_with(&self, emitter: &dyn TypeEmitter) -> Result<String> {
        let model = PropertyModel::from_schema(self.schema);
        debug!(
            type_name = self.type_name,
            writable = model.writable.len(),
            attributes = model.attributes.len(),
            "Rendering construct"
        );

        let mut context = Context::new();
        context.insert("type_name", self.type_name);
        context.insert("source_url", &self.descriptor.source_url);
        context.insert("class_name", &self.class_name);
        context.insert("props_name", &self.props_name());
        context.insert("nested_types", &emitter.render());
        context.insert("writable", &model.writable_views());
        context.insert("attributes", &model.attribute_views());
        context.insert("required", &model.required_fields());

        self.tera
            .render(CFN_RESOURCE_TEMPLATE, &context)
            .map_err(|e| ImportError::Generation(format!("Template error: {:?}", e)))
    }
}

/// Generate the construct source for a resolved type (convenience function)
pub fn generate(
    type_name: &str,
    descriptor: &TypeDescriptor,
    schema: &SchemaDocument,
) -> Result<String> {
    CfnResourceGenerator::new(type_name, descriptor, schema)?.render()
}
