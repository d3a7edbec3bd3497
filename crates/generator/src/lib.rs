//! TypeScript construct generation for cdk-import
//!
//! This crate turns a resolved registry type and its parsed schema into an
//! L1 construct class, and a catalog product aggregate into a provisioning
//! construct. Nested declarations are produced through the [`TypeEmitter`]
//! seam; [`InterfaceEmitter`] is the default implementation.

mod code;
mod construct;
mod definitions;
pub mod naming;
mod product;
mod properties;
mod templates;
mod type_mapper;

pub use code::CodeWriter;
pub use construct::{generate, CfnResourceGenerator};
pub use definitions::{InterfaceEmitter, TypeEmitter};
pub use product::{generate_product, ProductConstructGenerator};
pub use properties::{GeneratedProperty, PropertyModel};
pub use type_mapper::TargetType;
