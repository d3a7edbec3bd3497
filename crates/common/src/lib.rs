//! Common types and utilities for cdk-import
//!
//! This crate contains the data model shared by the registry clients, the
//! construct generators and the CLI: registry wire types, the parsed
//! JSON-Schema document, the error taxonomy and the tool configuration.

pub mod config;
mod error;
mod model;
pub mod schema;

pub use config::{EndpointConfig, ImportConfig};
pub use error::{
    ImportError, ProductResolutionError, RegistryError, ResolutionError, Result, SchemaError,
};
pub use model::*;
pub use schema::{PropertySchema, SchemaDocument};
