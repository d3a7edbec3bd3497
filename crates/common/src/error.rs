//! Error taxonomy for resolution, aggregation and generation

use thiserror::Error;

/// Transport-level failure of a registry or catalog call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Request to {operation} failed: {message}")]
    Request { operation: String, message: String },

    #[error("{operation} returned HTTP {status}: {body}")]
    Status {
        operation: String,
        status: u16,
        body: String,
    },

    #[error("Failed to decode {operation} response: {message}")]
    Decode { operation: String, message: String },
}

/// Errors raised while resolving a registry type
#[derive(Error, Debug)]
pub enum ResolutionError {
    #[error("Cannot find unique type for {name} ({matches} candidates)")]
    AmbiguousType { name: String, matches: usize },

    #[error("Type {identifier} does not contain {missing}")]
    IncompleteType {
        identifier: String,
        missing: &'static str,
    },

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Errors raised while aggregating a catalog product
#[derive(Error, Debug)]
pub enum ProductResolutionError {
    #[error("Could not find specified provisioning artifact id {artifact_id} for product {product_id}")]
    ArtifactNotFound {
        product_id: String,
        artifact_id: String,
    },

    #[error("Could not find specified launch path id {launch_path_id} for product {product_id}")]
    LaunchPathNotFound {
        product_id: String,
        launch_path_id: String,
    },

    #[error("Unable to resolve default or latest provisioning artifact for product {product_id}: {reason}")]
    AmbiguousArtifact { product_id: String, reason: String },

    #[error("Unable to resolve between multiple launch paths. Product {product_id} has {count} launch paths")]
    AmbiguousLaunchPath { product_id: String, count: usize },

    #[error("Product {product_id} response is missing {missing}")]
    ProductValidation {
        product_id: String,
        missing: &'static str,
    },

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Violations of the schema document invariants
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Schema is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Read-only property {pointer} does not reference a declared property")]
    UnknownReadOnlyProperty { pointer: String },

    #[error("Required property {name} is not declared in properties")]
    UnknownRequiredProperty { name: String },
}

/// Errors that can occur while importing a type or product
#[derive(Error, Debug)]
pub enum ImportError {
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Product(#[from] ProductResolutionError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Cross-compile error: {0}")]
    Compile(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type for import operations
pub type Result<T> = std::result::Result<T, ImportError>;
