//! Registry resolution for cdk-import
//!
//! This crate turns user input into fully-described registry entries:
//!
//! - [`TypeResolver`] resolves a type name or ARN against the type registry
//!   into a [`TypeDescriptor`](cdk_import_common::TypeDescriptor)
//! - [`ProductAggregator`] collects everything needed to provision a catalog
//!   product into a [`ProductDataAggregate`](cdk_import_common::ProductDataAggregate)
//!
//! Both talk to the remote APIs through the [`TypeRegistryClient`] and
//! [`CatalogClient`] traits. [`SdkRegistryClient`] and [`SdkCatalogClient`]
//! are the AWS SDK implementations; the [`memory`] module provides
//! deterministic in-memory registries for tests and offline use.

mod catalog;
mod client;
pub mod memory;
mod resolver;
mod sdk;

pub use catalog::{
    describe_product_aggregate, fetch_available_products, resolve_launch_path,
    resolve_provisioning_artifact, ProductAggregateOptions, ProductAggregator,
};
pub use client::{CatalogClient, TypeRegistryClient};
pub use resolver::{is_arn, resolve_type, ResolveOptions, TypeResolver};
pub use sdk::{load_sdk_config, SdkCatalogClient, SdkRegistryClient};

#[cfg(test)]
pub use client::{MockCatalogClient, MockTypeRegistryClient};
