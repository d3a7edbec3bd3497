//! Client seams for the two remote APIs

use async_trait::async_trait;
use cdk_import_common::{
    DescribeProductOutput, DescribeTypeOutput, ListTypesPage, ListTypesRequest, ProductPage,
    ProvisioningParameters, ProvisioningParametersRequest, RegistryError, SearchProductsRequest,
};

#[cfg(test)]
use mockall::automock;

/// Type registry operations
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TypeRegistryClient: Send + Sync {
    /// Fetch one page of types matching the request filters
    async fn list_types(&self, request: &ListTypesRequest) -> Result<ListTypesPage, RegistryError>;

    /// Describe a type by its ARN
    async fn describe_type(&self, identifier: &str) -> Result<DescribeTypeOutput, RegistryError>;
}

/// Product catalog operations
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Fetch one page of products available to the caller
    async fn search_products(
        &self,
        request: &SearchProductsRequest,
    ) -> Result<ProductPage, RegistryError>;

    /// Describe a product with its artifacts and launch paths
    async fn describe_product(&self, product_id: &str)
        -> Result<DescribeProductOutput, RegistryError>;

    /// Describe the inputs and outputs of one provisioning artifact
    async fn describe_provisioning_parameters(
        &self,
        request: &ProvisioningParametersRequest,
    ) -> Result<ProvisioningParameters, RegistryError>;
}
