//! AWS SDK clients for the type registry and the product catalog
//!
//! Credentials and region come from the default provider chain; the
//! configuration can pin the region, override either endpoint and bound each
//! operation with a timeout.

use async_trait::async_trait;
use aws_config::timeout::TimeoutConfig;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_cloudformation as cfn;
use aws_sdk_servicecatalog as sc;
use cdk_import_common::{
    DescribeProductOutput, DescribeTypeOutput, ImportConfig, LaunchPath, ListTypesPage,
    ListTypesRequest, ProductPage, ProductViewSummary, ProvisioningArtifact,
    ProvisioningArtifactOutput, ProvisioningParameter, ProvisioningParameters,
    ProvisioningParametersRequest, RegistryError, SearchProductsRequest, TypeSummary, Visibility,
};
use chrono::{DateTime, Utc};
use std::error::Error as StdError;
use std::time::Duration;
use tracing::debug;

use crate::client::{CatalogClient, TypeRegistryClient};

/// Load the shared SDK configuration
pub async fn load_sdk_config(config: &ImportConfig) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest()).timeout_config(
        TimeoutConfig::builder()
            .operation_timeout(Duration::from_secs(config.timeout_secs))
            .build(),
    );
    if let Some(region) = &config.region {
        loader = loader.region(Region::new(region.clone()));
    }
    loader.load().await
}

fn request_error<E>(operation: &str, error: E) -> RegistryError
where
    E: StdError,
{
    RegistryError::Request {
        operation: operation.to_string(),
        message: cfn::error::DisplayErrorContext(error).to_string(),
    }
}

/// Empty lists are reported as absent, as the catalog does on the wire
fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}

/// Type registry client backed by the CloudFormation SDK
#[derive(Debug, Clone)]
pub struct SdkRegistryClient {
    client: cfn::Client,
}

impl SdkRegistryClient {
    pub fn new(sdk_config: &SdkConfig, endpoint: Option<&str>) -> Self {
        let mut builder = cfn::config::Builder::from(sdk_config);
        if let Some(endpoint) = endpoint {
            builder = builder.endpoint_url(endpoint);
        }
        Self {
            client: cfn::Client::from_conf(builder.build()),
        }
    }

    pub async fn from_config(config: &ImportConfig) -> Self {
        let sdk_config = load_sdk_config(config).await;
        Self::new(&sdk_config, config.registry.endpoint.as_deref())
    }
}

fn type_filters(request: &ListTypesRequest) -> cfn::types::TypeFilters {
    let filters = cfn::types::TypeFilters::builder().type_name_prefix(&request.type_name_prefix);
    match request.visibility {
        Visibility::Public => filters.category(cfn::types::Category::ThirdParty).build(),
        Visibility::Private => filters.build(),
    }
}

fn type_summary(summary: &cfn::types::TypeSummary) -> Result<TypeSummary, RegistryError> {
    match (summary.type_name(), summary.type_arn()) {
        (Some(type_name), Some(type_arn)) => Ok(TypeSummary {
            type_name: type_name.to_string(),
            type_arn: type_arn.to_string(),
            description: summary.description().map(str::to_string),
        }),
        _ => Err(RegistryError::Decode {
            operation: "ListTypes".to_string(),
            message: "type summary without TypeName or TypeArn".to_string(),
        }),
    }
}

#[async_trait]
impl TypeRegistryClient for SdkRegistryClient {
    async fn list_types(&self, request: &ListTypesRequest) -> Result<ListTypesPage, RegistryError> {
        debug!(prefix = %request.type_name_prefix, "ListTypes");
        let output = self
            .client
            .list_types()
            .r#type(cfn::types::RegistryType::from(request.category.as_str()))
            .visibility(cfn::types::Visibility::from(request.visibility.as_str()))
            .filters(type_filters(request))
            .set_next_token(request.next_token.clone())
            .send()
            .await
            .map_err(|e| request_error("ListTypes", e))?;

        Ok(ListTypesPage {
            type_summaries: output
                .type_summaries()
                .iter()
                .map(type_summary)
                .collect::<Result<_, _>>()?,
            next_token: output.next_token().map(str::to_string),
        })
    }

    async fn describe_type(&self, identifier: &str) -> Result<DescribeTypeOutput, RegistryError> {
        debug!(identifier, "DescribeType");
        let output = self
            .client
            .describe_type()
            .arn(identifier)
            .send()
            .await
            .map_err(|e| request_error("DescribeType", e))?;

        Ok(DescribeTypeOutput {
            arn: output.arn().unwrap_or(identifier).to_string(),
            type_name: output.type_name().map(str::to_string),
            schema: output.schema().map(str::to_string),
            source_url: output.source_url().map(str::to_string),
        })
    }
}

/// Product catalog client backed by the Service Catalog SDK
#[derive(Debug, Clone)]
pub struct SdkCatalogClient {
    client: sc::Client,
}

impl SdkCatalogClient {
    pub fn new(sdk_config: &SdkConfig, endpoint: Option<&str>) -> Self {
        let mut builder = sc::config::Builder::from(sdk_config);
        if let Some(endpoint) = endpoint {
            builder = builder.endpoint_url(endpoint);
        }
        Self {
            client: sc::Client::from_conf(builder.build()),
        }
    }

    pub async fn from_config(config: &ImportConfig) -> Self {
        let sdk_config = load_sdk_config(config).await;
        Self::new(&sdk_config, config.catalog.endpoint.as_deref())
    }
}

fn product_summary(summary: &sc::types::ProductViewSummary) -> ProductViewSummary {
    ProductViewSummary {
        product_id: summary.product_id().unwrap_or_default().to_string(),
        id: summary.id().map(str::to_string),
        name: summary.name().map(str::to_string),
        owner: summary.owner().map(str::to_string),
        short_description: summary.short_description().map(str::to_string),
    }
}

fn created_time(time: &sc::primitives::DateTime) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(time.secs(), time.subsec_nanos())
}

fn provisioning_artifact(artifact: &sc::types::ProvisioningArtifact) -> ProvisioningArtifact {
    ProvisioningArtifact {
        id: artifact.id().unwrap_or_default().to_string(),
        name: artifact.name().map(str::to_string),
        description: artifact.description().map(str::to_string),
        guidance: artifact.guidance().map(|g| g.as_str().to_string()),
        created_time: artifact.created_time().and_then(created_time),
    }
}

fn launch_path(path: &sc::types::LaunchPath) -> LaunchPath {
    LaunchPath {
        id: path.id().unwrap_or_default().to_string(),
        name: path.name().map(str::to_string),
    }
}

fn provisioning_parameter(
    parameter: &sc::types::ProvisioningArtifactParameter,
) -> ProvisioningParameter {
    ProvisioningParameter {
        parameter_key: parameter.parameter_key().unwrap_or_default().to_string(),
        default_value: parameter.default_value().map(str::to_string),
        parameter_type: parameter.parameter_type().map(str::to_string),
        is_no_echo: parameter.is_no_echo(),
        description: parameter.description().map(str::to_string),
    }
}

#[async_trait]
impl CatalogClient for SdkCatalogClient {
    async fn search_products(
        &self,
        request: &SearchProductsRequest,
    ) -> Result<ProductPage, RegistryError> {
        debug!(page_token = ?request.page_token, "SearchProducts");
        let mut search = self
            .client
            .search_products()
            .set_page_token(request.page_token.clone());
        if let Some(source) = &request.source_product_id {
            search = search.filters(
                sc::types::ProductViewFilterBy::SourceProductId,
                vec![source.clone()],
            );
        }
        let output = search
            .send()
            .await
            .map_err(|e| request_error("SearchProducts", e))?;

        Ok(ProductPage {
            product_view_summaries: output
                .product_view_summaries()
                .iter()
                .map(product_summary)
                .collect(),
            next_page_token: output.next_page_token().map(str::to_string),
        })
    }

    async fn describe_product(
        &self,
        product_id: &str,
    ) -> Result<DescribeProductOutput, RegistryError> {
        debug!(product_id, "DescribeProduct");
        let output = self
            .client
            .describe_product()
            .id(product_id)
            .send()
            .await
            .map_err(|e| request_error("DescribeProduct", e))?;

        Ok(DescribeProductOutput {
            product_view_summary: output.product_view_summary().map(product_summary),
            provisioning_artifacts: non_empty(
                output
                    .provisioning_artifacts()
                    .iter()
                    .map(provisioning_artifact)
                    .collect(),
            ),
            launch_paths: non_empty(output.launch_paths().iter().map(launch_path).collect()),
        })
    }

    async fn describe_provisioning_parameters(
        &self,
        request: &ProvisioningParametersRequest,
    ) -> Result<ProvisioningParameters, RegistryError> {
        debug!(product_id = %request.product_id, "DescribeProvisioningParameters");
        let output = self
            .client
            .describe_provisioning_parameters()
            .product_id(&request.product_id)
            .provisioning_artifact_id(&request.provisioning_artifact_id)
            .path_id(&request.path_id)
            .send()
            .await
            .map_err(|e| request_error("DescribeProvisioningParameters", e))?;

        Ok(ProvisioningParameters {
            provisioning_artifact_parameters: output
                .provisioning_artifact_parameters()
                .iter()
                .map(provisioning_parameter)
                .collect(),
            provisioning_artifact_outputs: output
                .provisioning_artifact_output_keys()
                .iter()
                .map(|key| ProvisioningArtifactOutput {
                    key: key.key().unwrap_or_default().to_string(),
                    description: key.description().map(str::to_string),
                })
                .collect(),
        })
    }
}
