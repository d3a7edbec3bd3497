//! Product aggregation against the product catalog

use cdk_import_common::{
    LaunchPath, ProductDataAggregate, ProductResolutionError, ProductViewSummary,
    ProvisioningArtifact, ProvisioningParametersRequest, RegistryError, SearchProductsRequest,
};
use tracing::{debug, info};

use crate::client::CatalogClient;

/// Query values for one provisionable product
///
/// Without explicit ids the `DEFAULT` (or most recent) provisioning artifact
/// and the only launch path are used.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductAggregateOptions {
    pub product_id: String,
    pub provisioning_artifact_id: Option<String>,
    pub launch_path_id: Option<String>,
}

impl ProductAggregateOptions {
    pub fn new(product_id: &str) -> Self {
        Self {
            product_id: product_id.to_string(),
            ..Default::default()
        }
    }
}

/// Select the provisioning artifact of a product
///
/// An explicit id must exist. Otherwise the single `DEFAULT`-guided
/// artifact wins, then the latest `created_time` (the last one in list
/// order on ties).
pub fn resolve_provisioning_artifact(
    product_id: &str,
    artifacts: &[ProvisioningArtifact],
    artifact_id: Option<&str>,
) -> Result<ProvisioningArtifact, ProductResolutionError> {
    if let Some(artifact_id) = artifact_id {
        return artifacts
            .iter()
            .find(|artifact| artifact.id == artifact_id)
            .cloned()
            .ok_or_else(|| ProductResolutionError::ArtifactNotFound {
                product_id: product_id.to_string(),
                artifact_id: artifact_id.to_string(),
            });
    }

    let ambiguous = |reason: String| ProductResolutionError::AmbiguousArtifact {
        product_id: product_id.to_string(),
        reason,
    };

    let defaults: Vec<&ProvisioningArtifact> =
        artifacts.iter().filter(|artifact| artifact.is_default()).collect();
    if let [default] = defaults.as_slice() {
        return Ok((*default).clone());
    }

    let mut latest: Option<&ProvisioningArtifact> = None;
    for artifact in artifacts {
        let created = artifact
            .created_time
            .ok_or_else(|| ambiguous(format!("artifact {} has no creation time", artifact.id)))?;
        // `>=` keeps the last of equally recent artifacts
        if latest.map_or(true, |best| best.created_time.is_some_and(|t| created >= t)) {
            latest = Some(artifact);
        }
    }

    latest
        .cloned()
        .ok_or_else(|| ambiguous("product has no provisioning artifacts".to_string()))
}

/// Select the launch path of a product
pub fn resolve_launch_path(
    product_id: &str,
    launch_paths: &[LaunchPath],
    launch_path_id: Option<&str>,
) -> Result<LaunchPath, ProductResolutionError> {
    if let Some(launch_path_id) = launch_path_id {
        return launch_paths
            .iter()
            .find(|path| path.id == launch_path_id)
            .cloned()
            .ok_or_else(|| ProductResolutionError::LaunchPathNotFound {
                product_id: product_id.to_string(),
                launch_path_id: launch_path_id.to_string(),
            });
    }

    match launch_paths {
        [single] => Ok(single.clone()),
        _ => Err(ProductResolutionError::AmbiguousLaunchPath {
            product_id: product_id.to_string(),
            count: launch_paths.len(),
        }),
    }
}

/// Aggregates the catalog calls needed to describe a product
pub struct ProductAggregator<'a, C: CatalogClient + ?Sized> {
    client: &'a C,
}

impl<'a, C: CatalogClient + ?Sized> ProductAggregator<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// Describe a product, pick its artifact and launch path, and fetch the
    /// provisioning parameters of the resolved triple
    pub async fn describe_product_aggregate(
        &self,
        options: &ProductAggregateOptions,
    ) -> Result<ProductDataAggregate, ProductResolutionError> {
        let product_id = options.product_id.as_str();
        let described = self.client.describe_product(product_id).await?;

        let missing = |missing: &'static str| ProductResolutionError::ProductValidation {
            product_id: product_id.to_string(),
            missing,
        };
        let product = described
            .product_view_summary
            .ok_or_else(|| missing("product view summary"))?;
        let artifacts = described
            .provisioning_artifacts
            .filter(|artifacts| !artifacts.is_empty())
            .ok_or_else(|| missing("provisioning artifacts"))?;
        let launch_paths = described
            .launch_paths
            .filter(|paths| !paths.is_empty())
            .ok_or_else(|| missing("launch paths"))?;

        let provisioning_artifact = resolve_provisioning_artifact(
            product_id,
            &artifacts,
            options.provisioning_artifact_id.as_deref(),
        )?;
        let launch_path =
            resolve_launch_path(product_id, &launch_paths, options.launch_path_id.as_deref())?;

        info!(
            product_id,
            provisioning_artifact_id = %provisioning_artifact.id,
            launch_path_id = %launch_path.id,
            "Resolved product"
        );

        let provisioning_parameters = self
            .client
            .describe_provisioning_parameters(&ProvisioningParametersRequest {
                product_id: product_id.to_string(),
                provisioning_artifact_id: provisioning_artifact.id.clone(),
                path_id: launch_path.id.clone(),
            })
            .await?;

        Ok(ProductDataAggregate {
            product,
            provisioning_artifact,
            launch_path,
            provisioning_parameters,
        })
    }

    /// Page through every product available to the caller
    pub async fn fetch_available_products(
        &self,
        source_product_id: Option<&str>,
    ) -> Result<Vec<ProductViewSummary>, RegistryError> {
        let mut request = SearchProductsRequest {
            source_product_id: source_product_id.map(str::to_string),
            page_token: None,
        };

        let mut products = Vec::new();
        loop {
            let page = self.client.search_products(&request).await?;
            debug!(count = page.product_view_summaries.len(), "Fetched product page");
            products.extend(page.product_view_summaries);

            match page.next_page_token {
                Some(token) => request.page_token = Some(token),
                None => break,
            }
        }

        Ok(products)
    }
}

/// Describe a product aggregate (convenience function)
pub async fn describe_product_aggregate<C: CatalogClient + ?Sized>(
    client: &C,
    options: &ProductAggregateOptions,
) -> Result<ProductDataAggregate, ProductResolutionError> {
    ProductAggregator::new(client)
        .describe_product_aggregate(options)
        .await
}

/// Fetch all available products (convenience function)
pub async fn fetch_available_products<C: CatalogClient + ?Sized>(
    client: &C,
    source_product_id: Option<&str>,
) -> Result<Vec<ProductViewSummary>, RegistryError> {
    ProductAggregator::new(client)
        .fetch_available_products(source_product_id)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn artifact(id: &str, guidance: Option<&str>, created: Option<&str>) -> ProvisioningArtifact {
        ProvisioningArtifact {
            id: id.to_string(),
            guidance: guidance.map(str::to_string),
            created_time: created.map(|t| {
                DateTime::parse_from_rfc3339(t)
                    .unwrap()
                    .with_timezone(&Utc)
            }),
            ..Default::default()
        }
    }

    fn path(id: &str) -> LaunchPath {
        LaunchPath {
            id: id.to_string(),
            name: None,
        }
    }

    #[test]
    fn test_explicit_artifact_id() {
        let artifacts = vec![artifact("pa-1", None, None), artifact("pa-2", None, None)];
        let selected = resolve_provisioning_artifact("prod", &artifacts, Some("pa-1")).unwrap();
        assert_eq!(selected.id, "pa-1");

        let missing = resolve_provisioning_artifact("prod", &artifacts, Some("pa-9"));
        assert!(matches!(
            missing,
            Err(ProductResolutionError::ArtifactNotFound { artifact_id, .. }) if artifact_id == "pa-9"
        ));
    }

    #[test]
    fn test_default_guidance_wins_over_recency() {
        let artifacts = vec![
            artifact("pa-a", None, Some("2022-02-16T16:56:31-05:00")),
            artifact("pa-b", Some("DEFAULT"), None),
        ];
        let selected = resolve_provisioning_artifact("prod", &artifacts, None).unwrap();
        assert_eq!(selected.id, "pa-b");
    }

    #[test]
    fn test_latest_artifact_wins() {
        let artifacts = vec![
            artifact("pa-b", None, Some("2022-02-16T16:56:31-05:00")),
            artifact("pa-a", None, Some("2022-02-15T16:56:31-05:00")),
        ];
        let selected = resolve_provisioning_artifact("prod", &artifacts, None).unwrap();
        assert_eq!(selected.id, "pa-b");
    }

    #[test]
    fn test_equal_times_pick_last() {
        let artifacts = vec![
            artifact("pa-first", None, Some("2022-02-15T00:00:00Z")),
            artifact("pa-last", None, Some("2022-02-15T00:00:00Z")),
        ];
        let selected = resolve_provisioning_artifact("prod", &artifacts, None).unwrap();
        assert_eq!(selected.id, "pa-last");
    }

    #[test]
    fn test_multiple_defaults_fall_back_to_recency() {
        let artifacts = vec![
            artifact("pa-a", Some("DEFAULT"), Some("2022-02-16T00:00:00Z")),
            artifact("pa-b", Some("DEFAULT"), Some("2022-02-15T00:00:00Z")),
        ];
        let selected = resolve_provisioning_artifact("prod", &artifacts, None).unwrap();
        assert_eq!(selected.id, "pa-a");
    }

    #[test]
    fn test_missing_created_time_is_ambiguous() {
        let artifacts = vec![
            artifact("pa-a", None, Some("2022-02-16T00:00:00Z")),
            artifact("pa-b", None, None),
        ];
        let result = resolve_provisioning_artifact("prod", &artifacts, None);
        let err = result.unwrap_err();
        assert!(matches!(err, ProductResolutionError::AmbiguousArtifact { .. }));
        assert!(err
            .to_string()
            .contains("Unable to resolve default or latest provisioning artifact"));
    }

    #[test]
    fn test_launch_path_resolution() {
        let single = vec![path("lp-1")];
        assert_eq!(resolve_launch_path("prod", &single, None).unwrap().id, "lp-1");

        let multiple = vec![path("lp-1"), path("lp-2")];
        assert_eq!(
            resolve_launch_path("prod", &multiple, Some("lp-2")).unwrap().id,
            "lp-2"
        );

        let err = resolve_launch_path("prod", &multiple, None).unwrap_err();
        assert!(err
            .to_string()
            .contains("Unable to resolve between multiple launch paths."));

        assert!(matches!(
            resolve_launch_path("prod", &multiple, Some("lp-9")),
            Err(ProductResolutionError::LaunchPathNotFound { .. })
        ));
    }
}
