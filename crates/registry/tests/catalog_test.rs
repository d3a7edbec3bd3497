//! Product aggregation against the in-memory catalog

use cdk_import_common::{
    DescribeProductOutput, LaunchPath, ProductResolutionError, ProductViewSummary,
    ProvisioningArtifact, ProvisioningArtifactOutput, ProvisioningParameter,
    ProvisioningParameters, ProvisioningParametersRequest,
};
use cdk_import_registry::memory::InMemoryCatalog;
use cdk_import_registry::{describe_product_aggregate, fetch_available_products, ProductAggregateOptions};
use chrono::{DateTime, Utc};

fn summary(product_id: &str, name: &str) -> ProductViewSummary {
    ProductViewSummary {
        product_id: product_id.to_string(),
        id: Some(format!("prodview-{}", product_id)),
        name: Some(name.to_string()),
        ..Default::default()
    }
}

fn artifact(id: &str, guidance: Option<&str>, created: &str) -> ProvisioningArtifact {
    ProvisioningArtifact {
        id: id.to_string(),
        name: Some(format!("{} name", id)),
        guidance: guidance.map(str::to_string),
        created_time: Some(
            DateTime::parse_from_rfc3339(created)
                .unwrap()
                .with_timezone(&Utc),
        ),
        ..Default::default()
    }
}

fn launch_path(id: &str) -> LaunchPath {
    LaunchPath {
        id: id.to_string(),
        name: Some(format!("{} portfolio", id)),
    }
}

fn parameters() -> ProvisioningParameters {
    ProvisioningParameters {
        provisioning_artifact_parameters: vec![ProvisioningParameter {
            parameter_key: "BucketName".to_string(),
            default_value: Some("my-bucket".to_string()),
            parameter_type: Some("String".to_string()),
            ..Default::default()
        }],
        provisioning_artifact_outputs: vec![ProvisioningArtifactOutput {
            key: "BucketArn".to_string(),
            description: None,
        }],
    }
}

fn product(
    product_id: &str,
    artifacts: Vec<ProvisioningArtifact>,
    paths: Vec<LaunchPath>,
) -> DescribeProductOutput {
    DescribeProductOutput {
        product_view_summary: Some(summary(product_id, "Bucket Product")),
        provisioning_artifacts: Some(artifacts),
        launch_paths: Some(paths),
    }
}

#[tokio::test]
async fn test_default_artifact_and_single_launch_path() {
    let catalog = InMemoryCatalog::new().with_product(
        "prod-1",
        product(
            "prod-1",
            vec![
                artifact("pa-new", None, "2022-02-16T16:56:31-05:00"),
                artifact("pa-default", Some("DEFAULT"), "2022-02-15T16:56:31-05:00"),
            ],
            vec![launch_path("lp-1")],
        ),
        parameters(),
    );

    let aggregate = describe_product_aggregate(&catalog, &ProductAggregateOptions::new("prod-1"))
        .await
        .unwrap();

    assert_eq!(aggregate.product.product_id, "prod-1");
    assert_eq!(aggregate.provisioning_artifact.id, "pa-default");
    assert_eq!(aggregate.launch_path.id, "lp-1");
    assert_eq!(
        aggregate.provisioning_parameters.provisioning_artifact_parameters[0].parameter_key,
        "BucketName"
    );
}

#[tokio::test]
async fn test_latest_artifact_without_default() {
    let catalog = InMemoryCatalog::new().with_product(
        "prod-1",
        product(
            "prod-1",
            vec![
                artifact("pa-old", None, "2022-02-15T16:56:31-05:00"),
                artifact("pa-new", None, "2022-02-16T16:56:31-05:00"),
            ],
            vec![launch_path("lp-1")],
        ),
        parameters(),
    );

    let aggregate = describe_product_aggregate(&catalog, &ProductAggregateOptions::new("prod-1"))
        .await
        .unwrap();

    assert_eq!(aggregate.provisioning_artifact.id, "pa-new");
}

#[tokio::test]
async fn test_parameters_fetched_with_resolved_ids() {
    let catalog = InMemoryCatalog::new().with_product(
        "prod-1",
        product(
            "prod-1",
            vec![
                artifact("pa-1", None, "2022-02-15T16:56:31-05:00"),
                artifact("pa-2", None, "2022-02-16T16:56:31-05:00"),
            ],
            vec![launch_path("lp-1"), launch_path("lp-2")],
        ),
        parameters(),
    );

    let options = ProductAggregateOptions {
        product_id: "prod-1".to_string(),
        provisioning_artifact_id: Some("pa-1".to_string()),
        launch_path_id: Some("lp-2".to_string()),
    };
    let aggregate = describe_product_aggregate(&catalog, &options).await.unwrap();

    assert_eq!(aggregate.provisioning_artifact.id, "pa-1");
    assert_eq!(aggregate.launch_path.id, "lp-2");
    assert_eq!(
        catalog.parameter_requests(),
        vec![ProvisioningParametersRequest {
            product_id: "prod-1".to_string(),
            provisioning_artifact_id: "pa-1".to_string(),
            path_id: "lp-2".to_string(),
        }]
    );
}

#[tokio::test]
async fn test_multiple_launch_paths_need_explicit_id() {
    let catalog = InMemoryCatalog::new().with_product(
        "prod-1",
        product(
            "prod-1",
            vec![artifact("pa-1", Some("DEFAULT"), "2022-02-15T16:56:31-05:00")],
            vec![launch_path("lp-1"), launch_path("lp-2")],
        ),
        parameters(),
    );

    let err = describe_product_aggregate(&catalog, &ProductAggregateOptions::new("prod-1"))
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Unable to resolve between multiple launch paths. Product prod-1 has 2 launch paths"
    );
    assert!(catalog.parameter_requests().is_empty());
}

#[tokio::test]
async fn test_unknown_explicit_ids() {
    let catalog = InMemoryCatalog::new().with_product(
        "prod-1",
        product(
            "prod-1",
            vec![artifact("pa-1", None, "2022-02-15T16:56:31-05:00")],
            vec![launch_path("lp-1")],
        ),
        parameters(),
    );

    let options = ProductAggregateOptions {
        provisioning_artifact_id: Some("pa-missing".to_string()),
        ..ProductAggregateOptions::new("prod-1")
    };
    let err = describe_product_aggregate(&catalog, &options).await.unwrap_err();
    assert!(matches!(err, ProductResolutionError::ArtifactNotFound { .. }));

    let options = ProductAggregateOptions {
        launch_path_id: Some("lp-missing".to_string()),
        ..ProductAggregateOptions::new("prod-1")
    };
    let err = describe_product_aggregate(&catalog, &options).await.unwrap_err();
    assert!(matches!(err, ProductResolutionError::LaunchPathNotFound { .. }));
}

#[tokio::test]
async fn test_incomplete_product_is_rejected() {
    let catalog = InMemoryCatalog::new()
        .with_product(
            "no-paths",
            DescribeProductOutput {
                product_view_summary: Some(summary("no-paths", "No Paths")),
                provisioning_artifacts: Some(vec![artifact(
                    "pa-1",
                    None,
                    "2022-02-15T16:56:31-05:00",
                )]),
                launch_paths: None,
            },
            parameters(),
        )
        .with_product(
            "no-artifacts",
            DescribeProductOutput {
                product_view_summary: Some(summary("no-artifacts", "No Artifacts")),
                provisioning_artifacts: Some(Vec::new()),
                launch_paths: Some(vec![launch_path("lp-1")]),
            },
            parameters(),
        );

    let err = describe_product_aggregate(&catalog, &ProductAggregateOptions::new("no-paths"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ProductResolutionError::ProductValidation { missing: "launch paths", .. }
    ));

    let err = describe_product_aggregate(&catalog, &ProductAggregateOptions::new("no-artifacts"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ProductResolutionError::ProductValidation { missing: "provisioning artifacts", .. }
    ));
}

#[tokio::test]
async fn test_registry_failure_propagates() {
    let catalog = InMemoryCatalog::new()
        .with_product(
            "prod-1",
            product(
                "prod-1",
                vec![artifact("pa-1", None, "2022-02-15T16:56:31-05:00")],
                vec![launch_path("lp-1")],
            ),
            parameters(),
        )
        .failing_product("prod-1");

    let err = describe_product_aggregate(&catalog, &ProductAggregateOptions::new("prod-1"))
        .await
        .unwrap_err();
    assert!(matches!(err, ProductResolutionError::Registry(_)));
}

#[tokio::test]
async fn test_fetch_available_products_pages() {
    let catalog = InMemoryCatalog::new()
        .with_page_size(2)
        .with_product("prod-1", product("prod-1", vec![], vec![]), parameters())
        .with_product("prod-2", product("prod-2", vec![], vec![]), parameters())
        .with_source_product_id("source-1")
        .with_product("prod-3", product("prod-3", vec![], vec![]), parameters());

    let products = fetch_available_products(&catalog, None).await.unwrap();
    let ids: Vec<&str> = products.iter().map(|p| p.product_id.as_str()).collect();
    assert_eq!(ids, vec!["prod-1", "prod-2", "prod-3"]);

    let copied = fetch_available_products(&catalog, Some("source-1"))
        .await
        .unwrap();
    assert_eq!(copied.len(), 1);
    assert_eq!(copied[0].product_id, "prod-2");
}
