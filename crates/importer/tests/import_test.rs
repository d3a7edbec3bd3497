//! Integration tests for the import pipelines

use cdk_import_common::{
    DescribeProductOutput, ImportError, LaunchPath, ProductViewSummary, ProvisioningArtifact,
    ProvisioningParameter, ProvisioningParameters,
};
use cdk_import_importer::{
    import_product, import_products, import_resource_type, ImportOptions, ProductImportOptions,
};
use cdk_import_registry::memory::{InMemoryCatalog, InMemoryTypeRegistry};
use cdk_import_registry::ProductAggregateOptions;
use tempfile::TempDir;

const TYPE_ARN: &str = "arn:aws:cloudformation:us-east-1::type/resource/Acme-Storage-Bucket";
const SCHEMA: &str = r#"{
    "typeName": "Acme::Storage::Bucket",
    "properties": {
        "Name": {"type": "string"},
        "Arn": {"type": "string"}
    },
    "required": ["Name"],
    "readOnlyProperties": ["/properties/Arn"]
}"#;

fn product(product_id: &str, name: &str) -> DescribeProductOutput {
    DescribeProductOutput {
        product_view_summary: Some(ProductViewSummary {
            product_id: product_id.to_string(),
            name: Some(name.to_string()),
            ..Default::default()
        }),
        provisioning_artifacts: Some(vec![ProvisioningArtifact {
            id: format!("pa-{}", product_id),
            guidance: Some("DEFAULT".to_string()),
            ..Default::default()
        }]),
        launch_paths: Some(vec![LaunchPath {
            id: format!("lp-{}", product_id),
            name: None,
        }]),
    }
}

fn parameters() -> ProvisioningParameters {
    ProvisioningParameters {
        provisioning_artifact_parameters: vec![ProvisioningParameter {
            parameter_key: "Size".to_string(),
            default_value: Some("small".to_string()),
            ..Default::default()
        }],
        provisioning_artifact_outputs: Vec::new(),
    }
}

#[tokio::test]
async fn test_import_resource_type_writes_index() {
    let registry = InMemoryTypeRegistry::new().with_type(
        "Acme::Storage::Bucket",
        TYPE_ARN,
        Some(SCHEMA),
        Some("https://github.com/acme/bucket"),
    );
    let workdir = TempDir::new().unwrap();
    let options = ImportOptions {
        outdir: workdir.path().to_path_buf(),
        private: false,
    };

    let type_name = import_resource_type(&registry, "Acme::Storage::Bucket", Some("1.0.0"), &options)
        .await
        .unwrap();

    assert_eq!(type_name, "Acme::Storage::Bucket");
    let source = std::fs::read_to_string(workdir.path().join("index.ts")).unwrap();
    assert!(source.contains("export class CfnBucket extends cdk.CfnResource {"));
    assert!(source.contains("this.attrArn = cdk.Token.asString(this.getAtt('Arn'));"));
}

#[tokio::test]
async fn test_import_by_arn_returns_registry_type_name() {
    let registry =
        InMemoryTypeRegistry::new().with_type("Acme::Storage::Bucket", TYPE_ARN, Some(SCHEMA), None);
    let workdir = TempDir::new().unwrap();
    let options = ImportOptions {
        outdir: workdir.path().to_path_buf(),
        private: false,
    };

    let type_name = import_resource_type(&registry, TYPE_ARN, None, &options)
        .await
        .unwrap();

    assert_eq!(type_name, "Acme::Storage::Bucket");
    let source = std::fs::read_to_string(workdir.path().join("index.ts")).unwrap();
    assert!(source.contains(&format!("@link {}", TYPE_ARN)));
}

#[tokio::test]
async fn test_import_rejects_invalid_schema() {
    let registry = InMemoryTypeRegistry::new().with_type(
        "Acme::Storage::Bucket",
        TYPE_ARN,
        Some(r#"{"properties": {}, "required": ["Name"]}"#),
        None,
    );
    let workdir = TempDir::new().unwrap();

    let result = import_resource_type(
        &registry,
        "Acme::Storage::Bucket",
        None,
        &ImportOptions {
            outdir: workdir.path().to_path_buf(),
            private: false,
        },
    )
    .await;

    assert!(matches!(result, Err(ImportError::Schema(_))));
    assert!(!workdir.path().join("index.ts").exists());
}

#[tokio::test]
async fn test_import_product_writes_class_directory() {
    let catalog =
        InMemoryCatalog::new().with_product("prod-1", product("prod-1", "Shared Bucket"), parameters());
    let workdir = TempDir::new().unwrap();

    let class_name = import_product(
        &catalog,
        &ProductImportOptions {
            outdir: workdir.path().to_path_buf(),
            product: ProductAggregateOptions::new("prod-1"),
        },
    )
    .await
    .unwrap();

    assert_eq!(class_name, "SharedBucket");
    let source =
        std::fs::read_to_string(workdir.path().join("shared-bucket").join("index.ts")).unwrap();
    assert!(source.contains("PROVISIONING_ARTIFACT_ID = \"pa-prod-1\";"));
    assert!(source.contains("PATH_ID = \"lp-prod-1\";"));
}

#[tokio::test]
async fn test_import_products_skips_failures() {
    let catalog = InMemoryCatalog::new()
        .with_page_size(2)
        .with_product("prod-1", product("prod-1", "First Product"), parameters())
        .with_product("prod-2", product("prod-2", "Broken Product"), parameters())
        .with_product("prod-3", product("prod-3", "Third Product"), parameters())
        .failing_product("prod-2");
    let workdir = TempDir::new().unwrap();

    let mut imported = import_products(&catalog, workdir.path()).await.unwrap();
    imported.sort();

    assert_eq!(imported, vec!["FirstProduct", "ThirdProduct"]);
    assert!(workdir.path().join("first-product").join("index.ts").exists());
    assert!(workdir.path().join("third-product").join("index.ts").exists());
    assert!(!workdir.path().join("broken-product").exists());
}

#[tokio::test]
async fn test_import_products_with_empty_catalog() {
    let catalog = InMemoryCatalog::new();
    let workdir = TempDir::new().unwrap();

    let imported = import_products(&catalog, workdir.path()).await.unwrap();
    assert!(imported.is_empty());
}
