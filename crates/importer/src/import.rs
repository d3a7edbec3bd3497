//! Type and product import pipelines

use cdk_import_common::{Result, SchemaDocument};
use cdk_import_generator::naming::kebab_case;
use cdk_import_generator::{generate, generate_product};
use cdk_import_registry::{
    describe_product_aggregate, fetch_available_products, resolve_type, CatalogClient,
    ProductAggregateOptions, ResolveOptions, TypeRegistryClient,
};
use futures::future::join_all;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, warn};

/// File every import writes its generated source to
pub const INDEX_FILE: &str = "index.ts";

/// Options for importing a registry type
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    pub outdir: PathBuf,
    pub private: bool,
}

/// Options for importing one catalog product
#[derive(Debug, Clone, Default)]
pub struct ProductImportOptions {
    pub outdir: PathBuf,
    pub product: ProductAggregateOptions,
}

/// Split `NAME[@VERSION]`
pub fn split_type_reference(reference: &str) -> (&str, Option<&str>) {
    match reference.split_once('@') {
        Some((name, version)) if !version.is_empty() => (name, Some(version)),
        Some((name, _)) => (name, None),
        None => (reference, None),
    }
}

async fn write_source(dir: &Path, source: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir).await?;
    let path = dir.join(INDEX_FILE);
    fs::write(&path, source).await?;
    Ok(path)
}

/// Resolve a type, generate its construct into `<outdir>/index.ts` and
/// return the resolved type name
pub async fn import_resource_type<C: TypeRegistryClient + ?Sized>(
    client: &C,
    name: &str,
    version: Option<&str>,
    options: &ImportOptions,
) -> Result<String> {
    let resolve_options = ResolveOptions {
        private: options.private,
        version: version.map(str::to_string),
    };
    let descriptor = resolve_type(client, name, &resolve_options).await?;
    let schema = SchemaDocument::parse(&descriptor.schema)?;
    let source = generate(&descriptor.type_name, &descriptor, &schema)?;

    let path = write_source(&options.outdir, &source).await?;
    info!(type_name = %descriptor.type_name, path = %path.display(), "Generated construct");

    Ok(descriptor.type_name)
}

/// Aggregate a product, generate its construct into
/// `<outdir>/<kebab-class>/index.ts` and return the class name
pub async fn import_product<C: CatalogClient + ?Sized>(
    client: &C,
    options: &ProductImportOptions,
) -> Result<String> {
    let aggregate = describe_product_aggregate(client, &options.product).await?;
    let (class_name, source) = generate_product(&aggregate)?;

    let path = write_source(&options.outdir.join(kebab_case(&class_name)), &source).await?;
    info!(
        product_id = %options.product.product_id,
        class_name = %class_name,
        path = %path.display(),
        "Generated product construct"
    );

    Ok(class_name)
}

/// Import every available product concurrently
///
/// Products that fail are logged and skipped; only a failed product listing
/// fails the batch.
pub async fn import_products<C: CatalogClient + ?Sized>(
    client: &C,
    outdir: &Path,
) -> Result<Vec<String>> {
    let products = fetch_available_products(client, None).await?;
    info!(count = products.len(), "Importing available products");

    let imports = products.iter().map(|product| async move {
        let options = ProductImportOptions {
            outdir: outdir.to_path_buf(),
            product: ProductAggregateOptions::new(&product.product_id),
        };
        (product.product_id.as_str(), import_product(client, &options).await)
    });

    let mut imported = Vec::new();
    for (product_id, result) in join_all(imports).await {
        match result {
            Ok(class_name) => imported.push(class_name),
            Err(e) => warn!(
                product_id,
                error = %e,
                "Skipping product; import it individually with --product-id, --provisioning-artifact-id and --path-id"
            ),
        }
    }

    Ok(imported)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_type_reference() {
        assert_eq!(
            split_type_reference("AWSQS::EKS::Cluster@1.2.0"),
            ("AWSQS::EKS::Cluster", Some("1.2.0"))
        );
        assert_eq!(
            split_type_reference("AWSQS::EKS::Cluster"),
            ("AWSQS::EKS::Cluster", None)
        );
        assert_eq!(
            split_type_reference("AWSQS::EKS::Cluster@"),
            ("AWSQS::EKS::Cluster", None)
        );
    }
}
