//! In-memory registries
//!
//! Deterministic stand-ins for the remote APIs. Listing honours the same
//! prefix, category and visibility filters as the real registry and pages
//! results with opaque continuation tokens; call counters and failure
//! injection make pipeline behaviour observable in tests.

use async_trait::async_trait;
use cdk_import_common::{
    DescribeProductOutput, DescribeTypeOutput, ListTypesPage, ListTypesRequest, ProductPage,
    ProductViewSummary, ProvisioningParameters, ProvisioningParametersRequest, RegistryError,
    SearchProductsRequest, TypeCategory, TypeSummary, Visibility,
};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::client::{CatalogClient, TypeRegistryClient};

const DEFAULT_PAGE_SIZE: usize = 10;

fn page_token(offset: usize) -> String {
    format!("page-{}", offset)
}

fn page_offset(operation: &str, token: Option<&str>) -> Result<usize, RegistryError> {
    match token {
        None => Ok(0),
        Some(token) => token
            .strip_prefix("page-")
            .and_then(|offset| offset.parse().ok())
            .ok_or_else(|| RegistryError::Status {
                operation: operation.to_string(),
                status: 400,
                body: format!("Invalid pagination token {}", token),
            }),
    }
}

/// Slice one page out of `items`, returning the next token when more remain
fn paginate<T: Clone>(items: &[T], offset: usize, page_size: usize) -> (Vec<T>, Option<String>) {
    let end = (offset + page_size).min(items.len());
    let page = items.get(offset..end).map(<[T]>::to_vec).unwrap_or_default();
    let next = (end < items.len()).then(|| page_token(end));
    (page, next)
}

#[derive(Debug, Clone)]
struct RegisteredType {
    summary: TypeSummary,
    category: TypeCategory,
    visibility: Visibility,
    description: DescribeTypeOutput,
}

/// In-memory type registry
#[derive(Debug)]
pub struct InMemoryTypeRegistry {
    types: Vec<RegisteredType>,
    page_size: usize,
    list_calls: AtomicUsize,
    describe_calls: AtomicUsize,
}

impl Default for InMemoryTypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryTypeRegistry {
    pub fn new() -> Self {
        Self {
            types: Vec::new(),
            page_size: DEFAULT_PAGE_SIZE,
            list_calls: AtomicUsize::new(0),
            describe_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Register a public type with a schema and optional source URL
    pub fn with_type(
        self,
        type_name: &str,
        arn: &str,
        schema: Option<&str>,
        source_url: Option<&str>,
    ) -> Self {
        self.with_described_type(
            Visibility::Public,
            DescribeTypeOutput {
                arn: arn.to_string(),
                type_name: Some(type_name.to_string()),
                schema: schema.map(str::to_string),
                source_url: source_url.map(str::to_string),
            },
        )
    }

    /// Register a type with an explicit visibility and raw description
    pub fn with_described_type(
        mut self,
        visibility: Visibility,
        description: DescribeTypeOutput,
    ) -> Self {
        let type_name = description.type_name.clone().unwrap_or_default();
        self.types.push(RegisteredType {
            summary: TypeSummary {
                type_name: type_name.clone(),
                type_arn: description.arn.clone(),
                description: None,
            },
            category: TypeCategory::from_type_name(&type_name),
            visibility,
            description,
        });
        self
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn describe_calls(&self) -> usize {
        self.describe_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TypeRegistryClient for InMemoryTypeRegistry {
    async fn list_types(&self, request: &ListTypesRequest) -> Result<ListTypesPage, RegistryError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);

        let matching: Vec<TypeSummary> = self
            .types
            .iter()
            .filter(|t| {
                t.summary.type_name.starts_with(&request.type_name_prefix)
                    && t.category == request.category
                    && t.visibility == request.visibility
            })
            .map(|t| t.summary.clone())
            .collect();

        let offset = page_offset("ListTypes", request.next_token.as_deref())?;
        let (type_summaries, next_token) = paginate(&matching, offset, self.page_size);
        Ok(ListTypesPage {
            type_summaries,
            next_token,
        })
    }

    async fn describe_type(&self, identifier: &str) -> Result<DescribeTypeOutput, RegistryError> {
        self.describe_calls.fetch_add(1, Ordering::SeqCst);

        self.types
            .iter()
            .find(|t| t.description.arn == identifier)
            .map(|t| t.description.clone())
            .ok_or_else(|| RegistryError::Status {
                operation: "DescribeType".to_string(),
                status: 404,
                body: format!("TypeNotFoundException: {}", identifier),
            })
    }
}

#[derive(Debug, Clone)]
struct CatalogProduct {
    summary: ProductViewSummary,
    source_product_id: Option<String>,
    description: DescribeProductOutput,
    parameters: ProvisioningParameters,
}

/// In-memory product catalog
#[derive(Debug)]
pub struct InMemoryCatalog {
    products: Vec<CatalogProduct>,
    failing: HashSet<String>,
    page_size: usize,
    parameter_requests: Mutex<Vec<ProvisioningParametersRequest>>,
}

impl Default for InMemoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self {
            products: Vec::new(),
            failing: HashSet::new(),
            page_size: DEFAULT_PAGE_SIZE,
            parameter_requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Register a product; its summary is taken from the description when
    /// present, otherwise synthesised from the id
    pub fn with_product(
        mut self,
        product_id: &str,
        description: DescribeProductOutput,
        parameters: ProvisioningParameters,
    ) -> Self {
        let summary = description
            .product_view_summary
            .clone()
            .unwrap_or_else(|| ProductViewSummary {
                product_id: product_id.to_string(),
                ..Default::default()
            });
        self.products.push(CatalogProduct {
            summary,
            source_product_id: None,
            description,
            parameters,
        });
        self
    }

    /// Tag the most recently added product with a source product id
    pub fn with_source_product_id(mut self, source_product_id: &str) -> Self {
        if let Some(product) = self.products.last_mut() {
            product.source_product_id = Some(source_product_id.to_string());
        }
        self
    }

    /// Make `describe_product` fail for the given product
    pub fn failing_product(mut self, product_id: &str) -> Self {
        self.failing.insert(product_id.to_string());
        self
    }

    /// Every provisioning-parameters request received so far
    pub fn parameter_requests(&self) -> Vec<ProvisioningParametersRequest> {
        self.parameter_requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl CatalogClient for InMemoryCatalog {
    async fn search_products(
        &self,
        request: &SearchProductsRequest,
    ) -> Result<ProductPage, RegistryError> {
        let matching: Vec<ProductViewSummary> = self
            .products
            .iter()
            .filter(|p| match &request.source_product_id {
                Some(source) => p.source_product_id.as_ref() == Some(source),
                None => true,
            })
            .map(|p| p.summary.clone())
            .collect();

        let offset = page_offset("SearchProducts", request.page_token.as_deref())?;
        let (product_view_summaries, next_page_token) =
            paginate(&matching, offset, self.page_size);
        Ok(ProductPage {
            product_view_summaries,
            next_page_token,
        })
    }

    async fn describe_product(
        &self,
        product_id: &str,
    ) -> Result<DescribeProductOutput, RegistryError> {
        if self.failing.contains(product_id) {
            return Err(RegistryError::Status {
                operation: "DescribeProduct".to_string(),
                status: 500,
                body: format!("injected failure for {}", product_id),
            });
        }

        self.products
            .iter()
            .find(|p| p.summary.product_id == product_id)
            .map(|p| p.description.clone())
            .ok_or_else(|| RegistryError::Status {
                operation: "DescribeProduct".to_string(),
                status: 400,
                body: format!("ResourceNotFoundException: {}", product_id),
            })
    }

    async fn describe_provisioning_parameters(
        &self,
        request: &ProvisioningParametersRequest,
    ) -> Result<ProvisioningParameters, RegistryError> {
        if let Ok(mut requests) = self.parameter_requests.lock() {
            requests.push(request.clone());
        }

        self.products
            .iter()
            .find(|p| p.summary.product_id == request.product_id)
            .map(|p| p.parameters.clone())
            .ok_or_else(|| RegistryError::Status {
                operation: "DescribeProvisioningParameters".to_string(),
                status: 400,
                body: format!("ResourceNotFoundException: {}", request.product_id),
            })
    }
}
