//! Registry and catalog data model
//!
//! Response types mirror the JSON wire shape of the remote APIs (PascalCase
//! keys); request types are plain Rust structs shaped by the clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Guidance value marking the preferred provisioning artifact of a product
pub const DEFAULT_GUIDANCE: &str = "DEFAULT";

/// Category of a registry type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeCategory {
    Resource,
    Module,
}

impl TypeCategory {
    /// Module types carry the literal `MODULE` suffix in their name
    pub fn from_type_name(name: &str) -> Self {
        if name.ends_with("MODULE") {
            TypeCategory::Module
        } else {
            TypeCategory::Resource
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TypeCategory::Resource => "RESOURCE",
            TypeCategory::Module => "MODULE",
        }
    }
}

impl fmt::Display for TypeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visibility scope of a registry type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Visibility {
    Public,
    Private,
}

impl Visibility {
    pub fn from_private_flag(private: bool) -> Self {
        if private {
            Visibility::Private
        } else {
            Visibility::Public
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "PUBLIC",
            Visibility::Private => "PRIVATE",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One page request against the type listing endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListTypesRequest {
    pub type_name_prefix: String,
    pub category: TypeCategory,
    pub visibility: Visibility,
    pub next_token: Option<String>,
}

/// Registry entry as returned by the listing endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TypeSummary {
    pub type_name: String,
    pub type_arn: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One page of listed types
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListTypesPage {
    #[serde(default)]
    pub type_summaries: Vec<TypeSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

/// Full description of a registry type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeTypeOutput {
    pub arn: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

/// A resolved registry type, ready for generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TypeDescriptor {
    /// Looks like `Vendor::Service::Resource`
    pub type_name: String,

    /// Source URL of the type, or its ARN when the registry has none
    pub source_url: String,

    /// JSON-Schema document of the type, as text
    pub schema: String,
}

/// One page request against the product search endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchProductsRequest {
    pub source_product_id: Option<String>,
    pub page_token: Option<String>,
}

/// Catalog product summary
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProductViewSummary {
    pub product_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
}

/// One page of searched products
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProductPage {
    #[serde(default)]
    pub product_view_summaries: Vec<ProductViewSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

/// A versioned template behind a catalog product
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProvisioningArtifact {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guidance: Option<String>,
    #[serde(
        default,
        deserialize_with = "timestamp::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_time: Option<DateTime<Utc>>,
}

impl ProvisioningArtifact {
    pub fn is_default(&self) -> bool {
        self.guidance.as_deref() == Some(DEFAULT_GUIDANCE)
    }
}

/// A permission-scoped route to provision a product
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LaunchPath {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Raw product description; every element may be absent on the wire
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeProductOutput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_view_summary: Option<ProductViewSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisioning_artifacts: Option<Vec<ProvisioningArtifact>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub launch_paths: Option<Vec<LaunchPath>>,
}

/// Request for the provisioning parameters of a resolved product triple
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisioningParametersRequest {
    pub product_id: String,
    pub provisioning_artifact_id: String,
    pub path_id: String,
}

/// Input parameter of a provisioning artifact
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProvisioningParameter {
    pub parameter_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter_type: Option<String>,
    #[serde(default)]
    pub is_no_echo: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Output of a provisioning artifact
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProvisioningArtifactOutput {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Inputs and outputs of a provisioning artifact
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProvisioningParameters {
    #[serde(default)]
    pub provisioning_artifact_parameters: Vec<ProvisioningParameter>,
    #[serde(default, alias = "ProvisioningArtifactOutputKeys")]
    pub provisioning_artifact_outputs: Vec<ProvisioningArtifactOutput>,
}

/// Everything needed to generate a construct provisioning a product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDataAggregate {
    pub product: ProductViewSummary,
    pub provisioning_artifact: ProvisioningArtifact,
    pub launch_path: LaunchPath,
    #[serde(default, alias = "params")]
    pub provisioning_parameters: ProvisioningParameters,
}

/// Accepts both RFC 3339 text and epoch seconds, the two shapes the
/// catalog API emits for timestamps.
mod timestamp {
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTimestamp {
        Text(String),
        Epoch(f64),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<RawTimestamp>::deserialize(deserializer)? {
            None => Ok(None),
            Some(RawTimestamp::Text(text)) => DateTime::parse_from_rfc3339(&text)
                .map(|dt| Some(dt.with_timezone(&Utc)))
                .map_err(de::Error::custom),
            Some(RawTimestamp::Epoch(seconds)) => {
                DateTime::<Utc>::from_timestamp_millis((seconds * 1000.0).round() as i64)
                    .map(Some)
                    .ok_or_else(|| de::Error::custom("timestamp out of range"))
            }
        }
    }
}
