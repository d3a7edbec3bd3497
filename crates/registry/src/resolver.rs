//! Type resolution against the type registry

use cdk_import_common::{
    ListTypesRequest, ResolutionError, TypeCategory, TypeDescriptor, TypeSummary, Visibility,
};
use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, info};

use crate::client::TypeRegistryClient;

const ARN_PATTERN: &str = r"^arn:aws[a-z-]*:cloudformation:[a-z0-9-]*:[0-9]*:type/[a-z]+/.+$";

fn arn_regex() -> &'static Regex {
    static ARN: OnceLock<Regex> = OnceLock::new();
    ARN.get_or_init(|| Regex::new(ARN_PATTERN).expect("ARN pattern is a valid regex"))
}

/// Whether `name` is a registry type ARN rather than a type name
pub fn is_arn(name: &str) -> bool {
    arn_regex().is_match(name)
}

/// Options for a single type resolution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Look up types registered in the caller's account instead of public ones
    pub private: bool,

    /// Requested version; accepted but not pinned
    pub version: Option<String>,
}

/// Resolves a type name or ARN into exactly one described type
pub struct TypeResolver<'a, C: TypeRegistryClient + ?Sized> {
    client: &'a C,
}

impl<'a, C: TypeRegistryClient + ?Sized> TypeResolver<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// Resolve `name` into a [`TypeDescriptor`]
    ///
    /// ARNs are described directly. Names are listed under the category
    /// implied by their suffix and the requested visibility; exactly one
    /// listed entry must remain, even when one of several candidates matches
    /// the name exactly.
    pub async fn resolve(
        &self,
        name: &str,
        options: &ResolveOptions,
    ) -> Result<TypeDescriptor, ResolutionError> {
        if let Some(version) = &options.version {
            debug!(name, version = %version, "Version pinning is not supported, using the default version");
        }

        let identifier = if is_arn(name) {
            debug!(arn = name, "Resolving type by ARN");
            name.to_string()
        } else {
            let candidates = self.list_candidates(name, options.private).await?;
            match candidates.as_slice() {
                [single] => single.type_arn.clone(),
                _ => {
                    return Err(ResolutionError::AmbiguousType {
                        name: name.to_string(),
                        matches: candidates.len(),
                    })
                }
            }
        };

        self.describe(&identifier).await
    }

    /// Page through the listing endpoint until no continuation token remains
    async fn list_candidates(
        &self,
        name: &str,
        private: bool,
    ) -> Result<Vec<TypeSummary>, ResolutionError> {
        let mut request = ListTypesRequest {
            type_name_prefix: name.to_string(),
            category: TypeCategory::from_type_name(name),
            visibility: Visibility::from_private_flag(private),
            next_token: None,
        };

        let mut candidates = Vec::new();
        loop {
            let page = self.client.list_types(&request).await?;
            debug!(
                prefix = name,
                category = %request.category,
                visibility = %request.visibility,
                count = page.type_summaries.len(),
                "Listed registry page"
            );
            candidates.extend(page.type_summaries);

            match page.next_token {
                Some(token) => request.next_token = Some(token),
                None => break,
            }
        }

        Ok(candidates)
    }

    async fn describe(&self, identifier: &str) -> Result<TypeDescriptor, ResolutionError> {
        let described = self.client.describe_type(identifier).await?;

        let schema = described
            .schema
            .filter(|schema| !schema.is_empty())
            .ok_or_else(|| ResolutionError::IncompleteType {
                identifier: identifier.to_string(),
                missing: "schema",
            })?;
        let type_name = described
            .type_name
            .filter(|type_name| !type_name.is_empty())
            .ok_or_else(|| ResolutionError::IncompleteType {
                identifier: identifier.to_string(),
                missing: "type name",
            })?;
        let source_url = described
            .source_url
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| identifier.to_string());

        info!(type_name = %type_name, source_url = %source_url, "Resolved registry type");

        Ok(TypeDescriptor {
            type_name,
            source_url,
            schema,
        })
    }
}

/// Resolve a type (convenience function)
pub async fn resolve_type<C: TypeRegistryClient + ?Sized>(
    client: &C,
    name: &str,
    options: &ResolveOptions,
) -> Result<TypeDescriptor, ResolutionError> {
    TypeResolver::new(client).resolve(name, options).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockTypeRegistryClient;
    use cdk_import_common::{DescribeTypeOutput, ListTypesPage};

    const TYPE_ARN: &str = "arn:aws:cloudformation:eu-central-1::type/resource/Test-Resource-Type";

    #[test]
    fn test_is_arn() {
        assert!(is_arn(TYPE_ARN));
        assert!(is_arn(
            "arn:aws:cloudformation:eu-central-1:123456789012:type/module/Test-Resource-Type-MODULE"
        ));
        assert!(is_arn("arn:aws-cn:cloudformation:cn-north-1::type/resource/Foo-Bar"));
        assert!(!is_arn("Test::Resource::Type"));
        assert!(!is_arn("arn:aws:s3:::my-bucket"));
    }

    #[tokio::test]
    async fn test_arn_bypasses_listing() {
        let mut client = MockTypeRegistryClient::new();
        client.expect_list_types().times(0);
        client
            .expect_describe_type()
            .withf(|identifier: &str| identifier == TYPE_ARN)
            .times(1)
            .returning(|identifier| {
                Ok(DescribeTypeOutput {
                    arn: identifier.to_string(),
                    type_name: Some("Test::Resource::Type".to_string()),
                    schema: Some("{}".to_string()),
                    source_url: None,
                })
            });

        let descriptor = resolve_type(&client, TYPE_ARN, &ResolveOptions::default())
            .await
            .unwrap();

        assert_eq!(descriptor.type_name, "Test::Resource::Type");
        assert_eq!(descriptor.source_url, TYPE_ARN);
    }

    #[tokio::test]
    async fn test_private_module_listing_request() {
        let mut client = MockTypeRegistryClient::new();
        client
            .expect_list_types()
            .withf(|request: &ListTypesRequest| {
                request.type_name_prefix == "Acme::Super::Friend::MODULE"
                    && request.category == TypeCategory::Module
                    && request.visibility == Visibility::Private
                    && request.next_token.is_none()
            })
            .times(1)
            .returning(|_| {
                Ok(ListTypesPage {
                    type_summaries: vec![TypeSummary {
                        type_name: "Acme::Super::Friend::MODULE".to_string(),
                        type_arn: "arn:module".to_string(),
                        description: None,
                    }],
                    next_token: None,
                })
            });
        client.expect_describe_type().times(1).returning(|identifier| {
            Ok(DescribeTypeOutput {
                arn: identifier.to_string(),
                type_name: Some("Acme::Super::Friend::MODULE".to_string()),
                schema: Some("{}".to_string()),
                source_url: Some("https://example.com/friend".to_string()),
            })
        });

        let options = ResolveOptions {
            private: true,
            version: None,
        };
        let descriptor = resolve_type(&client, "Acme::Super::Friend::MODULE", &options)
            .await
            .unwrap();
        assert_eq!(descriptor.source_url, "https://example.com/friend");
    }

    #[tokio::test]
    async fn test_empty_type_name_is_incomplete() {
        let mut client = MockTypeRegistryClient::new();
        client.expect_describe_type().returning(|identifier| {
            Ok(DescribeTypeOutput {
                arn: identifier.to_string(),
                type_name: Some(String::new()),
                schema: Some("{}".to_string()),
                source_url: None,
            })
        });

        let result = resolve_type(&client, TYPE_ARN, &ResolveOptions::default()).await;
        assert!(matches!(
            result,
            Err(ResolutionError::IncompleteType { missing: "type name", .. })
        ));
    }
}
