//! Tool configuration loaded from YAML with environment overrides
//!
//! ```yaml
//! region: eu-central-1
//! timeout_secs: 60
//! registry:
//!   endpoint: http://localhost:4566/
//! srcmak_program: /usr/local/bin/jsii-srcmak
//! srcmak_deps: [aws-cdk-lib, constructs]
//! ```

use crate::{ImportError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_SRCMAK_PROGRAM: &str = "jsii-srcmak";
/// Packages the generated TypeScript imports
pub const DEFAULT_SRCMAK_DEPS: &[&str] = &["aws-cdk-lib", "constructs"];

pub const ENV_REGISTRY_ENDPOINT: &str = "CDK_IMPORT_REGISTRY_ENDPOINT";
pub const ENV_CATALOG_ENDPOINT: &str = "CDK_IMPORT_CATALOG_ENDPOINT";

/// Endpoint of one remote API
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct EndpointConfig {
    /// Base URL override; the regional service endpoint when unset
    #[serde(default)]
    pub endpoint: Option<String>,
}

/// Root of the configuration file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ImportConfig {
    /// Region override; the AWS default provider chain decides when unset
    #[serde(default)]
    pub region: Option<String>,
    /// Per-operation timeout of remote calls
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub registry: EndpointConfig,
    #[serde(default)]
    pub catalog: EndpointConfig,
    #[serde(default = "default_srcmak_program")]
    pub srcmak_program: String,
    /// Node packages handed to the cross-compiler as `--dep`
    #[serde(default = "default_srcmak_deps")]
    pub srcmak_deps: Vec<String>,
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_srcmak_program() -> String {
    DEFAULT_SRCMAK_PROGRAM.to_string()
}

fn default_srcmak_deps() -> Vec<String> {
    DEFAULT_SRCMAK_DEPS.iter().map(|dep| dep.to_string()).collect()
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            region: None,
            timeout_secs: default_timeout(),
            registry: EndpointConfig::default(),
            catalog: EndpointConfig::default(),
            srcmak_program: default_srcmak_program(),
            srcmak_deps: default_srcmak_deps(),
        }
    }
}

impl ImportConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ImportError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        serde_yaml::from_str(&content).map_err(|e| {
            ImportError::Config(format!("Failed to parse config YAML from {:?}: {}", path, e))
        })
    }

    /// Load the optional file, then apply process environment overrides
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        Ok(config.with_overrides(|key| std::env::var(key).ok()))
    }

    /// Apply overrides from an environment lookup
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(region) = lookup("AWS_REGION").or_else(|| lookup("AWS_DEFAULT_REGION")) {
            self.region = Some(region);
        }
        if let Some(endpoint) = lookup(ENV_REGISTRY_ENDPOINT) {
            self.registry.endpoint = Some(endpoint);
        }
        if let Some(endpoint) = lookup(ENV_CATALOG_ENDPOINT) {
            self.catalog.endpoint = Some(endpoint);
        }
        self
    }
}
