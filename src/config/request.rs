//! Benchmark request list
//!
//! Loaded from `config/.request-config.json`:
//!
//! ```json
//! { "iteration": 3, "urls": ["profile", "orders", "ethernet/v1/quotes/{partner_id}"] }
//! ```
//!
//! Each entry is either a built-in endpoint alias or a raw path template.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::EnvironmentConfig;
use crate::error::{BenchError, ConfigError, Result};

/// Default location of the request configuration file
pub const DEFAULT_REQUEST_CONFIG_PATH: &str = "config/.request-config.json";

/// Built-in endpoint aliases and their paths relative to the base URL
pub const ENDPOINTS: &[(&str, &str)] = &[
    ("profile", "ethernet/v1/profile"),
    ("multiquotes", "ethernet/v1/multiquotes"),
    ("orders", "ethernet/v1/orders/eaccess"),
    ("services", "ethernet/v1/services/eaccess"),
];

/// Keys used by the result file itself; request names may not shadow them
pub const RESERVED_NAMES: &[&str] = &["testDate", "testTime", "iteration", "requests"];

/// Placeholder substituted with the environment's partner id
const PARTNER_PLACEHOLDER: &str = "{partner_id}";

/// On-disk request configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestConfigFile {
    /// Number of iterations to run
    pub iteration: u32,

    /// Endpoint aliases or path templates, in run order
    pub urls: Vec<String>,
}

impl RequestConfigFile {
    /// Load the request configuration from a path
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()).into());
        }
        let contents = std::fs::read_to_string(path)?;
        serde_json::from_str(&contents).map_err(|e| {
            ConfigError::Parse(format!("{}: {}", path.display(), e)).into()
        })
    }

    /// Build the ordered endpoint list. A run needs at least one iteration.
    pub fn spec(&self) -> Result<BenchmarkRequestSpec> {
        if self.iteration == 0 {
            return Err(BenchError::InvalidIterations.into());
        }
        BenchmarkRequestSpec::from_entries(&self.urls)
    }
}

/// One named endpoint template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointTemplate {
    /// Name used as the series key in results
    pub name: String,

    /// Path relative to the base URL, possibly containing `{partner_id}`
    pub template: String,
}

impl EndpointTemplate {
    /// Resolve a spec entry: known aliases map to their path, anything else is its own template.
    pub fn resolve(entry: &str) -> Self {
        let entry = entry.trim();
        match ENDPOINTS.iter().find(|(alias, _)| *alias == entry) {
            Some((alias, path)) => Self {
                name: alias.to_string(),
                template: path.to_string(),
            },
            None => Self {
                name: entry.to_string(),
                template: entry.trim_start_matches('/').to_string(),
            },
        }
    }

    /// Full URL for this endpoint in `config`'s environment
    pub fn url(&self, config: &EnvironmentConfig) -> String {
        let path = self
            .template
            .replace(PARTNER_PLACEHOLDER, config.partner_id.trim());
        format!("{}/{}", config.base_url_trimmed(), path)
    }
}

/// Ordered endpoints exercised by a benchmark run. Order is part of the result's identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchmarkRequestSpec {
    endpoints: Vec<EndpointTemplate>,
}

impl BenchmarkRequestSpec {
    /// Build from raw entries, rejecting empty lists, duplicates and reserved names
    pub fn from_entries<S: AsRef<str>>(entries: &[S]) -> Result<Self> {
        if entries.is_empty() {
            return Err(BenchError::EmptySpec.into());
        }

        let mut seen = HashSet::new();
        let mut endpoints = Vec::with_capacity(entries.len());
        for entry in entries {
            let endpoint = EndpointTemplate::resolve(entry.as_ref());
            if endpoint.name.is_empty() {
                return Err(BenchError::EmptySpec.into());
            }
            if RESERVED_NAMES.contains(&endpoint.name.as_str()) {
                return Err(BenchError::ReservedRequestName(endpoint.name).into());
            }
            if !seen.insert(endpoint.name.clone()) {
                return Err(BenchError::DuplicateRequest(endpoint.name).into());
            }
            endpoints.push(endpoint);
        }

        Ok(Self { endpoints })
    }

    /// Endpoints in run order
    pub fn endpoints(&self) -> &[EndpointTemplate] {
        &self.endpoints
    }

    /// Request names in run order
    pub fn names(&self) -> Vec<String> {
        self.endpoints.iter().map(|e| e.name.clone()).collect()
    }
}
