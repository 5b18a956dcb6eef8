//! Environment configuration store
//!
//! The store is a single JSON document keyed by environment name, plus a
//! top-level `CURRENT_ENV` marker:
//!
//! ```json
//! {
//!   "CURRENT_ENV": "dev",
//!   "dev": { "ENV": "dev", "PARTNER_ID": "...", "AUTH": "...", "COOKIE": "...", "SPI_URL": "..." }
//! }
//! ```
//!
//! Every write is a full read-modify-write of the document followed by an
//! atomic rename, so sibling environments and unknown keys survive updates.

pub mod request;

use std::io::Write;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ConfigError, Result};

/// Default location of the environment store, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "config/.env.conf.json";

/// Key of the active environment marker
const CURRENT_ENV_KEY: &str = "CURRENT_ENV";

/// Environments this tool is allowed to target
pub const ENVIRONMENTS: &[&str] = &["dev"];

/// Credential and endpoint record for one environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    /// Environment name (the record's key)
    #[serde(rename = "ENV", default)]
    pub name: String,

    /// Partner identifier sent with functional suites
    #[serde(rename = "PARTNER_ID", default)]
    pub partner_id: String,

    /// Authorization secret
    #[serde(rename = "AUTH", default)]
    pub auth_secret: String,

    /// Session cookie, present once a refresh has succeeded
    #[serde(rename = "COOKIE", default)]
    pub session_cookie: Option<String>,

    /// Base URL of the service
    #[serde(rename = "SPI_URL", default)]
    pub base_url: String,

    /// Keys this tool does not interpret, kept verbatim on rewrite
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EnvironmentConfig {
    /// Names of required fields that are empty.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.base_url.trim().is_empty() {
            missing.push("SPI_URL");
        }
        if self.partner_id.trim().is_empty() {
            missing.push("PARTNER_ID");
        }
        if self.auth_secret.trim().is_empty() {
            missing.push("AUTH");
        }
        missing
    }

    /// Fail closed if any required field is empty.
    pub fn validate(&self) -> Result<()> {
        let fields = self.missing_fields();
        if fields.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Incomplete {
                env: self.name.clone(),
                fields,
            }
            .into())
        }
    }

    /// Session cookie, treating an empty string as absent.
    pub fn cookie(&self) -> Option<&str> {
        self.session_cookie
            .as_deref()
            .filter(|cookie| !cookie.trim().is_empty())
    }

    /// Base URL without a trailing slash.
    pub fn base_url_trimmed(&self) -> &str {
        self.base_url.trim().trim_end_matches('/')
    }
}

/// Lowercase, trim and check an environment name against the allow-list.
pub fn normalize_environment(name: &str) -> Result<String> {
    let env = name.trim().to_lowercase();
    if ENVIRONMENTS.contains(&env.as_str()) {
        Ok(env)
    } else {
        Err(ConfigError::InvalidEnvironment(name.trim().to_string()).into())
    }
}

/// File-backed environment store
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Store at a specific path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `path`, or the default location when `None`
    pub fn at(path: Option<&str>) -> Self {
        Self::new(path.unwrap_or(DEFAULT_CONFIG_PATH))
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Name stored in the `CURRENT_ENV` marker
    pub fn current_environment(&self) -> Result<String> {
        let doc = self.read_document()?;
        match doc.get(CURRENT_ENV_KEY).and_then(Value::as_str) {
            Some(env) if !env.trim().is_empty() => Ok(env.trim().to_string()),
            _ => Err(ConfigError::Parse(format!("'{}' is not set", CURRENT_ENV_KEY)).into()),
        }
    }

    /// Load and validate the record for the currently marked environment.
    pub fn load(&self) -> Result<EnvironmentConfig> {
        let env = self.current_environment()?;
        self.load_env(&env)
    }

    /// Load and validate the record for a named environment.
    pub fn load_env(&self, name: &str) -> Result<EnvironmentConfig> {
        let config = self.record(name)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a record without checking required fields.
    pub fn record(&self, name: &str) -> Result<EnvironmentConfig> {
        let doc = self.read_document()?;
        let value = doc
            .get(name)
            .cloned()
            .ok_or_else(|| ConfigError::UnknownEnvironment(name.to_string()))?;

        let mut config: EnvironmentConfig = serde_json::from_value(value)
            .map_err(|e| ConfigError::Parse(format!("record '{}': {}", name, e)))?;
        if config.name.trim().is_empty() {
            config.name = name.to_string();
        }
        Ok(config)
    }

    /// Validate `name` against the allow-list and persist it as the current environment.
    pub fn set_current_environment(&self, name: &str) -> Result<String> {
        let env = normalize_environment(name)?;
        let mut doc = self.read_document()?;
        doc.insert(CURRENT_ENV_KEY.to_string(), Value::String(env.clone()));
        self.write_document(&doc)?;
        debug!("Current environment set to {}", env);
        Ok(env)
    }

    /// Rewrite the whole store with `record` replacing its environment's entry.
    pub fn save(&self, record: &EnvironmentConfig) -> Result<()> {
        let mut doc = self.read_document()?;
        let value =
            serde_json::to_value(record).map_err(|e| ConfigError::Save(e.to_string()))?;
        doc.insert(record.name.clone(), value);
        self.write_document(&doc)?;
        debug!("Saved environment '{}' to {}", record.name, self.path.display());
        Ok(())
    }

    fn read_document(&self) -> Result<Map<String, Value>> {
        if !self.path.exists() {
            return Err(ConfigError::NotFound(self.path.clone()).into());
        }

        let contents = std::fs::read_to_string(&self.path)?;
        serde_json::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()).into())
    }

    fn write_document(&self, doc: &Map<String, Value>) -> Result<()> {
        write_json_atomic(&self.path, doc).map_err(|e| ConfigError::Save(e.to_string()).into())
    }
}

/// Write `value` as 2-space pretty JSON to a temp file beside `path`, then rename over it.
pub fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir)?;

    let contents = serde_json::to_string_pretty(value)?;
    let mut file = tempfile::NamedTempFile::new_in(&dir)?;
    file.write_all(contents.as_bytes())?;
    file.write_all(b"\n")?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}
