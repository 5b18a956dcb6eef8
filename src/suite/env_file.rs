//! Runner environment file synchronisation
//!
//! The collection runner reads credentials from its own environment file:
//!
//! ```json
//! { "name": "dev", "values": [ { "key": "partner_id", "value": "..." }, { "key": "auth", "value": "Basic ..." } ] }
//! ```
//!
//! Before each suite the credential variables are overwritten from the
//! environment config. Every other variable must already carry a value.

use std::path::Path;

use log::debug;
use serde_json::Value;

use crate::config::{EnvironmentConfig, write_json_atomic};
use crate::error::{ConfigError, Result, SuiteError};

/// Copy `config`'s credential into the runner environment file at `path`.
pub fn sync_runner_environment(path: &Path, config: &EnvironmentConfig) -> Result<()> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()).into());
    }

    let contents = std::fs::read_to_string(path)?;
    let mut doc: Value = serde_json::from_str(&contents)
        .map_err(|e| ConfigError::Parse(format!("{}: {}", path.display(), e)))?;

    let values = doc
        .get_mut("values")
        .and_then(Value::as_array_mut)
        .ok_or_else(|| ConfigError::Parse(format!("{}: missing 'values' array", path.display())))?;

    for variable in values.iter_mut() {
        let key = variable
            .get("key")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let replacement = match key.as_str() {
            "partner_id" => Some(config.partner_id.trim().to_string()),
            "auth" => Some(format!("Basic {}", config.auth_secret.trim())),
            "cookie" => config.cookie().map(str::to_string),
            _ => None,
        };

        match replacement {
            Some(value) => variable["value"] = Value::String(value),
            None => {
                let has_value = match variable.get("value") {
                    None | Some(Value::Null) => false,
                    Some(Value::String(s)) => !s.is_empty(),
                    Some(_) => true,
                };
                if !has_value && key != "cookie" {
                    return Err(SuiteError::EnvFileIncomplete {
                        path: path.to_path_buf(),
                        key,
                    }
                    .into());
                }
            }
        }
    }

    write_json_atomic(path, &doc)?;
    debug!("Synchronised runner environment {}", path.display());
    Ok(())
}
