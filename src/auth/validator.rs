//! Credential validator
//!
//! When the session cookie expires the service answers the identity endpoint
//! with an HTML login page rather than an error status, so validity is read
//! from the body shape: structured JSON carrying the expected account type.

use log::{debug, warn};
use serde_json::Value;

use crate::client::{ProbeResponse, SpiApi};
use crate::config::EnvironmentConfig;
use crate::deadline::Deadline;
use crate::error::{ConfigError, Error, Result};

/// Account-type marker the identity endpoint returns for a usable credential
pub const EXPECTED_ACCOUNT_TYPE: &str = "internal";

/// Field of the identity payload holding the account type
const ACCOUNT_TYPE_FIELD: &str = "type";

/// Outcome of a single probe. Derived fresh on every check, never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Valid,
    Invalid,
}

/// Classify a probe response by body shape and account type.
pub fn classify(response: &ProbeResponse, expected_type: &str) -> AuthState {
    let is_markup = response
        .content_type
        .as_deref()
        .is_some_and(|ct| ct.to_ascii_lowercase().contains("html"))
        || response.body.trim_start().starts_with('<');
    if is_markup {
        debug!("Identity probe returned markup (status {})", response.status);
        return AuthState::Invalid;
    }

    let payload: Value = match serde_json::from_str(&response.body) {
        Ok(payload) => payload,
        Err(e) => {
            debug!("Identity probe body is not JSON: {}", e);
            return AuthState::Invalid;
        }
    };

    match payload.get(ACCOUNT_TYPE_FIELD).and_then(Value::as_str) {
        Some(account_type) if account_type == expected_type => AuthState::Valid,
        other => {
            debug!(
                "Identity probe account type {:?} does not match '{}'",
                other, expected_type
            );
            AuthState::Invalid
        }
    }
}

/// Probes the identity endpoint to decide whether a credential is usable
pub struct CredentialValidator<'a> {
    api: &'a dyn SpiApi,
    expected_type: String,
    deadline: Deadline,
}

impl<'a> CredentialValidator<'a> {
    /// Validator expecting the default account type
    pub fn new(api: &'a dyn SpiApi, deadline: Deadline) -> Self {
        Self {
            api,
            expected_type: EXPECTED_ACCOUNT_TYPE.to_string(),
            deadline,
        }
    }

    /// Override the expected account-type marker
    pub fn expecting(mut self, account_type: impl Into<String>) -> Self {
        self.expected_type = account_type.into();
        self
    }

    /// Probe once and classify.
    ///
    /// A bad credential is `Ok(AuthState::Invalid)`; only a missing base URL
    /// or an expired deadline is returned as an error.
    pub async fn check(&self, config: &EnvironmentConfig) -> Result<AuthState> {
        if config.base_url.trim().is_empty() {
            return Err(ConfigError::Incomplete {
                env: config.name.clone(),
                fields: vec!["SPI_URL"],
            }
            .into());
        }

        let probe = self
            .deadline
            .run("probing credential", self.api.fetch_identity(config))
            .await;

        let state = match probe {
            Ok(response) => classify(&response, &self.expected_type),
            Err(err @ (Error::Config(_) | Error::DeadlineExceeded(_))) => return Err(err),
            Err(err) => {
                debug!("Identity probe failed: {}", err);
                AuthState::Invalid
            }
        };

        if state == AuthState::Invalid {
            warn!(
                "Credential for '{}' was rejected by the identity probe; a new cookie is needed",
                config.name
            );
        } else {
            debug!("Credential for '{}' is valid", config.name);
        }
        Ok(state)
    }

    /// `true` when the credential is usable.
    pub async fn is_valid(&self, config: &EnvironmentConfig) -> Result<bool> {
        Ok(self.check(config).await? == AuthState::Valid)
    }
}
