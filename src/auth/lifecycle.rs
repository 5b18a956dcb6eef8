//! Credential lifecycle orchestrator
//!
//! ```text
//! Checking ──valid──▶ done (input returned unchanged)
//!     │
//!     └──invalid──▶ Refreshing ──▶ done (refreshed record returned)
//! ```
//!
//! There is no edge back to `Checking`: a refreshed credential is used
//! without a second probe, and there is at most one refresh per call.

use log::info;

use super::refresher::CredentialRefresher;
use super::validator::{AuthState, CredentialValidator};
use crate::config::EnvironmentConfig;
use crate::error::Result;

/// Composes validation and refresh into a single "usable credential" step
pub struct CredentialLifecycle<'a> {
    validator: CredentialValidator<'a>,
    refresher: CredentialRefresher<'a>,
}

impl<'a> CredentialLifecycle<'a> {
    pub fn new(validator: CredentialValidator<'a>, refresher: CredentialRefresher<'a>) -> Self {
        Self {
            validator,
            refresher,
        }
    }

    /// Return a credential fit for use, refreshing it once if the probe rejects it.
    pub async fn ensure_usable(&self, config: &EnvironmentConfig) -> Result<EnvironmentConfig> {
        let (config, _) = self.ensure_usable_with_state(config).await?;
        Ok(config)
    }

    /// Like [`ensure_usable`](Self::ensure_usable), also reporting what the probe saw.
    pub async fn ensure_usable_with_state(
        &self,
        config: &EnvironmentConfig,
    ) -> Result<(EnvironmentConfig, AuthState)> {
        match self.validator.check(config).await? {
            AuthState::Valid => Ok((config.clone(), AuthState::Valid)),
            AuthState::Invalid => {
                let refreshed = self.refresher.refresh(config).await?;
                info!(
                    "Using refreshed credential for '{}' without re-validation",
                    refreshed.name
                );
                Ok((refreshed, AuthState::Invalid))
            }
        }
    }
}
