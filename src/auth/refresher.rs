//! Credential refresher
//!
//! Drives a [`LoginProvider`] through the interactive login flow and writes
//! the resulting cookie back through the [`ConfigStore`]. Nothing is persisted
//! unless the provider returns a cookie.

use async_trait::async_trait;
use log::info;

use crate::config::{ConfigStore, EnvironmentConfig};
use crate::deadline::Deadline;
use crate::error::{AuthError, Error, Result};

/// Mints a fresh session cookie for an environment (browser automation boundary)
#[async_trait]
pub trait LoginProvider: Send + Sync {
    /// Complete a login against `base_url` and return the session cookie header value.
    async fn obtain_cookie(&self, base_url: &str) -> Result<String>;
}

/// Refreshes an environment's session cookie
pub struct CredentialRefresher<'a> {
    provider: &'a dyn LoginProvider,
    store: &'a ConfigStore,
    deadline: Deadline,
}

impl<'a> CredentialRefresher<'a> {
    /// Create a refresher writing through `store`
    pub fn new(provider: &'a dyn LoginProvider, store: &'a ConfigStore, deadline: Deadline) -> Self {
        Self {
            provider,
            store,
            deadline,
        }
    }

    /// Obtain a new cookie, persist it, and return the updated record.
    pub async fn refresh(&self, config: &EnvironmentConfig) -> Result<EnvironmentConfig> {
        info!("Refreshing session cookie for '{}'", config.name);

        let login = self
            .deadline
            .run(
                "waiting for browser login",
                self.provider.obtain_cookie(config.base_url_trimmed()),
            )
            .await;

        let cookie = match login {
            Ok(cookie) => cookie,
            Err(err @ (Error::Auth(_) | Error::DeadlineExceeded(_))) => return Err(err),
            Err(err) => return Err(AuthError::RefreshFailed(err.to_string()).into()),
        };

        let cookie = cookie.trim();
        if cookie.is_empty() {
            return Err(AuthError::RefreshFailed("login produced an empty cookie".to_string()).into());
        }

        let mut updated = config.clone();
        updated.session_cookie = Some(cookie.to_string());
        self.store.save(&updated)?;

        info!("Stored new session cookie for '{}'", updated.name);
        Ok(updated)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted [`LoginProvider`] shared by auth and suite tests

    use std::sync::Arc;

    use tokio::sync::Mutex;

    use super::*;

    /// Returns a fixed cookie (or failure) and counts calls
    #[derive(Clone)]
    pub struct ScriptedLogin {
        cookie: Option<String>,
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl ScriptedLogin {
        pub fn succeeding(cookie: &str) -> Self {
            Self {
                cookie: Some(cookie.to_string()),
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }

        pub fn failing() -> Self {
            Self {
                cookie: None,
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }

        pub async fn calls(&self) -> Vec<String> {
            self.calls.lock().await.clone()
        }
    }

    #[async_trait]
    impl LoginProvider for ScriptedLogin {
        async fn obtain_cookie(&self, base_url: &str) -> Result<String> {
            self.calls.lock().await.push(base_url.to_string());
            self.cookie.clone().ok_or_else(|| {
                AuthError::RefreshFailed("selector #login not found".to_string()).into()
            })
        }
    }
}
