//! Command execution context
//!
//! The current-environment marker is read exactly once, here, and turned into
//! an explicit [`EnvironmentConfig`] that every later step receives by
//! reference.

use std::path::{Path, PathBuf};

use log::debug;

use crate::auth::{ChromeLogin, CredentialLifecycle, CredentialRefresher, CredentialValidator};
use crate::cli::args::GlobalOptions;
use crate::client::SpiApi;
use crate::config::{ConfigStore, EnvironmentConfig, normalize_environment};
use crate::deadline::Deadline;
use crate::error::Result;

/// Context for command execution: store, resolved environment and deadline.
pub struct CommandContext {
    /// Backing environment store
    pub store: ConfigStore,
    /// Record of the environment this command targets
    pub config: EnvironmentConfig,
    /// Deadline shared by every awaited collaborator
    pub deadline: Deadline,
    /// Browser login used when a credential must be refreshed
    pub login: ChromeLogin,
    account_type: String,
}

impl CommandContext {
    /// Resolve the target environment.
    ///
    /// When `env` is given it is validated and persisted as the current
    /// environment first. The record must be complete.
    pub fn resolve(opts: &GlobalOptions, env: Option<&str>) -> Result<Self> {
        let store = ConfigStore::at(opts.config_ref());

        let name = match env {
            Some(env) => store.set_current_environment(env)?,
            None => normalize_environment(&store.current_environment()?)?,
        };
        let config = store.load_env(&name)?;
        debug!("Resolved environment '{}' from {}", name, store.path().display());

        Ok(Self {
            store,
            config,
            deadline: opts.deadline(),
            login: ChromeLogin::new().with_login_timeout(opts.login_timeout()),
            account_type: opts.account_type.clone(),
        })
    }

    /// Validate-then-refresh lifecycle wired to this context.
    pub fn lifecycle<'a>(&'a self, api: &'a dyn SpiApi) -> CredentialLifecycle<'a> {
        CredentialLifecycle::new(
            CredentialValidator::new(api, self.deadline).expecting(self.account_type.clone()),
            CredentialRefresher::new(&self.login, &self.store, self.deadline),
        )
    }

    /// Directory holding the collection runner's environment files.
    ///
    /// They sit next to the environment store.
    pub fn runner_env_dir(&self) -> PathBuf {
        self.store
            .path()
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."))
            .to_path_buf()
    }
}
