//! Global CLI options shared across all commands
//!
//! Parsed once in `main.rs` and handed to every command handler, so handler
//! signatures do not grow with each new flag.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::bench::registry::DEFAULT_RESULTS_DIR;
use crate::cli::Cli;
use crate::config::request::DEFAULT_REQUEST_CONFIG_PATH;
use crate::deadline::Deadline;

/// Global CLI options passed to all command handlers.
///
/// # Precedence
///
/// CLI flag > `APIVET_*` environment variable > built-in default.
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    /// Environment store path (defaults to `config/.env.conf.json`)
    pub config: Option<String>,

    /// Directory of tagged benchmark results
    pub results_dir: Option<String>,

    /// Benchmark request configuration path
    pub request_config: Option<String>,

    /// Overall deadline in seconds
    pub timeout: Option<u64>,

    /// Account type the identity probe must report
    pub account_type: String,

    /// Seconds the operator has to complete an interactive login
    pub login_timeout: u64,

    /// Collection runner executable
    pub newman: String,

    /// Directory holding collection scripts
    pub collections_dir: String,
}

impl GlobalOptions {
    /// Create GlobalOptions from a parsed CLI struct.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            config: cli.config.clone(),
            results_dir: cli.results_dir.clone(),
            request_config: cli.request_config.clone(),
            timeout: cli.timeout,
            account_type: cli.account_type.clone(),
            login_timeout: cli.login_timeout,
            newman: cli.newman.clone(),
            collections_dir: cli.collections_dir.clone(),
        }
    }

    /// Get config path as `Option<&str>`.
    pub fn config_ref(&self) -> Option<&str> {
        self.config.as_deref()
    }

    /// Get results directory as `Option<&str>`.
    pub fn results_dir_ref(&self) -> Option<&str> {
        self.results_dir.as_deref()
    }

    /// Request configuration path, falling back to the default location.
    pub fn request_config_path(&self) -> PathBuf {
        PathBuf::from(
            self.request_config
                .as_deref()
                .unwrap_or(DEFAULT_REQUEST_CONFIG_PATH),
        )
    }

    /// Results directory, falling back to the default location.
    pub fn results_dir_path(&self) -> &Path {
        Path::new(self.results_dir.as_deref().unwrap_or(DEFAULT_RESULTS_DIR))
    }

    /// Deadline for the whole command, started now.
    pub fn deadline(&self) -> Deadline {
        Deadline::from_secs(self.timeout)
    }

    pub fn login_timeout(&self) -> Duration {
        Duration::from_secs(self.login_timeout)
    }
}
