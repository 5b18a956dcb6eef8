//! CLI command definitions and handlers

use clap::{Parser, Subcommand};

use crate::auth::validator::EXPECTED_ACCOUNT_TYPE;
use crate::suite::DEFAULT_COLLECTIONS_DIR;

pub mod args;
pub mod auth;
pub mod bench;
pub mod compare;
pub mod context;
pub mod func;
pub mod status;

pub use context::CommandContext;

/// apivet - credential-aware functional and performance checks for the SPI API
#[derive(Parser, Debug)]
#[command(name = "apivet")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Override environment store location
    #[arg(long, global = true, env = "APIVET_CONFIG", hide_env = true)]
    pub config: Option<String>,

    /// Directory for tagged benchmark results
    #[arg(long, global = true, env = "APIVET_RESULTS_DIR", hide_env = true)]
    pub results_dir: Option<String>,

    /// Override benchmark request configuration location
    #[arg(long, global = true, env = "APIVET_REQUEST_CONFIG", hide_env = true)]
    pub request_config: Option<String>,

    /// Abandon the command after this many seconds
    #[arg(long, global = true, env = "APIVET_TIMEOUT", hide_env = true)]
    pub timeout: Option<u64>,

    /// Account type the identity probe must report
    #[arg(
        long,
        global = true,
        env = "APIVET_ACCOUNT_TYPE",
        default_value = EXPECTED_ACCOUNT_TYPE,
        hide_env = true
    )]
    pub account_type: String,

    /// Seconds allowed for an interactive browser login
    #[arg(
        long,
        global = true,
        env = "APIVET_LOGIN_TIMEOUT",
        default_value_t = 180,
        hide_env = true
    )]
    pub login_timeout: u64,

    /// Collection runner executable
    #[arg(
        long,
        global = true,
        env = "APIVET_NEWMAN",
        default_value = "newman",
        hide_env = true
    )]
    pub newman: String,

    /// Directory holding functional collection scripts
    #[arg(
        long,
        global = true,
        env = "APIVET_COLLECTIONS_DIR",
        default_value = DEFAULT_COLLECTIONS_DIR,
        hide_env = true
    )]
    pub collections_dir: String,

    /// Enable debug logging
    #[arg(long, global = true, env = "APIVET_DEBUG", hide_env = true)]
    pub debug: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the functional suites
    #[command(after_help = "\
Examples:
  apivet func
  apivet func env=dev")]
    Func {
        /// KEY=VALUE options (env)
        options: Vec<String>,
    },

    /// Benchmark response times and store them under a tag
    #[command(after_help = "\
Examples:
  apivet bench tag=baseline
  apivet bench env=dev tag=release-2")]
    Bench {
        /// KEY=VALUE options (env, tag)
        options: Vec<String>,
    },

    /// Compare mean response times of two tagged runs
    Compare {
        /// Tag of the reference run
        base: String,
        /// Tag of the run to compare against the reference
        target: String,
    },

    /// Check the stored credential and refresh it if rejected
    Auth {
        /// KEY=VALUE options (env)
        options: Vec<String>,
    },

    /// Show configuration status
    Status,

    /// Display version information
    Version,
}
