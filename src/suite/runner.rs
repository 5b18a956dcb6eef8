//! Collection runner boundary
//!
//! [`CollectionRunner`] executes one functional suite and reports a failure
//! count and an error flag. [`NewmanRunner`] shells out to the `newman` CLI
//! and reads its JSON reporter output.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use log::debug;
use serde::Deserialize;
use serde_json::Value;
use tokio::process::Command;

use crate::error::{Result, SuiteError};

/// Default directory holding collection files (`<script>.json`)
pub const DEFAULT_COLLECTIONS_DIR: &str = "scripts/functional";

/// Everything the runner needs to execute one suite
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuiteInvocation {
    /// Collection script identifier
    pub script: String,
    /// Runner environment file carrying the credential
    pub environment_file: PathBuf,
    /// Iteration data source
    pub iteration_data: PathBuf,
}

/// Runner-reported outcome of one suite
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of failed assertions
    pub failures: usize,
    /// Run-level error (transport failure, unreadable collection, ...)
    pub error: Option<String>,
}

impl RunSummary {
    pub fn passed(&self) -> bool {
        self.error.is_none() && self.failures == 0
    }
}

/// Executes functional suites
#[async_trait]
pub trait CollectionRunner: Send + Sync {
    async fn run(&self, invocation: &SuiteInvocation) -> Result<RunSummary>;
}

/// Runs suites with the `newman` command line
pub struct NewmanRunner {
    program: String,
    collections_dir: PathBuf,
}

impl NewmanRunner {
    pub fn new(program: impl Into<String>, collections_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            collections_dir: collections_dir.into(),
        }
    }

    fn collection_path(&self, script: &str) -> PathBuf {
        self.collections_dir.join(format!("{}.json", script))
    }
}

#[async_trait]
impl CollectionRunner for NewmanRunner {
    async fn run(&self, invocation: &SuiteInvocation) -> Result<RunSummary> {
        let report = tempfile::NamedTempFile::new()?;
        let collection = self.collection_path(&invocation.script);

        debug!(
            "Running {} with {}",
            collection.display(),
            invocation.environment_file.display()
        );

        let output = Command::new(&self.program)
            .arg("run")
            .arg(&collection)
            .arg("--environment")
            .arg(&invocation.environment_file)
            .arg("--iteration-data")
            .arg(&invocation.iteration_data)
            .args(["--reporters", "cli,json", "--reporter-json-export"])
            .arg(report.path())
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| SuiteError::RunnerUnavailable(format!("{}: {}", self.program, e)))?;

        debug!(
            "{} exited with {} for {}",
            self.program, output.status, invocation.script
        );

        let contents = tokio::fs::read_to_string(report.path()).await?;
        if contents.trim().is_empty() {
            // newman exits before reporting when the collection cannot be loaded
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Ok(RunSummary {
                failures: 0,
                error: Some(if stderr.is_empty() {
                    format!("no report produced (exit status {})", output.status)
                } else {
                    stderr
                }),
            });
        }

        parse_report(&contents)
    }
}

#[derive(Deserialize)]
struct NewmanReport {
    run: NewmanRun,
}

#[derive(Deserialize)]
struct NewmanRun {
    #[serde(default)]
    failures: Vec<Value>,
    #[serde(default)]
    error: Option<Value>,
}

/// Read failure count and error flag from a newman JSON report.
pub fn parse_report(contents: &str) -> Result<RunSummary> {
    let report: NewmanReport =
        serde_json::from_str(contents).map_err(|e| SuiteError::Summary(e.to_string()))?;

    let error = match report.run.error {
        None | Some(Value::Null) => None,
        Some(Value::String(message)) => Some(message),
        Some(other) => Some(
            other
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| other.to_string()),
        ),
    };

    Ok(RunSummary {
        failures: report.run.failures.len(),
        error,
    })
}

/// Path of a runner environment file for `env` inside `dir`
pub fn environment_file(dir: &Path, env: &str) -> PathBuf {
    dir.join(format!(".postman.{}.json", env))
}
