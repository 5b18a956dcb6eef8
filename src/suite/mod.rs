//! Functional suite orchestration
//!
//! Suites run strictly one after another. Each suite first obtains a usable
//! credential, copies it into the runner environment file and then hands off
//! to the [`CollectionRunner`]. A failing suite is recorded and the remaining
//! suites still run.

pub mod env_file;
pub mod runner;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::auth::CredentialLifecycle;
use crate::config::EnvironmentConfig;
use crate::deadline::Deadline;
use crate::error::{Error, Result};

pub use env_file::sync_runner_environment;
pub use runner::{
    CollectionRunner, DEFAULT_COLLECTIONS_DIR, NewmanRunner, RunSummary, SuiteInvocation,
    environment_file,
};

/// A functional suite: collection script plus iteration data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestCase {
    pub script: &'static str,
    pub data: &'static str,
}

/// Suites executed by `func`
pub const TEST_CASES: &[TestCase] = &[TestCase {
    script: "quote-validation",
    data: "./scripts/data/quote-validation.csv",
}];

/// Pass/fail outcome per suite script
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuiteReport {
    pub passed: BTreeSet<String>,
    pub failed: BTreeSet<String>,
}

impl SuiteReport {
    pub fn all_passed(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Runs suites sequentially against one environment
pub struct SuiteOrchestrator<'a> {
    lifecycle: &'a CredentialLifecycle<'a>,
    runner: &'a dyn CollectionRunner,
    runner_env_dir: PathBuf,
    deadline: Deadline,
}

impl<'a> SuiteOrchestrator<'a> {
    pub fn new(
        lifecycle: &'a CredentialLifecycle<'a>,
        runner: &'a dyn CollectionRunner,
        runner_env_dir: impl Into<PathBuf>,
        deadline: Deadline,
    ) -> Self {
        Self {
            lifecycle,
            runner,
            runner_env_dir: runner_env_dir.into(),
            deadline,
        }
    }

    /// Run every case in order and report which passed.
    ///
    /// Configuration problems and an expired deadline abort the whole run.
    /// Anything else, including a failed credential refresh, fails only the
    /// suite it happened in.
    pub async fn run_suites(
        &self,
        config: &EnvironmentConfig,
        cases: &[TestCase],
    ) -> Result<SuiteReport> {
        let mut report = SuiteReport::default();
        let mut current = config.clone();

        for case in cases {
            info!("Running suite '{}' against '{}'", case.script, current.name);
            let outcome = match self.lifecycle.ensure_usable(&current).await {
                Ok(usable) => {
                    current = usable;
                    self.run_one(&current, case).await
                }
                Err(e) => Err(e),
            };

            match outcome {
                Ok(summary) if summary.passed() => {
                    report.passed.insert(case.script.to_string());
                }
                Ok(summary) => {
                    warn!(
                        "Suite '{}' failed: {} failure(s){}",
                        case.script,
                        summary.failures,
                        summary
                            .error
                            .as_deref()
                            .map(|e| format!(", error: {}", e))
                            .unwrap_or_default()
                    );
                    report.failed.insert(case.script.to_string());
                }
                Err(e @ (Error::Config(_) | Error::DeadlineExceeded(_))) => return Err(e),
                Err(e) => {
                    warn!("Suite '{}' failed: {}", case.script, e);
                    report.failed.insert(case.script.to_string());
                }
            }
        }

        Ok(report)
    }

    /// Sync the runner environment file from `usable` and run one suite.
    async fn run_one(&self, usable: &EnvironmentConfig, case: &TestCase) -> Result<RunSummary> {
        let env_file = environment_file(&self.runner_env_dir, &usable.name);
        sync_runner_environment(&env_file, usable)?;

        let invocation = SuiteInvocation {
            script: case.script.to_string(),
            environment_file: env_file,
            iteration_data: Path::new(case.data).to_path_buf(),
        };
        self.deadline
            .run(
                &format!("running suite '{}'", case.script),
                self.runner.run(&invocation),
            )
            .await
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;
    use std::sync::Arc;

    use async_trait::async_trait;
    use tokio::sync::Mutex;

    use super::runner::{CollectionRunner, RunSummary, SuiteInvocation};
    use crate::error::{Result, SuiteError};

    /// Runner returning canned summaries per script and recording invocations
    #[derive(Default)]
    pub struct ScriptedRunner {
        outcomes: HashMap<String, RunSummary>,
        unavailable: bool,
        events: Arc<Mutex<Vec<String>>>,
        invocations: Arc<Mutex<Vec<SuiteInvocation>>>,
    }

    impl ScriptedRunner {
        pub fn with_outcome(mut self, script: &str, summary: RunSummary) -> Self {
            self.outcomes.insert(script.to_string(), summary);
            self
        }

        pub fn unavailable() -> Self {
            Self {
                unavailable: true,
                ..Self::default()
            }
        }

        pub async fn events(&self) -> Vec<String> {
            self.events.lock().await.clone()
        }

        pub async fn invocations(&self) -> Vec<SuiteInvocation> {
            self.invocations.lock().await.clone()
        }
    }

    #[async_trait]
    impl CollectionRunner for ScriptedRunner {
        async fn run(&self, invocation: &SuiteInvocation) -> Result<RunSummary> {
            self.invocations.lock().await.push(invocation.clone());
            if self.unavailable {
                return Err(SuiteError::RunnerUnavailable("newman".to_string()).into());
            }
            self.events
                .lock()
                .await
                .push(format!("start:{}", invocation.script));
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
            self.events
                .lock()
                .await
                .push(format!("end:{}", invocation.script));
            Ok(self
                .outcomes
                .get(&invocation.script)
                .cloned()
                .unwrap_or_default())
        }
    }
}
