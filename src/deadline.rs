//! Caller-supplied deadline honoured at every suspension point
//!
//! A single `Deadline` is created at the CLI boundary from `--timeout` and
//! passed down to every component that awaits a collaborator (HTTP probe,
//! browser login, collection runner, interactive prompt).

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

use crate::error::{Error, Result};

/// Absolute point in time after which awaited work is abandoned.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    at: Option<Instant>,
}

impl Deadline {
    /// A deadline that never expires.
    pub fn none() -> Self {
        Self { at: None }
    }

    /// A deadline `timeout` from now.
    pub fn after(timeout: Duration) -> Self {
        Self {
            at: Some(Instant::now() + timeout),
        }
    }

    /// Build from an optional number of seconds (the `--timeout` flag).
    pub fn from_secs(secs: Option<u64>) -> Self {
        match secs {
            Some(secs) => Self::after(Duration::from_secs(secs)),
            None => Self::none(),
        }
    }

    /// Whether the deadline has already passed.
    pub fn is_expired(&self) -> bool {
        self.at.is_some_and(|at| Instant::now() >= at)
    }

    /// Await `fut`, failing with `Error::DeadlineExceeded` if the deadline passes first.
    ///
    /// `what` describes the suspended operation and ends up in the error message.
    pub async fn run<T, F>(&self, what: &str, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        match self.at {
            None => fut.await,
            Some(at) => match tokio::time::timeout_at(at, fut).await {
                Ok(result) => result,
                Err(_) => Err(Error::DeadlineExceeded(what.to_string())),
            },
        }
    }
}

impl Default for Deadline {
    fn default() -> Self {
        Self::none()
    }
}
