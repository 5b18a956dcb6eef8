//! Mock SPI client for testing
//!
//! Provides a scripted implementation of [`SpiApi`] that records every call
//! so orchestrator tests can assert on probe and request counts and order.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{ProbeResponse, SpiApi};
use crate::config::EnvironmentConfig;
use crate::error::{ApiError, Result};

/// Tracks API call counts for test verification
#[derive(Default, Debug, Clone)]
pub struct CallCounts {
    pub fetch_identity: usize,
    pub send: usize,
}

impl CallCounts {
    /// Get total number of API calls made.
    pub fn total(&self) -> usize {
        self.fetch_identity + self.send
    }
}

/// Mock API client for testing.
///
/// # Example
/// ```ignore
/// let mock = MockSpiClient::new()
///     .with_identity(ProbeResponse::html("<html>login</html>"))
///     .await;
/// assert!(!validator.is_valid(&config).await?);
/// ```
#[derive(Default)]
pub struct MockSpiClient {
    /// Probe responses returned in order; the last one repeats
    identity: Arc<Mutex<VecDeque<ProbeResponse>>>,
    /// Probe transport failure, consumed on first use
    identity_error: Arc<Mutex<Option<ApiError>>>,
    /// URLs whose requests fail
    failing_urls: Arc<Mutex<HashSet<String>>>,
    /// Cookies seen by each identity probe
    probed_cookies: Arc<Mutex<Vec<Option<String>>>>,
    /// URLs sent, in call order
    sent: Arc<Mutex<Vec<String>>>,
    call_count: Arc<Mutex<CallCounts>>,
}

impl MockSpiClient {
    /// Create a new mock client with a valid JSON identity response.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an identity probe response.
    pub async fn with_identity(self, response: ProbeResponse) -> Self {
        self.identity.lock().await.push_back(response);
        self
    }

    /// Fail the next identity probe with a transport error.
    pub async fn with_identity_error(self, error: ApiError) -> Self {
        *self.identity_error.lock().await = Some(error);
        self
    }

    /// Make requests to `url` fail.
    pub async fn failing(self, url: impl Into<String>) -> Self {
        self.failing_urls.lock().await.insert(url.into());
        self
    }

    /// Get the call counts for verification in tests.
    pub async fn call_counts(&self) -> CallCounts {
        self.call_count.lock().await.clone()
    }

    /// URLs sent, in order.
    pub async fn sent_urls(&self) -> Vec<String> {
        self.sent.lock().await.clone()
    }

    /// Cookie presented by each identity probe, in order.
    pub async fn probed_cookies(&self) -> Vec<Option<String>> {
        self.probed_cookies.lock().await.clone()
    }
}

#[async_trait]
impl SpiApi for MockSpiClient {
    async fn fetch_identity(&self, config: &EnvironmentConfig) -> Result<ProbeResponse> {
        self.call_count.lock().await.fetch_identity += 1;
        self.probed_cookies
            .lock()
            .await
            .push(config.cookie().map(str::to_string));

        if let Some(error) = self.identity_error.lock().await.take() {
            return Err(error.into());
        }

        let mut queue = self.identity.lock().await;
        let response = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };
        Ok(response.unwrap_or_else(|| ProbeResponse::json(r#"{"type":"internal"}"#)))
    }

    async fn send(&self, _config: &EnvironmentConfig, url: &str) -> Result<()> {
        self.call_count.lock().await.send += 1;
        self.sent.lock().await.push(url.to_string());

        if self.failing_urls.lock().await.contains(url) {
            return Err(ApiError::Status {
                status: 500,
                url: url.to_string(),
            }
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> EnvironmentConfig {
        serde_json::from_str(r#"{ "ENV": "dev", "PARTNER_ID": "p", "AUTH": "a", "SPI_URL": "u" }"#)
            .unwrap()
    }

    #[tokio::test]
    async fn test_mock_default_identity_is_valid_json() {
        let mock = MockSpiClient::new();
        let response = mock.fetch_identity(&config()).await.unwrap();
        assert!(response.body.contains("internal"));
        assert_eq!(mock.call_counts().await.fetch_identity, 1);
    }

    #[tokio::test]
    async fn test_mock_identity_queue_repeats_last() {
        let mock = MockSpiClient::new()
            .with_identity(ProbeResponse::html("<html>"))
            .await
            .with_identity(ProbeResponse::json("{}"))
            .await;

        assert!(mock.fetch_identity(&config()).await.unwrap().body.contains("html"));
        assert_eq!(mock.fetch_identity(&config()).await.unwrap().body, "{}");
        assert_eq!(mock.fetch_identity(&config()).await.unwrap().body, "{}");
    }

    #[tokio::test]
    async fn test_mock_identity_error_consumed() {
        let mock = MockSpiClient::new()
            .with_identity_error(ApiError::Network("down".to_string()))
            .await;
        assert!(mock.fetch_identity(&config()).await.is_err());
        assert!(mock.fetch_identity(&config()).await.is_ok());
    }

    #[tokio::test]
    async fn test_mock_failing_url() {
        let mock = MockSpiClient::new().failing("u/bad").await;
        assert!(mock.send(&config(), "u/bad").await.is_err());
        assert!(mock.send(&config(), "u/good").await.is_ok());
        assert_eq!(mock.sent_urls().await, vec!["u/bad", "u/good"]);
        assert_eq!(mock.call_counts().await.total(), 2);
    }
}
