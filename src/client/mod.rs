//! SPI API client
//!
//! The [`SpiApi`] trait is the seam between the orchestrators and the live
//! service; [`SpiClient`] is the reqwest implementation and `mock` provides a
//! counting test double.

use async_trait::async_trait;

use crate::config::EnvironmentConfig;
use crate::error::Result;

#[cfg(test)]
pub mod mock;
pub mod spi;

#[cfg(test)]
pub use mock::MockSpiClient;
pub use spi::SpiClient;

/// Path of the low-cost identity endpoint used to probe credentials
pub const IDENTITY_PATH: &str = "ethernet/v1/profile/";

/// Raw response from the identity probe
#[derive(Debug, Clone)]
pub struct ProbeResponse {
    /// HTTP status code
    pub status: u16,

    /// `content-type` header, if any
    pub content_type: Option<String>,

    /// Response body as text
    pub body: String,
}

impl ProbeResponse {
    /// JSON probe response with status 200
    pub fn json(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            content_type: Some("application/json".to_string()),
            body: body.into(),
        }
    }

    /// HTML probe response with status 200, as served by the degraded auth path
    pub fn html(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            content_type: Some("text/html; charset=utf-8".to_string()),
            body: body.into(),
        }
    }
}

/// Operations the orchestrators need from the remote service
#[async_trait]
pub trait SpiApi: Send + Sync {
    /// Authenticated GET of the identity endpoint using `config`'s credential.
    async fn fetch_identity(&self, config: &EnvironmentConfig) -> Result<ProbeResponse>;

    /// Authenticated GET of `url`, draining the body. Non-success statuses are errors.
    async fn send(&self, config: &EnvironmentConfig, url: &str) -> Result<()>;
}

/// Full identity endpoint URL for an environment
pub fn identity_url(config: &EnvironmentConfig) -> String {
    format!("{}/{}", config.base_url_trimmed(), IDENTITY_PATH)
}
