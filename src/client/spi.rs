//! reqwest implementation of [`SpiApi`]

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client as HttpClient;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, COOKIE};

use super::{ProbeResponse, SpiApi, identity_url};
use crate::config::EnvironmentConfig;
use crate::error::{ApiError, ConfigError, Result};

/// Per-request timeout applied by the HTTP client
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// HTTP client for the SPI service
pub struct SpiClient {
    http: HttpClient,
}

impl SpiClient {
    /// Create a new client
    pub fn new() -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self { http })
    }

    /// Build an authenticated GET for `url`
    fn get(&self, config: &EnvironmentConfig, url: &str) -> reqwest::RequestBuilder {
        let mut request = self
            .http
            .get(url)
            .header(AUTHORIZATION, format!("Basic {}", config.auth_secret.trim()));
        if let Some(cookie) = config.cookie() {
            request = request.header(COOKIE, cookie);
        }
        request
    }
}

/// Reject configs that cannot address the service at all.
fn require_base_url(config: &EnvironmentConfig) -> Result<()> {
    if config.base_url.trim().is_empty() {
        return Err(ConfigError::Incomplete {
            env: config.name.clone(),
            fields: vec!["SPI_URL"],
        }
        .into());
    }
    Ok(())
}

#[async_trait]
impl SpiApi for SpiClient {
    async fn fetch_identity(&self, config: &EnvironmentConfig) -> Result<ProbeResponse> {
        require_base_url(config)?;
        let url = identity_url(config);
        debug!("Probing credential at {}", url);

        let response = self.get(config, &url).send().await.map_err(ApiError::from)?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to read response: {}", e)))?;

        Ok(ProbeResponse {
            status,
            content_type,
            body,
        })
    }

    async fn send(&self, config: &EnvironmentConfig, url: &str) -> Result<()> {
        require_base_url(config)?;
        let response = self.get(config, url).send().await.map_err(ApiError::from)?;
        let status = response.status();

        // Timing covers the full body, not just the headers
        response
            .bytes()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to read response: {}", e)))?;

        if status.is_success() {
            Ok(())
        } else {
            Err(ApiError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            }
            .into())
        }
    }
}
