//! Chromium-backed login provider
//!
//! Opens a visible browser window on the environment's base URL so the
//! operator can sign in, then polls the page's cookies until a session cookie
//! appears. The cookie jar is returned as a `cookie` header value.

use std::time::{Duration, Instant};

use anyhow::{Context, anyhow, bail};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page;
use futures::StreamExt;
use log::{debug, info};

use super::refresher::LoginProvider;
use crate::error::{AuthError, Result};

/// Time given to the single-page app to load before cookies are inspected
const APP_LOADING_TIME: Duration = Duration::from_millis(4500);

/// Interval between cookie polls
const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Default time the operator has to complete the login
const DEFAULT_LOGIN_TIMEOUT: Duration = Duration::from_secs(180);

/// Substring (case-insensitive) identifying the session cookie by name
const DEFAULT_SESSION_MARKER: &str = "session";

/// Interactive login through a headed Chromium instance
pub struct ChromeLogin {
    login_timeout: Duration,
    session_marker: String,
}

impl ChromeLogin {
    pub fn new() -> Self {
        Self {
            login_timeout: DEFAULT_LOGIN_TIMEOUT,
            session_marker: DEFAULT_SESSION_MARKER.to_string(),
        }
    }

    /// Give up if no session cookie appears within `timeout`
    pub fn with_login_timeout(mut self, timeout: Duration) -> Self {
        self.login_timeout = timeout;
        self
    }

    async fn login(&self, base_url: &str) -> anyhow::Result<String> {
        let config = BrowserConfig::builder()
            .with_head()
            .build()
            .map_err(|e| anyhow!("{}", e))?;

        info!("Launching browser for login at {}", base_url);
        let (mut browser, mut handler) = Browser::launch(config)
            .await
            .context("Failed to launch browser")?;

        let handle = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let result = self.wait_for_session(&browser, base_url).await;

        if let Err(e) = browser.close().await {
            debug!("Browser did not close cleanly: {}", e);
        }
        handle.abort();

        result
    }

    async fn wait_for_session(&self, browser: &Browser, base_url: &str) -> anyhow::Result<String> {
        let page: Page = browser
            .new_page(base_url)
            .await
            .context("Failed to open login page")?;

        tokio::time::sleep(APP_LOADING_TIME).await;

        let started = Instant::now();
        loop {
            let cookies = page.get_cookies().await.context("Failed to read cookies")?;
            let pairs: Vec<(String, String)> = cookies
                .into_iter()
                .map(|cookie| (cookie.name, cookie.value))
                .collect();

            if let Some(header) = session_cookie_header(&pairs, &self.session_marker) {
                return Ok(header);
            }

            if started.elapsed() >= self.login_timeout {
                bail!(
                    "no session cookie after {}s; was the login completed?",
                    self.login_timeout.as_secs()
                );
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
}

impl Default for ChromeLogin {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LoginProvider for ChromeLogin {
    async fn obtain_cookie(&self, base_url: &str) -> Result<String> {
        self.login(base_url)
            .await
            .map_err(|e| AuthError::RefreshFailed(format!("{:#}", e)).into())
    }
}

/// Join the cookie jar into a header value once a session cookie is present.
fn session_cookie_header(cookies: &[(String, String)], marker: &str) -> Option<String> {
    let marker = marker.to_ascii_lowercase();
    let has_session = cookies
        .iter()
        .any(|(name, value)| name.to_ascii_lowercase().contains(&marker) && !value.is_empty());
    if !has_session {
        return None;
    }

    Some(
        cookies
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("; "),
    )
}
