//! Benchmark orchestrator
//!
//! Iterations form the outer loop and endpoints the inner loop, so successive
//! samples of one endpoint are separated by a pass over every other endpoint.
//! Each request is timed with a monotonic clock. A failed request becomes a
//! missing sample and the run carries on.

use std::time::Instant;

use chrono::Local;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};

use super::result::{BenchmarkResult, Sample};
use crate::client::SpiApi;
use crate::config::EnvironmentConfig;
use crate::config::request::BenchmarkRequestSpec;
use crate::deadline::Deadline;
use crate::error::{BenchError, Result};

/// Runs timed requests against a fixed endpoint list
pub struct BenchmarkOrchestrator<'a> {
    api: &'a dyn SpiApi,
    deadline: Deadline,
    progress: bool,
}

impl<'a> BenchmarkOrchestrator<'a> {
    pub fn new(api: &'a dyn SpiApi, deadline: Deadline) -> Self {
        Self {
            api,
            deadline,
            progress: false,
        }
    }

    /// Draw a progress bar on stderr while running
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    /// Send `iteration_count` rounds of requests over `spec` and collect the timings.
    pub async fn run(
        &self,
        config: &EnvironmentConfig,
        spec: &BenchmarkRequestSpec,
        iteration_count: u32,
    ) -> Result<BenchmarkResult> {
        if iteration_count == 0 {
            return Err(BenchError::InvalidIterations.into());
        }

        let targets: Vec<(String, String)> = spec
            .endpoints()
            .iter()
            .map(|endpoint| (endpoint.name.clone(), endpoint.url(config)))
            .collect();

        info!(
            "Benchmarking {} endpoints x {} iterations against '{}'",
            targets.len(),
            iteration_count,
            config.name
        );

        let mut result = BenchmarkResult::new(spec.names(), iteration_count, &Local::now());
        let bar = self.progress_bar(targets.len() as u64 * u64::from(iteration_count));

        for iteration in 1..=iteration_count {
            for (name, url) in &targets {
                let sample = self.time_request(config, url).await;
                debug!("[{}/{}] {} -> {:?}", iteration, iteration_count, name, sample);
                result.record(name, sample);
                bar.inc(1);
            }
        }
        bar.finish_and_clear();

        let missing = result.missing_samples();
        if missing > 0 {
            warn!("{} request(s) failed and were recorded as missing samples", missing);
        }
        Ok(result)
    }

    async fn time_request(&self, config: &EnvironmentConfig, url: &str) -> Sample {
        if self.deadline.is_expired() {
            return None;
        }

        let started = Instant::now();
        match self
            .deadline
            .run("sending benchmark request", self.api.send(config, url))
            .await
        {
            Ok(()) => Some(u64::try_from(started.elapsed().as_nanos()).unwrap_or(u64::MAX)),
            Err(e) => {
                warn!("Request to {} failed: {}", url, e);
                None
            }
        }
    }

    fn progress_bar(&self, total: u64) -> ProgressBar {
        if !self.progress {
            return ProgressBar::hidden();
        }

        let bar = ProgressBar::new(total);
        if let Ok(style) =
            ProgressStyle::with_template("{spinner} [{elapsed_precise}] {bar:40} {pos}/{len} requests")
        {
            bar.set_style(style);
        }
        bar
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockSpiClient;
    use crate::error::Error;

    fn config() -> EnvironmentConfig {
        serde_json::from_str(
            r#"{ "ENV": "dev", "PARTNER_ID": "p", "AUTH": "a", "COOKIE": "c", "SPI_URL": "https://api.example" }"#,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_names_and_sample_counts() {
        let api = MockSpiClient::new();
        let spec = BenchmarkRequestSpec::from_entries(&["profile", "orders"]).unwrap();

        let result = BenchmarkOrchestrator::new(&api, Deadline::none())
            .run(&config(), &spec, 2)
            .await
            .unwrap();

        assert_eq!(result.request_names, vec!["profile", "orders"]);
        assert_eq!(result.iteration_count, 2);
        assert_eq!(result.series("profile").unwrap().len(), 2);
        assert_eq!(result.series("orders").unwrap().len(), 2);
        assert!(result.incomplete_series().is_none());
    }

    #[tokio::test]
    async fn test_requests_are_interleaved() {
        let api = MockSpiClient::new();
        let spec = BenchmarkRequestSpec::from_entries(&["profile", "orders"]).unwrap();

        BenchmarkOrchestrator::new(&api, Deadline::none())
            .run(&config(), &spec, 2)
            .await
            .unwrap();

        let profile = "https://api.example/ethernet/v1/profile";
        let orders = "https://api.example/ethernet/v1/orders/eaccess";
        assert_eq!(api.sent_urls().await, vec![profile, orders, profile, orders]);
    }

    #[tokio::test]
    async fn test_failed_request_is_missing_sample() {
        let api = MockSpiClient::new()
            .failing("https://api.example/ethernet/v1/orders/eaccess")
            .await;
        let spec = BenchmarkRequestSpec::from_entries(&["profile", "orders"]).unwrap();

        let result = BenchmarkOrchestrator::new(&api, Deadline::none())
            .run(&config(), &spec, 3)
            .await
            .unwrap();

        assert_eq!(result.series("orders").unwrap(), &[None::<u64>, None, None]);
        assert!(result.series("profile").unwrap().iter().all(Option::is_some));
        assert_eq!(api.call_counts().await.send, 6);
    }

    #[tokio::test]
    async fn test_zero_iterations_rejected_before_requests() {
        let api = MockSpiClient::new();
        let spec = BenchmarkRequestSpec::from_entries(&["profile"]).unwrap();

        let result = BenchmarkOrchestrator::new(&api, Deadline::none())
            .run(&config(), &spec, 0)
            .await;

        assert!(matches!(result, Err(Error::Bench(BenchError::InvalidIterations))));
        assert_eq!(api.call_counts().await.total(), 0);
    }

    #[tokio::test]
    async fn test_expired_deadline_keeps_series_length() {
        let api = MockSpiClient::new();
        let spec = BenchmarkRequestSpec::from_entries(&["profile", "services"]).unwrap();
        let deadline = Deadline::after(std::time::Duration::ZERO);

        let result = BenchmarkOrchestrator::new(&api, deadline)
            .run(&config(), &spec, 2)
            .await
            .unwrap();

        assert!(result.incomplete_series().is_none());
        assert_eq!(result.missing_samples(), 4);
        assert_eq!(api.call_counts().await.send, 0);
    }
}
