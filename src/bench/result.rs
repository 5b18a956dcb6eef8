//! Benchmark result record and its on-disk shape
//!
//! ```json
//! {
//!   "testDate": "Sun Oct 18 2026",
//!   "testTime": "14:03:12 +0000",
//!   "iteration": 2,
//!   "requests": ["profile", "orders"],
//!   "profile": [81234567, 79012345],
//!   "orders": [120456789, null]
//! }
//! ```
//!
//! Samples are nanoseconds; `null` marks a request that failed.

use std::collections::BTreeMap;

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

/// One sample: elapsed nanoseconds, or `None` for a failed request
pub type Sample = Option<u64>;

/// Response-time series for one benchmark run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkResult {
    #[serde(rename = "testDate")]
    pub date: String,

    #[serde(rename = "testTime")]
    pub time: String,

    #[serde(rename = "iteration")]
    pub iteration_count: u32,

    /// Request names in run order
    #[serde(rename = "requests")]
    pub request_names: Vec<String>,

    /// Series keyed by request name
    #[serde(flatten)]
    pub samples: BTreeMap<String, Vec<Sample>>,
}

impl BenchmarkResult {
    /// Empty result for `request_names`, stamped with `started_at`
    pub fn new<Tz: TimeZone>(
        request_names: Vec<String>,
        iteration_count: u32,
        started_at: &DateTime<Tz>,
    ) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        let samples = request_names
            .iter()
            .map(|name| (name.clone(), Vec::with_capacity(iteration_count as usize)))
            .collect();

        Self {
            date: started_at.format("%a %b %d %Y").to_string(),
            time: started_at.format("%H:%M:%S %z").to_string(),
            iteration_count,
            request_names,
            samples,
        }
    }

    /// Append a sample to `name`'s series
    pub fn record(&mut self, name: &str, sample: Sample) {
        self.samples.entry(name.to_string()).or_default().push(sample);
    }

    /// Series for `name`
    pub fn series(&self, name: &str) -> Option<&[Sample]> {
        self.samples.get(name).map(Vec::as_slice)
    }

    /// Number of failed requests across all series
    pub fn missing_samples(&self) -> usize {
        self.samples
            .values()
            .flat_map(|series| series.iter())
            .filter(|sample| sample.is_none())
            .count()
    }

    /// First request whose series does not hold exactly `iteration_count` samples
    pub fn incomplete_series(&self) -> Option<String> {
        self.request_names.iter().find_map(|name| {
            let len = self.series(name).map_or(0, <[Sample]>::len);
            (len != self.iteration_count as usize).then(|| {
                format!(
                    "request '{}' has {} samples, expected {}",
                    name, len, self.iteration_count
                )
            })
        })
    }
}
