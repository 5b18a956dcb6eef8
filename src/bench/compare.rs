//! Comparison of two tagged runs

use super::result::{BenchmarkResult, Sample};
use crate::error::{BenchError, Result};

/// Arithmetic mean of the recorded samples; missing samples are skipped.
pub fn mean(samples: &[Sample]) -> Option<f64> {
    let recorded: Vec<f64> = samples.iter().flatten().map(|&ns| ns as f64).collect();
    if recorded.is_empty() {
        None
    } else {
        Some(recorded.iter().sum::<f64>() / recorded.len() as f64)
    }
}

/// `(mean2 - mean1) / mean1 * 100`; undefined when `mean1` is zero.
pub fn percentage_diff(mean1: f64, mean2: f64) -> Option<f64> {
    if mean1 == 0.0 {
        None
    } else {
        Some((mean2 - mean1) / mean1 * 100.0)
    }
}

/// Per-request comparison row
#[derive(Debug, Clone, PartialEq)]
pub struct RequestComparison {
    pub name: String,
    pub base_mean_ns: Option<f64>,
    pub target_mean_ns: Option<f64>,
    pub diff_pct: Option<f64>,
}

/// Compare two runs request by request. Both must list the same requests in the same order.
pub fn compare(base: &BenchmarkResult, target: &BenchmarkResult) -> Result<Vec<RequestComparison>> {
    if base.request_names != target.request_names {
        return Err(BenchError::MismatchedRequests {
            base: base.request_names.join(","),
            target: target.request_names.join(","),
        }
        .into());
    }

    Ok(base
        .request_names
        .iter()
        .map(|name| {
            let base_mean_ns = base.series(name).and_then(mean);
            let target_mean_ns = target.series(name).and_then(mean);
            let diff_pct = match (base_mean_ns, target_mean_ns) {
                (Some(m1), Some(m2)) => percentage_diff(m1, m2),
                _ => None,
            };
            RequestComparison {
                name: name.clone(),
                base_mean_ns,
                target_mean_ns,
                diff_pct,
            }
        })
        .collect())
}
