//! Timed benchmark runs and the tagged-run registry
//!
//! - [`orchestrator`] sends the timed requests and builds a [`BenchmarkResult`]
//! - [`registry`] checks tags for collisions and persists results
//! - [`compare`] computes per-endpoint means and percentage differences

pub mod compare;
pub mod orchestrator;
pub mod registry;
pub mod result;

pub use compare::{RequestComparison, compare, mean, percentage_diff};
pub use orchestrator::BenchmarkOrchestrator;
pub use registry::{RunRegistry, TagDecision, register_tag};
pub use result::BenchmarkResult;
