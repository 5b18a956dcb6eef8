//! Shared CLI argument types

mod global;
mod options;

pub use global::GlobalOptions;
pub use options::RunOptions;
