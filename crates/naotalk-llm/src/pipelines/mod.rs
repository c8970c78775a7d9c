//! Built-in inference pipeline implementations

pub mod canned;
#[cfg(feature = "http")]
pub mod http;

// Re-export commonly used pipelines
pub use canned::CannedPipeline;
#[cfg(feature = "http")]
pub use http::{HttpPipeline, HttpPipelineConfig};
