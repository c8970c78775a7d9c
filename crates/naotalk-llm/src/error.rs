//! Error types for model inference

use thiserror::Error;

/// Errors reported by inference backends
#[derive(Debug, Error)]
pub enum LlmError {
    /// Backend is not reachable or not configured
    #[error("Inference backend not available: {0}")]
    NotAvailable(String),

    /// The generation request itself failed
    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    /// The backend answered with something we could not use
    #[error("Malformed backend response: {0}")]
    MalformedResponse(String),

    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type for inference operations
pub type LlmResult<T> = Result<T, LlmError>;
