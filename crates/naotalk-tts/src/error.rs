//! Error types for speech output

use thiserror::Error;

/// Speech output error types
#[derive(Error, Debug)]
pub enum TtsError {
    /// Backend is not available or not installed
    #[error("Speech backend not available: {0}")]
    BackendNotAvailable(String),

    /// Rendering the utterance failed
    #[error("Speech synthesis failed: {0}")]
    SynthesisFailed(String),

    /// Invalid text input
    #[error("Invalid text input: {0}")]
    InvalidInput(String),

    /// IO error (process spawning, device access, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for speech output operations
pub type TtsResult<T> = Result<T, TtsError>;
