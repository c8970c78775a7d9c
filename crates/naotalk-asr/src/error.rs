//! Errors reported by word-recognition backends

use thiserror::Error;

/// Errors that can occur when talking to a recognizer backend
#[derive(Debug, Error)]
pub enum AsrError {
    #[error("Recognizer not available: {reason}")]
    NotAvailable { reason: String },

    #[error("Pause request failed: {0}")]
    PauseFailed(String),

    #[error("Vocabulary update failed: {0}")]
    VocabularyRejected(String),

    #[error("Subscribe failed for tag '{tag}': {reason}")]
    SubscribeFailed { tag: String, reason: String },

    #[error("Unsubscribe failed for tag '{tag}': {reason}")]
    UnsubscribeFailed { tag: String, reason: String },

    #[error("Event read failed: {0}")]
    ReadFailed(String),

    #[error("Backend error: {0}")]
    Backend(Box<dyn std::error::Error + Send + Sync>),
}

impl From<Box<dyn std::error::Error + Send + Sync>> for AsrError {
    fn from(error: Box<dyn std::error::Error + Send + Sync>) -> Self {
        AsrError::Backend(error)
    }
}
