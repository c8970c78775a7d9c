//! Per-session listening configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Words that end the conversation when recognized
pub const DEFAULT_EXIT_KEYWORDS: &[&str] = &["bye", "goodbye", "stop", "quit", "exit", "end"];

/// Configuration for one listening session.
///
/// Supplied by the caller and read-only for the session's lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Overall listening deadline (default: 10000ms)
    pub max_duration_ms: u64,
    /// Silence window that ends the turn once words were heard (default: 3000ms)
    pub silence_timeout_ms: u64,
    /// Delay between recognizer polls (default: 100ms)
    pub poll_interval_ms: u64,
    /// Words that end the conversation when recognized
    pub exit_keywords: Vec<String>,
    /// Extra words unioned into the base vocabulary for this session
    pub extra_vocabulary: Vec<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_duration_ms: 10_000,
            silence_timeout_ms: 3_000,
            poll_interval_ms: 100,
            exit_keywords: DEFAULT_EXIT_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            extra_vocabulary: Vec::new(),
        }
    }
}

impl SessionConfig {
    /// Short session used by the startup listening check: the user is
    /// prompted to say "hello robot", so those words join the vocabulary.
    pub fn listening_check() -> Self {
        Self {
            max_duration_ms: 5_000,
            extra_vocabulary: vec!["hello".to_string(), "robot".to_string()],
            ..Default::default()
        }
    }

    pub fn max_duration(&self) -> Duration {
        Duration::from_millis(self.max_duration_ms)
    }

    pub fn silence_timeout(&self) -> Duration {
        Duration::from_millis(self.silence_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}
