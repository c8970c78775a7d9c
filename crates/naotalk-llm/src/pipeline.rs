//! Inference backend interface

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::LlmResult;
use crate::history::ChatHistory;

/// Sampling parameters for one generation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Upper bound on generated tokens (default: 80)
    pub max_new_tokens: u32,
    /// Sampling temperature (default: 0.6)
    pub temperature: f32,
    /// Nucleus sampling cutoff (default: 0.9)
    pub top_p: f32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_new_tokens: 80,
            temperature: 0.6,
            top_p: 0.9,
        }
    }
}

/// Text-generation backend.
///
/// Takes the conversation so far and returns the model's raw reply. The
/// caller owns the history and shapes the reply for speech; pipelines do
/// neither.
#[async_trait]
pub trait InferencePipeline: Send + Sync {
    /// Generate a reply to the conversation
    async fn generate(&self, history: &ChatHistory) -> LlmResult<String>;

    /// Check if the backend can currently serve requests
    async fn is_ready(&self) -> bool;
}
