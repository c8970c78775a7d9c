//! Canned pipeline for testing and dry runs
//!
//! Serves scripted replies in order and can be told to fail, so the
//! conversation loop can be exercised without a model attached.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::debug;

use crate::error::{LlmError, LlmResult};
use crate::history::ChatHistory;
use crate::pipeline::InferencePipeline;

/// Replies with a fixed script, one line per generate call.
///
/// Clones share the reply cursor and call counter, so tests can keep a
/// probe handle while the conversation loop owns the pipeline.
#[derive(Debug, Clone)]
pub struct CannedPipeline {
    replies: Arc<Vec<String>>,
    cursor: Arc<AtomicUsize>,
    calls: Arc<AtomicUsize>,
    fail_generate: bool,
}

impl CannedPipeline {
    pub fn new(replies: Vec<String>) -> Self {
        Self {
            replies: Arc::new(replies),
            cursor: Arc::new(AtomicUsize::new(0)),
            calls: Arc::new(AtomicUsize::new(0)),
            fail_generate: false,
        }
    }

    /// Pipeline that always answers with the same line
    pub fn repeating(reply: impl Into<String>) -> Self {
        Self::new(vec![reply.into()])
    }

    /// Pipeline whose generate calls always fail
    pub fn failing() -> Self {
        Self {
            fail_generate: true,
            ..Self::new(Vec::new())
        }
    }

    pub fn generate_calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl InferencePipeline for CannedPipeline {
    async fn generate(&self, history: &ChatHistory) -> LlmResult<String> {
        self.calls.fetch_add(1, Ordering::Relaxed);

        if self.fail_generate {
            return Err(LlmError::GenerationFailed(
                "canned pipeline configured to fail".to_string(),
            ));
        }

        if self.replies.is_empty() {
            return Ok(String::new());
        }

        // Past the end of the script the last line repeats
        let index = self
            .cursor
            .fetch_add(1, Ordering::Relaxed)
            .min(self.replies.len() - 1);
        let reply = self.replies[index].clone();

        debug!(
            target: "llm",
            prompt = ?history.last_user_message(),
            reply = %reply,
            "Serving canned reply"
        );
        Ok(reply)
    }

    async fn is_ready(&self) -> bool {
        !self.fail_generate
    }
}
