//! No-operation word source for running without a recognizer

use crate::error::AsrError;
use crate::source::WordEventSource;
use crate::types::WordEvent;
use async_trait::async_trait;
use tracing::debug;

/// A null recognizer that never hears anything
/// Useful for wiring up the dialogue loop with no speech hardware
#[derive(Debug, Clone, Default)]
pub struct NoopWordSource;

impl NoopWordSource {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl WordEventSource for NoopWordSource {
    async fn pause(&mut self, _paused: bool) -> Result<(), AsrError> {
        Ok(())
    }

    async fn set_vocabulary(
        &mut self,
        _words: &[String],
        _word_spotting: bool,
    ) -> Result<(), AsrError> {
        Ok(())
    }

    async fn subscribe(&mut self, tag: &str) -> Result<(), AsrError> {
        debug!(target: "asr", tag, "Noop source subscribed");
        Ok(())
    }

    async fn unsubscribe(&mut self, tag: &str) -> Result<(), AsrError> {
        debug!(target: "asr", tag, "Noop source unsubscribed");
        Ok(())
    }

    async fn latest_event(&mut self) -> Result<Option<WordEvent>, AsrError> {
        // Never hears anything
        Ok(None)
    }

    async fn clear_pending(&mut self) -> Result<(), AsrError> {
        Ok(())
    }
}
