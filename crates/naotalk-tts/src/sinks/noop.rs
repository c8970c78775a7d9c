//! No-operation speech sink

use crate::error::TtsResult;
use crate::sink::SpeechSink;
use crate::types::SpeakerConfig;
use async_trait::async_trait;

/// Discards every utterance
#[derive(Debug, Clone, Default)]
pub struct NoopSink {
    config: SpeakerConfig,
}

impl NoopSink {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SpeechSink for NoopSink {
    async fn speak(&mut self, _text: &str) -> TtsResult<()> {
        Ok(())
    }

    async fn is_ready(&self) -> bool {
        true
    }

    fn config(&self) -> &SpeakerConfig {
        &self.config
    }
}
