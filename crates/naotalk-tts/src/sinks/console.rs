//! Console speech sink for dry runs

use crate::error::{TtsError, TtsResult};
use crate::sink::SpeechSink;
use crate::types::SpeakerConfig;
use async_trait::async_trait;
use tracing::debug;

/// Prints utterances to stdout instead of producing audio
/// Useful for exercising the dialogue loop without a voice backend
#[derive(Debug, Clone)]
pub struct ConsoleSink {
    config: SpeakerConfig,
}

impl ConsoleSink {
    pub fn new(config: SpeakerConfig) -> Self {
        Self { config }
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new(SpeakerConfig::default())
    }
}

#[async_trait]
impl SpeechSink for ConsoleSink {
    async fn speak(&mut self, text: &str) -> TtsResult<()> {
        if text.trim().is_empty() {
            return Err(TtsError::InvalidInput("Empty text input".to_string()));
        }
        println!("NAO: {}", text);
        debug!(target: "tts", chars = text.len(), "Utterance printed to console");
        Ok(())
    }

    async fn is_ready(&self) -> bool {
        true
    }

    fn config(&self) -> &SpeakerConfig {
        &self.config
    }
}
