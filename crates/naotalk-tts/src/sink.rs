//! Speech sink abstraction

use crate::error::TtsResult;
use crate::types::SpeakerConfig;
use async_trait::async_trait;

/// Voice output interface
///
/// Implementations render one utterance at a time and return once the
/// audio has been delivered. The conversation loop applies the settle
/// delay from [`SpeakerConfig`] after each call, so sinks do not sleep
/// themselves.
#[async_trait]
pub trait SpeechSink: Send + Sync {
    /// Render the utterance
    async fn speak(&mut self, text: &str) -> TtsResult<()>;

    /// Check if the sink can currently produce audio
    async fn is_ready(&self) -> bool;

    /// Get current configuration
    fn config(&self) -> &SpeakerConfig;
}
