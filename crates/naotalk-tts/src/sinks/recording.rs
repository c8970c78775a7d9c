//! Recording speech sink for tests

use crate::error::{TtsError, TtsResult};
use crate::sink::SpeechSink;
use crate::types::SpeakerConfig;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Captures every utterance instead of producing audio.
///
/// Clones share the recorded lines, so tests can keep a probe handle
/// while the dialogue loop owns the sink.
#[derive(Debug, Clone)]
pub struct RecordingSink {
    config: SpeakerConfig,
    lines: Arc<Mutex<Vec<String>>>,
    fail_speak: bool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self {
            config: SpeakerConfig::default(),
            lines: Arc::new(Mutex::new(Vec::new())),
            fail_speak: false,
        }
    }

    /// Sink whose speak calls always fail
    pub fn failing() -> Self {
        Self {
            fail_speak: true,
            ..Self::new()
        }
    }

    /// Everything spoken so far, in order
    pub fn spoken(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    pub fn spoken_count(&self) -> usize {
        self.lines.lock().unwrap().len()
    }

    /// Whether any recorded line contains the given fragment
    pub fn heard(&self, fragment: &str) -> bool {
        self.lines.lock().unwrap().iter().any(|l| l.contains(fragment))
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SpeechSink for RecordingSink {
    async fn speak(&mut self, text: &str) -> TtsResult<()> {
        if self.fail_speak {
            return Err(TtsError::SynthesisFailed(
                "recording sink configured to fail".to_string(),
            ));
        }
        self.lines.lock().unwrap().push(text.to_string());
        Ok(())
    }

    async fn is_ready(&self) -> bool {
        !self.fail_speak
    }

    fn config(&self) -> &SpeakerConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_recording_sink_captures_lines_in_order() {
        let mut sink = RecordingSink::new();
        let probe = sink.clone();

        sink.speak("Hello there.").await.unwrap();
        sink.speak("How are you?").await.unwrap();

        assert_eq!(probe.spoken(), vec!["Hello there.", "How are you?"]);
        assert!(probe.heard("How are"));
        assert!(!probe.heard("Goodbye"));
    }

    #[tokio::test]
    async fn test_failing_sink_reports_error() {
        let mut sink = RecordingSink::failing();
        assert!(sink.speak("anything").await.is_err());
        assert!(!sink.is_ready().await);
        assert_eq!(sink.spoken_count(), 0);
    }
}
