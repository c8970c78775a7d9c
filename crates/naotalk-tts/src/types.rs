//! Core types for speech output

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Speech output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeakerConfig {
    /// Enable/disable speech output
    pub enabled: bool,
    /// Voice to use, backend-specific identifier
    pub voice: Option<String>,
    /// Speaking rate (words per minute, typically 100-300)
    pub speech_rate: Option<u32>,
    /// Voice pitch (0.0-2.0, 1.0 is normal)
    pub pitch: Option<f32>,
    /// Volume (0.0-1.0)
    pub volume: Option<f32>,
    /// Pause after each utterance so the recognizer does not pick up
    /// the robot's own trailing audio (default: 200ms)
    pub settle_delay_ms: u64,
}

impl Default for SpeakerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            voice: None,
            speech_rate: Some(180),
            pitch: Some(1.0),
            volume: Some(0.8),
            settle_delay_ms: 200,
        }
    }
}

impl SpeakerConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}
