//! eSpeak-backed speech sink for naotalk
//!
//! Renders utterances by spawning `espeak` (or `espeak-ng`) and waiting
//! for the audio to finish playing, so the recognizer does not pick up
//! the robot's own voice on the next turn.

use async_trait::async_trait;
use naotalk_tts::{SpeakerConfig, SpeechSink, TtsError, TtsResult};
use tokio::process::Command;
use tracing::{debug, warn};

/// Speech sink backed by the eSpeak command-line synthesizer
pub struct EspeakSink {
    config: SpeakerConfig,
    command: String,
}

impl EspeakSink {
    /// Probe for an installed synthesizer and build the sink.
    ///
    /// Prefers `espeak`, falls back to `espeak-ng`.
    pub async fn new(config: SpeakerConfig) -> TtsResult<Self> {
        let command = Self::find_espeak_command().await.ok_or_else(|| {
            TtsError::BackendNotAvailable(
                "eSpeak not found. Please install espeak or espeak-ng.".to_string(),
            )
        })?;
        debug!(target: "tts", %command, "eSpeak sink ready");
        Ok(Self { config, command })
    }

    async fn find_espeak_command() -> Option<String> {
        for candidate in ["espeak", "espeak-ng"] {
            if Command::new(candidate)
                .arg("--version")
                .output()
                .await
                .is_ok()
            {
                return Some(candidate.to_string());
            }
        }
        None
    }

    /// Map the speaker config onto eSpeak's flags.
    ///
    /// eSpeak takes pitch 0-100 (50 is normal) and amplitude 0-200.
    fn build_args(&self, text: &str) -> Vec<String> {
        let mut args = Vec::new();

        if let Some(voice) = &self.config.voice {
            args.push("-v".to_string());
            args.push(voice.clone());
        }

        let rate = self.config.speech_rate.unwrap_or(180);
        args.push("-s".to_string());
        args.push(rate.to_string());

        let pitch = self.config.pitch.unwrap_or(1.0);
        let pitch_value = ((pitch * 50.0) as u32).min(100);
        args.push("-p".to_string());
        args.push(pitch_value.to_string());

        let volume = self.config.volume.unwrap_or(0.8);
        let volume_value = ((volume * 200.0) as u32).min(200);
        args.push("-a".to_string());
        args.push(volume_value.to_string());

        args.push(text.to_string());
        args
    }
}

#[async_trait]
impl SpeechSink for EspeakSink {
    async fn speak(&mut self, text: &str) -> TtsResult<()> {
        if text.trim().is_empty() {
            return Err(TtsError::InvalidInput("Empty text input".to_string()));
        }

        let args = self.build_args(text);
        debug!(target: "tts", command = %self.command, chars = text.len(), "Rendering utterance");

        let output = Command::new(&self.command).args(&args).output().await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(target: "tts", %stderr, "eSpeak exited with failure");
            return Err(TtsError::SynthesisFailed(format!(
                "eSpeak error: {}",
                stderr.trim()
            )));
        }

        Ok(())
    }

    async fn is_ready(&self) -> bool {
        Command::new(&self.command)
            .arg("--version")
            .output()
            .await
            .is_ok()
    }

    fn config(&self) -> &SpeakerConfig {
        &self.config
    }
}
