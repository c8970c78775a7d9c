use config::{Config, Environment, File};
use naotalk_dialogue::SessionConfig;
use naotalk_foundation::AppError;
use naotalk_llm::GenerationParams;
use naotalk_tts::SpeakerConfig;
use serde::Deserialize;
use std::path::Path;

pub mod chat;

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ListenSettings {
    pub max_duration_ms: u64,
    pub silence_timeout_ms: u64,
    pub poll_interval_ms: u64,
    pub exit_keywords: Vec<String>,
}

impl Default for ListenSettings {
    fn default() -> Self {
        let session = SessionConfig::default();
        Self {
            max_duration_ms: session.max_duration_ms,
            silence_timeout_ms: session.silence_timeout_ms,
            poll_interval_ms: session.poll_interval_ms,
            exit_keywords: session.exit_keywords,
        }
    }
}

impl ListenSettings {
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            max_duration_ms: self.max_duration_ms,
            silence_timeout_ms: self.silence_timeout_ms,
            poll_interval_ms: self.poll_interval_ms,
            exit_keywords: self.exit_keywords.clone(),
            extra_vocabulary: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SpeechSettings {
    /// Voice backend: "console", "espeak", or "noop"
    pub backend: String,
    pub enabled: bool,
    pub voice: Option<String>,
    pub speech_rate: Option<u32>,
    pub pitch: Option<f32>,
    pub volume: Option<f32>,
    pub settle_delay_ms: u64,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        let speaker = SpeakerConfig::default();
        Self {
            backend: "console".to_string(),
            enabled: speaker.enabled,
            voice: speaker.voice,
            speech_rate: speaker.speech_rate,
            pitch: speaker.pitch,
            volume: speaker.volume,
            settle_delay_ms: speaker.settle_delay_ms,
        }
    }
}

impl SpeechSettings {
    pub fn speaker_config(&self) -> SpeakerConfig {
        SpeakerConfig {
            enabled: self.enabled,
            voice: self.voice.clone(),
            speech_rate: self.speech_rate,
            pitch: self.pitch,
            volume: self.volume,
            settle_delay_ms: self.settle_delay_ms,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Inference backend: "canned", or "http" with the `http-llm` feature
    pub backend: String,
    pub system_prompt: String,
    pub max_new_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    /// Chat-completions server, used by the http backend
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout_ms: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        let params = GenerationParams::default();
        Self {
            backend: "canned".to_string(),
            system_prompt: naotalk_llm::DEFAULT_SYSTEM_PROMPT.to_string(),
            max_new_tokens: params.max_new_tokens,
            temperature: params.temperature,
            top_p: params.top_p,
            base_url: "http://localhost:8080".to_string(),
            model: "tinyllama-1.1b-chat".to_string(),
            api_key: None,
            timeout_ms: 30_000,
        }
    }
}

impl LlmSettings {
    pub fn generation_params(&self) -> GenerationParams {
        GenerationParams {
            max_new_tokens: self.max_new_tokens,
            temperature: self.temperature,
            top_p: self.top_p,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ChatSettings {
    /// Word source backend: "noop" or "demo"
    pub source: String,
    /// Run the listening self-check once at startup
    pub startup_check: bool,
    /// Pause after each completed turn
    pub turn_pacing_ms: u64,
    /// Pause accompanying the spoken speech-system reset notice
    pub reset_pause_ms: u64,
    /// Stop after this many turns; unlimited when absent
    pub max_turns: Option<u64>,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            source: "noop".to_string(),
            startup_check: true,
            turn_pacing_ms: 500,
            reset_pause_ms: 1_000,
            max_turns: None,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub listen: ListenSettings,
    pub speech: SpeechSettings,
    pub llm: LlmSettings,
    pub chat: ChatSettings,
}

impl Settings {
    /// Load settings from a specific config file path (for tests)
    pub fn from_path(config_path: impl AsRef<Path>) -> Result<Self, AppError> {
        let builder = Config::builder()
            .add_source(File::from(config_path.as_ref()).required(true))
            .add_source(
                Environment::with_prefix("NAOTALK")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(" "),
            );

        let config = builder
            .build()
            .map_err(|e| AppError::config(format!("Failed to build config: {}", e)))?;
        let mut settings: Settings = config
            .try_deserialize()
            .map_err(|e| AppError::config(format!("Failed to deserialize settings: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn new() -> Result<Self, AppError> {
        let mut builder = Config::builder();

        let config_path = Path::new("config/default.toml");
        if config_path.exists() {
            tracing::info!("Loading configuration from: {}", config_path.display());
            builder = builder.add_source(File::from(config_path).required(true));
        } else {
            tracing::warn!(
                "No configuration file at 'config/default.toml'. Using defaults and environment variables."
            );
        }

        builder = builder.add_source(
            Environment::with_prefix("NAOTALK")
                .prefix_separator("_")
                .separator("__")
                .list_separator(" "),
        );

        let config = builder
            .build()
            .map_err(|e| AppError::config(format!("Failed to build config: {}", e)))?;
        let mut settings: Settings = config
            .try_deserialize()
            .map_err(|e| AppError::config(format!("Failed to deserialize settings: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Clamp recoverable values with a warning; reject fatal ones.
    pub fn validate(&mut self) -> Result<(), AppError> {
        let mut errors = Vec::new();

        if self.listen.max_duration_ms == 0 {
            errors.push("listen.max_duration_ms must be >0".to_string());
        }
        if self.listen.poll_interval_ms == 0 {
            errors.push("listen.poll_interval_ms must be >0".to_string());
        }
        if self.listen.silence_timeout_ms == 0 {
            errors.push("listen.silence_timeout_ms must be >0".to_string());
        }
        if self.listen.exit_keywords.is_empty() {
            tracing::warn!("Empty listen.exit_keywords. Restoring the default set.");
            self.listen.exit_keywords = ListenSettings::default().exit_keywords;
        }
        if self.listen.silence_timeout_ms >= self.listen.max_duration_ms
            && self.listen.max_duration_ms > 0
        {
            tracing::warn!(
                "silence_timeout_ms {} >= max_duration_ms {}. Silence detection will never fire before the deadline.",
                self.listen.silence_timeout_ms,
                self.listen.max_duration_ms
            );
        }

        if !["console", "espeak", "noop"].contains(&self.speech.backend.to_lowercase().as_str()) {
            tracing::warn!(
                "Invalid speech.backend '{}'. Defaulting to 'console'.",
                self.speech.backend
            );
            self.speech.backend = "console".to_string();
        }
        if let Some(rate) = self.speech.speech_rate {
            if !(80..=450).contains(&rate) {
                tracing::warn!("Invalid speech_rate {}. Clamping to 180.", rate);
                self.speech.speech_rate = Some(180);
            }
        }

        if !["canned", "http"].contains(&self.llm.backend.to_lowercase().as_str()) {
            tracing::warn!(
                "Invalid llm.backend '{}'. Defaulting to 'canned'.",
                self.llm.backend
            );
            self.llm.backend = "canned".to_string();
        }
        if self.llm.max_new_tokens == 0 {
            errors.push("llm.max_new_tokens must be >0".to_string());
        }
        if self.llm.temperature <= 0.0 || self.llm.temperature > 2.0 {
            tracing::warn!("Invalid temperature {}. Clamping to 0.6.", self.llm.temperature);
            self.llm.temperature = 0.6;
        }
        if self.llm.top_p <= 0.0 || self.llm.top_p > 1.0 {
            tracing::warn!("Invalid top_p {}. Clamping to 0.9.", self.llm.top_p);
            self.llm.top_p = 0.9;
        }

        if !["noop", "demo"].contains(&self.chat.source.to_lowercase().as_str()) {
            tracing::warn!(
                "Invalid chat.source '{}'. Defaulting to 'noop'.",
                self.chat.source
            );
            self.chat.source = "noop".to_string();
        }

        if !errors.is_empty() {
            return Err(AppError::config(format!(
                "Critical config validation errors: {:?}",
                errors
            )));
        }

        tracing::info!("Configuration validation completed successfully.");
        Ok(())
    }
}
