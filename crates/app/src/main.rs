use anyhow::{anyhow, Result};
use clap::Parser;
use naotalk::chat::{ChatOptions, ConversationLoop};
use naotalk::Settings;
use naotalk_asr::sources::{NoopWordSource, ScriptedWordSource};
use naotalk_asr::{WordEvent, WordEventSource};
use naotalk_dialogue::DialogueTurnController;
use naotalk_foundation::ShutdownHandler;
use naotalk_llm::pipelines::CannedPipeline;
use naotalk_llm::{ChatHistory, InferencePipeline};
use naotalk_telemetry::DialogueMetrics;
use naotalk_tts::sinks::{ConsoleSink, NoopSink};
use naotalk_tts::SpeechSink;
use naotalk_tts_espeak::EspeakSink;
use std::path::PathBuf;
use std::time::Duration;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::writer::MakeWriterExt;

#[derive(Parser, Debug)]
#[command(name = "naotalk")]
#[command(about = "Spoken-dialogue loop for a NAOqi-style robot")]
struct Cli {
    /// Settings file (default: config/default.toml)
    #[arg(long, env = "NAOTALK_CONFIG")]
    config: Option<PathBuf>,

    /// Word source backend: noop | demo
    #[arg(long, env = "NAOTALK_SOURCE")]
    source: Option<String>,

    /// Speech backend: console | espeak | noop
    #[arg(long, env = "NAOTALK_TTS")]
    tts: Option<String>,

    /// Inference backend: canned | http
    #[arg(long, env = "NAOTALK_LLM")]
    llm: Option<String>,

    /// Stop after this many turns
    #[arg(long)]
    turns: Option<u64>,

    /// Skip the startup listening self-check
    #[arg(long)]
    no_startup_check: bool,
}

fn init_logging() -> Result<()> {
    std::fs::create_dir_all("logs")?;
    let file_appender = RollingFileAppender::new(Rotation::DAILY, "logs", "naotalk.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_writer(std::io::stdout.and(non_blocking_file))
        .with_env_filter(log_level)
        .init();
    std::mem::forget(guard);
    Ok(())
}

fn build_source(kind: &str) -> Result<Box<dyn WordEventSource>> {
    match kind {
        "noop" => Ok(Box::new(NoopWordSource::new())),
        // Scripted walkthrough for running the loop without a recognizer.
        // Every turn replays the same capture, so bound the run with
        // --turns or stop it with Ctrl+C.
        "demo" => Ok(Box::new(ScriptedWordSource::with_timeline(vec![
            (Duration::from_millis(800), WordEvent::new("hello", 0.92)),
            (Duration::from_millis(1_500), WordEvent::new("robot", 0.88)),
        ]))),
        other => Err(anyhow!("Unknown word source '{}'", other)),
    }
}

async fn build_sink(settings: &Settings, kind: &str) -> Result<Box<dyn SpeechSink>> {
    let speaker = settings.speech.speaker_config();
    match kind {
        "console" => Ok(Box::new(ConsoleSink::new(speaker))),
        "noop" => Ok(Box::new(NoopSink::new())),
        "espeak" => match EspeakSink::new(speaker.clone()).await {
            Ok(sink) => Ok(Box::new(sink)),
            Err(e) => {
                tracing::warn!(error = %e, "eSpeak unavailable, falling back to console output");
                Ok(Box::new(ConsoleSink::new(speaker)))
            }
        },
        other => Err(anyhow!("Unknown speech backend '{}'", other)),
    }
}

#[cfg_attr(not(feature = "http-llm"), allow(unused_variables))]
fn build_pipeline(settings: &Settings, kind: &str) -> Result<Box<dyn InferencePipeline>> {
    match kind {
        "canned" => Ok(Box::new(CannedPipeline::new(vec![
            "Hello! It is nice to meet you.".to_string(),
            "That sounds interesting. Tell me more.".to_string(),
            "I enjoy talking with you.".to_string(),
        ]))),
        #[cfg(feature = "http-llm")]
        "http" => {
            let config = naotalk_llm::pipelines::HttpPipelineConfig {
                base_url: settings.llm.base_url.clone(),
                model: settings.llm.model.clone(),
                api_key: settings.llm.api_key.clone(),
                timeout_ms: settings.llm.timeout_ms,
                params: settings.llm.generation_params(),
            };
            Ok(Box::new(naotalk_llm::pipelines::HttpPipeline::new(config)?))
        }
        #[cfg(not(feature = "http-llm"))]
        "http" => Err(anyhow!(
            "The http inference backend requires building with the 'http-llm' feature"
        )),
        other => Err(anyhow!("Unknown inference backend '{}'", other)),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;
    tracing::info!("Starting naotalk");

    let cli = Cli::parse();
    let settings = match &cli.config {
        Some(path) => Settings::from_path(path),
        None => Settings::new(),
    }?;

    let source_kind = cli.source.as_deref().unwrap_or(&settings.chat.source);
    let tts_kind = cli.tts.as_deref().unwrap_or(&settings.speech.backend);
    let llm_kind = cli.llm.as_deref().unwrap_or(&settings.llm.backend);
    tracing::info!(
        source = source_kind,
        tts = tts_kind,
        llm = llm_kind,
        "Backends selected"
    );

    let source = build_source(source_kind)?;
    let sink = build_sink(&settings, tts_kind).await?;
    let pipeline = build_pipeline(&settings, llm_kind)?;

    let handler = ShutdownHandler::new().install();
    let metrics = DialogueMetrics::new();
    let controller = DialogueTurnController::new(source, metrics.clone(), handler.token());

    let options = ChatOptions {
        session: settings.listen.session_config(),
        startup_check: settings.chat.startup_check && !cli.no_startup_check,
        turn_pacing: Duration::from_millis(settings.chat.turn_pacing_ms),
        reset_pause: Duration::from_millis(settings.chat.reset_pause_ms),
        max_turns: cli.turns.or(settings.chat.max_turns),
    };

    let mut conversation = ConversationLoop::new(
        controller,
        sink,
        pipeline,
        ChatHistory::new(&settings.llm.system_prompt),
        options,
        handler.token(),
    );

    let end = conversation.run().await;

    tracing::info!(
        ?end,
        turns = conversation.turns_completed(),
        capture_rate = metrics.get_capture_rate(),
        "Conversation finished"
    );
    Ok(())
}
