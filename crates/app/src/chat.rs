//! The conversation loop
//!
//! Drives the listen-think-speak cycle: each turn captures an utterance
//! through the turn controller, dispatches the few spoken commands, and
//! otherwise sends the transcript through the inference pipeline and
//! speaks the shaped reply. Empty turns get corrective feedback and,
//! after three in a row, a spoken speech-system reset notice.

use naotalk_dialogue::{DialogueTurnController, SessionConfig, TurnOutcome};
use naotalk_foundation::ShutdownToken;
use naotalk_llm::{shape_reply, ChatHistory, InferencePipeline, PIPELINE_FAULT_FALLBACK};
use naotalk_tts::SpeechSink;
use std::time::Duration;
use tracing::{info, warn};

const GREETING_LINE: &str =
    "Hello! I'm NAO with TinyLlama AI. I'm ready to chat with you in English. Please speak clearly.";
const FAREWELL_LINE: &str = "Goodbye! It was wonderful chatting with you. Have a great day!";
const INTERRUPTED_LINE: &str = "Chat interrupted. Goodbye!";
const THINKING_LINE: &str = "Let me think about that.";
const HISTORY_CLEARED_LINE: &str = "Chat history cleared. Let's start fresh!";
const CHECK_PROMPT_LINE: &str = "Testing speech recognition. Please say hello robot.";
const CHECK_FAILED_LINE: &str = "I didn't hear anything. Let me check the system.";

/// Loop behavior derived from the app settings
#[derive(Debug, Clone)]
pub struct ChatOptions {
    /// Listening configuration for normal turns
    pub session: SessionConfig,
    /// Run the listening self-check before greeting
    pub startup_check: bool,
    /// Pause after each completed turn
    pub turn_pacing: Duration,
    /// Pause accompanying the speech-system reset notice
    pub reset_pause: Duration,
    /// Stop after this many turns; unlimited when absent
    pub max_turns: Option<u64>,
}

impl Default for ChatOptions {
    fn default() -> Self {
        Self {
            session: SessionConfig::default(),
            startup_check: true,
            turn_pacing: Duration::from_millis(500),
            reset_pause: Duration::from_secs(1),
            max_turns: None,
        }
    }
}

/// How the conversation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatEnd {
    /// The user spoke an exit keyword
    UserExit,
    /// Process shutdown was requested
    Interrupted,
    /// The configured turn limit was reached
    TurnLimit,
}

/// One spoken conversation from greeting to farewell
pub struct ConversationLoop {
    controller: DialogueTurnController,
    sink: Box<dyn SpeechSink>,
    pipeline: Box<dyn InferencePipeline>,
    history: ChatHistory,
    options: ChatOptions,
    shutdown: ShutdownToken,
    turns_completed: u64,
}

impl ConversationLoop {
    pub fn new(
        controller: DialogueTurnController,
        sink: Box<dyn SpeechSink>,
        pipeline: Box<dyn InferencePipeline>,
        history: ChatHistory,
        options: ChatOptions,
        shutdown: ShutdownToken,
    ) -> Self {
        Self {
            controller,
            sink,
            pipeline,
            history,
            options,
            shutdown,
            turns_completed: 0,
        }
    }

    pub fn history(&self) -> &ChatHistory {
        &self.history
    }

    pub fn turns_completed(&self) -> u64 {
        self.turns_completed
    }

    pub fn metrics(&self) -> &naotalk_telemetry::DialogueMetrics {
        self.controller.metrics()
    }

    /// Run the conversation until an exit keyword, shutdown, or the turn
    /// limit ends it.
    pub async fn run(&mut self) -> ChatEnd {
        if self.options.startup_check {
            self.listening_check().await;
        }

        self.say(GREETING_LINE).await;

        loop {
            if self.shutdown.is_cancelled() {
                self.say(INTERRUPTED_LINE).await;
                return ChatEnd::Interrupted;
            }
            if let Some(limit) = self.options.max_turns {
                if self.turns_completed >= limit {
                    info!(target: "chat", limit, "Turn limit reached");
                    return ChatEnd::TurnLimit;
                }
            }

            let turn = self.turns_completed + 1;
            info!(target: "chat", turn, "Waiting for the user");

            let outcome = self.controller.take_turn(&self.options.session).await;
            self.turns_completed += 1;

            match outcome {
                TurnOutcome::ExitRequested => {
                    self.say(FAREWELL_LINE).await;
                    return ChatEnd::UserExit;
                }
                TurnOutcome::EmptyTurn => {
                    if let Some(feedback) = self.controller.empty_turn_feedback() {
                        self.say(feedback.line()).await;
                        if feedback.is_reset() {
                            tokio::time::sleep(self.options.reset_pause).await;
                        }
                    }
                }
                TurnOutcome::Transcript(text) => {
                    info!(target: "chat", transcript = %text, "User said");
                    if self.handle_transcript(&text).await {
                        return ChatEnd::UserExit;
                    }
                }
            }

            tokio::time::sleep(self.options.turn_pacing).await;
        }
    }

    /// Dispatch a captured transcript. Returns true when the
    /// conversation should end.
    ///
    /// The session already returns `ExitRequested` when an exit keyword
    /// is recognized on its own; this scan covers the case where it
    /// arrived alongside other words and the turn ended by silence.
    async fn handle_transcript(&mut self, text: &str) -> bool {
        let lowered = text.to_lowercase();
        let words: Vec<&str> = lowered.split_whitespace().collect();

        if words.iter().any(|w| {
            self.options
                .session
                .exit_keywords
                .iter()
                .any(|k| k.eq_ignore_ascii_case(w))
        }) {
            self.say(FAREWELL_LINE).await;
            return true;
        }

        if lowered.contains("clear history") {
            self.history.clear();
            self.say(HISTORY_CLEARED_LINE).await;
            return false;
        }

        if words.contains(&"test") && (words.contains(&"listen") || words.contains(&"hear")) {
            self.listening_check().await;
            return false;
        }

        self.history.push_user(text);
        self.say(THINKING_LINE).await;

        match self.pipeline.generate(&self.history).await {
            Ok(raw) => {
                let reply = shape_reply(&raw);
                info!(target: "chat", reply = %reply, "Speaking reply");
                self.history.push_assistant(&reply);
                self.controller.metrics().record_reply_spoken();
                self.say(&reply).await;
            }
            Err(e) => {
                warn!(target: "chat", error = %e, "Inference failed");
                self.say(PIPELINE_FAULT_FALLBACK).await;
            }
        }

        false
    }

    /// Prompt for "hello robot", listen briefly, and report what was
    /// heard. Run once at startup and on the spoken "test listening"
    /// command. A silent check does not count toward the empty-turn
    /// streak.
    async fn listening_check(&mut self) {
        self.say(CHECK_PROMPT_LINE).await;

        let outcome = self
            .controller
            .take_check_turn(&SessionConfig::listening_check())
            .await;

        match outcome.transcript() {
            Some(heard) => {
                let line = format!("Great! I heard: {}", heard);
                self.say(&line).await;
            }
            None => {
                self.say(CHECK_FAILED_LINE).await;
            }
        }
    }

    /// Speak one line, then hold for the settle delay so the recognizer
    /// does not pick up the robot's trailing audio. Speech faults are
    /// logged and the conversation continues.
    async fn say(&mut self, text: &str) {
        if let Err(e) = self.sink.speak(text).await {
            warn!(target: "chat", error = %e, "Speech output failed");
        }
        tokio::time::sleep(self.sink.config().settle_delay()).await;
    }
}
