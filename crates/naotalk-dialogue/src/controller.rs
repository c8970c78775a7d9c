//! Turn orchestration and empty-turn escalation
//!
//! The controller is the conversation loop's sole entry point into the
//! capture machinery: it runs one listening session at a time, tracks
//! consecutive empty turns, and picks the corrective feedback line the
//! caller should speak. It never talks to the inference pipeline or the
//! speech sink itself.

use naotalk_asr::WordEventSource;
use naotalk_foundation::ShutdownToken;
use naotalk_telemetry::DialogueMetrics;
use tracing::{debug, info};

use crate::config::SessionConfig;
use crate::outcome::TurnOutcome;
use crate::session::ListenSession;

/// Tag under which the controller subscribes to the recognizer
pub const DEFAULT_SESSION_TAG: &str = "naotalk-chat";

/// Spoken after the first empty turn
const FIRST_MISS_LINE: &str = "I didn't catch that. Please speak louder and more clearly.";

/// Spoken after the second consecutive empty turn
const SECOND_MISS_LINE: &str = "Could you repeat that? I'm listening.";

/// Spoken when repeated empty turns trigger a recognizer reset
const RESET_LINE: &str = "I'm having trouble hearing you. Let me reset the speech system.";

/// Corrective feedback chosen after empty turns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnFeedback {
    /// Ask the user to try again
    Retry(&'static str),
    /// Announce a recognizer reset after repeated misses
    Reset(&'static str),
}

impl TurnFeedback {
    /// The line to speak to the user
    pub fn line(&self) -> &'static str {
        match self {
            TurnFeedback::Retry(line) | TurnFeedback::Reset(line) => line,
        }
    }

    pub fn is_reset(&self) -> bool {
        matches!(self, TurnFeedback::Reset(_))
    }
}

/// Deterministic feedback mapping, total for every failure count.
/// Counts of three or more clamp to the reset notice.
pub fn feedback_for(consecutive_empty_turns: u32) -> Option<TurnFeedback> {
    match consecutive_empty_turns {
        0 => None,
        1 => Some(TurnFeedback::Retry(FIRST_MISS_LINE)),
        2 => Some(TurnFeedback::Retry(SECOND_MISS_LINE)),
        _ => Some(TurnFeedback::Reset(RESET_LINE)),
    }
}

/// Runs repeated listening sessions for the conversation loop.
///
/// Owns the word source and the failure counter. The counter is the
/// only state that outlives a single turn and it is only ever touched
/// between sessions, never while one is running.
pub struct DialogueTurnController {
    source: Box<dyn WordEventSource>,
    session_tag: String,
    shutdown: ShutdownToken,
    metrics: DialogueMetrics,
    consecutive_empty_turns: u32,
}

impl DialogueTurnController {
    pub fn new(
        source: Box<dyn WordEventSource>,
        metrics: DialogueMetrics,
        shutdown: ShutdownToken,
    ) -> Self {
        Self {
            source,
            session_tag: DEFAULT_SESSION_TAG.to_string(),
            shutdown,
            metrics,
            consecutive_empty_turns: 0,
        }
    }

    pub fn with_session_tag(mut self, tag: impl Into<String>) -> Self {
        self.session_tag = tag.into();
        self
    }

    /// Run one listening session to completion and update the failure
    /// counter from its outcome.
    pub async fn take_turn(&mut self, config: &SessionConfig) -> TurnOutcome {
        let mut session = ListenSession::new(
            self.source.as_mut(),
            config,
            &self.session_tag,
            &self.metrics,
        );
        let outcome = session.run(&self.shutdown).await;

        match &outcome {
            TurnOutcome::Transcript(text) => {
                self.consecutive_empty_turns = 0;
                self.metrics.record_transcript();
                info!(target: "dialogue", transcript = %text, "Turn captured");
            }
            TurnOutcome::EmptyTurn => {
                self.consecutive_empty_turns += 1;
                self.metrics.record_empty_turn();
                debug!(
                    target: "dialogue",
                    consecutive = self.consecutive_empty_turns,
                    "Nothing heard this turn"
                );
            }
            TurnOutcome::ExitRequested => {
                self.consecutive_empty_turns = 0;
                self.metrics.record_exit_request();
                info!(target: "dialogue", "Exit requested by user");
            }
        }

        outcome
    }

    /// Run one listening session without counting its outcome toward
    /// the failure streak. For diagnostics like the listening
    /// self-check, which are not conversation turns; metrics still
    /// record the session.
    pub async fn take_check_turn(&mut self, config: &SessionConfig) -> TurnOutcome {
        let streak = self.consecutive_empty_turns;
        let outcome = self.take_turn(config).await;
        self.consecutive_empty_turns = streak;
        outcome
    }

    /// Feedback for the current failure streak. The third consecutive
    /// miss yields the reset notice and clears the counter, so the next
    /// streak starts over.
    pub fn empty_turn_feedback(&mut self) -> Option<TurnFeedback> {
        let feedback = feedback_for(self.consecutive_empty_turns);
        if matches!(feedback, Some(TurnFeedback::Reset(_))) {
            self.consecutive_empty_turns = 0;
            self.metrics.record_recognizer_reset();
            info!(target: "dialogue", "Recognizer reset after repeated empty turns");
        }
        feedback
    }

    pub fn consecutive_empty_turns(&self) -> u32 {
        self.consecutive_empty_turns
    }

    pub fn metrics(&self) -> &DialogueMetrics {
        &self.metrics
    }
}
