//! Metrics for the spoken dialogue loop
//!
//! Counters are shared across the capture session, the turn controller
//! and the conversation loop, so everything is atomic and cheap to clone.

use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Shared counters for turn outcomes and recognizer health
#[derive(Clone, Default)]
pub struct DialogueMetrics {
    /// Listen sessions started
    pub turns_started: Arc<AtomicU64>,
    /// Turns that produced an utterance
    pub transcripts: Arc<AtomicU64>,
    /// Turns that ended with nothing usable captured
    pub empty_turns: Arc<AtomicU64>,
    /// Turns ended by an exit keyword
    pub exit_requests: Arc<AtomicU64>,
    /// Word events accepted into the utterance buffer
    pub words_accepted: Arc<AtomicU64>,
    /// Word events dropped by the acceptance filter
    pub words_rejected: Arc<AtomicU64>,
    /// Recognizer activation failures
    pub activation_faults: Arc<AtomicU64>,
    /// Recognizer poll failures mid-turn
    pub poll_faults: Arc<AtomicU64>,
    /// Recognizer cleanup failures (non-fatal)
    pub cleanup_faults: Arc<AtomicU64>,
    /// Recognizer resets after repeated empty turns
    pub recognizer_resets: Arc<AtomicU64>,
    /// Replies spoken back to the user
    pub replies_spoken: Arc<AtomicU64>,
    /// When the last transcript was produced
    pub last_transcript_time: Arc<RwLock<Option<Instant>>>,
}

impl DialogueMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_turn_started(&self) {
        self.turns_started.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_transcript(&self) {
        self.transcripts.fetch_add(1, Ordering::Relaxed);
        *self.last_transcript_time.write() = Some(Instant::now());
    }

    pub fn record_empty_turn(&self) {
        self.empty_turns.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_exit_request(&self) {
        self.exit_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_word_accepted(&self) {
        self.words_accepted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_word_rejected(&self) {
        self.words_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_activation_fault(&self) {
        self.activation_faults.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_poll_fault(&self) {
        self.poll_faults.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cleanup_fault(&self) {
        self.cleanup_faults.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_recognizer_reset(&self) {
        self.recognizer_resets.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_reply_spoken(&self) {
        self.replies_spoken.fetch_add(1, Ordering::Relaxed);
    }

    /// Fraction of completed turns that yielded an utterance
    pub fn get_capture_rate(&self) -> f64 {
        let transcripts = self.transcripts.load(Ordering::Relaxed) as f64;
        let empty = self.empty_turns.load(Ordering::Relaxed) as f64;
        let total = transcripts + empty;

        if total > 0.0 {
            transcripts / total
        } else {
            0.0
        }
    }

    /// Time since the last transcript, if any
    pub fn time_since_last_transcript(&self) -> Option<std::time::Duration> {
        self.last_transcript_time.read().map(|t| t.elapsed())
    }
}
