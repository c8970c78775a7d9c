//! Speech-capture turn controller for naotalk
//!
//! This crate is the heart of the dialogue loop: it drives one listening
//! session at a time against a [`WordEventSource`](naotalk_asr::WordEventSource),
//! accumulates recognized words into an utterance, detects end-of-turn by
//! silence or exit keyword, and hands a clean transcript (or a well-defined
//! empty result) back to the caller. The recognizer is always left
//! unsubscribed, whatever path a session takes to its end.

use std::sync::atomic::{AtomicU64, Ordering};

pub mod buffer;
pub mod config;
pub mod controller;
pub mod fault;
pub mod outcome;
pub mod session;

pub use buffer::UtteranceBuffer;
pub use config::{SessionConfig, DEFAULT_EXIT_KEYWORDS};
pub use controller::{feedback_for, DialogueTurnController, TurnFeedback, DEFAULT_SESSION_TAG};
pub use fault::SessionFault;
pub use outcome::TurnOutcome;
pub use session::{ListenSession, ListenState};

/// Generates unique listen-session IDs
static SESSION_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Generate a unique listen-session ID
pub fn next_session_id() -> u64 {
    SESSION_ID_COUNTER.fetch_add(1, Ordering::SeqCst)
}
