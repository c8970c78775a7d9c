//! Recognizer backend interface
//!
//! This module defines the channel every speech-recognition backend
//! exposes to the dialogue loop. The service model is push-style: once
//! activated with a vocabulary and subscribed under a tag, the backend
//! keeps overwriting a "latest word" slot that the session polls.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::error::AsrError;
use crate::types::WordEvent;

/// Push-style word-recognition channel.
///
/// A session activates the channel with the sequence pause, set
/// vocabulary, unpause, clear pending, subscribe. Reads are
/// non-destructive snapshots of the most recent recognition; repeated
/// reads may return the same event. Every call may fail and no failure
/// here is fatal to the process.
#[async_trait]
pub trait WordEventSource: Send + Sync + Debug {
    /// Suspend or resume recognition
    async fn pause(&mut self, paused: bool) -> Result<(), AsrError>;

    /// Replace the active vocabulary. `word_spotting` enables matching
    /// words embedded in longer utterances.
    async fn set_vocabulary(
        &mut self,
        words: &[String],
        word_spotting: bool,
    ) -> Result<(), AsrError>;

    /// Start delivering events under the given session tag
    async fn subscribe(&mut self, tag: &str) -> Result<(), AsrError>;

    /// Stop delivering events for the given session tag
    async fn unsubscribe(&mut self, tag: &str) -> Result<(), AsrError>;

    /// Snapshot of the most recent recognition, if any
    async fn latest_event(&mut self) -> Result<Option<WordEvent>, AsrError>;

    /// Drop any stale event left over from an earlier session
    async fn clear_pending(&mut self) -> Result<(), AsrError>;
}
