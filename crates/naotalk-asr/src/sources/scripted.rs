//! Scripted word source for testing
//!
//! Plays back a fixed timeline of recognition events and can inject
//! faults at each service call, so the capture loop can be exercised
//! without a recognizer attached.

use crate::error::AsrError;
use crate::source::WordEventSource;
use crate::types::WordEvent;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Configuration for scripted recognition
#[derive(Debug, Clone, Default)]
pub struct ScriptedConfig {
    /// Events to deliver, as (offset after subscribe, event) pairs
    pub timeline: Vec<(Duration, WordEvent)>,

    /// Event already sitting in the channel before activation; served
    /// until `clear_pending` is called
    pub stale_event: Option<WordEvent>,

    /// Number of initial subscriptions that hear nothing before the
    /// timeline starts being served
    pub silent_subscriptions: usize,

    /// Fail pause calls
    pub fail_pause: bool,

    /// Fail vocabulary updates
    pub fail_set_vocabulary: bool,

    /// Fail subscribe calls
    pub fail_subscribe: bool,

    /// Fail unsubscribe calls
    pub fail_unsubscribe: bool,

    /// Fail event reads after N successful reads
    pub fail_reads_after: Option<usize>,
}

/// Scripted recognizer for exercising the capture loop without hardware.
///
/// Clones share call counters and subscription state, so tests can keep
/// a probe handle while the dialogue loop owns the source.
#[derive(Debug, Clone)]
pub struct ScriptedWordSource {
    config: ScriptedConfig,
    state: Arc<Mutex<ScriptedState>>,
}

#[derive(Debug, Default)]
struct ScriptedState {
    paused: bool,
    vocabulary: Vec<String>,
    subscribed_at: Option<Instant>,
    stale_cleared: bool,
    pause_calls: usize,
    vocabulary_calls: usize,
    subscribe_calls: usize,
    unsubscribe_calls: usize,
    read_calls: usize,
    clear_calls: usize,
}

impl ScriptedWordSource {
    pub fn new(config: ScriptedConfig) -> Self {
        Self {
            config,
            state: Arc::new(Mutex::new(ScriptedState::default())),
        }
    }

    /// Source that delivers the given events after subscription
    pub fn with_timeline(timeline: Vec<(Duration, WordEvent)>) -> Self {
        Self::new(ScriptedConfig {
            timeline,
            ..Default::default()
        })
    }

    /// Source that never hears anything
    pub fn silent() -> Self {
        Self::new(ScriptedConfig::default())
    }

    pub fn pause_calls(&self) -> usize {
        self.state.lock().unwrap().pause_calls
    }

    pub fn vocabulary_calls(&self) -> usize {
        self.state.lock().unwrap().vocabulary_calls
    }

    pub fn subscribe_calls(&self) -> usize {
        self.state.lock().unwrap().subscribe_calls
    }

    pub fn unsubscribe_calls(&self) -> usize {
        self.state.lock().unwrap().unsubscribe_calls
    }

    pub fn read_calls(&self) -> usize {
        self.state.lock().unwrap().read_calls
    }

    pub fn clear_calls(&self) -> usize {
        self.state.lock().unwrap().clear_calls
    }

    /// Vocabulary from the most recent `set_vocabulary` call
    pub fn last_vocabulary(&self) -> Vec<String> {
        self.state.lock().unwrap().vocabulary.clone()
    }

    pub fn is_subscribed(&self) -> bool {
        self.state.lock().unwrap().subscribed_at.is_some()
    }
}

#[async_trait]
impl WordEventSource for ScriptedWordSource {
    async fn pause(&mut self, paused: bool) -> Result<(), AsrError> {
        let mut state = self.state.lock().unwrap();
        state.pause_calls += 1;
        if self.config.fail_pause {
            debug!(target: "asr", "Injecting scripted pause fault");
            return Err(AsrError::PauseFailed("scripted pause failure".to_string()));
        }
        state.paused = paused;
        debug!(target: "asr", paused, "Scripted source pause state changed");
        Ok(())
    }

    async fn set_vocabulary(
        &mut self,
        words: &[String],
        _word_spotting: bool,
    ) -> Result<(), AsrError> {
        let mut state = self.state.lock().unwrap();
        state.vocabulary_calls += 1;
        if self.config.fail_set_vocabulary {
            debug!(target: "asr", "Injecting scripted vocabulary fault");
            return Err(AsrError::VocabularyRejected(
                "scripted vocabulary failure".to_string(),
            ));
        }
        state.vocabulary = words.to_vec();
        debug!(target: "asr", words = words.len(), "Scripted vocabulary installed");
        Ok(())
    }

    async fn subscribe(&mut self, tag: &str) -> Result<(), AsrError> {
        let mut state = self.state.lock().unwrap();
        state.subscribe_calls += 1;
        if self.config.fail_subscribe {
            debug!(target: "asr", tag, "Injecting scripted subscribe fault");
            return Err(AsrError::SubscribeFailed {
                tag: tag.to_string(),
                reason: "scripted subscribe failure".to_string(),
            });
        }
        state.subscribed_at = Some(Instant::now());
        debug!(target: "asr", tag, subscription = state.subscribe_calls, "Scripted source subscribed");
        Ok(())
    }

    async fn unsubscribe(&mut self, tag: &str) -> Result<(), AsrError> {
        let mut state = self.state.lock().unwrap();
        state.unsubscribe_calls += 1;
        if self.config.fail_unsubscribe {
            debug!(target: "asr", tag, "Injecting scripted unsubscribe fault");
            return Err(AsrError::UnsubscribeFailed {
                tag: tag.to_string(),
                reason: "scripted unsubscribe failure".to_string(),
            });
        }
        state.subscribed_at = None;
        debug!(target: "asr", tag, "Scripted source unsubscribed");
        Ok(())
    }

    async fn latest_event(&mut self) -> Result<Option<WordEvent>, AsrError> {
        let mut state = self.state.lock().unwrap();
        state.read_calls += 1;

        if let Some(fail_after) = self.config.fail_reads_after {
            if state.read_calls > fail_after {
                debug!(target: "asr", reads = state.read_calls, "Injecting scripted read fault");
                return Err(AsrError::ReadFailed(
                    "scripted read failure".to_string(),
                ));
            }
        }

        if !state.stale_cleared {
            if let Some(ref stale) = self.config.stale_event {
                return Ok(Some(stale.clone()));
            }
        }

        let Some(subscribed_at) = state.subscribed_at else {
            return Ok(None);
        };

        if state.subscribe_calls <= self.config.silent_subscriptions {
            return Ok(None);
        }

        let elapsed = subscribed_at.elapsed();
        let latest = self
            .config
            .timeline
            .iter()
            .filter(|(offset, _)| *offset <= elapsed)
            .max_by_key(|(offset, _)| *offset)
            .map(|(_, event)| event.clone());

        Ok(latest)
    }

    async fn clear_pending(&mut self) -> Result<(), AsrError> {
        let mut state = self.state.lock().unwrap();
        state.clear_calls += 1;
        state.stale_cleared = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_timeline_serves_most_recent_event() {
        let mut source = ScriptedWordSource::with_timeline(vec![
            (Duration::from_millis(100), WordEvent::new("hello", 0.9)),
            (Duration::from_millis(300), WordEvent::new("robot", 0.8)),
        ]);
        source.subscribe("test-tag").await.unwrap();

        assert_eq!(source.latest_event().await.unwrap(), None);

        tokio::time::sleep(Duration::from_millis(150)).await;
        let event = source.latest_event().await.unwrap().unwrap();
        assert_eq!(event.word, "hello");

        tokio::time::sleep(Duration::from_millis(200)).await;
        let event = source.latest_event().await.unwrap().unwrap();
        assert_eq!(event.word, "robot");

        // Reads are non-destructive snapshots
        let again = source.latest_event().await.unwrap().unwrap();
        assert_eq!(again.word, "robot");
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_event_served_until_cleared() {
        let mut source = ScriptedWordSource::new(ScriptedConfig {
            stale_event: Some(WordEvent::new("leftover", 0.9)),
            ..Default::default()
        });

        let event = source.latest_event().await.unwrap().unwrap();
        assert_eq!(event.word, "leftover");

        source.clear_pending().await.unwrap();
        assert_eq!(source.latest_event().await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reads_fail_after_threshold() {
        let mut source = ScriptedWordSource::new(ScriptedConfig {
            fail_reads_after: Some(2),
            ..Default::default()
        });
        source.subscribe("test-tag").await.unwrap();

        assert!(source.latest_event().await.is_ok());
        assert!(source.latest_event().await.is_ok());
        assert!(matches!(
            source.latest_event().await,
            Err(AsrError::ReadFailed(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_clones_share_call_counters() {
        let mut source = ScriptedWordSource::silent();
        let probe = source.clone();

        source.pause(true).await.unwrap();
        source.pause(false).await.unwrap();
        source.subscribe("test-tag").await.unwrap();
        source.unsubscribe("test-tag").await.unwrap();

        assert_eq!(probe.pause_calls(), 2);
        assert_eq!(probe.subscribe_calls(), 1);
        assert_eq!(probe.unsubscribe_calls(), 1);
        assert!(!probe.is_subscribed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_silent_subscriptions_hear_nothing() {
        let mut source = ScriptedWordSource::new(ScriptedConfig {
            timeline: vec![(Duration::from_millis(50), WordEvent::new("hello", 0.9))],
            silent_subscriptions: 1,
            ..Default::default()
        });

        source.subscribe("test-tag").await.unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(source.latest_event().await.unwrap(), None);
        source.unsubscribe("test-tag").await.unwrap();

        source.subscribe("test-tag").await.unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        let event = source.latest_event().await.unwrap().unwrap();
        assert_eq!(event.word, "hello");
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_subscribe_leaves_no_subscription() {
        let mut source = ScriptedWordSource::new(ScriptedConfig {
            fail_subscribe: true,
            ..Default::default()
        });

        assert!(source.subscribe("test-tag").await.is_err());
        assert!(!source.is_subscribed());
        assert_eq!(source.subscribe_calls(), 1);
    }
}
