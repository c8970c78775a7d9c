//! One listening session against the recognizer
//!
//! A session owns one activation of the word source: it drives the
//! pause/vocabulary/subscribe sequence, runs the poll-and-decide loop
//! under an overall deadline, and always releases the subscription on
//! the way out, whatever ended the turn.

use naotalk_asr::{Vocabulary, WordEvent, WordEventSource};
use naotalk_foundation::ShutdownToken;
use naotalk_telemetry::DialogueMetrics;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::buffer::UtteranceBuffer;
use crate::config::SessionConfig;
use crate::fault::SessionFault;
use crate::outcome::TurnOutcome;

/// Listening session state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListenState {
    /// Not yet started
    #[default]
    Idle,
    /// Driving the recognizer activation sequence
    Activating,
    /// Polling the recognizer for word events
    Polling,
    /// Turn decided, releasing the subscription
    Draining,
    /// Session finished, recognizer released
    Closed,
}

impl std::fmt::Display for ListenState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListenState::Idle => write!(f, "IDLE"),
            ListenState::Activating => write!(f, "ACTIVATING"),
            ListenState::Polling => write!(f, "POLLING"),
            ListenState::Draining => write!(f, "DRAINING"),
            ListenState::Closed => write!(f, "CLOSED"),
        }
    }
}

/// Runs one listening turn to completion.
///
/// Holds the word source exclusively for its lifetime. Faults from the
/// source never escape: activation and poll faults degrade the turn to
/// [`TurnOutcome::EmptyTurn`], cleanup faults are swallowed.
pub struct ListenSession<'a> {
    source: &'a mut dyn WordEventSource,
    config: &'a SessionConfig,
    session_tag: &'a str,
    metrics: &'a DialogueMetrics,
    state: ListenState,
    id: u64,
}

impl<'a> ListenSession<'a> {
    pub fn new(
        source: &'a mut dyn WordEventSource,
        config: &'a SessionConfig,
        session_tag: &'a str,
        metrics: &'a DialogueMetrics,
    ) -> Self {
        Self {
            source,
            config,
            session_tag,
            metrics,
            state: ListenState::Idle,
            id: crate::next_session_id(),
        }
    }

    pub fn state(&self) -> ListenState {
        self.state
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Run the session to completion and report how the turn ended.
    ///
    /// The subscription is released exactly once on every path,
    /// including activation faults and cancellation. Cleanup itself is
    /// not cancellable.
    pub async fn run(&mut self, shutdown: &ShutdownToken) -> TurnOutcome {
        self.metrics.record_turn_started();

        let outcome = match self.activate().await {
            Ok(()) => self.poll(shutdown).await,
            Err(fault) => {
                warn!(target: "dialogue", session_id = self.id, %fault, "Turn degraded to empty");
                self.metrics.record_activation_fault();
                TurnOutcome::EmptyTurn
            }
        };

        self.drain().await;

        info!(
            target: "dialogue",
            session_id = self.id,
            state = %self.state,
            outcome = ?outcome,
            "Listen session finished"
        );
        outcome
    }

    /// Bring the recognizer up for this session: pause, install the
    /// union vocabulary, unpause, drop any stale event, then subscribe
    /// under the session tag.
    async fn activate(&mut self) -> Result<(), SessionFault> {
        self.state = ListenState::Activating;

        let vocabulary = Vocabulary::with_extras(&self.config.extra_vocabulary);
        debug!(
            target: "dialogue",
            session_id = self.id,
            words = vocabulary.len(),
            tag = self.session_tag,
            "Activating recognizer"
        );

        self.source
            .pause(true)
            .await
            .map_err(SessionFault::Activation)?;
        self.source
            .set_vocabulary(vocabulary.words(), false)
            .await
            .map_err(SessionFault::Activation)?;
        self.source
            .pause(false)
            .await
            .map_err(SessionFault::Activation)?;
        self.source
            .clear_pending()
            .await
            .map_err(SessionFault::Activation)?;
        self.source
            .subscribe(self.session_tag)
            .await
            .map_err(SessionFault::Activation)?;

        Ok(())
    }

    /// Poll-and-decide loop. Each tick reads the latest recognition,
    /// feeds the buffer, then checks exit word, silence, and the overall
    /// deadline in that order, so an exit word always wins.
    async fn poll(&mut self, shutdown: &ShutdownToken) -> TurnOutcome {
        self.state = ListenState::Polling;
        let started = Instant::now();
        let mut buffer = UtteranceBuffer::new(&self.config.exit_keywords);
        let mut last_seen: Option<WordEvent> = None;

        info!(
            target: "dialogue",
            session_id = self.id,
            max_duration_ms = self.config.max_duration_ms,
            silence_timeout_ms = self.config.silence_timeout_ms,
            "Listening"
        );

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!(target: "dialogue", session_id = self.id, "Listen interrupted");
                    return match buffer.snapshot() {
                        Some(text) => TurnOutcome::Transcript(text),
                        None => TurnOutcome::EmptyTurn,
                    };
                }
                _ = tokio::time::sleep(self.config.poll_interval()) => {}
            }

            let now = Instant::now();

            match self.source.latest_event().await {
                Ok(Some(event)) => {
                    // The source re-serves its latest value until a new
                    // recognition overwrites it; only a changed report is
                    // a fresh observation.
                    if last_seen.as_ref() != Some(&event) {
                        last_seen = Some(event.clone());
                        if buffer.accept(&event, now) {
                            self.metrics.record_word_accepted();
                            info!(
                                target: "dialogue",
                                session_id = self.id,
                                word = %event.word,
                                confidence = event.confidence,
                                "Word accepted"
                            );
                            if buffer.is_exit_word(&event.word) {
                                info!(target: "dialogue", session_id = self.id, "Exit keyword heard");
                                return TurnOutcome::ExitRequested;
                            }
                        } else {
                            self.metrics.record_word_rejected();
                            debug!(
                                target: "dialogue",
                                session_id = self.id,
                                word = %event.word,
                                confidence = event.confidence,
                                "Word rejected"
                            );
                        }
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    let fault = SessionFault::Poll(e);
                    warn!(target: "dialogue", session_id = self.id, %fault, "Turn degraded to empty");
                    self.metrics.record_poll_fault();
                    return TurnOutcome::EmptyTurn;
                }
            }

            // Silence only ends the turn once something was heard
            if let Some(last_activity) = buffer.last_activity() {
                if now.duration_since(last_activity) > self.config.silence_timeout() {
                    debug!(target: "dialogue", session_id = self.id, "Silence detected, finishing turn");
                    if let Some(text) = buffer.snapshot() {
                        return TurnOutcome::Transcript(text);
                    }
                }
            }

            if now.duration_since(started) > self.config.max_duration() {
                debug!(target: "dialogue", session_id = self.id, "Listen deadline reached");
                return match buffer.snapshot() {
                    Some(text) => TurnOutcome::Transcript(text),
                    None => TurnOutcome::EmptyTurn,
                };
            }
        }
    }

    /// Release the subscription. Runs on every exit path and swallows
    /// failures; a stuck subscription self-heals on the next session's
    /// activation sequence.
    async fn drain(&mut self) {
        self.state = ListenState::Draining;

        if let Err(e) = self.source.unsubscribe(self.session_tag).await {
            let fault = SessionFault::Cleanup(e);
            debug!(target: "dialogue", session_id = self.id, %fault, "Ignoring cleanup fault");
            self.metrics.record_cleanup_fault();
        }

        self.state = ListenState::Closed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use naotalk_asr::sources::{ScriptedConfig, ScriptedWordSource};
    use naotalk_foundation::ShutdownHandler;
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    fn config() -> SessionConfig {
        SessionConfig::default()
    }

    #[tokio::test(start_paused = true)]
    async fn test_captured_words_become_a_transcript() {
        let mut source = ScriptedWordSource::with_timeline(vec![
            (Duration::from_millis(100), WordEvent::new("hello", 0.9)),
            (Duration::from_millis(200), WordEvent::new("robot", 0.8)),
        ]);
        let probe = source.clone();
        let config = config();
        let metrics = DialogueMetrics::new();
        let handler = ShutdownHandler::new();
        let token = handler.token();

        let mut session = ListenSession::new(&mut source, &config, "test-chat", &metrics);
        let outcome = session.run(&token).await;

        assert_eq!(outcome, TurnOutcome::Transcript("hello robot".to_string()));
        assert_eq!(session.state(), ListenState::Closed);
        assert_eq!(probe.unsubscribe_calls(), 1);
        assert_eq!(metrics.words_accepted.load(Ordering::Relaxed), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_silent_turn_ends_empty_at_deadline() {
        let mut source = ScriptedWordSource::silent();
        let probe = source.clone();
        let config = config();
        let metrics = DialogueMetrics::new();
        let handler = ShutdownHandler::new();
        let token = handler.token();

        let started = Instant::now();
        let mut session = ListenSession::new(&mut source, &config, "test-chat", &metrics);
        let outcome = session.run(&token).await;

        assert_eq!(outcome, TurnOutcome::EmptyTurn);
        // The deadline is the only backstop for a totally silent turn
        assert!(started.elapsed() >= config.max_duration());
        assert_eq!(probe.unsubscribe_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exit_word_ends_turn_immediately() {
        let mut source = ScriptedWordSource::with_timeline(vec![(
            Duration::from_millis(200),
            WordEvent::new("bye", 0.9),
        )]);
        let probe = source.clone();
        let config = config();
        let metrics = DialogueMetrics::new();
        let handler = ShutdownHandler::new();
        let token = handler.token();

        let started = Instant::now();
        let mut session = ListenSession::new(&mut source, &config, "test-chat", &metrics);
        let outcome = session.run(&token).await;

        assert_eq!(outcome, TurnOutcome::ExitRequested);
        // No waiting out silence or the deadline once the exit word lands
        assert!(started.elapsed() < Duration::from_secs(1));
        assert_eq!(probe.unsubscribe_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_activation_fault_degrades_to_empty_turn() {
        let mut source = ScriptedWordSource::new(ScriptedConfig {
            fail_set_vocabulary: true,
            ..Default::default()
        });
        let probe = source.clone();
        let config = config();
        let metrics = DialogueMetrics::new();
        let handler = ShutdownHandler::new();
        let token = handler.token();

        let mut session = ListenSession::new(&mut source, &config, "test-chat", &metrics);
        let outcome = session.run(&token).await;

        assert_eq!(outcome, TurnOutcome::EmptyTurn);
        assert_eq!(session.state(), ListenState::Closed);
        assert_eq!(probe.subscribe_calls(), 0);
        assert_eq!(probe.unsubscribe_calls(), 1);
        assert_eq!(metrics.activation_faults.load(Ordering::Relaxed), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_fault_degrades_to_empty_turn() {
        let mut source = ScriptedWordSource::new(ScriptedConfig {
            fail_reads_after: Some(0),
            ..Default::default()
        });
        let probe = source.clone();
        let config = config();
        let metrics = DialogueMetrics::new();
        let handler = ShutdownHandler::new();
        let token = handler.token();

        let mut session = ListenSession::new(&mut source, &config, "test-chat", &metrics);
        let outcome = session.run(&token).await;

        assert_eq!(outcome, TurnOutcome::EmptyTurn);
        assert_eq!(probe.unsubscribe_calls(), 1);
        assert_eq!(metrics.poll_faults.load(Ordering::Relaxed), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_returns_current_snapshot() {
        let mut source = ScriptedWordSource::with_timeline(vec![(
            Duration::from_millis(100),
            WordEvent::new("hello", 0.9),
        )]);
        let probe = source.clone();
        let config = config();
        let metrics = DialogueMetrics::new();
        let handler = ShutdownHandler::new();
        let token = handler.token();

        let mut session = ListenSession::new(&mut source, &config, "test-chat", &metrics);
        let (outcome, _) = tokio::join!(session.run(&token), async {
            tokio::time::sleep(Duration::from_millis(450)).await;
            handler.trigger();
        });

        assert_eq!(outcome, TurnOutcome::Transcript("hello".to_string()));
        // Cleanup still ran despite the interruption
        assert_eq!(probe.unsubscribe_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cleanup_fault_is_swallowed() {
        let mut source = ScriptedWordSource::new(ScriptedConfig {
            timeline: vec![(Duration::from_millis(100), WordEvent::new("hello", 0.9))],
            fail_unsubscribe: true,
            ..Default::default()
        });
        let probe = source.clone();
        let config = config();
        let metrics = DialogueMetrics::new();
        let handler = ShutdownHandler::new();
        let token = handler.token();

        let mut session = ListenSession::new(&mut source, &config, "test-chat", &metrics);
        let outcome = session.run(&token).await;

        assert_eq!(outcome, TurnOutcome::Transcript("hello".to_string()));
        assert_eq!(session.state(), ListenState::Closed);
        assert_eq!(probe.unsubscribe_calls(), 1);
        assert_eq!(metrics.cleanup_faults.load(Ordering::Relaxed), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_event_cleared_during_activation() {
        let mut source = ScriptedWordSource::new(ScriptedConfig {
            timeline: vec![(Duration::from_millis(100), WordEvent::new("hello", 0.9))],
            stale_event: Some(WordEvent::new("leftover", 0.9)),
            ..Default::default()
        });
        let config = config();
        let metrics = DialogueMetrics::new();
        let handler = ShutdownHandler::new();
        let token = handler.token();

        let mut session = ListenSession::new(&mut source, &config, "test-chat", &metrics);
        let outcome = session.run(&token).await;

        assert_eq!(outcome, TurnOutcome::Transcript("hello".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_low_confidence_noise_yields_empty_turn() {
        let mut source = ScriptedWordSource::with_timeline(vec![
            (Duration::from_millis(100), WordEvent::new("hello", 0.2)),
            (Duration::from_millis(300), WordEvent::new("robot", 0.3)),
        ]);
        let config = config();
        let metrics = DialogueMetrics::new();
        let handler = ShutdownHandler::new();
        let token = handler.token();

        let mut session = ListenSession::new(&mut source, &config, "test-chat", &metrics);
        let outcome = session.run(&token).await;

        assert_eq!(outcome, TurnOutcome::EmptyTurn);
        assert_eq!(metrics.words_accepted.load(Ordering::Relaxed), 0);
        assert_eq!(metrics.words_rejected.load(Ordering::Relaxed), 2);
    }
}
