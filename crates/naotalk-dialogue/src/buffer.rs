//! Utterance accumulation and end-of-turn word filtering

use naotalk_asr::{WordEvent, NO_SPEECH_SENTINEL};
use tokio::time::Instant;

/// Events at or below this confidence are treated as noise
const CONFIDENCE_FLOOR: f32 = 0.3;

/// Accumulates distinct recognized words in arrival order.
///
/// Mutated only through [`accept`](UtteranceBuffer::accept); discarded at
/// session end. Every buffered word passed the acceptance filter.
#[derive(Debug)]
pub struct UtteranceBuffer {
    words: Vec<String>,
    exit_keywords: Vec<String>,
    last_activity: Option<Instant>,
}

impl UtteranceBuffer {
    pub fn new(exit_keywords: &[String]) -> Self {
        Self {
            words: Vec::new(),
            exit_keywords: exit_keywords.iter().map(|w| w.to_lowercase()).collect(),
            last_activity: None,
        }
    }

    /// Append the event's word if it passes the acceptance filter.
    ///
    /// Rejects empty words, repeats of already-buffered words, events at
    /// or below the confidence floor, and the recognizer's no-speech
    /// placeholder. On acceptance the activity timestamp moves to `now`.
    pub fn accept(&mut self, event: &WordEvent, now: Instant) -> bool {
        if event.word.is_empty()
            || event.word == NO_SPEECH_SENTINEL
            || event.confidence <= CONFIDENCE_FLOOR
            || self.contains(&event.word)
        {
            return false;
        }

        self.words.push(event.word.clone());
        self.last_activity = Some(now);
        true
    }

    /// Case-insensitive test against the configured exit keywords
    pub fn is_exit_word(&self, word: &str) -> bool {
        let token = word.to_lowercase();
        self.exit_keywords.iter().any(|w| *w == token)
    }

    /// The utterance so far, joined with single spaces. Absent while the
    /// buffer is empty. Pure; callable at any time.
    pub fn snapshot(&self) -> Option<String> {
        if self.words.is_empty() {
            None
        } else {
            Some(self.words.join(" "))
        }
    }

    /// Exact membership test against buffered words
    pub fn contains(&self, word: &str) -> bool {
        self.words.iter().any(|w| w == word)
    }

    pub fn has_words(&self) -> bool {
        !self.words.is_empty()
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// When the most recent word was accepted. None until the first
    /// acceptance, so silence detection only starts once something was
    /// actually heard.
    pub fn last_activity(&self) -> Option<Instant> {
        self.last_activity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer() -> UtteranceBuffer {
        let exit_keywords: Vec<String> = crate::config::DEFAULT_EXIT_KEYWORDS
            .iter()
            .map(|s| s.to_string())
            .collect();
        UtteranceBuffer::new(&exit_keywords)
    }

    #[tokio::test(start_paused = true)]
    async fn test_low_confidence_events_never_accumulate() {
        let mut buffer = buffer();
        let now = Instant::now();

        for word in ["hello", "robot", "weather"] {
            assert!(!buffer.accept(&WordEvent::new(word, 0.3), now));
            assert!(!buffer.accept(&WordEvent::new(word, 0.1), now));
        }

        assert_eq!(buffer.snapshot(), None);
        assert!(buffer.last_activity().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeated_words_do_not_grow_the_sequence() {
        let mut buffer = buffer();
        let now = Instant::now();

        assert!(buffer.accept(&WordEvent::new("hello", 0.9), now));
        assert!(!buffer.accept(&WordEvent::new("hello", 0.9), now));
        assert!(!buffer.accept(&WordEvent::new("hello", 0.5), now));

        assert_eq!(buffer.word_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sentinel_and_empty_words_rejected() {
        let mut buffer = buffer();
        let now = Instant::now();

        assert!(!buffer.accept(&WordEvent::new(NO_SPEECH_SENTINEL, 0.99), now));
        assert!(!buffer.accept(&WordEvent::new("", 0.99), now));
        assert_eq!(buffer.snapshot(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_snapshot_joins_words_in_arrival_order() {
        let mut buffer = buffer();
        let now = Instant::now();

        buffer.accept(&WordEvent::new("tell", 0.8), now);
        buffer.accept(&WordEvent::new("me", 0.7), now);
        buffer.accept(&WordEvent::new("about", 0.9), now);
        buffer.accept(&WordEvent::new("music", 0.85), now);

        assert_eq!(buffer.snapshot().as_deref(), Some("tell me about music"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_snapshot_is_idempotent() {
        let mut buffer = buffer();
        buffer.accept(&WordEvent::new("hello", 0.9), Instant::now());

        let first = buffer.snapshot();
        let second = buffer.snapshot();
        let third = buffer.snapshot();
        assert_eq!(first, second);
        assert_eq!(second, third);
    }

    #[tokio::test(start_paused = true)]
    async fn test_acceptance_moves_activity_timestamp() {
        let mut buffer = buffer();

        let t0 = Instant::now();
        buffer.accept(&WordEvent::new("hello", 0.9), t0);
        assert_eq!(buffer.last_activity(), Some(t0));

        tokio::time::advance(std::time::Duration::from_millis(500)).await;
        let t1 = Instant::now();

        // Rejected events must not refresh the silence anchor
        buffer.accept(&WordEvent::new("hello", 0.9), t1);
        assert_eq!(buffer.last_activity(), Some(t0));

        buffer.accept(&WordEvent::new("robot", 0.9), t1);
        assert_eq!(buffer.last_activity(), Some(t1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_exit_word_check_is_case_insensitive() {
        let buffer = buffer();
        assert!(buffer.is_exit_word("bye"));
        assert!(buffer.is_exit_word("Goodbye"));
        assert!(buffer.is_exit_word("STOP"));
        assert!(!buffer.is_exit_word("hello"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_word_dedup_is_exact_match() {
        let mut buffer = buffer();
        let now = Instant::now();

        assert!(buffer.accept(&WordEvent::new("hello", 0.9), now));
        // The recognizer reports vocabulary tokens verbatim, so dedup
        // compares exactly
        assert!(buffer.accept(&WordEvent::new("Hello", 0.9), now));
        assert_eq!(buffer.word_count(), 2);
    }
}
