//! Core types for the word-recognition channel

use crate::constants::BASE_VOCABULARY;

/// A single recognition report: the most recent word and its confidence
#[derive(Debug, Clone, PartialEq)]
pub struct WordEvent {
    /// Recognized word text
    pub word: String,
    /// Confidence score (0.0-1.0)
    pub confidence: f32,
}

impl WordEvent {
    pub fn new(word: impl Into<String>, confidence: f32) -> Self {
        Self {
            word: word.into(),
            confidence,
        }
    }
}

/// Word list handed to the recognizer when a session activates.
///
/// Holds lowercase tokens with no duplicates. Order is first-insertion
/// order and only matters for presentation.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    words: Vec<String>,
}

impl Vocabulary {
    /// The base conversational vocabulary with no extras
    pub fn base() -> Self {
        Self::with_extras(&[])
    }

    /// Base vocabulary unioned with caller-supplied extra words
    pub fn with_extras(extras: &[String]) -> Self {
        let mut vocab = Self {
            words: Vec::with_capacity(BASE_VOCABULARY.len() + extras.len()),
        };
        for word in BASE_VOCABULARY {
            vocab.push(word);
        }
        for word in extras {
            vocab.push(word);
        }
        vocab
    }

    fn push(&mut self, word: &str) {
        let token = word.trim().to_lowercase();
        if token.is_empty() || self.words.iter().any(|w| *w == token) {
            return;
        }
        self.words.push(token);
    }

    /// Case-insensitive membership test
    pub fn contains(&self, word: &str) -> bool {
        let token = word.to_lowercase();
        self.words.iter().any(|w| *w == token)
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::base()
    }
}
