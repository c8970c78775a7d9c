//! Word-recognition channel abstraction for naotalk
//!
//! This crate provides the core abstractions for the speech-recognition
//! side of the dialogue loop: the word event and vocabulary types, the
//! `WordEventSource` trait every recognizer backend implements, and the
//! built-in scripted/noop backends used for testing and dry runs.

pub mod constants;
pub mod error;
pub mod source;
pub mod sources;
pub mod types;

pub use constants::{BASE_VOCABULARY, NO_SPEECH_SENTINEL};
pub use error::AsrError;
pub use source::WordEventSource;
pub use types::{Vocabulary, WordEvent};
