//! Speech output abstraction layer for naotalk
//!
//! This crate provides the foundational types and trait for the spoken
//! side of the dialogue loop: the `SpeechSink` every voice backend
//! implements, its configuration, and the built-in console/noop/recording
//! sinks used for dry runs and testing.

pub mod error;
pub mod sink;
pub mod sinks;
pub mod types;

pub use error::{TtsError, TtsResult};
pub use sink::SpeechSink;
pub use types::SpeakerConfig;
