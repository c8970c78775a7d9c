//! Built-in word source implementations

pub mod noop;
pub mod scripted;

// Re-export commonly used sources
pub use noop::NoopWordSource;
pub use scripted::{ScriptedConfig, ScriptedWordSource};
