//! Built-in speech sink implementations

pub mod console;
pub mod noop;
pub mod recording;

// Re-export commonly used sinks
pub use console::ConsoleSink;
pub use noop::NoopSink;
pub use recording::RecordingSink;
