pub mod dialogue_metrics;

pub use dialogue_metrics::*;
