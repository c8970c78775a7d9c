//! Language-model inference abstraction for naotalk
//!
//! This crate provides the thinking side of the dialogue loop: the
//! role-tagged chat history, the `InferencePipeline` trait every model
//! backend implements, and the reply shaping that turns raw model output
//! into something a robot can reasonably say out loud. The built-in
//! canned pipeline serves scripted replies for tests and dry runs; an
//! OpenAI-style HTTP backend is available behind the `http` feature.

pub mod error;
pub mod history;
pub mod pipeline;
pub mod pipelines;
pub mod shaping;

pub use error::{LlmError, LlmResult};
pub use history::{ChatHistory, ChatMessage, Role, DEFAULT_SYSTEM_PROMPT};
pub use pipeline::{GenerationParams, InferencePipeline};
pub use shaping::{shape_reply, EMPTY_REPLY_FALLBACK, PIPELINE_FAULT_FALLBACK};
