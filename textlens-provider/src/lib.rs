//! # textlens providers
//!
//! Provider implementations for remote text-generation services.

pub mod openai;

// Re-exports
pub use openai::{OpenAiBuilder, OpenAiProvider};
