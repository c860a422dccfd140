//! # textlens-core
//!
//! Core abstractions for textlens: the analysis pipeline that turns a
//! document plus a requested operation into a validated, structured result.
//!
//! The pipeline defends the output contract twice: the prompt builder
//! isolates untrusted document text behind sentinel markers, and the
//! validator rejects any response that does not conform exactly to the
//! operation's schema. Providers implement the single network boundary;
//! layers wrap providers with retry and logging.

pub mod error;
pub mod layer;
pub mod prompt;
pub mod provider;
pub mod record;
pub mod runtime;
pub mod types;
pub mod validate;

// Re-exports
pub use error::LensError;
pub use layer::{Layer, LayeredProvider};
pub use prompt::PromptEnvelope;
pub use provider::Provider;
pub use record::{word_count, OutputRecord};
pub use runtime::AnalysisExecutor;
pub use types::*;

/// Result type alias for analysis operations
pub type Result<T> = std::result::Result<T, LensError>;
