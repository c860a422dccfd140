//! # textlens layers
//!
//! Built-in layers for textlens providers.
//!
//! Currently implemented layers:
//! - `LoggingLayer`: Logs provider operations with timing information
//! - `RetryLayer`: Retry with exponential backoff for transient failures
//!
//! ## Usage
//!
//! ```ignore
//! use textlens_core::AnalysisExecutor;
//! use textlens_layer::{LoggingLayer, RetryLayer};
//!
//! let executor = AnalysisExecutor::builder(provider, "gpt-4o-mini")
//!     .layer(LoggingLayer::new())
//!     .layer(RetryLayer::new())
//!     .finish();
//! ```

pub mod logging;
pub mod retry;

// Re-exports
pub use logging::LoggingLayer;
pub use retry::{CancelToken, RetryLayer, Sleeper, TokioSleeper};
