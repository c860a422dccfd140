//! Runtime layer for textlens.
//!
//! Sits between the caller-facing API (`analyze`) and the low-level provider
//! interface (`complete`). The executor owns the sequencing of one pipeline
//! run: prompt construction, language detection, invocation, validation, and
//! record assembly.

pub mod executor;

pub use executor::AnalysisExecutor;
