//! Output record assembly.

use crate::types::{AnalysisRequest, AnalysisResult, Operation};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The persisted outcome of one successful pipeline run.
///
/// Field order matches the persisted JSON layout. Immutable once assembled;
/// storage is the persister's concern.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputRecord {
    pub file: String,
    pub use_case: Operation,
    pub timestamp: DateTime<Utc>,
    pub result: AnalysisResult,
    pub word_count: u64,
    pub language_detected: String,
}

impl OutputRecord {
    /// Combine a validated result with its cross-cutting metadata.
    ///
    /// Pure; the caller captures `timestamp` once at assembly time, and that
    /// value is authoritative over anything in the remote response.
    pub fn assemble(
        file: impl Into<String>,
        request: &AnalysisRequest,
        result: AnalysisResult,
        language_detected: impl Into<String>,
        word_count: u64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            file: file.into(),
            use_case: request.operation,
            timestamp,
            result,
            word_count,
            language_detected: language_detected.into(),
        }
    }
}

/// Whitespace-separated word count of the source text.
pub fn word_count(text: &str) -> u64 {
    text.split_whitespace().count() as u64
}
