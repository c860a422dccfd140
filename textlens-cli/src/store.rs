//! Result persistence.
//!
//! Writes each output record as pretty-printed JSON under the output
//! directory, named after the source file, operation, and the record's own
//! timestamp so concurrent runs against the same document cannot collide.

use std::fs;
use std::path::PathBuf;
use textlens_core::error::LensError;
use textlens_core::record::OutputRecord;

/// Persists output records to a directory.
#[derive(Debug, Clone)]
pub struct OutputStore {
    dir: PathBuf,
}

impl OutputStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Write a record, creating the output directory on demand.
    pub fn save(&self, record: &OutputRecord) -> Result<PathBuf, LensError> {
        fs::create_dir_all(&self.dir).map_err(|err| {
            LensError::output(format!(
                "failed to create output directory {}: {err}",
                self.dir.display()
            ))
        })?;

        let path = self.dir.join(Self::file_name(record));
        let json = serde_json::to_string_pretty(record)?;
        fs::write(&path, json)
            .map_err(|err| LensError::output(format!("failed to write {}: {err}", path.display())))?;

        Ok(path)
    }

    /// `{file}_{use_case}_{YYYY-MM-DD_HH-MM-SS}.json`
    fn file_name(record: &OutputRecord) -> String {
        format!(
            "{}_{}_{}.json",
            record.file,
            record.use_case,
            record.timestamp.format("%Y-%m-%d_%H-%M-%S")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use textlens_core::types::{AnalysisRequest, AnalysisResult, SummaryResult};

    fn sample_record() -> OutputRecord {
        let request = AnalysisRequest::summarize("body text").unwrap();
        let result = AnalysisResult::Summary(SummaryResult {
            summary: "A summary.".to_string(),
            key_points: vec!["one".into(), "two".into(), "three".into()],
        });
        let ts = Utc.with_ymd_and_hms(2025, 11, 12, 15, 30, 45).unwrap();
        OutputRecord::assemble("ai_overview", &request, result, "English", 2, ts)
    }

    #[test]
    fn file_names_embed_source_operation_and_timestamp() {
        assert_eq!(
            OutputStore::file_name(&sample_record()),
            "ai_overview_summarize_2025-11-12_15-30-45.json"
        );
    }

    #[test]
    fn save_creates_the_directory_and_writes_json() {
        let dir = tempfile::tempdir().unwrap();
        let store = OutputStore::new(dir.path().join("output"));

        let path = store.save(&sample_record()).unwrap();
        assert!(path.exists());

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["file"], "ai_overview");
        assert_eq!(written["use_case"], "summarize");
        assert_eq!(written["word_count"], 2);
        assert_eq!(written["language_detected"], "English");
        assert_eq!(written["result"]["key_points"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn records_for_different_operations_do_not_collide() {
        let dir = tempfile::tempdir().unwrap();
        let store = OutputStore::new(dir.path());

        let summary = sample_record();
        let mut sentiment = sample_record();
        sentiment.use_case = textlens_core::types::Operation::Sentiment;

        let a = store.save(&summary).unwrap();
        let b = store.save(&sentiment).unwrap();
        assert_ne!(a, b);
    }
}
