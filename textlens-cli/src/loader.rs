//! Document loading.
//!
//! Reads `.txt` and `.pdf` files into plain decoded text. The rest of the
//! pipeline never sees the original format.

use std::fs;
use std::path::Path;
use textlens_core::error::LensError;

/// Supported document extensions, lowercase.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["txt", "pdf"];

/// A loaded document: its display name (file stem) and extracted text.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub name: String,
    pub text: String,
}

/// Load a document from disk.
pub fn load(path: &Path) -> Result<Document, LensError> {
    if !path.exists() {
        return Err(LensError::document(format!(
            "file not found: {}",
            path.display()
        )));
    }
    if !path.is_file() {
        return Err(LensError::document(format!(
            "path is not a file: {}",
            path.display()
        )));
    }

    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    let text = match extension.as_str() {
        "txt" => read_text(path)?,
        "pdf" => read_pdf(path)?,
        other => {
            let supported = SUPPORTED_EXTENSIONS
                .iter()
                .map(|ext| format!(".{ext}"))
                .collect::<Vec<_>>()
                .join(", ");
            return Err(LensError::document(format!(
                "unsupported file type: .{other}; supported types: {supported}"
            )));
        }
    };

    if text.trim().is_empty() {
        return Err(LensError::document(format!(
            "no text content in {}",
            path.display()
        )));
    }

    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());

    Ok(Document { name, text })
}

fn read_text(path: &Path) -> Result<String, LensError> {
    let bytes = fs::read(path)
        .map_err(|err| LensError::document(format!("failed to read {}: {err}", path.display())))?;

    // Accept non-UTF-8 text files rather than refusing them outright
    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
    })
}

fn read_pdf(path: &Path) -> Result<String, LensError> {
    pdf_extract::extract_text(path).map_err(|err| {
        LensError::document(format!(
            "failed to extract text from {}: {err}",
            path.display()
        ))
    })
}
