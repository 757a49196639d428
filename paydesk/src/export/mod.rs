//! File exports: request PDFs and the analytics CSV

pub mod csv;
pub mod document;
pub mod pdf;

pub use csv::{analytics_csv, analytics_file_name, write_analytics_csv};
pub use document::{DocTable, RequestDocument};
pub use pdf::{PdfWriter, write_request_pdf};

use std::path::{Path, PathBuf};

use shared::{AppError, ErrorCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Output directory does not exist: {0}")]
    MissingDirectory(PathBuf),
}

pub type ExportResult<T> = Result<T, ExportError>;

impl From<ExportError> for AppError {
    fn from(err: ExportError) -> Self {
        AppError::with_message(ErrorCode::ExportFailed, err.to_string())
    }
}

/// Write `bytes` as `dir/file_name`, returning the full path
pub(crate) fn write_file(dir: &Path, file_name: &str, bytes: &[u8]) -> ExportResult<PathBuf> {
    if !dir.is_dir() {
        return Err(ExportError::MissingDirectory(dir.to_path_buf()));
    }
    let path = dir.join(file_name);
    std::fs::write(&path, bytes)?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "Export written");
    Ok(path)
}

/// File-name-safe form of user text; anything outside `[A-Za-z0-9._-]` becomes `-`
pub(crate) fn file_component(raw: &str, fallback: &str) -> String {
    let cleaned: String = raw
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '-'
            }
        })
        .collect();
    let cleaned = cleaned.trim_matches(|c| c == '-' || c == '.');
    if cleaned.is_empty() {
        fallback.to_string()
    } else {
        cleaned.to_string()
    }
}

/// `SEMrush Pro` → `semrush-pro`
pub(crate) fn slugify(raw: &str, fallback: &str) -> String {
    let joined = raw.split_whitespace().collect::<Vec<_>>().join("-");
    file_component(&joined.to_lowercase(), fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_component() {
        assert_eq!(file_component("INV-2024-001", "draft"), "INV-2024-001");
        assert_eq!(file_component("INV/2024 01", "draft"), "INV-2024-01");
        assert_eq!(file_component("  ", "draft"), "draft");
        assert_eq!(file_component("../etc", "draft"), "etc");
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("SEMrush Pro", "tool"), "semrush-pro");
        assert_eq!(slugify("  Google   Workspace ", "tool"), "google-workspace");
        assert_eq!(slugify("", "tool"), "tool");
    }

    #[test]
    fn test_write_file_requires_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            write_file(&missing, "a.csv", b"x"),
            Err(ExportError::MissingDirectory(_))
        ));
        let path = write_file(dir.path(), "a.csv", b"x").unwrap();
        assert_eq!(std::fs::read(path).unwrap(), b"x");
    }
}
