//! Provenance of an ingested file.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata about the source data file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// SHA-256 hash of the file contents, prefixed with `sha256:`.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Detected format (csv, tsv, etc.).
    pub format: String,
    /// Delimiter used to split fields.
    pub delimiter: char,
    /// Number of data rows (excluding header).
    pub row_count: usize,
    /// Number of columns.
    pub column_count: usize,
    /// Rows that had to be padded or truncated to the header width.
    pub ragged_rows: usize,
    /// When the file was read.
    pub loaded_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Describe a file that has just been parsed.
    pub fn new(path: PathBuf, hash: String, size_bytes: u64, delimiter: u8) -> Self {
        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            file,
            path,
            hash,
            size_bytes,
            format: format_name(delimiter).to_string(),
            delimiter: char::from(delimiter),
            row_count: 0,
            column_count: 0,
            ragged_rows: 0,
            loaded_at: Utc::now(),
        }
    }

    /// Record the shape of the parsed dataset.
    pub fn with_shape(mut self, row_count: usize, column_count: usize, ragged_rows: usize) -> Self {
        self.row_count = row_count;
        self.column_count = column_count;
        self.ragged_rows = ragged_rows;
        self
    }
}

/// Short format name for a delimiter.
pub fn format_name(delimiter: u8) -> &'static str {
    match delimiter {
        b'\t' => "tsv",
        b',' => "csv",
        b';' => "csv-semicolon",
        b'|' => "psv",
        _ => "delimited",
    }
}
