//! Error types for the Watchdog library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Watchdog operations.
///
/// Only configuration and usage problems surface here. A malformed cell is
/// never an error: it becomes a violation on its row and the batch carries on.
#[derive(Debug, Error)]
pub enum WatchdogError {
    /// Error reading or writing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid delimiter detected or specified.
    #[error("Invalid delimiter: {0}")]
    InvalidDelimiter(String),

    /// Empty file or no columns to validate.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// The dataset itself is malformed (duplicate row identifiers, unknown columns).
    #[error("Invalid dataset: {0}")]
    InvalidDataset(String),

    /// A rule references a missing column or carries invalid parameters.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// `run()` was called before any rule was registered.
    #[error("No validation rules configured; add at least one rule")]
    NoRulesConfigured,

    /// Results were requested before a successful `run()`.
    #[error("Validation has not been run yet")]
    NotYetValidated,

    /// Error saving or loading result files.
    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl WatchdogError {
    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Creates a configuration error for a column absent from the schema.
    pub fn missing_column(column: &str) -> Self {
        Self::Configuration(format!("column '{}' not found in dataset", column))
    }
}

/// Result type alias for Watchdog operations.
pub type Result<T> = std::result::Result<T, WatchdogError>;
