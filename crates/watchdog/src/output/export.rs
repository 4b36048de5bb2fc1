//! Writing clean and quarantined rows to CSV or JSON.

use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use indexmap::IndexMap;
use tracing::debug;

use crate::dataset::{Dataset, Row, Value};
use crate::error::{Result, WatchdogError};
use crate::session::ValidationOutcome;
use crate::validation::{FailedSet, FAILURE_REASON_COLUMN};

/// File format for exported rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Comma-separated values with a header row.
    #[default]
    Csv,
    /// A JSON array of records.
    Json,
}

impl OutputFormat {
    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = WatchdogError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            _ => Err(WatchdogError::configuration(format!(
                "unknown output format '{}' (expected csv or json)",
                s
            ))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Destinations for the two result buckets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPaths {
    /// Where clean rows go.
    pub clean: PathBuf,
    /// Where quarantined rows go.
    pub failed: PathBuf,
}

impl ExportPaths {
    /// `clean_<stem>.<ext>` and `failed_<stem>.<ext>` inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>, stem: &str, format: OutputFormat) -> Self {
        let dir = dir.as_ref();
        Self {
            clean: dir.join(format!("clean_{}.{}", stem, format.extension())),
            failed: dir.join(format!("failed_{}.{}", stem, format.extension())),
        }
    }

    /// Default destinations next to a source file, named after its stem.
    pub fn beside(source: impl AsRef<Path>, format: OutputFormat) -> Self {
        let source = source.as_ref();
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "data".to_string());
        let dir = source.parent().unwrap_or_else(|| Path::new(""));
        Self::in_dir(dir, &stem, format)
    }
}

/// Write a dataset as CSV: header row, then one record per row.
///
/// Nulls are written as empty fields.
pub fn write_dataset_csv<W: Write>(dataset: &Dataset, writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(dataset.columns())?;
    for row in dataset.rows() {
        csv.write_record(cells(row, dataset.columns()))?;
    }
    csv.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Write quarantined rows as CSV, with `failure_reason` as the last column.
pub fn write_failed_csv<W: Write>(failed: &FailedSet, writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(failed.columns())?;
    for failed_row in failed.rows() {
        let record = cells(&failed_row.row, failed.source_columns())
            .chain(std::iter::once(failed_row.failure_reason.clone()));
        csv.write_record(record)?;
    }
    csv.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Write a dataset as a pretty JSON array of records.
pub fn write_dataset_json<W: Write>(dataset: &Dataset, mut writer: W) -> Result<()> {
    let records: Vec<IndexMap<&str, &Value>> = dataset
        .rows()
        .iter()
        .map(|row| record(row, dataset.columns()))
        .collect();
    serde_json::to_writer_pretty(&mut writer, &records)?;
    writer.flush().map_err(serde_json::Error::io)?;
    Ok(())
}

/// Write quarantined rows as a pretty JSON array, each record carrying `failure_reason`.
pub fn write_failed_json<W: Write>(failed: &FailedSet, mut writer: W) -> Result<()> {
    let reasons: Vec<Value> = failed
        .rows()
        .iter()
        .map(|f| Value::Text(f.failure_reason.clone()))
        .collect();

    let records: Vec<IndexMap<&str, &Value>> = failed
        .rows()
        .iter()
        .zip(&reasons)
        .map(|(failed_row, reason)| {
            let mut rec = record(&failed_row.row, failed.source_columns());
            rec.insert(FAILURE_REASON_COLUMN, reason);
            rec
        })
        .collect();
    serde_json::to_writer_pretty(&mut writer, &records)?;
    writer.flush().map_err(serde_json::Error::io)?;
    Ok(())
}

/// Write clean rows to a file.
pub fn export_clean(dataset: &Dataset, path: impl AsRef<Path>, format: OutputFormat) -> Result<()> {
    let path = path.as_ref();
    let writer = create_file(path)?;
    match format {
        OutputFormat::Csv => write_dataset_csv(dataset, writer)?,
        OutputFormat::Json => write_dataset_json(dataset, writer)?,
    }
    debug!(path = %path.display(), rows = dataset.len(), "wrote clean rows");
    Ok(())
}

/// Write quarantined rows to a file.
pub fn export_failed(failed: &FailedSet, path: impl AsRef<Path>, format: OutputFormat) -> Result<()> {
    let path = path.as_ref();
    let writer = create_file(path)?;
    match format {
        OutputFormat::Csv => write_failed_csv(failed, writer)?,
        OutputFormat::Json => write_failed_json(failed, writer)?,
    }
    debug!(path = %path.display(), rows = failed.len(), "wrote quarantined rows");
    Ok(())
}

/// Write both buckets of an outcome.
///
/// The failed file is always written, even when empty, so downstream jobs
/// can rely on its presence and schema.
pub fn save_results(outcome: &ValidationOutcome, paths: &ExportPaths, format: OutputFormat) -> Result<()> {
    export_clean(outcome.clean(), &paths.clean, format)?;
    export_failed(outcome.failed(), &paths.failed, format)?;
    Ok(())
}

/// Create a file for writing, creating parent directories as needed.
pub(crate) fn create_file(path: &Path) -> Result<BufWriter<File>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| {
                WatchdogError::Persistence(format!(
                    "Failed to create directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let file = File::create(path).map_err(|e| {
        WatchdogError::Persistence(format!("Failed to create file '{}': {}", path.display(), e))
    })?;
    Ok(BufWriter::new(file))
}

fn cells<'a>(row: &'a Row, columns: &'a [String]) -> impl Iterator<Item = String> + 'a {
    columns.iter().map(move |c| row.value(c).to_string())
}

fn record<'a>(row: &'a Row, columns: &'a [String]) -> IndexMap<&'a str, &'a Value> {
    columns.iter().map(|c| (c.as_str(), row.value(c))).collect()
}
