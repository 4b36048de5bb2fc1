//! Quarantine partitioning into clean and failed rows.

use tracing::warn;

use crate::dataset::{Dataset, Row};

use super::aggregator::Aggregation;

/// Name of the derived column carrying the joined failure messages.
pub const FAILURE_REASON_COLUMN: &str = "failure_reason";

/// Separator between messages of one row.
pub const REASON_SEPARATOR: &str = "; ";

/// Reason given to a bad row that has no recorded message.
pub const UNKNOWN_REASON: &str = "Unknown";

/// A quarantined row and why it was rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct FailedRow {
    /// The source row, unchanged.
    pub row: Row,
    /// Failure messages joined with `"; "`.
    pub failure_reason: String,
}

/// The quarantined subset.
///
/// Carries the source schema even when empty, so consumers always see the
/// same shape: the source columns followed by `failure_reason`.
#[derive(Debug, Clone, PartialEq)]
pub struct FailedSet {
    source_columns: Vec<String>,
    rows: Vec<FailedRow>,
}

impl FailedSet {
    /// Columns of the source dataset.
    pub fn source_columns(&self) -> &[String] {
        &self.source_columns
    }

    /// All columns, ending with `failure_reason`.
    pub fn columns(&self) -> Vec<&str> {
        self.source_columns
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(FAILURE_REASON_COLUMN))
            .collect()
    }

    /// Quarantined rows in original order.
    pub fn rows(&self) -> &[FailedRow] {
        &self.rows
    }

    /// Number of quarantined rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if nothing was quarantined.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// The dataset split into its two buckets.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    /// Rows that passed every rule.
    pub clean: Dataset,
    /// Rows that failed at least one rule.
    pub failed: FailedSet,
}

/// Split `dataset` by the aggregated bad rows.
///
/// Both buckets keep the original relative order and row identifiers.
pub fn partition(dataset: &Dataset, aggregation: &Aggregation) -> Partition {
    let clean = dataset.filter(|row| !aggregation.bad_ids.contains(&row.id()));

    let rows = dataset
        .rows()
        .iter()
        .filter(|row| aggregation.bad_ids.contains(&row.id()))
        .map(|row| {
            let failure_reason = match aggregation.messages_for(row.id()) {
                Some(messages) if !messages.is_empty() => messages.join(REASON_SEPARATOR),
                _ => {
                    warn!(row = %row.id(), "quarantined row has no failure message");
                    UNKNOWN_REASON.to_string()
                }
            };
            FailedRow {
                row: row.clone(),
                failure_reason,
            }
        })
        .collect();

    Partition {
        clean,
        failed: FailedSet {
            source_columns: dataset.columns().to_vec(),
            rows,
        },
    }
}
