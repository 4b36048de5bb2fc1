//! Summary statistics for a validation run.

use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;

use super::partition::FailedSet;

/// Read-only snapshot of a run's outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Rows in the source dataset.
    pub total_rows: usize,
    /// Rows that passed every rule.
    pub clean_rows: usize,
    /// Rows quarantined.
    pub failed_rows: usize,
    /// Percentage of clean rows, rounded to one decimal. Zero for an empty dataset.
    ///
    /// Never rounds to 100.0 while a row failed, nor to 0.0 while a row passed.
    pub pass_rate: f64,
    /// True iff nothing was quarantined.
    pub success: bool,
}

impl Summary {
    /// Compute the summary from a dataset and its partition.
    pub fn build(dataset: &Dataset, clean: &Dataset, failed: &FailedSet) -> Self {
        let total_rows = dataset.len();
        let clean_rows = clean.len();
        let failed_rows = failed.len();

        let pass_rate = if total_rows == 0 {
            0.0
        } else {
            percent_of(clean_rows, total_rows)
        };

        Self {
            total_rows,
            clean_rows,
            failed_rows,
            pass_rate,
            success: failed_rows == 0,
        }
    }

    /// Percentage of quarantined rows.
    pub fn fail_rate(&self) -> f64 {
        if self.total_rows == 0 {
            0.0
        } else {
            percent_of(self.failed_rows, self.total_rows)
        }
    }
}

/// `part / total` as a percentage rounded to one decimal, kept off the
/// 0 and 100 endpoints unless `part` really is none or all of `total`.
fn percent_of(part: usize, total: usize) -> f64 {
    let rounded = (part as f64 / total as f64 * 1000.0).round() / 10.0;
    if part == total {
        100.0
    } else if part == 0 {
        0.0
    } else {
        rounded.clamp(0.1, 99.9)
    }
}
