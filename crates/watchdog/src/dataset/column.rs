//! Per-column value statistics.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::table::Dataset;
use super::value::Value;

/// Counts describing the values held by one column.
///
/// Used to pick rule columns; the validation engine never consults it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnProfile {
    /// Column name.
    pub name: String,
    /// Zero-based position in the schema.
    pub position: usize,
    /// Total number of values (including nulls).
    pub count: usize,
    /// Number of null/missing values.
    pub null_count: usize,
    /// Number of numeric values.
    pub number_count: usize,
    /// Number of text values.
    pub text_count: usize,
    /// Number of distinct non-null values.
    pub unique_count: usize,
}

impl ColumnProfile {
    /// Get the null percentage.
    pub fn null_percentage(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            (self.null_count as f64 / self.count as f64) * 100.0
        }
    }

    /// Returns true if every non-null value is numeric.
    pub fn is_numeric(&self) -> bool {
        self.number_count > 0 && self.text_count == 0
    }
}

impl Dataset {
    /// Profile every column in schema order.
    pub fn profile(&self) -> Vec<ColumnProfile> {
        self.columns()
            .iter()
            .enumerate()
            .map(|(position, name)| {
                let mut profile = ColumnProfile {
                    name: name.clone(),
                    position,
                    ..ColumnProfile::default()
                };
                let mut distinct: HashSet<&Value> = HashSet::new();

                for (_, value) in self.column_values(name) {
                    profile.count += 1;
                    match value {
                        Value::Null => profile.null_count += 1,
                        Value::Number(_) => profile.number_count += 1,
                        Value::Text(_) => profile.text_count += 1,
                    }
                    if !value.is_null() {
                        distinct.insert(value);
                    }
                }

                profile.unique_count = distinct.len();
                profile
            })
            .collect()
    }
}
