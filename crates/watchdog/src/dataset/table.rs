//! In-memory tabular dataset with stable row identifiers.

use std::collections::HashSet;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, WatchdogError};

use super::value::Value;

static NULL: Value = Value::Null;

/// Stable identifier of a row, assigned at ingestion and never reassigned.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RowId(pub usize);

impl RowId {
    /// The underlying index.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for RowId {
    fn from(index: usize) -> Self {
        RowId(index)
    }
}

/// A single record: its identifier plus column values in schema order.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    id: RowId,
    values: IndexMap<String, Value>,
}

impl Row {
    /// Create a row from an identifier and its values.
    pub fn new(id: impl Into<RowId>, values: IndexMap<String, Value>) -> Self {
        Self {
            id: id.into(),
            values,
        }
    }

    /// The row identifier.
    pub fn id(&self) -> RowId {
        self.id
    }

    /// Get the value of a column, or `None` if the row has no entry for it.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }

    /// Get the value of a column, treating a missing entry as null.
    pub fn value(&self, column: &str) -> &Value {
        self.values.get(column).unwrap_or(&NULL)
    }

    /// Iterate over `(column, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Represents tabular data as an ordered sequence of rows.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Dataset {
    /// Create an empty dataset with the given columns.
    pub fn new(columns: Vec<String>) -> Result<Self> {
        Self::from_rows(columns, Vec::new())
    }

    /// Create a dataset from positional records.
    ///
    /// Row identifiers are the record positions. Each record must have exactly
    /// one value per column.
    pub fn from_records(columns: Vec<String>, records: Vec<Vec<Value>>) -> Result<Self> {
        let mut rows = Vec::with_capacity(records.len());

        for (index, record) in records.into_iter().enumerate() {
            if record.len() != columns.len() {
                return Err(WatchdogError::InvalidDataset(format!(
                    "record {} has {} values, expected {}",
                    index,
                    record.len(),
                    columns.len()
                )));
            }
            let values = columns.iter().cloned().zip(record).collect();
            rows.push(Row::new(index, values));
        }

        Self::from_rows(columns, rows)
    }

    /// Create a dataset from rows that already carry identifiers.
    ///
    /// Rejects duplicate column names, duplicate row identifiers and rows
    /// holding a column outside the schema.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Row>) -> Result<Self> {
        let mut seen_columns = HashSet::new();
        for column in &columns {
            if !seen_columns.insert(column.as_str()) {
                return Err(WatchdogError::InvalidDataset(format!(
                    "duplicate column '{}'",
                    column
                )));
            }
        }

        let mut seen_ids = HashSet::with_capacity(rows.len());
        for row in &rows {
            if !seen_ids.insert(row.id) {
                return Err(WatchdogError::InvalidDataset(format!(
                    "duplicate row identifier {}",
                    row.id
                )));
            }
            if let Some((column, _)) = row.iter().find(|(c, _)| !seen_columns.contains(c)) {
                return Err(WatchdogError::InvalidDataset(format!(
                    "row {} has column '{}' not in schema",
                    row.id, column
                )));
            }
        }

        Ok(Self { columns, rows })
    }

    /// Column names in schema order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Check whether a column is part of the schema.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// All rows in order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Get the number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row identifiers in order.
    pub fn row_ids(&self) -> impl Iterator<Item = RowId> + '_ {
        self.rows.iter().map(|r| r.id)
    }

    /// Find a row by identifier.
    pub fn get(&self, id: RowId) -> Option<&Row> {
        self.rows.iter().find(|r| r.id == id)
    }

    /// Iterate over `(row id, value)` for one column.
    pub fn column_values<'a>(
        &'a self,
        column: &'a str,
    ) -> impl Iterator<Item = (RowId, &'a Value)> + 'a {
        self.rows.iter().map(move |row| (row.id, row.value(column)))
    }

    /// Build a new dataset holding the rows for which `keep` returns true.
    ///
    /// Relative order and row identifiers are preserved.
    pub fn filter(&self, mut keep: impl FnMut(&Row) -> bool) -> Dataset {
        Dataset {
            columns: self.columns.clone(),
            rows: self.rows.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }
}
