//! Tabular data model: typed scalar values, rows with stable identifiers.

mod column;
mod table;
mod value;

pub use column::ColumnProfile;
pub use table::{Dataset, Row, RowId};
pub use value::Value;
