//! Watchdog: rule-based validation and quarantine for tabular data.
//!
//! Rows that break a rule are split off into a failed set annotated with a
//! human-readable `failure_reason`; rows that pass every rule form the clean
//! set. Nothing is modified, dropped or reordered.
//!
//! # Example
//!
//! ```no_run
//! use watchdog::{Rule, RuleSet, Watchdog};
//!
//! let rules = RuleSet::new()
//!     .with_rule(Rule::range("Price", Some(0.0), None).unwrap())
//!     .with_rule(Rule::not_null("Customer ID"));
//!
//! let result = Watchdog::new().validate_file("transactions.csv", &rules).unwrap();
//! let summary = result.outcome.summary();
//! println!("{} of {} rows passed ({}%)", summary.clean_rows, summary.total_rows, summary.pass_rate);
//! ```

pub mod dataset;
pub mod error;
pub mod input;
pub mod output;
pub mod rules;
pub mod session;
pub mod validation;

mod watchdog;

/// Library version, recorded in run reports.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use crate::watchdog::{FileValidation, Watchdog, WatchdogConfig};
pub use dataset::{ColumnProfile, Dataset, Row, RowId, Value};
pub use error::{Result, WatchdogError};
pub use input::{Parser, ParserConfig, SourceMetadata};
pub use output::{ExportPaths, OutputFormat, RunReport};
pub use rules::{Preset, Rule, RuleFile, RuleKind, RuleParams, RuleSet};
pub use session::{SessionState, ValidationOutcome, ValidationSession, Validator};
pub use validation::{EngineConfig, FailedRow, FailedSet, Summary, ViolationRecord};
