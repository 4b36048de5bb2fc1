//! Validation engine: evaluate rules, aggregate failures, quarantine rows, summarize.
//!
//! Data flows strictly forward:
//!
//! ```text
//! Dataset + RuleSet -> Evaluator -> aggregate -> partition -> Summary
//! ```
//!
//! None of the stages touch the source dataset; clean and failed sets are
//! new collections.

mod aggregator;
mod evaluator;
mod partition;
mod summary;
mod violation;

pub use aggregator::{aggregate, Aggregation};
pub use evaluator::{evaluate_rule, EngineConfig, Evaluator, RuleEvaluation};
pub use partition::{
    partition, FailedRow, FailedSet, Partition, FAILURE_REASON_COLUMN, REASON_SEPARATOR,
    UNKNOWN_REASON,
};
pub use summary::Summary;
pub use violation::{TypeMismatch, Violation, ViolationCause, ViolationRecord};
