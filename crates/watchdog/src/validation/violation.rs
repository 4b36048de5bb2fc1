//! Violation types produced by rule evaluation.

use std::fmt;

use serde::Serialize;

use crate::dataset::RowId;
use crate::rules::RuleKind;

/// A value whose type does not suit the rule checking it.
///
/// Reported on the row, never raised: the row is quarantined and the run
/// continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TypeMismatch {
    /// Type the rule expects.
    pub expected: &'static str,
    /// Type actually found in the cell.
    pub found: &'static str,
}

impl fmt::Display for TypeMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected {}, found {}", self.expected, self.found)
    }
}

/// Why a row violated a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationCause {
    /// The value failed the rule's check.
    Failed,
    /// The value could not be checked because of its type.
    TypeMismatch(TypeMismatch),
}

/// One row flagged by one rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Violation {
    /// The flagged row.
    pub row: RowId,
    /// Why it was flagged.
    pub cause: ViolationCause,
}

impl Violation {
    /// A plain rule failure.
    pub fn failed(row: RowId) -> Self {
        Self {
            row,
            cause: ViolationCause::Failed,
        }
    }

    /// A failure caused by an unsuitable value type.
    pub fn type_mismatch(row: RowId, expected: &'static str, found: &'static str) -> Self {
        Self {
            row,
            cause: ViolationCause::TypeMismatch(TypeMismatch { expected, found }),
        }
    }
}

/// A presented violation: which row, which rule, and the message shown for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViolationRecord {
    /// The flagged row.
    pub row: RowId,
    /// Registration index of the rule in its rule set.
    pub rule_index: usize,
    /// Kind of the rule.
    pub kind: RuleKind,
    /// Column the rule is bound to.
    pub column: String,
    /// Human-readable failure message.
    pub message: String,
    /// Type detail when the value could not be checked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_mismatch: Option<TypeMismatch>,
}
