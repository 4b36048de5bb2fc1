//! Folding per-rule results into per-row failure reasons.

use std::collections::{BTreeMap, BTreeSet};

use crate::dataset::RowId;

use super::evaluator::RuleEvaluation;
use super::violation::{ViolationCause, ViolationRecord};

/// Per-row failure messages merged across every rule.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregation {
    /// Rows that violated at least one rule.
    pub bad_ids: BTreeSet<RowId>,
    /// Messages per row, in rule registration order.
    pub messages: BTreeMap<RowId, Vec<String>>,
    /// Every violation, rule by rule in registration order.
    pub records: Vec<ViolationRecord>,
}

impl Aggregation {
    /// Returns true if no row was flagged.
    pub fn is_clean(&self) -> bool {
        self.bad_ids.is_empty()
    }

    /// Messages recorded for a row.
    pub fn messages_for(&self, row: RowId) -> Option<&[String]> {
        self.messages.get(&row).map(Vec::as_slice)
    }
}

/// Merge rule evaluations into bad rows and ordered messages.
///
/// Evaluations are folded sequentially in registration order, so the message
/// order on each row is deterministic even when rules were evaluated in
/// parallel.
pub fn aggregate(evaluations: &[RuleEvaluation<'_>]) -> Aggregation {
    let mut ordered: Vec<&RuleEvaluation<'_>> = evaluations.iter().collect();
    ordered.sort_by_key(|e| e.rule_index);

    let mut aggregation = Aggregation::default();

    for evaluation in ordered {
        let rule = evaluation.rule;
        let base_message = rule.failure_message();

        for violation in &evaluation.violations {
            let (message, type_mismatch) = match violation.cause {
                ViolationCause::Failed => (base_message.clone(), None),
                ViolationCause::TypeMismatch(tm) => (format!("{} ({})", base_message, tm), Some(tm)),
            };

            aggregation.bad_ids.insert(violation.row);
            aggregation
                .messages
                .entry(violation.row)
                .or_default()
                .push(message.clone());
            aggregation.records.push(ViolationRecord {
                row: violation.row,
                rule_index: evaluation.rule_index,
                kind: rule.kind(),
                column: rule.column().to_string(),
                message,
                type_mismatch,
            });
        }
    }

    aggregation
}
