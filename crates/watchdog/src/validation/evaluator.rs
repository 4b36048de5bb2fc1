//! Rule evaluation over a dataset.

use std::collections::HashMap;

use rayon::prelude::*;
use tracing::debug;

use crate::dataset::{Dataset, RowId, Value};
use crate::error::Result;
use crate::rules::{Rule, RuleSet};

use super::violation::Violation;

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Evaluate rules on the rayon thread pool.
    pub parallel: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { parallel: true }
    }
}

/// Result of evaluating one rule: the rule and the rows it flags.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleEvaluation<'r> {
    /// Registration index of the rule.
    pub rule_index: usize,
    /// The evaluated rule.
    pub rule: &'r Rule,
    /// Flagged rows in dataset order.
    pub violations: Vec<Violation>,
}

impl RuleEvaluation<'_> {
    /// Identifiers of the flagged rows.
    pub fn row_ids(&self) -> impl Iterator<Item = RowId> + '_ {
        self.violations.iter().map(|v| v.row)
    }
}

/// Runs every rule of a rule set against a dataset.
pub struct Evaluator {
    config: EngineConfig,
}

impl Evaluator {
    /// Create an evaluator with default configuration.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Create an evaluator with custom configuration.
    pub fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Evaluate all rules, returning results in registration order.
    ///
    /// Every rule is checked against the schema before any row is scanned, so
    /// a misconfigured rule aborts the run without partial results.
    pub fn evaluate<'r>(
        &self,
        dataset: &Dataset,
        rules: &'r RuleSet,
    ) -> Result<Vec<RuleEvaluation<'r>>> {
        for rule in rules {
            rule.check_against(dataset)?;
        }

        let evaluate = |(rule_index, rule): (usize, &'r Rule)| {
            let violations = evaluate_rule(dataset, rule);
            debug!(rule = %rule, flagged = violations.len(), "evaluated rule");
            RuleEvaluation {
                rule_index,
                rule,
                violations,
            }
        };

        let results: Vec<RuleEvaluation<'r>> = if self.config.parallel && rules.len() > 1 {
            rules.as_slice().par_iter().enumerate().map(evaluate).collect()
        } else {
            rules.iter().enumerate().map(evaluate).collect()
        };

        Ok(results)
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

/// Scan the dataset once for a single rule.
pub fn evaluate_rule(dataset: &Dataset, rule: &Rule) -> Vec<Violation> {
    match rule {
        Rule::NotNull { column } => dataset
            .column_values(column)
            .filter(|(_, value)| value.is_null())
            .map(|(row, _)| Violation::failed(row))
            .collect(),

        Rule::Range { column, min, max } => dataset
            .column_values(column)
            .filter_map(|(row, value)| match value {
                Value::Null => None,
                Value::Number(n) => {
                    let within = min.is_none_or(|lo| *n >= lo) && max.is_none_or(|hi| *n <= hi);
                    (!within).then(|| Violation::failed(row))
                }
                Value::Text(_) => Some(Violation::type_mismatch(
                    row,
                    "number",
                    value.type_name(),
                )),
            })
            .collect(),

        Rule::Unique { column } => {
            let mut counts: HashMap<&Value, usize> = HashMap::new();
            for (_, value) in dataset.column_values(column) {
                if !value.is_null() {
                    *counts.entry(value).or_insert(0) += 1;
                }
            }

            dataset
                .column_values(column)
                .filter(|(_, value)| counts.get(value).is_some_and(|&c| c > 1))
                .map(|(row, _)| Violation::failed(row))
                .collect()
        }

        Rule::MemberOf { column, allowed } => dataset
            .column_values(column)
            .filter(|(_, value)| !allowed.contains(*value))
            .map(|(row, _)| Violation::failed(row))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WatchdogError;
    use crate::validation::ViolationCause;

    fn make_dataset(column: &str, values: Vec<Value>) -> Dataset {
        Dataset::from_records(
            vec![column.to_string()],
            values.into_iter().map(|v| vec![v]).collect(),
        )
        .unwrap()
    }

    fn flagged(dataset: &Dataset, rule: &Rule) -> Vec<usize> {
        evaluate_rule(dataset, rule)
            .into_iter()
            .map(|v| v.row.index())
            .collect()
    }

    #[test]
    fn test_not_null() {
        let ds = make_dataset(
            "Customer ID",
            vec!["C001".into(), "C002".into(), "C003".into(), Value::Null, "C005".into()],
        );
        assert_eq!(flagged(&ds, &Rule::not_null("Customer ID")), vec![3]);
    }

    #[test]
    fn test_range_min_only() {
        let ds = make_dataset(
            "Price",
            vec![29.99.into(), 15.50.into(), (-10.0).into(), 99.0.into(), 45.75.into()],
        );
        let rule = Rule::range("Price", Some(0.0), None).unwrap();
        assert_eq!(flagged(&ds, &rule), vec![2]);
    }

    #[test]
    fn test_range_bounds_are_inclusive() {
        let ds = make_dataset("n", vec![0.into(), 10.into(), 11.into(), (-1).into()]);
        let rule = Rule::range("n", Some(0.0), Some(10.0)).unwrap();
        assert_eq!(flagged(&ds, &rule), vec![2, 3]);
    }

    #[test]
    fn test_range_skips_nulls_and_flags_text() {
        let ds = make_dataset("n", vec![Value::Null, "abc".into(), 5.into()]);
        let rule = Rule::range("n", Some(0.0), None).unwrap();

        let violations = evaluate_rule(&ds, &rule);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].row, RowId(1));
        assert!(matches!(
            violations[0].cause,
            ViolationCause::TypeMismatch(tm) if tm.found == "text"
        ));
    }

    #[test]
    fn test_range_flags_nan() {
        let ds = make_dataset("n", vec![f64::NAN.into()]);
        let rule = Rule::range("n", None, Some(1.0)).unwrap();
        assert_eq!(flagged(&ds, &rule), vec![0]);
    }

    #[test]
    fn test_unique_flags_every_occurrence() {
        let ds = make_dataset("ID", vec![1.into(), 2.into(), 2.into(), 3.into(), 4.into()]);
        assert_eq!(flagged(&ds, &Rule::unique("ID")), vec![1, 2]);
    }

    #[test]
    fn test_unique_exempts_nulls() {
        let ds = make_dataset("ID", vec![Value::Null, Value::Null, "a".into()]);
        assert!(flagged(&ds, &Rule::unique("ID")).is_empty());
    }

    #[test]
    fn test_member_of_flags_null_unless_allowed() {
        let ds = make_dataset("Tier", vec!["gold".into(), Value::Null, "tin".into()]);

        let strict = Rule::member_of("Tier", ["gold", "silver"]).unwrap();
        assert_eq!(flagged(&ds, &strict), vec![1, 2]);

        let lenient = Rule::member_of("Tier", [Value::from("gold"), Value::Null]).unwrap();
        assert_eq!(flagged(&ds, &lenient), vec![2]);
    }

    #[test]
    fn test_missing_column_is_configuration_error() {
        let ds = make_dataset("a", vec![1.into()]);
        let rules = RuleSet::new().with_rule(Rule::not_null("b"));

        let err = Evaluator::new().evaluate(&ds, &rules);
        assert!(matches!(err, Err(WatchdogError::Configuration(_))));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let ds = make_dataset("x", (0..50).map(|i| Value::from(i % 7)).collect());
        let rules = RuleSet::new()
            .with_rule(Rule::unique("x"))
            .with_rule(Rule::range("x", Some(1.0), Some(5.0)).unwrap())
            .with_rule(Rule::member_of("x", [0, 1, 2]).unwrap());

        let parallel = Evaluator::with_config(EngineConfig { parallel: true })
            .evaluate(&ds, &rules)
            .unwrap();
        let sequential = Evaluator::with_config(EngineConfig { parallel: false })
            .evaluate(&ds, &rules)
            .unwrap();

        assert_eq!(parallel, sequential);
        assert_eq!(
            parallel.iter().map(|e| e.rule_index).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
    }
}
