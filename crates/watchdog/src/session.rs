//! Validation sessions.
//!
//! A session binds one dataset snapshot and accumulates rules. Its lifecycle
//! is `Created -> RulesConfigured -> Validated`:
//!
//! - [`ValidationSession<Created>`] has no rules; `run()` fails with
//!   [`WatchdogError::NoRulesConfigured`].
//! - [`ValidationSession<RulesConfigured>`] holds an immutable rule set; every
//!   `add_rule` consumes the session and returns the extended one.
//! - `run()` returns a [`ValidationOutcome`], the frozen `Validated` results.
//!
//! [`Validator`] wraps the same lifecycle behind `&mut self` for callers that
//! keep a single long-lived handle.

use std::marker::PhantomData;

use tracing::info;

use crate::dataset::Dataset;
use crate::error::{Result, WatchdogError};
use crate::rules::{Rule, RuleKind, RuleParams, RuleSet};
use crate::validation::{
    aggregate, partition, EngineConfig, Evaluator, FailedSet, Summary, ViolationRecord,
};

/// Session state: dataset bound, no rules.
#[derive(Debug, Clone, Copy)]
pub struct Created;

/// Session state: at least one rule registered.
#[derive(Debug, Clone, Copy)]
pub struct RulesConfigured;

/// A validation session over a borrowed dataset.
#[derive(Debug, Clone)]
pub struct ValidationSession<'d, S = Created> {
    dataset: &'d Dataset,
    rules: RuleSet,
    config: EngineConfig,
    _state: PhantomData<S>,
}

impl<'d> ValidationSession<'d, Created> {
    /// Bind a new session to a dataset.
    pub fn new(dataset: &'d Dataset) -> Self {
        Self::with_config(dataset, EngineConfig::default())
    }

    /// Bind a new session with a custom engine configuration.
    pub fn with_config(dataset: &'d Dataset, config: EngineConfig) -> Self {
        Self {
            dataset,
            rules: RuleSet::new(),
            config,
            _state: PhantomData,
        }
    }

    /// Always fails: a session without rules is a usage error, not a vacuous pass.
    pub fn run(&self) -> Result<ValidationOutcome> {
        Err(WatchdogError::NoRulesConfigured)
    }
}

impl<'d> ValidationSession<'d, RulesConfigured> {
    /// Evaluate every rule and freeze the results.
    ///
    /// Running again recomputes from scratch and yields identical results.
    pub fn run(&self) -> Result<ValidationOutcome> {
        execute(self.dataset, &self.rules, &self.config)
    }
}

impl<'d, S> ValidationSession<'d, S> {
    /// Register a rule.
    ///
    /// Fails with a configuration error if the rule's column is not in the
    /// dataset or its parameters are invalid.
    pub fn add_rule(self, rule: Rule) -> Result<ValidationSession<'d, RulesConfigured>> {
        rule.check_against(self.dataset)?;

        let mut rules = self.rules;
        rules.push(rule);

        Ok(ValidationSession {
            dataset: self.dataset,
            rules,
            config: self.config,
            _state: PhantomData,
        })
    }

    /// Register a rule from a kind, a column and loose parameters.
    pub fn add(
        self,
        kind: RuleKind,
        column: &str,
        params: RuleParams,
    ) -> Result<ValidationSession<'d, RulesConfigured>> {
        let rule = Rule::from_parts(kind, column, params)?;
        self.add_rule(rule)
    }

    /// The bound dataset.
    pub fn dataset(&self) -> &'d Dataset {
        self.dataset
    }

    /// Rules registered so far.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }
}

/// Frozen results of a validation run.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationOutcome {
    rules: RuleSet,
    violations: Vec<ViolationRecord>,
    clean: Dataset,
    failed: FailedSet,
    summary: Summary,
}

impl ValidationOutcome {
    /// Rules that produced this outcome.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Every violation, rule by rule in registration order.
    pub fn violations(&self) -> &[ViolationRecord] {
        &self.violations
    }

    /// Number of rows each rule flagged, in registration order.
    pub fn flagged_by_rule(&self) -> Vec<(usize, usize)> {
        let mut counts = vec![0; self.rules.len()];
        for record in &self.violations {
            counts[record.rule_index] += 1;
        }
        counts.into_iter().enumerate().collect()
    }

    /// Rows that passed every rule.
    pub fn clean(&self) -> &Dataset {
        &self.clean
    }

    /// Rows quarantined with their failure reasons.
    pub fn failed(&self) -> &FailedSet {
        &self.failed
    }

    /// Summary statistics.
    pub fn summary(&self) -> &Summary {
        &self.summary
    }
}

/// Run the full pipeline over a dataset and rule set.
pub fn execute(dataset: &Dataset, rules: &RuleSet, config: &EngineConfig) -> Result<ValidationOutcome> {
    if rules.is_empty() {
        return Err(WatchdogError::NoRulesConfigured);
    }

    let evaluations = Evaluator::with_config(config.clone()).evaluate(dataset, rules)?;
    let aggregation = aggregate(&evaluations);
    let split = partition(dataset, &aggregation);
    let summary = Summary::build(dataset, &split.clean, &split.failed);

    info!(
        rules = rules.len(),
        total = summary.total_rows,
        clean = summary.clean_rows,
        failed = summary.failed_rows,
        "validation complete"
    );

    Ok(ValidationOutcome {
        rules: rules.clone(),
        violations: aggregation.records,
        clean: split.clean,
        failed: split.failed,
        summary,
    })
}

/// Lifecycle stage of a [`Validator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Dataset bound, no rules.
    Created,
    /// Rules registered, not yet run (or rules added since the last run).
    RulesConfigured,
    /// Results available.
    Validated,
}

/// Mutable handle over the session lifecycle.
///
/// Adding a rule after a run discards the previous results; call `run()`
/// again to validate with the extended rule set.
#[derive(Debug, Clone)]
pub struct Validator<'d> {
    dataset: &'d Dataset,
    rules: RuleSet,
    config: EngineConfig,
    outcome: Option<ValidationOutcome>,
}

impl<'d> Validator<'d> {
    /// Bind a validator to a dataset.
    pub fn new(dataset: &'d Dataset) -> Self {
        Self::with_config(dataset, EngineConfig::default())
    }

    /// Bind a validator with a custom engine configuration.
    pub fn with_config(dataset: &'d Dataset, config: EngineConfig) -> Self {
        Self {
            dataset,
            rules: RuleSet::new(),
            config,
            outcome: None,
        }
    }

    /// Current lifecycle stage.
    pub fn state(&self) -> SessionState {
        if self.outcome.is_some() {
            SessionState::Validated
        } else if self.rules.is_empty() {
            SessionState::Created
        } else {
            SessionState::RulesConfigured
        }
    }

    /// Register a rule.
    pub fn add_rule(&mut self, rule: Rule) -> Result<&mut Self> {
        rule.check_against(self.dataset)?;
        self.rules.push(rule);
        self.outcome = None;
        Ok(self)
    }

    /// Register a rule from a kind, a column and loose parameters.
    pub fn add(&mut self, kind: RuleKind, column: &str, params: RuleParams) -> Result<&mut Self> {
        let rule = Rule::from_parts(kind, column, params)?;
        self.add_rule(rule)
    }

    /// Rules registered so far.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Evaluate every rule and keep the results.
    pub fn run(&mut self) -> Result<&ValidationOutcome> {
        let outcome = execute(self.dataset, &self.rules, &self.config)?;
        Ok(self.outcome.insert(outcome))
    }

    /// Results of the last run.
    pub fn outcome(&self) -> Result<&ValidationOutcome> {
        self.outcome.as_ref().ok_or(WatchdogError::NotYetValidated)
    }

    /// Clean rows of the last run.
    pub fn get_clean(&self) -> Result<&Dataset> {
        self.outcome().map(ValidationOutcome::clean)
    }

    /// Quarantined rows of the last run.
    pub fn get_failed(&self) -> Result<&FailedSet> {
        self.outcome().map(ValidationOutcome::failed)
    }

    /// Summary of the last run.
    pub fn get_summary(&self) -> Result<&Summary> {
        self.outcome().map(ValidationOutcome::summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{RowId, Value};

    fn orders() -> Dataset {
        Dataset::from_records(
            vec!["Price".to_string(), "Customer ID".to_string()],
            vec![
                vec![29.99.into(), "C001".into()],
                vec![15.50.into(), "C002".into()],
                vec![(-10.0).into(), "C003".into()],
                vec![99.0.into(), Value::Null],
                vec![45.75.into(), "C005".into()],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_created_session_cannot_run() {
        let ds = orders();
        let session = ValidationSession::new(&ds);
        assert!(matches!(session.run(), Err(WatchdogError::NoRulesConfigured)));
    }

    #[test]
    fn test_typestate_run() {
        let ds = orders();
        let outcome = ValidationSession::new(&ds)
            .add_rule(Rule::range("Price", Some(0.0), None).unwrap())
            .unwrap()
            .add(RuleKind::NotNull, "Customer ID", RuleParams::new())
            .unwrap()
            .run()
            .unwrap();

        assert_eq!(outcome.summary().failed_rows, 2);
        assert_eq!(outcome.summary().pass_rate, 60.0);
        assert_eq!(outcome.flagged_by_rule(), vec![(0, 1), (1, 1)]);
    }

    #[test]
    fn test_missing_column_rejected_at_registration() {
        let ds = orders();
        let err = ValidationSession::new(&ds).add_rule(Rule::not_null("Quantity"));
        assert!(matches!(err, Err(WatchdogError::Configuration(_))));
    }

    #[test]
    fn test_validator_lifecycle() {
        let ds = orders();
        let mut validator = Validator::new(&ds);
        assert_eq!(validator.state(), SessionState::Created);
        assert!(matches!(validator.get_summary(), Err(WatchdogError::NotYetValidated)));
        assert!(matches!(validator.run(), Err(WatchdogError::NoRulesConfigured)));

        validator.add_rule(Rule::not_null("Customer ID")).unwrap();
        assert_eq!(validator.state(), SessionState::RulesConfigured);
        assert!(matches!(validator.get_clean(), Err(WatchdogError::NotYetValidated)));

        validator.run().unwrap();
        assert_eq!(validator.state(), SessionState::Validated);

        let failed = validator.get_failed().unwrap();
        assert_eq!(failed.rows()[0].row.id(), RowId(3));
        assert_eq!(failed.rows()[0].failure_reason, "Customer ID is null");
    }

    #[test]
    fn test_adding_rule_discards_results() {
        let ds = orders();
        let mut validator = Validator::new(&ds);
        validator.add_rule(Rule::not_null("Customer ID")).unwrap();
        validator.run().unwrap();

        validator.add_rule(Rule::unique("Price")).unwrap();
        assert_eq!(validator.state(), SessionState::RulesConfigured);
        assert!(validator.outcome().is_err());
    }

    #[test]
    fn test_failed_registration_keeps_state() {
        let ds = orders();
        let mut validator = Validator::new(&ds);
        validator.add_rule(Rule::not_null("Customer ID")).unwrap();
        validator.run().unwrap();

        assert!(validator.add_rule(Rule::not_null("nope")).is_err());
        assert_eq!(validator.state(), SessionState::Validated);
        assert_eq!(validator.rules().len(), 1);
    }
}
