//! Declarative column rules.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::dataset::{Dataset, Value};
use crate::error::{Result, WatchdogError};

/// The closed set of rule kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// Value must not be null.
    NotNull,
    /// Numeric value must fall within inclusive bounds.
    Range,
    /// Non-null values must not repeat.
    Unique,
    /// Value must belong to an allowed set.
    MemberOf,
}

impl RuleKind {
    /// Get a human-readable label for the rule kind.
    pub fn label(&self) -> &'static str {
        match self {
            RuleKind::NotNull => "Not Null",
            RuleKind::Range => "Range",
            RuleKind::Unique => "Unique",
            RuleKind::MemberOf => "Member Of",
        }
    }
}

impl FromStr for RuleKind {
    type Err = WatchdogError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "not_null" | "notnull" | "required" => Ok(RuleKind::NotNull),
            "range" | "between" => Ok(RuleKind::Range),
            "unique" => Ok(RuleKind::Unique),
            "member_of" | "memberof" | "in_set" | "in" => Ok(RuleKind::MemberOf),
            _ => Err(WatchdogError::configuration(format!(
                "unknown rule kind '{}'. Use: not_null, range, unique, or member_of.",
                s
            ))),
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleKind::NotNull => write!(f, "not_null"),
            RuleKind::Range => write!(f, "range"),
            RuleKind::Unique => write!(f, "unique"),
            RuleKind::MemberOf => write!(f, "member_of"),
        }
    }
}

/// Optional parameters accompanying a `(kind, column)` pair.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleParams {
    /// Lower bound for `Range`.
    pub min: Option<f64>,
    /// Upper bound for `Range`.
    pub max: Option<f64>,
    /// Allowed values for `MemberOf`.
    pub allowed: Vec<Value>,
}

impl RuleParams {
    /// Create empty parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the lower bound.
    pub fn with_min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    /// Set the upper bound.
    pub fn with_max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    /// Set the allowed values.
    pub fn with_allowed<V: Into<Value>>(mut self, values: impl IntoIterator<Item = V>) -> Self {
        self.allowed = values.into_iter().map(Into::into).collect();
        self
    }
}

/// A single check bound to one column.
///
/// Construct through [`Rule::range`], [`Rule::member_of`] or
/// [`Rule::from_parts`] to get parameter checking; rules deserialized from a
/// rule file are checked by the loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Rule {
    /// Flags rows whose value is null or missing.
    NotNull { column: String },
    /// Flags rows whose value lies outside `[min, max]` or is not numeric.
    Range {
        column: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },
    /// Flags every row whose non-null value occurs more than once.
    Unique { column: String },
    /// Flags rows whose value (null included) is not in `allowed`.
    MemberOf {
        column: String,
        allowed: IndexSet<Value>,
    },
}

impl Rule {
    /// Require a column to have no null values.
    pub fn not_null(column: impl Into<String>) -> Self {
        Rule::NotNull {
            column: column.into(),
        }
    }

    /// Require non-null values of a column to be distinct.
    pub fn unique(column: impl Into<String>) -> Self {
        Rule::Unique {
            column: column.into(),
        }
    }

    /// Require numeric values of a column to fall within inclusive bounds.
    pub fn range(column: impl Into<String>, min: Option<f64>, max: Option<f64>) -> Result<Self> {
        let rule = Rule::Range {
            column: column.into(),
            min,
            max,
        };
        rule.check_params()?;
        Ok(rule)
    }

    /// Require values of a column to be members of `allowed`.
    pub fn member_of<V: Into<Value>>(
        column: impl Into<String>,
        allowed: impl IntoIterator<Item = V>,
    ) -> Result<Self> {
        let rule = Rule::MemberOf {
            column: column.into(),
            allowed: allowed.into_iter().map(Into::into).collect(),
        };
        rule.check_params()?;
        Ok(rule)
    }

    /// Build a rule from a kind, a column and loose parameters.
    pub fn from_parts(kind: RuleKind, column: impl Into<String>, params: RuleParams) -> Result<Self> {
        let column = column.into();
        let rule = match kind {
            RuleKind::NotNull => Rule::not_null(column),
            RuleKind::Unique => Rule::unique(column),
            RuleKind::Range => Rule::range(column, params.min, params.max)?,
            RuleKind::MemberOf => Rule::member_of(column, params.allowed)?,
        };
        rule.check_params()?;
        Ok(rule)
    }

    /// The column this rule is bound to.
    pub fn column(&self) -> &str {
        match self {
            Rule::NotNull { column }
            | Rule::Range { column, .. }
            | Rule::Unique { column }
            | Rule::MemberOf { column, .. } => column,
        }
    }

    /// The kind of this rule.
    pub fn kind(&self) -> RuleKind {
        match self {
            Rule::NotNull { .. } => RuleKind::NotNull,
            Rule::Range { .. } => RuleKind::Range,
            Rule::Unique { .. } => RuleKind::Unique,
            Rule::MemberOf { .. } => RuleKind::MemberOf,
        }
    }

    /// Check that the rule's parameters are usable.
    pub fn check_params(&self) -> Result<()> {
        if self.column().trim().is_empty() {
            return Err(WatchdogError::configuration(format!(
                "{} rule needs a column",
                self.kind()
            )));
        }

        match self {
            Rule::Range { column, min, max } => {
                if min.is_none() && max.is_none() {
                    return Err(WatchdogError::configuration(format!(
                        "range rule on '{}' needs a min or a max",
                        column
                    )));
                }
                if min.is_some_and(|m| !m.is_finite()) || max.is_some_and(|m| !m.is_finite()) {
                    return Err(WatchdogError::configuration(format!(
                        "range rule on '{}' has a non-finite bound",
                        column
                    )));
                }
                if let (Some(lo), Some(hi)) = (min, max) {
                    if lo > hi {
                        return Err(WatchdogError::configuration(format!(
                            "range rule on '{}' has min {} greater than max {}",
                            column, lo, hi
                        )));
                    }
                }
                Ok(())
            }
            Rule::MemberOf { column, allowed } if allowed.is_empty() => {
                Err(WatchdogError::configuration(format!(
                    "member_of rule on '{}' needs at least one allowed value",
                    column
                )))
            }
            _ => Ok(()),
        }
    }

    /// Check the rule's parameters and that its column exists in `dataset`.
    pub fn check_against(&self, dataset: &Dataset) -> Result<()> {
        self.check_params()?;
        if !dataset.has_column(self.column()) {
            return Err(WatchdogError::missing_column(self.column()));
        }
        Ok(())
    }

    /// The fixed message attached to every row this rule flags.
    pub fn failure_message(&self) -> String {
        let column = self.column();
        match self.kind() {
            RuleKind::NotNull => format!("{} is null", column),
            RuleKind::Range => format!("{} out of range", column),
            RuleKind::Unique => format!("{} is duplicate", column),
            RuleKind::MemberOf => format!("{} invalid category", column),
        }
    }
}

/// Human-readable form used when listing the rules applied to a run.
impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::NotNull { column } => write!(f, "{} not null", column),
            Rule::Unique { column } => write!(f, "{} unique", column),
            Rule::Range { column, min, max } => match (min, max) {
                (Some(lo), Some(hi)) => write!(f, "{} between {} and {}", column, lo, hi),
                (Some(lo), None) => write!(f, "{} >= {}", column, lo),
                (None, Some(hi)) => write!(f, "{} <= {}", column, hi),
                (None, None) => write!(f, "{} in range", column),
            },
            Rule::MemberOf { column, allowed } => {
                let values: Vec<String> = allowed
                    .iter()
                    .map(|v| match v {
                        Value::Null => "null".to_string(),
                        other => other.to_string(),
                    })
                    .collect();
                write!(f, "{} in {{{}}}", column, values.join(", "))
            }
        }
    }
}
