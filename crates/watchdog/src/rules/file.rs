//! Rule files and built-in presets.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WatchdogError};

use super::rule::Rule;
use super::set::RuleSet;

/// A JSON document listing rules in registration order.
///
/// ```json
/// {
///   "rules": [
///     {"kind": "range", "column": "Price", "min": 0},
///     {"kind": "not_null", "column": "Customer ID"},
///     {"kind": "member_of", "column": "Status", "allowed": ["paid", "refunded"]}
///   ]
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleFile {
    /// Rules in registration order.
    pub rules: Vec<Rule>,
}

impl RuleFile {
    /// Parse a rule file from a JSON string, checking every rule's parameters.
    pub fn from_json(json: &str) -> Result<Self> {
        let file: RuleFile = serde_json::from_str(json).map_err(|e| {
            WatchdogError::configuration(format!("invalid rule file: {}", e))
        })?;
        file.check()?;
        Ok(file)
    }

    /// Load a rule file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let file = File::open(path).map_err(|e| WatchdogError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let rule_file: RuleFile = serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            WatchdogError::configuration(format!(
                "invalid rule file '{}': {}",
                path.display(),
                e
            ))
        })?;
        rule_file.check()?;

        Ok(rule_file)
    }

    /// Convert into an ordered rule set.
    pub fn into_rule_set(self) -> RuleSet {
        self.rules.into_iter().collect()
    }

    fn check(&self) -> Result<()> {
        for rule in &self.rules {
            rule.check_params()?;
        }
        Ok(())
    }
}

/// Ready-made rule sets for common datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// E-commerce transactions: `Price >= 0`, `Quantity` and `Customer ID` not null.
    Ecommerce,
}

impl Preset {
    /// The rules making up this preset.
    pub fn rules(&self) -> RuleSet {
        match self {
            Preset::Ecommerce => RuleSet::from_iter([
                Rule::Range {
                    column: "Price".to_string(),
                    min: Some(0.0),
                    max: None,
                },
                Rule::not_null("Quantity"),
                Rule::not_null("Customer ID"),
            ]),
        }
    }
}

impl FromStr for Preset {
    type Err = WatchdogError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "ecommerce" | "e_commerce" => Ok(Preset::Ecommerce),
            _ => Err(WatchdogError::configuration(format!(
                "unknown preset '{}'. Use: ecommerce.",
                s
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_from_json() {
        let file = RuleFile::from_json(
            r#"{"rules": [
                {"kind": "range", "column": "Price", "min": 0},
                {"kind": "not_null", "column": "Customer ID"}
            ]}"#,
        )
        .unwrap();

        let set = file.into_rule_set();
        assert_eq!(set.describe(), vec!["Price >= 0", "Customer ID not null"]);
    }

    #[test]
    fn test_invalid_params_rejected() {
        let err = RuleFile::from_json(r#"{"rules": [{"kind": "range", "column": "Price"}]}"#);
        assert!(matches!(err, Err(WatchdogError::Configuration(_))));
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let err = RuleFile::from_json(r#"{"rules": [{"kind": "regex", "column": "Email"}]}"#);
        assert!(matches!(err, Err(WatchdogError::Configuration(_))));
    }

    #[test]
    fn test_load_from_disk() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{"rules": [{"kind": "unique", "column": "ID"}]}"#)
            .unwrap();

        let rules = RuleFile::load(file.path()).unwrap();
        assert_eq!(rules.rules, vec![Rule::unique("ID")]);
    }

    #[test]
    fn test_ecommerce_preset() {
        let preset: Preset = "e-commerce".parse().unwrap();
        let rules = preset.rules();
        assert_eq!(rules.len(), 3);
        assert_eq!(rules[0].to_string(), "Price >= 0");
    }
}
