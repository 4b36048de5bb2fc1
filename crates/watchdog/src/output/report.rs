//! Machine-readable run reports.

use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, WatchdogError};
use crate::input::SourceMetadata;
use crate::rules::RuleKind;
use crate::session::ValidationOutcome;
use crate::validation::Summary;

use super::export::create_file;

/// How many rows one rule flagged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleReport {
    /// Human-readable rule, e.g. `"Price >= 0"`.
    pub rule: String,
    pub kind: RuleKind,
    pub column: String,
    /// Rows flagged by this rule alone.
    pub flagged: usize,
}

/// Everything needed to audit a run after the fact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// When the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Library version that produced the report.
    pub version: String,
    /// The validated file, when the run came from disk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceMetadata>,
    /// Rules applied, in registration order.
    pub rules: Vec<RuleReport>,
    pub summary: Summary,
}

impl RunReport {
    /// Build a report from an outcome.
    pub fn new(outcome: &ValidationOutcome) -> Self {
        let rules = outcome
            .flagged_by_rule()
            .into_iter()
            .map(|(index, flagged)| {
                let rule = &outcome.rules()[index];
                RuleReport {
                    rule: rule.to_string(),
                    kind: rule.kind(),
                    column: rule.column().to_string(),
                    flagged,
                }
            })
            .collect();

        Self {
            generated_at: Utc::now(),
            version: crate::VERSION.to_string(),
            source: None,
            rules,
            summary: outcome.summary().clone(),
        }
    }

    /// Attach source file metadata.
    pub fn with_source(mut self, source: SourceMetadata) -> Self {
        self.source = Some(source);
        self
    }

    /// Human-readable rule descriptions.
    pub fn rules_applied(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.rule.as_str()).collect()
    }

    /// Save the report as pretty JSON.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use watchdog::output::RunReport;
    /// # fn example(report: &RunReport) -> watchdog::Result<()> {
    /// report.save("reports/orders.report.json")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut writer = create_file(path)?;
        serde_json::to_writer_pretty(&mut writer, self).map_err(|e| {
            WatchdogError::Persistence(format!("Failed to serialize run report: {}", e))
        })?;
        writer.flush().map_err(|e| {
            WatchdogError::Persistence(format!("Failed to write run report '{}': {}", path.display(), e))
        })?;
        Ok(())
    }

    /// Load a report saved with [`RunReport::save`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let file = File::open(path).map_err(|e| {
            WatchdogError::Persistence(format!("Failed to open file '{}': {}", path.display(), e))
        })?;

        serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            WatchdogError::Persistence(format!(
                "Failed to parse run report '{}': {}",
                path.display(),
                e
            ))
        })
    }
}
