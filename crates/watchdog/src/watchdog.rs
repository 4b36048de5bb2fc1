//! Main Watchdog struct and file-level API.

use std::path::Path;

use tracing::info;

use crate::dataset::Dataset;
use crate::error::Result;
use crate::input::{Parser, ParserConfig, SourceMetadata};
use crate::output::RunReport;
use crate::rules::RuleSet;
use crate::session::{execute, ValidationOutcome};
use crate::validation::EngineConfig;

/// Configuration for a Watchdog instance.
#[derive(Debug, Clone, Default)]
pub struct WatchdogConfig {
    /// How files are read.
    pub parser: ParserConfig,
    /// How rules are evaluated.
    pub engine: EngineConfig,
}

impl WatchdogConfig {
    /// Replace the parser configuration.
    pub fn with_parser(mut self, parser: ParserConfig) -> Self {
        self.parser = parser;
        self
    }

    /// Replace the engine configuration.
    pub fn with_engine(mut self, engine: EngineConfig) -> Self {
        self.engine = engine;
        self
    }
}

/// Outcome of validating a file on disk.
#[derive(Debug, Clone)]
pub struct FileValidation {
    /// The parsed dataset.
    pub dataset: Dataset,
    /// Provenance of the file.
    pub source: SourceMetadata,
    /// Validation results.
    pub outcome: ValidationOutcome,
}

impl FileValidation {
    /// Build a run report carrying the source metadata.
    pub fn report(&self) -> RunReport {
        RunReport::new(&self.outcome).with_source(self.source.clone())
    }
}

/// Parses files and validates them against a rule set.
#[derive(Debug, Clone, Default)]
pub struct Watchdog {
    config: WatchdogConfig,
    parser: Parser,
}

impl Watchdog {
    /// Create a Watchdog with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a Watchdog with custom configuration.
    pub fn with_config(config: WatchdogConfig) -> Self {
        let parser = Parser::with_config(config.parser.clone());
        Self { config, parser }
    }

    /// The active configuration.
    pub fn config(&self) -> &WatchdogConfig {
        &self.config
    }

    /// Read a file without validating it.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<(Dataset, SourceMetadata)> {
        self.parser.parse_file(path)
    }

    /// Validate an in-memory dataset.
    pub fn validate_dataset(&self, dataset: &Dataset, rules: &RuleSet) -> Result<ValidationOutcome> {
        execute(dataset, rules, &self.config.engine)
    }

    /// Parse a file and validate it.
    ///
    /// Rules are checked against the file's header before any row is
    /// evaluated, so a misnamed column fails fast with a configuration error.
    pub fn validate_file(&self, path: impl AsRef<Path>, rules: &RuleSet) -> Result<FileValidation> {
        let path = path.as_ref();
        let (dataset, source) = self.parser.parse_file(path)?;
        info!(file = %source.file, rows = dataset.len(), "validating file");

        let outcome = self.validate_dataset(&dataset, rules)?;

        Ok(FileValidation {
            dataset,
            source,
            outcome,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WatchdogError;
    use crate::rules::{Preset, Rule};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_validate_file_with_preset() {
        let file = create_test_file(
            "Price,Quantity,Customer ID\n10,1,C1\n-2,1,C2\n5,,C3\n7,2,\n",
        );

        let result = Watchdog::new()
            .validate_file(file.path(), &Preset::Ecommerce.rules())
            .unwrap();

        assert_eq!(result.source.row_count, 4);
        assert!(result.source.hash.starts_with("sha256:"));
        assert_eq!(result.outcome.summary().clean_rows, 1);
        assert_eq!(result.outcome.summary().pass_rate, 25.0);

        let report = result.report();
        assert_eq!(report.source.as_ref().map(|s| s.row_count), Some(4));
    }

    #[test]
    fn test_validate_file_missing_column() {
        let file = create_test_file("a,b\n1,2\n");
        let rules = RuleSet::new().with_rule(Rule::not_null("Price"));

        let err = Watchdog::new().validate_file(file.path(), &rules);
        assert!(matches!(err, Err(WatchdogError::Configuration(_))));
    }

    #[test]
    fn test_validate_file_no_rules() {
        let file = create_test_file("a\n1\n");
        let err = Watchdog::new().validate_file(file.path(), &RuleSet::new());
        assert!(matches!(err, Err(WatchdogError::NoRulesConfigured)));
    }

    #[test]
    fn test_sequential_engine() {
        let config = WatchdogConfig::default().with_engine(EngineConfig { parallel: false });
        let ds = Dataset::from_records(vec!["n".to_string()], vec![vec![1.into()], vec![1.into()]])
            .unwrap();
        let rules = RuleSet::new().with_rule(Rule::unique("n"));

        let outcome = Watchdog::with_config(config).validate_dataset(&ds, &rules).unwrap();
        assert_eq!(outcome.failed().len(), 2);
    }
}
