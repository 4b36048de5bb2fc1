//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use watchdog::input::parse_delimiter;
use watchdog::{OutputFormat, Preset, Rule};

use crate::rule_arg::parse_rule_arg;

/// Watchdog: rule-based data quality gate for CSV files
#[derive(Parser)]
#[command(name = "watchdog")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a data file and split it into clean and quarantined rows
    Validate(ValidateArgs),

    /// List columns with null, number and text counts
    Columns {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Path to the data file (CSV/TSV)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Inline rule: not_null:COL, unique:COL, range:COL:MIN:MAX, member_of:COL:a|b|c
    #[arg(short, long = "rule", value_name = "RULE", value_parser = parse_rule_arg)]
    pub rules: Vec<Rule>,

    /// JSON rule file ({"rules": [...]})
    #[arg(long, value_name = "FILE")]
    pub rules_file: Option<PathBuf>,

    /// Built-in rule set (ecommerce)
    #[arg(long)]
    pub preset: Option<Preset>,

    /// Write both result files next to the input (clean_<name>, failed_<name>)
    #[arg(long)]
    pub save: bool,

    /// Output path for clean rows (implies --save)
    #[arg(long, value_name = "PATH")]
    pub clean_out: Option<PathBuf>,

    /// Output path for quarantined rows (implies --save)
    #[arg(long, value_name = "PATH")]
    pub failed_out: Option<PathBuf>,

    /// Format of the result files
    #[arg(short, long, default_value = "csv")]
    pub format: OutputFormat,

    /// Write a JSON run report
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// Number of quarantined rows to print
    #[arg(long, default_value = "10")]
    pub preview: usize,

    /// Field delimiter (default: auto-detect)
    #[arg(short, long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,

    /// Cell value treated as null; repeat to list several (replaces the defaults)
    #[arg(long = "null-value", value_name = "TOKEN")]
    pub null_values: Vec<String>,

    /// Evaluate rules on a single thread
    #[arg(long)]
    pub sequential: bool,

    /// Print the run report as JSON instead of a summary
    #[arg(long)]
    pub json: bool,

    /// Exit with status 2 when any row is quarantined
    #[arg(long)]
    pub fail_on_quarantine: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_validate_args() {
        let cli = Cli::try_parse_from([
            "watchdog",
            "validate",
            "orders.csv",
            "--rule",
            "range:Price:0:",
            "-r",
            "not_null:Customer ID",
            "--preset",
            "ecommerce",
            "--format",
            "json",
            "--fail-on-quarantine",
        ])
        .unwrap();

        let Commands::Validate(args) = cli.command else {
            panic!("expected validate");
        };
        assert_eq!(args.rules.len(), 2);
        assert_eq!(args.preset, Some(Preset::Ecommerce));
        assert_eq!(args.format, OutputFormat::Json);
        assert!(args.fail_on_quarantine);
        assert_eq!(args.preview, 10);
    }

    #[test]
    fn test_bad_rule_rejected_by_parser() {
        let result = Cli::try_parse_from(["watchdog", "validate", "f.csv", "--rule", "bogus:x"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_delimiter_arg() {
        let cli = Cli::try_parse_from(["watchdog", "validate", "f.tsv", "-d", "tab"]).unwrap();
        let Commands::Validate(args) = cli.command else {
            panic!("expected validate");
        };
        assert_eq!(args.delimiter, Some(b'\t'));
    }
}
