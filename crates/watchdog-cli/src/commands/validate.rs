//! Validate command - run rules and split a file into clean and quarantined rows.

use colored::Colorize;
use tracing::debug;

use watchdog::output::save_results;
use watchdog::{
    EngineConfig, ExportPaths, FileValidation, ParserConfig, RuleFile, RuleSet, Watchdog,
    WatchdogConfig,
};

use crate::cli::ValidateArgs;

/// Returns `Ok(true)` when `--fail-on-quarantine` is set and rows were quarantined.
pub fn run(args: ValidateArgs, verbose: bool) -> Result<bool, Box<dyn std::error::Error>> {
    let rules = collect_rules(&args)?;

    let mut parser = ParserConfig::default();
    if let Some(delimiter) = args.delimiter {
        parser = parser.with_delimiter(delimiter);
    }
    if !args.null_values.is_empty() {
        parser = parser.with_null_values(args.null_values.iter().cloned());
    }
    let config = WatchdogConfig::default()
        .with_parser(parser)
        .with_engine(EngineConfig {
            parallel: !args.sequential,
        });

    let result = Watchdog::with_config(config).validate_file(&args.file, &rules)?;
    let report = result.report();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&result, args.preview, verbose);
    }

    if args.save || args.clean_out.is_some() || args.failed_out.is_some() {
        let defaults = ExportPaths::beside(&args.file, args.format);
        let paths = ExportPaths {
            clean: args.clean_out.clone().unwrap_or(defaults.clean),
            failed: args.failed_out.clone().unwrap_or(defaults.failed),
        };
        save_results(&result.outcome, &paths, args.format)?;

        if !args.json {
            println!();
            println!("{} {}", "Clean rows written to".green(), paths.clean.display());
            println!("{} {}", "Quarantined rows written to".yellow(), paths.failed.display());
        }
    }

    if let Some(report_path) = &args.report {
        report.save(report_path)?;
        if !args.json {
            println!("{} {}", "Report written to".cyan(), report_path.display());
        }
    }

    Ok(args.fail_on_quarantine && !result.outcome.summary().success)
}

/// Preset rules first, then the rule file, then inline rules.
fn collect_rules(args: &ValidateArgs) -> Result<RuleSet, Box<dyn std::error::Error>> {
    let mut rules = RuleSet::new();

    if let Some(preset) = args.preset {
        rules.extend(preset.rules().iter().cloned());
    }
    if let Some(path) = &args.rules_file {
        rules.extend(RuleFile::load(path)?.rules);
    }
    rules.extend(args.rules.iter().cloned());

    debug!(count = rules.len(), "collected rules");
    Ok(rules)
}

fn print_summary(result: &FileValidation, preview: usize, verbose: bool) {
    let outcome = &result.outcome;
    let summary = outcome.summary();

    println!(
        "{} {}",
        "Validation results for".cyan().bold(),
        result.source.file.white()
    );
    if verbose {
        println!("  Format: {}  Hash: {}", result.source.format, result.source.hash);
        if result.source.ragged_rows > 0 {
            println!(
                "  {} rows had the wrong number of fields",
                result.source.ragged_rows.to_string().yellow()
            );
        }
    }
    println!();

    println!("{}", "Rules:".yellow().bold());
    for (index, flagged) in outcome.flagged_by_rule() {
        let count = if flagged == 0 {
            "0 rows".green()
        } else {
            format!("{} rows", flagged).red()
        };
        println!("  {:<40} {}", outcome.rules()[index].to_string(), count);
    }
    println!();

    println!("{}", "Summary:".yellow().bold());
    println!("  Total:       {}", summary.total_rows.to_string().white());
    println!("  Clean:       {}", summary.clean_rows.to_string().green());
    println!("  Quarantined: {}", summary.failed_rows.to_string().red());

    let rate = format!("{:.1}%", summary.pass_rate);
    let rate = if summary.success {
        rate.green().bold()
    } else if summary.pass_rate >= 90.0 {
        rate.yellow().bold()
    } else {
        rate.red().bold()
    };
    println!("  Pass rate:   {}", rate);

    let failed = outcome.failed();
    if failed.is_empty() || preview == 0 {
        return;
    }

    println!();
    println!("{}", "Quarantined rows:".yellow().bold());
    for failed_row in failed.rows().iter().take(preview) {
        println!(
            "  row {:<6} {}",
            failed_row.row.id().to_string().dimmed(),
            failed_row.failure_reason.red()
        );
    }
    if failed.len() > preview {
        println!("  ... and {} more", failed.len() - preview);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use std::fs;
    use tempfile::TempDir;

    const ORDERS: &str = "\
Order,Price,Quantity,Customer ID,Status
O1,29.99,1,C001,paid
O2,-10.00,2,C002,paid
O3,15.50,1,C003,refunded
";

    fn validate_args(args: &[&str]) -> ValidateArgs {
        let argv = ["watchdog", "validate"].into_iter().chain(args.iter().copied());
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Validate(args) => args,
            _ => panic!("expected validate"),
        }
    }

    fn write_orders(dir: &TempDir) -> String {
        let path = dir.path().join("orders.csv");
        fs::write(&path, ORDERS).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_collect_rules_order() {
        let dir = TempDir::new().unwrap();
        let rules_path = dir.path().join("rules.json");
        fs::write(&rules_path, r#"{"rules": [{"kind": "unique", "column": "Order"}]}"#).unwrap();

        let args = validate_args(&[
            "orders.csv",
            "--rule",
            "member_of:Status:paid|refunded",
            "--rules-file",
            rules_path.to_str().unwrap(),
            "--preset",
            "ecommerce",
        ]);
        let rules = collect_rules(&args).unwrap();

        let mut expected = watchdog::Preset::Ecommerce.rules();
        expected.push(watchdog::Rule::unique("Order"));
        expected.extend(args.rules.iter().cloned());
        assert_eq!(rules, expected);
        assert_eq!(rules.len(), 5);
        assert_eq!(rules[3].column(), "Order");
        assert_eq!(rules[4].column(), "Status");
    }

    #[test]
    fn test_fail_on_quarantine_and_save() {
        let dir = TempDir::new().unwrap();
        let file = write_orders(&dir);

        let args = validate_args(&[file.as_str(), "--preset", "ecommerce", "--save", "--json", "--fail-on-quarantine"]);
        assert!(run(args, false).unwrap());

        let clean = dir.path().join("clean_orders.csv");
        let failed = dir.path().join("failed_orders.csv");
        assert!(clean.exists());
        assert!(failed.exists());
        assert!(fs::read_to_string(failed).unwrap().contains("Price out of range"));
    }

    #[test]
    fn test_gate_not_tripped_without_flag() {
        let dir = TempDir::new().unwrap();
        let file = write_orders(&dir);

        let args = validate_args(&[file.as_str(), "--preset", "ecommerce", "--json"]);
        assert!(!run(args, false).unwrap());
        assert!(!dir.path().join("clean_orders.csv").exists());
    }

    #[test]
    fn test_failed_out_writes_both_files() {
        let dir = TempDir::new().unwrap();
        let file = write_orders(&dir);
        let failed_out = dir.path().join("out").join("bad.csv");

        let args = validate_args(&[
            file.as_str(),
            "--rule",
            "range:Price:0:",
            "--failed-out",
            failed_out.to_str().unwrap(),
            "--json",
        ]);
        run(args, false).unwrap();

        assert!(failed_out.exists());
        assert!(dir.path().join("clean_orders.csv").exists());
    }
}
