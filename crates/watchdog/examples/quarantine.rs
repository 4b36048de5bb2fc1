//! Example: validate a transactions file and write the two result sets.
//!
//! Usage:
//!   cargo run --example quarantine -- <file_path>
//!
//! Uses the e-commerce preset (Price >= 0, Quantity and Customer ID not null)
//! and writes `clean_<name>.csv` / `failed_<name>.csv` next to the input.

use std::env;
use std::path::Path;

use watchdog::output::save_results;
use watchdog::{ExportPaths, OutputFormat, Preset, Watchdog};

fn main() -> watchdog::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: cargo run --example quarantine -- <file_path>");
        std::process::exit(1);
    }

    let path = Path::new(&args[1]);
    let result = Watchdog::new().validate_file(path, &Preset::Ecommerce.rules())?;
    let summary = result.outcome.summary();

    println!("Rules applied:");
    for rule in result.outcome.rules().describe() {
        println!("  - {}", rule);
    }
    println!();
    println!("Total rows:  {}", summary.total_rows);
    println!("Clean rows:  {}", summary.clean_rows);
    println!("Failed rows: {}", summary.failed_rows);
    println!("Pass rate:   {:.1}%", summary.pass_rate);

    for failed in result.outcome.failed().rows().iter().take(5) {
        println!("  row {}: {}", failed.row.id(), failed.failure_reason);
    }

    let paths = ExportPaths::beside(path, OutputFormat::Csv);
    save_results(&result.outcome, &paths, OutputFormat::Csv)?;
    println!();
    println!("Wrote {} and {}", paths.clean.display(), paths.failed.display());

    Ok(())
}
