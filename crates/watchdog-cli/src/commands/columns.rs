//! Columns command - profile a file to help pick rule columns.

use std::path::PathBuf;

use colored::Colorize;
use watchdog::Watchdog;

pub fn run(file: PathBuf, json_output: bool, _verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (dataset, source) = Watchdog::new().load(&file)?;
    let profiles = dataset.profile();

    if json_output {
        let profile = serde_json::json!({
            "file": source.file,
            "rows": dataset.len(),
            "columns": profiles,
        });
        println!("{}", serde_json::to_string_pretty(&profile)?);
        return Ok(());
    }

    println!(
        "{} {} ({} rows)",
        "Columns in".cyan().bold(),
        source.file.white(),
        dataset.len()
    );
    println!();
    println!(
        "  {:<4} {:<28} {:>8} {:>8} {:>8} {:>8}",
        "#", "name", "nulls", "numbers", "text", "distinct"
    );

    for profile in &profiles {
        let nulls = if profile.null_count > 0 {
            format!("{:>8}", profile.null_count).yellow()
        } else {
            format!("{:>8}", profile.null_count).normal()
        };
        let name = if profile.is_numeric() {
            format!("{:<28}", profile.name).green()
        } else {
            format!("{:<28}", profile.name).normal()
        };
        println!(
            "  {:<4} {} {} {:>8} {:>8} {:>8}",
            profile.position + 1,
            name,
            nulls,
            profile.number_count,
            profile.text_count,
            profile.unique_count
        );
    }

    Ok(())
}
