//! Watchdog CLI - quarantine bad rows before they reach downstream jobs.

mod cli;
mod commands;
mod rule_arg;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Exit code when `--fail-on-quarantine` is set and rows were quarantined.
const EXIT_QUARANTINED: i32 = 2;

fn main() {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Validate(args) => commands::validate::run(args, cli.verbose).map(exit_code),

        Commands::Columns { file, json } => commands::columns::run(file, json, cli.verbose).map(|()| 0),
    };

    match result {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn exit_code(gate_failed: bool) -> i32 {
    if gate_failed { EXIT_QUARANTINED } else { 0 }
}

/// Log to stderr so `--json` output on stdout stays machine-readable.
///
/// `RUST_LOG` wins over `--verbose` when set.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .with(filter)
        .init();
}
