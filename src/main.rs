//! Promover CLI
//!
//! # Usage
//!
//! ```bash
//! # Score held-out predictions into candidate metrics
//! promover score --predictions predictions.json
//!
//! # Gate the candidate against production (exit 1 if rejected)
//! promover evaluate
//!
//! # Promote if the gate passed (exit 1 if skipped)
//! promover promote
//!
//! # Inspect production and its history
//! promover status --verify
//! promover history --limit 5
//! ```

use clap::Parser;
use promover::cli::{init_tracing, run_command, Cli, LogLevel};
use std::process::ExitCode;

/// Exit code for errors that abort a run
const FATAL_EXIT: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(LogLevel::from_flags(cli.verbose, cli.quiet));

    match run_command(cli) {
        Ok(outcome) => ExitCode::from(outcome.exit_code()),
        Err(e) => {
            eprintln!("Error [{}]: {e}", e.code());
            ExitCode::from(FATAL_EXIT)
        }
    }
}
