//! CLI command implementations

mod evaluate;
mod history;
mod promote;
mod score;
mod status;

#[cfg(test)]
mod tests;

use serde::Serialize;

use crate::cli::LogLevel;
use crate::config::{Cli, Command, Settings};
use crate::error::Result;

/// Non-fatal result of a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Command completed; for evaluate, the gate passed
    Success,
    /// Evaluation completed and the gate rejected the candidate
    GateFailed,
    /// Promotion was not attempted because the verdict did not pass
    Skipped,
}

impl CommandOutcome {
    /// Process exit code for this outcome
    pub fn exit_code(self) -> u8 {
        match self {
            CommandOutcome::Success => 0,
            CommandOutcome::GateFailed | CommandOutcome::Skipped => 1,
        }
    }
}

/// Execute a CLI command based on the parsed arguments
pub fn run_command(cli: Cli) -> Result<CommandOutcome> {
    let log_level = LogLevel::from_flags(cli.verbose, cli.quiet);
    let settings = Settings::load(cli.config.as_deref())?;
    tracing::debug!(?settings, "settings resolved");

    match cli.command {
        Command::Evaluate(args) => evaluate::run_evaluate(args, &settings, log_level),
        Command::Promote(args) => promote::run_promote(args, &settings, log_level),
        Command::Status(args) => status::run_status(args, &settings, log_level),
        Command::History(args) => history::run_history(args, &settings, log_level),
        Command::Score(args) => score::run_score(args, &settings, log_level),
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
