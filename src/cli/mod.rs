//! CLI module for promover
//!
//! Command handlers return a [`CommandOutcome`] for the normal results
//! (including a failed gate) and an [`Error`](crate::Error) for fatal ones.

mod commands;
mod logging;

pub use commands::{run_command, CommandOutcome};
pub use logging::{init_tracing, log, LogLevel};

// Re-export Cli from config for convenience
pub use crate::config::Cli;
