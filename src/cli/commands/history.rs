//! History command implementation

use super::{to_json, CommandOutcome};
use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{HistoryArgs, OutputFormat, Settings};
use crate::error::Result;
use crate::registry::{FileRegistryStore, HistoryEntry, RegistryStore};

pub fn run_history(
    args: HistoryArgs,
    settings: &Settings,
    log_level: LogLevel,
) -> Result<CommandOutcome> {
    let store = FileRegistryStore::new(
        &settings.registry_path,
        args.history_dir.as_deref().unwrap_or(&settings.history_dir),
    );
    let mut entries = store.history()?;
    if let Some(limit) = args.limit {
        let skip = entries.len().saturating_sub(limit);
        entries.drain(..skip);
    }

    match args.format {
        OutputFormat::Json => println!("{}", to_json(&entries)?),
        OutputFormat::Text => {
            if entries.is_empty() {
                log(
                    log_level,
                    LogLevel::Normal,
                    &format!("No history in {}", store.history_dir().display()),
                );
            } else {
                log(log_level, LogLevel::Normal, &format_table(&entries));
            }
        }
    }
    Ok(CommandOutcome::Success)
}

/// Format archived records as a table, oldest first
pub fn format_table(entries: &[HistoryEntry]) -> String {
    let mut lines = vec![
        format!("{:<22} {:<10} {:>10}  {}", "ARCHIVED", "MODEL", "VAL AUC", "REASON"),
        "-".repeat(72),
    ];
    for entry in entries {
        let record = &entry.record;
        lines.push(format!(
            "{:<22} {:<10} {:>10}  {}",
            entry.key,
            record.current_model.as_deref().unwrap_or("-"),
            record
                .metric(crate::registry::VAL_ROC_AUC)
                .map_or_else(|| "-".to_string(), |auc| format!("{auc:.4}")),
            record.promotion_reason().unwrap_or(""),
        ));
    }
    lines.push(format!("\n{} record(s)", entries.len()));
    lines.join("\n")
}
