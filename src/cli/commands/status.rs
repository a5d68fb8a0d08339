//! Status command implementation

use super::{to_json, CommandOutcome};
use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{OutputFormat, Settings, StatusArgs};
use crate::error::Result;
use crate::registry::{FileRegistryStore, RegistryStore};
use crate::serving::{resolve_production, ArtifactLoader, BytesLoader, ProductionInfo};

pub fn run_status(args: StatusArgs, settings: &Settings, log_level: LogLevel) -> Result<CommandOutcome> {
    let store = match &args.registry {
        Some(path) => FileRegistryStore::new(path, &settings.history_dir),
        None => settings.registry_store(),
    };

    let record = store.read()?;
    if record.is_bootstrap() {
        match args.format {
            OutputFormat::Json => println!("{}", to_json(&record)?),
            OutputFormat::Text => log(
                log_level,
                LogLevel::Normal,
                &format!("No production model in {}", store.registry_path().display()),
            ),
        }
        return Ok(CommandOutcome::Success);
    }

    let info = if args.verify {
        let info = resolve_production(&store)?;
        let loaded = BytesLoader.load(info.artifact(), info.artifact_sha256.as_deref())?;
        log(
            log_level,
            LogLevel::Verbose,
            &format!("Verified {} ({} bytes, sha256 {})", info.artifact_path, loaded.bytes.len(), loaded.sha256),
        );
        info
    } else {
        ProductionInfo::from_record(&record)?
    };

    match args.format {
        OutputFormat::Json => println!("{}", to_json(&info)?),
        OutputFormat::Text => log(log_level, LogLevel::Normal, &format_info(&info)),
    }
    Ok(CommandOutcome::Success)
}

/// Format the production read contract as text
pub fn format_info(info: &ProductionInfo) -> String {
    let mut lines = vec![
        format!("Production model: {}", info.current_model),
        format!("  Artifact: {}", info.artifact_path),
    ];
    if let Some(created_at) = info.created_at {
        lines.push(format!("  Promoted at: {}", created_at.format("%Y-%m-%d %H:%M:%S UTC")));
    }
    for (name, value) in &info.metrics {
        lines.push(format!("  {name}: {value:.4}"));
    }
    lines.join("\n")
}
