//! Promote command implementation

use chrono::Utc;

use super::{to_json, CommandOutcome};
use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{PromoteArgs, Settings};
use crate::document;
use crate::error::{Error, Result};
use crate::gate::{CandidateMetrics, EvaluationVerdict};
use crate::promote::Promoter;
use crate::registry::FileRegistryStore;

pub fn run_promote(
    args: PromoteArgs,
    settings: &Settings,
    log_level: LogLevel,
) -> Result<CommandOutcome> {
    let evaluation_path = args.evaluation.unwrap_or_else(|| settings.evaluation_result_path());
    let mut verdict: EvaluationVerdict = document::load(&evaluation_path, "evaluation result")?;

    if !verdict.passed {
        log(log_level, LogLevel::Normal, "Promotion skipped: evaluation did not pass.");
        log(log_level, LogLevel::Normal, &to_json(&verdict)?);
        return Ok(CommandOutcome::Skipped);
    }
    if let Some(version) = &verdict.promoted_as {
        return Err(Error::AlreadyPromoted { version: version.clone() });
    }

    let candidate_metrics_path =
        args.candidate_metrics.unwrap_or_else(|| settings.candidate_metrics_path());
    let candidate: CandidateMetrics =
        document::load(&candidate_metrics_path, "candidate metrics")?;
    let candidate_model = args.candidate_model.unwrap_or_else(|| settings.candidate_model_path());

    let store = FileRegistryStore::new(
        args.registry.as_deref().unwrap_or(&settings.registry_path),
        args.history_dir.as_deref().unwrap_or(&settings.history_dir),
    );
    let production_dir = args.production_dir.unwrap_or_else(|| settings.production_dir());
    let registry_path = store.registry_path().to_path_buf();

    let mut promoter = Promoter::new(store, &production_dir);
    let outcome = promoter.promote(&verdict, &candidate, &candidate_model, Utc::now())?;

    // The promotion has committed; failing to mark the verdict only warns.
    verdict.mark_promoted(&outcome.version);
    if let Err(e) = document::save(&evaluation_path, &verdict) {
        tracing::warn!(
            path = %evaluation_path.display(),
            version = %outcome.version,
            error = %e,
            "promoted, but could not mark the evaluation result as consumed"
        );
        log(
            log_level,
            LogLevel::Normal,
            &format!("Warning: could not mark {} as promoted: {e}", evaluation_path.display()),
        );
    }

    log(log_level, LogLevel::Normal, "Promoted candidate to production!");
    log(log_level, LogLevel::Normal, &format!("New version: {}", outcome.version));
    log(
        log_level,
        LogLevel::Normal,
        &format!("Production model saved to: {}", outcome.artifact_path.display()),
    );
    log(log_level, LogLevel::Normal, &format!("Registry updated: {}", registry_path.display()));
    log(
        log_level,
        LogLevel::Normal,
        &format!("Registry history saved: {}", outcome.history.location.display()),
    );
    if let Some(digest) = &outcome.record.artifact_sha256 {
        log(log_level, LogLevel::Verbose, &format!("Artifact sha256: {digest}"));
    }

    Ok(CommandOutcome::Success)
}
