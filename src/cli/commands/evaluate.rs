//! Evaluate command implementation

use super::{to_json, CommandOutcome};
use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{EvaluateArgs, Settings};
use crate::document;
use crate::error::Result;
use crate::gate::{evaluate_now, CandidateMetrics, PromotionPolicy};
use crate::registry::{FileRegistryStore, RegistryStore};

pub fn run_evaluate(
    args: EvaluateArgs,
    settings: &Settings,
    log_level: LogLevel,
) -> Result<CommandOutcome> {
    let policy = policy_with_overrides(settings.policy, &args);
    policy.validate()?;

    let candidate_path = args.candidate_metrics.unwrap_or_else(|| settings.candidate_metrics_path());
    let candidate: CandidateMetrics = document::load(&candidate_path, "candidate metrics")?;

    let store = match &args.registry {
        Some(path) => FileRegistryStore::new(path, &settings.history_dir),
        None => settings.registry_store(),
    };
    let registry = store.read()?;
    log(
        log_level,
        LogLevel::Verbose,
        &format!(
            "Comparing {} against {}",
            candidate_path.display(),
            registry.current_model.as_deref().unwrap_or("<no production model>")
        ),
    );

    let verdict = evaluate_now(&candidate, &registry, &policy);
    let output = args.output.unwrap_or_else(|| settings.evaluation_result_path());
    document::save(&output, &verdict)?;

    log(log_level, LogLevel::Normal, &to_json(&verdict)?);
    for warning in &verdict.warnings {
        log(log_level, LogLevel::Normal, &format!("Warning: {warning}"));
    }
    log(log_level, LogLevel::Verbose, &format!("Verdict written to {}", output.display()));

    Ok(if verdict.passed { CommandOutcome::Success } else { CommandOutcome::GateFailed })
}

fn policy_with_overrides(mut policy: PromotionPolicy, args: &EvaluateArgs) -> PromotionPolicy {
    if let Some(value) = args.min_auc_improvement {
        policy.min_auc_improvement = value;
    }
    if let Some(value) = args.min_recall_guardrail {
        policy.min_recall_guardrail = value;
    }
    policy
}
