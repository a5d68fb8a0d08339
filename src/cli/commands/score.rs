//! Score command implementation

use chrono::Utc;
use serde::Deserialize;

use super::CommandOutcome;
use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{ScoreArgs, Settings};
use crate::document;
use crate::error::Result;
use crate::gate::CandidateMetrics;
use crate::metrics::LabeledScores;

/// Labelled scores for both held-out splits
#[derive(Debug, Deserialize)]
struct Predictions {
    val: LabeledScores,
    test: LabeledScores,
}

pub fn run_score(args: ScoreArgs, settings: &Settings, log_level: LogLevel) -> Result<CommandOutcome> {
    let policy = match args.min_recall_guardrail {
        Some(value) => settings.policy.with_min_recall_guardrail(value),
        None => settings.policy,
    };
    policy.validate()?;

    let predictions: Predictions = document::load(&args.predictions, "predictions")?;
    let mut candidate = CandidateMetrics::from_scores(
        &predictions.val,
        &predictions.test,
        policy.min_recall_guardrail,
        Utc::now(),
    )?;
    candidate.dataset = args.dataset;
    candidate.model_type = args.model_type;

    let output = args.output.unwrap_or_else(|| settings.candidate_metrics_path());
    document::save(&output, &candidate)?;

    log(
        log_level,
        LogLevel::Normal,
        &format!(
            "VAL  ROC AUC: {:.4} | precision@recall>={}: {:.4}",
            candidate.val.roc_auc, policy.min_recall_guardrail, candidate.val.precision_at_min_recall
        ),
    );
    log(
        log_level,
        LogLevel::Normal,
        &format!(
            "TEST ROC AUC: {:.4} | precision@recall>={}: {:.4}",
            candidate.test.roc_auc,
            policy.min_recall_guardrail,
            candidate.test.precision_at_min_recall
        ),
    );
    log(log_level, LogLevel::Verbose, &format!("Candidate metrics written to {}", output.display()));

    Ok(CommandOutcome::Success)
}
