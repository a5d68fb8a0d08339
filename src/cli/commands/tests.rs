//! CLI command tests

use super::*;
use crate::config::{
    EvaluateArgs, HistoryArgs, OutputFormat, PromoteArgs, ScoreArgs, StatusArgs,
};
use crate::error::Error;
use crate::gate::{CandidateMetrics, EvaluationVerdict, PromotionPolicy};
use crate::registry::RegistryStore;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn settings(dir: &TempDir) -> Settings {
    Settings {
        artifact_dir: dir.path().join("artifacts"),
        registry_path: dir.path().join("model_registry/metadata.json"),
        history_dir: dir.path().join("model_registry/history"),
        production_dir: None,
        policy: PromotionPolicy::default(),
    }
}

fn write_candidate(settings: &Settings, auc: f64, precision: f64) {
    let candidate = CandidateMetrics::with_val(auc, precision, 0.8);
    crate::document::save(&settings.candidate_metrics_path(), &candidate).unwrap();
    fs::write(settings.candidate_model_path(), format!("model-{auc}")).unwrap();
}

fn evaluate_default(settings: &Settings) -> CommandOutcome {
    evaluate::run_evaluate(EvaluateArgs::default(), settings, LogLevel::Quiet).unwrap()
}

fn promote_default(settings: &Settings) -> Result<CommandOutcome> {
    promote::run_promote(PromoteArgs::default(), settings, LogLevel::Quiet)
}

fn saved_verdict(settings: &Settings) -> EvaluationVerdict {
    crate::document::load(&settings.evaluation_result_path(), "evaluation result").unwrap()
}

#[test]
fn test_exit_codes() {
    assert_eq!(CommandOutcome::Success.exit_code(), 0);
    assert_eq!(CommandOutcome::GateFailed.exit_code(), 1);
    assert_eq!(CommandOutcome::Skipped.exit_code(), 1);
}

// ---------------------------------------------------------------------------
// evaluate
// ---------------------------------------------------------------------------

#[test]
fn test_evaluate_bootstrap_pass_writes_verdict() {
    let dir = TempDir::new().unwrap();
    let settings = settings(&dir);
    write_candidate(&settings, 0.9, 0.3);

    assert_eq!(evaluate_default(&settings), CommandOutcome::Success);
    let verdict = saved_verdict(&settings);
    assert!(verdict.passed);
    assert!(verdict.is_bootstrap());
}

#[test]
fn test_evaluate_failure_is_not_an_error() {
    let dir = TempDir::new().unwrap();
    let settings = settings(&dir);
    write_candidate(&settings, 0.9, 0.0);

    assert_eq!(evaluate_default(&settings), CommandOutcome::GateFailed);
    assert!(!saved_verdict(&settings).passed);
}

#[test]
fn test_evaluate_missing_candidate_metrics() {
    let dir = TempDir::new().unwrap();
    let err = evaluate::run_evaluate(EvaluateArgs::default(), &settings(&dir), LogLevel::Quiet)
        .unwrap_err();
    assert!(matches!(err, Error::MissingInput { what: "candidate metrics", .. }));
}

#[test]
fn test_evaluate_threshold_override() {
    let dir = TempDir::new().unwrap();
    let settings = settings(&dir);
    write_candidate(&settings, 0.80, 0.3);
    assert_eq!(evaluate_default(&settings), CommandOutcome::Success);
    assert_eq!(promote_default(&settings).unwrap(), CommandOutcome::Success);

    // +0.03 clears the default but not an override of 0.05.
    write_candidate(&settings, 0.83, 0.3);
    let args = EvaluateArgs { min_auc_improvement: Some(0.05), ..EvaluateArgs::default() };
    let outcome = evaluate::run_evaluate(args, &settings, LogLevel::Quiet).unwrap();
    assert_eq!(outcome, CommandOutcome::GateFailed);
    assert_eq!(saved_verdict(&settings).policy.min_auc_improvement, 0.05);
}

#[test]
fn test_evaluate_rejects_invalid_override() {
    let dir = TempDir::new().unwrap();
    let settings = settings(&dir);
    write_candidate(&settings, 0.9, 0.3);
    let args = EvaluateArgs { min_recall_guardrail: Some(0.0), ..EvaluateArgs::default() };
    let err = evaluate::run_evaluate(args, &settings, LogLevel::Quiet).unwrap_err();
    assert!(matches!(err, Error::Config { .. }));
}

// ---------------------------------------------------------------------------
// promote
// ---------------------------------------------------------------------------

#[test]
fn test_promote_after_pass_marks_verdict() {
    let dir = TempDir::new().unwrap();
    let settings = settings(&dir);
    write_candidate(&settings, 0.9, 0.3);
    evaluate_default(&settings);

    assert_eq!(promote_default(&settings).unwrap(), CommandOutcome::Success);
    assert_eq!(saved_verdict(&settings).promoted_as.as_deref(), Some("v0.1.0"));

    let record = settings.registry_store().read().unwrap();
    assert_eq!(record.current_model.as_deref(), Some("v0.1.0"));
    assert!(settings.production_dir().join("model_v0.1.0.joblib").is_file());
}

#[test]
fn test_promote_twice_with_same_verdict_is_refused() {
    let dir = TempDir::new().unwrap();
    let settings = settings(&dir);
    write_candidate(&settings, 0.9, 0.3);
    evaluate_default(&settings);
    promote_default(&settings).unwrap();

    let err = promote_default(&settings).unwrap_err();
    assert!(matches!(err, Error::AlreadyPromoted { ref version } if version == "v0.1.0"));
    assert_eq!(settings.registry_store().history().unwrap().len(), 1);
}

#[test]
fn test_promote_succeeds_when_verdict_cannot_be_marked() {
    let dir = TempDir::new().unwrap();
    let settings = settings(&dir);
    write_candidate(&settings, 0.9, 0.3);
    evaluate_default(&settings);

    // A directory in the temp file's place makes the verdict save fail.
    let mut blocker = settings.evaluation_result_path().into_os_string();
    blocker.push(".tmp");
    fs::create_dir_all(&blocker).unwrap();

    assert_eq!(promote_default(&settings).unwrap(), CommandOutcome::Success);
    let record = settings.registry_store().read().unwrap();
    assert_eq!(record.current_model.as_deref(), Some("v0.1.0"));
    assert!(saved_verdict(&settings).promoted_as.is_none());
}

#[test]
fn test_promote_skips_failed_verdict() {
    let dir = TempDir::new().unwrap();
    let settings = settings(&dir);
    write_candidate(&settings, 0.9, 0.0);
    evaluate_default(&settings);

    assert_eq!(promote_default(&settings).unwrap(), CommandOutcome::Skipped);
    assert!(!settings.registry_path.exists());
    assert!(!settings.history_dir.exists());
    assert!(!settings.production_dir().exists());
}

#[test]
fn test_promote_without_evaluation_is_fatal() {
    let dir = TempDir::new().unwrap();
    let err = promote_default(&settings(&dir)).unwrap_err();
    assert!(matches!(err, Error::MissingInput { what: "evaluation result", .. }));
}

#[test]
fn test_promote_with_path_overrides() {
    let dir = TempDir::new().unwrap();
    let settings = settings(&dir);
    write_candidate(&settings, 0.9, 0.3);
    evaluate_default(&settings);

    let registry = dir.path().join("elsewhere/registry.json");
    let prod = dir.path().join("served");
    let args = PromoteArgs {
        registry: Some(registry.clone()),
        production_dir: Some(prod.clone()),
        ..PromoteArgs::default()
    };
    promote::run_promote(args, &settings, LogLevel::Quiet).unwrap();

    assert!(registry.is_file());
    assert!(!settings.registry_path.exists());
    assert!(prod.join("model_v0.1.0.joblib").is_file());
}

// ---------------------------------------------------------------------------
// status / history
// ---------------------------------------------------------------------------

#[test]
fn test_status_on_empty_registry() {
    let dir = TempDir::new().unwrap();
    let outcome =
        status::run_status(StatusArgs::default(), &settings(&dir), LogLevel::Quiet).unwrap();
    assert_eq!(outcome, CommandOutcome::Success);
}

#[test]
fn test_status_verify_detects_tampering() {
    let dir = TempDir::new().unwrap();
    let settings = settings(&dir);
    write_candidate(&settings, 0.9, 0.3);
    evaluate_default(&settings);
    promote_default(&settings).unwrap();

    let args = StatusArgs { verify: true, ..StatusArgs::default() };
    assert!(status::run_status(args.clone(), &settings, LogLevel::Quiet).is_ok());

    fs::write(settings.production_dir().join("model_v0.1.0.joblib"), b"tampered").unwrap();
    let err = status::run_status(args, &settings, LogLevel::Quiet).unwrap_err();
    assert!(matches!(err, Error::ServingUnavailable { .. }));
}

#[test]
fn test_status_malformed_registry_is_fatal() {
    let dir = TempDir::new().unwrap();
    let settings = settings(&dir);
    fs::create_dir_all(settings.registry_path.parent().unwrap()).unwrap();
    fs::write(&settings.registry_path, "{").unwrap();

    let err = status::run_status(StatusArgs::default(), &settings, LogLevel::Quiet).unwrap_err();
    assert_eq!(err.code(), "E010");
}

#[test]
fn test_history_lists_archived_records() {
    let dir = TempDir::new().unwrap();
    let settings = settings(&dir);
    write_candidate(&settings, 0.80, 0.3);
    evaluate_default(&settings);
    promote_default(&settings).unwrap();

    let entries = settings.registry_store().history().unwrap();
    assert_eq!(entries.len(), 1);
    let table = history::format_table(&entries);
    assert!(table.contains("1 record(s)"));

    let args = HistoryArgs { format: OutputFormat::Json, limit: Some(5), ..HistoryArgs::default() };
    assert!(history::run_history(args, &settings, LogLevel::Quiet).is_ok());
}

#[test]
fn test_format_info_lists_metrics() {
    let mut record = crate::registry::RegistryRecord::bootstrap();
    record.current_model = Some("v0.1.2".into());
    record.artifact_path = Some("artifacts/production/model_v0.1.2.joblib".into());
    record.metrics.insert("val_roc_auc".into(), 0.91234);
    let info = crate::serving::ProductionInfo::from_record(&record).unwrap();

    let text = status::format_info(&info);
    assert!(text.contains("Production model: v0.1.2"));
    assert!(text.contains("val_roc_auc: 0.9123"));
}

// ---------------------------------------------------------------------------
// score
// ---------------------------------------------------------------------------

fn write_predictions(dir: &Path) -> PathBuf {
    let path = dir.join("predictions.json");
    fs::write(
        &path,
        r#"{
            "val":  {"y_true": [0, 0, 1, 1], "y_score": [0.1, 0.4, 0.35, 0.8]},
            "test": {"y_true": [0, 1, 0, 1], "y_score": [0.2, 0.9, 0.3, 0.7]}
        }"#,
    )
    .unwrap();
    path
}

#[test]
fn test_score_writes_candidate_metrics() {
    let dir = TempDir::new().unwrap();
    let settings = settings(&dir);
    let args = ScoreArgs {
        predictions: write_predictions(dir.path()),
        dataset: Some("creditcardfraud".into()),
        ..ScoreArgs::default()
    };

    score::run_score(args, &settings, LogLevel::Quiet).unwrap();

    let candidate: CandidateMetrics =
        crate::document::load(&settings.candidate_metrics_path(), "candidate metrics").unwrap();
    assert_eq!(candidate.dataset.as_deref(), Some("creditcardfraud"));
    assert_eq!(candidate.guardrail.min_recall, 0.8);
    assert!((candidate.val.roc_auc - 0.75).abs() < 1e-12);
    assert!((candidate.test.roc_auc - 1.0).abs() < 1e-12);
    assert!((candidate.val.fraud_rate - 0.5).abs() < 1e-12);
}

#[test]
fn test_score_length_mismatch_is_metrics_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.json");
    fs::write(
        &path,
        r#"{"val": {"y_true": [0, 1], "y_score": [0.5]}, "test": {"y_true": [0, 1], "y_score": [0.1, 0.9]}}"#,
    )
    .unwrap();

    let args = ScoreArgs { predictions: path, ..ScoreArgs::default() };
    let err = score::run_score(args, &settings(&dir), LogLevel::Quiet).unwrap_err();
    assert_eq!(err.code(), "E050");
}
