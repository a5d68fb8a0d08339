//! Gate decision logic

use chrono::{DateTime, Utc};

use super::candidate::CandidateMetrics;
use super::policy::PromotionPolicy;
use super::verdict::{BaselineSnapshot, EvaluationVerdict, MetricDelta, MetricSnapshot};
use crate::registry::{RegistryRecord, VAL_PRECISION_AT_MIN_RECALL, VAL_ROC_AUC};

/// Reason recorded when the first model clears the sanity check
pub const BOOTSTRAP_PASS_REASON: &str = "No current model in registry; bootstrapping baseline.";
/// Reason recorded when the first model cannot reach the recall floor
pub const BOOTSTRAP_FAIL_REASON: &str = "Candidate failed guardrail sanity.";

const GUARDRAIL_TOLERANCE: f64 = 1e-9;

/// Decide whether `candidate` may replace the production model in `registry`.
///
/// With no production baseline (no current model, or no recorded AUC) the
/// candidate only has to reach the recall floor at all. Otherwise it must
/// improve validation AUC by at least `policy.min_auc_improvement` and must
/// not lower precision at the recall floor.
pub fn evaluate(
    candidate: &CandidateMetrics,
    registry: &RegistryRecord,
    policy: &PromotionPolicy,
    evaluated_at: DateTime<Utc>,
) -> EvaluationVerdict {
    let candidate_val = MetricSnapshot {
        roc_auc: candidate.val.roc_auc,
        precision_at_min_recall: candidate.val.precision_at_min_recall,
    };
    let warnings = guardrail_warnings(candidate, policy);

    let production_auc = registry.metric(VAL_ROC_AUC);
    let verdict = match production_auc {
        Some(prod_auc) if !registry.is_bootstrap() => {
            let prod_p = registry.metric(VAL_PRECISION_AT_MIN_RECALL);
            let auc_improvement = candidate_val.roc_auc - prod_auc;
            let auc_ok = auc_improvement >= policy.min_auc_improvement;
            let guardrail_ok = prod_p.map_or(true, |p| candidate_val.precision_at_min_recall >= p);
            let passed = auc_ok && guardrail_ok;

            EvaluationVerdict {
                passed,
                reason: Some(normal_reason(
                    auc_improvement,
                    auc_ok,
                    guardrail_ok,
                    candidate_val.precision_at_min_recall,
                    prod_p,
                    policy,
                )),
                policy: policy.snapshot(true),
                candidate_val,
                production_val: Some(BaselineSnapshot {
                    roc_auc: prod_auc,
                    precision_at_min_recall: prod_p,
                }),
                delta: Some(MetricDelta {
                    roc_auc: auc_improvement,
                    precision_at_min_recall: prod_p
                        .map(|p| candidate_val.precision_at_min_recall - p),
                }),
                evaluated_at,
                warnings,
                promoted_as: None,
            }
        }
        _ => {
            let passed = candidate_val.precision_at_min_recall > 0.0;
            let reason = if passed { BOOTSTRAP_PASS_REASON } else { BOOTSTRAP_FAIL_REASON };
            EvaluationVerdict {
                passed,
                reason: Some(reason.to_string()),
                policy: policy.snapshot(false),
                candidate_val,
                production_val: None,
                delta: None,
                evaluated_at,
                warnings,
                promoted_as: None,
            }
        }
    };

    tracing::info!(
        passed = verdict.passed,
        bootstrap = verdict.is_bootstrap(),
        candidate_auc = candidate_val.roc_auc,
        production_auc = ?production_auc,
        "candidate evaluated"
    );
    verdict
}

/// Evaluate at the current wall-clock time
pub fn evaluate_now(
    candidate: &CandidateMetrics,
    registry: &RegistryRecord,
    policy: &PromotionPolicy,
) -> EvaluationVerdict {
    evaluate(candidate, registry, policy, Utc::now())
}

fn guardrail_warnings(candidate: &CandidateMetrics, policy: &PromotionPolicy) -> Vec<String> {
    let scored_at = candidate.guardrail.min_recall;
    if (scored_at - policy.min_recall_guardrail).abs() <= GUARDRAIL_TOLERANCE {
        return Vec::new();
    }
    tracing::warn!(
        candidate_min_recall = scored_at,
        policy_min_recall = policy.min_recall_guardrail,
        "candidate was scored at a different recall floor than the policy"
    );
    vec![format!(
        "candidate precision was measured at recall >= {scored_at}, policy floor is {}",
        policy.min_recall_guardrail
    )]
}

fn normal_reason(
    auc_improvement: f64,
    auc_ok: bool,
    guardrail_ok: bool,
    candidate_p: f64,
    production_p: Option<f64>,
    policy: &PromotionPolicy,
) -> String {
    if auc_ok && guardrail_ok {
        return format!(
            "Candidate improves val ROC AUC by {auc_improvement:.4} (required {:.4}) without \
             regressing precision at recall >= {}.",
            policy.min_auc_improvement, policy.min_recall_guardrail
        );
    }

    let mut failures = Vec::new();
    if !auc_ok {
        failures.push(format!(
            "val ROC AUC improvement {auc_improvement:.4} is below required {:.4}",
            policy.min_auc_improvement
        ));
    }
    if let (false, Some(prod_p)) = (guardrail_ok, production_p) {
        failures.push(format!(
            "precision at recall >= {} dropped from {prod_p:.4} to {candidate_p:.4}",
            policy.min_recall_guardrail
        ));
    }
    format!("Candidate rejected: {}.", failures.join("; "))
}
