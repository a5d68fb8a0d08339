//! Promotion policy thresholds

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default minimum absolute ROC AUC gain over production (1.5 points)
pub const DEFAULT_MIN_AUC_IMPROVEMENT: f64 = 0.015;
/// Default recall floor for precision-at-recall
pub const DEFAULT_MIN_RECALL_GUARDRAIL: f64 = 0.80;

/// Thresholds a candidate must clear to replace production
///
/// Fixed for the lifetime of a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromotionPolicy {
    /// Minimum required `candidate_auc - production_auc`
    pub min_auc_improvement: f64,
    /// Recall floor at which precision is measured and compared
    pub min_recall_guardrail: f64,
}

impl Default for PromotionPolicy {
    fn default() -> Self {
        Self {
            min_auc_improvement: DEFAULT_MIN_AUC_IMPROVEMENT,
            min_recall_guardrail: DEFAULT_MIN_RECALL_GUARDRAIL,
        }
    }
}

impl PromotionPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the required AUC improvement
    pub fn with_min_auc_improvement(mut self, value: f64) -> Self {
        self.min_auc_improvement = value;
        self
    }

    /// Set the recall guardrail
    pub fn with_min_recall_guardrail(mut self, value: f64) -> Self {
        self.min_recall_guardrail = value;
        self
    }

    /// Reject thresholds that would make the gate meaningless.
    pub fn validate(&self) -> Result<()> {
        if !self.min_auc_improvement.is_finite() || self.min_auc_improvement.abs() > 1.0 {
            return Err(Error::config(
                "min_auc_improvement",
                format!("{} (must be a finite value in [-1, 1])", self.min_auc_improvement),
            ));
        }
        if !self.min_recall_guardrail.is_finite()
            || self.min_recall_guardrail <= 0.0
            || self.min_recall_guardrail > 1.0
        {
            return Err(Error::config(
                "min_recall_guardrail",
                format!("{} (must be in (0, 1])", self.min_recall_guardrail),
            ));
        }
        Ok(())
    }

    /// Record of the thresholds as applied to one evaluation
    pub fn snapshot(&self, guardrail_non_regression: bool) -> PolicySnapshot {
        PolicySnapshot {
            min_auc_improvement: self.min_auc_improvement,
            min_recall_guardrail: self.min_recall_guardrail,
            guardrail_non_regression: guardrail_non_regression.then_some(true),
        }
    }
}

/// Policy as recorded in a verdict
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolicySnapshot {
    pub min_auc_improvement: f64,
    pub min_recall_guardrail: f64,
    /// Present when precision-at-recall non-regression was enforced
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guardrail_non_regression: Option<bool>,
}
