//! Evaluation verdict document

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::policy::PolicySnapshot;
use crate::registry::EvaluationSummary;

/// Candidate validation metrics as seen by the gate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricSnapshot {
    pub roc_auc: f64,
    pub precision_at_min_recall: f64,
}

/// Production validation metrics as recorded in the registry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaselineSnapshot {
    pub roc_auc: f64,
    pub precision_at_min_recall: Option<f64>,
}

/// Candidate minus production
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricDelta {
    pub roc_auc: f64,
    pub precision_at_min_recall: Option<f64>,
}

/// Outcome of one gate evaluation
///
/// A failed gate is a normal verdict with `passed = false`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationVerdict {
    pub passed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub policy: PolicySnapshot,
    pub candidate_val: MetricSnapshot,
    /// `None` on the bootstrap path
    #[serde(default)]
    pub production_val: Option<BaselineSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta: Option<MetricDelta>,
    pub evaluated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    /// Version this verdict was consumed by, once promoted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promoted_as: Option<String>,
}

impl EvaluationVerdict {
    /// True when no production baseline was compared against
    pub fn is_bootstrap(&self) -> bool {
        self.production_val.is_none()
    }

    /// Audit copy stored in the registry after promotion
    pub fn summary(&self) -> EvaluationSummary {
        EvaluationSummary {
            passed: self.passed,
            delta: self.delta,
            policy: Some(self.policy),
            evaluated_at: Some(self.evaluated_at),
        }
    }

    /// Record that this verdict produced `version`
    pub fn mark_promoted(&mut self, version: &str) {
        self.promoted_as = Some(version.to_string());
    }
}
