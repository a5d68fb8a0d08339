//! Candidate metrics document produced by training

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::metrics::{self, LabeledScores, MetricsError};

/// Metrics for one data split
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitMetrics {
    pub roc_auc: f64,
    pub precision_at_min_recall: f64,
    /// Positive-class rate of the split
    pub fraud_rate: f64,
}

impl SplitMetrics {
    /// Score a split at the given recall floor
    pub fn from_scores(split: &LabeledScores, min_recall: f64) -> Result<Self, MetricsError> {
        Ok(Self {
            roc_auc: metrics::roc_auc(&split.y_true, &split.y_score)?,
            precision_at_min_recall: metrics::precision_at_min_recall(
                &split.y_true,
                &split.y_score,
                min_recall,
            )?,
            fraud_rate: split.positive_rate(),
        })
    }
}

/// Recall floor the candidate was scored at
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Guardrail {
    pub min_recall: f64,
}

/// Output of training, input of evaluation and promotion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateMetrics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_type: Option<String>,
    pub guardrail: Guardrail,
    pub val: SplitMetrics,
    pub test: SplitMetrics,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Descriptive fields written by the trainer (split ratios, target, ...)
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl CandidateMetrics {
    /// Build a metrics document from labelled validation and test scores
    pub fn from_scores(
        val: &LabeledScores,
        test: &LabeledScores,
        min_recall: f64,
        created_at: DateTime<Utc>,
    ) -> Result<Self, MetricsError> {
        Ok(Self {
            dataset: None,
            model_type: None,
            guardrail: Guardrail { min_recall },
            val: SplitMetrics::from_scores(val, min_recall)?,
            test: SplitMetrics::from_scores(test, min_recall)?,
            created_at: Some(created_at),
            extra: BTreeMap::new(),
        })
    }

    /// Minimal document with identical val and test metrics
    pub fn with_val(roc_auc: f64, precision_at_min_recall: f64, min_recall: f64) -> Self {
        let split = SplitMetrics { roc_auc, precision_at_min_recall, fraud_rate: 0.0 };
        Self {
            dataset: None,
            model_type: None,
            guardrail: Guardrail { min_recall },
            val: split,
            test: split,
            created_at: None,
            extra: BTreeMap::new(),
        }
    }
}
