//! Registry document schema

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use crate::gate::{MetricDelta, PolicySnapshot};

/// Metric key for the production model's validation ROC AUC
pub const VAL_ROC_AUC: &str = "val_roc_auc";
/// Metric key for validation precision at the guardrail recall
pub const VAL_PRECISION_AT_MIN_RECALL: &str = "val_precision_at_min_recall";
/// Metric key for the recall floor the precision was measured at
pub const GUARDRAIL_MIN_RECALL: &str = "guardrail_min_recall";

/// Durable state of production
///
/// `current_model`, `artifact_path`, `metrics` and `created_at` form the
/// public read contract; the remaining fields are free-form audit data and
/// are kept as raw JSON. Fields this version does not know about are kept
/// in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryRecord {
    /// Live version identifier, `None` before the first promotion
    #[serde(default)]
    pub current_model: Option<String>,
    /// Location of the production artifact
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact_path: Option<String>,
    /// Validation metrics recorded at promotion time
    ///
    /// A `null` map or `null` entries read as absent.
    #[serde(default, deserialize_with = "nullable_metrics")]
    pub metrics: BTreeMap<String, f64>,
    /// When this record became current
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Reason copied from the evaluation verdict
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promotion_reason: Option<serde_json::Value>,
    /// Verdict details copied for audit, see [`EvaluationSummary`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluation_summary: Option<serde_json::Value>,
    /// Hex SHA-256 of the production artifact
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact_sha256: Option<String>,
    /// Unrecognised fields, preserved verbatim
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Audit copy of the verdict that justified a promotion
///
/// This is the shape promotions write; records edited by hand may hold
/// anything in `evaluation_summary`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationSummary {
    pub passed: bool,
    #[serde(default)]
    pub delta: Option<MetricDelta>,
    #[serde(default)]
    pub policy: Option<PolicySnapshot>,
    #[serde(default)]
    pub evaluated_at: Option<DateTime<Utc>>,
}

impl Default for RegistryRecord {
    fn default() -> Self {
        Self::bootstrap()
    }
}

impl RegistryRecord {
    /// The state of a registry that has never seen a promotion
    pub fn bootstrap() -> Self {
        Self {
            current_model: None,
            artifact_path: None,
            metrics: BTreeMap::new(),
            created_at: None,
            promotion_reason: None,
            evaluation_summary: None,
            artifact_sha256: None,
            extra: BTreeMap::new(),
        }
    }

    /// True when no production model is declared
    pub fn is_bootstrap(&self) -> bool {
        self.current_model.is_none()
    }

    /// Look up a recorded metric
    pub fn metric(&self, name: &str) -> Option<f64> {
        self.metrics.get(name).copied()
    }

    /// Promotion reason when it is recorded as text
    pub fn promotion_reason(&self) -> Option<&str> {
        self.promotion_reason.as_ref().and_then(serde_json::Value::as_str)
    }

    /// Evaluation summary when it has the shape promotions write
    pub fn summary(&self) -> Option<EvaluationSummary> {
        self.evaluation_summary.clone().and_then(|v| serde_json::from_value(v).ok())
    }

    /// Check structural validity.
    ///
    /// A declared model must name its artifact.
    pub fn validate(&self) -> Result<(), String> {
        match (&self.current_model, &self.artifact_path) {
            (Some(model), None) => Err(format!("current_model '{model}' has no artifact_path")),
            (Some(model), Some(path)) if path.trim().is_empty() => {
                Err(format!("current_model '{model}' has an empty artifact_path"))
            }
            _ => Ok(()),
        }
    }
}

fn nullable_metrics<'de, D>(deserializer: D) -> Result<BTreeMap<String, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<BTreeMap<String, Option<f64>>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v)))
        .collect())
}
