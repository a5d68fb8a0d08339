//! Evaluation gate
//!
//! A stateless decision comparing a candidate's validation metrics with the
//! production metrics recorded in the registry under a fixed
//! [`PromotionPolicy`].
//!
//! # Example
//!
//! ```
//! use chrono::Utc;
//! use promover::gate::{evaluate, CandidateMetrics, PromotionPolicy};
//! use promover::registry::RegistryRecord;
//!
//! let candidate = CandidateMetrics::with_val(0.95, 0.3, 0.8);
//! let verdict = evaluate(&candidate, &RegistryRecord::bootstrap(), &PromotionPolicy::default(), Utc::now());
//! assert!(verdict.passed);
//! ```


mod candidate;
mod evaluate;
mod policy;
mod verdict;

pub use candidate::{CandidateMetrics, Guardrail, SplitMetrics};
pub use evaluate::{evaluate, evaluate_now, BOOTSTRAP_FAIL_REASON, BOOTSTRAP_PASS_REASON};
pub use policy::{
    PolicySnapshot, PromotionPolicy, DEFAULT_MIN_AUC_IMPROVEMENT, DEFAULT_MIN_RECALL_GUARDRAIL,
};
pub use verdict::{BaselineSnapshot, EvaluationVerdict, MetricDelta, MetricSnapshot};
