//! Binary classification metrics for the promotion gate
//!
//! Provides the pure functions the gate's inputs are computed with:
//! - Precision/recall curve over all distinct score thresholds
//! - Best precision achievable at or above a recall floor
//! - ROC AUC via the rank-sum (Mann-Whitney) statistic
//!
//! Labels are `0` (negative) or `1` (positive); scores are the predicted
//! probability of the positive class.


use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Errors from metric computation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MetricsError {
    #[error("labels and scores differ in length: {labels} vs {scores}")]
    LengthMismatch { labels: usize, scores: usize },

    #[error("no samples provided")]
    Empty,

    #[error("label at index {index} is {value} (must be 0 or 1)")]
    InvalidLabel { index: usize, value: u8 },

    #[error("score at index {0} is not finite")]
    NonFiniteScore(usize),

    #[error("ROC AUC is undefined when only one class is present")]
    SingleClass,
}

/// Labelled scores for one evaluation split
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabeledScores {
    /// Ground-truth labels (0 or 1)
    pub y_true: Vec<u8>,
    /// Predicted positive-class scores
    pub y_score: Vec<f64>,
}

impl LabeledScores {
    pub fn new(y_true: Vec<u8>, y_score: Vec<f64>) -> Self {
        Self { y_true, y_score }
    }

    /// Number of positive labels
    pub fn positives(&self) -> usize {
        self.y_true.iter().filter(|&&y| y == 1).count()
    }

    /// Fraction of positive labels (0.0 for an empty split)
    pub fn positive_rate(&self) -> f64 {
        if self.y_true.is_empty() {
            return 0.0;
        }
        self.positives() as f64 / self.y_true.len() as f64
    }
}

/// Precision/recall pairs ordered by increasing threshold
///
/// The final point is always `(precision = 1, recall = 0)` with no
/// associated threshold, so `thresholds.len() == precision.len() - 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct PrecisionRecallCurve {
    pub precision: Vec<f64>,
    pub recall: Vec<f64>,
    pub thresholds: Vec<f64>,
}

fn validate(y_true: &[u8], y_score: &[f64]) -> Result<(), MetricsError> {
    if y_true.len() != y_score.len() {
        return Err(MetricsError::LengthMismatch { labels: y_true.len(), scores: y_score.len() });
    }
    if y_true.is_empty() {
        return Err(MetricsError::Empty);
    }
    if let Some((index, &value)) = y_true.iter().enumerate().find(|(_, &y)| y > 1) {
        return Err(MetricsError::InvalidLabel { index, value });
    }
    if let Some(index) = y_score.iter().position(|s| !s.is_finite()) {
        return Err(MetricsError::NonFiniteScore(index));
    }
    Ok(())
}

/// Numeric order of two validated (finite) scores; `-0.0` ties with `0.0`
fn score_cmp(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Indices sorted by descending score
fn descending_order(y_score: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..y_score.len()).collect();
    order.sort_by(|&a, &b| score_cmp(y_score[b], y_score[a]));
    order
}

/// Compute the precision/recall curve for every distinct score threshold.
///
/// A sample is predicted positive when its score is `>=` the threshold.
/// When `y_true` has no positives every recall except the sentinel is 1.
pub fn precision_recall_curve(
    y_true: &[u8],
    y_score: &[f64],
) -> Result<PrecisionRecallCurve, MetricsError> {
    validate(y_true, y_score)?;

    let order = descending_order(y_score);
    let mut tps = Vec::new();
    let mut fps = Vec::new();
    let mut thresholds = Vec::new();
    let mut tp = 0usize;
    let mut fp = 0usize;

    for (pos, &idx) in order.iter().enumerate() {
        if y_true[idx] == 1 {
            tp += 1;
        } else {
            fp += 1;
        }
        let last_of_run = order
            .get(pos + 1)
            .map_or(true, |&next| y_score[next] != y_score[idx]);
        if last_of_run {
            tps.push(tp);
            fps.push(fp);
            thresholds.push(y_score[idx]);
        }
    }

    let total_pos = tp;
    let mut precision: Vec<f64> = tps
        .iter()
        .zip(&fps)
        .map(|(&t, &f)| if t + f == 0 { 0.0 } else { t as f64 / (t + f) as f64 })
        .collect();
    let mut recall: Vec<f64> = tps
        .iter()
        .map(|&t| if total_pos == 0 { 1.0 } else { t as f64 / total_pos as f64 })
        .collect();

    // Lowest threshold first, then the (1, 0) sentinel.
    precision.reverse();
    recall.reverse();
    thresholds.reverse();
    precision.push(1.0);
    recall.push(0.0);

    Ok(PrecisionRecallCurve { precision, recall, thresholds })
}

/// Best precision achievable with recall `>= min_recall`.
///
/// Returns exactly `0.0` when `y_true` has no positives or when no
/// threshold reaches the recall floor.
pub fn precision_at_min_recall(
    y_true: &[u8],
    y_score: &[f64],
    min_recall: f64,
) -> Result<f64, MetricsError> {
    let curve = precision_recall_curve(y_true, y_score)?;
    if !y_true.contains(&1) {
        return Ok(0.0);
    }

    let best = curve
        .precision
        .iter()
        .zip(&curve.recall)
        .filter(|(_, &r)| r >= min_recall)
        .map(|(&p, _)| p)
        .fold(None, |acc: Option<f64>, p| Some(acc.map_or(p, |a| a.max(p))));

    Ok(best.unwrap_or(0.0))
}

/// Area under the ROC curve.
///
/// Tied scores receive their average rank, which matches the trapezoidal
/// area under the empirical ROC curve.
pub fn roc_auc(y_true: &[u8], y_score: &[f64]) -> Result<f64, MetricsError> {
    validate(y_true, y_score)?;

    let n_pos = y_true.iter().filter(|&&y| y == 1).count();
    let n_neg = y_true.len() - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return Err(MetricsError::SingleClass);
    }

    let mut order: Vec<usize> = (0..y_score.len()).collect();
    order.sort_by(|&a, &b| score_cmp(y_score[a], y_score[b]));

    let mut positive_rank_sum = 0.0;
    let mut start = 0;
    while start < order.len() {
        let mut end = start;
        while end + 1 < order.len()
            && y_score[order[end + 1]] == y_score[order[start]]
        {
            end += 1;
        }
        // Ranks are 1-based; ties share the mean of their rank span.
        let avg_rank = (start + end) as f64 / 2.0 + 1.0;
        let tied_pos = order[start..=end].iter().filter(|&&i| y_true[i] == 1).count();
        positive_rank_sum += avg_rank * tied_pos as f64;
        start = end + 1;
    }

    let n_pos_f = n_pos as f64;
    let u = positive_rank_sum - n_pos_f * (n_pos_f + 1.0) / 2.0;
    Ok(u / (n_pos_f * n_neg as f64))
}
