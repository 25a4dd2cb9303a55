//! Evaluation metric adapter.
//!
//! Metrics are separate from the training objective: a model trained with
//! Focal Loss is monitored here with F1. The boosting-engine contract is a
//! three-tuple `(name, value, higher_is_better)`, captured by
//! [`MetricValue`]; any replacement metric must replicate exactly that
//! triple and the `p > 0.5` thresholding rule, since changing the threshold
//! changes search outcomes non-trivially.

use crate::error::Result;
use crate::focal::{sigmoid, validate_batch};

/// The three-tuple an evaluation metric reports to the boosting engine.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetricValue {
    /// Metric name, used in per-fold history reporting.
    pub name: &'static str,
    /// The scalar metric value.
    pub value: f64,
    /// Whether larger values indicate a better model.
    pub higher_is_better: bool,
}

/// A metric evaluated on raw boosting scores against ground-truth labels.
///
/// Mirrors the engine's metric_fn contract:
/// `(predictions, dataset_handle) -> (name, value, maximize_flag)`.
pub trait EvalMetric: Send + Sync {
    /// Evaluates the metric on a batch of raw (pre-sigmoid) scores.
    ///
    /// # Errors
    ///
    /// Returns the batch data-contract errors of
    /// [`FocalLoss::gradient_hessian`](crate::focal::FocalLoss::gradient_hessian)
    /// for mismatched lengths or labels outside {0, 1}.
    fn evaluate(&self, raw_scores: &[f64], labels: &[f64]) -> Result<MetricValue>;
}

/// F1 score on sigmoid-calibrated probabilities thresholded at 0.5.
///
/// `p > 0.5` maps to the positive class. Degenerate batches (no predicted
/// or no actual positives) score 0.0 rather than dividing by zero.
///
/// # Examples
///
/// ```
/// use focalopt::metric::{EvalMetric, F1Metric};
///
/// let m = F1Metric.evaluate(&[3.0, -3.0, 2.0], &[1.0, 0.0, 1.0]).unwrap();
/// assert_eq!(m.name, "f1");
/// assert_eq!(m.value, 1.0);
/// assert!(m.higher_is_better);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct F1Metric;

impl EvalMetric for F1Metric {
    fn evaluate(&self, raw_scores: &[f64], labels: &[f64]) -> Result<MetricValue> {
        validate_batch(raw_scores, labels)?;

        let mut true_pos = 0usize;
        let mut false_pos = 0usize;
        let mut false_neg = 0usize;
        for (&score, &label) in raw_scores.iter().zip(labels) {
            let predicted = sigmoid(score) > 0.5;
            let actual = label == 1.0;
            match (predicted, actual) {
                (true, true) => true_pos += 1,
                (true, false) => false_pos += 1,
                (false, true) => false_neg += 1,
                (false, false) => {}
            }
        }

        let denom = 2 * true_pos + false_pos + false_neg;
        let value = if denom == 0 {
            0.0
        } else {
            2.0 * true_pos as f64 / denom as f64
        };

        Ok(MetricValue {
            name: "f1",
            value,
            higher_is_better: true,
        })
    }
}
