//! Focal Loss objective for imbalanced binary classification.
//!
//! The Focal Loss down-weights well-classified samples through a
//! `(1 - p_t)^gamma` focusing term and re-balances classes through an
//! `alpha` weight:
//!
//! ```text
//! loss(x, t) = -(a·t + (1-a)·(1-t)) · (1 - (t·p + (1-t)·(1-p)))^g
//!              · (t·log(p) + (1-t)·log(1-p)),   p = sigmoid(x)
//! ```
//!
//! where `x` is the raw (pre-sigmoid) model score and `t ∈ {0, 1}` the
//! label. Gradients and Hessians with respect to `x` are obtained through
//! the [`numdiff`](crate::numdiff) engine with labels, `alpha`, and `gamma`
//! held fixed, matching the per-sample gradient/Hessian contract of
//! second-order boosting engines.

use crate::booster::Objective;
use crate::error::{Error, Result};
use crate::numdiff::{central_difference_batch, DerivativeOrder, DEFAULT_STEP};
use crate::space::{keys, Configuration};

/// Numerically stable logistic sigmoid.
///
/// Branches on the sign of `x` so the exponential is always taken of a
/// non-positive argument; large negative scores underflow to 0 instead of
/// overflowing `exp`.
#[inline]
pub(crate) fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Stable `ln(1 + e^x)`, used for `log(p)` and `log(1-p)` without ever
/// evaluating the sigmoid near 0 or 1.
#[inline]
fn softplus(x: f64) -> f64 {
    x.max(0.0) + (-x.abs()).exp().ln_1p()
}

/// The Focal Loss objective with a shared `(alpha, gamma)` pair per batch.
///
/// Both parameters are search-space variables; they must be resolved to
/// concrete floats (via [`FocalLoss::new`] or [`FocalLoss::from_config`])
/// before any derivative computation.
///
/// The objective is pure: calling [`gradient_hessian`](FocalLoss::gradient_hessian)
/// twice with identical inputs yields bit-identical outputs.
///
/// # Examples
///
/// ```
/// use focalopt::focal::FocalLoss;
///
/// let focal = FocalLoss::new(0.25, 2.0).unwrap();
/// let (grad, hess) = focal
///     .gradient_hessian(&[0.0, 1.5, -2.0], &[1.0, 0.0, 1.0])
///     .unwrap();
/// assert_eq!(grad.len(), 3);
/// assert_eq!(hess.len(), 3);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FocalLoss {
    alpha: f64,
    gamma: f64,
    step: f64,
}

impl FocalLoss {
    /// Creates a Focal Loss objective.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAlpha`] unless `alpha ∈ (0, 1)` and
    /// [`Error::InvalidGamma`] unless `gamma ≥ 0`.
    pub fn new(alpha: f64, gamma: f64) -> Result<Self> {
        if !(alpha > 0.0 && alpha < 1.0) {
            return Err(Error::InvalidAlpha(alpha));
        }
        if !(gamma >= 0.0 && gamma.is_finite()) {
            return Err(Error::InvalidGamma(gamma));
        }
        Ok(Self {
            alpha,
            gamma,
            step: DEFAULT_STEP,
        })
    }

    /// Builds the objective from the `alpha` and `gamma` fields of a trial
    /// configuration.
    ///
    /// Custom-objective parameters are kept apart from engine parameters at
    /// the type level: this constructor reads only [`keys::ALPHA`] and
    /// [`keys::GAMMA`], and [`BoosterParams`](crate::booster::BoosterParams)
    /// never sees them.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingParameter`] if either key is absent, or the
    /// validation errors of [`FocalLoss::new`].
    pub fn from_config(config: &Configuration) -> Result<Self> {
        let alpha = config.require(keys::ALPHA)?;
        let gamma = config.require(keys::GAMMA)?;
        Self::new(alpha, gamma)
    }

    /// Overrides the finite-difference step size.
    ///
    /// See [`DEFAULT_STEP`] for the precision/stability trade-off.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDerivativeStep`] unless `step` is positive
    /// and finite.
    pub fn with_step(mut self, step: f64) -> Result<Self> {
        if !(step > 0.0 && step.is_finite()) {
            return Err(Error::InvalidDerivativeStep(step));
        }
        self.step = step;
        Ok(self)
    }

    /// The class-balance weight.
    #[must_use]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// The focusing exponent.
    #[must_use]
    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// Pointwise Focal Loss at raw score `x` for label `t ∈ {0, 1}`.
    ///
    /// `log(p)` and `log(1-p)` are evaluated through softplus so extreme
    /// scores in either direction stay finite.
    #[must_use]
    pub fn loss_at(&self, x: f64, t: f64) -> f64 {
        let weight = self.alpha * t + (1.0 - self.alpha) * (1.0 - t);
        let p = sigmoid(x);
        let p_t = t * p + (1.0 - t) * (1.0 - p);
        // Rounding can push p_t a hair above 1.0; a negative base under a
        // fractional exponent would be NaN.
        let focus = (1.0 - p_t).max(0.0).powf(self.gamma);
        let log_p_t = -(t * softplus(-x) + (1.0 - t) * softplus(x));
        -weight * focus * log_p_t
    }

    /// Elementwise first and second derivatives of the loss with respect to
    /// the raw scores, labels and parameters held fixed.
    ///
    /// Labels are borrowed read-only and never copied or mutated.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LengthMismatch`] if the batches differ in length and
    /// [`Error::InvalidLabel`] (before any derivative computation) if a
    /// label is outside {0, 1}.
    pub fn gradient_hessian(&self, scores: &[f64], labels: &[f64]) -> Result<(Vec<f64>, Vec<f64>)> {
        validate_batch(scores, labels)?;
        let grad = central_difference_batch(
            |i, x| self.loss_at(x, labels[i]),
            scores,
            DerivativeOrder::First,
            self.step,
        );
        let hess = central_difference_batch(
            |i, x| self.loss_at(x, labels[i]),
            scores,
            DerivativeOrder::Second,
            self.step,
        );
        Ok((grad, hess))
    }
}

impl Objective for FocalLoss {
    fn gradient_hessian(&self, scores: &[f64], labels: &[f64]) -> Result<(Vec<f64>, Vec<f64>)> {
        FocalLoss::gradient_hessian(self, scores, labels)
    }

    fn name(&self) -> &'static str {
        "focal"
    }
}

/// Fails fast on length or label-domain violations.
pub(crate) fn validate_batch(scores: &[f64], labels: &[f64]) -> Result<()> {
    if scores.len() != labels.len() {
        return Err(Error::LengthMismatch {
            scores: scores.len(),
            labels: labels.len(),
        });
    }
    for (index, &value) in labels.iter().enumerate() {
        if value != 0.0 && value != 1.0 {
            return Err(Error::InvalidLabel { index, value });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sigmoid_is_stable_at_extremes() {
        assert_eq!(sigmoid(-1000.0), 0.0);
        assert_eq!(sigmoid(1000.0), 1.0);
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-15);
    }

    #[test]
    fn loss_is_finite_for_extreme_scores() {
        let focal = FocalLoss::new(0.25, 2.0).unwrap();
        for &x in &[-500.0, -50.0, 0.0, 50.0, 500.0] {
            for &t in &[0.0, 1.0] {
                let l = focal.loss_at(x, t);
                assert!(l.is_finite(), "loss({x}, {t}) = {l}");
                assert!(l >= 0.0, "loss({x}, {t}) = {l} should be non-negative");
            }
        }
    }

    #[test]
    fn parameter_validation() {
        assert!(matches!(FocalLoss::new(0.0, 1.0), Err(Error::InvalidAlpha(_))));
        assert!(matches!(FocalLoss::new(1.0, 1.0), Err(Error::InvalidAlpha(_))));
        assert!(matches!(FocalLoss::new(0.5, -0.1), Err(Error::InvalidGamma(_))));
        assert!(matches!(
            FocalLoss::new(0.5, 1.0).unwrap().with_step(0.0),
            Err(Error::InvalidDerivativeStep(_))
        ));
    }

    #[test]
    fn rejects_bad_labels_before_differentiating() {
        let focal = FocalLoss::new(0.5, 1.0).unwrap();
        let err = focal
            .gradient_hessian(&[0.0, 0.0], &[1.0, 2.0])
            .unwrap_err();
        assert!(matches!(err, Error::InvalidLabel { index: 1, .. }));

        let err = focal.gradient_hessian(&[0.0], &[1.0, 0.0]).unwrap_err();
        assert!(matches!(
            err,
            Error::LengthMismatch {
                scores: 1,
                labels: 2
            }
        ));
    }
}
