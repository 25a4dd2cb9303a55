//! Central finite-difference derivative engine.
//!
//! Approximates first and second derivatives of a smooth scalar function
//! with centered stencils, both with O(h²) truncation error:
//!
//! - first:  `(f(x + h) - f(x - h)) / (2h)`
//! - second: `(f(x + h) - 2 f(x) + f(x - h)) / h²`
//!
//! The engine has no shared state and is safely re-entrant. All other
//! arguments of the differentiated function are held fixed by the caller,
//! either closed over or (for batches) routed through the sample index of
//! [`central_difference_batch`].

/// Which derivative a finite-difference evaluation approximates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DerivativeOrder {
    /// First derivative, centered two-point stencil.
    First,
    /// Second derivative, centered three-point stencil.
    Second,
}

/// Default finite-difference step size.
///
/// This is a precision/stability trade-off knob, not an invariant: a
/// smaller step tightens the O(h²) truncation error but amplifies
/// catastrophic cancellation in the floating-point subtraction, a larger
/// step does the reverse. `1e-6` is a good compromise for unit-scale
/// inputs such as raw boosting scores; override it via
/// [`FocalLoss::with_step`](crate::focal::FocalLoss::with_step) when the
/// score scale differs.
pub const DEFAULT_STEP: f64 = 1e-6;

/// Approximates the `order`-th derivative of `f` at `x` with step `step`.
///
/// # Examples
///
/// ```
/// use focalopt::numdiff::{central_difference, DerivativeOrder, DEFAULT_STEP};
///
/// let d = central_difference(f64::sin, 0.0, DerivativeOrder::First, DEFAULT_STEP);
/// assert!((d - 1.0).abs() < 1e-8);
///
/// let d2 = central_difference(f64::sin, 0.0, DerivativeOrder::Second, 1e-4);
/// assert!(d2.abs() < 1e-6);
/// ```
pub fn central_difference<F>(f: F, x: f64, order: DerivativeOrder, step: f64) -> f64
where
    F: Fn(f64) -> f64,
{
    match order {
        DerivativeOrder::First => (f(x + step) - f(x - step)) / (2.0 * step),
        DerivativeOrder::Second => (f(x + step) - 2.0 * f(x) + f(x - step)) / (step * step),
    }
}

/// Approximates the `order`-th derivative of `f` at every point of `xs`.
///
/// `f` receives the sample index alongside the evaluation point so that
/// per-sample fixed arguments (e.g. the label vector) stay explicit rather
/// than being captured one closure per sample. Differentiation is applied
/// independently per sample; the output has the same length as `xs`.
pub fn central_difference_batch<F>(f: F, xs: &[f64], order: DerivativeOrder, step: f64) -> Vec<f64>
where
    F: Fn(usize, f64) -> f64,
{
    xs.iter()
        .enumerate()
        .map(|(i, &x)| match order {
            DerivativeOrder::First => (f(i, x + step) - f(i, x - step)) / (2.0 * step),
            DerivativeOrder::Second => {
                (f(i, x + step) - 2.0 * f(i, x) + f(i, x - step)) / (step * step)
            }
        })
        .collect()
}
