//! Search-space description and trial configurations.
//!
//! A [`SearchSpace`] is an ordered list of named [`Domain`]s. Each domain
//! carries its sampling-distribution kind as a tagged variant so that any
//! [`Strategy`](crate::strategy::Strategy) implementation can pattern-match
//! exhaustively instead of relying on untyped dispatch.
//!
//! A [`Configuration`] is what a strategy proposes for one trial: a mapping
//! from parameter name to `f64` value. The search space generates every
//! value as a float; fields the boosting engine requires as integers are
//! coerced by [`BoosterParams::from_config`](crate::booster::BoosterParams::from_config)
//! before the engine is ever invoked.

use std::collections::BTreeMap;

use crate::error::{Error, Result};

/// Well-known configuration keys.
///
/// Engine parameters are consumed by
/// [`BoosterParams::from_config`](crate::booster::BoosterParams::from_config);
/// the custom-objective parameters [`ALPHA`] and [`GAMMA`] are consumed
/// only by [`FocalLoss::from_config`](crate::focal::FocalLoss::from_config).
pub mod keys {
    /// Shrinkage applied to each boosting round.
    pub const LEARNING_RATE: &str = "learning_rate";
    /// Maximum leaf count per tree (integer-coerced).
    pub const NUM_LEAVES: &str = "num_leaves";
    /// Minimum samples per leaf (integer-coerced).
    pub const MIN_DATA_IN_LEAF: &str = "min_data_in_leaf";
    /// Per-tree feature sampling rate.
    pub const FEATURE_FRACTION: &str = "feature_fraction";
    /// Per-tree row sampling rate.
    pub const BAGGING_FRACTION: &str = "bagging_fraction";
    /// L2 leaf regularization.
    pub const LAMBDA_L2: &str = "lambda_l2";
    /// Requested boosting-round budget (integer-coerced; early stopping may
    /// realize fewer rounds).
    pub const NUM_BOOST_ROUND: &str = "num_boost_round";
    /// Focal Loss class-balance weight.
    pub const ALPHA: &str = "alpha";
    /// Focal Loss focusing exponent.
    pub const GAMMA: &str = "gamma";
}

/// The sampling distribution of one hyperparameter.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Domain {
    /// Uniform continuous draw from `[low, high)`.
    Uniform {
        /// Lower bound (inclusive).
        low: f64,
        /// Upper bound (exclusive).
        high: f64,
    },
    /// Uniform draw from `[low, high]` snapped to the nearest multiple of
    /// `step` above `low`.
    QuantizedUniform {
        /// Lower bound (inclusive).
        low: f64,
        /// Upper bound (inclusive).
        high: f64,
        /// Quantization step, strictly positive.
        step: f64,
    },
    /// A draw from an explicit finite set of values.
    Categorical {
        /// The candidate values.
        choices: Vec<f64>,
    },
}

impl Domain {
    /// Validates the variant's internal constraints.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidBounds`] when `low > high`, [`Error::InvalidStep`]
    /// for a non-positive quantization step, [`Error::EmptyChoices`] for an
    /// empty categorical set.
    pub fn validate(&self) -> Result<()> {
        match *self {
            Domain::Uniform { low, high } | Domain::QuantizedUniform { low, high, .. } => {
                if low > high || !low.is_finite() || !high.is_finite() {
                    return Err(Error::InvalidBounds { low, high });
                }
                if let Domain::QuantizedUniform { step, .. } = *self {
                    if !(step > 0.0 && step.is_finite()) {
                        return Err(Error::InvalidStep);
                    }
                }
                Ok(())
            }
            Domain::Categorical { ref choices } => {
                if choices.is_empty() {
                    Err(Error::EmptyChoices)
                } else {
                    Ok(())
                }
            }
        }
    }

    /// Snaps `value` into this domain: clamped to the bounds, quantized to
    /// the step grid, or replaced by the nearest choice.
    #[must_use]
    pub fn snap(&self, value: f64) -> f64 {
        match *self {
            Domain::Uniform { low, high } => value.clamp(low, high),
            Domain::QuantizedUniform { low, high, step } => {
                let snapped = low + ((value - low) / step).round() * step;
                snapped.clamp(low, high)
            }
            Domain::Categorical { ref choices } => choices
                .iter()
                .copied()
                .min_by(|a, b| {
                    (a - value)
                        .abs()
                        .partial_cmp(&(b - value).abs())
                        .unwrap_or(core::cmp::Ordering::Equal)
                })
                .unwrap_or(value),
        }
    }
}

/// An ordered collection of named hyperparameter domains.
///
/// # Examples
///
/// ```
/// use focalopt::space::{keys, SearchSpace};
///
/// let space = SearchSpace::new()
///     .uniform(keys::LEARNING_RATE, 0.05, 0.15)
///     .unwrap()
///     .categorical(keys::NUM_BOOST_ROUND, vec![50.0, 100.0])
///     .unwrap()
///     .uniform(keys::ALPHA, 0.2, 0.6)
///     .unwrap()
///     .quantized(keys::GAMMA, 1.0, 3.0, 0.5)
///     .unwrap();
/// assert_eq!(space.len(), 4);
/// ```
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchSpace {
    entries: Vec<(String, Domain)>,
}

impl SearchSpace {
    /// Creates an empty search space.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a uniform continuous parameter.
    ///
    /// # Errors
    ///
    /// Propagates [`Domain::validate`] failures.
    pub fn uniform(self, name: &str, low: f64, high: f64) -> Result<Self> {
        self.push(name, Domain::Uniform { low, high })
    }

    /// Adds a quantized continuous parameter with the given step.
    ///
    /// # Errors
    ///
    /// Propagates [`Domain::validate`] failures.
    pub fn quantized(self, name: &str, low: f64, high: f64, step: f64) -> Result<Self> {
        self.push(name, Domain::QuantizedUniform { low, high, step })
    }

    /// Adds a categorical parameter over explicit values.
    ///
    /// # Errors
    ///
    /// Propagates [`Domain::validate`] failures.
    pub fn categorical(self, name: &str, choices: Vec<f64>) -> Result<Self> {
        self.push(name, Domain::Categorical { choices })
    }

    fn push(mut self, name: &str, domain: Domain) -> Result<Self> {
        domain.validate()?;
        self.entries.push((name.to_owned(), domain));
        Ok(self)
    }

    /// Iterates `(name, domain)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Domain)> {
        self.entries.iter().map(|(n, d)| (n.as_str(), d))
    }

    /// Number of parameters in the space.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the space has no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One trial's hyperparameter assignment: parameter name → value.
///
/// Values are stored as `f64` exactly as the search space generated them.
/// Iteration order is the sorted key order (`BTreeMap`), which keeps
/// configuration formatting and serialization deterministic.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Configuration {
    values: BTreeMap<String, f64>,
}

impl Configuration {
    /// Creates an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `name` to `value`, replacing any previous assignment.
    pub fn set(&mut self, name: &str, value: f64) {
        self.values.insert(name.to_owned(), value);
    }

    /// Looks up a parameter value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Looks up a parameter the caller cannot proceed without.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingParameter`] when the key is absent.
    pub fn require(&self, name: &'static str) -> Result<f64> {
        self.get(name).ok_or(Error::MissingParameter(name))
    }

    /// Iterates `(name, value)` pairs in sorted key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(n, v)| (n.as_str(), *v))
    }

    /// Number of assigned parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no parameters are assigned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(String, f64)> for Configuration {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
