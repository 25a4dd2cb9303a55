//! Interfaces to the external boosting-engine collaborator.
//!
//! The tree-growing algorithm itself is out of scope; this module pins down
//! the contracts the rest of the crate relies on:
//!
//! - [`Objective`] — the engine's objective_fn shape: per-sample gradient
//!   and Hessian arrays for each boosting iteration.
//! - [`BoostingEngine`] — stratified k-fold cross-validated training with a
//!   custom objective, a monitored [`EvalMetric`](crate::metric::EvalMetric),
//!   and early stopping, returning the per-fold metric history.
//! - [`BoosterParams`] — the typed engine parameters, including the
//!   mandatory float→integer coercion for leaf count and round budget.
//! - [`Dataset`] — what the dataset provider supplies once, up front.

use crate::error::{Error, Result};
use crate::metric::EvalMetric;
use crate::space::{keys, Configuration};

/// A training signal for second-order (Newton-style) boosting.
///
/// Conforms to the engine contract
/// `(predictions, dataset_handle) -> (gradient_array, hessian_array)`.
pub trait Objective: Send + Sync {
    /// Per-sample first and second derivatives of the loss with respect to
    /// the raw scores.
    ///
    /// # Errors
    ///
    /// Implementations fail fast on batch data-contract violations.
    fn gradient_hessian(&self, scores: &[f64], labels: &[f64]) -> Result<(Vec<f64>, Vec<f64>)>;

    /// Objective name, used in engine logging.
    fn name(&self) -> &'static str;
}

/// The feature matrix, labels, and column metadata supplied by the dataset
/// provider before any trial runs.
///
/// Features are row-major: `features[row][column]`.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dataset {
    features: Vec<Vec<f64>>,
    labels: Vec<f64>,
    feature_names: Vec<String>,
    categorical_columns: Vec<usize>,
}

impl Dataset {
    /// Builds a dataset, validating shape consistency.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDataset`] when row lengths are ragged, when
    /// the label count differs from the row count, when `feature_names`
    /// does not cover every column, or when a categorical index is out of
    /// range.
    pub fn new(
        features: Vec<Vec<f64>>,
        labels: Vec<f64>,
        feature_names: Vec<String>,
        categorical_columns: Vec<usize>,
    ) -> Result<Self> {
        if features.len() != labels.len() {
            return Err(Error::InvalidDataset(format!(
                "{} feature rows but {} labels",
                features.len(),
                labels.len()
            )));
        }
        let n_columns = feature_names.len();
        if let Some((row, _)) = features
            .iter()
            .enumerate()
            .find(|(_, r)| r.len() != n_columns)
        {
            return Err(Error::InvalidDataset(format!(
                "row {row} has {} columns, expected {n_columns}",
                features[row].len()
            )));
        }
        if let Some(&column) = categorical_columns.iter().find(|&&c| c >= n_columns) {
            return Err(Error::InvalidDataset(format!(
                "categorical column index {column} out of range (dataset has {n_columns} columns)"
            )));
        }
        Ok(Self {
            features,
            labels,
            feature_names,
            categorical_columns,
        })
    }

    /// Number of samples.
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.features.len()
    }

    /// Number of feature columns.
    #[must_use]
    pub fn n_columns(&self) -> usize {
        self.feature_names.len()
    }

    /// The row-major feature matrix.
    #[must_use]
    pub fn features(&self) -> &[Vec<f64>] {
        &self.features
    }

    /// Ground-truth labels, one per row.
    #[must_use]
    pub fn labels(&self) -> &[f64] {
        &self.labels
    }

    /// Column names, one per feature.
    #[must_use]
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Indices of categorical columns.
    #[must_use]
    pub fn categorical_columns(&self) -> &[usize] {
        &self.categorical_columns
    }
}

/// Typed boosting-engine parameters for one trial.
///
/// The search space yields every field as a float; `num_leaves`,
/// `min_data_in_leaf`, and `num_boost_round` are materialized as integers
/// here, before the engine is invoked — never left for the engine to
/// reject.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoosterParams {
    /// Shrinkage applied to each round's leaf values.
    pub learning_rate: f64,
    /// Maximum leaves per tree.
    pub num_leaves: usize,
    /// Minimum samples per leaf.
    pub min_data_in_leaf: usize,
    /// Per-tree feature sampling rate in (0, 1].
    pub feature_fraction: f64,
    /// Per-tree row sampling rate in (0, 1].
    pub bagging_fraction: f64,
    /// L2 leaf regularization.
    pub lambda_l2: f64,
    /// Requested boosting-round budget.
    pub num_boost_round: usize,
}

impl BoosterParams {
    /// Extracts and coerces engine parameters from a trial configuration.
    ///
    /// `learning_rate` and `num_boost_round` are mandatory; the remaining
    /// fields fall back to conventional engine defaults. Integer fields are
    /// rounded to the nearest whole number.
    ///
    /// The Focal Loss keys (`alpha`, `gamma`) are deliberately not read
    /// here; custom-objective parameters never travel inside the engine
    /// parameter set.
    ///
    /// # Errors
    ///
    /// [`Error::MissingParameter`] for absent mandatory fields and
    /// [`Error::InvalidParameter`] when a value cannot satisfy the engine
    /// contract (non-finite, or a non-positive integer field).
    pub fn from_config(config: &Configuration) -> Result<Self> {
        let learning_rate = config.require(keys::LEARNING_RATE)?;
        if !(learning_rate > 0.0 && learning_rate.is_finite()) {
            return Err(Error::InvalidParameter {
                name: keys::LEARNING_RATE,
                value: learning_rate,
                reason: "must be positive and finite",
            });
        }
        Ok(Self {
            learning_rate,
            num_leaves: coerce_positive_int(keys::NUM_LEAVES, config.get(keys::NUM_LEAVES), 31)?,
            min_data_in_leaf: coerce_positive_int(
                keys::MIN_DATA_IN_LEAF,
                config.get(keys::MIN_DATA_IN_LEAF),
                20,
            )?,
            feature_fraction: coerce_fraction(
                keys::FEATURE_FRACTION,
                config.get(keys::FEATURE_FRACTION),
            )?,
            bagging_fraction: coerce_fraction(
                keys::BAGGING_FRACTION,
                config.get(keys::BAGGING_FRACTION),
            )?,
            lambda_l2: config.get(keys::LAMBDA_L2).unwrap_or(0.0),
            num_boost_round: coerce_positive_int(
                keys::NUM_BOOST_ROUND,
                Some(config.require(keys::NUM_BOOST_ROUND)?),
                0,
            )?,
        })
    }
}

/// Rounds a float configuration value to a positive integer.
fn coerce_positive_int(name: &'static str, value: Option<f64>, default: usize) -> Result<usize> {
    let Some(value) = value else {
        return Ok(default);
    };
    if !value.is_finite() || value.round() < 1.0 {
        return Err(Error::InvalidParameter {
            name,
            value,
            reason: "must round to a positive integer",
        });
    }
    Ok(value.round() as usize)
}

/// Validates an optional sampling-rate value in (0, 1].
fn coerce_fraction(name: &'static str, value: Option<f64>) -> Result<f64> {
    let Some(value) = value else {
        return Ok(1.0);
    };
    if !(value > 0.0 && value <= 1.0) {
        return Err(Error::InvalidParameter {
            name,
            value,
            reason: "must be in (0.0, 1.0]",
        });
    }
    Ok(value)
}

/// Fixed operational parameters for cross-validated training.
///
/// These are injected by the trial runner independent of the search space:
/// the seed keeps trials reproducible and fold assignment identical across
/// trials, and engine logging stays suppressed unless `verbose` is set.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CvOptions {
    /// Number of stratified folds.
    pub folds: usize,
    /// Whether folds preserve class proportions.
    pub stratified: bool,
    /// Rounds without metric improvement (on the cross-fold mean) before
    /// training stops.
    pub early_stopping_rounds: usize,
    /// Seed for fold assignment and any engine-internal sampling.
    pub seed: u64,
    /// Enables engine progress logging.
    pub verbose: bool,
}

impl Default for CvOptions {
    fn default() -> Self {
        Self {
            folds: 3,
            stratified: true,
            early_stopping_rounds: 20,
            seed: 0,
            verbose: false,
        }
    }
}

/// Per-fold metric history from one cross-validated training run.
///
/// `fold_history[fold][round]` is the monitored metric on the held-out
/// fold after each completed boosting round. All folds share the same
/// round count: the number of rounds actually completed, which early
/// stopping may leave short of the requested budget.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CvReport {
    /// Held-out metric values, fold-major.
    pub fold_history: Vec<Vec<f64>>,
}

impl CvReport {
    /// Rounds actually completed (0 when training never got off the
    /// ground).
    #[must_use]
    pub fn rounds_completed(&self) -> usize {
        self.fold_history.first().map_or(0, Vec::len)
    }

    /// Cross-fold mean of the metric per round.
    #[must_use]
    pub fn mean_history(&self) -> Vec<f64> {
        let rounds = self.rounds_completed();
        if rounds == 0 || self.fold_history.is_empty() {
            return Vec::new();
        }
        let n_folds = self.fold_history.len() as f64;
        (0..rounds)
            .map(|r| self.fold_history.iter().map(|f| f[r]).sum::<f64>() / n_folds)
            .collect()
    }

    /// The best cross-fold mean and the round achieving it, when any round
    /// completed. `higher_is_better` selects the comparison direction.
    #[must_use]
    pub fn best_mean_round(&self, higher_is_better: bool) -> Option<(f64, usize)> {
        let means = self.mean_history();
        let mut best: Option<(f64, usize)> = None;
        for (round, &value) in means.iter().enumerate() {
            let improved = match best {
                None => true,
                Some((b, _)) => {
                    if higher_is_better {
                        value > b
                    } else {
                        value < b
                    }
                }
            };
            if improved {
                best = Some((value, round));
            }
        }
        best
    }
}

/// The external boosting engine, seen through its cross-validation surface.
///
/// The engine trains `options.folds` models with the supplied objective,
/// evaluates the monitored metric on each held-out fold after every round,
/// applies early stopping on the cross-fold mean with
/// `options.early_stopping_rounds` patience, and reports the per-fold
/// history.
pub trait BoostingEngine {
    /// Runs one cross-validated training with a custom objective and
    /// monitored metric.
    ///
    /// # Errors
    ///
    /// Engine failures surface as [`Error::Engine`]; objective and metric
    /// data-contract errors propagate unchanged.
    fn cross_validate(
        &self,
        dataset: &Dataset,
        params: &BoosterParams,
        objective: &dyn Objective,
        metric: &dyn EvalMetric,
        options: &CvOptions,
    ) -> Result<CvReport>;
}
