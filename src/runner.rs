//! Cross-validated trial runner.
//!
//! Turns one hyperparameter configuration into a comparable scalar score:
//! coerce the configuration, train k-fold cross-validated boosting with the
//! Focal Loss objective and monitored F1, and negate the best cross-fold
//! mean (the search loop minimizes). The realized boosting-round count is
//! recorded against the trial identity — the final retraining step needs
//! the true count, not the requested upper bound.

use crate::booster::{BoosterParams, BoostingEngine, CvOptions, Dataset};
use crate::error::{Error, Result};
use crate::focal::FocalLoss;
use crate::metric::F1Metric;
use crate::space::Configuration;
use crate::trial::{SearchContext, TrialId};

/// Digits kept when rounding trial scores.
///
/// Rounding before comparison is a deliberate tie-breaking granularity:
/// trials whose cross-validated F1 differs below 1e-4 compare equal, and
/// the context's earliest-wins rule settles the tie deterministically.
const SCORE_DIGITS: i32 = 4;

/// Rounds `value` to `digits` decimal digits.
fn round_to(value: f64, digits: i32) -> f64 {
    let factor = 10f64.powi(digits);
    (value * factor).round() / factor
}

/// What one trial reports back to the search loop.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrialOutcome {
    /// Negated mean best-fold F1, rounded to 4 digits. Lower is better.
    pub score: f64,
    /// Boosting rounds actually completed; at most the requested budget.
    pub realized_rounds: usize,
}

/// Scores configurations through cross-validated boosting runs.
///
/// Holds the external collaborators for the lifetime of a search: the
/// boosting engine, the dataset (consumed once, up front), and the fixed
/// operational [`CvOptions`] injected independently of the search space.
pub struct TrialRunner<'a> {
    engine: &'a dyn BoostingEngine,
    dataset: &'a Dataset,
    options: CvOptions,
}

impl<'a> TrialRunner<'a> {
    /// Creates a runner over the given collaborators.
    pub fn new(engine: &'a dyn BoostingEngine, dataset: &'a Dataset, options: CvOptions) -> Self {
        Self {
            engine,
            dataset,
            options,
        }
    }

    /// The operational parameters every trial runs under.
    #[must_use]
    pub fn options(&self) -> &CvOptions {
        &self.options
    }

    /// Runs one cross-validated trial.
    ///
    /// Integer coercion happens here, before the engine sees the
    /// parameters. A pathological configuration that early-stops at zero
    /// completed rounds still yields a well-formed (worst-possible) score
    /// of `0.0` so the search can continue.
    ///
    /// As a side effect the realized round count is recorded against `id`
    /// in `ctx`, for retrieval after the search completes.
    ///
    /// # Errors
    ///
    /// Configuration-contract violations
    /// ([`Error::MissingParameter`], [`Error::InvalidParameter`],
    /// [`Error::InvalidAlpha`], [`Error::InvalidGamma`]) and engine
    /// failures ([`Error::Engine`]).
    pub fn run_trial(
        &self,
        ctx: &SearchContext,
        id: TrialId,
        config: &Configuration,
    ) -> Result<TrialOutcome> {
        let params = BoosterParams::from_config(config)?;
        let focal = FocalLoss::from_config(config)?;

        trace_debug!(
            trial = id.0,
            rounds_requested = params.num_boost_round,
            alpha = focal.alpha(),
            gamma = focal.gamma(),
            "starting cross-validated trial"
        );

        let report =
            self.engine
                .cross_validate(self.dataset, &params, &focal, &F1Metric, &self.options)?;

        let realized_rounds = report.rounds_completed();
        if realized_rounds > params.num_boost_round {
            return Err(Error::Engine(format!(
                "engine reported {realized_rounds} rounds for a budget of {}",
                params.num_boost_round
            )));
        }

        let best_f1 = report
            .best_mean_round(true)
            .map_or(0.0, |(value, _)| value);
        let score = round_to(-best_f1, SCORE_DIGITS);

        ctx.record_rounds(id, realized_rounds);

        trace_info!(
            trial = id.0,
            score,
            realized_rounds,
            "trial complete"
        );

        Ok(TrialOutcome {
            score,
            realized_rounds,
        })
    }
}
