//! The sequential search loop.
//!
//! [`Tuner`] drives trials: a pluggable [`Strategy`] proposes
//! configurations, the [`TrialRunner`](crate::runner::TrialRunner) scores
//! them, and the [`SearchContext`] accumulates the append-only history.
//! After the budget is exhausted, the best trial's realized round count is
//! substituted for the proposed round budget in the returned configuration
//! — retraining with the originally requested budget, pre-early-stopping,
//! would overfit relative to what cross-validation actually selected.

use std::sync::Arc;

use crate::booster::{BoostingEngine, CvOptions, Dataset};
use crate::error::{Error, Result};
use crate::runner::TrialRunner;
use crate::space::{keys, Configuration, SearchSpace};
use crate::strategy::{RandomStrategy, Strategy};
use crate::trial::{SearchContext, TrialRecord};

/// Drives one hyperparameter search over a boosting engine and dataset.
///
/// Trials execute sequentially; the context's locking keeps its invariants
/// intact should a rework ever parallelize them.
pub struct Tuner<'a> {
    engine: &'a dyn BoostingEngine,
    dataset: &'a Dataset,
    options: CvOptions,
    strategy: Arc<dyn Strategy>,
    context: SearchContext,
}

impl<'a> Tuner<'a> {
    /// Creates a tuner with the default [`RandomStrategy`] and
    /// [`CvOptions`].
    #[must_use]
    pub fn new(engine: &'a dyn BoostingEngine, dataset: &'a Dataset) -> Self {
        Self {
            engine,
            dataset,
            options: CvOptions::default(),
            strategy: Arc::new(RandomStrategy::new()),
            context: SearchContext::new(),
        }
    }

    /// Replaces the search strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: impl Strategy + 'static) -> Self {
        self.strategy = Arc::new(strategy);
        self
    }

    /// Replaces the fixed cross-validation options.
    #[must_use]
    pub fn with_options(mut self, options: CvOptions) -> Self {
        self.options = options;
        self
    }

    /// The search run's state: trial counter, history, and realized-round
    /// bookkeeping. Read it after [`search`](Tuner::search) completes to
    /// inspect the full trial history.
    #[must_use]
    pub fn context(&self) -> &SearchContext {
        &self.context
    }

    /// Runs `trial_budget` trials and returns the best configuration with
    /// its `num_boost_round` replaced by the realized round count of the
    /// winning trial.
    ///
    /// Failed trials are logged and skipped; they consume budget but never
    /// enter the history. The best trial is the minimum score at the
    /// runner's four-digit granularity, ties broken by earliest completion.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoViableTrial`] when every trial in the budget
    /// failed.
    pub fn search(&self, space: &SearchSpace, trial_budget: usize) -> Result<Configuration> {
        let runner = TrialRunner::new(self.engine, self.dataset, self.options);

        for _ in 0..trial_budget {
            let id = self.context.next_trial_id();
            let history = self.context.records();
            let config = self.strategy.suggest(space, id.0, &history);
            match runner.run_trial(&self.context, id, &config) {
                Ok(outcome) => {
                    self.context.push_record(TrialRecord {
                        id,
                        config,
                        score: outcome.score,
                        realized_rounds: outcome.realized_rounds,
                    });
                }
                Err(_err) => {
                    trace_info!(trial = id.0, error = %_err, "trial failed; skipping");
                }
            }
        }

        let best = self.context.best_record().ok_or(Error::NoViableTrial)?;
        let realized = self
            .context
            .realized_rounds(best.id)
            .unwrap_or(best.realized_rounds);

        trace_info!(
            trial = best.id.0,
            score = best.score,
            realized_rounds = realized,
            "search complete"
        );

        let mut config = best.config;
        config.set(keys::NUM_BOOST_ROUND, realized as f64);
        Ok(config)
    }
}
