//! Shared test collaborators: a seeded synthetic dataset and boosting
//! engines implementing the [`BoostingEngine`] contract.
//!
//! `StumpEngine` is a miniature but real second-order booster (one-split
//! Newton stumps, stratified folds, early stopping on the cross-fold mean)
//! so end-to-end tests exercise genuine train/validate generalization.
//! The remaining engines are fixtures with scripted metric histories.

use focalopt::prelude::*;

/// Balanced two-class dataset: class 1 draws `x0` from (0.2, 1.0), class 0
/// from (-1.0, -0.2), `x1` is uniform noise. Every 20th label is flipped
/// so a perfect classifier cannot exist and early stopping has something
/// to do.
pub fn synthetic_dataset(n_rows: usize, seed: u64) -> Dataset {
    let mut rng = fastrand::Rng::with_seed(seed);
    let mut features = Vec::with_capacity(n_rows);
    let mut labels = Vec::with_capacity(n_rows);
    for i in 0..n_rows {
        let class = (i % 2) as f64;
        let x0 = if class == 1.0 {
            0.2 + 0.8 * rng.f64()
        } else {
            -1.0 + 0.8 * rng.f64()
        };
        let x1 = -1.0 + 2.0 * rng.f64();
        features.push(vec![x0, x1]);
        labels.push(if i % 20 == 19 { 1.0 - class } else { class });
    }
    Dataset::new(
        features,
        labels,
        vec!["x0".to_owned(), "x1".to_owned()],
        vec![],
    )
    .expect("synthetic dataset is well-formed")
}

/// The narrow search space used by the end-to-end scenario.
pub fn narrow_space() -> SearchSpace {
    SearchSpace::new()
        .uniform(keys::LEARNING_RATE, 0.05, 0.15)
        .unwrap()
        .categorical(keys::NUM_BOOST_ROUND, vec![50.0, 100.0])
        .unwrap()
        .uniform(keys::ALPHA, 0.2, 0.6)
        .unwrap()
        .uniform(keys::GAMMA, 1.0, 3.0)
        .unwrap()
}

/// F1 of the majority-class predictor (always positive) on balanced data.
pub fn majority_baseline_f1(labels: &[f64]) -> f64 {
    let positives = labels.iter().filter(|&&l| l == 1.0).count() as f64;
    let n = labels.len() as f64;
    // tp = positives, fp = n - positives, fn = 0.
    2.0 * positives / (2.0 * positives + (n - positives))
}

// ---------------------------------------------------------------------------
// StumpEngine: Newton decision stumps with stratified CV + early stopping
// ---------------------------------------------------------------------------

pub struct StumpEngine;

struct FoldState {
    train_rows: Vec<usize>,
    valid_rows: Vec<usize>,
    train_labels: Vec<f64>,
    valid_labels: Vec<f64>,
    train_scores: Vec<f64>,
    valid_scores: Vec<f64>,
    // Candidate split thresholds per feature, from train-set quantiles.
    thresholds: Vec<Vec<f64>>,
}

impl FoldState {
    fn new(dataset: &Dataset, valid_rows: Vec<usize>) -> Self {
        let in_valid: std::collections::HashSet<usize> = valid_rows.iter().copied().collect();
        let train_rows: Vec<usize> = (0..dataset.n_rows())
            .filter(|r| !in_valid.contains(r))
            .collect();
        let labels = dataset.labels();
        let train_labels: Vec<f64> = train_rows.iter().map(|&r| labels[r]).collect();
        let valid_labels: Vec<f64> = valid_rows.iter().map(|&r| labels[r]).collect();

        let thresholds = (0..dataset.n_columns())
            .map(|col| {
                let mut values: Vec<f64> = train_rows
                    .iter()
                    .map(|&r| dataset.features()[r][col])
                    .collect();
                values.sort_by(|a, b| a.partial_cmp(b).unwrap());
                (1..16)
                    .map(|q| values[q * (values.len() - 1) / 16])
                    .collect()
            })
            .collect();

        let n_train = train_rows.len();
        let n_valid = valid_rows.len();
        Self {
            train_rows,
            valid_rows,
            train_labels,
            valid_labels,
            train_scores: vec![0.0; n_train],
            valid_scores: vec![0.0; n_valid],
            thresholds,
        }
    }

    /// One boosting round: fit the best Newton stump on the training
    /// gradients and update both score vectors.
    fn boost_one_round(
        &mut self,
        dataset: &Dataset,
        params: &BoosterParams,
        objective: &dyn Objective,
    ) -> focalopt::Result<()> {
        let (grad, hess) = objective.gradient_hessian(&self.train_scores, &self.train_labels)?;
        // Floor the Hessian so Newton denominators stay positive even where
        // the focal curvature dips near zero.
        let hess: Vec<f64> = hess.into_iter().map(|h| h.max(1e-6)).collect();
        let lambda = params.lambda_l2 + 1e-6;
        let total_g: f64 = grad.iter().sum();
        let total_h: f64 = hess.iter().sum();
        let root_gain = total_g * total_g / (total_h + lambda);

        let mut best: Option<(usize, f64, f64, f64, f64)> = None; // col, thr, gain, w_left, w_right
        for (col, cuts) in self.thresholds.iter().enumerate() {
            for &thr in cuts {
                let mut g_left = 0.0;
                let mut h_left = 0.0;
                let mut n_left = 0usize;
                for (i, &row) in self.train_rows.iter().enumerate() {
                    if dataset.features()[row][col] <= thr {
                        g_left += grad[i];
                        h_left += hess[i];
                        n_left += 1;
                    }
                }
                let n_right = self.train_rows.len() - n_left;
                if n_left < params.min_data_in_leaf || n_right < params.min_data_in_leaf {
                    continue;
                }
                let g_right = total_g - g_left;
                let h_right = total_h - h_left;
                let gain = g_left * g_left / (h_left + lambda)
                    + g_right * g_right / (h_right + lambda)
                    - root_gain;
                if best.is_none() || gain > best.unwrap().2 {
                    let w_left = -g_left / (h_left + lambda);
                    let w_right = -g_right / (h_right + lambda);
                    best = Some((col, thr, gain, w_left, w_right));
                }
            }
        }

        match best {
            Some((col, thr, _, w_left, w_right)) => {
                for (i, &row) in self.train_rows.iter().enumerate() {
                    let w = if dataset.features()[row][col] <= thr {
                        w_left
                    } else {
                        w_right
                    };
                    self.train_scores[i] += params.learning_rate * w;
                }
                for (i, &row) in self.valid_rows.iter().enumerate() {
                    let w = if dataset.features()[row][col] <= thr {
                        w_left
                    } else {
                        w_right
                    };
                    self.valid_scores[i] += params.learning_rate * w;
                }
            }
            None => {
                // No admissible split: single-leaf Newton update.
                let w = -total_g / (total_h + lambda);
                for s in &mut self.train_scores {
                    *s += params.learning_rate * w;
                }
                for s in &mut self.valid_scores {
                    *s += params.learning_rate * w;
                }
            }
        }
        Ok(())
    }
}

/// Splits row indices into `k` folds, preserving class proportions when
/// `stratified` is set. Deterministic for a fixed seed.
fn make_folds(labels: &[f64], k: usize, stratified: bool, seed: u64) -> Vec<Vec<usize>> {
    let mut rng = fastrand::Rng::with_seed(seed);
    let mut folds = vec![Vec::new(); k];
    if stratified {
        for class in [0.0, 1.0] {
            let mut rows: Vec<usize> = (0..labels.len()).filter(|&r| labels[r] == class).collect();
            rng.shuffle(&mut rows);
            for (i, row) in rows.into_iter().enumerate() {
                folds[i % k].push(row);
            }
        }
    } else {
        let mut rows: Vec<usize> = (0..labels.len()).collect();
        rng.shuffle(&mut rows);
        for (i, row) in rows.into_iter().enumerate() {
            folds[i % k].push(row);
        }
    }
    folds
}

impl BoostingEngine for StumpEngine {
    fn cross_validate(
        &self,
        dataset: &Dataset,
        params: &BoosterParams,
        objective: &dyn Objective,
        metric: &dyn EvalMetric,
        options: &CvOptions,
    ) -> focalopt::Result<CvReport> {
        let folds = make_folds(
            dataset.labels(),
            options.folds,
            options.stratified,
            options.seed,
        );
        let mut states: Vec<FoldState> = folds
            .into_iter()
            .map(|valid| FoldState::new(dataset, valid))
            .collect();
        let n_folds = states.len() as f64;

        let mut fold_history = vec![Vec::new(); states.len()];
        let mut best_mean = f64::NEG_INFINITY;
        let mut best_round = 0usize;
        let mut higher_is_better = true;

        for round in 0..params.num_boost_round {
            for (f, state) in states.iter_mut().enumerate() {
                state.boost_one_round(dataset, params, objective)?;
                let m = metric.evaluate(&state.valid_scores, &state.valid_labels)?;
                higher_is_better = m.higher_is_better;
                fold_history[f].push(m.value);
            }
            let mut mean = fold_history.iter().map(|h| h[round]).sum::<f64>() / n_folds;
            if !higher_is_better {
                mean = -mean;
            }
            if mean > best_mean {
                best_mean = mean;
                best_round = round;
            } else if round - best_round >= options.early_stopping_rounds {
                break;
            }
        }

        Ok(CvReport { fold_history })
    }
}

// ---------------------------------------------------------------------------
// Scripted fixture engines
// ---------------------------------------------------------------------------

/// Metric strictly improves every round, so early stopping never fires and
/// the realized round count equals the requested budget.
pub struct MonotonicEngine;

impl BoostingEngine for MonotonicEngine {
    fn cross_validate(
        &self,
        _dataset: &Dataset,
        params: &BoosterParams,
        _objective: &dyn Objective,
        _metric: &dyn EvalMetric,
        options: &CvOptions,
    ) -> focalopt::Result<CvReport> {
        let history: Vec<f64> = (0..params.num_boost_round)
            .map(|r| r as f64 / (params.num_boost_round as f64 + 1.0))
            .collect();
        Ok(CvReport {
            fold_history: vec![history; options.folds],
        })
    }
}

/// Metric improves for `improving_rounds` rounds then plateaus, so early
/// stopping fires `patience` rounds after the last improvement.
pub struct PlateauEngine {
    pub improving_rounds: usize,
}

impl BoostingEngine for PlateauEngine {
    fn cross_validate(
        &self,
        _dataset: &Dataset,
        params: &BoosterParams,
        _objective: &dyn Objective,
        _metric: &dyn EvalMetric,
        options: &CvOptions,
    ) -> focalopt::Result<CvReport> {
        let plateau = (self.improving_rounds - 1) as f64;
        let mut history = Vec::new();
        for round in 0..params.num_boost_round {
            let value = (round as f64).min(plateau);
            history.push(value);
            let best_round = round.min(self.improving_rounds - 1);
            if round - best_round >= options.early_stopping_rounds {
                break;
            }
        }
        Ok(CvReport {
            fold_history: vec![history; options.folds],
        })
    }
}

/// A pathological configuration: training never completes a round.
pub struct ZeroRoundEngine;

impl BoostingEngine for ZeroRoundEngine {
    fn cross_validate(
        &self,
        _dataset: &Dataset,
        _params: &BoosterParams,
        _objective: &dyn Objective,
        _metric: &dyn EvalMetric,
        _options: &CvOptions,
    ) -> focalopt::Result<CvReport> {
        Ok(CvReport::default())
    }
}

/// Every training run fails.
pub struct FailingEngine;

impl BoostingEngine for FailingEngine {
    fn cross_validate(
        &self,
        _dataset: &Dataset,
        _params: &BoosterParams,
        _objective: &dyn Objective,
        _metric: &dyn EvalMetric,
        _options: &CvOptions,
    ) -> focalopt::Result<CvReport> {
        Err(focalopt::Error::Engine("simulated engine failure".into()))
    }
}
