#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![deny(unreachable_pub)]
#![deny(clippy::correctness)]
#![deny(clippy::suspicious)]
#![deny(clippy::style)]
#![deny(clippy::complexity)]
#![deny(clippy::perf)]

//! Focal Loss custom objective and F1-driven hyperparameter search glue
//! for gradient-boosted binary classifiers on imbalanced data.
//!
//! The crate owns exactly two hard pieces and the plumbing between them:
//!
//! 1. Numerically stable per-sample gradients and Hessians of the Focal
//!    Loss with respect to raw (pre-sigmoid) scores, produced through a
//!    central finite-difference engine and fed to a boosting engine's
//!    custom-objective hook every iteration.
//! 2. A search loop coupling a pluggable black-box
//!    [`Strategy`](strategy::Strategy) to cross-validated training with
//!    early stopping, with per-trial bookkeeping of realized boosting
//!    rounds — early stopping makes the round count a trial-dependent
//!    outcome, not a fixed hyperparameter, so the winning configuration is
//!    returned with its *realized* round count substituted in.
//!
//! The boosting engine itself, the strategy's internal search algorithm,
//! and dataset loading are external collaborators behind the traits in
//! [`booster`] and [`strategy`].
//!
//! # Getting started
//!
//! ```
//! use focalopt::prelude::*;
//!
//! // The training signal: stable Focal Loss derivatives for the engine.
//! let focal = FocalLoss::new(0.25, 2.0)?;
//! let (grad, hess) = focal.gradient_hessian(&[0.4, -1.2], &[1.0, 0.0])?;
//! assert_eq!((grad.len(), hess.len()), (2, 2));
//!
//! // The search space a strategy proposes from.
//! let space = SearchSpace::new()
//!     .uniform(keys::LEARNING_RATE, 0.05, 0.15)?
//!     .categorical(keys::NUM_BOOST_ROUND, vec![50.0, 100.0])?
//!     .uniform(keys::ALPHA, 0.2, 0.6)?
//!     .uniform(keys::GAMMA, 1.0, 3.0)?;
//! let proposal = RandomStrategy::with_seed(42).suggest(&space, 0, &[]);
//! assert_eq!(proposal.len(), 4);
//! # Ok::<(), focalopt::Error>(())
//! ```
//!
//! Plug a [`BoostingEngine`](booster::BoostingEngine) and a
//! [`Dataset`](booster::Dataset) into a [`Tuner`](search::Tuner) to run the
//! full loop; see `Tuner::search`.
//!
//! # Feature flags
//!
//! | Flag | What it enables | Default |
//! |------|----------------|---------|
//! | `serde` | `Serialize`/`Deserialize` on public value types | off |
//! | `tracing` | Structured log events at trial boundaries | off |

/// Emit a `tracing::info!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_info {
    ($($arg:tt)*) => { tracing::info!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_info {
    ($($arg:tt)*) => {};
}

/// Emit a `tracing::debug!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_debug {
    ($($arg:tt)*) => { tracing::debug!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_debug {
    ($($arg:tt)*) => {};
}

pub mod booster;
mod error;
pub mod focal;
pub mod metric;
pub mod numdiff;
mod rng_util;
mod runner;
mod search;
pub mod space;
pub mod strategy;
pub mod trial;

pub use booster::{BoosterParams, BoostingEngine, CvOptions, CvReport, Dataset, Objective};
pub use error::{Error, Result};
pub use focal::FocalLoss;
pub use metric::{EvalMetric, F1Metric, MetricValue};
pub use numdiff::{central_difference, central_difference_batch, DerivativeOrder, DEFAULT_STEP};
pub use runner::{TrialOutcome, TrialRunner};
pub use search::Tuner;
pub use space::{Configuration, Domain, SearchSpace};
pub use strategy::{RandomStrategy, Strategy};
pub use trial::{SearchContext, TrialId, TrialRecord};

/// Convenient wildcard import for the most common types.
///
/// ```
/// use focalopt::prelude::*;
/// ```
pub mod prelude {
    pub use crate::booster::{
        BoosterParams, BoostingEngine, CvOptions, CvReport, Dataset, Objective,
    };
    pub use crate::error::{Error, Result};
    pub use crate::focal::FocalLoss;
    pub use crate::metric::{EvalMetric, F1Metric, MetricValue};
    pub use crate::numdiff::{central_difference, DerivativeOrder, DEFAULT_STEP};
    pub use crate::runner::{TrialOutcome, TrialRunner};
    pub use crate::search::Tuner;
    pub use crate::space::{keys, Configuration, Domain, SearchSpace};
    pub use crate::strategy::{RandomStrategy, Strategy};
    pub use crate::trial::{SearchContext, TrialId, TrialRecord};
}
