//! Pluggable search strategies.
//!
//! A strategy proposes the next [`Configuration`] to evaluate. It receives
//! the declarative [`SearchSpace`], a monotonically increasing `trial_id`,
//! and the slice of all completed [`TrialRecord`]s so far; model-based
//! strategies read the history to trade exploration against exploitation —
//! that trade-off is entirely the strategy's responsibility, not the search
//! loop's.
//!
//! # Implementing a custom strategy
//!
//! ```rust
//! use focalopt::space::{Configuration, Domain, SearchSpace};
//! use focalopt::strategy::Strategy;
//! use focalopt::trial::TrialRecord;
//!
//! /// A strategy that always proposes the midpoint of each domain.
//! struct MidpointStrategy;
//!
//! impl Strategy for MidpointStrategy {
//!     fn suggest(
//!         &self,
//!         space: &SearchSpace,
//!         _trial_id: u64,
//!         _history: &[TrialRecord],
//!     ) -> Configuration {
//!         let mut config = Configuration::new();
//!         for (name, domain) in space.iter() {
//!             let value = match domain {
//!                 Domain::Uniform { low, high }
//!                 | Domain::QuantizedUniform { low, high, .. } => {
//!                     domain.snap((low + high) / 2.0)
//!                 }
//!                 Domain::Categorical { choices } => choices[choices.len() / 2],
//!             };
//!             config.set(name, value);
//!         }
//!         config
//!     }
//! }
//! ```
//!
//! # Stateless vs stateful strategies
//!
//! Stateless strategies derive all randomness from a deterministic function
//! of `seed + trial_id + domain` and need no interior mutability — see
//! [`RandomStrategy`] for the pattern. Stateful strategies (populations,
//! surrogate models) should wrap their state in `parking_lot::Mutex` and
//! lock for the duration of [`Strategy::suggest`].
//!
//! The trait requires `Send + Sync`: the search loop stores strategies as
//! `Arc<dyn Strategy>`, and a parallel rework may call `suggest`
//! concurrently.

pub mod random;

pub use random::RandomStrategy;

use crate::space::{Configuration, SearchSpace};
use crate::trial::TrialRecord;

/// Trait for pluggable configuration-proposal strategies.
pub trait Strategy: Send + Sync {
    /// Proposes a configuration covering every parameter of `space`.
    ///
    /// # Arguments
    ///
    /// * `space` - The declarative search space to draw from.
    /// * `trial_id` - The identity of the trial being proposed for; useful
    ///   for deterministic RNG seeding.
    /// * `history` - All completed trials so far, in completion order. May
    ///   be empty on the first trial. Scores are negated F1 — lower is
    ///   better.
    fn suggest(
        &self,
        space: &SearchSpace,
        trial_id: u64,
        history: &[TrialRecord],
    ) -> Configuration;
}
