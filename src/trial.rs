//! Trial records and per-run search state.
//!
//! [`SearchContext`] replaces the classic "process-wide trial counter plus
//! side mapping" pattern with an explicit context object owned by one
//! search run: a monotonically increasing id counter, the append-only trial
//! history, and the trial-id → realized-round-count bookkeeping that the
//! final best-configuration substitution depends on.
//!
//! The locking discipline (atomic counter, `parking_lot` locks around the
//! two collections) keeps the no-lost-update invariant should trials ever
//! run in parallel; the core itself executes trials sequentially.

use core::sync::atomic::{AtomicU64, Ordering};
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::space::Configuration;

/// Identity of one trial within a search run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrialId(pub u64);

impl core::fmt::Display for TrialId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "trial#{}", self.0)
    }
}

/// One completed trial: the configuration evaluated, the score achieved,
/// and the boosting rounds actually realized.
///
/// `score` is the negated cross-validated F1, rounded to four decimal
/// digits — lower is better. `realized_rounds` never exceeds the requested
/// `num_boost_round`; equality holds only when early stopping never fired.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrialRecord {
    /// The trial's identity.
    pub id: TrialId,
    /// The configuration the strategy proposed.
    pub config: Configuration,
    /// Negated mean best-fold F1, rounded to 4 digits.
    pub score: f64,
    /// Boosting rounds actually completed under early stopping.
    pub realized_rounds: usize,
}

/// Mutable state of exactly one search run.
///
/// Initialized once before the run, read after completion to reconstruct
/// the best configuration's true round budget, then discarded.
#[derive(Debug, Default)]
pub struct SearchContext {
    next_trial_id: AtomicU64,
    records: Arc<RwLock<Vec<TrialRecord>>>,
    realized_rounds: Arc<RwLock<HashMap<TrialId, usize>>>,
}

impl SearchContext {
    /// Creates a fresh context with the trial counter at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues the next trial identity. Increments exactly once per call.
    pub fn next_trial_id(&self) -> TrialId {
        TrialId(self.next_trial_id.fetch_add(1, Ordering::SeqCst))
    }

    /// Number of identities issued so far.
    #[must_use]
    pub fn trials_started(&self) -> u64 {
        self.next_trial_id.load(Ordering::SeqCst)
    }

    /// Records the realized round count for `id`.
    ///
    /// Each trial writes only its own entry, so the map sees no lost
    /// updates even under parallel trial execution.
    pub fn record_rounds(&self, id: TrialId, rounds: usize) {
        self.realized_rounds.write().insert(id, rounds);
    }

    /// Looks up the realized round count recorded for `id`.
    #[must_use]
    pub fn realized_rounds(&self, id: TrialId) -> Option<usize> {
        self.realized_rounds.read().get(&id).copied()
    }

    /// Appends a completed trial to the history. The history is
    /// append-only and is the sole source of truth for best-trial
    /// selection.
    pub fn push_record(&self, record: TrialRecord) {
        self.records.write().push(record);
    }

    /// Snapshot of the completed-trial history, in completion order.
    #[must_use]
    pub fn records(&self) -> Vec<TrialRecord> {
        self.records.read().clone()
    }

    /// Number of completed trials.
    #[must_use]
    pub fn n_completed(&self) -> usize {
        self.records.read().len()
    }

    /// The best completed trial: minimum score, ties broken by earliest
    /// completion.
    ///
    /// Scores are compared at the runner's four-digit rounding granularity,
    /// so earliest-wins is an explicit tie-breaking rule rather than
    /// floating-point happenstance.
    #[must_use]
    pub fn best_record(&self) -> Option<TrialRecord> {
        let records = self.records.read();
        let mut best: Option<&TrialRecord> = None;
        for record in records.iter() {
            let better = match best {
                None => true,
                Some(b) => record.score < b.score,
            };
            if better {
                best = Some(record);
            }
        }
        best.cloned()
    }
}
