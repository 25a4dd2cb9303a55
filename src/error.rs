//! Error types for the crate.
//!
//! All fallible operations return [`Result<T>`], an alias for
//! `core::result::Result<T, Error>`. The [`Error`] enum covers batch
//! data-contract violations, Focal Loss parameter validation, search-space
//! validation, configuration-contract violations, and search-level failures.

/// Errors returned by objective, runner, and search operations.
///
/// Data-contract variants ([`LengthMismatch`](Error::LengthMismatch),
/// [`InvalidLabel`](Error::InvalidLabel)) are raised before any derivative
/// computation. Configuration-contract variants are raised before the
/// boosting engine is invoked, never left for the engine to reject.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The score and label batches have different lengths.
    #[error("batch length mismatch: {scores} scores but {labels} labels")]
    LengthMismatch {
        /// Number of raw scores in the batch.
        scores: usize,
        /// Number of labels in the batch.
        labels: usize,
    },

    /// A ground-truth label is outside the {0, 1} domain.
    #[error("invalid label at index {index}: {value} (labels must be exactly 0 or 1)")]
    InvalidLabel {
        /// Index of the offending sample.
        index: usize,
        /// The label value found.
        value: f64,
    },

    /// The Focal Loss class-balance weight is outside the open interval (0, 1).
    #[error("invalid alpha: {0} must be in (0.0, 1.0)")]
    InvalidAlpha(f64),

    /// The Focal Loss focusing exponent is negative or non-finite.
    #[error("invalid gamma: {0} must be non-negative")]
    InvalidGamma(f64),

    /// The finite-difference step size is not positive and finite.
    #[error("invalid derivative step: {0} must be positive and finite")]
    InvalidDerivativeStep(f64),

    /// The lower bound exceeds the upper bound in a
    /// [`Domain`](crate::space::Domain).
    #[error("invalid bounds: low ({low}) must be less than or equal to high ({high})")]
    InvalidBounds {
        /// The lower bound value.
        low: f64,
        /// The upper bound value.
        high: f64,
    },

    /// The step size of a quantized domain is not positive.
    #[error("invalid step: step must be positive")]
    InvalidStep,

    /// A categorical domain was created with an empty choices vector.
    #[error("categorical choices cannot be empty")]
    EmptyChoices,

    /// A configuration lacks a field the trial runner requires.
    #[error("missing configuration parameter '{0}'")]
    MissingParameter(&'static str),

    /// A configuration field holds a value that cannot satisfy the
    /// boosting-engine contract (e.g. a non-finite value where an integer
    /// is required).
    #[error("invalid configuration parameter '{name}' = {value}: {reason}")]
    InvalidParameter {
        /// The parameter name.
        name: &'static str,
        /// The offending value.
        value: f64,
        /// Why the value violates the contract.
        reason: &'static str,
    },

    /// A dataset failed construction validation.
    #[error("invalid dataset: {0}")]
    InvalidDataset(String),

    /// The boosting-engine collaborator reported a failure.
    #[error("boosting engine error: {0}")]
    Engine(String),

    /// The search budget was exhausted without a single completed trial.
    #[error("no viable configuration found: every trial in the budget failed")]
    NoViableTrial,
}

/// A convenience alias for `core::result::Result<T, Error>`.
pub type Result<T> = core::result::Result<T, Error>;
