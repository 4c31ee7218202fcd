//! Error Types for Forest Construction, Fitting and Prediction
//!
//! ## Error Categories
//!
//! Every error belongs to exactly one [`ErrorKind`]:
//!
//! ### Configuration
//! Bad constructor arguments. Raised when a kernel, tree, ensemble or forest is
//! built, before any data is seen:
//! - `UnknownKernel`: kernel identifier is not one of `rbf`, `matern-d1`,
//!   `matern-d3`, `matern-d5`
//! - `UnsupportedMaternOrder`: Matérn smoothness outside {1, 3, 5}
//! - `InvalidConfig`: non-positive k, model count, sample size, worker count,
//!   bandwidth or scale entry
//! - `DimensionMismatch`: a Matérn scale vector that does not match the data
//! - `ThreadPool`: the worker pool could not be created
//! - `Serialization`: a configuration or model document could not be parsed
//!
//! ### Precondition
//! The call itself is fine but the learner or the data is not ready for it:
//! - `InsufficientData`: fewer rows than the split fan-out
//! - `FeatureMismatch`: query columns differ from the fitted model's
//! - `NotFitted`: predict before fit
//!
//! ### Invariant Violation
//! - `DegeneratePartition`: a split produced fewer non-empty buckets than
//!   requested. Aborts the fit instead of emitting a malformed tree.
//!
//! ## Error Handling Strategy
//!
//! ```rust
//! use genif_core::{ErrorKind, GenifError};
//!
//! fn describe(err: &GenifError) -> &'static str {
//!     match err.kind() {
//!         ErrorKind::Configuration => "fix the forest parameters",
//!         ErrorKind::Precondition => "fit first or supply more rows",
//!         ErrorKind::InvariantViolation => "report the dataset that triggered this",
//!     }
//! }
//!
//! assert_eq!(describe(&GenifError::NotFitted), "fit first or supply more rows");
//! ```

use thiserror::Error;

/// Result type for forest operations
pub type GenifResult<T> = Result<T, GenifError>;

/// Coarse classification of a [`GenifError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad constructor arguments
    Configuration,
    /// The learner or the data is not ready for the call
    Precondition,
    /// Internal consistency check failed during induction
    InvariantViolation,
}

/// Errors raised by kernels, trees, ensembles and forests
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenifError {
    /// Kernel identifier not recognised
    #[error("Unknown kernel '{name}' (possible choices are: rbf, matern-d1, matern-d3, matern-d5)")]
    UnknownKernel {
        /// The identifier that was supplied
        name: String,
    },

    /// Matérn smoothness order outside {1, 3, 5}
    #[error("Unsupported Matérn order d={order} (only d=1, d=3 or d=5 is supported)")]
    UnsupportedMaternOrder {
        /// The order that was supplied
        order: u32,
    },

    /// Scale vector length does not conform to the input dimensionality
    #[error("Kernel scale has {expected} entries but input vectors have {found} dimensions")]
    DimensionMismatch {
        /// Dimensionality the kernel was configured for
        expected: usize,
        /// Dimensionality of the data
        found: usize,
    },

    /// A numeric hyperparameter is out of range
    #[error("Invalid configuration: {reason}")]
    InvalidConfig {
        /// What was wrong
        reason: &'static str,
    },

    /// The worker pool could not be built
    #[error("Worker pool creation failed: {reason}")]
    ThreadPool {
        /// Message reported by the thread pool builder
        reason: String,
    },

    /// A configuration or model document could not be parsed
    #[error("Serialization error: {reason}")]
    Serialization {
        /// Message reported by the parser
        reason: String,
    },

    /// Not enough observations to run the operation
    #[error("Insufficient data: need at least {required} observations, have {available}")]
    InsufficientData {
        /// Minimum number of rows needed
        required: usize,
        /// Rows actually supplied
        available: usize,
    },

    /// Query data has a different number of columns than the fitted model
    #[error("Feature mismatch: model was fitted on {expected} columns, got {found}")]
    FeatureMismatch {
        /// Columns seen at fit time
        expected: usize,
        /// Columns in the query
        found: usize,
    },

    /// Predict called before any model was fitted
    #[error("No model has been fitted yet, call `fit` before `predict`")]
    NotFitted,

    /// A split produced fewer non-empty buckets than requested
    #[error("Partitioning returned {found} non-empty clusters from {observations} observations, expected k = {expected}")]
    DegeneratePartition {
        /// Requested fan-out
        expected: usize,
        /// Non-empty buckets actually produced
        found: usize,
        /// Members of the node being split
        observations: usize,
    },
}

impl GenifError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownKernel { .. }
            | Self::UnsupportedMaternOrder { .. }
            | Self::DimensionMismatch { .. }
            | Self::InvalidConfig { .. }
            | Self::ThreadPool { .. }
            | Self::Serialization { .. } => ErrorKind::Configuration,
            Self::InsufficientData { .. } | Self::FeatureMismatch { .. } | Self::NotFitted => {
                ErrorKind::Precondition
            }
            Self::DegeneratePartition { .. } => ErrorKind::InvariantViolation,
        }
    }

    /// True for errors raised while validating constructor arguments
    pub fn is_configuration(&self) -> bool {
        self.kind() == ErrorKind::Configuration
    }

    /// True for errors raised because the call came too early or with too little data
    pub fn is_precondition(&self) -> bool {
        self.kind() == ErrorKind::Precondition
    }
}
