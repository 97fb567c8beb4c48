//! Contract-layer error taxonomy.

use thiserror::Error;

use super::job::JobStatus;
use crate::state::StateError;

/// Domain errors raised by the contract handlers.
///
/// These propagate to the caller unchanged: a domain violation cannot be
/// repaired by retrying, so no handler recovers from one locally.
/// Transport-layer failures never appear here — they exist only in the
/// [`classify`](crate::classify) taxonomy, produced gateway-side.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ContractError {
    /// A record with this key already exists.
    #[error("record already exists: {key}")]
    AlreadyExists {
        /// The entity id that is already populated.
        key: String,
    },

    /// No record exists for this key.
    #[error("record not found: {key}")]
    NotFound {
        /// The entity id that was looked up.
        key: String,
    },

    /// A job transition was requested out of order.
    ///
    /// Job lifecycles only move forward, one step at a time:
    /// `Open -> Taken -> Done`.
    #[error("job {job_id} is {from}, cannot move to {requested}")]
    InvalidState {
        /// The job whose transition was rejected.
        job_id: String,
        /// The job's current status.
        from: JobStatus,
        /// The status the caller asked for.
        requested: JobStatus,
    },

    /// An SLA tolerance band violates `min <= target <= max`.
    #[error("invalid SLA interval: min {min}, target {target}, max {max}")]
    InvalidSla {
        /// Requested target grass length.
        target: f64,
        /// Requested upper bound.
        max: f64,
        /// Requested lower bound.
        min: f64,
    },

    /// Malformed input reached a handler.
    #[error("invalid argument: {message}")]
    Validation {
        /// What was wrong with the input.
        message: String,
    },

    /// The underlying state store failed.
    #[error(transparent)]
    Storage(#[from] StateError),
}

impl ContractError {
    /// Shorthand for a [`ContractError::Validation`] with a formatted
    /// message.
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}
