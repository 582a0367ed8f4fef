use std::collections::TryReserveError;

use thiserror::Error;

/// Errors reported by tree operations.
///
/// A key that is not present is never an error: lookups return the sentinel,
/// `false` or `None` instead.
#[derive(Debug, Error)]
pub enum TreeError {
    /// A structural precondition was not met, or [`crate::Tree::check`]
    /// found a broken invariant.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
    /// The configured node limit was reached.
    #[error("node limit of {limit} reached")]
    CapacityExceeded { limit: usize },
    /// The arena could not grow.
    #[error("node allocation failed")]
    AllocationFailed(#[from] TryReserveError),
}

pub type Result<T> = std::result::Result<T, TreeError>;

impl TreeError {
    pub(crate) fn invariant(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        tracing::warn!(%msg, "refusing operation");
        TreeError::InvariantViolation(msg)
    }
}
