//! Typed error enum for the service layer.
//!
//! Negative outcomes of finalization (no candidate, not meaningful) are not
//! errors; see `SessionOutcome`. Everything here is a real failure.

use termsift_core::CoreError;
use termsift_storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// The event log or term store failed. The whole operation may be retried.
    #[error("store unavailable: {0}")]
    StoreUnavailable(#[source] StorageError),

    /// The store holds more than one row for a `(user_id, term)` pair.
    /// Not repaired automatically.
    #[error("invariant violation: {0}")]
    InvariantViolation(#[source] StorageError),

    /// Stored data can't be decoded or the schema is unusable. Retrying
    /// won't help.
    #[error("data corruption: {0}")]
    DataCorruption(#[source] StorageError),

    /// Caller provided invalid input (blank identifiers, unknown kind).
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl ServiceError {
    /// Whether the caller should retry the operation.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_))
    }

    /// Whether the underlying store failure looked transient (busy, pool, I/O).
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::StoreUnavailable(e) if e.is_transient())
    }
}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Domain(CoreError::InvalidInput(msg)) => Self::InvalidInput(msg),
            e if e.is_invariant_violation() => Self::InvariantViolation(e),
            e @ (StorageError::DataCorruption { .. } | StorageError::Migration(_)) => {
                Self::DataCorruption(e)
            },
            e => Self::StoreUnavailable(e),
        }
    }
}

impl From<CoreError> for ServiceError {
    fn from(err: CoreError) -> Self {
        Self::from(StorageError::Domain(err))
    }
}
