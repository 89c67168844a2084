use std::result::Result as StdResult;

use thiserror::Error;

/// Errors raised by the pure domain layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// More than one summary row exists for the same `(user_id, term)`.
    #[error("Invariant violation: {found} summaries for user {user_id} and term {term:?}")]
    InvariantViolation { user_id: String, term: String, found: usize },
}

pub type Result<T> = StdResult<T, CoreError>;
