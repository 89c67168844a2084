//! Typed error enum for the storage layer.
//!
//! Callers match on specific failure modes (transient DB errors, corrupt rows,
//! broken domain invariants) instead of downcasting opaque boxes.

use std::error::Error as StdError;

use termsift_core::CoreError;
use thiserror::Error;

type BoxError = Box<dyn StdError + Send + Sync>;

#[derive(Debug, Error)]
pub enum StorageError {
    /// SQL / connection / pool failure from either backend.
    #[error("database error: {source}")]
    Database {
        /// Busy, locked, pool exhaustion or I/O: worth retrying.
        transient: bool,
        #[source]
        source: BoxError,
    },

    /// A blocking storage task panicked or was cancelled.
    #[error("blocking task failed: {0}")]
    Blocking(String),

    /// Row data could not be turned back into a domain type.
    #[error("data corruption: {context}")]
    DataCorruption {
        context: String,
        #[source]
        source: BoxError,
    },

    #[error("migration error: {0}")]
    Migration(String),

    /// Reconcile planning rejected the stored state or the input.
    #[error(transparent)]
    Domain(#[from] CoreError),
}

impl StorageError {
    /// Whether this error is likely transient (worth retrying).
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Database { transient, .. } => *transient,
            Self::Blocking(_) => true,
            _ => false,
        }
    }

    /// Whether the stored data broke the one-row-per-`(user_id, term)` rule.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, Self::Domain(CoreError::InvariantViolation { .. }))
    }

    pub(crate) fn corrupt(
        context: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::DataCorruption { context: context.into(), source: Box::new(source) }
    }
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        if matches!(
            err,
            rusqlite::Error::FromSqlConversionFailure(..)
                | rusqlite::Error::IntegralValueOutOfRange(..)
                | rusqlite::Error::InvalidColumnType(..)
        ) {
            return Self::corrupt("stored row could not be decoded", err);
        }
        let transient = matches!(
            &err,
            rusqlite::Error::SqliteFailure(e, _)
                if matches!(e.code, rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked)
        );
        Self::Database { transient, source: Box::new(err) }
    }
}

#[cfg(feature = "sqlite")]
impl From<r2d2::Error> for StorageError {
    fn from(err: r2d2::Error) -> Self {
        Self::Database { transient: true, source: Box::new(err) }
    }
}

#[cfg(feature = "postgres")]
impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        let transient = matches!(
            &err,
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_)
        );
        Self::Database { transient, source: Box::new(err) }
    }
}
