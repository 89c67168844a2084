//! Storage trait abstraction
//!
//! The two collaborator interfaces the finalization engine depends on. Both
//! backends implement them; `StorageBackend` dispatches between them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use termsift_core::{NewSearchEvent, ReconcilePlan, SearchEvent, SessionKey, TermSummary};

use crate::error::StorageError;

/// Append-only log of search events.
#[async_trait]
pub trait EventLog: Send + Sync {
    /// Append an event. `created_at` defaults to now.
    async fn append_event(&self, event: &NewSearchEvent) -> Result<SearchEvent, StorageError>;

    /// All events of one session, by `created_at` then insertion order.
    /// Empty when the session is unknown.
    async fn fetch_events(
        &self,
        user_id: &str,
        session_id: &str,
    ) -> Result<Vec<SearchEvent>, StorageError>;

    /// Distinct sessions, oldest first, optionally for one user only.
    async fn list_sessions(&self, user_id: Option<&str>) -> Result<Vec<SessionKey>, StorageError>;
}

/// Per-user term frequency table.
#[async_trait]
pub trait TermStore: Send + Sync {
    /// Every summary row for a user.
    async fn find_by_user(&self, user_id: &str) -> Result<Vec<TermSummary>, StorageError>;

    /// Insert or overwrite the row for `(user_id, term)`.
    async fn upsert(&self, summary: &TermSummary) -> Result<(), StorageError>;

    /// Delete the given terms for a user. Returns the number of rows removed.
    async fn delete_many(&self, user_id: &str, terms: &[String]) -> Result<usize, StorageError>;

    /// Find, plan, delete and upsert in one transaction.
    ///
    /// Returns the applied plan. Nothing is committed when any step fails.
    async fn reconcile_term(
        &self,
        user_id: &str,
        term: &str,
        at: DateTime<Utc>,
    ) -> Result<ReconcilePlan, StorageError>;
}
