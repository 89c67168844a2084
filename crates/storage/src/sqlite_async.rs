//! Async trait implementations for SQLite `Storage` via `spawn_blocking`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use termsift_core::{NewSearchEvent, ReconcilePlan, SearchEvent, SessionKey, TermSummary};

use crate::Storage;
use crate::error::StorageError;
use crate::traits::{EventLog, TermStore};

/// Run a blocking closure on the tokio blocking pool.
async fn blocking<F, T>(f: F) -> Result<T, StorageError>
where
    F: FnOnce() -> Result<T, StorageError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| StorageError::Blocking(format!("spawn_blocking join error: {e}")))?
}

/// Body-generating macro for async-to-blocking delegation.
///
/// Each argument is annotated with a capture kind:
/// - `@ref arg`: `.clone()` a `&T`, pass as `&arg`
/// - `@str arg`: `.to_owned()` a `&str`, pass as `&arg`
/// - `@opt_str arg`: `.map(ToOwned::to_owned)` an `Option<&str>`, pass as `arg.as_deref()`
/// - `@slice arg`: `.to_vec()` a `&[T]`, pass as `&arg`
/// - `@val arg`: move directly (Copy/owned types)
macro_rules! delegate {
    ($self:ident, $method:ident $(, @$kind:ident $arg:ident)*) => {{
        let s = $self.clone();
        $(delegate!(@capture $kind $arg);)*
        blocking(move || s.$method($(delegate!(@pass $kind $arg)),*)).await
    }};
    (@capture ref $arg:ident) => { let $arg = $arg.clone(); };
    (@capture str $arg:ident) => { let $arg = $arg.to_owned(); };
    (@capture opt_str $arg:ident) => { let $arg = $arg.map(ToOwned::to_owned); };
    (@capture slice $arg:ident) => { let $arg = $arg.to_vec(); };
    (@capture val $arg:ident) => { };
    (@pass ref $arg:ident) => { &$arg };
    (@pass str $arg:ident) => { &$arg };
    (@pass opt_str $arg:ident) => { $arg.as_deref() };
    (@pass slice $arg:ident) => { &$arg };
    (@pass val $arg:ident) => { $arg };
}

// ── EventLog ─────────────────────────────────────────────────────

#[async_trait]
impl EventLog for Storage {
    async fn append_event(&self, event: &NewSearchEvent) -> Result<SearchEvent, StorageError> {
        delegate!(self, append_event, @ref event)
    }
    async fn fetch_events(
        &self,
        user_id: &str,
        session_id: &str,
    ) -> Result<Vec<SearchEvent>, StorageError> {
        delegate!(self, fetch_events, @str user_id, @str session_id)
    }
    async fn list_sessions(&self, user_id: Option<&str>) -> Result<Vec<SessionKey>, StorageError> {
        delegate!(self, list_sessions, @opt_str user_id)
    }
}

// ── TermStore ────────────────────────────────────────────────────

#[async_trait]
impl TermStore for Storage {
    async fn find_by_user(&self, user_id: &str) -> Result<Vec<TermSummary>, StorageError> {
        delegate!(self, find_by_user, @str user_id)
    }
    async fn upsert(&self, summary: &TermSummary) -> Result<(), StorageError> {
        delegate!(self, upsert, @ref summary)
    }
    async fn delete_many(&self, user_id: &str, terms: &[String]) -> Result<usize, StorageError> {
        delegate!(self, delete_many, @str user_id, @slice terms)
    }
    async fn reconcile_term(
        &self,
        user_id: &str,
        term: &str,
        at: DateTime<Utc>,
    ) -> Result<ReconcilePlan, StorageError> {
        delegate!(self, reconcile_term, @str user_id, @str term, @val at)
    }
}
