//! Unified storage backend with enum dispatch.

#[cfg(feature = "sqlite")]
use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use termsift_core::{NewSearchEvent, ReconcilePlan, SearchEvent, SessionKey, TermSummary};

use crate::error::StorageError;
use crate::traits::{EventLog, TermStore};

macro_rules! dispatch {
    ($self:expr, $trait:path, $method:ident ( $($arg:expr),* $(,)? )) => {
        match $self {
            #[cfg(feature = "sqlite")]
            StorageBackend::Sqlite(s) => <crate::Storage as $trait>::$method(s, $($arg),*).await,
            #[cfg(feature = "postgres")]
            StorageBackend::Postgres(s) => <crate::pg_storage::PgStorage as $trait>::$method(s, $($arg),*).await,
        }
    };
}

#[derive(Clone, Debug)]
pub enum StorageBackend {
    #[cfg(feature = "sqlite")]
    Sqlite(crate::Storage),
    #[cfg(feature = "postgres")]
    Postgres(crate::pg_storage::PgStorage),
}

impl StorageBackend {
    #[cfg(feature = "sqlite")]
    pub fn new_sqlite(db_path: &Path) -> Result<Self, StorageError> {
        Ok(Self::Sqlite(crate::Storage::new(db_path)?))
    }

    #[cfg(feature = "postgres")]
    pub async fn new_postgres(database_url: &str) -> Result<Self, StorageError> {
        Ok(Self::Postgres(crate::pg_storage::PgStorage::new(database_url).await?))
    }

    /// Short backend name for logs.
    pub const fn kind(&self) -> &'static str {
        match *self {
            #[cfg(feature = "sqlite")]
            Self::Sqlite(_) => "sqlite",
            #[cfg(feature = "postgres")]
            Self::Postgres(_) => "postgres",
        }
    }
}

// ── EventLog ─────────────────────────────────────────────────────

#[async_trait]
impl EventLog for StorageBackend {
    async fn append_event(&self, event: &NewSearchEvent) -> Result<SearchEvent, StorageError> {
        dispatch!(self, EventLog, append_event(event))
    }

    async fn fetch_events(
        &self,
        user_id: &str,
        session_id: &str,
    ) -> Result<Vec<SearchEvent>, StorageError> {
        dispatch!(self, EventLog, fetch_events(user_id, session_id))
    }

    async fn list_sessions(&self, user_id: Option<&str>) -> Result<Vec<SessionKey>, StorageError> {
        dispatch!(self, EventLog, list_sessions(user_id))
    }
}

// ── TermStore ────────────────────────────────────────────────────

#[async_trait]
impl TermStore for StorageBackend {
    async fn find_by_user(&self, user_id: &str) -> Result<Vec<TermSummary>, StorageError> {
        dispatch!(self, TermStore, find_by_user(user_id))
    }

    async fn upsert(&self, summary: &TermSummary) -> Result<(), StorageError> {
        dispatch!(self, TermStore, upsert(summary))
    }

    async fn delete_many(&self, user_id: &str, terms: &[String]) -> Result<usize, StorageError> {
        dispatch!(self, TermStore, delete_many(user_id, terms))
    }

    async fn reconcile_term(
        &self,
        user_id: &str,
        term: &str,
        at: DateTime<Utc>,
    ) -> Result<ReconcilePlan, StorageError> {
        dispatch!(self, TermStore, reconcile_term(user_id, term, at))
    }
}
