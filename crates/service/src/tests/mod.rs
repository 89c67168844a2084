//! Test utilities and module declarations for service tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone as _, Utc};
use tempfile::TempDir;
use termsift_core::{
    NewSearchEvent, ReconcilePlan, SearchEvent, SessionKey, TermSummary, plan_reconcile,
};
use termsift_storage::traits::{EventLog, TermStore};
use termsift_storage::{StorageBackend, StorageError};

use crate::{Engine, EngineConfig};

#[allow(clippy::unwrap_used, reason = "test code")]
pub fn create_test_engine() -> (Engine, Arc<StorageBackend>, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let storage = Arc::new(StorageBackend::new_sqlite(&temp_dir.path().join("test.db")).unwrap());
    let engine = Engine::new(Arc::clone(&storage), EngineConfig::default());
    (engine, storage, temp_dir)
}

pub fn at(secs: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 8, 8, 12, 0, 0).single().unwrap_or_default() + Duration::seconds(secs)
}

pub fn keystroke(user: &str, session: &str, raw: &str, secs: i64) -> NewSearchEvent {
    NewSearchEvent::keystroke(user, session, raw).at(at(secs))
}

pub fn finalize(user: &str, session: &str, raw: &str, secs: i64) -> NewSearchEvent {
    NewSearchEvent::finalize(user, session, raw).at(at(secs))
}

/// Append straight to the log, bypassing validation and finalize handling.
#[allow(clippy::unwrap_used, reason = "test code")]
pub async fn append_all(storage: &StorageBackend, events: &[NewSearchEvent]) {
    for event in events {
        storage.append_event(event).await.unwrap();
    }
}

/// Write an event whose timestamp can't be parsed, behind the pool's back.
#[allow(clippy::unwrap_used, reason = "test code")]
pub fn plant_unreadable_event(temp_dir: &TempDir, user: &str, session: &str) {
    let conn = rusqlite::Connection::open(temp_dir.path().join("test.db")).unwrap();
    conn.execute(
        "INSERT INTO search_events (user_id, session_id, raw_value, event_type, created_at)
         VALUES (?1, ?2, 'rails', 'finalize', 'not-a-time')",
        rusqlite::params![user, session],
    )
    .unwrap();
}

#[allow(clippy::unwrap_used, reason = "test code")]
pub async fn terms_with_counts(storage: &StorageBackend, user: &str) -> Vec<(String, u32)> {
    let mut rows: Vec<(String, u32)> = storage
        .find_by_user(user)
        .await
        .unwrap()
        .into_iter()
        .map(|s| (s.term, s.count))
        .collect();
    rows.sort();
    rows
}

#[derive(Debug, Clone, Copy)]
pub enum Fault {
    /// Every term store call fails with a transient database error.
    Unavailable,
    /// The term table already holds two rows for every term.
    DuplicateRows,
}

/// In-memory store with a fixed event log and a broken term table.
pub struct FaultyStore {
    events: Vec<SearchEvent>,
    fault: Fault,
    pub reconcile_calls: AtomicUsize,
}

impl FaultyStore {
    pub fn new(fault: Fault, events: &[NewSearchEvent]) -> Self {
        let events = events
            .iter()
            .zip(1..)
            .map(|(e, id)| SearchEvent {
                id,
                user_id: e.user_id.clone(),
                session_id: e.session_id.clone(),
                raw_value: e.raw_value.clone(),
                kind: e.kind,
                created_at: e.created_at.unwrap_or_else(|| at(0)),
            })
            .collect();
        Self { events, fault, reconcile_calls: AtomicUsize::new(0) }
    }

    fn unavailable() -> StorageError {
        StorageError::Database {
            transient: true,
            source: Box::new(std::io::Error::other("connection refused")),
        }
    }
}

#[async_trait]
impl EventLog for FaultyStore {
    async fn append_event(&self, _event: &NewSearchEvent) -> Result<SearchEvent, StorageError> {
        Err(Self::unavailable())
    }

    async fn fetch_events(
        &self,
        user_id: &str,
        session_id: &str,
    ) -> Result<Vec<SearchEvent>, StorageError> {
        Ok(self
            .events
            .iter()
            .filter(|e| e.user_id == user_id && e.session_id == session_id)
            .cloned()
            .collect())
    }

    async fn list_sessions(&self, user_id: Option<&str>) -> Result<Vec<SessionKey>, StorageError> {
        let mut keys: Vec<SessionKey> = Vec::new();
        for event in &self.events {
            let key = SessionKey::new(event.user_id.as_str(), event.session_id.as_str());
            if user_id.is_none_or(|u| u == key.user_id) && !keys.contains(&key) {
                keys.push(key);
            }
        }
        Ok(keys)
    }
}

#[async_trait]
impl TermStore for FaultyStore {
    async fn find_by_user(&self, _user_id: &str) -> Result<Vec<TermSummary>, StorageError> {
        match self.fault {
            Fault::Unavailable => Err(Self::unavailable()),
            Fault::DuplicateRows => Ok(Vec::new()),
        }
    }

    async fn upsert(&self, _summary: &TermSummary) -> Result<(), StorageError> {
        Err(Self::unavailable())
    }

    async fn delete_many(&self, _user_id: &str, _terms: &[String]) -> Result<usize, StorageError> {
        Err(Self::unavailable())
    }

    async fn reconcile_term(
        &self,
        user_id: &str,
        term: &str,
        at: DateTime<Utc>,
    ) -> Result<ReconcilePlan, StorageError> {
        self.reconcile_calls.fetch_add(1, Ordering::SeqCst);
        match self.fault {
            Fault::Unavailable => Err(Self::unavailable()),
            Fault::DuplicateRows => {
                let twice = [
                    TermSummary::first_seen(user_id, term, at),
                    TermSummary::first_seen(user_id, term, at),
                ];
                Ok(plan_reconcile(&twice, user_id, term, at)?)
            },
        }
    }
}

mod event_tests;
