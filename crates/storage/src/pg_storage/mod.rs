//! PostgreSQL storage backend using sqlx.
//!
//! Split into modular files by domain concern.

mod events;
mod terms;

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use termsift_core::{
    EventKind, PG_POOL_ACQUIRE_TIMEOUT_SECS, PG_POOL_IDLE_TIMEOUT_SECS, PG_POOL_MAX_CONNECTIONS,
    SearchEvent, TermSummary,
};

use crate::error::StorageError;
use crate::pg_migrations::run_pg_migrations;

#[derive(Clone, Debug)]
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        let pool = PgPoolOptions::new()
            .max_connections(PG_POOL_MAX_CONNECTIONS)
            .acquire_timeout(Duration::from_secs(PG_POOL_ACQUIRE_TIMEOUT_SECS))
            .idle_timeout(Duration::from_secs(PG_POOL_IDLE_TIMEOUT_SECS))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;
        run_pg_migrations(&pool).await.map_err(|e| StorageError::Migration(e.to_string()))?;
        tracing::info!("PgStorage initialized");
        Ok(Self { pool })
    }
}

pub(crate) fn row_to_event(row: &sqlx::postgres::PgRow) -> Result<SearchEvent, StorageError> {
    let kind: String = row.try_get("event_type")?;
    let kind = kind
        .parse::<EventKind>()
        .map_err(|e| StorageError::corrupt(format!("event_type {kind:?}"), e))?;
    Ok(SearchEvent {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        session_id: row.try_get("session_id")?,
        raw_value: row.try_get("raw_value")?,
        kind,
        created_at: row.try_get("created_at")?,
    })
}

pub(crate) fn row_to_summary(row: &sqlx::postgres::PgRow) -> Result<TermSummary, StorageError> {
    let count: i32 = row.try_get("count")?;
    Ok(TermSummary {
        user_id: row.try_get("user_id")?,
        term: row.try_get("term")?,
        count: u32::try_from(count)
            .map_err(|e| StorageError::corrupt(format!("negative count {count}"), e))?,
        last_seen_at: row.try_get("last_seen_at")?,
    })
}

pub(crate) fn count_to_i32(count: u32) -> Result<i32, StorageError> {
    i32::try_from(count)
        .map_err(|e| StorageError::corrupt("count exceeds PostgreSQL INTEGER".to_owned(), e))
}
