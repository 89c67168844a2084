//! EventLog implementation for PgStorage.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use termsift_core::{NewSearchEvent, SearchEvent, SessionKey};

use super::{PgStorage, row_to_event};
use crate::error::StorageError;
use crate::traits::EventLog;

#[async_trait]
impl EventLog for PgStorage {
    async fn append_event(&self, event: &NewSearchEvent) -> Result<SearchEvent, StorageError> {
        let (id, created_at): (i64, DateTime<Utc>) = sqlx::query_as(
            "INSERT INTO search_events (user_id, session_id, raw_value, event_type, created_at)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, created_at",
        )
        .bind(&event.user_id)
        .bind(&event.session_id)
        .bind(&event.raw_value)
        .bind(event.kind.as_str())
        .bind(event.created_at.unwrap_or_else(Utc::now))
        .fetch_one(&self.pool)
        .await?;
        Ok(SearchEvent {
            id,
            user_id: event.user_id.clone(),
            session_id: event.session_id.clone(),
            raw_value: event.raw_value.clone(),
            kind: event.kind,
            created_at,
        })
    }

    async fn fetch_events(
        &self,
        user_id: &str,
        session_id: &str,
    ) -> Result<Vec<SearchEvent>, StorageError> {
        let rows = sqlx::query(
            "SELECT id, user_id, session_id, raw_value, event_type, created_at
               FROM search_events
              WHERE user_id = $1 AND session_id = $2
              ORDER BY created_at ASC, id ASC",
        )
        .bind(user_id)
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_event).collect()
    }

    async fn list_sessions(&self, user_id: Option<&str>) -> Result<Vec<SessionKey>, StorageError> {
        let rows: Vec<(String, String)> = sqlx::query_as(
            "SELECT user_id, session_id
               FROM search_events
              WHERE ($1::TEXT IS NULL OR user_id = $1)
              GROUP BY user_id, session_id
              ORDER BY MIN(created_at) ASC, user_id ASC, session_id ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|(user_id, session_id)| SessionKey { user_id, session_id })
            .collect())
    }
}
