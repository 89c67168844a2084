use chrono::{SubsecRound as _, Utc};
use rusqlite::params;
use termsift_core::{EventKind, NewSearchEvent, SearchEvent, SessionKey};

use super::{Storage, format_ts, get_conn, parse_ts};
use crate::error::StorageError;

fn row_to_event(row: &rusqlite::Row<'_>) -> rusqlite::Result<SearchEvent> {
    let kind: String = row.get(4)?;
    let kind = kind.parse::<EventKind>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(SearchEvent {
        id: row.get(0)?,
        user_id: row.get(1)?,
        session_id: row.get(2)?,
        raw_value: row.get(3)?,
        kind,
        created_at: parse_ts(5, &row.get::<_, String>(5)?)?,
    })
}

impl Storage {
    /// Append an event to the log.
    ///
    /// # Errors
    /// Returns error if the insert fails.
    pub fn append_event(&self, event: &NewSearchEvent) -> Result<SearchEvent, StorageError> {
        let conn = get_conn(&self.pool)?;
        // Stored with microsecond precision; return exactly what was stored.
        let created_at = event.created_at.unwrap_or_else(Utc::now).trunc_subsecs(6);
        conn.execute(
            "INSERT INTO search_events (user_id, session_id, raw_value, event_type, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                event.user_id,
                event.session_id,
                event.raw_value,
                event.kind.as_str(),
                format_ts(created_at),
            ],
        )?;
        Ok(SearchEvent {
            id: conn.last_insert_rowid(),
            user_id: event.user_id.clone(),
            session_id: event.session_id.clone(),
            raw_value: event.raw_value.clone(),
            kind: event.kind,
            created_at,
        })
    }

    /// Events of one session, oldest first, ties in insertion order.
    ///
    /// # Errors
    /// Returns error if the query fails or a row is corrupt.
    pub fn fetch_events(
        &self,
        user_id: &str,
        session_id: &str,
    ) -> Result<Vec<SearchEvent>, StorageError> {
        let conn = get_conn(&self.pool)?;
        let mut stmt = conn.prepare(
            "SELECT id, user_id, session_id, raw_value, event_type, created_at
               FROM search_events
              WHERE user_id = ?1 AND session_id = ?2
              ORDER BY created_at ASC, id ASC",
        )?;
        let events = stmt
            .query_map(params![user_id, session_id], row_to_event)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(events)
    }

    /// Distinct sessions ordered by their first event.
    ///
    /// # Errors
    /// Returns error if the query fails.
    pub fn list_sessions(&self, user_id: Option<&str>) -> Result<Vec<SessionKey>, StorageError> {
        let conn = get_conn(&self.pool)?;
        let mut stmt = conn.prepare(
            "SELECT user_id, session_id
               FROM search_events
              WHERE (?1 IS NULL OR user_id = ?1)
              GROUP BY user_id, session_id
              ORDER BY MIN(created_at) ASC, user_id ASC, session_id ASC",
        )?;
        let sessions = stmt
            .query_map(params![user_id], |row| {
                Ok(SessionKey { user_id: row.get(0)?, session_id: row.get(1)? })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(sessions)
    }
}
