//! Event fixtures shared by unit tests.

use chrono::{DateTime, Duration, TimeZone as _, Utc};

use crate::event::{EventKind, SearchEvent};

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 8, 8, 12, 0, 0).single().unwrap_or_default()
}

/// Builds a session log from `(kind, raw_value)` pairs, one second apart.
pub fn session(steps: &[(EventKind, &str)]) -> Vec<SearchEvent> {
    steps
        .iter()
        .enumerate()
        .map(|(i, (kind, raw))| {
            let offset = i64::try_from(i).unwrap_or(i64::MAX);
            SearchEvent {
                id: offset + 1,
                user_id: "user-1".to_owned(),
                session_id: "session-1".to_owned(),
                raw_value: (*raw).to_owned(),
                kind: *kind,
                created_at: base_time() + Duration::seconds(offset),
            }
        })
        .collect()
}

pub fn keystrokes(values: &[&str]) -> Vec<SearchEvent> {
    let steps: Vec<(EventKind, &str)> = values.iter().map(|v| (EventKind::Keystroke, *v)).collect();
    session(&steps)
}
