//! Test utilities and module declarations for storage tests.

use chrono::{DateTime, Duration, TimeZone as _, Utc};
use tempfile::TempDir;
use termsift_core::{NewSearchEvent, TermSummary};

use crate::Storage;

#[allow(clippy::unwrap_used, reason = "test code")]
pub fn create_test_storage() -> (Storage, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");
    let storage = Storage::new(&db_path).unwrap();
    (storage, temp_dir)
}

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 8, 8, 12, 0, 0).single().unwrap_or_default()
}

pub fn at(secs: i64) -> DateTime<Utc> {
    t0() + Duration::seconds(secs)
}

pub fn keystroke(user: &str, session: &str, raw: &str, secs: i64) -> NewSearchEvent {
    NewSearchEvent::keystroke(user, session, raw).at(at(secs))
}

pub fn finalize(user: &str, session: &str, raw: &str, secs: i64) -> NewSearchEvent {
    NewSearchEvent::finalize(user, session, raw).at(at(secs))
}

pub fn summary(user: &str, term: &str, count: u32) -> TermSummary {
    TermSummary { user_id: user.to_owned(), term: term.to_owned(), count, last_seen_at: t0() }
}

mod term_tests;
