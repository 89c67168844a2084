use anyhow::Result;
use chrono::{DateTime, Utc};
use termsift_core::{EventKind, NewSearchEvent};
use termsift_service::Engine;

use super::print_json;

pub(crate) async fn run_record(
    engine: &Engine,
    user: String,
    session: String,
    kind: EventKind,
    value: String,
    at: Option<DateTime<Utc>>,
) -> Result<()> {
    let mut event = NewSearchEvent::new(user, session, value, kind);
    event.created_at = at;
    let recorded = engine.events.record_event(event).await?;
    print_json(&recorded)
}

pub(crate) async fn run_finalize(engine: &Engine, user: &str, session: &str) -> Result<()> {
    let outcome = engine.finalize.process_session(user, session).await?;
    print_json(&outcome)
}

pub(crate) async fn run_events(engine: &Engine, user: &str, session: &str) -> Result<()> {
    let events = engine.events.events(user, session).await?;
    print_json(&events)
}
