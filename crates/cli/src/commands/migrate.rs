//! SQLite → PostgreSQL migration command.
//!
//! Copies the event log and the term table from the local SQLite database to
//! the PostgreSQL instance in `DATABASE_URL`. Run it once against an empty
//! target: events are appended, so a second run duplicates them.

use std::collections::BTreeSet;

use termsift_core::NewSearchEvent;
use termsift_storage::StorageBackend;
use termsift_storage::traits::{EventLog, TermStore};

pub(crate) async fn run() -> anyhow::Result<()> {
    let sqlite = crate::open_sqlite()?;

    let pg_url = std::env::var("DATABASE_URL")
        .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set for migration target"))?;
    let pg = StorageBackend::new_postgres(&pg_url).await?;

    println!("Migrating search events...");
    let sessions = sqlite.list_sessions(None).await?;
    let mut events_copied: usize = 0;
    for key in &sessions {
        for event in sqlite.fetch_events(&key.user_id, &key.session_id).await? {
            let copy = NewSearchEvent::new(
                event.user_id,
                event.session_id,
                event.raw_value,
                event.kind,
            )
            .at(event.created_at);
            pg.append_event(&copy).await?;
            events_copied += 1;
        }
    }
    println!("  events: {events_copied} copied from {} sessions", sessions.len());

    println!("Migrating term summaries...");
    let users: BTreeSet<&str> = sessions.iter().map(|k| k.user_id.as_str()).collect();
    let mut summaries_copied: usize = 0;
    for user_id in users {
        for summary in sqlite.find_by_user(user_id).await? {
            if let Err(err) = pg.upsert(&summary).await {
                tracing::warn!(user_id, term = %summary.term, "failed to migrate summary: {err}");
                continue;
            }
            summaries_copied += 1;
        }
    }
    println!("  summaries: {summaries_copied} copied");

    Ok(())
}
