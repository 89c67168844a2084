//! PostgreSQL schema migrations for termsift storage.

use sqlx::PgPool;

use crate::error::StorageError;

/// Run all PostgreSQL migrations. Every statement is idempotent.
pub async fn run_pg_migrations(pool: &PgPool) -> Result<(), StorageError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS search_events (
            id BIGSERIAL PRIMARY KEY,
            user_id TEXT NOT NULL,
            session_id TEXT NOT NULL,
            raw_value TEXT NOT NULL,
            event_type TEXT NOT NULL CHECK (event_type IN ('keystroke', 'finalize')),
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_search_events_user_session
             ON search_events (user_id, session_id, created_at, id)",
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_search_events_created ON search_events (created_at)")
        .execute(pool)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS term_summaries (
            user_id TEXT NOT NULL,
            term TEXT NOT NULL,
            count INTEGER NOT NULL DEFAULT 1 CHECK (count > 0),
            last_seen_at TIMESTAMPTZ NOT NULL,
            PRIMARY KEY (user_id, term)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_term_summaries_user_last_seen
             ON term_summaries (user_id, last_seen_at DESC)",
    )
    .execute(pool)
    .await?;

    tracing::info!("PostgreSQL migrations applied");
    Ok(())
}
