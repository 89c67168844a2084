//! Migration v1: event log and term summaries

pub(super) const SQL: &str = "
CREATE TABLE IF NOT EXISTS search_events (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id TEXT NOT NULL,
    session_id TEXT NOT NULL,
    raw_value TEXT NOT NULL,
    event_type TEXT NOT NULL CHECK (event_type IN ('keystroke', 'finalize')),
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_search_events_user_session
    ON search_events (user_id, session_id, created_at, id);

CREATE TABLE IF NOT EXISTS term_summaries (
    user_id TEXT NOT NULL,
    term TEXT NOT NULL,
    count INTEGER NOT NULL DEFAULT 1 CHECK (count > 0),
    last_seen_at TEXT NOT NULL,
    PRIMARY KEY (user_id, term)
);

CREATE INDEX IF NOT EXISTS idx_term_summaries_user_last_seen
    ON term_summaries (user_id, last_seen_at DESC);

CREATE INDEX IF NOT EXISTS idx_search_events_created
    ON search_events (created_at);
";
