use chrono::{DateTime, Utc};
use rusqlite::{Connection, TransactionBehavior, params};
use termsift_core::{ReconcilePlan, TermSummary, plan_reconcile};

use super::{Storage, format_ts, get_conn, parse_ts};
use crate::error::StorageError;

fn query_user_summaries(conn: &Connection, user_id: &str) -> Result<Vec<TermSummary>, StorageError> {
    let mut stmt = conn.prepare(
        "SELECT user_id, term, count, last_seen_at
           FROM term_summaries
          WHERE user_id = ?1
          ORDER BY term ASC",
    )?;
    let rows = stmt
        .query_map(params![user_id], |row| {
            Ok(TermSummary {
                user_id: row.get(0)?,
                term: row.get(1)?,
                count: row.get(2)?,
                last_seen_at: parse_ts(3, &row.get::<_, String>(3)?)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

fn upsert_summary(conn: &Connection, summary: &TermSummary) -> Result<(), StorageError> {
    conn.execute(
        "INSERT INTO term_summaries (user_id, term, count, last_seen_at)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT (user_id, term) DO UPDATE SET
           count = excluded.count,
           last_seen_at = excluded.last_seen_at",
        params![summary.user_id, summary.term, summary.count, format_ts(summary.last_seen_at)],
    )?;
    Ok(())
}

fn delete_terms(conn: &Connection, user_id: &str, terms: &[String]) -> Result<usize, StorageError> {
    let mut stmt = conn.prepare("DELETE FROM term_summaries WHERE user_id = ?1 AND term = ?2")?;
    let mut deleted = 0usize;
    for term in terms {
        deleted = deleted.saturating_add(stmt.execute(params![user_id, term])?);
    }
    Ok(deleted)
}

impl Storage {
    /// Every summary row for a user.
    ///
    /// # Errors
    /// Returns error if the query fails or a row is corrupt.
    pub fn find_by_user(&self, user_id: &str) -> Result<Vec<TermSummary>, StorageError> {
        let conn = get_conn(&self.pool)?;
        query_user_summaries(&conn, user_id)
    }

    /// Insert or overwrite one summary row.
    ///
    /// # Errors
    /// Returns error if the write fails.
    pub fn upsert(&self, summary: &TermSummary) -> Result<(), StorageError> {
        let conn = get_conn(&self.pool)?;
        upsert_summary(&conn, summary)
    }

    /// Delete terms for a user in one transaction.
    ///
    /// # Errors
    /// Returns error if the delete fails; nothing is removed in that case.
    pub fn delete_many(&self, user_id: &str, terms: &[String]) -> Result<usize, StorageError> {
        let mut conn = get_conn(&self.pool)?;
        let tx = conn.transaction()?;
        let deleted = delete_terms(&tx, user_id, terms)?;
        tx.commit()?;
        Ok(deleted)
    }

    /// Retract superseded prefixes and upsert `term`, atomically.
    ///
    /// The write lock is taken up front (`BEGIN IMMEDIATE`) so concurrent
    /// reconciles from other connections queue instead of reading stale rows.
    ///
    /// # Errors
    /// Returns error if any statement fails or the stored rows break the
    /// uniqueness invariant; the transaction is rolled back on drop.
    pub fn reconcile_term(
        &self,
        user_id: &str,
        term: &str,
        at: DateTime<Utc>,
    ) -> Result<ReconcilePlan, StorageError> {
        let mut conn = get_conn(&self.pool)?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let existing = query_user_summaries(&tx, user_id)?;
        let plan = plan_reconcile(&existing, user_id, term, at)?;

        let retracted = plan.retracted_terms();
        delete_terms(&tx, user_id, &retracted)?;
        upsert_summary(&tx, &plan.summary)?;
        tx.commit()?;

        for row in &plan.retracted {
            tracing::debug!(user_id, term = %row.term, count = row.count, "retracted prefix summary");
        }
        Ok(plan)
    }
}
