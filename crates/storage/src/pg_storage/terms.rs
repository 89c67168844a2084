//! TermStore implementation for PgStorage.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgConnection;
use termsift_core::{ReconcilePlan, TermSummary, plan_reconcile};

use super::{PgStorage, count_to_i32, row_to_summary};
use crate::error::StorageError;
use crate::traits::TermStore;

const SUMMARY_COLUMNS: &str = "user_id, term, count, last_seen_at";

async fn upsert_summary(conn: &mut PgConnection, summary: &TermSummary) -> Result<(), StorageError> {
    sqlx::query(
        "INSERT INTO term_summaries (user_id, term, count, last_seen_at)
         VALUES ($1, $2, $3, $4)
         ON CONFLICT (user_id, term) DO UPDATE SET
           count = EXCLUDED.count,
           last_seen_at = EXCLUDED.last_seen_at",
    )
    .bind(&summary.user_id)
    .bind(&summary.term)
    .bind(count_to_i32(summary.count)?)
    .bind(summary.last_seen_at)
    .execute(conn)
    .await?;
    Ok(())
}

async fn delete_terms(
    conn: &mut PgConnection,
    user_id: &str,
    terms: &[String],
) -> Result<usize, StorageError> {
    if terms.is_empty() {
        return Ok(0);
    }
    let result = sqlx::query("DELETE FROM term_summaries WHERE user_id = $1 AND term = ANY($2)")
        .bind(user_id)
        .bind(terms)
        .execute(conn)
        .await?;
    Ok(usize::try_from(result.rows_affected()).unwrap_or(usize::MAX))
}

#[async_trait]
impl TermStore for PgStorage {
    async fn find_by_user(&self, user_id: &str) -> Result<Vec<TermSummary>, StorageError> {
        let rows = sqlx::query(&format!(
            "SELECT {SUMMARY_COLUMNS} FROM term_summaries WHERE user_id = $1 ORDER BY term"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_summary).collect()
    }

    async fn upsert(&self, summary: &TermSummary) -> Result<(), StorageError> {
        let mut conn = self.pool.acquire().await?;
        upsert_summary(&mut conn, summary).await
    }

    async fn delete_many(&self, user_id: &str, terms: &[String]) -> Result<usize, StorageError> {
        let mut conn = self.pool.acquire().await?;
        delete_terms(&mut conn, user_id, terms).await
    }

    async fn reconcile_term(
        &self,
        user_id: &str,
        term: &str,
        at: DateTime<Utc>,
    ) -> Result<ReconcilePlan, StorageError> {
        let mut tx = self.pool.begin().await?;

        // Serializes reconciles for the same user across processes until commit.
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        let rows = sqlx::query(&format!(
            "SELECT {SUMMARY_COLUMNS} FROM term_summaries WHERE user_id = $1 FOR UPDATE"
        ))
        .bind(user_id)
        .fetch_all(&mut *tx)
        .await?;
        let existing = rows.iter().map(row_to_summary).collect::<Result<Vec<_>, _>>()?;

        let plan = plan_reconcile(&existing, user_id, term, at)?;
        delete_terms(&mut tx, user_id, &plan.retracted_terms()).await?;
        upsert_summary(&mut tx, &plan.summary).await?;
        tx.commit().await?;

        for row in &plan.retracted {
            tracing::debug!(user_id, term = %row.term, count = row.count, "retracted prefix summary");
        }
        Ok(plan)
    }
}
