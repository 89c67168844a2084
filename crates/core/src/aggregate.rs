//! Reconcile planning for the per-user term frequency table.
//!
//! Storage backends load a user's rows, call [`plan_reconcile`], then apply
//! the plan inside one transaction: delete `retracted` first, then write
//! `summary`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::summary::TermSummary;

/// Whether the reconciled row is new or an existing one bumped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcileAction {
    Created,
    Incremented,
}

/// Writes needed to accept `summary.term` for a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcilePlan {
    /// Rows whose term is a proper prefix of the accepted term. Their counts
    /// are dropped, never merged.
    pub retracted: Vec<TermSummary>,
    pub summary: TermSummary,
    pub action: ReconcileAction,
}

impl ReconcilePlan {
    #[must_use]
    pub fn retracted_terms(&self) -> Vec<String> {
        self.retracted.iter().map(|s| s.term.clone()).collect()
    }
}

/// Plans the retract-then-upsert step for one accepted term.
///
/// `existing` is every stored row for the user; rows belonging to other users
/// are ignored.
///
/// # Errors
/// `CoreError::InvalidInput` for a blank term, `CoreError::InvariantViolation`
/// if more than one row already exists for `(user_id, term)`.
pub fn plan_reconcile(
    existing: &[TermSummary],
    user_id: &str,
    term: &str,
    now: DateTime<Utc>,
) -> Result<ReconcilePlan> {
    if term.is_empty() {
        return Err(CoreError::InvalidInput("term must not be empty".to_owned()));
    }

    let mut exact: Vec<&TermSummary> = Vec::new();
    let mut retracted = Vec::new();
    for row in existing.iter().filter(|r| r.user_id == user_id) {
        if row.term == term {
            exact.push(row);
        } else if row.is_superseded_by(term) {
            retracted.push(row.clone());
        }
    }

    let (summary, action) = match exact.as_slice() {
        [] => (TermSummary::first_seen(user_id, term, now), ReconcileAction::Created),
        [row] => (row.seen_again(now), ReconcileAction::Incremented),
        rows => {
            return Err(CoreError::InvariantViolation {
                user_id: user_id.to_owned(),
                term: term.to_owned(),
                found: rows.len(),
            });
        },
    };

    Ok(ReconcilePlan { retracted, summary, action })
}
