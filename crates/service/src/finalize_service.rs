use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use termsift_core::{
    MeaningfulnessPolicy, SessionReduction, TermSummary, normalize_term, reduce_session,
};
use termsift_storage::StorageBackend;
use termsift_storage::traits::{EventLog, TermStore};

use crate::ServiceError;
use crate::user_locks::UserLocks;

/// Why finalizing a session recorded nothing. Not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum NoOpReason {
    /// Empty log, or the final text was blank after normalization.
    NoCandidate,
    /// The meaningfulness gate rejected the final term.
    NotMeaningful { term: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum SessionOutcome {
    Recorded(TermSummary),
    NoOp(NoOpReason),
}

impl SessionOutcome {
    #[must_use]
    pub const fn summary(&self) -> Option<&TermSummary> {
        match self {
            Self::Recorded(summary) => Some(summary),
            Self::NoOp(_) => None,
        }
    }
}

/// Turns a finished session into at most one term summary update.
pub struct FinalizeService<S = StorageBackend> {
    storage: Arc<S>,
    locks: Arc<UserLocks>,
    policy: MeaningfulnessPolicy,
}

impl<S> FinalizeService<S>
where
    S: EventLog + TermStore,
{
    #[must_use]
    pub const fn new(storage: Arc<S>, locks: Arc<UserLocks>, policy: MeaningfulnessPolicy) -> Self {
        Self { storage, locks, policy }
    }

    /// Reduce the session's event log and reconcile the accepted term, if any.
    ///
    /// The caller must have stopped appending events to this session.
    pub async fn process_session(
        &self,
        user_id: &str,
        session_id: &str,
    ) -> Result<SessionOutcome, ServiceError> {
        let events = self.storage.fetch_events(user_id, session_id).await?;

        match reduce_session(&events, &self.policy) {
            SessionReduction::NoCandidate => {
                tracing::debug!(user_id, session_id, events = events.len(), "no final term");
                Ok(SessionOutcome::NoOp(NoOpReason::NoCandidate))
            },
            SessionReduction::NotMeaningful { term } => {
                tracing::debug!(user_id, session_id, term = %term, "final term not meaningful");
                Ok(SessionOutcome::NoOp(NoOpReason::NotMeaningful { term }))
            },
            SessionReduction::Accepted { term } => {
                let summary = self.reconcile_normalized(user_id, &term).await?;
                Ok(SessionOutcome::Recorded(summary))
            },
        }
    }

    /// Reconcile a pre-selected term directly, skipping the reducer and the
    /// meaningfulness gate. The term is normalized first.
    pub async fn reconcile(&self, user_id: &str, term: &str) -> Result<TermSummary, ServiceError> {
        if user_id.trim().is_empty() {
            return Err(ServiceError::InvalidInput("user_id can't be blank".to_owned()));
        }
        let term = normalize_term(term)
            .ok_or_else(|| ServiceError::InvalidInput("term can't be blank".to_owned()))?;
        self.reconcile_normalized(user_id, &term).await
    }

    async fn reconcile_normalized(
        &self,
        user_id: &str,
        term: &str,
    ) -> Result<TermSummary, ServiceError> {
        let plan = {
            let _guard = self.locks.lock(user_id).await;
            self.storage.reconcile_term(user_id, term, Utc::now()).await
        };
        self.locks.release(user_id).await;
        let plan = plan?;
        tracing::info!(
            user_id,
            term,
            count = plan.summary.count,
            action = ?plan.action,
            retracted = plan.retracted.len(),
            "term reconciled"
        );
        Ok(plan.summary)
    }
}
