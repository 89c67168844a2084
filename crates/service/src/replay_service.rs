//! Batch finalization of every session already in the event log.
//!
//! Sessions of one user are replayed one at a time, oldest first, because a
//! later session may retract the term of an earlier one. Different users run
//! concurrently.

use std::collections::BTreeMap;
use std::sync::Arc;

use futures_util::stream::{self, StreamExt as _};
use serde::{Deserialize, Serialize};
use termsift_core::SessionKey;
use termsift_storage::StorageBackend;
use termsift_storage::traits::{EventLog, TermStore};

use crate::ServiceError;
use crate::finalize_service::{FinalizeService, NoOpReason, SessionOutcome};
use crate::user_locks::UserLocks;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayFailure {
    pub user_id: String,
    pub session_id: String,
    pub error: String,
    pub retryable: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayReport {
    pub sessions: usize,
    pub recorded: usize,
    pub no_candidate: usize,
    pub not_meaningful: usize,
    pub failed: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<ReplayFailure>,
}

impl ReplayReport {
    fn tally(&mut self, key: SessionKey, result: Result<SessionOutcome, ServiceError>) {
        self.sessions += 1;
        match result {
            Ok(SessionOutcome::Recorded(_)) => self.recorded += 1,
            Ok(SessionOutcome::NoOp(NoOpReason::NoCandidate)) => self.no_candidate += 1,
            Ok(SessionOutcome::NoOp(NoOpReason::NotMeaningful { .. })) => self.not_meaningful += 1,
            Err(e) => {
                self.failed += 1;
                self.failures.push(ReplayFailure {
                    user_id: key.user_id,
                    session_id: key.session_id,
                    retryable: e.is_retryable(),
                    error: e.to_string(),
                });
            },
        }
    }
}

pub struct ReplayService<S = StorageBackend> {
    storage: Arc<S>,
    finalize: Arc<FinalizeService<S>>,
    locks: Arc<UserLocks>,
    concurrency: usize,
}

impl<S> ReplayService<S>
where
    S: EventLog + TermStore,
{
    #[must_use]
    pub fn new(
        storage: Arc<S>,
        finalize: Arc<FinalizeService<S>>,
        locks: Arc<UserLocks>,
        concurrency: usize,
    ) -> Self {
        Self { storage, finalize, locks, concurrency: concurrency.max(1) }
    }

    /// Finalize every stored session, optionally for one user only.
    ///
    /// Counts are added on top of the existing summaries, so replaying a log
    /// whose sessions were already finalized counts them twice. A failing
    /// session is reported and the rest still run.
    pub async fn replay(&self, user_id: Option<&str>) -> Result<ReplayReport, ServiceError> {
        let sessions = self.storage.list_sessions(user_id).await?;

        let mut by_user: BTreeMap<String, Vec<SessionKey>> = BTreeMap::new();
        for key in sessions {
            by_user.entry(key.user_id.clone()).or_default().push(key);
        }
        let users = by_user.len();

        let results: Vec<Vec<(SessionKey, Result<SessionOutcome, ServiceError>)>> =
            stream::iter(by_user.into_values().map(|keys| self.replay_user(keys)))
                .buffer_unordered(self.concurrency)
                .collect()
                .await;

        let mut report = ReplayReport::default();
        for (key, result) in results.into_iter().flatten() {
            report.tally(key, result);
        }

        let released = self.locks.cleanup_unused().await;
        tracing::info!(
            users,
            sessions = report.sessions,
            recorded = report.recorded,
            no_candidate = report.no_candidate,
            not_meaningful = report.not_meaningful,
            failed = report.failed,
            released_locks = released,
            "replay finished"
        );
        Ok(report)
    }

    async fn replay_user(
        &self,
        keys: Vec<SessionKey>,
    ) -> Vec<(SessionKey, Result<SessionOutcome, ServiceError>)> {
        let mut results = Vec::with_capacity(keys.len());
        for key in keys {
            let result = self.finalize.process_session(&key.user_id, &key.session_id).await;
            if let Err(ref e) = result {
                tracing::warn!(session = %key, error = %e, "session replay failed");
            }
            results.push((key, result));
        }
        results
    }
}
