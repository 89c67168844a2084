use std::sync::Arc;

use serde::{Deserialize, Serialize};
use termsift_core::{NewSearchEvent, SearchEvent};
use termsift_storage::StorageBackend;
use termsift_storage::traits::{EventLog, TermStore};

use crate::ServiceError;
use crate::finalize_service::{FinalizeService, SessionOutcome};

/// A stored event plus, for finalize events, what finalization did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedEvent {
    pub event: SearchEvent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<SessionOutcome>,
}

pub struct EventService<S = StorageBackend> {
    storage: Arc<S>,
    finalize: Arc<FinalizeService<S>>,
}

impl<S> EventService<S>
where
    S: EventLog + TermStore,
{
    #[must_use]
    pub const fn new(storage: Arc<S>, finalize: Arc<FinalizeService<S>>) -> Self {
        Self { storage, finalize }
    }

    /// Append one event. A finalize event closes the session and runs it
    /// through finalization before returning.
    ///
    /// If finalization fails the event stays in the log; the session can be
    /// finalized again later.
    pub async fn record_event(&self, event: NewSearchEvent) -> Result<RecordedEvent, ServiceError> {
        event.validate()?;
        let stored = self.storage.append_event(&event).await?;
        tracing::debug!(
            user_id = %stored.user_id,
            session_id = %stored.session_id,
            kind = %stored.kind,
            id = stored.id,
            "search event recorded"
        );

        if !stored.is_finalize() {
            return Ok(RecordedEvent { event: stored, outcome: None });
        }

        let outcome = self
            .finalize
            .process_session(&stored.user_id, &stored.session_id)
            .await
            .inspect_err(|e| {
                tracing::warn!(
                    user_id = %stored.user_id,
                    session_id = %stored.session_id,
                    error = %e,
                    "finalization after finalize event failed"
                );
            })?;
        Ok(RecordedEvent { event: stored, outcome: Some(outcome) })
    }

    pub async fn events(
        &self,
        user_id: &str,
        session_id: &str,
    ) -> Result<Vec<SearchEvent>, ServiceError> {
        Ok(self.storage.fetch_events(user_id, session_id).await?)
    }
}
