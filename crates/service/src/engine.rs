use std::sync::Arc;

use termsift_storage::StorageBackend;
use termsift_storage::traits::{EventLog, TermStore};

use crate::analytics_service::AnalyticsService;
use crate::config::EngineConfig;
use crate::event_service::EventService;
use crate::finalize_service::FinalizeService;
use crate::replay_service::ReplayService;
use crate::user_locks::UserLocks;

/// Every service wired to one store and one shared set of user locks.
pub struct Engine<S = StorageBackend> {
    pub finalize: Arc<FinalizeService<S>>,
    pub events: EventService<S>,
    pub analytics: AnalyticsService<S>,
    pub replay: ReplayService<S>,
}

impl<S> Engine<S>
where
    S: EventLog + TermStore,
{
    #[must_use]
    pub fn new(storage: Arc<S>, config: EngineConfig) -> Self {
        let locks = Arc::new(UserLocks::new());
        let finalize =
            Arc::new(FinalizeService::new(Arc::clone(&storage), Arc::clone(&locks), config.policy));
        Self {
            events: EventService::new(Arc::clone(&storage), Arc::clone(&finalize)),
            analytics: AnalyticsService::new(Arc::clone(&storage), config.analytics),
            replay: ReplayService::new(
                storage,
                Arc::clone(&finalize),
                locks,
                config.replay_concurrency,
            ),
            finalize,
        }
    }
}
