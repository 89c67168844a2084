use std::sync::Arc;

use chrono::Utc;
use termsift_core::{AnalyticsOptions, TermSummary, UserAnalytics, recent_terms, top_terms};
use termsift_storage::StorageBackend;
use termsift_storage::traits::TermStore;

use crate::ServiceError;

/// Read-only views over a user's term summaries.
pub struct AnalyticsService<S = StorageBackend> {
    storage: Arc<S>,
    options: AnalyticsOptions,
}

impl<S: TermStore> AnalyticsService<S> {
    #[must_use]
    pub const fn new(storage: Arc<S>, options: AnalyticsOptions) -> Self {
        Self { storage, options }
    }

    pub async fn user_analytics(&self, user_id: &str) -> Result<UserAnalytics, ServiceError> {
        let summaries = self.storage.find_by_user(user_id).await?;
        Ok(UserAnalytics::from_summaries(user_id, &summaries, &self.options, Utc::now()))
    }

    pub async fn top_terms(
        &self,
        user_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<TermSummary>, ServiceError> {
        let summaries = self.storage.find_by_user(user_id).await?;
        Ok(top_terms(&summaries, limit.unwrap_or(self.options.top_limit)))
    }

    pub async fn recent_terms(
        &self,
        user_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<TermSummary>, ServiceError> {
        let summaries = self.storage.find_by_user(user_id).await?;
        Ok(recent_terms(&summaries, limit.unwrap_or(self.options.recent_limit)))
    }
}
