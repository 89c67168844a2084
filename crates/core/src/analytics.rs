//! Per-user search analytics derived from term summaries.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_ACTIVITY_WINDOW_DAYS, DEFAULT_ANALYTICS_LIMIT, MAX_QUERY_LIMIT};
use crate::summary::TermSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsOptions {
    pub top_limit: usize,
    pub recent_limit: usize,
    pub activity_window_days: i64,
}

impl Default for AnalyticsOptions {
    fn default() -> Self {
        Self {
            top_limit: DEFAULT_ANALYTICS_LIMIT,
            recent_limit: DEFAULT_ANALYTICS_LIMIT,
            activity_window_days: DEFAULT_ACTIVITY_WINDOW_DAYS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAnalytics {
    pub user_id: String,
    pub top_searches: Vec<TermSummary>,
    pub recent_searches: Vec<TermSummary>,
    /// Sum of all counts.
    pub total_searches: u64,
    pub unique_terms: usize,
    /// Rows seen inside the activity window, oldest first.
    pub recent_activity: Vec<TermSummary>,
}

/// Highest counts first; ties go to the most recently seen, then alphabetical.
#[must_use]
pub fn top_terms(summaries: &[TermSummary], limit: usize) -> Vec<TermSummary> {
    let mut rows = summaries.to_vec();
    rows.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| b.last_seen_at.cmp(&a.last_seen_at))
            .then_with(|| a.term.cmp(&b.term))
    });
    rows.truncate(limit.min(MAX_QUERY_LIMIT));
    rows
}

#[must_use]
pub fn recent_terms(summaries: &[TermSummary], limit: usize) -> Vec<TermSummary> {
    let mut rows = summaries.to_vec();
    rows.sort_by(|a, b| b.last_seen_at.cmp(&a.last_seen_at).then_with(|| a.term.cmp(&b.term)));
    rows.truncate(limit.min(MAX_QUERY_LIMIT));
    rows
}

impl UserAnalytics {
    #[must_use]
    pub fn from_summaries(
        user_id: &str,
        summaries: &[TermSummary],
        options: &AnalyticsOptions,
        now: DateTime<Utc>,
    ) -> Self {
        let since = now - Duration::days(options.activity_window_days.max(0));
        let mut recent_activity: Vec<TermSummary> =
            summaries.iter().filter(|s| s.last_seen_at >= since).cloned().collect();
        recent_activity.sort_by(|a, b| a.last_seen_at.cmp(&b.last_seen_at));

        Self {
            user_id: user_id.to_owned(),
            top_searches: top_terms(summaries, options.top_limit),
            recent_searches: recent_terms(summaries, options.recent_limit),
            total_searches: summaries.iter().map(|s| u64::from(s.count)).sum(),
            unique_terms: summaries.len(),
            recent_activity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::base_time;

    fn row(term: &str, count: u32, days_ago: i64) -> TermSummary {
        TermSummary {
            user_id: "user-1".to_owned(),
            term: term.to_owned(),
            count,
            last_seen_at: base_time() - Duration::days(days_ago),
        }
    }

    fn terms(rows: &[TermSummary]) -> Vec<&str> {
        rows.iter().map(|r| r.term.as_str()).collect()
    }

    #[test]
    fn top_orders_by_count_then_recency() {
        let rows = vec![row("rust", 2, 3), row("rails", 5, 10), row("ruby", 2, 1)];
        assert_eq!(terms(&top_terms(&rows, 10)), vec!["rails", "ruby", "rust"]);
        assert_eq!(terms(&top_terms(&rows, 1)), vec!["rails"]);
    }

    #[test]
    fn recent_orders_by_last_seen() {
        let rows = vec![row("rust", 2, 3), row("rails", 5, 10), row("ruby", 2, 1)];
        assert_eq!(terms(&recent_terms(&rows, 2)), vec!["ruby", "rust"]);
    }

    #[test]
    fn analytics_totals_and_activity_window() {
        let rows = vec![row("rust", 2, 3), row("rails", 5, 10), row("ruby", 1, 1)];
        let analytics =
            UserAnalytics::from_summaries("user-1", &rows, &AnalyticsOptions::default(), base_time());
        assert_eq!(analytics.total_searches, 8);
        assert_eq!(analytics.unique_terms, 3);
        assert_eq!(terms(&analytics.recent_activity), vec!["rust", "ruby"]);
    }

    #[test]
    fn analytics_for_unknown_user_is_empty() {
        let analytics =
            UserAnalytics::from_summaries("nobody", &[], &AnalyticsOptions::default(), base_time());
        assert_eq!(analytics.total_searches, 0);
        assert!(analytics.top_searches.is_empty());
        assert!(analytics.recent_activity.is_empty());
    }
}
