use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How often one user finalized one normalized term.
///
/// At most one row exists per `(user_id, term)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TermSummary {
    pub user_id: String,
    pub term: String,
    pub count: u32,
    pub last_seen_at: DateTime<Utc>,
}

impl TermSummary {
    /// First acceptance of a term.
    #[must_use]
    pub fn first_seen(user_id: impl Into<String>, term: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self { user_id: user_id.into(), term: term.into(), count: 1, last_seen_at: at }
    }

    /// `true` when this row's term is a proper prefix of `term`.
    #[must_use]
    pub fn is_superseded_by(&self, term: &str) -> bool {
        term.len() > self.term.len() && term.starts_with(self.term.as_str())
    }

    /// Copy with `count + 1` and a fresh `last_seen_at`.
    #[must_use]
    pub fn seen_again(&self, at: DateTime<Utc>) -> Self {
        Self {
            user_id: self.user_id.clone(),
            term: self.term.clone(),
            count: self.count.saturating_add(1),
            last_seen_at: at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::base_time;

    #[test]
    fn proper_prefix_is_superseded() {
        let he = TermSummary::first_seen("u", "he", base_time());
        assert!(he.is_superseded_by("hello"));
        assert!(!he.is_superseded_by("he"));
        assert!(!he.is_superseded_by("h"));
        assert!(!he.is_superseded_by("the"));
    }

    #[test]
    fn seen_again_bumps_count_and_time() {
        let first = TermSummary::first_seen("u", "rails", base_time());
        let later = base_time() + chrono::Duration::minutes(5);
        let again = first.seen_again(later);
        assert_eq!(again.count, 2);
        assert_eq!(again.last_seen_at, later);
        assert_eq!(again.term, "rails");
    }
}
