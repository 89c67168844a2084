//! Engine configuration read from `TERMSIFT_*` environment variables.

use termsift_core::{
    AnalyticsOptions, DEFAULT_ACTIVITY_WINDOW_DAYS, DEFAULT_ANALYTICS_LIMIT,
    DEFAULT_MIN_KEYSTROKES, DEFAULT_MIN_TERM_LEN, DEFAULT_REPLAY_CONCURRENCY,
    DEFAULT_SUBSTANTIAL_TERM_LEN, MAX_QUERY_LIMIT, MeaningfulnessPolicy, RepeatRule,
    env_parse_with_default,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub policy: MeaningfulnessPolicy,
    pub analytics: AnalyticsOptions,
    pub replay_concurrency: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            policy: MeaningfulnessPolicy::default(),
            analytics: AnalyticsOptions::default(),
            replay_concurrency: DEFAULT_REPLAY_CONCURRENCY,
        }
    }
}

impl EngineConfig {
    #[must_use]
    pub fn from_env() -> Self {
        let policy = MeaningfulnessPolicy {
            min_term_len: env_parse_with_default("TERMSIFT_MIN_TERM_LEN", DEFAULT_MIN_TERM_LEN),
            substantial_term_len: env_parse_with_default(
                "TERMSIFT_SUBSTANTIAL_TERM_LEN",
                DEFAULT_SUBSTANTIAL_TERM_LEN,
            ),
            min_keystrokes: env_parse_with_default("TERMSIFT_MIN_KEYSTROKES", DEFAULT_MIN_KEYSTROKES),
            repeat_rule: env_parse_with_default("TERMSIFT_REPEAT_RULE", RepeatRule::Strict),
        };
        if policy.repeat_rule != RepeatRule::Strict {
            tracing::warn!(rule = %policy.repeat_rule, "non-strict repeated-character rule in effect");
        }

        let analytics = AnalyticsOptions {
            top_limit: env_parse_with_default("TERMSIFT_TOP_LIMIT", DEFAULT_ANALYTICS_LIMIT)
                .min(MAX_QUERY_LIMIT),
            recent_limit: env_parse_with_default("TERMSIFT_RECENT_LIMIT", DEFAULT_ANALYTICS_LIMIT)
                .min(MAX_QUERY_LIMIT),
            activity_window_days: env_parse_with_default(
                "TERMSIFT_ACTIVITY_WINDOW_DAYS",
                DEFAULT_ACTIVITY_WINDOW_DAYS,
            )
            .max(0),
        };

        let replay_concurrency =
            env_parse_with_default("TERMSIFT_REPLAY_CONCURRENCY", DEFAULT_REPLAY_CONCURRENCY).max(1);

        Self { policy, analytics, replay_concurrency }
    }
}
