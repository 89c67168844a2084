//! Session reducer: picks the one term that stands for the user's finished intent.
//!
//! Input is a single session's log, already ordered by `created_at` with ties
//! in insertion order. The reducer never reorders or mutates it.

use serde::{Deserialize, Serialize};

use crate::event::SearchEvent;
use crate::normalize::{normalize_term, MeaningfulnessPolicy};

/// The event whose text represents the session.
///
/// The last finalize event wins outright, even over keystrokes recorded after
/// it. Without one, the last keystroke stands in.
#[must_use]
pub fn select_final_event(events: &[SearchEvent]) -> Option<&SearchEvent> {
    events
        .iter()
        .rev()
        .find(|e| e.is_finalize())
        .or_else(|| events.iter().rev().find(|e| e.is_keystroke()))
}

/// Normalized text of [`select_final_event`], or `None` if absent or blank.
#[must_use]
pub fn select_final_term(events: &[SearchEvent]) -> Option<String> {
    select_final_event(events).and_then(|e| normalize_term(&e.raw_value))
}

/// Outcome of reducing a session log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SessionReduction {
    /// Empty log, or the final text was blank.
    NoCandidate,
    /// A term was found but the meaningfulness gate rejected it.
    NotMeaningful { term: String },
    Accepted { term: String },
}

impl SessionReduction {
    #[must_use]
    pub fn term(&self) -> Option<&str> {
        match self {
            Self::NoCandidate => None,
            Self::NotMeaningful { term } | Self::Accepted { term } => Some(term),
        }
    }

    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

/// Selects, normalizes and gates the final term of a session.
#[must_use]
pub fn reduce_session(events: &[SearchEvent], policy: &MeaningfulnessPolicy) -> SessionReduction {
    let Some(term) = select_final_term(events) else {
        return SessionReduction::NoCandidate;
    };
    if policy.is_meaningful(events, &term) {
        SessionReduction::Accepted { term }
    } else {
        SessionReduction::NotMeaningful { term }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventKind::{Finalize, Keystroke};
    use crate::test_support::{keystrokes, session};

    fn reduce(events: &[SearchEvent]) -> SessionReduction {
        reduce_session(events, &MeaningfulnessPolicy::default())
    }

    #[test]
    fn finalize_wins_over_later_keystrokes() {
        let events = session(&[
            (Keystroke, "h"),
            (Finalize, "Hello World"),
            (Keystroke, "hello world and more"),
        ]);
        assert_eq!(select_final_term(&events).as_deref(), Some("hello world"));
    }

    #[test]
    fn last_finalize_wins_over_earlier_finalize() {
        let events = session(&[(Finalize, "rust"), (Keystroke, "rust l"), (Finalize, "rust lang")]);
        assert_eq!(select_final_term(&events).as_deref(), Some("rust lang"));
    }

    #[test]
    fn last_keystroke_without_finalize() {
        let events = keystrokes(&["h", "he", "hello"]);
        assert_eq!(select_final_term(&events).as_deref(), Some("hello"));
    }

    #[test]
    fn empty_log_has_no_candidate() {
        assert_eq!(select_final_term(&[]), None);
        assert_eq!(reduce(&[]), SessionReduction::NoCandidate);
    }

    #[test]
    fn blank_finalize_has_no_candidate_even_with_keystrokes() {
        let events = session(&[(Keystroke, "he"), (Keystroke, "hel"), (Finalize, "   ")]);
        assert_eq!(reduce(&events), SessionReduction::NoCandidate);
    }

    #[test]
    fn scenario_typing_then_finalize() {
        let events = session(&[(Keystroke, "h"), (Keystroke, "he"), (Finalize, "hello world")]);
        assert_eq!(reduce(&events), SessionReduction::Accepted { term: "hello world".to_owned() });
    }

    #[test]
    fn scenario_keystrokes_only() {
        let events = keystrokes(&["h", "he", "hello"]);
        assert_eq!(reduce(&events), SessionReduction::Accepted { term: "hello".to_owned() });
    }

    #[test]
    fn scenario_case_folded() {
        let events = session(&[(Finalize, "  RUBY ON RAILS ")]);
        assert_eq!(reduce(&events).term(), Some("ruby on rails"));
    }

    #[test]
    fn noise_is_not_meaningful() {
        let events = session(&[(Finalize, "a")]);
        let reduction = reduce(&events);
        assert_eq!(reduction, SessionReduction::NotMeaningful { term: "a".to_owned() });
        assert!(!reduction.is_accepted());
    }
}
