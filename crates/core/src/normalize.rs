//! Term normalization and the meaningfulness gate.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MIN_KEYSTROKES, DEFAULT_MIN_TERM_LEN, DEFAULT_SUBSTANTIAL_TERM_LEN};
use crate::error::CoreError;
use crate::event::SearchEvent;

/// Trims and lowercases a raw search box value.
///
/// Returns `None` when nothing is left.
#[must_use]
pub fn normalize_term(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_lowercase())
}

/// `true` when the term consists of a single character repeated.
#[must_use]
pub fn is_single_repeated_char(term: &str) -> bool {
    let mut chars = term.chars();
    match chars.next() {
        Some(first) => chars.all(|c| c == first),
        None => false,
    }
}

/// When an all-identical-characters term ("aaaa") is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RepeatRule {
    /// Reject at any length.
    #[default]
    Strict,
    /// Reject only when the term is longer than the given number of characters.
    LongerThan(usize),
}

impl RepeatRule {
    #[must_use]
    pub fn rejects(&self, term: &str, char_len: usize) -> bool {
        if !is_single_repeated_char(term) {
            return false;
        }
        match *self {
            Self::Strict => true,
            Self::LongerThan(n) => char_len > n,
        }
    }
}

impl Display for RepeatRule {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match *self {
            Self::Strict => f.write_str("strict"),
            Self::LongerThan(n) => write!(f, "longer-than:{n}"),
        }
    }
}

impl FromStr for RepeatRule {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        if s == "strict" {
            return Ok(Self::Strict);
        }
        s.strip_prefix("longer-than:")
            .and_then(|n| n.trim().parse().ok())
            .map(Self::LongerThan)
            .ok_or_else(|| {
                CoreError::InvalidInput(format!(
                    "invalid repeat rule {s:?}, expected strict or longer-than:N"
                ))
            })
    }
}

/// Thresholds of the heuristic that separates finished searches from keystroke noise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeaningfulnessPolicy {
    pub min_term_len: usize,
    pub substantial_term_len: usize,
    pub min_keystrokes: usize,
    pub repeat_rule: RepeatRule,
}

impl Default for MeaningfulnessPolicy {
    fn default() -> Self {
        Self {
            min_term_len: DEFAULT_MIN_TERM_LEN,
            substantial_term_len: DEFAULT_SUBSTANTIAL_TERM_LEN,
            min_keystrokes: DEFAULT_MIN_KEYSTROKES,
            repeat_rule: RepeatRule::Strict,
        }
    }
}

impl MeaningfulnessPolicy {
    /// Judges a normalized term against the session it came from.
    ///
    /// Order matters: the length floor and repeat rule reject before typing
    /// activity or term length can accept.
    #[must_use]
    pub fn is_meaningful(&self, events: &[SearchEvent], term: &str) -> bool {
        let len = term.chars().count();
        if len < self.min_term_len {
            return false;
        }
        if self.repeat_rule.rejects(term, len) {
            return false;
        }
        let keystrokes = events.iter().filter(|e| e.is_keystroke()).count();
        if keystrokes >= self.min_keystrokes {
            return true;
        }
        len >= self.substantial_term_len
    }
}

/// [`MeaningfulnessPolicy::is_meaningful`] with the default thresholds.
#[must_use]
pub fn is_meaningful(events: &[SearchEvent], term: &str) -> bool {
    MeaningfulnessPolicy::default().is_meaningful(events, term)
}
