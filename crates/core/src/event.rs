//! Search events: one keystroke snapshot or explicit finalize signal each.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// What produced a [`SearchEvent`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// In-progress snapshot of the search box.
    Keystroke,
    /// The user considers the current text complete (submit, blur, debounce).
    Finalize,
}

impl EventKind {
    pub const ALL_VARIANTS_STR: &'static str = "keystroke|finalize";

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match *self {
            Self::Keystroke => "keystroke",
            Self::Finalize => "finalize",
        }
    }
}

impl Display for EventKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "keystroke" => Ok(Self::Keystroke),
            "finalize" => Ok(Self::Finalize),
            other => Err(CoreError::InvalidInput(format!(
                "unknown event kind {other:?}, expected {}",
                Self::ALL_VARIANTS_STR
            ))),
        }
    }
}

/// A stored, immutable search event.
///
/// `id` is assigned by the event log in insertion order and breaks ties
/// between events sharing a `created_at`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchEvent {
    pub id: i64,
    pub user_id: String,
    pub session_id: String,
    /// Full text of the search box at the time of the event, not a diff.
    pub raw_value: String,
    pub kind: EventKind,
    pub created_at: DateTime<Utc>,
}

impl SearchEvent {
    #[must_use]
    pub const fn is_finalize(&self) -> bool {
        matches!(self.kind, EventKind::Finalize)
    }

    #[must_use]
    pub const fn is_keystroke(&self) -> bool {
        matches!(self.kind, EventKind::Keystroke)
    }
}

/// Identity of one typing session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionKey {
    pub user_id: String,
    pub session_id: String,
}

impl SessionKey {
    #[must_use]
    pub fn new(user_id: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self { user_id: user_id.into(), session_id: session_id.into() }
    }
}

impl Display for SessionKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}/{}", self.user_id, self.session_id)
    }
}

/// An event that has not been appended to the log yet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewSearchEvent {
    pub user_id: String,
    pub session_id: String,
    pub raw_value: String,
    pub kind: EventKind,
    /// Defaults to the append time when `None`.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl NewSearchEvent {
    #[must_use]
    pub fn new(
        user_id: impl Into<String>,
        session_id: impl Into<String>,
        raw_value: impl Into<String>,
        kind: EventKind,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            session_id: session_id.into(),
            raw_value: raw_value.into(),
            kind,
            created_at: None,
        }
    }

    #[must_use]
    pub fn keystroke(
        user_id: impl Into<String>,
        session_id: impl Into<String>,
        raw_value: impl Into<String>,
    ) -> Self {
        Self::new(user_id, session_id, raw_value, EventKind::Keystroke)
    }

    #[must_use]
    pub fn finalize(
        user_id: impl Into<String>,
        session_id: impl Into<String>,
        raw_value: impl Into<String>,
    ) -> Self {
        Self::new(user_id, session_id, raw_value, EventKind::Finalize)
    }

    #[must_use]
    pub const fn at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Rejects blank identifiers and blank text.
    ///
    /// # Errors
    /// Returns `CoreError::InvalidInput` naming every blank field.
    pub fn validate(&self) -> Result<(), CoreError> {
        let blank: Vec<&str> = [
            ("user_id", &self.user_id),
            ("session_id", &self.session_id),
            ("raw_value", &self.raw_value),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

        if blank.is_empty() {
            Ok(())
        } else {
            Err(CoreError::InvalidInput(format!("{} can't be blank", blank.join(", "))))
        }
    }
}
