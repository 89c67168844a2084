//! Service layer for termsift
//!
//! Orchestrates session finalization over the storage traits: per-user
//! serialization, event recording, analytics and batch replay.

#![allow(missing_docs, reason = "Internal crate with self-explanatory API")]
#![allow(clippy::missing_errors_doc, reason = "Errors are self-explanatory from Result types")]
#![allow(missing_debug_implementations, reason = "Internal types")]
#![allow(clippy::missing_docs_in_private_items, reason = "Internal crate")]
#![allow(clippy::implicit_return, reason = "Implicit return is idiomatic Rust")]
#![allow(clippy::question_mark_used, reason = "? operator is idiomatic Rust")]
#![allow(clippy::min_ident_chars, reason = "Short error vars are idiomatic")]

mod analytics_service;
mod config;
mod engine;
mod error;
mod event_service;
mod finalize_service;
mod replay_service;
#[cfg(test)]
mod tests;
mod user_locks;

pub use analytics_service::AnalyticsService;
pub use config::EngineConfig;
pub use engine::Engine;
pub use error::ServiceError;
pub use event_service::{EventService, RecordedEvent};
pub use finalize_service::{FinalizeService, NoOpReason, SessionOutcome};
pub use replay_service::{ReplayFailure, ReplayReport, ReplayService};
pub use user_locks::UserLocks;
