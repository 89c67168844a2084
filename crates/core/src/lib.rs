//! Core types and logic for termsift
//!
//! Domain types shared by every other crate, plus the pure parts of session
//! finalization: term selection, the meaningfulness gate and reconcile
//! planning. Nothing here touches I/O.

mod aggregate;
mod analytics;
pub mod constants;
mod env_config;
mod error;
mod event;
mod normalize;
mod reducer;
mod summary;
#[cfg(test)]
mod test_support;

pub use aggregate::*;
pub use analytics::*;
pub use constants::*;
pub use env_config::*;
pub use error::*;
pub use event::*;
pub use normalize::*;
pub use reducer::*;
pub use summary::*;
