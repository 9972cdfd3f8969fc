//! # Subscribers of a subject.
//!
//! This module provides the [`Subscribe`] trait, the [`Registry`] that orders
//! subscribers inside a subject, and built-in implementations.
//!
//! ## Architecture
//! ```text
//! Subject::set_state ──► Registry::snapshot() ──► Subscribe::react(&Subject)
//!                                                      │
//!                                       ┌──────────────┼──────────────┐
//!                                       ▼              ▼              ▼
//!                                 HexFormatter  BinaryFormatter    Custom ...
//! ```
//!
//! ## Subscriber types
//! - **Passive subscribers** - read the subject and produce a side effect (formatters)
//! - **Active subscribers** - change the subject again from their reaction
//!   (the update is queued behind the in-flight pass)
//!
//! ## Implementing custom subscribers
//! ```no_run
//! use statecast::{ReactionError, Subject, Subscribe};
//!
//! struct Threshold(i64);
//!
//! impl Subscribe for Threshold {
//!     fn react(&self, subject: &Subject) -> Result<(), ReactionError> {
//!         if subject.get_state() > self.0 {
//!             return Err(ReactionError::fail("threshold exceeded"));
//!         }
//!         Ok(())
//!     }
//! }
//! ```

mod embedded;
mod registry;
mod subscriber;

pub use embedded::{BinaryFormatter, HexFormatter, LogWriter, to_binary, to_hex};
pub use registry::{Registration, Registry, Snapshot};
pub use subscriber::Subscribe;
