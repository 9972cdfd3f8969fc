//! # statecast
//!
//! **Statecast** is a small publish/subscribe core for Rust.
//!
//! A [`Subject`] holds one validated integral value. Every accepted change is
//! delivered synchronously, in registration order, to the [`Subscribe`]
//! implementations registered on it. A failing or panicking subscriber never
//! stops delivery to the others; its failure goes to the subject's [`Bus`].
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   caller ──► set_state(input)
//!                 │
//!                 ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Subject                                                          │
//! │  - validate (StateInput → i64, SubjectConfig bounds)              │
//! │  - commit under the data lock                                     │
//! │  - Registry (ordered, weak, duplicate-free)                       │
//! │  - pending queue (re-entrant updates)                             │
//! └──────┬──────────────────────────────────────────────────┬─────────┘
//!        │ snapshot, in order                               │ diagnostics
//!        ▼                                                  ▼
//!   ┌──────────┐   ┌──────────┐   ┌──────────┐      ┌────────────────┐
//!   │  sub #1  │──►│  sub #2  │──►│  sub #3  │      │ Bus (broadcast)│
//!   │ .react() │   │ .react() │   │ .react() │      │  error sink    │
//!   └──────────┘   └────┬─────┘   └──────────┘      └────────────────┘
//!                       │ Err / panic ──────────────────────►│
//! ```
//!
//! ### Lifecycle
//! ```text
//! Phase::Unchanged ── set_state/notify ──► Phase::Notifying
//!        ▲                                       │ pass over snapshot
//!        │                                       │ drain queued updates (one pass each)
//!        └───────────────────────────────────────┘
//! ```
//!
//! ## Features
//! | Area              | Description                                                  | Key types / traits                       |
//! |-------------------|--------------------------------------------------------------|------------------------------------------|
//! | **Subject**       | Validated state with ordered, synchronous fan-out.           | [`Subject`], [`SubjectBuilder`], [`Phase`] |
//! | **Subscriber API**| React to state changes.                                      | [`Subscribe`], [`Registry`]              |
//! | **Diagnostics**   | Error sink for failures, duplicates and overflow.            | [`Bus`], [`Event`], [`EventKind`]        |
//! | **Errors**        | Typed errors for validation, membership and reactions.       | [`ValidationError`], [`NotFoundError`], [`ReactionError`] |
//! | **Configuration** | Bounds and limits per subject.                               | [`SubjectConfig`]                        |
//! | **Built-ins**     | Radix formatters and an event printer.                       | [`HexFormatter`], [`BinaryFormatter`], [`LogWriter`] |
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use statecast::{BinaryFormatter, HexFormatter, Subject};
//!
//! let subject = Subject::new("DefaultFormatter", 0);
//!
//! let hex = Arc::new(HexFormatter::new());
//! subject.register(&hex);
//! subject.set_state(3).unwrap();
//!
//! let bin = Arc::new(BinaryFormatter::new());
//! subject.register(&bin);
//! subject.set_state(5).unwrap();
//!
//! assert_eq!(hex.history(), vec!["0x3", "0x5"]);
//! assert_eq!(bin.history(), vec!["0b101"]);
//! assert!(subject.set_state("five").is_err());
//! assert_eq!(subject.get_state(), 5);
//! ```
mod core;
mod error;
mod events;
mod subscribers;

// ---- Public re-exports ----

pub use core::{Phase, StateInput, Subject, SubjectBuilder, SubjectConfig};
pub use error::{NotFoundError, ReactionError, ValidationError};
pub use events::{Bus, Event, EventKind};
pub use subscribers::{
    BinaryFormatter, HexFormatter, LogWriter, Registration, Registry, Snapshot, Subscribe, to_binary,
    to_hex,
};
