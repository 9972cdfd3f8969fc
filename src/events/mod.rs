//! Diagnostic events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** subjects use as
//! their error sink.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `Subject` (state commits, validation, membership, delivery failures).
//! - **Consumers**: whoever calls [`Bus::subscribe`]; the crate itself never reads the bus.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
