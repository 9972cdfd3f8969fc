//! # Diagnostic events emitted by subjects.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **State events**: committed changes and rejected values
//! - **Membership events**: registration, duplicates, removals
//! - **Delivery events**: reaction failures, queued re-entrant updates, overflow
//!
//! The [`Event`] struct carries additional metadata such as timestamps, subject
//! identity, subscriber name, value and reason.
//!
//! ## Ordering guarantees
//! Each event has a process-wide sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events from several subjects are merged.
//!
//! ## Example
//! ```rust
//! use statecast::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::ReactionFailed)
//!     .with_subject("prices")
//!     .with_subscriber("hex")
//!     .with_reason("boom");
//!
//! assert_eq!(ev.kind, EventKind::ReactionFailed);
//! assert_eq!(ev.subject.as_deref(), Some("prices"));
//! assert_eq!(ev.reason.as_deref(), Some("boom"));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of diagnostic events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === State events ===
    /// A value was committed; a notification pass follows.
    ///
    /// Sets:
    /// - `subject`: subject identity
    /// - `value`: the committed value
    StateChanged,

    /// `set_state` rejected a value; state unchanged, nothing delivered.
    ///
    /// Sets:
    /// - `subject`: subject identity
    /// - `reason`: validation error label
    ValidationRejected,

    // === Membership events ===
    /// Subscriber appended to the registry.
    ///
    /// Sets:
    /// - `subject`: subject identity
    /// - `subscriber`: subscriber name
    SubscriberRegistered,

    /// Subscriber was already present; registration was a no-op.
    ///
    /// Sets:
    /// - `subject`: subject identity
    /// - `subscriber`: subscriber name
    DuplicateRegistration,

    /// Subscriber removed from the registry.
    ///
    /// Sets:
    /// - `subject`: subject identity
    /// - `subscriber`: subscriber name
    SubscriberDeregistered,

    /// Deregistration of a subscriber that was not present.
    ///
    /// Sets:
    /// - `subject`: subject identity
    /// - `subscriber`: subscriber name
    SubscriberNotFound,

    // === Delivery events ===
    /// A reaction returned an error. Delivery continued.
    ///
    /// Sets:
    /// - `subject`, `subscriber`, `value` (value being delivered)
    /// - `reason`: error message
    ReactionFailed,

    /// A reaction panicked; the panic was caught. Delivery continued.
    ///
    /// Sets:
    /// - `subject`, `subscriber`, `value`
    /// - `reason`: panic info
    ReactionPanicked,

    /// A re-entrant update was queued behind the in-flight pass.
    ///
    /// Sets:
    /// - `subject`: subject identity
    /// - `value`: queued value (absent for a queued bare `notify`)
    UpdateQueued,

    /// A re-entrant update was dropped because the pending limit was reached.
    ///
    /// Sets:
    /// - `subject`: subject identity
    /// - `value`: dropped value (absent for a dropped bare `notify`)
    /// - `reason`: limit description
    PendingOverflow,
}

/// Diagnostic event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Identity of the subject that emitted the event.
    pub subject: Option<Arc<str>>,
    /// Name of the subscriber involved, if any.
    pub subscriber: Option<&'static str>,
    /// State value involved, if any.
    pub value: Option<i64>,
    /// Human-readable reason (errors, overflow details, etc.).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            subject: None,
            subscriber: None,
            value: None,
            reason: None,
        }
    }

    /// Attaches the emitting subject's identity.
    #[inline]
    pub fn with_subject(mut self, subject: impl Into<Arc<str>>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Attaches a subscriber name.
    #[inline]
    pub fn with_subscriber(mut self, subscriber: &'static str) -> Self {
        self.subscriber = Some(subscriber);
        self
    }

    /// Attaches a state value.
    #[inline]
    pub fn with_value(mut self, value: i64) -> Self {
        self.value = Some(value);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Returns true for reaction failures and caught panics.
    #[inline]
    pub fn is_reaction_error(&self) -> bool {
        matches!(
            self.kind,
            EventKind::ReactionFailed | EventKind::ReactionPanicked
        )
    }
}
