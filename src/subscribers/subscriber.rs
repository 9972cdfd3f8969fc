//! # Subscriber trait.
//!
//! Provides [`Subscribe`], the extension point for reacting to a subject's state changes.
//!
//! Each subscriber gets:
//! - **Synchronous delivery** on the thread that changed the subject
//! - **Registration-order position** in every subject it joins
//! - **Failure isolation** (errors and panics are caught and reported as
//!   `EventKind::ReactionFailed` / `EventKind::ReactionPanicked`)
//!
//! ## Architecture
//! ```text
//! Subject::set_state ──► snapshot ──► sub1.react(&subject)
//!                                 ├─► sub2.react(&subject) ── Err/panic → Bus
//!                                 └─► sub3.react(&subject)
//! ```
//!
//! ## Rules
//! - A failing subscriber never prevents delivery to the others.
//! - A reaction may read the subject, (de)register subscribers, or call
//!   `set_state` again; nested updates are queued until the current pass ends.
//! - Subjects hold subscribers weakly: keep your `Arc` alive for as long as the
//!   subscriber should receive notifications.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicI64, Ordering};
//! use statecast::{ReactionError, Subject, Subscribe};
//!
//! #[derive(Default)]
//! struct Peak(AtomicI64);
//!
//! impl Subscribe for Peak {
//!     fn react(&self, subject: &Subject) -> Result<(), ReactionError> {
//!         self.0.fetch_max(subject.get_state(), Ordering::Relaxed);
//!         Ok(())
//!     }
//!
//!     fn name(&self) -> &'static str { "peak" }
//! }
//!
//! let subject = Subject::new("readings", 0);
//! let peak = Arc::new(Peak::default());
//! subject.register(&peak);
//!
//! subject.set_state(7).unwrap();
//! subject.set_state(3).unwrap();
//! assert_eq!(peak.0.load(Ordering::Relaxed), 7);
//! ```

use crate::core::Subject;
use crate::error::ReactionError;

/// Reaction to a subject's state change.
///
/// ### Implementation requirements
/// - Read what you need from `subject`; do not assume you are its only subscriber.
/// - Report failures by returning [`ReactionError`]; panics are caught too,
///   but leave any locks you hold poisoned for your own code.
/// - Keep the reaction short: it runs inline on the publisher's thread.
pub trait Subscribe: Send + Sync + 'static {
    /// Handles one committed state change of `subject`.
    ///
    /// The returned error is consumed by the subject's fan-out and published
    /// on its [`Bus`](crate::Bus); it is never returned to the caller of `set_state`.
    fn react(&self, subject: &Subject) -> Result<(), ReactionError>;

    /// Returns the subscriber name used in logs and diagnostic events.
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose - override it when possible.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
