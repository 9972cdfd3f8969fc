//! # LogWriter: diagnostic event printer
//!
//! A minimal consumer that prints [`Event`]s from a subject's bus to stdout.
//! Use it for tests or demos.
//!
//! ## Example output
//! ```text
//! [registered] subject="DefaultFormatter" subscriber="HexFormatter"
//! [state-changed] subject="DefaultFormatter" value=Some(3)
//! [reaction-failed] subject="DefaultFormatter" subscriber="audit" value=Some(3) reason=Some("disk full")
//! [queued] subject="DefaultFormatter" value=Some(4)
//! ```

use tokio::sync::broadcast::{Receiver, error::TryRecvError};

use crate::events::{Event, EventKind};

/// Event writer.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Renders one event as a single line.
    pub fn line(&self, e: &Event) -> String {
        let subject = e.subject.as_deref().unwrap_or("unknown");
        let subscriber = e.subscriber.unwrap_or("unknown");
        match e.kind {
            EventKind::StateChanged => {
                format!("[state-changed] subject={subject:?} value={:?}", e.value)
            }
            EventKind::ValidationRejected => {
                format!("[rejected] subject={subject:?} reason={:?}", e.reason)
            }
            EventKind::SubscriberRegistered => {
                format!("[registered] subject={subject:?} subscriber={subscriber:?}")
            }
            EventKind::DuplicateRegistration => {
                format!("[duplicate] subject={subject:?} subscriber={subscriber:?}")
            }
            EventKind::SubscriberDeregistered => {
                format!("[deregistered] subject={subject:?} subscriber={subscriber:?}")
            }
            EventKind::SubscriberNotFound => {
                format!("[not-found] subject={subject:?} subscriber={subscriber:?}")
            }
            EventKind::ReactionFailed => format!(
                "[reaction-failed] subject={subject:?} subscriber={subscriber:?} value={:?} reason={:?}",
                e.value, e.reason
            ),
            EventKind::ReactionPanicked => format!(
                "[reaction-panicked] subject={subject:?} subscriber={subscriber:?} value={:?} info={:?}",
                e.value, e.reason
            ),
            EventKind::UpdateQueued => {
                format!("[queued] subject={subject:?} value={:?}", e.value)
            }
            EventKind::PendingOverflow => format!(
                "[pending-overflow] subject={subject:?} value={:?} reason={:?}",
                e.value, e.reason
            ),
        }
    }

    /// Prints every event currently buffered in `rx`. Returns how many were printed.
    ///
    /// Lagged receivers report the skipped count and continue.
    pub fn drain(&self, rx: &mut Receiver<Event>) -> usize {
        let mut printed = 0;
        loop {
            match rx.try_recv() {
                Ok(ev) => {
                    println!("{}", self.line(&ev));
                    printed += 1;
                }
                Err(TryRecvError::Lagged(n)) => {
                    println!("[lagged] skipped={n}");
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return printed,
            }
        }
    }
}
