//! # Subject: validated state with synchronous, ordered fan-out.
//!
//! The [`Subject`] owns one integral value and a [`Registry`] of subscribers.
//! Every successful [`Subject::set_state`] commits the value and delivers it to
//! each registered subscriber, in registration order, before returning.
//!
//! ## Dispatch cycle
//! ```text
//! set_state(input)
//!   ├─► validate(input, cfg.bounds())  ── Err ──► ValidationRejected, return Err
//!   ├─► dispatch lock (re-entrant)
//!   ├─► phase == Notifying ?  ── yes (called from a reaction) ──► queue, return Ok
//!   ├─► commit, phase = Notifying, publish StateChanged
//!   └─► loop {
//!         snapshot = registry.snapshot()
//!         for sub in snapshot: catch_unwind(sub.react(&self))
//!              ├─ Ok(Err(e)) ──► ReactionFailed  (delivery continues)
//!              └─ panic      ──► ReactionPanicked (delivery continues)
//!         release snapshot (destructor panics caught as ReactionPanicked)
//!         pending.pop_front()
//!              ├─ Commit(v) ──► commit v, publish StateChanged, next pass
//!              ├─ Notify    ──► next pass
//!              └─ None      ──► return
//!       }
//!   phase = Unchanged, pending cleared (also on unwind)
//! ```
//!
//! ## Locking
//! - `dispatch` (re-entrant) serializes `set_state`, `notify`, `register` and
//!   `deregister` across threads. The dispatching thread may re-enter from a reaction.
//! - `inner` guards state, registry and the pending queue. It is held only for
//!   short critical sections and **never** while a reaction runs, so reactions
//!   may freely call `get_state`, `register`, `deregister` or `set_state`.
//! - A reaction must not block on another thread that calls a dispatching
//!   method of the same subject: that thread waits for the cycle to end.
//!
//! ## Re-entrancy
//! A reaction calling `set_state` gets its value validated immediately, then
//! queued. The outer pass keeps observing the value it started with; the
//! queued value is committed and delivered in a pass of its own afterwards.
//! At most [`SubjectConfig::max_pending`] updates are accepted per cycle;
//! extras are dropped and reported as `PendingOverflow`.

use std::collections::VecDeque;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use parking_lot::{Mutex, ReentrantMutex};

use crate::core::builder::SubjectBuilder;
use crate::core::config::SubjectConfig;
use crate::core::input::StateInput;
use crate::error::{NotFoundError, ReactionError, ValidationError};
use crate::events::{Bus, Event, EventKind};
use crate::subscribers::{Registration, Registry, Snapshot, Subscribe};

/// Logical state of a subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No notification pass is running.
    Unchanged,
    /// A notification pass (or a drain of queued updates) is in flight.
    Notifying,
}

/// Work deferred by a re-entrant call.
#[derive(Debug)]
enum Pending {
    Commit(i64),
    Notify,
}

struct Inner {
    state: i64,
    registry: Registry,
    phase: Phase,
    pending: VecDeque<Pending>,
    /// Updates queued since the current cycle started.
    accepted: usize,
}

/// Publisher of a validated integral value.
pub struct Subject {
    identity: Arc<str>,
    cfg: SubjectConfig,
    bus: Bus,
    dispatch: ReentrantMutex<()>,
    inner: Mutex<Inner>,
}

impl Subject {
    /// Creates a subject with default configuration and a private bus.
    ///
    /// # Example
    /// ```
    /// use statecast::Subject;
    ///
    /// let subject = Subject::new("DefaultFormatter", 0);
    /// assert_eq!(subject.get_state(), 0);
    /// assert_eq!(subject.identity(), "DefaultFormatter");
    /// ```
    pub fn new(identity: impl Into<Arc<str>>, initial: i64) -> Self {
        let cfg = SubjectConfig::default();
        let bus = Bus::new(cfg.bus_capacity_clamped());
        Self::from_parts(identity.into(), cfg, initial, bus, Registry::new())
    }

    /// Starts a [`SubjectBuilder`] for configured construction.
    pub fn builder(identity: impl Into<Arc<str>>) -> SubjectBuilder {
        SubjectBuilder::new(identity)
    }

    pub(crate) fn from_parts(
        identity: Arc<str>,
        cfg: SubjectConfig,
        initial: i64,
        bus: Bus,
        registry: Registry,
    ) -> Self {
        Self {
            identity,
            cfg,
            bus,
            dispatch: ReentrantMutex::new(()),
            inner: Mutex::new(Inner {
                state: initial,
                registry,
                phase: Phase::Unchanged,
                pending: VecDeque::new(),
                accepted: 0,
            }),
        }
    }

    /// Immutable label given at construction.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Current committed value. Side-effect free.
    pub fn get_state(&self) -> i64 {
        self.inner.lock().state
    }

    /// Returns whether a notification pass is in flight.
    pub fn phase(&self) -> Phase {
        self.inner.lock().phase
    }

    /// Configuration the subject was built with.
    pub fn config(&self) -> &SubjectConfig {
        &self.cfg
    }

    /// Diagnostic bus (error sink) of this subject.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Number of live registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().registry.len()
    }

    /// Names of live registered subscribers, in delivery order.
    pub fn subscriber_names(&self) -> Vec<&'static str> {
        self.inner.lock().registry.names()
    }

    /// Validates `value`, commits it and notifies every subscriber.
    ///
    /// When this returns `Ok` from a top-level call, every subscriber registered
    /// at call time has observed the new value (or failed independently).
    ///
    /// Called from inside a reaction, the value is validated and queued; it is
    /// committed after the in-flight pass completes.
    ///
    /// # Errors
    /// [`ValidationError`] when `value` cannot be coerced into the state domain.
    /// State and registry are untouched and nobody is notified.
    pub fn set_state(&self, value: impl Into<StateInput>) -> Result<(), ValidationError> {
        let value = match value.into().validate(&self.cfg.bounds()) {
            Ok(v) => v,
            Err(err) => {
                tracing::warn!(subject = %self.identity, error = %err, "state update rejected");
                self.publish(
                    Event::new(EventKind::ValidationRejected).with_reason(err.as_message()),
                );
                return Err(err);
            }
        };

        let _dispatch = self.dispatch.lock();
        {
            let mut inner = self.inner.lock();
            if inner.phase == Phase::Notifying {
                self.enqueue(&mut inner, Pending::Commit(value));
                return Ok(());
            }
            inner.state = value;
            inner.phase = Phase::Notifying;
            inner.accepted = 0;
        }
        self.publish(Event::new(EventKind::StateChanged).with_value(value));
        self.drive();
        Ok(())
    }

    /// Delivers the current value to every subscriber without changing it.
    ///
    /// Called from inside a reaction, an extra pass is queued instead.
    pub fn notify(&self) {
        let _dispatch = self.dispatch.lock();
        {
            let mut inner = self.inner.lock();
            if inner.phase == Phase::Notifying {
                self.enqueue(&mut inner, Pending::Notify);
                return;
            }
            inner.phase = Phase::Notifying;
            inner.accepted = 0;
        }
        self.drive();
    }

    /// Adds `subscriber` at the end of the delivery order.
    ///
    /// Registering a present subscriber is a no-op reported as a duplicate
    /// warning. The subject keeps only a weak reference: the caller owns the
    /// subscriber.
    pub fn register<S: Subscribe>(&self, subscriber: &Arc<S>) {
        let _dispatch = self.dispatch.lock();
        let outcome = self.inner.lock().registry.add(subscriber);
        self.report_registration(outcome, subscriber.name());
    }

    /// Same as [`register`](Self::register) for an already type-erased subscriber.
    pub fn register_dyn(&self, subscriber: &Arc<dyn Subscribe>) {
        let _dispatch = self.dispatch.lock();
        let outcome = self.inner.lock().registry.add_dyn(subscriber);
        self.report_registration(outcome, subscriber.name());
    }

    /// Removes `subscriber`. A pass already in flight still delivers to it.
    ///
    /// # Errors
    /// [`NotFoundError`] if it is not registered; nothing changes.
    pub fn deregister<S: Subscribe>(&self, subscriber: &Arc<S>) -> Result<(), NotFoundError> {
        let _dispatch = self.dispatch.lock();
        let res = self.inner.lock().registry.remove(subscriber);
        self.report_removal(&res, subscriber.name());
        res
    }

    /// Same as [`deregister`](Self::deregister) for an already type-erased subscriber.
    pub fn deregister_dyn(&self, subscriber: &Arc<dyn Subscribe>) -> Result<(), NotFoundError> {
        let _dispatch = self.dispatch.lock();
        let res = self.inner.lock().registry.remove_dyn(subscriber);
        self.report_removal(&res, subscriber.name());
        res
    }

    /// Runs passes until the pending queue is empty. Caller holds `dispatch`
    /// and has set the phase to `Notifying`.
    fn drive(&self) {
        let _cycle = CycleGuard { inner: &self.inner };
        loop {
            let (snapshot, value) = {
                let mut inner = self.inner.lock();
                let pruned = inner.registry.prune();
                if pruned > 0 {
                    tracing::debug!(subject = %self.identity, pruned, "dropped subscribers pruned");
                }
                (inner.registry.snapshot(), inner.state)
            };

            self.deliver(&snapshot, value);
            self.release(snapshot, value);

            let mut inner = self.inner.lock();
            match inner.pending.pop_front() {
                Some(Pending::Commit(next)) => {
                    inner.state = next;
                    drop(inner);
                    self.publish(Event::new(EventKind::StateChanged).with_value(next));
                }
                Some(Pending::Notify) => {}
                None => return,
            }
        }
    }

    /// One pass over a snapshot. Failures are isolated per subscriber.
    fn deliver(&self, snapshot: &Snapshot, value: i64) {
        tracing::debug!(
            subject = %self.identity,
            value,
            subscribers = snapshot.len(),
            "notification pass"
        );

        for (name, sub) in snapshot.entries() {
            let outcome = catch_unwind(AssertUnwindSafe(|| sub.react(self)));
            let err = match outcome {
                Ok(Ok(())) => continue,
                Ok(Err(err)) => err,
                Err(panic_err) => ReactionError::Panicked {
                    info: panic_info(&*panic_err),
                },
            };
            self.report_reaction(name, value, &err);
        }
    }

    /// Drops a finished snapshot member by member. A snapshot may hold the
    /// last reference to a subscriber; a panicking destructor is caught here.
    fn release(&self, snapshot: Snapshot, value: i64) {
        for (name, sub) in snapshot.into_entries() {
            if let Err(panic_err) = catch_unwind(AssertUnwindSafe(move || drop(sub))) {
                let err = ReactionError::Panicked {
                    info: panic_info(&*panic_err),
                };
                self.report_reaction(name, value, &err);
            }
        }
    }

    fn report_reaction(&self, name: &'static str, value: i64, err: &ReactionError) {
        tracing::error!(
            subject = %self.identity,
            subscriber = name,
            value,
            error = %err,
            "subscriber reaction failed"
        );
        let kind = match err {
            ReactionError::Panicked { .. } => EventKind::ReactionPanicked,
            _ => EventKind::ReactionFailed,
        };
        self.publish(
            Event::new(kind)
                .with_subscriber(name)
                .with_value(value)
                .with_reason(err.reason()),
        );
    }

    /// Queues deferred work, honoring the pending limit.
    fn enqueue(&self, inner: &mut Inner, work: Pending) {
        let value = match work {
            Pending::Commit(v) => Some(v),
            Pending::Notify => None,
        };

        if let Some(limit) = self.cfg.pending_limit() {
            if inner.accepted >= limit {
                tracing::warn!(
                    subject = %self.identity,
                    ?value,
                    limit,
                    "pending limit reached, re-entrant update dropped"
                );
                let mut ev = Event::new(EventKind::PendingOverflow)
                    .with_reason(format!("max_pending={limit}"));
                ev.value = value;
                self.publish(ev);
                return;
            }
        }

        inner.pending.push_back(work);
        inner.accepted += 1;
        tracing::debug!(subject = %self.identity, ?value, "re-entrant update queued");
        let mut ev = Event::new(EventKind::UpdateQueued);
        ev.value = value;
        self.publish(ev);
    }

    fn report_registration(&self, outcome: Registration, name: &'static str) {
        match outcome {
            Registration::Added => {
                tracing::debug!(subject = %self.identity, subscriber = name, "subscriber registered");
                self.publish(Event::new(EventKind::SubscriberRegistered).with_subscriber(name));
            }
            Registration::Duplicate => {
                tracing::warn!(subject = %self.identity, subscriber = name, "subscriber already registered");
                self.publish(Event::new(EventKind::DuplicateRegistration).with_subscriber(name));
            }
        }
    }

    fn report_removal(&self, res: &Result<(), NotFoundError>, name: &'static str) {
        match res {
            Ok(()) => {
                tracing::debug!(subject = %self.identity, subscriber = name, "subscriber deregistered");
                self.publish(Event::new(EventKind::SubscriberDeregistered).with_subscriber(name));
            }
            Err(err) => {
                tracing::warn!(subject = %self.identity, error = %err, "deregistration failed");
                self.publish(Event::new(EventKind::SubscriberNotFound).with_subscriber(name));
            }
        }
    }

    /// Stamps the subject identity and publishes.
    #[inline]
    fn publish(&self, ev: Event) {
        self.bus.publish(ev.with_subject(Arc::clone(&self.identity)));
    }
}

/// Returns the subject to `Unchanged` when a dispatch cycle ends, including
/// by unwinding. Work still queued for that cycle is discarded.
struct CycleGuard<'a> {
    inner: &'a Mutex<Inner>,
}

impl Drop for CycleGuard<'_> {
    fn drop(&mut self) {
        let mut inner = self.inner.lock();
        inner.phase = Phase::Unchanged;
        inner.pending.clear();
        inner.accepted = 0;
    }
}

/// Extracts a readable message from a panic payload.
fn panic_info(any: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = any.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = any.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

impl fmt::Debug for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("Subject")
            .field("identity", &self.identity)
            .field("state", &inner.state)
            .field("phase", &inner.phase)
            .field("subscribers", &inner.registry.names())
            .finish()
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} has data {}", self.identity, self.get_state())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Appends `(tag, observed value)` to a shared journal.
    struct Recorder {
        tag: &'static str,
        journal: Arc<Mutex<Vec<(&'static str, i64)>>>,
    }

    impl Subscribe for Recorder {
        fn react(&self, subject: &Subject) -> Result<(), ReactionError> {
            self.journal.lock().push((self.tag, subject.get_state()));
            Ok(())
        }
        fn name(&self) -> &'static str {
            self.tag
        }
    }

    fn recorder(tag: &'static str, journal: &Arc<Mutex<Vec<(&'static str, i64)>>>) -> Arc<Recorder> {
        Arc::new(Recorder {
            tag,
            journal: Arc::clone(journal),
        })
    }

    #[test]
    fn test_new_subject_defaults() {
        let s = Subject::new("s", 0);
        assert_eq!(s.get_state(), 0);
        assert_eq!(s.phase(), Phase::Unchanged);
        assert_eq!(s.subscriber_count(), 0);
        assert_eq!(s.to_string(), "s has data 0");
    }

    #[test]
    fn test_set_state_without_subscribers() {
        let s = Subject::new("s", 0);
        s.set_state(9).unwrap();
        assert_eq!(s.get_state(), 9);
        assert_eq!(s.phase(), Phase::Unchanged);
    }

    #[test]
    fn test_notify_redelivers_current_value() {
        let journal = Arc::new(Mutex::new(Vec::new()));
        let a = recorder("a", &journal);
        let s = Subject::new("s", 4);
        s.register(&a);

        s.notify();
        s.notify();
        assert_eq!(*journal.lock(), vec![("a", 4), ("a", 4)]);
    }

    #[test]
    fn test_phase_is_notifying_inside_reaction() {
        struct PhaseCheck(AtomicUsize);
        impl Subscribe for PhaseCheck {
            fn react(&self, subject: &Subject) -> Result<(), ReactionError> {
                if subject.phase() == Phase::Notifying {
                    self.0.fetch_add(1, Ordering::SeqCst);
                }
                Ok(())
            }
        }

        let check = Arc::new(PhaseCheck(AtomicUsize::new(0)));
        let s = Subject::new("s", 0);
        s.register(&check);
        s.set_state(1).unwrap();

        assert_eq!(check.0.load(Ordering::SeqCst), 1);
        assert_eq!(s.phase(), Phase::Unchanged);
    }

    #[test]
    fn test_reentrant_notify_is_queued() {
        struct Echo {
            calls: AtomicUsize,
        }
        impl Subscribe for Echo {
            fn react(&self, subject: &Subject) -> Result<(), ReactionError> {
                if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    subject.notify();
                    // The queued pass has not run yet.
                    assert_eq!(self.calls.load(Ordering::SeqCst), 1);
                }
                Ok(())
            }
        }

        let echo = Arc::new(Echo {
            calls: AtomicUsize::new(0),
        });
        let s = Subject::new("s", 0);
        s.register(&echo);
        s.set_state(1).unwrap();

        assert_eq!(echo.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_debug_lists_subscribers() {
        let journal = Arc::new(Mutex::new(Vec::new()));
        let a = recorder("a", &journal);
        let s = Subject::new("dbg", 2);
        s.register(&a);

        let out = format!("{s:?}");
        assert!(out.contains("dbg"));
        assert!(out.contains("\"a\""));
    }

    #[test]
    fn test_events_carry_subject_identity() {
        let s = Subject::new("labelled", 0);
        let mut rx = s.bus().subscribe();
        s.set_state(1).unwrap();

        let ev = rx.try_recv().expect("state changed");
        assert_eq!(ev.kind, EventKind::StateChanged);
        assert_eq!(ev.subject.as_deref(), Some("labelled"));
        assert_eq!(ev.value, Some(1));
    }

    #[test]
    fn test_rejection_event_carries_message() {
        let s = Subject::new("s", 0);
        let mut rx = s.bus().subscribe();
        assert!(s.set_state("five").is_err());

        let ev = rx.try_recv().expect("rejection reported");
        assert_eq!(ev.kind, EventKind::ValidationRejected);
        assert_eq!(ev.reason.as_deref(), Some("\"five\" is not an integer"));
    }

    #[test]
    fn test_unwound_cycle_returns_to_unchanged() {
        let s = Subject::new("s", 0);
        {
            let _dispatch = s.dispatch.lock();
            let mut inner = s.inner.lock();
            inner.phase = Phase::Notifying;
            inner.pending.push_back(Pending::Commit(5));
            inner.accepted = 1;
        }

        let unwound = catch_unwind(AssertUnwindSafe(|| {
            let _cycle = CycleGuard { inner: &s.inner };
            panic!("cycle aborted");
        }));
        assert!(unwound.is_err());

        let inner = s.inner.lock();
        assert_eq!(inner.phase, Phase::Unchanged);
        assert!(inner.pending.is_empty());
        assert_eq!(inner.accepted, 0);
    }
}
