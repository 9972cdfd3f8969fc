//! # Ordered, duplicate-free set of subscriber handles.
//!
//! [`Registry`] keeps **non-owning** (`Weak`) references to subscribers, in the
//! order they were first registered. Identity is the address of the shared
//! allocation, never value equality: two equal-looking formatters are two members.
//!
//! ## Rules
//! - `add` of a present member is a no-op reported as [`Registration::Duplicate`].
//! - `remove` of an absent member returns [`NotFoundError`]; it never panics.
//! - `snapshot` returns a frozen copy; mutating the registry afterwards does not
//!   affect an iteration over that snapshot.
//! - A member whose last `Arc` was dropped by its owner is skipped by `snapshot`
//!   and removed by `prune`. Its address stays reserved while the `Weak` lives,
//!   so it can never be confused with a newer subscriber.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use statecast::{HexFormatter, Registration, Registry};
//!
//! let mut registry = Registry::new();
//! let hex = Arc::new(HexFormatter::new());
//!
//! assert_eq!(registry.add(&hex), Registration::Added);
//! assert_eq!(registry.add(&hex), Registration::Duplicate);
//! assert_eq!(registry.len(), 1);
//!
//! registry.remove(&hex).unwrap();
//! assert!(registry.remove(&hex).is_err());
//! ```

use std::sync::{Arc, Weak};

use crate::error::NotFoundError;
use crate::subscribers::Subscribe;

/// Outcome of [`Registry::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// Appended at the end of the registry.
    Added,
    /// Already present; nothing changed.
    Duplicate,
}

/// Registry slot: weak handle plus the name captured at registration time.
struct Member {
    name: &'static str,
    handle: Weak<dyn Subscribe>,
}

impl Member {
    #[inline]
    fn is(&self, addr: *const ()) -> bool {
        std::ptr::eq(self.handle.as_ptr() as *const (), addr)
    }

    #[inline]
    fn is_alive(&self) -> bool {
        self.handle.strong_count() > 0
    }
}

/// Address of the shared allocation; identity key of a subscriber.
#[inline]
fn addr_of(handle: &Weak<dyn Subscribe>) -> *const () {
    handle.as_ptr() as *const ()
}

/// Ordered, duplicate-free collection of subscriber handles.
#[derive(Default)]
pub struct Registry {
    members: Vec<Member>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `subscriber` unless it is already present.
    pub fn add<S: Subscribe>(&mut self, subscriber: &Arc<S>) -> Registration {
        let handle: Weak<S> = Arc::downgrade(subscriber);
        self.add_handle(handle, subscriber.name())
    }

    /// Same as [`add`](Self::add) for an already type-erased subscriber.
    pub fn add_dyn(&mut self, subscriber: &Arc<dyn Subscribe>) -> Registration {
        self.add_handle(Arc::downgrade(subscriber), subscriber.name())
    }

    fn add_handle(&mut self, handle: Weak<dyn Subscribe>, name: &'static str) -> Registration {
        let addr = addr_of(&handle);
        if self.members.iter().any(|m| m.is(addr)) {
            return Registration::Duplicate;
        }
        self.members.push(Member { name, handle });
        Registration::Added
    }

    /// Removes `subscriber` by identity.
    pub fn remove<S: Subscribe>(&mut self, subscriber: &Arc<S>) -> Result<(), NotFoundError> {
        let handle: Weak<S> = Arc::downgrade(subscriber);
        let handle: Weak<dyn Subscribe> = handle;
        self.remove_handle(&handle, subscriber.name())
    }

    /// Same as [`remove`](Self::remove) for an already type-erased subscriber.
    pub fn remove_dyn(&mut self, subscriber: &Arc<dyn Subscribe>) -> Result<(), NotFoundError> {
        self.remove_handle(&Arc::downgrade(subscriber), subscriber.name())
    }

    fn remove_handle(
        &mut self,
        handle: &Weak<dyn Subscribe>,
        name: &'static str,
    ) -> Result<(), NotFoundError> {
        let addr = addr_of(handle);
        match self.members.iter().position(|m| m.is(addr)) {
            Some(idx) => {
                // `remove`, not `swap_remove`: order is part of the contract.
                self.members.remove(idx);
                Ok(())
            }
            None => Err(NotFoundError { subscriber: name }),
        }
    }

    /// Returns true if `subscriber` is a member.
    pub fn contains<S: Subscribe + ?Sized>(&self, subscriber: &Arc<S>) -> bool {
        let addr = Arc::as_ptr(subscriber) as *const ();
        self.members.iter().any(|m| m.is(addr))
    }

    /// Returns a frozen copy of the live members, in registration order.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        let (names, members) = self
            .members
            .iter()
            .filter_map(|m| m.handle.upgrade().map(|sub| (m.name, sub)))
            .unzip();
        Snapshot { names, members }
    }

    /// Drops members whose subscriber no longer exists. Returns how many were removed.
    pub fn prune(&mut self) -> usize {
        let before = self.members.len();
        self.members.retain(Member::is_alive);
        before - self.members.len()
    }

    /// Number of live members.
    pub fn len(&self) -> usize {
        self.members.iter().filter(|m| m.is_alive()).count()
    }

    /// Returns true if there are no live members.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Names of live members, in registration order.
    pub fn names(&self) -> Vec<&'static str> {
        self.members
            .iter()
            .filter(|m| m.is_alive())
            .map(|m| m.name)
            .collect()
    }
}

/// Frozen, ordered copy of a registry's live members.
///
/// Holds strong references for the duration of one notification pass, so a
/// subscriber dropped by its owner mid-pass still receives that pass.
///
/// Names are the ones captured at registration; reading them never calls
/// into the subscriber.
///
/// # Destruction
/// If every owner drops its `Arc` while a snapshot is alive, the snapshot
/// becomes the last owner and the subscriber's destructor runs when the
/// snapshot is dropped. [`Subject`](crate::Subject) releases its snapshots on
/// the dispatching thread right after the pass; a panic from such a destructor
/// is caught and reported as `ReactionPanicked`.
pub struct Snapshot {
    names: Vec<&'static str>,
    members: Vec<Arc<dyn Subscribe>>,
}

impl Snapshot {
    /// Iterates members in registration order.
    pub fn iter(&self) -> std::slice::Iter<'_, Arc<dyn Subscribe>> {
        self.members.iter()
    }

    /// Number of members captured.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns true if nothing was captured.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Names of the captured members, in order.
    pub fn names(&self) -> Vec<&'static str> {
        self.names.clone()
    }

    /// Pairs of registration-time name and member, in order.
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, &Arc<dyn Subscribe>)> {
        self.names.iter().copied().zip(self.members.iter())
    }

    pub(crate) fn into_entries(self) -> impl Iterator<Item = (&'static str, Arc<dyn Subscribe>)> {
        self.names.into_iter().zip(self.members)
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = &'a Arc<dyn Subscribe>;
    type IntoIter = std::slice::Iter<'a, Arc<dyn Subscribe>>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}
