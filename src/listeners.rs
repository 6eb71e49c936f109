//! Ordered observer lists.
//!
//! Observers are closures behind an `Rc` so that a list can be snapshotted before dispatch:
//! the store hands out `&mut DataStore` to every observer, and an observer is free to register
//! or remove observers (including itself) while the snapshot is being walked.

use std::fmt;
use std::rc::Rc;

/// Identifies one registered observer. Returned when subscribing and used to unsubscribe.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    pub(crate) fn new(id: u64) -> Self {
        ListenerId(id)
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener#{}", self.0)
    }
}

/// Observers of one kind, kept in registration order.
pub(crate) struct Listeners<F: ?Sized> {
    entries: Vec<(ListenerId, Rc<F>)>,
}

impl<F: ?Sized> Default for Listeners<F> {
    fn default() -> Self {
        Listeners {
            entries: Vec::new(),
        }
    }
}

impl<F: ?Sized> Listeners<F> {
    pub(crate) fn push(&mut self, id: ListenerId, listener: Rc<F>) {
        self.entries.push((id, listener));
    }

    /// Removes the observer registered under `id`. Returns `true` if it was present.
    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(listener_id, _)| *listener_id != id);
        self.entries.len() != before
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Clones the observer handles in registration order.
    pub(crate) fn snapshot(&self) -> Vec<Rc<F>> {
        self.entries
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect()
    }
}
