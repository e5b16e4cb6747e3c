//! # Listener slot: the ordered entry list for one event name.
//!
//! A [`Slot`] owns the `(listener, once)` entries for exactly one name on
//! exactly one emitter. Index 0 fires first. Removal scans head-to-tail and
//! removes the first identity match only, so intentionally duplicate
//! subscriptions survive a single removal.
//!
//! The slot never drives emission itself: it hands out a [`Slot::snapshot`]
//! of its entries, and the emitter iterates that snapshot while the live
//! slot stays free for reentrant mutation. An emitter must drop a slot the
//! moment it becomes empty — an empty slot must be indistinguishable from
//! "no slot for this name".

use crate::events::Listener;

/// One subscription: the listener handle and its once flag.
///
/// Immutable once created; cloning clones the handle, not the closure.
#[derive(Clone, Debug)]
pub(crate) struct Entry {
    pub listener: Listener,
    pub once: bool,
}

/// Ordered entries for a single event name.
#[derive(Debug, Default)]
pub(crate) struct Slot {
    entries: Vec<Entry>,
    /// Latch for the one-shot advisory max-listener diagnostic.
    pub warned: bool,
}

impl Slot {
    /// Adds an entry at the tail.
    pub fn append(&mut self, listener: Listener, once: bool) {
        self.entries.push(Entry { listener, once });
    }

    /// Adds an entry at the head, so it fires first on the next emission.
    pub fn prepend(&mut self, listener: Listener, once: bool) {
        self.entries.insert(0, Entry { listener, once });
    }

    /// Removes the first entry matching `listener` by identity.
    ///
    /// Returns whether an entry was removed. Absent listeners are a no-op.
    pub fn remove(&mut self, listener: &Listener) -> bool {
        match self.entries.iter().position(|e| e.listener.ptr_eq(listener)) {
            Some(i) => {
                self.entries.remove(i);
                true
            }
            None => false,
        }
    }

    /// Shallow copy of the current entries, used to iterate one emission
    /// while the live list stays mutable.
    pub fn snapshot(&self) -> Vec<Entry> {
        self.entries.clone()
    }

    /// Current listener handles, in firing order.
    pub fn listeners(&self) -> Vec<Listener> {
        self.entries.iter().map(|e| e.listener.clone()).collect()
    }

    /// Head entry's listener handle, if any.
    pub fn front(&self) -> Option<Listener> {
        self.entries.first().map(|e| e.listener.clone())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
