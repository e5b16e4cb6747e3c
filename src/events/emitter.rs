//! # EventEmitter: the listener registry and emission engine.
//!
//! [`EventEmitter`] maps event names to listener slots and delivers
//! emissions synchronously, in subscription order, on the calling thread.
//!
//! ```text
//!   on / once / prepend*          emit(name, args)
//!        │                              │
//!        ▼                              ▼
//!   ┌─────────────────────────────────────────────┐
//!   │ EventEmitter (cheap-clone handle)           │
//!   │   slots: RefCell<HashMap<EventName, Slot>>  │
//!   │   meta: newListener / removeListener        │
//!   └──────┬──────────────────────────┬───────────┘
//!          ▼                          ▼
//!     Slot("hello")              Slot("error")
//!     [a, b, c(once)]            [handler]
//! ```
//!
//! ## Emission contract
//! `emit` snapshots the slot's entries, then iterates the snapshot. A
//! listener may add or remove listeners on the same name from inside its
//! own invocation:
//! - additions take effect from the *next* emission of that name;
//! - removals act on the live slot, so a removed listener may still fire
//!   once from the in-flight snapshot (accepted, documented);
//! - a `once` entry is removed from the live slot (emitting
//!   `removeListener`) *before* its callback runs, so re-emitting the same
//!   name from inside it cannot re-fire it.
//!
//! ## Meta-events
//! Every subscribe emits `newListener (name, listener)` strictly *before*
//! the slot is touched; every unsubscribe attempt emits
//! `removeListener (name, listener)` *after* the structural removal, found
//! or not. Both are ordinary events — subscribe to them like any other.
//!
//! ## The `error` convention
//! Emitting `error` with zero listeners panics instead of silently
//! returning `false`. With at least one listener, `error` behaves like any
//! other name.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

use crate::error::EmitterError;
use crate::events::slot::Slot;
use crate::events::{arg, Arg, EventName, Listener};

/// Initial value of the process-wide advisory listener limit.
pub const DEFAULT_MAX_LISTENERS: usize = 10;

/// Process-wide default for the advisory limit; `0` means unlimited.
static DEFAULT_MAX: AtomicUsize = AtomicUsize::new(DEFAULT_MAX_LISTENERS);

/// Returns the process-wide default advisory listener limit.
pub fn default_max_listeners() -> usize {
    DEFAULT_MAX.load(AtomicOrdering::Relaxed)
}

/// Sets the process-wide default advisory listener limit (`0` = unlimited).
///
/// Applies to every emitter without a per-emitter override.
pub fn set_default_max_listeners(n: usize) {
    DEFAULT_MAX.store(n, AtomicOrdering::Relaxed);
}

/// Number of listeners registered for `name` on `emitter`.
///
/// Free-function form of [`EventEmitter::listener_count`].
pub fn listener_count(emitter: &EventEmitter, name: impl Into<EventName>) -> usize {
    emitter.listener_count(name)
}

struct Shared {
    slots: RefCell<HashMap<EventName, Slot>>,
    /// Per-emitter override of the advisory limit; falls back to the
    /// process-wide default when unset.
    max_listeners: Cell<Option<usize>>,
}

/// Synchronous, same-thread event emitter.
///
/// The handle is cheap to clone: clones share one registry behind the
/// handle. The emitter is `!Send` by construction — all mutation, including
/// mutation performed by listeners invoked during emission, happens on one
/// logical thread.
///
/// # Example
/// ```
/// use eventry::{args, ArgExt, EventEmitter, Listener};
///
/// let emitter = EventEmitter::new();
/// emitter
///     .on("hello", Listener::new(|_, args| {
///         let who = args[0].downcast_ref::<&str>().unwrap();
///         assert_eq!(*who, "world");
///     }))
///     .emit("hello", &args!["world"]);
/// ```
#[derive(Clone)]
pub struct EventEmitter {
    shared: Rc<Shared>,
}

impl EventEmitter {
    /// Creates an emitter with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self {
            shared: Rc::new(Shared {
                slots: RefCell::new(HashMap::new()),
                max_listeners: Cell::new(None),
            }),
        }
    }

    /// True if `other` is a handle to the same registry.
    #[must_use]
    pub fn same_emitter(&self, other: &EventEmitter) -> bool {
        Rc::ptr_eq(&self.shared, &other.shared)
    }

    // ---- Subscription ----

    /// Appends `listener` for `name`.
    ///
    /// Emits `newListener (name, listener)` before the slot is touched, so
    /// a `newListener` handler can pre-empt the add (register a competing
    /// listener, remove an existing one) without ever seeing `listener`
    /// live. Returns `&Self` for chaining.
    pub fn on(&self, name: impl Into<EventName>, listener: Listener) -> &Self {
        self.insert(name.into(), listener, false, false)
    }

    /// Alias for [`EventEmitter::on`].
    pub fn add_listener(&self, name: impl Into<EventName>, listener: Listener) -> &Self {
        self.on(name, listener)
    }

    /// Appends `listener` for `name`, auto-removed immediately before its
    /// first invocation.
    ///
    /// The auto-removal goes through the ordinary removal path, so it
    /// emits `removeListener` like an explicit [`EventEmitter::off`].
    pub fn once(&self, name: impl Into<EventName>, listener: Listener) -> &Self {
        self.insert(name.into(), listener, true, false)
    }

    /// Alias for [`EventEmitter::once`].
    pub fn add_once_listener(&self, name: impl Into<EventName>, listener: Listener) -> &Self {
        self.once(name, listener)
    }

    /// Prepends `listener` for `name`: it fires first on the next
    /// emission, ahead of everything already subscribed.
    pub fn prepend_listener(&self, name: impl Into<EventName>, listener: Listener) -> &Self {
        self.insert(name.into(), listener, false, true)
    }

    /// Prepends a once-listener for `name`.
    pub fn prepend_once_listener(&self, name: impl Into<EventName>, listener: Listener) -> &Self {
        self.insert(name.into(), listener, true, true)
    }

    // ---- Removal ----

    /// Removes the first identity match of `listener` from `name`'s slot,
    /// then emits `removeListener (name, listener)`.
    ///
    /// The meta-event fires even if `listener` was not subscribed:
    /// `removeListener` is a notification hook, not a removal confirmation.
    /// Observers of `removeListener` see the registry already reflecting
    /// the removal. Safe to call from inside an emission of `name`; the
    /// in-flight snapshot is unaffected.
    pub fn off(&self, name: impl Into<EventName>, listener: &Listener) -> &Self {
        self.off_named(name.into(), listener);
        self
    }

    /// Alias for [`EventEmitter::off`].
    pub fn remove_listener(&self, name: impl Into<EventName>, listener: &Listener) -> &Self {
        self.off(name, listener)
    }

    /// Removes every listener for `name`, or for every registered name
    /// when `name` is `None`.
    ///
    /// Each slot is drained front-to-back one entry at a time, emitting
    /// `removeListener` per entry; listeners added to a draining name
    /// during the drain are included. With `None`, `removeListener`'s own
    /// slot is drained last so its observers see every other removal.
    pub fn remove_all_listeners(&self, name: Option<EventName>) -> &Self {
        match name {
            Some(name) => self.drain(name),
            None => {
                let names: Vec<EventName> = self.shared.slots.borrow().keys().cloned().collect();
                for name in names {
                    if name != EventName::REMOVE_LISTENER {
                        self.drain(name);
                    }
                }
                self.drain(EventName::REMOVE_LISTENER);
            }
        }
        self
    }

    // ---- Emission ----

    /// Emits `name` with `args` to every current subscriber, in order.
    ///
    /// Returns `true` iff at least one listener was subscribed when the
    /// emission began, however many remain afterward. Reentrant emission
    /// from inside a listener is supported; see the module docs for the
    /// snapshot contract.
    ///
    /// # Panics
    /// Emitting `error` with zero listeners panics with the
    /// [`EmitterError::UnhandledError`] message. A panic from a listener
    /// propagates out unintercepted, aborting the remaining snapshot.
    pub fn emit(&self, name: impl Into<EventName>, args: &[Arg]) -> bool {
        let name = name.into();
        if self.emit_snapshot(&name, args) {
            return true;
        }
        if name.is_error() {
            let err = EmitterError::UnhandledError {
                cause: args.first().cloned(),
            };
            panic!("{err}");
        }
        false
    }

    // ---- Introspection ----

    /// Snapshot of `name`'s listener handles, in firing order.
    ///
    /// The returned vector is detached: mutating it does not affect the
    /// emitter.
    pub fn listeners(&self, name: impl Into<EventName>) -> Vec<Listener> {
        self.shared
            .slots
            .borrow()
            .get(&name.into())
            .map(Slot::listeners)
            .unwrap_or_default()
    }

    /// Number of listeners currently subscribed for `name`.
    pub fn listener_count(&self, name: impl Into<EventName>) -> usize {
        self.shared
            .slots
            .borrow()
            .get(&name.into())
            .map(Slot::len)
            .unwrap_or(0)
    }

    /// The advisory listener limit for this emitter (`0` = unlimited).
    ///
    /// Falls back to [`default_max_listeners`] when no per-emitter value
    /// was set. Never enforced: exceeding it prints a one-shot diagnostic
    /// per slot and changes nothing else.
    pub fn max_listeners(&self) -> usize {
        self.shared
            .max_listeners
            .get()
            .unwrap_or_else(default_max_listeners)
    }

    /// Sets this emitter's advisory listener limit (`0` = unlimited).
    pub fn set_max_listeners(&self, n: usize) -> &Self {
        self.shared.max_listeners.set(Some(n));
        self
    }

    // ---- Internals ----

    /// Snapshot emission for one name. Returns whether a slot existed.
    ///
    /// The map borrow is released before any callback runs; only the
    /// snapshot is iterated.
    fn emit_snapshot(&self, name: &EventName, args: &[Arg]) -> bool {
        let snapshot = match self.shared.slots.borrow().get(name) {
            Some(slot) => slot.snapshot(),
            None => return false,
        };

        for entry in snapshot {
            if entry.once {
                self.off_named(name.clone(), &entry.listener);
            }
            entry.listener.call(self, args);
        }
        true
    }

    fn insert(&self, name: EventName, listener: Listener, once: bool, prepend: bool) -> &Self {
        self.emit_snapshot(
            &EventName::NEW_LISTENER,
            &[arg(name.clone()), arg(listener.clone())],
        );

        let mut exceeded = None;
        {
            let mut slots = self.shared.slots.borrow_mut();
            let slot = slots.entry(name.clone()).or_default();
            if prepend {
                slot.prepend(listener, once);
            } else {
                slot.append(listener, once);
            }

            let max = self.max_listeners();
            if max != 0 && slot.len() > max && !slot.warned {
                slot.warned = true;
                exceeded = Some(slot.len());
            }
        }
        if let Some(count) = exceeded {
            eprintln!(
                "[eventry] possible listener leak: {count} listeners for '{name}' (advisory limit {})",
                self.max_listeners()
            );
        }
        self
    }

    /// Structural removal, then the `removeListener` notification.
    fn off_named(&self, name: EventName, listener: &Listener) {
        self.detach(&name, listener);
        self.emit_snapshot(
            &EventName::REMOVE_LISTENER,
            &[arg(name), arg(listener.clone())],
        );
    }

    /// Removes the first identity match and drops the slot if it emptied.
    fn detach(&self, name: &EventName, listener: &Listener) -> bool {
        let mut slots = self.shared.slots.borrow_mut();
        match slots.get_mut(name) {
            Some(slot) => {
                let removed = slot.remove(listener);
                if slot.is_empty() {
                    slots.remove(name);
                }
                removed
            }
            None => false,
        }
    }

    /// Drains one name front-to-back, emitting `removeListener` per entry.
    fn drain(&self, name: EventName) {
        loop {
            let front = self
                .shared
                .slots
                .borrow()
                .get(&name)
                .and_then(Slot::front);
            match front {
                Some(listener) => self.off_named(name.clone(), &listener),
                None => break,
            }
        }
    }
}

impl Default for EventEmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let slots = self.shared.slots.borrow();
        f.debug_struct("EventEmitter")
            .field("events", &slots.len())
            .field("max_listeners", &self.max_listeners())
            .finish()
    }
}
