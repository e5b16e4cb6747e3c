//! Event registry: keys, listeners, slots and the emitter.
//!
//! This module groups the event **data model** and the **engine**:
//! - [`EventName`], [`Symbol`] — hashable event keys
//! - [`Listener`], [`Arg`], [`Payload`] — callbacks and dynamic arguments
//! - `Slot` — the per-name entry list (crate-private)
//! - [`EventEmitter`] — the registry and emission loop
//!
//! The wait helpers in [`crate::wait`] are pure consumers of the public
//! surface here; they hold no private access to slot internals.

mod emitter;
mod listener;
mod name;
mod slot;

pub use emitter::{
    default_max_listeners, listener_count, set_default_max_listeners, EventEmitter,
    DEFAULT_MAX_LISTENERS,
};
pub use listener::{arg, Arg, ArgExt, Listener, Payload};
pub use name::{EventName, Symbol};
