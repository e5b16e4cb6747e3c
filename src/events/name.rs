//! # Event keys: names and opaque symbols.
//!
//! [`EventName`] is the key an [`EventEmitter`](crate::EventEmitter) maps to
//! a listener slot. A key is either a string (borrowed or owned) or a
//! [`Symbol`] — a process-unique opaque id for collision-free private
//! events.
//!
//! Three string names carry built-in conventions:
//! - [`EventName::NEW_LISTENER`] — emitted before every subscribe,
//! - [`EventName::REMOVE_LISTENER`] — emitted after every unsubscribe,
//! - [`EventName::ERROR`] — must not be emitted into the void (see
//!   [`EventEmitter::emit`](crate::EventEmitter::emit)).

use std::borrow::Cow;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

/// Global allocator for symbol ids.
static SYMBOL_SEQ: AtomicU64 = AtomicU64::new(0);

/// An opaque, process-unique event key.
///
/// Two symbols compare equal only if one is a copy of the other; the
/// optional label is purely descriptive and does not affect identity.
///
/// # Example
/// ```
/// use eventry::Symbol;
///
/// let a = Symbol::new();
/// let b = Symbol::new();
/// assert_ne!(a, b);
/// assert_eq!(a, a);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Symbol {
    id: u64,
    label: Option<&'static str>,
}

impl Symbol {
    /// Allocates a fresh symbol.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: SYMBOL_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            label: None,
        }
    }

    /// Allocates a fresh symbol with a descriptive label.
    #[must_use]
    pub fn labeled(label: &'static str) -> Self {
        Self {
            id: SYMBOL_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            label: Some(label),
        }
    }

    /// The descriptive label, if one was given.
    pub fn label(&self) -> Option<&'static str> {
        self.label
    }
}

impl Default for Symbol {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.label {
            Some(label) => write!(f, "Symbol({}: {label})", self.id),
            None => write!(f, "Symbol({})", self.id),
        }
    }
}

/// Key identifying one event on one emitter.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventName {
    /// A string key.
    Str(Cow<'static, str>),
    /// An opaque symbol key.
    Symbol(Symbol),
}

impl EventName {
    /// Meta-event emitted before a listener is added.
    pub const NEW_LISTENER: EventName = EventName::Str(Cow::Borrowed("newListener"));

    /// Meta-event emitted after a listener removal was attempted.
    pub const REMOVE_LISTENER: EventName = EventName::Str(Cow::Borrowed("removeListener"));

    /// The conventional error event.
    pub const ERROR: EventName = EventName::Str(Cow::Borrowed("error"));

    /// True for the conventional `error` event.
    #[inline]
    pub fn is_error(&self) -> bool {
        matches!(self, EventName::Str(s) if s == "error")
    }

    /// The string form of this key, if it is a string key.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            EventName::Str(s) => Some(s),
            EventName::Symbol(_) => None,
        }
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventName::Str(s) => f.write_str(s),
            EventName::Symbol(sym) => write!(f, "{sym:?}"),
        }
    }
}

impl From<&'static str> for EventName {
    fn from(s: &'static str) -> Self {
        EventName::Str(Cow::Borrowed(s))
    }
}

impl From<String> for EventName {
    fn from(s: String) -> Self {
        EventName::Str(Cow::Owned(s))
    }
}

impl From<Cow<'static, str>> for EventName {
    fn from(s: Cow<'static, str>) -> Self {
        EventName::Str(s)
    }
}

impl From<Symbol> for EventName {
    fn from(sym: Symbol) -> Self {
        EventName::Symbol(sym)
    }
}

impl From<&EventName> for EventName {
    fn from(name: &EventName) -> Self {
        name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_names_compare_by_value() {
        let a: EventName = "hello".into();
        let b: EventName = String::from("hello").into();
        assert_eq!(a, b);
    }

    #[test]
    fn test_symbols_are_unique() {
        let a = Symbol::labeled("private");
        let b = Symbol::labeled("private");
        assert_ne!(EventName::from(a), EventName::from(b));
        assert_eq!(EventName::from(a), EventName::from(a));
    }

    #[test]
    fn test_error_detection() {
        assert!(EventName::ERROR.is_error());
        assert!(EventName::from("error").is_error());
        assert!(!EventName::from("hello").is_error());
        assert!(!EventName::from(Symbol::labeled("error")).is_error());
    }
}
