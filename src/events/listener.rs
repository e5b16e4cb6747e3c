//! # Listeners and dynamic event arguments.
//!
//! A [`Listener`] is a reference-counted closure with a fixed calling
//! convention: `(emitting emitter, argument slice)`. Cloning a listener
//! clones the handle, not the closure — and that shared pointer is the
//! listener's identity, which is the removal key throughout the crate.
//!
//! Emissions carry a variable-length argument list. Each [`Arg`] is a
//! reference-counted [`Payload`]: any `'static` value that is `Debug`.
//! Consumers recover concrete types with [`ArgExt::downcast_ref`].
//!
//! ```
//! use eventry::{args, ArgExt, EventEmitter, Listener};
//!
//! let emitter = EventEmitter::new();
//! let listener = Listener::new(|_, args| {
//!     let n = args[0].downcast_ref::<i32>().unwrap();
//!     assert_eq!(*n, 42);
//! });
//! emitter.on("answer", listener);
//! emitter.emit("answer", &args![42]);
//! ```

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use crate::events::EventEmitter;

/// A dynamically typed event argument value.
///
/// Requires `Debug` so that argument tuples (and the `error` convention's
/// payload) remain printable in diagnostics without knowing the concrete
/// type.
pub trait Payload: Any + fmt::Debug {
    /// Upcast for downcasting; see [`ArgExt::downcast_ref`].
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any + fmt::Debug> Payload for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// One event argument: a shared, dynamically typed payload.
pub type Arg = Rc<dyn Payload>;

/// Wraps a value as an event argument.
pub fn arg<T: Any + fmt::Debug>(value: T) -> Arg {
    Rc::new(value)
}

/// Typed access to [`Arg`] values.
pub trait ArgExt {
    /// Borrows the payload as `T`, if that is its concrete type.
    fn downcast_ref<T: Any>(&self) -> Option<&T>;
}

impl ArgExt for Arg {
    fn downcast_ref<T: Any>(&self) -> Option<&T> {
        (**self).as_any().downcast_ref::<T>()
    }
}

/// Builds a `Vec<Arg>` from a list of values.
///
/// ```
/// use eventry::args;
///
/// let tuple = args!["world", 1u32];
/// assert_eq!(tuple.len(), 2);
/// ```
#[macro_export]
macro_rules! args {
    () => { Vec::<$crate::Arg>::new() };
    ($($value:expr),+ $(,)?) => { vec![$($crate::arg($value)),+] };
}

/// A subscribed callback with pointer identity.
///
/// The calling convention is fixed: the emitting [`EventEmitter`] (the
/// receiver context) and the emission's argument slice. Listeners carry no
/// return value; a panicking listener aborts the remaining snapshot of the
/// in-flight emission.
///
/// Equality is identity: two handles are equal iff they share the closure
/// allocation. Intentionally duplicate subscriptions of one listener are
/// allowed; removal always takes the first match.
#[derive(Clone)]
pub struct Listener {
    f: Rc<dyn Fn(&EventEmitter, &[Arg])>,
}

impl Listener {
    /// Wraps a closure as a listener handle.
    pub fn new(f: impl Fn(&EventEmitter, &[Arg]) + 'static) -> Self {
        Self { f: Rc::new(f) }
    }

    /// Identity comparison (shared closure allocation).
    #[inline]
    pub fn ptr_eq(&self, other: &Listener) -> bool {
        Rc::ptr_eq(&self.f, &other.f)
    }

    /// Invokes the callback with `emitter` as the receiver context.
    #[inline]
    pub(crate) fn call(&self, emitter: &EventEmitter, args: &[Arg]) {
        (self.f)(emitter, args);
    }
}

impl PartialEq for Listener {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Listener {}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Listener({:p})", Rc::as_ptr(&self.f))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clone_preserves_identity() {
        let a = Listener::new(|_, _| {});
        let b = a.clone();
        let c = Listener::new(|_, _| {});
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_arg_downcast() {
        let v = arg("hello");
        assert_eq!(v.downcast_ref::<&str>(), Some(&"hello"));
        assert!(v.downcast_ref::<i32>().is_none());
    }

    #[test]
    fn test_args_macro() {
        let empty = args![];
        assert!(empty.is_empty());

        let tuple = args![1i64, "two", 3.0f64];
        assert_eq!(tuple[0].downcast_ref::<i64>(), Some(&1));
        assert_eq!(tuple[1].downcast_ref::<&str>(), Some(&"two"));
        assert_eq!(tuple[2].downcast_ref::<f64>(), Some(&3.0));
    }
}
