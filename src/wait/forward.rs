//! # Forwarding: re-emitting one emitter's events on another.
//!
//! [`forward`] subscribes a listener on the source for each requested name
//! and re-raises every emission on the target, either directly or through
//! a caller-supplied transform. Forwarding lasts for the lifetime of the
//! source's listeners; nothing unsubscribes automatically. Because the
//! registered listeners are synthetic closures, a caller that needs to
//! cancel forwarding later must capture them itself (via
//! [`EventEmitter::listeners`]) — a documented limitation of this surface.

use std::fmt;
use std::rc::Rc;

use crate::events::{Arg, EventEmitter, EventName, Listener};

/// Options for [`forward`].
#[derive(Clone, Default)]
pub struct ForwardOptions {
    /// Replaces the default `to.emit(name, args)` re-raise, e.g. to remap
    /// arguments before re-emission.
    pub emit: Option<Rc<dyn Fn(&EventName, &[Arg])>>,
}

impl ForwardOptions {
    /// Options carrying a transform in place of the direct re-raise.
    #[must_use]
    pub fn with_emit(emit: Rc<dyn Fn(&EventName, &[Arg])>) -> Self {
        Self { emit: Some(emit) }
    }
}

impl fmt::Debug for ForwardOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForwardOptions")
            .field("emit", &self.emit.is_some())
            .finish()
    }
}

/// Re-emits `names` from `from` on `to`.
///
/// # Example
/// ```
/// use eventry::{args, forward, ArgExt, EventEmitter, ForwardOptions, Listener};
///
/// let a = EventEmitter::new();
/// let b = EventEmitter::new();
/// forward(&a, &b, ["ping"], ForwardOptions::default());
///
/// b.on("ping", Listener::new(|_, args| {
///     assert_eq!(args[0].downcast_ref::<u32>(), Some(&1));
/// }));
/// a.emit("ping", &args![1u32]);
/// ```
pub fn forward(
    from: &EventEmitter,
    to: &EventEmitter,
    names: impl IntoIterator<Item = impl Into<EventName>>,
    opts: ForwardOptions,
) {
    for name in names {
        let name = name.into();
        let listener = match &opts.emit {
            Some(custom) => {
                let custom = Rc::clone(custom);
                let name = name.clone();
                Listener::new(move |_, args| custom(&name, args))
            }
            None => {
                let to = to.clone();
                let name = name.clone();
                Listener::new(move |_, args| {
                    to.emit(name.clone(), args);
                })
            }
        };
        from.on(name, listener);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args;
    use crate::events::ArgExt;
    use std::cell::RefCell;

    fn recorder(target: &EventEmitter, name: &'static str) -> Rc<RefCell<Vec<u32>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = {
            let seen = seen.clone();
            Listener::new(move |_, args| {
                seen.borrow_mut()
                    .push(*args[0].downcast_ref::<u32>().unwrap());
            })
        };
        target.on(name, sink);
        seen
    }

    #[test]
    fn test_forward_re_emits_on_target() {
        let a = EventEmitter::new();
        let b = EventEmitter::new();
        forward(&a, &b, ["foo", "bar"], ForwardOptions::default());

        let foo = recorder(&b, "foo");
        let bar = recorder(&b, "bar");

        assert!(a.emit("foo", &args![1u32]));
        assert!(a.emit("bar", &args![2u32]));

        assert_eq!(*foo.borrow(), vec![1]);
        assert_eq!(*bar.borrow(), vec![2]);
    }

    #[test]
    fn test_forward_with_transform() {
        let a = EventEmitter::new();
        let b = EventEmitter::new();

        let transform = {
            let b = b.clone();
            Rc::new(move |name: &EventName, args: &[Arg]| {
                let n = args[0].downcast_ref::<u32>().unwrap();
                b.emit(name.clone(), &args![n * 2]);
            })
        };
        forward(&a, &b, ["foo", "bar"], ForwardOptions::with_emit(transform));

        let foo = recorder(&b, "foo");
        let bar = recorder(&b, "bar");

        a.emit("foo", &args![1u32]);
        a.emit("bar", &args![2u32]);

        assert_eq!(*foo.borrow(), vec![2]);
        assert_eq!(*bar.borrow(), vec![4]);
    }

    #[test]
    fn test_forwarding_is_not_cancelled_automatically() {
        let a = EventEmitter::new();
        let b = EventEmitter::new();
        forward(&a, &b, ["foo"], ForwardOptions::default());

        assert_eq!(a.listener_count("foo"), 1);

        // The synthetic listener can be recovered and removed by hand.
        let synthetic = a.listeners("foo").pop().unwrap();
        a.off("foo", &synthetic);
        assert_eq!(a.listener_count("foo"), 0);
    }

    #[test]
    fn test_forward_without_target_listeners_is_silent() {
        let a = EventEmitter::new();
        let b = EventEmitter::new();
        forward(&a, &b, ["foo"], ForwardOptions::default());

        // The re-raise lands on an empty target slot: no escalation, the
        // source still reports its own delivery.
        assert!(a.emit("foo", &args![1u32]));
        assert_eq!(b.listener_count("foo"), 0);
    }
}
