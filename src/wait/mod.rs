//! # Wait helpers: composing emitters with futures and streams.
//!
//! Three helpers built purely on the public
//! [`EventEmitter`](crate::EventEmitter) surface:
//! - [`once`] — one-shot cancellable wait for the next emission
//! - [`on`] — cancellable pull stream of emissions
//! - [`forward`] — re-emit a set of names on another emitter
//!
//! ```text
//!   once(&emitter, "msg", opts) ──► OnceWait ──► Result<Vec<Arg>, _>
//!   on(&emitter, "msg", opts)   ──► EventStream (one listener per pull)
//!   forward(&a, &b, names, _)   ──► a.emit(...) re-raised as b.emit(...)
//! ```
//!
//! Cancellation arrives through [`WaitOptions::signal`], an externally
//! owned [`Signal`] capability. Whichever of {event fired, aborted} is
//! observed first wins; the loser's registration is torn down. Dropping a
//! helper before it settles deregisters everything it subscribed.

mod forward;
mod once;
mod stream;

pub use forward::{forward, ForwardOptions};
pub use once::{once, OnceWait};
pub use stream::{on, EventStream};

use std::fmt;
use std::rc::Rc;

use crate::signal::Signal;

/// Options for [`once`] and [`on`].
#[derive(Clone, Default)]
pub struct WaitOptions {
    /// Cancellation handle; aborting it fails the wait with
    /// [`EmitterError::OperationAborted`](crate::EmitterError::OperationAborted).
    pub signal: Option<Rc<dyn Signal>>,
}

impl WaitOptions {
    /// Options carrying a cancellation signal.
    #[must_use]
    pub fn with_signal(signal: Rc<dyn Signal>) -> Self {
        Self {
            signal: Some(signal),
        }
    }
}

impl fmt::Debug for WaitOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WaitOptions")
            .field("signal", &self.signal.is_some())
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod testutil {
    //! An AbortController-style signal for exercising cancellation races.

    use std::cell::{Cell, RefCell};

    use crate::events::Arg;
    use crate::signal::Signal;

    #[derive(Default)]
    pub struct TestSignal {
        aborted: Cell<bool>,
        reason: RefCell<Option<Arg>>,
        observer: RefCell<Option<Box<dyn FnOnce()>>>,
    }

    impl TestSignal {
        /// Transitions to aborted and fires the observer, once.
        pub fn abort(&self, reason: Option<Arg>) {
            if self.aborted.replace(true) {
                return;
            }
            *self.reason.borrow_mut() = reason;
            let observer = self.observer.borrow_mut().take();
            if let Some(observer) = observer {
                observer();
            }
        }
    }

    impl Signal for TestSignal {
        fn is_aborted(&self) -> bool {
            self.aborted.get()
        }

        fn reason(&self) -> Option<Arg> {
            self.reason.borrow().clone()
        }

        fn set_observer(&self, observer: Box<dyn FnOnce()>) {
            *self.observer.borrow_mut() = Some(observer);
        }

        fn clear_observer(&self) {
            self.observer.borrow_mut().take();
        }
    }
}
