//! # One-shot wait: a future for the next emission of one name.
//!
//! [`once`] registers a once-listener and resolves with the emission's
//! argument tuple. Three outcomes compete; the first observed wins and
//! tears the others down:
//! - the named event fires → `Ok(args)`;
//! - the conventional `error` event fires first (when waiting for any
//!   other name) → `Err(ErrorEvent)` carrying the error payload;
//! - the signal aborts → `Err(OperationAborted)` carrying the reason.
//!
//! A signal that is already aborted at call time settles the future
//! immediately; no listener is ever registered. Dropping an unsettled
//! future deregisters everything it subscribed.

use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

use crate::error::EmitterError;
use crate::events::{Arg, EventEmitter, EventName, Listener};
use crate::signal::Signal;
use crate::wait::WaitOptions;

/// Which competitor settled the wait.
#[derive(Clone, Copy)]
enum Won {
    Event,
    ErrorEvent,
    Abort,
}

struct WaitState {
    result: Option<Result<Vec<Arg>, EmitterError>>,
    waker: Option<Waker>,
    emitter: EventEmitter,
    name: EventName,
    /// The once-listener awaiting the named event.
    target: Option<Listener>,
    /// The once-listener tapping `error`, absent when waiting for `error`.
    error_tap: Option<Listener>,
    signal: Option<Rc<dyn Signal>>,
}

/// Settles the wait exactly once and tears down the losing registrations.
///
/// The winning listener has already auto-deregistered (once semantics) or,
/// for an abort, already fired its one-shot observer — so only the losers
/// are touched here.
fn settle(state: &Rc<RefCell<WaitState>>, won: Won, result: Result<Vec<Arg>, EmitterError>) {
    let (waker, target, error_tap, signal, emitter, name);
    {
        let mut st = state.borrow_mut();
        if st.result.is_some() {
            return;
        }
        st.result = Some(result);
        waker = st.waker.take();
        target = st.target.take();
        error_tap = st.error_tap.take();
        signal = st.signal.take();
        emitter = st.emitter.clone();
        name = st.name.clone();
    }

    match won {
        Won::Event => {
            if let Some(tap) = error_tap {
                emitter.off(EventName::ERROR, &tap);
            }
        }
        Won::ErrorEvent => {
            if let Some(target) = target {
                emitter.off(name, &target);
            }
        }
        Won::Abort => {
            if let Some(target) = target {
                emitter.off(name, &target);
            }
            if let Some(tap) = error_tap {
                emitter.off(EventName::ERROR, &tap);
            }
        }
    }

    if let Some(signal) = signal {
        if !matches!(won, Won::Abort) {
            signal.clear_observer();
        }
    }
    if let Some(waker) = waker {
        waker.wake();
    }
}

/// Cancellable one-shot wait returned by [`once`].
///
/// Resolves with the first matching emission's argument tuple. Exactly one
/// of resolve/reject occurs, exactly once.
pub struct OnceWait {
    state: Rc<RefCell<WaitState>>,
}

impl Future for OnceWait {
    type Output = Result<Vec<Arg>, EmitterError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut st = self.state.borrow_mut();
        if let Some(result) = st.result.take() {
            return Poll::Ready(result);
        }
        st.waker = Some(cx.waker().clone());
        Poll::Pending
    }
}

impl Drop for OnceWait {
    fn drop(&mut self) {
        let (target, error_tap, signal, emitter, name);
        {
            let mut st = self.state.borrow_mut();
            target = st.target.take();
            error_tap = st.error_tap.take();
            signal = st.signal.take();
            emitter = st.emitter.clone();
            name = st.name.clone();
        }
        if let Some(target) = target {
            emitter.off(name, &target);
        }
        if let Some(tap) = error_tap {
            emitter.off(EventName::ERROR, &tap);
        }
        if let Some(signal) = signal {
            signal.clear_observer();
        }
    }
}

impl std::fmt::Debug for OnceWait {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let st = self.state.borrow();
        f.debug_struct("OnceWait")
            .field("name", &st.name)
            .field("settled", &st.result.is_some())
            .finish()
    }
}

/// Waits for the next emission of `name` on `emitter`.
///
/// See the module docs for the outcome races. If the options carry a
/// signal that is already aborted, the returned future is born settled
/// with [`EmitterError::OperationAborted`] and registers nothing.
///
/// # Example
/// ```
/// use eventry::{args, once, ArgExt, EventEmitter, WaitOptions};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let emitter = EventEmitter::new();
/// let wait = once(&emitter, "hello", WaitOptions::default());
///
/// emitter.emit("hello", &args!["world"]);
///
/// let tuple = wait.await.unwrap();
/// assert_eq!(tuple[0].downcast_ref::<&str>(), Some(&"world"));
/// # }
/// ```
pub fn once(emitter: &EventEmitter, name: impl Into<EventName>, opts: WaitOptions) -> OnceWait {
    let name = name.into();

    if let Some(signal) = &opts.signal {
        if signal.is_aborted() {
            return OnceWait {
                state: Rc::new(RefCell::new(WaitState {
                    result: Some(Err(EmitterError::OperationAborted {
                        reason: signal.reason(),
                    })),
                    waker: None,
                    emitter: emitter.clone(),
                    name,
                    target: None,
                    error_tap: None,
                    signal: None,
                })),
            };
        }
    }

    let state = Rc::new(RefCell::new(WaitState {
        result: None,
        waker: None,
        emitter: emitter.clone(),
        name: name.clone(),
        target: None,
        error_tap: None,
        signal: opts.signal.clone(),
    }));

    let target = {
        let weak = Rc::downgrade(&state);
        Listener::new(move |_, args| {
            if let Some(state) = weak.upgrade() {
                settle(&state, Won::Event, Ok(args.to_vec()));
            }
        })
    };
    emitter.once(name.clone(), target.clone());
    state.borrow_mut().target = Some(target);

    if !name.is_error() {
        let tap = {
            let weak = Rc::downgrade(&state);
            Listener::new(move |_, args| {
                if let Some(state) = weak.upgrade() {
                    let cause = args.first().cloned();
                    settle(&state, Won::ErrorEvent, Err(EmitterError::ErrorEvent { cause }));
                }
            })
        };
        emitter.once(EventName::ERROR, tap.clone());
        // A newListener handler may have settled the wait reentrantly
        // while the tap was being registered; the tap must not outlive
        // the settlement.
        if state.borrow().result.is_some() {
            emitter.off(EventName::ERROR, &tap);
        } else {
            state.borrow_mut().error_tap = Some(tap);
        }
    }

    if state.borrow().result.is_some() {
        return OnceWait { state };
    }

    if let Some(signal) = &opts.signal {
        let weak = Rc::downgrade(&state);
        signal.set_observer(Box::new(move || {
            if let Some(state) = weak.upgrade() {
                let reason = state
                    .borrow()
                    .signal
                    .as_ref()
                    .and_then(|signal| signal.reason());
                settle(&state, Won::Abort, Err(EmitterError::OperationAborted { reason }));
            }
        }));
    }

    OnceWait { state }
}
