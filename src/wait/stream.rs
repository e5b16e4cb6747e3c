//! # Pull stream: a lazy sequence of emissions for one name.
//!
//! [`on`] returns an [`EventStream`], a potentially-infinite,
//! non-restartable [`futures::Stream`] of argument tuples. The stream holds
//! exactly one live listener at a time: each pull registers a fresh
//! once-listener, and delivery or cancellation deregisters it before the
//! pull settles. Emissions that happen while no pull is pending are not
//! buffered — they are simply missed.
//!
//! Aborting the signal fails the pending (or next) pull with
//! `OperationAborted`; after yielding that error the stream is fused.
//! Dropping the stream deregisters any pending listener and clears the
//! signal observer.

use std::cell::RefCell;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

use futures::Stream;

use crate::error::EmitterError;
use crate::events::{Arg, EventEmitter, EventName, Listener};
use crate::signal::Signal;
use crate::wait::WaitOptions;

struct StreamState {
    /// Tuple delivered since the last pull, if any.
    ready: Option<Vec<Arg>>,
    /// Abort error waiting to be yielded.
    aborted: Option<EmitterError>,
    waker: Option<Waker>,
    /// The current pull's listener; `None` between pulls.
    live: Option<Listener>,
    emitter: EventEmitter,
    name: EventName,
    signal: Option<Rc<dyn Signal>>,
}

/// Cancellable stream of emissions returned by [`on`].
pub struct EventStream {
    state: Rc<RefCell<StreamState>>,
    done: bool,
}

/// Subscribes to `name` on `emitter` as a pull stream.
///
/// Fails synchronously with
/// [`EmitterError::OperationAborted`] when the options carry a signal that
/// is already aborted; no stream is produced and no listener registered.
///
/// # Example
/// ```
/// use eventry::{args, on, ArgExt, EventEmitter, WaitOptions};
/// use futures::StreamExt;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let emitter = EventEmitter::new();
/// let mut stream = on(&emitter, "tick", WaitOptions::default()).unwrap();
///
/// let pull = stream.next();
/// emitter.emit("tick", &args![1u32]);
///
/// let tuple = pull.await.unwrap().unwrap();
/// assert_eq!(tuple[0].downcast_ref::<u32>(), Some(&1));
/// # }
/// ```
pub fn on(
    emitter: &EventEmitter,
    name: impl Into<EventName>,
    opts: WaitOptions,
) -> Result<EventStream, EmitterError> {
    let name = name.into();

    if let Some(signal) = &opts.signal {
        if signal.is_aborted() {
            return Err(EmitterError::OperationAborted {
                reason: signal.reason(),
            });
        }
    }

    let state = Rc::new(RefCell::new(StreamState {
        ready: None,
        aborted: None,
        waker: None,
        live: None,
        emitter: emitter.clone(),
        name,
        signal: opts.signal.clone(),
    }));

    if let Some(signal) = &opts.signal {
        let weak = Rc::downgrade(&state);
        signal.set_observer(Box::new(move || {
            let Some(state) = weak.upgrade() else { return };
            let (live, emitter, name, waker);
            {
                let mut st = state.borrow_mut();
                let reason = st.signal.take().and_then(|signal| signal.reason());
                st.aborted = Some(EmitterError::OperationAborted { reason });
                live = st.live.take();
                emitter = st.emitter.clone();
                name = st.name.clone();
                waker = st.waker.take();
            }
            if let Some(listener) = live {
                emitter.off(name, &listener);
            }
            if let Some(waker) = waker {
                waker.wake();
            }
        }));
    }

    Ok(EventStream { state, done: false })
}

impl Stream for EventStream {
    type Item = Result<Vec<Arg>, EmitterError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = &mut *self;
        if this.done {
            return Poll::Ready(None);
        }

        loop {
            {
                let mut st = this.state.borrow_mut();
                if let Some(args) = st.ready.take() {
                    return Poll::Ready(Some(Ok(args)));
                }
                if let Some(err) = st.aborted.take() {
                    drop(st);
                    this.done = true;
                    return Poll::Ready(Some(Err(err)));
                }
                if st.live.is_some() {
                    st.waker = Some(cx.waker().clone());
                    return Poll::Pending;
                }
            }

            // Fresh listener for this pull. Registration is performed with
            // the state borrow released: the newListener meta-event may run
            // arbitrary handlers, so loop back and re-check afterwards.
            let listener = {
                let weak = Rc::downgrade(&this.state);
                Listener::new(move |_, args| {
                    let Some(state) = weak.upgrade() else { return };
                    let waker;
                    {
                        let mut st = state.borrow_mut();
                        if st.live.take().is_none() {
                            // Lost the race against an abort teardown.
                            return;
                        }
                        st.ready = Some(args.to_vec());
                        waker = st.waker.take();
                    }
                    if let Some(waker) = waker {
                        waker.wake();
                    }
                })
            };
            let (emitter, name) = {
                let mut st = this.state.borrow_mut();
                st.live = Some(listener.clone());
                (st.emitter.clone(), st.name.clone())
            };
            emitter.once(name, listener);
        }
    }
}

impl Drop for EventStream {
    fn drop(&mut self) {
        let (live, signal, emitter, name);
        {
            let mut st = self.state.borrow_mut();
            live = st.live.take();
            signal = st.signal.take();
            emitter = st.emitter.clone();
            name = st.name.clone();
        }
        if let Some(listener) = live {
            emitter.off(name, &listener);
        }
        if let Some(signal) = signal {
            signal.clear_observer();
        }
    }
}

impl std::fmt::Debug for EventStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let st = self.state.borrow();
        f.debug_struct("EventStream")
            .field("name", &st.name)
            .field("pulling", &st.live.is_some())
            .field("done", &self.done)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args;
    use crate::events::ArgExt;
    use crate::wait::testutil::TestSignal;
    use futures::task::noop_waker;

    fn poll(stream: &mut EventStream) -> Poll<Option<Result<Vec<Arg>, EmitterError>>> {
        let waker = noop_waker();
        let mut cx = Context::from_waker(&waker);
        Pin::new(stream).poll_next(&mut cx)
    }

    fn expect_tuple(poll: Poll<Option<Result<Vec<Arg>, EmitterError>>>) -> Vec<Arg> {
        match poll {
            Poll::Ready(Some(Ok(args))) => args,
            other => panic!("expected a delivered tuple, got {other:?}"),
        }
    }

    #[test]
    fn test_each_pull_registers_one_listener() {
        let emitter = EventEmitter::new();
        let mut stream = on(&emitter, "foo", WaitOptions::default()).unwrap();

        // Lazy: nothing is registered until the first pull.
        assert_eq!(emitter.listener_count("foo"), 0);

        assert!(poll(&mut stream).is_pending());
        assert_eq!(emitter.listener_count("foo"), 1);

        // Re-polling does not stack listeners.
        assert!(poll(&mut stream).is_pending());
        assert_eq!(emitter.listener_count("foo"), 1);
    }

    #[test]
    fn test_successive_pulls_deliver_successive_emissions() {
        let emitter = EventEmitter::new();
        let mut stream = on(&emitter, "foo", WaitOptions::default()).unwrap();

        for i in 1u32..=3 {
            assert!(poll(&mut stream).is_pending());
            assert!(emitter.emit("foo", &args![i]));

            let tuple = expect_tuple(poll(&mut stream));
            assert_eq!(tuple[0].downcast_ref::<u32>(), Some(&i));

            // The pull's listener deregistered on delivery.
            assert_eq!(emitter.listener_count("foo"), 0);
        }
    }

    #[test]
    fn test_emission_between_pulls_is_missed() {
        let emitter = EventEmitter::new();
        let mut stream = on(&emitter, "foo", WaitOptions::default()).unwrap();

        // No pull pending: no listener, the emission goes nowhere.
        assert!(!emitter.emit("foo", &args![1u32]));

        assert!(poll(&mut stream).is_pending());
        assert!(emitter.emit("foo", &args![2u32]));
        let tuple = expect_tuple(poll(&mut stream));
        assert_eq!(tuple[0].downcast_ref::<u32>(), Some(&2));
    }

    #[test]
    fn test_abort_fails_the_pull_then_fuses() {
        let emitter = EventEmitter::new();
        let signal = Rc::new(TestSignal::default());
        let mut stream =
            on(&emitter, "foo", WaitOptions::with_signal(signal.clone())).unwrap();

        assert!(poll(&mut stream).is_pending());
        assert_eq!(emitter.listener_count("foo"), 1);

        signal.abort(Some(crate::arg("cancel")));
        assert_eq!(emitter.listener_count("foo"), 0);

        match poll(&mut stream) {
            Poll::Ready(Some(Err(EmitterError::OperationAborted { reason }))) => {
                assert_eq!(reason.unwrap().downcast_ref::<&str>(), Some(&"cancel"));
            }
            other => panic!("expected OperationAborted, got {other:?}"),
        }

        assert!(matches!(poll(&mut stream), Poll::Ready(None)));
    }

    #[test]
    fn test_already_aborted_signal_fails_synchronously() {
        let emitter = EventEmitter::new();
        let signal = Rc::new(TestSignal::default());
        signal.abort(Some(crate::arg("cancel")));

        match on(&emitter, "foo", WaitOptions::with_signal(signal)) {
            Err(EmitterError::OperationAborted { reason }) => {
                assert_eq!(reason.unwrap().downcast_ref::<&str>(), Some(&"cancel"));
            }
            Ok(_) => panic!("expected a synchronous abort"),
            Err(other) => panic!("expected OperationAborted, got {other:?}"),
        }
        assert_eq!(emitter.listener_count("foo"), 0);
    }

    #[test]
    fn test_drop_deregisters_pending_listener() {
        let emitter = EventEmitter::new();
        let mut stream = on(&emitter, "foo", WaitOptions::default()).unwrap();

        assert!(poll(&mut stream).is_pending());
        assert_eq!(emitter.listener_count("foo"), 1);

        drop(stream);
        assert_eq!(emitter.listener_count("foo"), 0);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_next_resolves_when_event_fires_first() {
        use futures::StreamExt;
        use std::future::Future;

        let emitter = EventEmitter::new();
        let mut stream = on(&emitter, "foo", WaitOptions::default()).unwrap();

        let pull = stream.next();
        futures::pin_mut!(pull);

        let waker = noop_waker();
        let mut cx = Context::from_waker(&waker);
        assert!(pull.as_mut().poll(&mut cx).is_pending());

        emitter.emit("foo", &args![7u32]);

        let tuple = pull.await.unwrap().unwrap();
        assert_eq!(tuple[0].downcast_ref::<u32>(), Some(&7));
    }
}
