//! # Cancellation capability consumed by the wait helpers.
//!
//! [`Signal`] is the contract a cancellation handle must satisfy to be
//! usable with [`once`](crate::once) and [`on`](crate::on). The crate never
//! creates or owns such handles — it only consumes them:
//!
//! - a synchronously readable aborted flag and reason,
//! - registration of exactly **one** observer, invoked at most once when the
//!   signal transitions to aborted, with a way to deregister it.
//!
//! Each wait helper reads the flag once at construction and installs at most
//! one observer for the pending phase; whichever of {event fired, aborted}
//! is observed first wins, and the loser's registration is torn down.

use crate::events::Arg;

/// Contract for an externally owned cancellation handle.
///
/// Implementations are same-thread objects; the observer is invoked
/// synchronously on the thread that aborts the signal.
pub trait Signal {
    /// True once the signal has been aborted.
    fn is_aborted(&self) -> bool;

    /// The abort reason, if the signal carries one.
    ///
    /// Only meaningful after [`Signal::is_aborted`] returns true (or from
    /// inside the observer).
    fn reason(&self) -> Option<Arg>;

    /// Installs the single abort observer, replacing any previous one.
    ///
    /// The observer must be invoked at most once, when the signal becomes
    /// aborted. Implementations must not invoke it if the signal is already
    /// aborted at registration time — callers check the flag first.
    fn set_observer(&self, observer: Box<dyn FnOnce()>);

    /// Removes the installed observer, if any.
    fn clear_observer(&self);
}
