//! Error types for the eventry crate.
//!
//! This module defines [`EmitterError`], the single error enum surfaced by
//! the async wait helpers and by the unhandled-`error` escalation path:
//!
//! - [`EmitterError::OperationAborted`] — a wait was cancelled through its
//!   [`Signal`](crate::Signal) before the event fired.
//! - [`EmitterError::ErrorEvent`] — the conventional `error` event fired
//!   while a wait for a *different* event was pending.
//! - [`EmitterError::UnhandledError`] — `error` was emitted with zero
//!   listeners registered; used as the panic message of
//!   [`EventEmitter::emit`](crate::EventEmitter::emit).
//!
//! Cancellation is deliberately a distinct variant so callers can test for
//! abort vs. business-logic failure without string matching.

use thiserror::Error;

use crate::events::Arg;

/// # Errors produced by the eventry wait helpers.
///
/// All variants are same-thread values: argument payloads are reference
/// counted with [`std::rc::Rc`] and do not cross threads.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum EmitterError {
    /// The wait was cancelled through its signal before the event fired.
    #[error("operation was aborted (reason: {reason:?})")]
    OperationAborted {
        /// The abort reason reported by the signal, if any.
        reason: Option<Arg>,
    },

    /// The `error` event fired while waiting for a different event.
    #[error("'error' event fired while waiting (cause: {cause:?})")]
    ErrorEvent {
        /// First argument of the `error` emission, if any.
        cause: Option<Arg>,
    },

    /// `error` was emitted with no listeners registered.
    #[error("unhandled 'error' event (cause: {cause:?})")]
    UnhandledError {
        /// First argument of the `error` emission, if any.
        cause: Option<Arg>,
    },
}

impl EmitterError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use eventry::EmitterError;
    ///
    /// let err = EmitterError::OperationAborted { reason: None };
    /// assert_eq!(err.as_label(), "operation_aborted");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            EmitterError::OperationAborted { .. } => "operation_aborted",
            EmitterError::ErrorEvent { .. } => "error_event",
            EmitterError::UnhandledError { .. } => "unhandled_error",
        }
    }

    /// True if this error represents a cancelled wait.
    ///
    /// # Example
    /// ```
    /// use eventry::EmitterError;
    ///
    /// let err = EmitterError::OperationAborted { reason: None };
    /// assert!(err.is_aborted());
    ///
    /// let err = EmitterError::ErrorEvent { cause: None };
    /// assert!(!err.is_aborted());
    /// ```
    pub fn is_aborted(&self) -> bool {
        matches!(self, EmitterError::OperationAborted { .. })
    }

    /// Returns the wrapped payload: the abort reason or the `error` cause.
    pub fn payload(&self) -> Option<&Arg> {
        match self {
            EmitterError::OperationAborted { reason } => reason.as_ref(),
            EmitterError::ErrorEvent { cause } => cause.as_ref(),
            EmitterError::UnhandledError { cause } => cause.as_ref(),
        }
    }
}
