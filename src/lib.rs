//! # eventry
//!
//! **Eventry** is a synchronous, same-thread event emitter for Rust.
//!
//! It provides a registry that lets independent pieces of code subscribe
//! named callbacks ("listeners") to named events on an emitter, and lets
//! any holder of that emitter raise ("emit") an event synchronously to all
//! current subscribers — plus cancellable async helpers composed on top.
//!
//! ## Architecture
//! ```text
//!        on / once / prepend* / off / remove_all
//!                          │
//!                          ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │ EventEmitter (cheap-clone handle, Rc-shared registry)        │
//! │  - slots: EventName ─► Slot [(listener, once), ...]          │
//! │  - meta-events: newListener (before add),                    │
//! │                 removeListener (after removal)               │
//! │  - `error` with no listeners escalates (panics)              │
//! └──────┬──────────────────────┬────────────────────┬───────────┘
//!        │ emit(name, args)     │                    │
//!        ▼                      ▼                    ▼
//!   snapshot of slot      once(&e, name, opts)  on(&e, name, opts)
//!   fired in order        ─► OnceWait future    ─► EventStream
//!   (reentrancy-safe)        (abort / error         (one listener
//!                             races settled)         per pull)
//!
//!   forward(&a, &b, names, opts): a.emit(...) re-raised on b
//! ```
//!
//! ## Emission contract
//! `emit` snapshots the listener list before iterating, so listeners may
//! freely add or remove listeners on the same name from inside their own
//! invocation: additions join the *next* emission, removals act on the
//! live slot, and a `once` entry leaves the live slot before its callback
//! runs. See [`EventEmitter::emit`] for the full contract.
//!
//! ## Features
//! | Area           | Description                                         | Key items                                    |
//! |----------------|-----------------------------------------------------|----------------------------------------------|
//! | **Registry**   | Subscribe, unsubscribe, emit, introspect.           | [`EventEmitter`], [`Listener`]               |
//! | **Keys**       | String names or opaque symbols.                     | [`EventName`], [`Symbol`]                    |
//! | **Arguments**  | Dynamically typed emission payloads.                | [`Arg`], [`Payload`], [`args!`](crate::args) |
//! | **Waiting**    | One-shot and streaming waits with cancellation.     | [`once`], [`on`], [`WaitOptions`]            |
//! | **Forwarding** | Cross-emitter re-emission, optionally transformed.  | [`forward`], [`ForwardOptions`]              |
//! | **Errors**     | Abort vs. error-event vs. unhandled-error taxonomy. | [`EmitterError`], [`Signal`]                 |
//!
//! ## Example
//! ```rust
//! use eventry::{args, once, ArgExt, EventEmitter, Listener, WaitOptions};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let emitter = EventEmitter::new();
//!
//!     emitter.on("hello", Listener::new(|_, args| {
//!         let who = args[0].downcast_ref::<&str>().unwrap();
//!         println!("hello {who}");
//!     }));
//!
//!     let wait = once(&emitter, "hello", WaitOptions::default());
//!
//!     emitter.emit("hello", &args!["world"]);
//!
//!     let tuple = wait.await.unwrap();
//!     assert_eq!(tuple[0].downcast_ref::<&str>(), Some(&"world"));
//! }
//! ```
//!
//! ## Concurrency model
//! Single-threaded and cooperative: every listener runs synchronously on
//! the calling thread, reentrant emission included. The emitter handle is
//! `!Send` by construction; there are no locks because there is no
//! concurrent mutation. The wait helpers suspend cooperatively and consume
//! cancellation through the externally owned [`Signal`] capability — this
//! crate never creates cancellation handles, only observes them.

mod error;
mod events;
mod signal;
mod wait;

// ---- Public re-exports ----

pub use error::EmitterError;
pub use events::{
    arg, default_max_listeners, listener_count, set_default_max_listeners, Arg, ArgExt,
    EventEmitter, EventName, Listener, Payload, Symbol, DEFAULT_MAX_LISTENERS,
};
pub use signal::Signal;
pub use wait::{forward, on, once, EventStream, ForwardOptions, OnceWait, WaitOptions};
