//! # observable
//!
//! **observable** lets any type declare a closed set of named events and lets
//! any number of observers subscribe to a specific event on a specific
//! instance. Delivery is synchronous, in-process, best-effort fan-out.
//!
//! It is built in two layers: an untyped, string-keyed [`NotificationCenter`]
//! and a typed [`Observable`] capability that maps each entity's event enum
//! onto it.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │  Television  │   │  Television  │   │     Door     │
//!     │ (source #1)  │   │ (source #2)  │   │ (source #3)  │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            │ post(TelevisionEvent::PoweredOn)    │ post(DoorEvent::Opened)
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Observable (typed → untyped)                                     │
//! │  - EventName::channel_name(event) → "poweredOn"                   │
//! │  - vocabulary validated once per type                             │
//! │  - unresolved events dropped (diagnostic)                         │
//! └─────────────────────────────────┬─────────────────────────────────┘
//!                                   ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  NotificationCenter                                               │
//! │  (channel, source) → [sub1, sub2, ...]   (registration order)     │
//! └──────┬──────────────────┬─────────────────────────┬───────────────┘
//!        ▼                  ▼                         ▼
//!   Closure(fn)      BoundMethod(Weak<R>, fn)   Affinity::Main ──► MainExecutor
//!   (inline)         (inline)                   (queued, FIFO)
//! ```
//!
//! ### Lifecycle of a subscription
//! ```text
//! subscribe ──► live ──┬──► unsubscribe(token)        ──► cancelled
//!                      └──► bound receiver dropped    ──► stale (no-op, pruned)
//! ```
//!
//! ## Features
//! | Area              | Description                                                  | Key types / traits                          |
//! |-------------------|--------------------------------------------------------------|---------------------------------------------|
//! | **Capability**    | Typed subscribe/post scoped to one entity instance.          | [`Observable`], [`EventName`]               |
//! | **Center**        | String-keyed, source-filtered registry and dispatch.         | [`NotificationCenter`], [`Handler`]         |
//! | **Contexts**      | Inline or main-context delivery.                             | [`Affinity`], [`MainExecutor`]              |
//! | **Diagnostics**   | Absorbed failures reported to sinks, never to posters.       | [`DiagnosticSink`], [`Diagnostic`]          |
//! | **Errors**        | Typed errors for registration and vocabulary validation.     | [`ChannelError`]                            |
//! | **Configuration** | Center settings.                                             | [`Config`], [`CenterBuilder`]               |
//!
//! ## Optional features
//! - `logging`: exports a built-in [`LogWriter`] sink that renders diagnostics via `tracing`.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicU32, Ordering};
//! use observable::{event_names, Config, Notification, NotificationCenter, Observable, SourceId};
//!
//! event_names! {
//!     pub enum TelevisionEvent {
//!         ChangedChannel => "changedChannel",
//!         PoweredOff => "poweredOff",
//!         PoweredOn => "poweredOn",
//!     }
//! }
//!
//! struct Television {
//!     center: NotificationCenter,
//!     id: SourceId,
//! }
//!
//! impl Observable for Television {
//!     type Event = TelevisionEvent;
//!     fn center(&self) -> &NotificationCenter { &self.center }
//!     fn source_id(&self) -> SourceId { self.id }
//! }
//!
//! #[derive(Default)]
//! struct Watcher { last: AtomicU32 }
//!
//! impl Watcher {
//!     fn on_channel(&self, n: &Notification) {
//!         if let Some(ch) = n.payload::<u32>() {
//!             self.last.store(*ch, Ordering::SeqCst);
//!         }
//!     }
//! }
//!
//! let center = NotificationCenter::new(Config::default());
//! let tv = Television { center: center.clone(), id: SourceId::new() };
//! let watcher = Arc::new(Watcher::default());
//!
//! let token = tv
//!     .subscribe_method(TelevisionEvent::ChangedChannel, &watcher, Watcher::on_channel)
//!     .expect("vocabulary is valid");
//!
//! tv.post_with(TelevisionEvent::ChangedChannel, 7_u32);
//! assert_eq!(watcher.last.load(Ordering::SeqCst), 7);
//!
//! tv.unsubscribe(token);
//! tv.post_with(TelevisionEvent::ChangedChannel, 9_u32);
//! assert_eq!(watcher.last.load(Ordering::SeqCst), 7);
//! ```
mod core;
mod diagnostics;
mod error;
mod handlers;
mod notifications;
mod observable;

// ---- Public re-exports ----

pub use crate::core::{CenterBuilder, Config, MainExecutor, NotificationCenter};
pub use diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink};
pub use error::ChannelError;
pub use handlers::{Affinity, BoundMethod, Handler};
pub use notifications::{ChannelName, Notification, Payload, SourceId, SubscriptionToken};
pub use observable::{validate_vocabulary, EventName, Observable};

// Optional: expose a simple built-in diagnostic sink (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use diagnostics::LogWriter;

