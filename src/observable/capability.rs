//! # The Observable capability.
//!
//! Implement [`Observable`] for an entity (three items: the event type, the
//! center, the source id) and it acquires `subscribe`, `subscribe_method`,
//! `post` and `unsubscribe`, scoped to that instance.
//!
//! ## Architecture
//! ```text
//! entity.post(Event::X, payload)
//!     └─► resolve(Event::X)
//!           ├─ vocabulary rejected  → dropped (diagnostic reported once)
//!           ├─ no channel name      → dropped (UnresolvedEvent diagnostic)
//!           └─ "x" ──► center.dispatch("x", entity.source_id(), payload)
//!
//! entity.subscribe(Event::X, handler)
//!     └─► resolve(Event::X) ──► center.register("x", entity.source_id(), handler, affinity)
//!                                  └─► Some(SubscriptionToken)   (None if unresolved)
//! ```
//!
//! ## Rules
//! - Translation failures never surface: subscribe returns `None`, post is dropped.
//! - The entity is only borrowed for the duration of each call.
//!
//! ## Example
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use observable::{event_names, NotificationCenter, Observable, SourceId};
//!
//! event_names! {
//!     pub enum DoorEvent {
//!         Opened => "opened",
//!         Closed => "closed",
//!     }
//! }
//!
//! struct Door {
//!     center: NotificationCenter,
//!     id: SourceId,
//! }
//!
//! impl Observable for Door {
//!     type Event = DoorEvent;
//!     fn center(&self) -> &NotificationCenter { &self.center }
//!     fn source_id(&self) -> SourceId { self.id }
//! }
//!
//! let door = Door { center: NotificationCenter::default(), id: SourceId::new() };
//! let log = Arc::new(Mutex::new(Vec::new()));
//!
//! let sink = log.clone();
//! door.subscribe(DoorEvent::Opened, move |n| {
//!     sink.lock().unwrap().push(n.payload::<&str>().copied());
//! });
//!
//! door.post_with(DoorEvent::Opened, "front");
//! door.post(DoorEvent::Closed);
//!
//! assert_eq!(*log.lock().unwrap(), vec![Some("front")]);
//! ```

use std::any::{type_name, Any};
use std::sync::Arc;

use tracing::{debug, trace};

use crate::core::NotificationCenter;
use crate::diagnostics::Diagnostic;
use crate::handlers::{Affinity, Handler};
use crate::notifications::{Notification, Payload, SourceId, SubscriptionToken};
use crate::observable::EventName;

/// Typed publish/subscribe for one entity instance.
///
/// Only `Event`, [`center`](Self::center) and [`source_id`](Self::source_id)
/// are required; everything else is provided.
pub trait Observable {
    /// The entity's event vocabulary.
    type Event: EventName;

    /// The center this entity posts through.
    fn center(&self) -> &NotificationCenter;

    /// The identity of this instance. Must stay the same for the instance's lifetime.
    fn source_id(&self) -> SourceId;

    /// Subscribes a closure to `event` on this instance, with the center's default affinity.
    ///
    /// Returns `None` if `event` cannot be resolved to a channel name.
    fn subscribe<F>(&self, event: Self::Event, handler: F) -> Option<SubscriptionToken>
    where
        F: Fn(&Notification) + Send + Sync + 'static,
    {
        let affinity = self.center().config().default_affinity;
        self.subscribe_on(event, affinity, handler)
    }

    /// Subscribes a closure to `event` on this instance, delivered on `affinity`.
    fn subscribe_on<F>(
        &self,
        event: Self::Event,
        affinity: Affinity,
        handler: F,
    ) -> Option<SubscriptionToken>
    where
        F: Fn(&Notification) + Send + Sync + 'static,
    {
        register(self, event, Handler::closure(handler), affinity)
    }

    /// Subscribes `receiver.method` to `event` on this instance, with the center's default affinity.
    ///
    /// The receiver is held weakly; once it is dropped, deliveries to it are no-ops
    /// and the subscription is pruned.
    fn subscribe_method<R, M>(
        &self,
        event: Self::Event,
        receiver: &Arc<R>,
        method: M,
    ) -> Option<SubscriptionToken>
    where
        R: Send + Sync + 'static,
        M: Fn(&R, &Notification) + Send + Sync + 'static,
    {
        let affinity = self.center().config().default_affinity;
        self.subscribe_method_on(event, affinity, receiver, method)
    }

    /// Subscribes `receiver.method` to `event` on this instance, delivered on `affinity`.
    fn subscribe_method_on<R, M>(
        &self,
        event: Self::Event,
        affinity: Affinity,
        receiver: &Arc<R>,
        method: M,
    ) -> Option<SubscriptionToken>
    where
        R: Send + Sync + 'static,
        M: Fn(&R, &Notification) + Send + Sync + 'static,
    {
        register(self, event, Handler::bound(receiver, method), affinity)
    }

    /// Posts `event` without payload.
    fn post(&self, event: Self::Event) {
        dispatch(self, event, None);
    }

    /// Posts `event` with `payload`.
    fn post_with<P>(&self, event: Self::Event, payload: P)
    where
        P: Any + Send + Sync,
    {
        dispatch(self, event, Some(Arc::new(payload)));
    }

    /// Posts `event` with an already shared (or absent) payload.
    fn post_shared(&self, event: Self::Event, payload: Option<Payload>) {
        dispatch(self, event, payload);
    }

    /// Cancels a subscription made through this entity. Stale tokens are a no-op.
    fn unsubscribe(&self, token: SubscriptionToken) -> bool {
        self.center().unregister(token)
    }
}

/// Resolves `event` to its channel name, or `None` (reported) if it has none.
fn resolve<O>(owner: &O, event: O::Event) -> Option<&'static str>
where
    O: Observable + ?Sized,
{
    let center = owner.center();
    if !center.admit_vocabulary::<O::Event>() {
        trace!(
            vocabulary = type_name::<O::Event>(),
            event = ?event,
            "vocabulary rejected; dropping"
        );
        return None;
    }

    match event.channel_name() {
        Some(name) if !name.trim().is_empty() => Some(name),
        _ => {
            debug!(
                vocabulary = type_name::<O::Event>(),
                event = ?event,
                source = %owner.source_id(),
                "event has no channel name; dropping"
            );
            center.report(Diagnostic::unresolved_event(
                type_name::<O::Event>(),
                format!("{event:?}"),
                owner.source_id(),
            ));
            None
        }
    }
}

fn register<O>(
    owner: &O,
    event: O::Event,
    handler: Handler,
    affinity: Affinity,
) -> Option<SubscriptionToken>
where
    O: Observable + ?Sized,
{
    let name = resolve(owner, event)?;
    owner
        .center()
        .register(name, owner.source_id(), handler, affinity)
        .ok()
}

fn dispatch<O>(owner: &O, event: O::Event, payload: Option<Payload>)
where
    O: Observable + ?Sized,
{
    if let Some(name) = resolve(owner, event) {
        owner.center().dispatch(name, owner.source_id(), payload);
    }
}
