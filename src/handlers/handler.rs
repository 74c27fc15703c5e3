//! # Handler representations.
//!
//! A [`Handler`] is the delivery target of a subscription. Two shapes are
//! stored side by side in the same registry:
//!
//! ```text
//! Handler::Closure(Fn(&Notification))
//!     └─► called directly
//!
//! Handler::BoundMethod { Weak<receiver>, method }
//!     ├─► receiver alive   → method(&receiver, &Notification)
//!     └─► receiver dropped → no-op (reported as ReceiverDropped)
//! ```
//!
//! The bound method is a statically typed function reference captured at
//! registration time; there is no lookup by name at delivery time. The
//! receiver is held weakly, so a subscription never keeps its subscriber alive.

use std::any::{type_name, Any};
use std::fmt;
use std::sync::{Arc, Weak};

use crate::notifications::Notification;

type ClosureFn = dyn Fn(&Notification) + Send + Sync;
type MethodFn = dyn Fn(&(dyn Any + Send + Sync), &Notification) + Send + Sync;

/// Result of calling a handler once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Invocation {
    /// The handler ran.
    Called,
    /// The bound receiver is gone; nothing ran.
    ReceiverDropped,
}

/// Delivery target of a subscription.
pub enum Handler {
    /// Plain closure.
    Closure(Arc<ClosureFn>),
    /// Method bound to a weakly held receiver.
    BoundMethod(BoundMethod),
}

impl Handler {
    /// Wraps a closure.
    pub fn closure<F>(f: F) -> Self
    where
        F: Fn(&Notification) + Send + Sync + 'static,
    {
        Handler::Closure(Arc::new(f))
    }

    /// Binds `method` to `receiver`.
    ///
    /// `method` is usually a method path such as `Watcher::on_channel_change`.
    pub fn bound<R, M>(receiver: &Arc<R>, method: M) -> Self
    where
        R: Send + Sync + 'static,
        M: Fn(&R, &Notification) + Send + Sync + 'static,
    {
        Handler::BoundMethod(BoundMethod::new(receiver, method))
    }

    /// Short description for logs and diagnostics: `"closure"` or the receiver type name.
    pub fn describe(&self) -> &'static str {
        match self {
            Handler::Closure(_) => "closure",
            Handler::BoundMethod(m) => m.receiver_type(),
        }
    }

    /// Returns `false` once a bound receiver has been dropped. Closures are always alive.
    pub fn is_alive(&self) -> bool {
        match self {
            Handler::Closure(_) => true,
            Handler::BoundMethod(m) => m.is_alive(),
        }
    }

    pub(crate) fn call(&self, note: &Notification) -> Invocation {
        match self {
            Handler::Closure(f) => {
                f(note);
                Invocation::Called
            }
            Handler::BoundMethod(m) => m.call(note),
        }
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handler::Closure(_) => f.write_str("Handler::Closure"),
            Handler::BoundMethod(m) => f
                .debug_struct("Handler::BoundMethod")
                .field("receiver", &m.receiver_type)
                .field("alive", &m.is_alive())
                .finish(),
        }
    }
}

/// A typed method bound to a weakly held receiver.
pub struct BoundMethod {
    receiver: Weak<dyn Any + Send + Sync>,
    receiver_type: &'static str,
    method: Box<MethodFn>,
}

impl BoundMethod {
    /// Binds `method` to `receiver` without taking ownership of it.
    pub fn new<R, M>(receiver: &Arc<R>, method: M) -> Self
    where
        R: Send + Sync + 'static,
        M: Fn(&R, &Notification) + Send + Sync + 'static,
    {
        let weak: Weak<R> = Arc::downgrade(receiver);
        Self {
            receiver: weak,
            receiver_type: type_name::<R>(),
            method: Box::new(move |any: &(dyn Any + Send + Sync), note: &Notification| {
                if let Some(r) = any.downcast_ref::<R>() {
                    method(r, note);
                }
            }),
        }
    }

    #[inline]
    pub fn receiver_type(&self) -> &'static str {
        self.receiver_type
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.receiver.strong_count() > 0
    }

    fn call(&self, note: &Notification) -> Invocation {
        match self.receiver.upgrade() {
            Some(receiver) => {
                (self.method)(&*receiver, note);
                Invocation::Called
            }
            None => Invocation::ReceiverDropped,
        }
    }
}
