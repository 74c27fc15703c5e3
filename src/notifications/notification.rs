//! # Notifications delivered to handlers.
//!
//! A [`Notification`] is built once per post and shared (by reference, or by
//! `Arc` for deferred deliveries) with every handler of that post.
//!
//! ## Ordering guarantees
//! Each notification has a globally unique sequence number (`seq`) that increases
//! monotonically. Deferred deliveries may run after later posts; use `seq` to
//! restore post order when that matters.
//!
//! ## Example
//! ```rust
//! use observable::{ChannelName, Notification, SourceId};
//!
//! let note = Notification::new(ChannelName::new("changedChannel").unwrap(), SourceId::new())
//!     .with_payload(42_u32);
//!
//! assert_eq!(note.payload::<u32>(), Some(&42));
//! assert_eq!(note.payload::<String>(), None);
//! ```

use std::any::Any;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::SystemTime;

use super::{ChannelName, SourceId};

/// Global sequence counter for notification ordering.
static NOTIFICATION_SEQ: AtomicU64 = AtomicU64::new(0);

/// Untyped payload attached to a post.
///
/// The concrete type is a private contract between poster and subscriber.
pub type Payload = Arc<dyn Any + Send + Sync>;

/// One posted event, as seen by a handler.
#[derive(Clone)]
pub struct Notification {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp of the post.
    pub at: SystemTime,
    /// Channel the event was posted on.
    pub name: ChannelName,
    /// Entity instance that posted the event.
    pub source: SourceId,
    /// Optional payload.
    pub payload: Option<Payload>,
}

impl Notification {
    /// Creates a notification without payload, stamped with the current time and next sequence number.
    pub fn new(name: ChannelName, source: SourceId) -> Self {
        Self {
            seq: NOTIFICATION_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            name,
            source,
            payload: None,
        }
    }

    /// Attaches a payload value.
    #[inline]
    pub fn with_payload<P: Any + Send + Sync>(mut self, payload: P) -> Self {
        self.payload = Some(Arc::new(payload));
        self
    }

    /// Attaches an already shared payload (no extra allocation).
    #[inline]
    pub fn with_shared_payload(mut self, payload: Option<Payload>) -> Self {
        self.payload = payload;
        self
    }

    /// Returns the payload if present and of type `T`.
    pub fn payload<T: Any>(&self) -> Option<&T> {
        self.payload.as_deref()?.downcast_ref::<T>()
    }

    #[inline]
    pub fn has_payload(&self) -> bool {
        self.payload.is_some()
    }
}

impl fmt::Debug for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notification")
            .field("seq", &self.seq)
            .field("name", &self.name)
            .field("source", &self.source)
            .field("payload", &self.payload.as_ref().map(|_| ".."))
            .finish()
    }
}
