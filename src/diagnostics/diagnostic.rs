//! # Diagnostics for conditions the center absorbs.
//!
//! Nothing in this crate fails a poster or a subscriber. Misconfigured
//! vocabularies, stale tokens, panicking handlers and dropped receivers are
//! all swallowed where they happen. Each of them is also reported as a
//! [`Diagnostic`] to the registered [`DiagnosticSink`](crate::DiagnosticSink)s,
//! so development builds can detect them.
//!
//! The [`DiagnosticKind`] enum classifies conditions in two groups:
//! - **Translation layer**: typed event could not be turned into a channel name
//! - **Delivery layer**: something went wrong for one subscription or the main queue
//!
//! ## Example
//! ```rust
//! use observable::{Diagnostic, DiagnosticKind};
//!
//! let d = Diagnostic::new(DiagnosticKind::HandlerPanicked)
//!     .with_subject("closure")
//!     .with_reason("boom");
//!
//! assert_eq!(d.kind, DiagnosticKind::HandlerPanicked);
//! assert_eq!(d.reason.as_deref(), Some("boom"));
//! assert_eq!(d.as_label(), "handler_panicked");
//! ```

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::SystemTime;

use crate::handlers::Affinity;
use crate::notifications::{ChannelName, SourceId, SubscriptionToken};

/// Global sequence counter for diagnostic ordering.
static DIAGNOSTIC_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of absorbed conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    // === Translation layer ===
    /// A typed event has no usable channel name; the subscribe/post was dropped.
    ///
    /// Sets:
    /// - `subject`: vocabulary type name
    /// - `reason`: debug rendering of the variant
    /// - `source`: entity instance
    UnresolvedEvent,

    /// A vocabulary failed validation (duplicate or missing channel names).
    /// Every subscribe/post through it is dropped.
    ///
    /// Sets:
    /// - `subject`: vocabulary type name
    /// - `reason`: validation error
    InvalidVocabulary,

    // === Delivery layer ===
    /// `unregister` was called with an unknown or already removed token.
    ///
    /// Sets:
    /// - `token`: the stale token
    StaleSubscription,

    /// A handler panicked; later handlers were still delivered.
    ///
    /// Sets:
    /// - `channel`, `source`, `token`
    /// - `subject`: handler description
    /// - `reason`: panic message
    HandlerPanicked,

    /// A bound-method receiver was dropped; the delivery was a no-op.
    ///
    /// Sets:
    /// - `channel`, `source`, `token`
    /// - `subject`: receiver type name
    ReceiverDropped,

    /// The main execution context is gone; a deferred delivery was dropped.
    ///
    /// Sets:
    /// - `channel`, `source`, `token`
    MainQueueClosed,

    /// The bounded main queue was full; a deferred delivery was dropped.
    ///
    /// Sets:
    /// - `channel`, `source`, `token`
    MainQueueOverflow,
}

impl DiagnosticKind {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            DiagnosticKind::UnresolvedEvent => "event_unresolved",
            DiagnosticKind::InvalidVocabulary => "vocabulary_invalid",
            DiagnosticKind::StaleSubscription => "subscription_stale",
            DiagnosticKind::HandlerPanicked => "handler_panicked",
            DiagnosticKind::ReceiverDropped => "receiver_dropped",
            DiagnosticKind::MainQueueClosed => "main_queue_closed",
            DiagnosticKind::MainQueueOverflow => "main_queue_overflow",
        }
    }
}

/// One absorbed condition with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`DiagnosticKind`]
#[derive(Clone, Debug)]
pub struct Diagnostic {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Classification.
    pub kind: DiagnosticKind,
    /// Channel involved, if any.
    pub channel: Option<ChannelName>,
    /// Source involved, if any.
    pub source: Option<SourceId>,
    /// Subscription involved, if any.
    pub token: Option<SubscriptionToken>,
    /// Handler affinity, if a delivery was involved.
    pub affinity: Option<Affinity>,
    /// Vocabulary, handler or receiver description.
    pub subject: Option<Arc<str>>,
    /// Human-readable reason.
    pub reason: Option<Arc<str>>,
}

impl Diagnostic {
    /// Creates a diagnostic of the given kind with current timestamp and next sequence number.
    pub fn new(kind: DiagnosticKind) -> Self {
        Self {
            seq: DIAGNOSTIC_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            channel: None,
            source: None,
            token: None,
            affinity: None,
            subject: None,
            reason: None,
        }
    }

    #[inline]
    pub fn with_channel(mut self, channel: ChannelName) -> Self {
        self.channel = Some(channel);
        self
    }

    #[inline]
    pub fn with_source(mut self, source: SourceId) -> Self {
        self.source = Some(source);
        self
    }

    #[inline]
    pub fn with_token(mut self, token: SubscriptionToken) -> Self {
        self.token = Some(token);
        self
    }

    #[inline]
    pub fn with_affinity(mut self, affinity: Affinity) -> Self {
        self.affinity = Some(affinity);
        self
    }

    #[inline]
    pub fn with_subject(mut self, subject: impl Into<Arc<str>>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Creates an unresolved-event diagnostic.
    pub fn unresolved_event(vocabulary: &'static str, variant: String, source: SourceId) -> Self {
        Diagnostic::new(DiagnosticKind::UnresolvedEvent)
            .with_subject(vocabulary)
            .with_reason(variant)
            .with_source(source)
    }

    /// Creates a stale-subscription diagnostic.
    pub fn stale_subscription(token: SubscriptionToken) -> Self {
        Diagnostic::new(DiagnosticKind::StaleSubscription).with_token(token)
    }

    #[inline]
    pub fn as_label(&self) -> &'static str {
        self.kind.as_label()
    }

    #[inline]
    pub fn is_delivery_failure(&self) -> bool {
        matches!(
            self.kind,
            DiagnosticKind::HandlerPanicked
                | DiagnosticKind::ReceiverDropped
                | DiagnosticKind::MainQueueClosed
                | DiagnosticKind::MainQueueOverflow
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_increases() {
        let a = Diagnostic::new(DiagnosticKind::StaleSubscription);
        let b = Diagnostic::new(DiagnosticKind::StaleSubscription);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_unresolved_event_fields() {
        let src = SourceId::new();
        let d = Diagnostic::unresolved_event("Door", "Ajar".into(), src);
        assert_eq!(d.kind, DiagnosticKind::UnresolvedEvent);
        assert_eq!(d.subject.as_deref(), Some("Door"));
        assert_eq!(d.reason.as_deref(), Some("Ajar"));
        assert_eq!(d.source, Some(src));
        assert!(!d.is_delivery_failure());
    }
}
