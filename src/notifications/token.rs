use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

static TOKEN_SEQ: AtomicU64 = AtomicU64::new(1);

/// Opaque handle to one registration, used to cancel exactly that registration.
///
/// Tokens are never reused within a process, so a stale token can never cancel
/// somebody else's subscription.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionToken(u64);

impl SubscriptionToken {
    pub(crate) fn next() -> Self {
        Self(TOKEN_SEQ.fetch_add(1, AtomicOrdering::Relaxed))
    }

    /// Returns the raw numeric value (for logs).
    #[inline]
    pub fn id(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for SubscriptionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SubscriptionToken({})", self.0)
    }
}

impl fmt::Display for SubscriptionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub#{}", self.0)
    }
}
