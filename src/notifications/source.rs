//! # Source identity.
//!
//! Every observable entity instance owns a [`SourceId`]. The center keys
//! subscriptions by `(channel, source)`, so two instances of the same entity
//! type never see each other's events.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

/// Global counter for source identities.
static SOURCE_SEQ: AtomicU64 = AtomicU64::new(1);

/// Opaque, process-unique identity of an event source.
///
/// Allocate one per entity instance and keep it for the lifetime of the entity.
/// `Default` allocates a **fresh** id, so `#[derive(Default)]` on an entity gives
/// every instance its own identity. Cloning an entity that stores its id copies
/// the identity as well; allocate a new one if the clone must be a distinct source.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(u64);

impl SourceId {
    /// Allocates a new, never-before-seen identity.
    pub fn new() -> Self {
        Self(SOURCE_SEQ.fetch_add(1, AtomicOrdering::Relaxed))
    }

    /// Returns the raw numeric value (for logs).
    #[inline]
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl Default for SourceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SourceId({})", self.0)
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "source#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let a = SourceId::new();
        let b = SourceId::default();
        assert_ne!(a, b);
        assert!(b.as_u64() > a.as_u64());
    }
}
