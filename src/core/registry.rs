//! # Subscription registry.
//!
//! Maps `(channel, source)` keys to ordered subscription lists, plus a reverse
//! index from token to key so cancellation does not scan.
//!
//! ## Architecture
//! ```text
//! by_key:   (ChannelName, SourceId) → [Arc<Subscription>, ...]   (registration order)
//! by_token: SubscriptionToken       → (ChannelName, SourceId)
//! ```
//!
//! ## Rules
//! - The registry is plain data; the center guards it with an `RwLock`.
//! - `snapshot` clones the `Arc`s so dispatch runs without holding the lock.
//! - Removing a subscription also flips its liveness flag, so a snapshot
//!   taken before the removal skips it.
//! - Empty key lists are dropped.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::Arc;

use crate::handlers::{Affinity, Handler};
use crate::notifications::{ChannelName, SourceId, SubscriptionToken};

/// Registry key.
pub(crate) type Key = (ChannelName, SourceId);

/// One live registration.
pub(crate) struct Subscription {
    pub(crate) token: SubscriptionToken,
    pub(crate) key: Key,
    pub(crate) handler: Handler,
    pub(crate) affinity: Affinity,
    live: AtomicBool,
}

impl Subscription {
    pub(crate) fn new(key: Key, handler: Handler, affinity: Affinity) -> Self {
        Self {
            token: SubscriptionToken::next(),
            key,
            handler,
            affinity,
            live: AtomicBool::new(true),
        }
    }

    /// `false` once cancelled.
    #[inline]
    pub(crate) fn is_live(&self) -> bool {
        self.live.load(AtomicOrdering::Acquire)
    }

    #[inline]
    fn cancel(&self) {
        self.live.store(false, AtomicOrdering::Release);
    }
}

/// Ordered handler lists per `(channel, source)`.
#[derive(Default)]
pub(crate) struct Registry {
    by_key: HashMap<Key, Vec<Arc<Subscription>>>,
    by_token: HashMap<SubscriptionToken, Key>,
}

impl Registry {
    /// Appends a subscription to its key's list.
    pub(crate) fn insert(&mut self, sub: Arc<Subscription>) {
        self.by_token.insert(sub.token, sub.key.clone());
        self.by_key.entry(sub.key.clone()).or_default().push(sub);
    }

    /// Removes and cancels the subscription for `token`.
    ///
    /// Returns `None` for unknown or already removed tokens.
    pub(crate) fn remove(&mut self, token: SubscriptionToken) -> Option<Arc<Subscription>> {
        let key = self.by_token.remove(&token)?;
        let list = self.by_key.get_mut(&key)?;
        let idx = list.iter().position(|s| s.token == token)?;
        let sub = list.remove(idx);
        sub.cancel();
        if list.is_empty() {
            self.by_key.remove(&key);
        }
        Some(sub)
    }

    /// Returns the subscriptions for `key`, in registration order.
    pub(crate) fn snapshot(&self, key: &Key) -> Vec<Arc<Subscription>> {
        self.by_key.get(key).cloned().unwrap_or_default()
    }

    pub(crate) fn count(&self, key: &Key) -> usize {
        self.by_key.get(key).map_or(0, Vec::len)
    }

    pub(crate) fn contains(&self, token: SubscriptionToken) -> bool {
        self.by_token.contains_key(&token)
    }

    /// Total number of registrations.
    pub(crate) fn len(&self) -> usize {
        self.by_token.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(name: &str, source: SourceId) -> Key {
        (ChannelName::new(name).unwrap(), source)
    }

    fn sub(k: &Key) -> Arc<Subscription> {
        Arc::new(Subscription::new(
            k.clone(),
            Handler::closure(|_| {}),
            Affinity::Posting,
        ))
    }

    #[test]
    fn test_snapshot_preserves_registration_order() {
        let mut reg = Registry::default();
        let k = key("opened", SourceId::new());
        let subs: Vec<_> = (0..5).map(|_| sub(&k)).collect();
        for s in &subs {
            reg.insert(s.clone());
        }

        let tokens: Vec<_> = reg.snapshot(&k).iter().map(|s| s.token).collect();
        let expected: Vec<_> = subs.iter().map(|s| s.token).collect();
        assert_eq!(tokens, expected);
        assert_eq!(reg.count(&k), 5);
        assert_eq!(reg.len(), 5);
    }

    #[test]
    fn test_remove_cancels_and_is_idempotent() {
        let mut reg = Registry::default();
        let k = key("opened", SourceId::new());
        let s = sub(&k);
        reg.insert(s.clone());

        let removed = reg.remove(s.token).expect("registered");
        assert!(!removed.is_live());
        assert!(!reg.contains(s.token));
        assert!(reg.remove(s.token).is_none());
        assert_eq!(reg.count(&k), 0);
        assert!(reg.by_key.is_empty());
    }

    #[test]
    fn test_keys_are_isolated_by_source() {
        let mut reg = Registry::default();
        let a = key("opened", SourceId::new());
        let b = key("opened", SourceId::new());
        reg.insert(sub(&a));

        assert_eq!(reg.count(&a), 1);
        assert!(reg.snapshot(&b).is_empty());
    }

    #[test]
    fn test_remove_keeps_other_entries() {
        let mut reg = Registry::default();
        let k = key("closed", SourceId::new());
        let first = sub(&k);
        let second = sub(&k);
        reg.insert(first.clone());
        reg.insert(second.clone());

        reg.remove(first.token);
        let left: Vec<_> = reg.snapshot(&k).iter().map(|s| s.token).collect();
        assert_eq!(left, vec![second.token]);
        assert!(second.is_live());
    }
}
