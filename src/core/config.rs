//! # Notification center configuration.
//!
//! Provides [`Config`], the settings a [`NotificationCenter`](crate::NotificationCenter)
//! is built with.
//!
//! Config is used in two ways:
//! 1. **Center creation**: `NotificationCenter::builder(config)` / `NotificationCenter::new(config)`
//! 2. **Subscription defaults**: `Observable::subscribe` uses [`Config::default_affinity`]
//!
//! ## Sentinel values
//! - `main_queue_capacity = 0` → unbounded main queue

use crate::handlers::Affinity;

/// Configuration for a notification center.
///
/// ## Field semantics
/// - `default_affinity`: affinity used by `subscribe` / `subscribe_method` without an explicit one
/// - `main_queue_capacity`: bound of the main execution queue (`0` = unbounded)
/// - `validate_vocabularies`: validate each event vocabulary once, on first use
/// - `prune_dropped_receivers`: remove bound-method subscriptions whose receiver is gone
///
/// ## Notes
/// All fields are public for flexibility. Prefer the helper accessors to avoid
/// sprinkling sentinel checks (`0`) across the codebase.
#[derive(Clone, Debug)]
pub struct Config {
    /// Affinity for subscriptions that do not name one.
    pub default_affinity: Affinity,

    /// Capacity of the main execution queue.
    ///
    /// When the bounded queue is full, the deferred delivery is dropped for that
    /// handler only and a `MainQueueOverflow` diagnostic is reported.
    /// `0` means unbounded.
    pub main_queue_capacity: usize,

    /// Validate each vocabulary (non-empty, injective names) the first time it is used.
    ///
    /// An invalid vocabulary is reported once and every subscribe/post through it is dropped.
    pub validate_vocabularies: bool,

    /// Remove bound-method subscriptions whose receiver was dropped, the first
    /// time a dispatch finds them dead.
    pub prune_dropped_receivers: bool,
}

impl Config {
    /// Returns the main queue bound, or `None` if the queue is unbounded.
    #[inline]
    pub fn main_queue_bound(&self) -> Option<usize> {
        if self.main_queue_capacity == 0 {
            None
        } else {
            Some(self.main_queue_capacity)
        }
    }
}

impl Default for Config {
    /// Returns a configuration with:
    /// - `default_affinity = Affinity::Posting`
    /// - `main_queue_capacity = 0` (unbounded)
    /// - `validate_vocabularies = true`
    /// - `prune_dropped_receivers = true`
    fn default() -> Self {
        Self {
            default_affinity: Affinity::Posting,
            main_queue_capacity: 0,
            validate_vocabularies: true,
            prune_dropped_receivers: true,
        }
    }
}
