//! Broadcast core: registry, dispatch and execution contexts.
//!
//! The public API from this module is [`NotificationCenter`], its
//! [`CenterBuilder`] and [`Config`], and the [`MainExecutor`] that runs
//! main-affinity deliveries.
//!
//! Internal modules:
//! - [`registry`]: `(channel, source)` → ordered subscriptions, token index;
//! - [`delivery`]: one handler invocation with panic isolation;
//! - [`executor`]: main queue and its executor;
//! - [`center`]: register / unregister / dispatch.

mod builder;
mod center;
mod config;
mod delivery;
mod executor;
mod registry;

pub use builder::CenterBuilder;
pub use center::NotificationCenter;
pub use config::Config;
pub use executor::MainExecutor;
