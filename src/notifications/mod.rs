//! Notification data model: channel names, source identities, tokens and the notification itself.
//!
//! ## Contents
//! - [`ChannelName`] validated key of the center
//! - [`SourceId`] per-instance source filter
//! - [`SubscriptionToken`] cancellation handle
//! - [`Notification`], [`Payload`] what handlers receive

mod name;
mod notification;
mod source;
mod token;

pub use name::ChannelName;
pub use notification::{Notification, Payload};
pub use source::SourceId;
pub use token::SubscriptionToken;
