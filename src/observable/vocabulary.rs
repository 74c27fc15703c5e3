//! # Event vocabularies.
//!
//! An entity type declares the events it can post as a closed enum that
//! implements [`EventName`]. Each variant maps to a stable, non-empty channel
//! name, unique within that enum.
//!
//! ## Rules
//! - `channel_name` is a pure function: the same variant always yields the same name.
//! - Names must be unique within a vocabulary (the mapping is reversible).
//! - Names may repeat across unrelated vocabularies; the source filter keeps
//!   them apart.
//!
//! [`validate_vocabulary`] checks the first two rules over [`EventName::VARIANTS`].
//! The center runs it once per type on first use (see
//! [`Config::validate_vocabularies`](crate::Config::validate_vocabularies)).
//!
//! ## Example
//! ```rust
//! use observable::{event_names, validate_vocabulary, EventName};
//!
//! event_names! {
//!     /// Things a door can do.
//!     pub enum DoorEvent {
//!         Opened => "opened",
//!         Closed => "closed",
//!     }
//! }
//!
//! assert_eq!(DoorEvent::Opened.channel_name(), Some("opened"));
//! assert_eq!(DoorEvent::from_channel_name("closed"), Some(DoorEvent::Closed));
//! assert!(validate_vocabulary::<DoorEvent>().is_ok());
//! ```

use std::any::type_name;
use std::collections::HashSet;
use std::fmt::Debug;

use crate::error::ChannelError;

/// A closed set of events with stable channel names.
pub trait EventName: Debug + Copy + Send + Sync + 'static {
    /// Every variant, in declaration order.
    const VARIANTS: &'static [Self];

    /// Channel name for this variant, or `None` if it has none.
    ///
    /// `None` (or an empty name) makes subscribe/post for this variant a no-op.
    fn channel_name(&self) -> Option<&'static str>;

    /// Reverse mapping: the variant whose channel name is `name`.
    fn from_channel_name(name: &str) -> Option<Self> {
        Self::VARIANTS
            .iter()
            .copied()
            .find(|v| v.channel_name() == Some(name))
    }
}

/// Checks that every variant of `E` has a non-empty name and that no two
/// variants share one.
pub fn validate_vocabulary<E: EventName>() -> Result<(), ChannelError> {
    let mut seen = HashSet::with_capacity(E::VARIANTS.len());
    for variant in E::VARIANTS {
        let name = match variant.channel_name() {
            Some(name) if !name.trim().is_empty() => name,
            _ => {
                return Err(ChannelError::UnnamedEvent {
                    vocabulary: type_name::<E>(),
                    variant: format!("{variant:?}"),
                })
            }
        };
        if !seen.insert(name) {
            return Err(ChannelError::DuplicateChannel {
                vocabulary: type_name::<E>(),
                name: name.to_string(),
            });
        }
    }
    Ok(())
}

/// Declares an event enum together with its [`EventName`] mapping.
///
/// The enum derives `Debug, Clone, Copy, PartialEq, Eq, Hash`; do not derive
/// those again in the attributes.
///
/// ```rust
/// observable::event_names! {
///     pub enum TelevisionEvent {
///         ChangedChannel => "changedChannel",
///         PoweredOff => "poweredOff",
///         PoweredOn => "poweredOn",
///     }
/// }
/// ```
#[macro_export]
macro_rules! event_names {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => $channel:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )+
        }

        impl $crate::EventName for $name {
            const VARIANTS: &'static [Self] = &[$($name::$variant),+];

            fn channel_name(&self) -> ::core::option::Option<&'static str> {
                match self {
                    $($name::$variant => ::core::option::Option::Some($channel),)+
                }
            }
        }
    };
}
