//! # Channel names: the key space of the notification center.
//!
//! A [`ChannelName`] is what a typed event resolves to. The center only ever
//! sees names; it never learns which vocabulary a name came from.
//!
//! ## Rules
//! - A name must contain at least one non-whitespace character.
//! - Names compare by value. The same name used by two unrelated vocabularies
//!   is disambiguated by the source filter, not by the name.

use std::fmt;
use std::sync::Arc;

use crate::error::ChannelError;

/// Validated, non-empty channel name.
///
/// Cheap to clone (`Arc<str>` inside).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChannelName(Arc<str>);

impl ChannelName {
    /// Validates and wraps a channel name.
    ///
    /// Returns [`ChannelError::InvalidChannel`] for empty or whitespace-only input.
    pub fn new(name: impl AsRef<str>) -> Result<Self, ChannelError> {
        let name = name.as_ref();
        if name.trim().is_empty() {
            return Err(ChannelError::InvalidChannel {
                name: name.to_string(),
            });
        }
        Ok(Self(Arc::from(name)))
    }

    /// Returns the name as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ChannelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChannelName({:?})", &*self.0)
    }
}

impl fmt::Display for ChannelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ChannelName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for ChannelName {
    type Error = ChannelError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for ChannelName {
    type Error = ChannelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
