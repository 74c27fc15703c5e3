//! Error types used by the notification center and event vocabularies.
//!
//! [`ChannelError`] is the only error surfaced to callers, and only by the
//! low-level center API ([`NotificationCenter::register`](crate::NotificationCenter::register))
//! and by explicit vocabulary validation. The [`Observable`](crate::Observable)
//! layer absorbs these and reports them as [`Diagnostic`](crate::Diagnostic)s instead.

use thiserror::Error;

/// # Errors produced by channel resolution and registration.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChannelError {
    /// Channel name is empty (or whitespace only) and cannot be told apart from "no event".
    #[error("invalid channel name {name:?}")]
    InvalidChannel {
        /// The rejected name.
        name: String,
    },

    /// Two variants of the same vocabulary map to the same channel name.
    #[error("vocabulary {vocabulary} maps more than one event to channel {name:?}")]
    DuplicateChannel {
        /// Type name of the offending vocabulary.
        vocabulary: &'static str,
        /// The channel name claimed twice.
        name: String,
    },

    /// A vocabulary variant has no usable channel name.
    #[error("vocabulary {vocabulary} has no channel name for {variant}")]
    UnnamedEvent {
        /// Type name of the offending vocabulary.
        vocabulary: &'static str,
        /// Debug rendering of the variant.
        variant: String,
    },
}

impl ChannelError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use observable::ChannelError;
    ///
    /// let err = ChannelError::InvalidChannel { name: String::new() };
    /// assert_eq!(err.as_label(), "channel_invalid");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ChannelError::InvalidChannel { .. } => "channel_invalid",
            ChannelError::DuplicateChannel { .. } => "vocabulary_duplicate_channel",
            ChannelError::UnnamedEvent { .. } => "vocabulary_unnamed_event",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ChannelError::InvalidChannel { name } => format!("invalid channel: {name:?}"),
            ChannelError::DuplicateChannel { vocabulary, name } => {
                format!("duplicate channel {name:?} in {vocabulary}")
            }
            ChannelError::UnnamedEvent {
                vocabulary,
                variant,
            } => format!("unnamed event {variant} in {vocabulary}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_are_stable() {
        let dup = ChannelError::DuplicateChannel {
            vocabulary: "Tv",
            name: "on".into(),
        };
        let unnamed = ChannelError::UnnamedEvent {
            vocabulary: "Tv",
            variant: "Off".into(),
        };
        assert_eq!(dup.as_label(), "vocabulary_duplicate_channel");
        assert_eq!(unnamed.as_label(), "vocabulary_unnamed_event");
    }

    #[test]
    fn test_display_mentions_name() {
        let err = ChannelError::InvalidChannel { name: "  ".into() };
        assert_eq!(err.to_string(), "invalid channel name \"  \"");
        assert_eq!(err.as_message(), "invalid channel: \"  \"");
    }
}
