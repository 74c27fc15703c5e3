//! # Delivery affinity.
//!
//! [`Affinity`] declares on which execution context a handler runs.
//!
//! - [`Affinity::Posting`] — inline, on the thread that called `post`/`dispatch`.
//! - [`Affinity::Main`] — enqueued on the main execution context
//!   ([`MainExecutor`](crate::MainExecutor)) and run when the host drains it.

/// Execution context a handler is delivered on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Affinity {
    /// Run synchronously on the posting thread, before `post` returns.
    Posting,

    /// Run on the main execution context, possibly after `post` returns.
    ///
    /// Deferred deliveries are FIFO per center. If the center has no main
    /// context (built with [`CenterBuilder::build_detached`](crate::CenterBuilder::build_detached)),
    /// these handlers run on the posting thread instead.
    Main,
}

impl Default for Affinity {
    /// Returns [`Affinity::Posting`].
    fn default() -> Self {
        Affinity::Posting
    }
}

impl Affinity {
    /// Returns a short stable label for logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            Affinity::Posting => "posting",
            Affinity::Main => "main",
        }
    }
}
