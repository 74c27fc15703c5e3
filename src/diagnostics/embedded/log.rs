//! # LogWriter — diagnostics as tracing events
//!
//! A minimal sink that renders each [`Diagnostic`] through `tracing`.
//! Use it for development builds or demos; install a `tracing` subscriber to see output.
//!
//! ## Example output (fmt subscriber)
//! ```text
//! WARN observable: event has no channel name vocabulary="Door" variant="Ajar" source=source#3
//! WARN observable: handler panicked channel=opened source=source#3 token=sub#7 handler="closure" info="boom"
//! DEBUG observable: receiver dropped channel=opened token=sub#9 receiver="app::Watcher"
//! DEBUG observable: stale subscription token=sub#9
//! ```

use tracing::{debug, error, warn};

use crate::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink};

/// Diagnostic writer sink.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl DiagnosticSink for LogWriter {
    fn on_diagnostic(&self, d: &Diagnostic) {
        let channel = d.channel.as_ref().map(|c| c.as_str()).unwrap_or("-");
        let subject = d.subject.as_deref().unwrap_or("unknown");
        let reason = d.reason.as_deref().unwrap_or("");

        match d.kind {
            DiagnosticKind::UnresolvedEvent => {
                warn!(
                    target: "observable",
                    vocabulary = subject,
                    variant = reason,
                    source = ?d.source,
                    "event has no channel name"
                );
            }
            DiagnosticKind::InvalidVocabulary => {
                error!(target: "observable", vocabulary = subject, reason, "invalid vocabulary");
            }
            DiagnosticKind::StaleSubscription => {
                debug!(target: "observable", token = ?d.token, "stale subscription");
            }
            DiagnosticKind::HandlerPanicked => {
                warn!(
                    target: "observable",
                    channel,
                    source = ?d.source,
                    token = ?d.token,
                    handler = subject,
                    info = reason,
                    "handler panicked"
                );
            }
            DiagnosticKind::ReceiverDropped => {
                debug!(
                    target: "observable",
                    channel,
                    token = ?d.token,
                    receiver = subject,
                    "receiver dropped"
                );
            }
            DiagnosticKind::MainQueueClosed | DiagnosticKind::MainQueueOverflow => {
                warn!(
                    target: "observable",
                    kind = d.as_label(),
                    channel,
                    token = ?d.token,
                    "deferred delivery dropped"
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
