//! # Diagnostic sink trait.
//!
//! Provides [`DiagnosticSink`], the hook for observing conditions the center
//! absorbs instead of failing.
//!
//! ## Rules
//! - Sinks are called synchronously, on the thread where the condition happened.
//! - A panicking sink is caught and logged; other sinks still run.
//! - Sinks must not block. Forward to a channel if real work is needed.
//!
//! ## Example
//! ```rust
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use observable::{Diagnostic, DiagnosticKind, DiagnosticSink};
//!
//! #[derive(Default)]
//! struct PanicCounter(AtomicUsize);
//!
//! impl DiagnosticSink for PanicCounter {
//!     fn on_diagnostic(&self, d: &Diagnostic) {
//!         if d.kind == DiagnosticKind::HandlerPanicked {
//!             self.0.fetch_add(1, Ordering::Relaxed);
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str { "panic-counter" }
//! }
//! ```

use crate::diagnostics::Diagnostic;

/// Observer of absorbed conditions.
pub trait DiagnosticSink: Send + Sync + 'static {
    /// Handles a single diagnostic.
    fn on_diagnostic(&self, diagnostic: &Diagnostic);

    /// Returns the sink name used in logs.
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose - override it when possible.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Adapts a closure into a [`DiagnosticSink`].
pub(crate) struct FnSink<F>(pub(crate) F);

impl<F> DiagnosticSink for FnSink<F>
where
    F: Fn(&Diagnostic) + Send + Sync + 'static,
{
    fn on_diagnostic(&self, diagnostic: &Diagnostic) {
        (self.0)(diagnostic)
    }

    fn name(&self) -> &'static str {
        "fn"
    }
}
