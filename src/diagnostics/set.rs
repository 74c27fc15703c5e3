//! # Synchronous fan-out of diagnostics to sinks.
//!
//! [`DiagnosticSet`] is shared by the center and its main executor so both
//! delivery paths report to the same sinks.
//!
//! ## Rules
//! - **In order**: sinks are called in the order they were registered.
//! - **Isolation**: a panicking sink is caught and logged; later sinks still run.
//! - **No recursion**: a sink panic is only logged, never re-reported as a diagnostic.
//!
//! **Warning**: `AssertUnwindSafe` is used, which can leave shared state inconsistent
//! if a sink uses `Mutex<T>` and panics while holding the lock.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use tracing::warn;

use crate::diagnostics::{Diagnostic, DiagnosticSink};

/// Shared list of diagnostic sinks.
#[derive(Clone)]
pub struct DiagnosticSet {
    sinks: Arc<[Arc<dyn DiagnosticSink>]>,
}

impl DiagnosticSet {
    #[must_use]
    pub fn new(sinks: Vec<Arc<dyn DiagnosticSink>>) -> Self {
        Self {
            sinks: sinks.into(),
        }
    }

    /// Delivers `diagnostic` to every sink.
    pub fn emit(&self, diagnostic: Diagnostic) {
        for sink in self.sinks.iter() {
            let outcome = catch_unwind(AssertUnwindSafe(|| sink.on_diagnostic(&diagnostic)));
            if let Err(panic) = outcome {
                warn!(
                    sink = sink.name(),
                    kind = diagnostic.as_label(),
                    info = %panic_message(&*panic),
                    "diagnostic sink panicked"
                );
            }
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sinks.len()
    }
}

impl Default for DiagnosticSet {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

/// Extracts a readable message from a panic payload.
pub(crate) fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticKind;
    use std::sync::Mutex;

    struct Recorder(Mutex<Vec<DiagnosticKind>>);

    impl DiagnosticSink for Recorder {
        fn on_diagnostic(&self, d: &Diagnostic) {
            self.0.lock().unwrap().push(d.kind);
        }
    }

    struct Exploding;

    impl DiagnosticSink for Exploding {
        fn on_diagnostic(&self, _: &Diagnostic) {
            panic!("sink exploded");
        }

        fn name(&self) -> &'static str {
            "exploding"
        }
    }

    #[test]
    fn test_panicking_sink_does_not_stop_others() {
        let rec = Arc::new(Recorder(Mutex::new(Vec::new())));
        let set = DiagnosticSet::new(vec![Arc::new(Exploding), rec.clone()]);

        set.emit(Diagnostic::new(DiagnosticKind::ReceiverDropped));
        set.emit(Diagnostic::new(DiagnosticKind::StaleSubscription));

        assert_eq!(
            *rec.0.lock().unwrap(),
            vec![
                DiagnosticKind::ReceiverDropped,
                DiagnosticKind::StaleSubscription
            ]
        );
    }

    #[test]
    fn test_panic_message_variants() {
        let s: Box<dyn std::any::Any + Send> = Box::new("static");
        let owned: Box<dyn std::any::Any + Send> = Box::new(String::from("owned"));
        let other: Box<dyn std::any::Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(s.as_ref()), "static");
        assert_eq!(panic_message(owned.as_ref()), "owned");
        assert_eq!(panic_message(other.as_ref()), "unknown panic");
    }

    #[test]
    fn test_empty_set() {
        let set = DiagnosticSet::default();
        assert_eq!(set.len(), 0);
        set.emit(Diagnostic::new(DiagnosticKind::MainQueueClosed));
    }
}
