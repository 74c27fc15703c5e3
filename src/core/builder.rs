use std::sync::Arc;

use crate::core::executor::main_queue;
use crate::core::{Config, MainExecutor, NotificationCenter};
use crate::diagnostics::{Diagnostic, DiagnosticSet, DiagnosticSink, FnSink};

/// Builder for constructing a [`NotificationCenter`] with optional features.
pub struct CenterBuilder {
    cfg: Config,
    sinks: Vec<Arc<dyn DiagnosticSink>>,
}

impl CenterBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            sinks: Vec::new(),
        }
    }

    /// Sets diagnostic sinks.
    ///
    /// Sinks observe every condition the center absorbs (unresolved events,
    /// handler panics, stale tokens, ...). Replaces previously added sinks.
    pub fn with_sinks(mut self, sinks: Vec<Arc<dyn DiagnosticSink>>) -> Self {
        self.sinks = sinks;
        self
    }

    /// Adds one diagnostic sink.
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Adds a closure as a diagnostic sink.
    pub fn with_diagnostic_fn<F>(self, f: F) -> Self
    where
        F: Fn(&Diagnostic) + Send + Sync + 'static,
    {
        self.with_sink(Arc::new(FnSink(f)))
    }

    /// Builds the center together with its main execution context.
    ///
    /// [`Affinity::Main`](crate::Affinity::Main) handlers are queued for the
    /// returned [`MainExecutor`]; the host must drive it.
    pub fn build(self) -> (NotificationCenter, MainExecutor) {
        let diagnostics = DiagnosticSet::new(self.sinks);
        let (tx, executor) = main_queue(self.cfg.main_queue_bound(), diagnostics.clone());
        let center = NotificationCenter::from_parts(self.cfg, Some(tx), diagnostics);
        (center, executor)
    }

    /// Builds a center without a main execution context.
    ///
    /// [`Affinity::Main`](crate::Affinity::Main) handlers run on the posting thread.
    pub fn build_detached(self) -> NotificationCenter {
        NotificationCenter::from_parts(self.cfg, None, DiagnosticSet::new(self.sinks))
    }
}
