//! # Delivery of one notification to one subscription.
//!
//! Shared by the posting-thread path (in the center) and the main-context path
//! (in [`MainExecutor`](crate::MainExecutor)), so both isolate failures the same way.
//!
//! ```text
//! deliver(sub, note)
//!     ├─ cancelled            → Skipped
//!     ├─ handler ran          → Delivered
//!     ├─ receiver dropped     → ReceiverDropped  (diagnostic)
//!     └─ handler panicked     → Panicked         (logged + diagnostic)
//! ```

use std::panic::{catch_unwind, AssertUnwindSafe};

use tracing::{debug, trace, warn};

use crate::core::registry::Subscription;
use crate::diagnostics::{panic_message, Diagnostic, DiagnosticKind, DiagnosticSet};
use crate::handlers::Invocation;
use crate::notifications::Notification;

/// Outcome of delivering to one subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Delivery {
    Delivered,
    Skipped,
    ReceiverDropped,
    Panicked,
}

/// Invokes the handler of `sub` with `note`, absorbing any failure.
///
/// **Warning**: `AssertUnwindSafe` is used, which can leave shared state inconsistent
/// if a handler panics while holding a lock.
pub(crate) fn deliver(
    sub: &Subscription,
    note: &Notification,
    diagnostics: &DiagnosticSet,
) -> Delivery {
    if !sub.is_live() {
        trace!(token = %sub.token, channel = %note.name, "skipping cancelled subscription");
        return Delivery::Skipped;
    }

    match catch_unwind(AssertUnwindSafe(|| sub.handler.call(note))) {
        Ok(Invocation::Called) => Delivery::Delivered,
        Ok(Invocation::ReceiverDropped) => {
            report_dropped_receiver(sub, note, diagnostics);
            Delivery::ReceiverDropped
        }
        Err(panic) => {
            let info = panic_message(&*panic);
            warn!(
                token = %sub.token,
                channel = %note.name,
                source = %note.source,
                handler = sub.handler.describe(),
                info = %info,
                "handler panicked; continuing with remaining handlers"
            );
            diagnostics.emit(
                failure(DiagnosticKind::HandlerPanicked, sub, note)
                    .with_subject(sub.handler.describe())
                    .with_reason(info),
            );
            Delivery::Panicked
        }
    }
}

pub(crate) fn report_dropped_receiver(
    sub: &Subscription,
    note: &Notification,
    diagnostics: &DiagnosticSet,
) {
    debug!(
        token = %sub.token,
        channel = %note.name,
        receiver = sub.handler.describe(),
        "receiver dropped; delivery skipped"
    );
    diagnostics.emit(
        failure(DiagnosticKind::ReceiverDropped, sub, note).with_subject(sub.handler.describe()),
    );
}

/// Builds a delivery-layer diagnostic for `sub`/`note`.
fn failure(kind: DiagnosticKind, sub: &Subscription, note: &Notification) -> Diagnostic {
    Diagnostic::new(kind)
        .with_channel(note.name.clone())
        .with_source(note.source)
        .with_token(sub.token)
        .with_affinity(sub.affinity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticSink;
    use crate::handlers::{Affinity, Handler};
    use crate::notifications::{ChannelName, SourceId};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Recorder(Mutex<Vec<Diagnostic>>);

    impl DiagnosticSink for Recorder {
        fn on_diagnostic(&self, d: &Diagnostic) {
            self.0.lock().unwrap().push(d.clone());
        }
    }

    fn setup(handler: Handler) -> (Subscription, Notification) {
        let name = ChannelName::new("opened").unwrap();
        let source = SourceId::new();
        let sub = Subscription::new((name.clone(), source), handler, Affinity::Posting);
        (sub, Notification::new(name, source))
    }

    #[test]
    fn test_panic_is_absorbed_and_reported() {
        let rec = Arc::new(Recorder::default());
        let set = DiagnosticSet::new(vec![rec.clone()]);
        let (sub, note) = setup(Handler::closure(|_| panic!("boom")));

        assert_eq!(deliver(&sub, &note, &set), Delivery::Panicked);

        let seen = rec.0.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].kind, DiagnosticKind::HandlerPanicked);
        assert_eq!(seen[0].reason.as_deref(), Some("boom"));
        assert_eq!(seen[0].token, Some(sub.token));
    }

    #[test]
    fn test_dropped_receiver_is_reported() {
        struct Gone;
        let rec = Arc::new(Recorder::default());
        let set = DiagnosticSet::new(vec![rec.clone()]);
        let receiver = Arc::new(Gone);
        let (sub, note) = setup(Handler::bound(&receiver, |_: &Gone, _| {}));
        drop(receiver);

        assert_eq!(deliver(&sub, &note, &set), Delivery::ReceiverDropped);
        assert_eq!(
            rec.0.lock().unwrap()[0].kind,
            DiagnosticKind::ReceiverDropped
        );
    }

    #[test]
    fn test_delivered() {
        let (sub, note) = setup(Handler::closure(|_| {}));
        assert_eq!(
            deliver(&sub, &note, &DiagnosticSet::default()),
            Delivery::Delivered
        );
    }
}
