//! # NotificationCenter: string-keyed, source-filtered broadcast.
//!
//! The [`NotificationCenter`] owns the subscription registry and dispatches
//! posts to handlers. It knows nothing about typed events or entities; it
//! works purely on `(channel name, source identity)` pairs. The
//! [`Observable`](crate::Observable) capability sits on top of it.
//!
//! ## Architecture
//! ```text
//! register(channel, source, handler, affinity)
//!     └─► RwLock<Registry>.write() ─► append to (channel, source) list ─► SubscriptionToken
//!
//! dispatch(channel, source, payload)
//!     ├─► RwLock<Registry>.read() ─► snapshot (channel, source) list ─► release lock
//!     ├─► Notification { seq, at, channel, source, payload }
//!     └─► for sub in snapshot (registration order):
//!             ├─ receiver dropped  → ReceiverDropped, pruned
//!             ├─ Affinity::Posting → deliver inline (panic isolated)
//!             └─ Affinity::Main    → enqueue on main queue (or inline when detached)
//! ```
//!
//! ## Rules
//! - **Injected, not global**: build one center at startup and pass clones down.
//!   Clones share the same registry (`Arc` inside).
//! - **Snapshot dispatch**: handlers run without the registry lock held, so they
//!   may subscribe, unsubscribe or post re-entrantly.
//! - **Immediate cancellation**: `unregister` takes effect even for handlers of an
//!   in-flight dispatch that have not run yet, and for queued main deliveries.
//! - **Nothing propagates**: handler panics, dropped receivers and stale tokens
//!   are logged and reported as diagnostics; callers never see them.
//!
//! ## Example
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use observable::{Affinity, Handler, NotificationCenter, SourceId};
//!
//! let center = NotificationCenter::default();
//! let door = SourceId::new();
//! let seen = Arc::new(Mutex::new(Vec::new()));
//!
//! let sink = seen.clone();
//! let token = center
//!     .register("opened", door, Handler::closure(move |n| {
//!         sink.lock().unwrap().push(*n.payload::<u32>().unwrap());
//!     }), Affinity::Posting)
//!     .unwrap();
//!
//! center.dispatch("opened", door, Some(Arc::new(42_u32)));
//! assert!(center.unregister(token));
//! center.dispatch("opened", door, Some(Arc::new(43_u32)));
//!
//! assert_eq!(*seen.lock().unwrap(), vec![42]);
//! ```

use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, error, trace, warn};

use crate::core::delivery::{deliver, report_dropped_receiver, Delivery};
use crate::core::executor::{DeferError, Deferred, MainSender};
use crate::core::registry::{Registry, Subscription};
use crate::core::{CenterBuilder, Config};
use crate::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSet};
use crate::error::ChannelError;
use crate::handlers::{Affinity, Handler};
use crate::notifications::{ChannelName, Notification, Payload, SourceId, SubscriptionToken};
use crate::observable::{validate_vocabulary, EventName};

struct Inner {
    cfg: Config,
    registry: RwLock<Registry>,
    main: Option<MainSender>,
    diagnostics: DiagnosticSet,
    vocabularies: RwLock<HashMap<TypeId, bool>>,
}

/// Process-wide (but explicitly constructed) notification registry.
///
/// Cheap to clone; all clones share one registry.
#[derive(Clone)]
pub struct NotificationCenter {
    inner: Arc<Inner>,
}

impl NotificationCenter {
    /// Creates a center with no main execution context.
    ///
    /// [`Affinity::Main`] handlers run on the posting thread. Use
    /// [`builder`](Self::builder) to get a [`MainExecutor`](crate::MainExecutor).
    pub fn new(cfg: Config) -> Self {
        CenterBuilder::new(cfg).build_detached()
    }

    /// Returns a builder for a center with sinks and a main execution context.
    pub fn builder(cfg: Config) -> CenterBuilder {
        CenterBuilder::new(cfg)
    }

    pub(crate) fn from_parts(
        cfg: Config,
        main: Option<MainSender>,
        diagnostics: DiagnosticSet,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                cfg,
                registry: RwLock::new(Registry::default()),
                main,
                diagnostics,
                vocabularies: RwLock::new(HashMap::new()),
            }),
        }
    }

    /// Returns the configuration this center was built with.
    pub fn config(&self) -> &Config {
        &self.inner.cfg
    }

    /// Returns `true` if this center defers [`Affinity::Main`] handlers to a main executor.
    pub fn has_main_context(&self) -> bool {
        self.inner.main.is_some()
    }

    /// Appends `handler` to the `(channel, source)` list.
    ///
    /// Returns a token that removes exactly this registration. Fails only for an
    /// empty or whitespace-only channel name.
    pub fn register(
        &self,
        channel: impl AsRef<str>,
        source: SourceId,
        handler: Handler,
        affinity: Affinity,
    ) -> Result<SubscriptionToken, ChannelError> {
        let name = ChannelName::new(channel)?;
        let sub = Arc::new(Subscription::new((name, source), handler, affinity));
        let token = sub.token;
        trace!(
            token = %token,
            channel = %sub.key.0,
            source = %source,
            handler = sub.handler.describe(),
            affinity = affinity.as_label(),
            "register"
        );
        self.write().insert(sub);
        Ok(token)
    }

    /// Removes the registration for `token`.
    ///
    /// Idempotent: unknown or already removed tokens are a no-op that returns `false`.
    pub fn unregister(&self, token: SubscriptionToken) -> bool {
        let removed = self.write().remove(token);
        match removed {
            Some(sub) => {
                trace!(token = %token, channel = %sub.key.0, "unregister");
                true
            }
            None => {
                trace!(token = %token, "unregister: stale token");
                self.inner
                    .diagnostics
                    .emit(Diagnostic::stale_subscription(token));
                false
            }
        }
    }

    /// Delivers `payload` to every handler registered for `(channel, source)`.
    ///
    /// Posting-affinity handlers run before this returns, in registration order.
    /// Main-affinity handlers are enqueued in that same order. No handlers, or an
    /// invalid channel name, is a no-op.
    pub fn dispatch(&self, channel: impl AsRef<str>, source: SourceId, payload: Option<Payload>) {
        let Ok(name) = ChannelName::new(channel) else {
            return;
        };
        let key = (name, source);
        let subs = self.read().snapshot(&key);
        if subs.is_empty() {
            trace!(channel = %key.0, source = %source, "dispatch: no subscribers");
            return;
        }

        let (name, source) = key;
        let note = Arc::new(Notification::new(name, source).with_shared_payload(payload));
        trace!(
            seq = note.seq,
            channel = %note.name,
            source = %source,
            subscribers = subs.len(),
            "dispatch"
        );

        let mut dropped = Vec::new();
        for sub in subs {
            if !sub.handler.is_alive() {
                if sub.is_live() {
                    report_dropped_receiver(&sub, &note, &self.inner.diagnostics);
                    dropped.push(sub.token);
                }
                continue;
            }

            let outcome = match (sub.affinity, &self.inner.main) {
                (Affinity::Main, Some(main)) => {
                    self.defer(main, sub, &note);
                    continue;
                }
                _ => deliver(&sub, &note, &self.inner.diagnostics),
            };
            if outcome == Delivery::ReceiverDropped {
                dropped.push(sub.token);
            }
        }

        if !dropped.is_empty() && self.inner.cfg.prune_dropped_receivers {
            let mut pruned = Vec::with_capacity(dropped.len());
            {
                let mut registry = self.write();
                for token in dropped {
                    if let Some(sub) = registry.remove(token) {
                        debug!(token = %token, "pruned subscription with dropped receiver");
                        pruned.push(sub);
                    }
                }
            }
            // Handler captures may call back into the center on drop.
            drop(pruned);
        }
    }

    /// Number of registrations for `(channel, source)`.
    pub fn subscriber_count(&self, channel: impl AsRef<str>, source: SourceId) -> usize {
        match ChannelName::new(channel) {
            Ok(name) => self.read().count(&(name, source)),
            Err(_) => 0,
        }
    }

    /// Returns `true` while `token` is registered.
    pub fn is_registered(&self, token: SubscriptionToken) -> bool {
        self.read().contains(token)
    }

    /// Total number of registrations across all keys.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Validates vocabulary `E` now, regardless of configuration.
    ///
    /// Intended as a startup check. A vocabulary that passes is remembered and
    /// not validated again on first use.
    pub fn register_vocabulary<E: EventName>(&self) -> Result<(), ChannelError> {
        let result = validate_vocabulary::<E>();
        self.vocabularies_mut()
            .insert(TypeId::of::<E>(), result.is_ok());
        result
    }

    /// Returns `false` if vocabulary `E` is known to be invalid.
    ///
    /// With `validate_vocabularies` on, the first call for a type validates it,
    /// and reports an `InvalidVocabulary` diagnostic if it fails.
    pub(crate) fn admit_vocabulary<E: EventName>(&self) -> bool {
        if !self.inner.cfg.validate_vocabularies {
            return true;
        }
        let id = TypeId::of::<E>();
        if let Some(ok) = self.vocabularies().get(&id) {
            return *ok;
        }

        let mut known = self.vocabularies_mut();
        if let Some(ok) = known.get(&id) {
            return *ok;
        }
        let result = validate_vocabulary::<E>();
        known.insert(id, result.is_ok());
        drop(known);

        if let Err(err) = result {
            error!(
                vocabulary = type_name::<E>(),
                label = err.as_label(),
                error = %err,
                "vocabulary rejected; its events will be dropped"
            );
            self.report(
                Diagnostic::new(DiagnosticKind::InvalidVocabulary)
                    .with_subject(type_name::<E>())
                    .with_reason(err.to_string()),
            );
            return false;
        }
        true
    }

    pub(crate) fn report(&self, diagnostic: Diagnostic) {
        self.inner.diagnostics.emit(diagnostic);
    }

    fn defer(&self, main: &MainSender, sub: Arc<Subscription>, note: &Arc<Notification>) {
        let token = sub.token;
        let deferred = Deferred {
            sub,
            note: Arc::clone(note),
        };
        if let Err(err) = main.send(deferred) {
            let kind = match err {
                DeferError::Full => DiagnosticKind::MainQueueOverflow,
                DeferError::Closed => DiagnosticKind::MainQueueClosed,
            };
            warn!(
                token = %token,
                channel = %note.name,
                source = %note.source,
                kind = kind.as_label(),
                "main-affinity delivery dropped"
            );
            self.inner.diagnostics.emit(
                Diagnostic::new(kind)
                    .with_channel(note.name.clone())
                    .with_source(note.source)
                    .with_token(token)
                    .with_affinity(Affinity::Main),
            );
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Registry> {
        self.inner
            .registry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Registry> {
        self.inner
            .registry
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn vocabularies(&self) -> RwLockReadGuard<'_, HashMap<TypeId, bool>> {
        self.inner
            .vocabularies
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn vocabularies_mut(&self) -> RwLockWriteGuard<'_, HashMap<TypeId, bool>> {
        self.inner
            .vocabularies
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for NotificationCenter {
    /// Detached center with [`Config::default`].
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl std::fmt::Debug for NotificationCenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationCenter")
            .field("registrations", &self.len())
            .field("main_context", &self.has_main_context())
            .field("sinks", &self.inner.diagnostics.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticSink;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<DiagnosticKind>>);

    impl Recorder {
        fn kinds(&self) -> Vec<DiagnosticKind> {
            self.0.lock().unwrap().clone()
        }
    }

    impl DiagnosticSink for Recorder {
        fn on_diagnostic(&self, d: &Diagnostic) {
            self.0.lock().unwrap().push(d.kind);
        }
    }

    type Log = Arc<Mutex<Vec<String>>>;

    fn push(log: &Log, tag: &str) -> Handler {
        let log = log.clone();
        let tag = tag.to_string();
        Handler::closure(move |n| {
            let payload = n.payload::<u32>().map(|v| v.to_string()).unwrap_or_default();
            log.lock().unwrap().push(format!("{tag}:{payload}"));
        })
    }

    fn recorded(center_sinks: &Arc<Recorder>) -> CenterBuilder {
        NotificationCenter::builder(Config::default()).with_sink(center_sinks.clone())
    }

    #[test]
    fn test_handlers_run_once_in_registration_order() {
        let center = NotificationCenter::default();
        let src = SourceId::new();
        let log: Log = Default::default();

        for i in 0..5 {
            center
                .register("opened", src, push(&log, &format!("h{i}")), Affinity::Posting)
                .unwrap();
        }
        center.dispatch("opened", src, Some(Arc::new(42_u32)));

        assert_eq!(
            *log.lock().unwrap(),
            vec!["h0:42", "h1:42", "h2:42", "h3:42", "h4:42"]
        );
    }

    #[test]
    fn test_source_isolation() {
        let center = NotificationCenter::default();
        let a = SourceId::new();
        let b = SourceId::new();
        let log: Log = Default::default();

        center

            .register("opened", b, push(&log, "b"), Affinity::Posting)

            .unwrap();
        center.dispatch("opened", a, None);
        assert!(log.lock().unwrap().is_empty());

        center.dispatch("opened", b, None);
        assert_eq!(*log.lock().unwrap(), vec!["b:"]);
    }

    #[test]
    fn test_unregister_stops_delivery_and_is_idempotent() {
        let rec = Arc::new(Recorder::default());
        let center = recorded(&rec).build_detached();
        let src = SourceId::new();
        let log: Log = Default::default();

        let token = center

            .register("opened", src, push(&log, "s1"), Affinity::Posting)

            .unwrap();
        assert!(center.is_registered(token));
        assert!(center.unregister(token));
        assert!(!center.unregister(token));
        assert!(!center.is_registered(token));

        center.dispatch("opened", src, None);
        assert!(log.lock().unwrap().is_empty());
        assert_eq!(rec.kinds(), vec![DiagnosticKind::StaleSubscription]);
    }

    #[test]
    fn test_panicking_handler_does_not_block_later_ones() {
        let rec = Arc::new(Recorder::default());
        let center = recorded(&rec).build_detached();
        let src = SourceId::new();
        let log: Log = Default::default();

        center

            .register("opened", src, push(&log, "first"), Affinity::Posting)

            .unwrap();
        center
            .register("opened", src, Handler::closure(|_| panic!("boom")), Affinity::Posting)
            .unwrap();
        center
            .register("opened", src, push(&log, "third"), Affinity::Posting)
            .unwrap();

        center.dispatch("opened", src, Some(Arc::new(1_u32)));

        assert_eq!(*log.lock().unwrap(), vec!["first:1", "third:1"]);
        assert_eq!(rec.kinds(), vec![DiagnosticKind::HandlerPanicked]);
        assert_eq!(center.subscriber_count("opened", src), 3);
    }

    #[test]
    fn test_dispatch_without_subscribers_is_noop() {
        let rec = Arc::new(Recorder::default());
        let center = recorded(&rec).build_detached();
        center.dispatch("opened", SourceId::new(), Some(Arc::new(42_u32)));
        center.dispatch("", SourceId::new(), None);
        assert!(rec.kinds().is_empty());
        assert!(center.is_empty());
    }

    #[test]
    fn test_register_rejects_blank_channel() {
        let center = NotificationCenter::default();
        let err = center
            .register("  ", SourceId::new(), Handler::closure(|_| {}), Affinity::Posting)
            .unwrap_err();
        assert!(matches!(err, ChannelError::InvalidChannel { .. }));
        assert_eq!(center.len(), 0);
    }

    #[test]
    fn test_unregister_during_dispatch_skips_pending_handler() {
        let center = NotificationCenter::default();
        let src = SourceId::new();
        let log: Log = Default::default();
        let victim: Arc<Mutex<Option<SubscriptionToken>>> = Default::default();

        let (c, v) = (center.clone(), victim.clone());
        center
            .register(
                "opened",
                src,
                Handler::closure(move |_| {
                    if let Some(token) = v.lock().unwrap().take() {
                        c.unregister(token);
                    }
                }),
                Affinity::Posting,
            )
            .unwrap();
        let token = center
            .register("opened", src, push(&log, "victim"), Affinity::Posting)
            .unwrap();
        *victim.lock().unwrap() = Some(token);

        center.dispatch("opened", src, None);
        assert!(log.lock().unwrap().is_empty());
        assert_eq!(center.subscriber_count("opened", src), 1);
    }

    #[test]
    fn test_subscribe_from_handler_applies_to_next_dispatch() {
        let center = NotificationCenter::default();
        let src = SourceId::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let (c, n) = (center.clone(), calls.clone());
        center
            .register(
                "opened",
                src,
                Handler::closure(move |_| {
                    let n = n.clone();
                    c.register(
                        "opened",
                        src,
                        Handler::closure(move |_| {
                            n.fetch_add(1, Ordering::SeqCst);
                        }),
                        Affinity::Posting,
                    )
                    .unwrap();
                }),
                Affinity::Posting,
            )
            .unwrap();

        center.dispatch("opened", src, None);
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        center.dispatch("opened", src, None);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_dropped_receiver_is_pruned() {
        struct Watcher;

        let rec = Arc::new(Recorder::default());
        let center = recorded(&rec).build_detached();
        let src = SourceId::new();
        let watcher = Arc::new(Watcher);

        let token = center
            .register(
                "opened",
                src,
                Handler::bound(&watcher, |_: &Watcher, _| {}),
                Affinity::Posting,
            )
            .unwrap();
        drop(watcher);

        center.dispatch("opened", src, None);
        assert!(!center.is_registered(token));
        assert_eq!(rec.kinds(), vec![DiagnosticKind::ReceiverDropped]);

        center.dispatch("opened", src, None);
        assert_eq!(rec.kinds().len(), 1);
    }

    #[test]
    fn test_pruned_handler_dropped_outside_registry_lock() {
        struct Watcher;

        struct Unsubscriber {
            center: NotificationCenter,
            token: SubscriptionToken,
        }

        impl Drop for Unsubscriber {
            fn drop(&mut self) {
                self.center.unregister(self.token);
            }
        }

        let center = NotificationCenter::default();
        let src = SourceId::new();
        let other = center
            .register("closed", src, Handler::closure(|_| {}), Affinity::Posting)
            .unwrap();

        let watcher = Arc::new(Watcher);
        let guard = Unsubscriber {
            center: center.clone(),
            token: other,
        };
        center
            .register(
                "opened",
                src,
                Handler::bound(&watcher, move |_: &Watcher, _: &Notification| {
                    let _held = &guard;
                }),
                Affinity::Posting,
            )
            .unwrap();
        drop(watcher);

        let (done_tx, done_rx) = std::sync::mpsc::channel();
        let c = center.clone();
        std::thread::spawn(move || {
            c.dispatch("opened", src, None);
            let _ = done_tx.send(());
        });

        done_rx
            .recv_timeout(std::time::Duration::from_secs(3))
            .expect("dispatch returns after pruning");
        assert!(!center.is_registered(other));
        assert!(center.is_empty());
    }

    #[test]
    fn test_vocabulary_validated_once_across_threads() {
        crate::event_names! {
            enum Door {
                Opened => "opened",
                Closed => "closed",
            }
        }

        crate::event_names! {
            enum Twins {
                Left => "twin",
                Right => "twin",
            }
        }

        let rec = Arc::new(Recorder::default());
        let center = recorded(&rec).build_detached();

        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    for _ in 0..100 {
                        assert!(center.admit_vocabulary::<Door>());
                        assert!(!center.admit_vocabulary::<Twins>());
                    }
                });
            }
        });

        assert_eq!(rec.kinds(), vec![DiagnosticKind::InvalidVocabulary]);
    }

    #[test]
    fn test_main_affinity_is_deferred_in_fifo_order() {
        let (center, mut main) = NotificationCenter::builder(Config::default()).build();
        let src = SourceId::new();
        let log: Log = Default::default();

        center

            .register("opened", src, push(&log, "main-a"), Affinity::Main)

            .unwrap();
        center
            .register("opened", src, push(&log, "inline"), Affinity::Posting)
            .unwrap();
        center
            .register("opened", src, push(&log, "main-b"), Affinity::Main)
            .unwrap();

        center.dispatch("opened", src, Some(Arc::new(1_u32)));
        center.dispatch("opened", src, Some(Arc::new(2_u32)));
        assert_eq!(*log.lock().unwrap(), vec!["inline:1", "inline:2"]);

        assert_eq!(main.drain(), 4);
        assert_eq!(
            *log.lock().unwrap(),
            vec!["inline:1", "inline:2", "main-a:1", "main-b:1", "main-a:2", "main-b:2"]
        );
        assert_eq!(main.drain(), 0);
    }

    #[test]
    fn test_cancel_after_enqueue_skips_deferred_delivery() {
        let (center, mut main) = NotificationCenter::builder(Config::default()).build();
        let src = SourceId::new();
        let log: Log = Default::default();

        let token = center

            .register("opened", src, push(&log, "main"), Affinity::Main)

            .unwrap();
        center.dispatch("opened", src, None);
        center.unregister(token);

        assert_eq!(main.drain(), 1);
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_detached_center_runs_main_affinity_inline() {
        let center = NotificationCenter::default();
        assert!(!center.has_main_context());
        let src = SourceId::new();
        let log: Log = Default::default();

        center

            .register("opened", src, push(&log, "main"), Affinity::Main)

            .unwrap();
        center.dispatch("opened", src, None);
        assert_eq!(*log.lock().unwrap(), vec!["main:"]);
    }

    #[test]
    fn test_bounded_main_queue_overflow_is_reported() {
        let rec = Arc::new(Recorder::default());
        let cfg = Config {
            main_queue_capacity: 1,
            ..Config::default()
        };
        let (center, mut main) = NotificationCenter::builder(cfg)
            .with_sink(rec.clone())
            .build();
        let src = SourceId::new();
        let log: Log = Default::default();

        center

            .register("opened", src, push(&log, "main"), Affinity::Main)

            .unwrap();
        center.dispatch("opened", src, Some(Arc::new(1_u32)));
        center.dispatch("opened", src, Some(Arc::new(2_u32)));

        assert_eq!(rec.kinds(), vec![DiagnosticKind::MainQueueOverflow]);
        assert_eq!(main.drain(), 1);
        assert_eq!(*log.lock().unwrap(), vec!["main:1"]);
    }

    #[test]
    fn test_dropped_executor_reports_closed_queue() {
        let rec = Arc::new(Recorder::default());
        let (center, main) = recorded(&rec).build();
        drop(main);
        let src = SourceId::new();

        center
            .register("opened", src, Handler::closure(|_| {}), Affinity::Main)
            .unwrap();
        center.dispatch("opened", src, None);
        assert_eq!(rec.kinds(), vec![DiagnosticKind::MainQueueClosed]);
    }
}
