//! # Main execution context.
//!
//! Handlers subscribed with [`Affinity::Main`](crate::Affinity::Main) are not
//! called on the posting thread. The center enqueues them and the host runs
//! them from its designated "main" context through a [`MainExecutor`].
//!
//! ## Architecture
//! ```text
//! dispatch(channel, source)
//!     ├──► posting-affinity handlers ──► called inline
//!     └──► main-affinity handlers ──► [main queue] ──► MainExecutor
//!                                      (FIFO)          ├─ drain()        (host loop, sync)
//!                                                      ├─ run_next()     (one delivery)
//!                                                      └─ spawn(token)   (tokio worker)
//! ```
//!
//! ## Rules
//! - **FIFO**: deferred deliveries run in enqueue order.
//! - **Cancellation wins**: a subscription cancelled after enqueue is skipped at run time.
//! - **Overflow**: with a bounded queue, a full queue drops that delivery only
//!   and reports `MainQueueOverflow`.
//! - **Closed**: once the executor is dropped, deferred deliveries are dropped
//!   and reported as `MainQueueClosed`.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::core::delivery::deliver;
use crate::core::registry::Subscription;
use crate::diagnostics::DiagnosticSet;
use crate::notifications::Notification;

/// One delivery waiting for the main context.
pub(crate) struct Deferred {
    pub(crate) sub: Arc<Subscription>,
    pub(crate) note: Arc<Notification>,
}

/// Why a deferred delivery could not be enqueued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DeferError {
    Full,
    Closed,
}

/// Sending half of the main queue, held by the center.
pub(crate) enum MainSender {
    Bounded(mpsc::Sender<Deferred>),
    Unbounded(mpsc::UnboundedSender<Deferred>),
}

impl MainSender {
    /// Enqueues without blocking the poster.
    pub(crate) fn send(&self, deferred: Deferred) -> Result<(), DeferError> {
        match self {
            MainSender::Bounded(tx) => tx.try_send(deferred).map_err(|e| match e {
                mpsc::error::TrySendError::Full(_) => DeferError::Full,
                mpsc::error::TrySendError::Closed(_) => DeferError::Closed,
            }),
            MainSender::Unbounded(tx) => tx.send(deferred).map_err(|_| DeferError::Closed),
        }
    }
}

enum MainReceiver {
    Bounded(mpsc::Receiver<Deferred>),
    Unbounded(mpsc::UnboundedReceiver<Deferred>),
}

impl MainReceiver {
    async fn recv(&mut self) -> Option<Deferred> {
        match self {
            MainReceiver::Bounded(rx) => rx.recv().await,
            MainReceiver::Unbounded(rx) => rx.recv().await,
        }
    }

    fn try_recv(&mut self) -> Option<Deferred> {
        match self {
            MainReceiver::Bounded(rx) => rx.try_recv().ok(),
            MainReceiver::Unbounded(rx) => rx.try_recv().ok(),
        }
    }
}

/// Creates the main queue and its executor.
pub(crate) fn main_queue(
    bound: Option<usize>,
    diagnostics: DiagnosticSet,
) -> (MainSender, MainExecutor) {
    let (tx, rx) = match bound {
        Some(cap) => {
            let (tx, rx) = mpsc::channel(cap.max(1));
            (MainSender::Bounded(tx), MainReceiver::Bounded(rx))
        }
        None => {
            let (tx, rx) = mpsc::unbounded_channel();
            (MainSender::Unbounded(tx), MainReceiver::Unbounded(rx))
        }
    };
    (tx, MainExecutor { rx, diagnostics })
}

/// Runs main-affinity deliveries on the context that owns it.
///
/// Returned by [`CenterBuilder::build`](crate::CenterBuilder::build). Drive it from
/// the host's main loop with [`drain`](Self::drain), or hand it to a tokio runtime
/// with [`spawn`](Self::spawn).
pub struct MainExecutor {
    rx: MainReceiver,
    diagnostics: DiagnosticSet,
}

impl MainExecutor {
    /// Runs every delivery currently queued, including ones enqueued by the
    /// handlers it runs. Returns the number of deliveries processed.
    pub fn drain(&mut self) -> usize {
        let mut processed = 0;
        while let Some(deferred) = self.rx.try_recv() {
            self.run_one(deferred);
            processed += 1;
        }
        processed
    }

    /// Waits for the next delivery and runs it.
    ///
    /// Returns `false` once every center handle is dropped and the queue is empty.
    pub async fn run_next(&mut self) -> bool {
        match self.rx.recv().await {
            Some(deferred) => {
                self.run_one(deferred);
                true
            }
            None => false,
        }
    }

    /// Runs deliveries until `token` is cancelled or the center is gone.
    pub async fn run(mut self, token: CancellationToken) {
        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                more = self.run_next() => if !more { break },
            }
        }
        debug!("main executor stopped");
    }

    /// Spawns [`run`](Self::run) on the current tokio runtime.
    pub fn spawn(self, token: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(token))
    }

    fn run_one(&self, deferred: Deferred) {
        deliver(&deferred.sub, &deferred.note, &self.diagnostics);
    }
}
