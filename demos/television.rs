//! Television and watcher.
//!
//! Run with:
//! ```text
//! RUST_LOG=debug cargo run --example television --features logging
//! ```

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use observable::{
    event_names, Affinity, Config, LogWriter, Notification, NotificationCenter, Observable,
    SourceId,
};
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

event_names! {
    /// Everything a television announces.
    pub enum TelevisionEvent {
        ChangedChannel => "changedChannel",
        PoweredOff => "poweredOff",
        PoweredOn => "poweredOn",
    }
}

struct Television {
    center: NotificationCenter,
    id: SourceId,
    channel: AtomicU32,
}

impl Television {
    fn new(center: &NotificationCenter) -> Self {
        Self {
            center: center.clone(),
            id: SourceId::new(),
            channel: AtomicU32::new(1),
        }
    }

    fn power_on(&self) {
        self.post(TelevisionEvent::PoweredOn);
    }

    fn power_off(&self) {
        self.post(TelevisionEvent::PoweredOff);
    }

    fn set_channel(&self, channel: u32) {
        self.channel.store(channel, Ordering::SeqCst);
        self.post_with(TelevisionEvent::ChangedChannel, channel);
    }
}

impl Observable for Television {
    type Event = TelevisionEvent;

    fn center(&self) -> &NotificationCenter {
        &self.center
    }

    fn source_id(&self) -> SourceId {
        self.id
    }
}

struct TelevisionWatcher {
    name: &'static str,
}

impl TelevisionWatcher {
    fn watch(self: &Arc<Self>, tv: &Television) {
        let name = self.name;
        tv.subscribe_on(TelevisionEvent::PoweredOn, Affinity::Main, move |n| {
            info!(watcher = name, source = %n.source, "television powered on");
        });
        tv.subscribe_method(TelevisionEvent::ChangedChannel, self, Self::on_channel);
    }

    fn on_channel(&self, n: &Notification) {
        if let Some(channel) = n.payload::<u32>() {
            info!(watcher = self.name, channel, "channel changed");
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let (center, main) = NotificationCenter::builder(Config::default())
        .with_sink(Arc::new(LogWriter::new()))
        .build();
    let token = CancellationToken::new();
    let executor = main.spawn(token.clone());

    let living_room = Television::new(&center);
    let bedroom = Television::new(&center);

    let alice = Arc::new(TelevisionWatcher { name: "alice" });
    alice.watch(&living_room);

    {
        let bob = Arc::new(TelevisionWatcher { name: "bob" });
        bob.watch(&bedroom);
        bedroom.set_channel(4);
    }
    // Bob is gone: the bedroom's method subscription is now stale and gets pruned.
    bedroom.set_channel(5);

    living_room.power_on();
    living_room.set_channel(7);
    living_room.set_channel(11);
    living_room.power_off();

    tokio::time::sleep(Duration::from_millis(50)).await;
    token.cancel();
    if let Err(err) = executor.await {
        tracing::error!(error = %err, "main executor failed");
    }
}
