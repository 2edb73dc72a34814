//! Background cleanup sweeper
//!
//! The sweeper is the one component that acts on its own schedule: every
//! interval it removes records past their deadline and pushes a
//! `StatusExpired` event per removed id. Reads are already correct without
//! it (liveness is checked at query time); the sweeper exists to reclaim
//! memory and to emit the expiry notifications no read path can produce.
//!
//! The loop runs until shut down. A failed cycle is logged and retried on a
//! shorter interval; only the shutdown signal stops the task, and it lands
//! at sleep boundaries so an in-flight sweep-and-notify cycle completes.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::broadcast::{BroadcastHub, Event};
use crate::clock::{Clock, SystemClock};
use crate::error::Result;
use crate::status::{StatusId, StatusStore};

/// Sweeper configuration options
#[derive(Debug, Clone)]
pub struct SweeperConfig {
    /// Delay between successful sweep cycles
    pub interval: Duration,

    /// Delay before retrying after a failed cycle
    pub retry_interval: Duration,
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5 * 60),
            retry_interval: Duration::from_secs(60),
        }
    }
}

impl SweeperConfig {
    /// Set the delay between successful cycles
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Set the delay before retrying a failed cycle
    pub fn retry_interval(mut self, interval: Duration) -> Self {
        self.retry_interval = interval;
        self
    }
}

/// Recurring task that removes expired records and notifies subscribers
pub struct Sweeper {
    store: Arc<StatusStore>,
    hub: Arc<BroadcastHub>,
    config: SweeperConfig,
    clock: Arc<dyn Clock>,
}

impl Sweeper {
    /// Create a sweeper with default configuration and the system clock
    pub fn new(store: Arc<StatusStore>, hub: Arc<BroadcastHub>) -> Self {
        Self::with_config(store, hub, SweeperConfig::default())
    }

    /// Create a sweeper with custom configuration
    pub fn with_config(
        store: Arc<StatusStore>,
        hub: Arc<BroadcastHub>,
        config: SweeperConfig,
    ) -> Self {
        Self::with_clock(store, hub, config, Arc::new(SystemClock))
    }

    /// Create a sweeper with custom configuration and time source
    pub fn with_clock(
        store: Arc<StatusStore>,
        hub: Arc<BroadcastHub>,
        config: SweeperConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            hub,
            config,
            clock,
        }
    }

    /// Run a single sweep-and-notify cycle
    ///
    /// Sweeps the store at the clock's current time, then attempts one
    /// `StatusExpired` notification per removed id before returning. Exposed
    /// so tests can drive cycles without the timer.
    pub async fn run_once(&self) -> Result<Vec<StatusId>> {
        let now = self.clock.now();
        let expired = self.store.sweep_expired(now).await;

        for id in &expired {
            self.hub.notify(Event::StatusExpired(*id)).await;
        }

        Ok(expired)
    }

    /// Spawn the sweep loop as a background task
    ///
    /// The loop sweeps immediately, then sleeps `interval` between cycles
    /// (`retry_interval` after a failure). It stops only via the returned
    /// handle.
    pub fn spawn(self) -> SweeperHandle {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(async move {
            tracing::debug!(interval = ?self.config.interval, "Sweeper started");

            loop {
                let delay = match self.run_once().await {
                    Ok(_) => self.config.interval,
                    Err(e) => {
                        tracing::error!(error = %e, "Sweep cycle failed");
                        self.config.retry_interval
                    }
                };

                tokio::select! {
                    _ = tokio::time::sleep(delay) => {}
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            break;
                        }
                    }
                }
            }

            tracing::debug!("Sweeper stopped");
        });

        SweeperHandle {
            shutdown: shutdown_tx,
            handle,
        }
    }
}

/// Handle for stopping a spawned sweeper
pub struct SweeperHandle {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl SweeperHandle {
    /// Signal the loop to stop and wait for it to finish
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        let _ = self.handle.await;
    }

    /// Whether the loop has already exited
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration as ChronoDuration, Utc};

    use crate::clock::ManualClock;
    use crate::status::{StatusDraft, StoreConfig};

    use super::*;

    fn fixture(ttl: ChronoDuration) -> (Arc<StatusStore>, Arc<BroadcastHub>, ManualClock) {
        let clock = ManualClock::new(Utc::now());
        let store = Arc::new(StatusStore::with_clock(
            StoreConfig::default().ttl(ttl),
            Arc::new(clock.clone()),
        ));
        let hub = Arc::new(BroadcastHub::with_clock(Arc::new(clock.clone())));
        (store, hub, clock)
    }

    #[tokio::test]
    async fn test_run_once_sweeps_and_notifies() {
        let (store, hub, clock) = fixture(ChronoDuration::hours(1));
        let sweeper = Sweeper::with_clock(
            Arc::clone(&store),
            Arc::clone(&hub),
            SweeperConfig::default(),
            Arc::new(clock.clone()),
        );
        let mut sub = hub.connect().await;

        let status = store.create(StatusDraft::new("u1", "Alice")).await.unwrap();
        clock.advance(ChronoDuration::hours(2));

        let removed = sweeper.run_once().await.unwrap();
        assert_eq!(removed, vec![status.id]);

        let event = sub.recv().await.unwrap();
        assert_eq!(*event, Event::StatusExpired(status.id));
        assert!(sub.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_run_once_with_nothing_due() {
        let (store, hub, clock) = fixture(ChronoDuration::hours(1));
        let sweeper = Sweeper::with_clock(
            Arc::clone(&store),
            Arc::clone(&hub),
            SweeperConfig::default(),
            Arc::new(clock.clone()),
        );
        let mut sub = hub.connect().await;

        store.create(StatusDraft::new("u1", "Alice")).await.unwrap();

        let removed = sweeper.run_once().await.unwrap();
        assert!(removed.is_empty());
        assert!(sub.try_recv().is_none());
        assert_eq!(store.count().await, 1);
    }

    #[tokio::test]
    async fn test_run_once_notifies_every_removed_id() {
        let (store, hub, clock) = fixture(ChronoDuration::hours(1));
        let sweeper = Sweeper::with_clock(
            Arc::clone(&store),
            Arc::clone(&hub),
            SweeperConfig::default(),
            Arc::new(clock.clone()),
        );
        let mut sub = hub.connect().await;

        let a = store.create(StatusDraft::new("u1", "Alice")).await.unwrap();
        let b = store.create(StatusDraft::new("u2", "Bob")).await.unwrap();
        clock.advance(ChronoDuration::hours(2));

        let removed = sweeper.run_once().await.unwrap();
        assert_eq!(removed, vec![a.id, b.id]);

        let mut seen = Vec::new();
        while let Some(event) = sub.try_recv() {
            match &*event {
                Event::StatusExpired(id) => seen.push(*id),
                other => panic!("unexpected event: {:?}", other),
            }
        }
        seen.sort();
        assert_eq!(seen, vec![a.id, b.id]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawned_loop_sweeps_on_interval() {
        let (store, hub, clock) = fixture(ChronoDuration::hours(1));
        let sweeper = Sweeper::with_clock(
            Arc::clone(&store),
            Arc::clone(&hub),
            SweeperConfig::default().interval(std::time::Duration::from_secs(60)),
            Arc::new(clock.clone()),
        );
        let mut sub = hub.connect().await;

        let status = store.create(StatusDraft::new("u1", "Alice")).await.unwrap();
        clock.advance(ChronoDuration::hours(2));

        let handle = sweeper.spawn();

        // Paused tokio time auto-advances past the sleeps; the record is
        // already due, so the first cycle removes it.
        let event = sub.recv().await.unwrap();
        assert_eq!(*event, Event::StatusExpired(status.id));
        assert_eq!(store.count().await, 0);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_loop() {
        let (store, hub, clock) = fixture(ChronoDuration::hours(1));
        let sweeper = Sweeper::with_clock(
            store,
            hub,
            SweeperConfig::default(),
            Arc::new(clock.clone()),
        );

        let handle = sweeper.spawn();
        handle.shutdown().await;
    }

    #[test]
    fn test_default_config_intervals() {
        let config = SweeperConfig::default();

        assert_eq!(config.interval, Duration::from_secs(300));
        assert_eq!(config.retry_interval, Duration::from_secs(60));
    }

    #[test]
    fn test_builder_chaining() {
        let config = SweeperConfig::default()
            .interval(Duration::from_secs(10))
            .retry_interval(Duration::from_secs(2));

        assert_eq!(config.interval, Duration::from_secs(10));
        assert_eq!(config.retry_interval, Duration::from_secs(2));
    }
}
