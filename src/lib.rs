//! Ephemeral status store with real-time subscriber broadcast
//!
//! Producers publish short-lived statuses that expire after a fixed TTL;
//! connected viewers receive creations, deletions, and expirations as push
//! events. Three components cooperate without sharing locks:
//!
//! - [`StatusStore`] — owns the record collection; stamps creation and
//!   expiry times, filters every read by liveness, serializes all mutation.
//! - [`BroadcastHub`] — owns the subscriber group; fans typed [`Event`]s
//!   out to every current member, best-effort per connection.
//! - [`Sweeper`] — a cancellable background loop that removes records past
//!   their deadline and pushes the `StatusExpired` events no read path
//!   could produce.
//!
//! [`StatusService`] ties store and hub together in the order an external
//! gateway needs: mutate, then notify.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use statushub::{
//!     BroadcastHub, StatusDraft, StatusService, StatusStore, Sweeper,
//! };
//!
//! #[tokio::main]
//! async fn main() -> statushub::Result<()> {
//!     let store = Arc::new(StatusStore::new());
//!     let hub = Arc::new(BroadcastHub::new());
//!     let service = StatusService::new(Arc::clone(&store), Arc::clone(&hub));
//!
//!     let sweeper = Sweeper::new(store, Arc::clone(&hub)).spawn();
//!
//!     let mut viewer = hub.connect().await;
//!     service
//!         .publish(StatusDraft::new("u1", "Alice").content("back at 3pm"))
//!         .await?;
//!
//!     if let Some(event) = viewer.recv().await {
//!         println!("{}", event.name());
//!     }
//!
//!     sweeper.shutdown().await;
//!     Ok(())
//! }
//! ```
//!
//! Time is injected everywhere through the [`Clock`] trait, so expiry and
//! sweep behavior are testable with a [`ManualClock`] instead of real
//! delays.

pub mod broadcast;
pub mod clock;
pub mod error;
pub mod service;
pub mod status;
pub mod sweeper;

pub use broadcast::{BroadcastHub, ConnectionId, Event, Subscription, ViewedReceipt};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{Error, Result};
pub use service::StatusService;
pub use status::{Status, StatusDraft, StatusId, StatusStore, StoreConfig, StoreError};
pub use sweeper::{Sweeper, SweeperConfig, SweeperHandle};
