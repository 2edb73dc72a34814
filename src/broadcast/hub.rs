//! Broadcast hub implementation
//!
//! Owns the connection registry and the membership set of the single
//! broadcast group. Fan-out never blocks on a member and never fails the
//! caller; the window between a store mutation and its notification is two
//! sequential calls, never one critical section.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, RwLock};

use crate::clock::{Clock, SystemClock};
use crate::status::StatusId;

use super::event::{Event, ViewedReceipt};
use super::subscriber::{ConnectionId, Subscription};

struct HubInner {
    /// All registered connections, member or not
    connections: HashMap<ConnectionId, mpsc::UnboundedSender<Arc<Event>>>,

    /// Connections currently in the broadcast group
    members: HashSet<ConnectionId>,
}

/// Broadcast hub for the single subscriber group
///
/// Independent of store state; membership churn and delivery are safe under
/// concurrent store mutation.
pub struct BroadcastHub {
    inner: RwLock<HubInner>,

    /// Next connection id to assign
    next_connection_id: AtomicU64,

    /// Time source for server-assigned view timestamps
    clock: Arc<dyn Clock>,
}

impl BroadcastHub {
    /// Create a hub using the system clock
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create a hub with a custom time source
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: RwLock::new(HubInner {
                connections: HashMap::new(),
                members: HashSet::new(),
            }),
            next_connection_id: AtomicU64::new(1),
            clock,
        }
    }

    /// Register a new connection
    ///
    /// The connection joins the group immediately; it receives every event
    /// broadcast from this point until it leaves or disconnects.
    pub async fn connect(&self) -> Subscription {
        let id = ConnectionId::new(self.next_connection_id.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = mpsc::unbounded_channel();

        let mut inner = self.inner.write().await;
        inner.connections.insert(id, tx);
        inner.members.insert(id);

        tracing::debug!(connection = %id, members = inner.members.len(), "Connection joined");

        Subscription { id, rx }
    }

    /// Remove a connection entirely
    ///
    /// Idempotent; unknown ids are ignored.
    pub async fn disconnect(&self, id: ConnectionId) {
        let mut inner = self.inner.write().await;
        inner.members.remove(&id);

        if inner.connections.remove(&id).is_some() {
            tracing::debug!(connection = %id, members = inner.members.len(), "Connection left");
        }
    }

    /// Add a connection back into the broadcast group
    ///
    /// Idempotent; joining while already a member changes nothing. A join
    /// for a connection the hub does not know is a logged no-op.
    pub async fn join(&self, id: ConnectionId) {
        let mut inner = self.inner.write().await;

        if !inner.connections.contains_key(&id) {
            tracing::warn!(connection = %id, "Join for unknown connection");
            return;
        }
        inner.members.insert(id);
    }

    /// Take a connection out of the broadcast group without disconnecting
    ///
    /// Idempotent; leaving while not a member changes nothing.
    pub async fn leave(&self, id: ConnectionId) {
        let mut inner = self.inner.write().await;
        inner.members.remove(&id);
    }

    /// Deliver an event to every current member
    ///
    /// Returns the number of members reached. A member whose receiver is
    /// gone is skipped and pruned afterwards; nothing propagates to the
    /// caller. Sends are non-blocking, so one dead or slow member cannot
    /// stall the rest of the fan-out.
    pub async fn notify(&self, event: Event) -> usize {
        let event = Arc::new(event);
        let mut dead: Vec<ConnectionId> = Vec::new();
        let mut delivered = 0;

        {
            let inner = self.inner.read().await;
            for id in &inner.members {
                let Some(tx) = inner.connections.get(id) else {
                    continue;
                };
                if tx.send(Arc::clone(&event)).is_ok() {
                    delivered += 1;
                } else {
                    dead.push(*id);
                }
            }
        }

        if !dead.is_empty() {
            let mut inner = self.inner.write().await;
            for id in &dead {
                inner.members.remove(id);
                inner.connections.remove(id);
            }
            tracing::debug!(pruned = dead.len(), "Dropped connections pruned during broadcast");
        }

        tracing::trace!(event = event.name(), delivered = delivered, "Event broadcast");

        delivered
    }

    /// Broadcast that a viewer looked at a status
    ///
    /// Pass-through signal with a server-assigned timestamp; does not touch
    /// the store.
    pub async fn status_viewed(
        &self,
        status_id: StatusId,
        viewer_user_id: impl Into<String>,
        viewer_user_name: impl Into<String>,
    ) -> usize {
        let receipt = ViewedReceipt {
            status_id,
            viewer_user_id: viewer_user_id.into(),
            viewer_user_name: viewer_user_name.into(),
            viewed_at: self.clock.now(),
        };
        self.notify(Event::StatusViewed(receipt)).await
    }

    /// Number of connections currently in the broadcast group
    pub async fn member_count(&self) -> usize {
        self.inner.read().await.members.len()
    }

    /// Number of registered connections, member or not
    pub async fn connection_count(&self) -> usize {
        self.inner.read().await.connections.len()
    }
}

impl Default for BroadcastHub {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use crate::clock::ManualClock;
    use crate::status::StatusId;

    use super::*;

    #[tokio::test]
    async fn test_connect_auto_joins() {
        let hub = BroadcastHub::new();

        let sub = hub.connect().await;

        assert_eq!(hub.connection_count().await, 1);
        assert_eq!(hub.member_count().await, 1);
        drop(sub);
    }

    #[tokio::test]
    async fn test_join_and_leave_are_idempotent() {
        let hub = BroadcastHub::new();
        let sub = hub.connect().await;

        hub.join(sub.id()).await;
        hub.join(sub.id()).await;
        assert_eq!(hub.member_count().await, 1);

        hub.leave(sub.id()).await;
        hub.leave(sub.id()).await;
        assert_eq!(hub.member_count().await, 0);
        assert_eq!(hub.connection_count().await, 1);
    }

    #[tokio::test]
    async fn test_join_unknown_connection_is_noop() {
        let hub = BroadcastHub::new();
        let sub = hub.connect().await;
        hub.disconnect(sub.id()).await;

        hub.join(sub.id()).await;

        assert_eq!(hub.member_count().await, 0);
    }

    #[tokio::test]
    async fn test_notify_reaches_only_members() {
        let hub = BroadcastHub::new();
        let mut staying = hub.connect().await;
        let mut left = hub.connect().await;
        hub.leave(left.id()).await;

        let delivered = hub.notify(Event::StatusDeleted(StatusId::new(1))).await;

        assert_eq!(delivered, 1);
        assert!(staying.try_recv().is_some());
        assert!(left.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_rejoin_resumes_delivery() {
        let hub = BroadcastHub::new();
        let mut sub = hub.connect().await;

        hub.leave(sub.id()).await;
        hub.notify(Event::StatusDeleted(StatusId::new(1))).await;
        hub.join(sub.id()).await;
        hub.notify(Event::StatusDeleted(StatusId::new(2))).await;

        // Only the post-rejoin event arrives; nothing is queued for absence
        let event = sub.try_recv().unwrap();
        assert_eq!(*event, Event::StatusDeleted(StatusId::new(2)));
        assert!(sub.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_disconnected_member_misses_events() {
        let hub = BroadcastHub::new();
        let mut staying = hub.connect().await;
        let gone = hub.connect().await;
        hub.disconnect(gone.id()).await;

        let delivered = hub.notify(Event::StatusExpired(StatusId::new(9))).await;

        assert_eq!(delivered, 1);
        assert!(staying.try_recv().is_some());
    }

    #[tokio::test]
    async fn test_dropped_receiver_is_pruned() {
        let hub = BroadcastHub::new();
        let mut staying = hub.connect().await;
        let dropped = hub.connect().await;
        drop(dropped);

        let delivered = hub.notify(Event::StatusDeleted(StatusId::new(1))).await;

        assert_eq!(delivered, 1);
        assert!(staying.try_recv().is_some());
        assert_eq!(hub.connection_count().await, 1);
        assert_eq!(hub.member_count().await, 1);
    }

    #[tokio::test]
    async fn test_events_arrive_in_issue_order() {
        let hub = BroadcastHub::new();
        let mut sub = hub.connect().await;

        for i in 1..=5 {
            hub.notify(Event::StatusDeleted(StatusId::new(i))).await;
        }

        for i in 1..=5 {
            let event = sub.recv().await.unwrap();
            assert_eq!(*event, Event::StatusDeleted(StatusId::new(i)));
        }
    }

    #[tokio::test]
    async fn test_connection_ids_are_distinct() {
        let hub = BroadcastHub::new();

        let a = hub.connect().await;
        let b = hub.connect().await;

        assert_ne!(a.id(), b.id());
    }

    #[tokio::test]
    async fn test_status_viewed_stamps_server_time() {
        let start = Utc::now();
        let clock = ManualClock::new(start);
        let hub = BroadcastHub::with_clock(Arc::new(clock.clone()));
        let mut sub = hub.connect().await;

        clock.advance(Duration::minutes(10));
        hub.status_viewed(StatusId::new(3), "u2", "Bob").await;

        let event = sub.recv().await.unwrap();
        match &*event {
            Event::StatusViewed(receipt) => {
                assert_eq!(receipt.status_id, StatusId::new(3));
                assert_eq!(receipt.viewer_user_id, "u2");
                assert_eq!(receipt.viewer_user_name, "Bob");
                assert_eq!(receipt.viewed_at, start + Duration::minutes(10));
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }
}
