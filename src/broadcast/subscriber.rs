//! Subscriber connection handle types

use std::sync::Arc;

use tokio::sync::mpsc;

use super::event::Event;

/// Opaque identifier for a connection known to the hub
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub(super) fn new(value: u64) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Receiving end of a connection registered with the hub
///
/// Holds the connection id and the event channel. Dropping the subscription
/// without calling `disconnect` is tolerated: the hub prunes the connection
/// the next time a send to it fails.
pub struct Subscription {
    pub(super) id: ConnectionId,
    pub(super) rx: mpsc::UnboundedReceiver<Arc<Event>>,
}

impl Subscription {
    /// The hub-assigned connection id
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Wait for the next event
    ///
    /// Returns `None` once the hub side of the channel is gone.
    pub async fn recv(&mut self) -> Option<Arc<Event>> {
        self.rx.recv().await
    }

    /// Take the next event if one is already queued
    pub fn try_recv(&mut self) -> Option<Arc<Event>> {
        self.rx.try_recv().ok()
    }
}
