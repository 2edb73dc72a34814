//! Gateway-facing service facade
//!
//! The orchestration layer an external request/connection surface calls
//! into. Each mutation is a store call followed by a hub notification —
//! two sequential calls, never nested under one lock, so the store and hub
//! can never deadlock against each other. A reader polling the store
//! between those two calls may see the mutation before its event arrives;
//! the pull and push channels are allowed to be briefly out of sync.

use std::sync::Arc;

use crate::broadcast::{BroadcastHub, Event};
use crate::error::Result;
use crate::status::{Status, StatusDraft, StatusId, StatusStore};

/// Facade combining the status store and the broadcast hub
///
/// Cheap to clone; clones share the same store and hub.
#[derive(Clone)]
pub struct StatusService {
    store: Arc<StatusStore>,
    hub: Arc<BroadcastHub>,
}

impl StatusService {
    /// Create a service over an existing store and hub
    pub fn new(store: Arc<StatusStore>, hub: Arc<BroadcastHub>) -> Self {
        Self { store, hub }
    }

    /// The underlying store
    pub fn store(&self) -> &Arc<StatusStore> {
        &self.store
    }

    /// The underlying hub, for connection lifecycle and view signals
    pub fn hub(&self) -> &Arc<BroadcastHub> {
        &self.hub
    }

    /// Publish a status and announce it to subscribers
    pub async fn publish(&self, draft: StatusDraft) -> Result<Status> {
        let status = self.store.create(draft).await?;
        self.hub.notify(Event::StatusAdded(status.clone())).await;
        Ok(status)
    }

    /// All live statuses, newest first
    pub async fn active(&self) -> Vec<Status> {
        self.store.list_active().await
    }

    /// One user's live statuses, newest first
    pub async fn active_for_user(&self, user_id: &str) -> Vec<Status> {
        self.store.list_active_by_user(user_id).await
    }

    /// Delete a status by id and announce the deletion
    ///
    /// Succeeds on an expired-but-unswept record; validation and not-found
    /// failures emit no events.
    pub async fn remove(&self, id: StatusId) -> Result<Status> {
        let status = self.store.delete(id).await?;
        self.hub.notify(Event::StatusDeleted(status.id)).await;
        Ok(status)
    }

    /// Delete every status of a user, announcing each removed id
    pub async fn remove_all_for_user(&self, user_id: &str) -> Result<Vec<StatusId>> {
        let ids = self.store.delete_all_for_user(user_id).await?;
        for id in &ids {
            self.hub.notify(Event::StatusDeleted(*id)).await;
        }
        Ok(ids)
    }
}
