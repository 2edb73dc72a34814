//! Broadcast event types
//!
//! The events pushed to subscribers, tagged by event name on the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::status::{Status, StatusId};

/// An event delivered to every current member of the broadcast group
///
/// Serializes as `{"event": "<name>", "data": <payload>}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum Event {
    /// A status was published; carries the full record
    StatusAdded(Status),
    /// A status was explicitly deleted
    StatusDeleted(StatusId),
    /// A status reached its deadline and was swept
    StatusExpired(StatusId),
    /// A viewer looked at a status; pure signal, no store mutation
    StatusViewed(ViewedReceipt),
}

impl Event {
    /// Wire name of the event
    pub fn name(&self) -> &'static str {
        match self {
            Event::StatusAdded(_) => "StatusAdded",
            Event::StatusDeleted(_) => "StatusDeleted",
            Event::StatusExpired(_) => "StatusExpired",
            Event::StatusViewed(_) => "StatusViewed",
        }
    }
}

/// Payload of a `StatusViewed` broadcast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewedReceipt {
    /// The status that was viewed
    pub status_id: StatusId,
    /// Who viewed it
    pub viewer_user_id: String,
    pub viewer_user_name: String,
    /// Server-assigned view timestamp
    pub viewed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        let receipt = ViewedReceipt {
            status_id: StatusId::new(1),
            viewer_user_id: "u2".to_string(),
            viewer_user_name: "Bob".to_string(),
            viewed_at: Utc::now(),
        };

        assert_eq!(Event::StatusDeleted(StatusId::new(1)).name(), "StatusDeleted");
        assert_eq!(Event::StatusExpired(StatusId::new(1)).name(), "StatusExpired");
        assert_eq!(Event::StatusViewed(receipt).name(), "StatusViewed");
    }

    #[test]
    fn test_event_wire_shape() {
        let event = Event::StatusExpired(StatusId::new(42));
        let value = serde_json::to_value(&event).unwrap();

        assert_eq!(value.get("event").unwrap(), "StatusExpired");
        assert_eq!(value.get("data").unwrap().as_u64(), Some(42));
    }

    #[test]
    fn test_viewed_receipt_wire_shape() {
        let event = Event::StatusViewed(ViewedReceipt {
            status_id: StatusId::new(7),
            viewer_user_id: "u2".to_string(),
            viewer_user_name: "Bob".to_string(),
            viewed_at: Utc::now(),
        });
        let value = serde_json::to_value(&event).unwrap();
        let data = value.get("data").unwrap();

        assert_eq!(data.get("statusId").unwrap().as_u64(), Some(7));
        assert!(data.get("viewerUserId").is_some());
        assert!(data.get("viewerUserName").is_some());
        assert!(data.get("viewedAt").is_some());
    }
}
