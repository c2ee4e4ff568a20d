//! In-process change notifications
//!
//! Every mutating service publishes the collection it touched. Realtime
//! subscribers listen on the hub and rebuild their snapshot on each
//! notification for the collection they follow.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use utoipa::ToSchema;

/// Store collections that can be subscribed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Members,
    Vehicles,
    Equipment,
    ActivityCategories,
    Activities,
    Events,
    StockItems,
    Checkouts,
    ControlLogEquipment,
}

impl Collection {
    pub const ALL: [Collection; 9] = [
        Collection::Members,
        Collection::Vehicles,
        Collection::Equipment,
        Collection::ActivityCategories,
        Collection::Activities,
        Collection::Events,
        Collection::StockItems,
        Collection::Checkouts,
        Collection::ControlLogEquipment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Members => "members",
            Collection::Vehicles => "vehicles",
            Collection::Equipment => "equipment",
            Collection::ActivityCategories => "activity_categories",
            Collection::Activities => "activities",
            Collection::Events => "events",
            Collection::StockItems => "stock_items",
            Collection::Checkouts => "checkouts",
            Collection::ControlLogEquipment => "control_log_equipment",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Collection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Collection::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("Unknown collection: {}", s))
    }
}

/// Broadcast hub for change notifications
#[derive(Clone)]
pub struct ChangeHub {
    sender: broadcast::Sender<Collection>,
}

impl ChangeHub {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Announce that `collection` changed. Having no subscriber is fine.
    pub fn publish(&self, collection: Collection) {
        let receivers = self.sender.send(collection).unwrap_or(0);
        tracing::debug!(collection = %collection, receivers, "Change published");
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Collection> {
        self.sender.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_round_trip_names() {
        for c in Collection::ALL {
            assert_eq!(c.as_str().parse::<Collection>(), Ok(c));
        }
        assert!("loans".parse::<Collection>().is_err());
    }

    #[tokio::test]
    async fn test_publish_reaches_subscribers() {
        let hub = ChangeHub::new(4);
        let mut rx = hub.subscribe();
        hub.publish(Collection::Checkouts);
        assert_eq!(rx.recv().await.unwrap(), Collection::Checkouts);
    }

    #[tokio::test]
    async fn test_lagging_subscriber_is_told() {
        let hub = ChangeHub::new(1);
        let mut rx = hub.subscribe();
        hub.publish(Collection::Members);
        hub.publish(Collection::Events);
        assert!(matches!(
            rx.recv().await,
            Err(broadcast::error::RecvError::Lagged(1))
        ));
        assert_eq!(rx.recv().await.unwrap(), Collection::Events);
    }

    #[test]
    fn test_publish_without_subscribers() {
        ChangeHub::new(2).publish(Collection::Vehicles);
    }
}
