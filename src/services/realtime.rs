//! Collection snapshots for realtime subscribers

use serde::Deserialize;
use serde_json::Value;
use utoipa::IntoParams;
use uuid::Uuid;

use super::{changes::Collection, Services};
use crate::{
    error::{AppError, AppResult},
    models::{event::EventQuery, inventory::CheckoutQuery, member::MemberQuery},
};

/// Equality filters accepted by a subscription
#[derive(Debug, Default, Clone, Deserialize, IntoParams)]
pub struct SubscriptionFilter {
    /// Activities or events of one category
    pub category_id: Option<Uuid>,
    /// Check-outs of one member
    pub member_id: Option<Uuid>,
    /// Check-outs of one stock item
    pub stock_item_id: Option<Uuid>,
}

fn to_value<T: serde::Serialize>(data: T) -> AppResult<Value> {
    serde_json::to_value(data).map_err(|e| AppError::Internal(format!("Snapshot serialization failed: {}", e)))
}

/// Current content of a collection, ordered and filtered like its list
/// endpoint
pub async fn snapshot(services: &Services, collection: Collection, filter: &SubscriptionFilter) -> AppResult<Value> {
    match collection {
        Collection::Members => to_value(services.members.list(&MemberQuery::default()).await?),
        Collection::Vehicles => to_value(services.vehicles.list().await?),
        Collection::Equipment => to_value(services.equipment.list().await?),
        Collection::ActivityCategories => to_value(services.activities.list_categories().await?),
        Collection::Activities => to_value(services.activities.list(filter.category_id).await?),
        Collection::Events => to_value(
            services
                .events
                .list(&EventQuery {
                    category_id: filter.category_id,
                    ..EventQuery::default()
                })
                .await?,
        ),
        Collection::StockItems => to_value(services.inventory.list_items().await?),
        Collection::Checkouts => to_value(
            services
                .inventory
                .list_checkouts(&CheckoutQuery {
                    member_id: filter.member_id,
                    stock_item_id: filter.stock_item_id,
                    q: None,
                })
                .await?,
        ),
        Collection::ControlLogEquipment => to_value(services.control_log.list().await?),
    }
}

/// Whether a change notification requires a new snapshot of `followed`.
/// Stock availability depends on check-outs, so stock subscribers refresh
/// on both.
pub fn affects(followed: Collection, changed: Collection) -> bool {
    followed == changed
        || matches!(
            (followed, changed),
            (Collection::StockItems, Collection::Checkouts)
                | (Collection::Checkouts, Collection::StockItems)
                | (Collection::Checkouts, Collection::Members)
                | (Collection::Activities, Collection::ActivityCategories)
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_affects() {
        assert!(affects(Collection::Members, Collection::Members));
        assert!(affects(Collection::StockItems, Collection::Checkouts));
        assert!(affects(Collection::Checkouts, Collection::Members));
        assert!(affects(Collection::Activities, Collection::ActivityCategories));
        assert!(!affects(Collection::Members, Collection::Checkouts));
        assert!(!affects(Collection::Events, Collection::Vehicles));
    }
}
