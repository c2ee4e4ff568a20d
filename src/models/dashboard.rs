//! Dashboard overview types

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// Short event line for the "latest activities" card
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecentEvent {
    pub id: Uuid,
    pub title: String,
    pub kind: String,
    pub starts_at: Option<DateTime<Utc>>,
}

/// Yearly split between interventions and everything else
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct KindStats {
    pub interventions: i64,
    pub other: i64,
    pub total: i64,
}

/// Number of records per collection
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct CollectionCounts {
    pub members: i64,
    pub vehicles: i64,
    pub equipment: i64,
    pub events: i64,
}

/// Home page overview
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DashboardOverview {
    pub year: i32,
    pub recent_events: Vec<RecentEvent>,
    pub kinds: KindStats,
    /// Events per month (January first) in `year`
    #[schema(value_type = Vec<i64>)]
    pub monthly: [i64; 12],
    pub counts: CollectionCounts,
}
