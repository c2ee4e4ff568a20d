//! Activity taxonomy: categories and the activities inside them

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Activity category (e.g. operational activities, meetings)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ActivityCategory {
    pub id: Uuid,
    pub name: String,
    pub name_key: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Activity, optionally attached to a category
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Activity {
    pub id: Uuid,
    pub category_id: Option<Uuid>,
    pub name: String,
    pub name_key: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Create or rename a category
#[derive(Debug, Deserialize, ToSchema)]
pub struct CategoryName {
    pub name: String,
}

/// Create an activity; without `category_id` the name is deduplicated globally
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateActivity {
    pub category_id: Option<Uuid>,
    pub name: String,
}

/// Add several activities to one category at once
#[derive(Debug, Deserialize, ToSchema)]
pub struct BulkCreateActivities {
    pub names: Vec<String>,
}

/// Outcome of a bulk add
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BulkCreateResult {
    pub created: Vec<Activity>,
    /// Names skipped as duplicates (within the request or the category)
    pub skipped: Vec<String>,
}

/// Rename an activity within a category
#[derive(Debug, Deserialize, ToSchema)]
pub struct RenameActivity {
    pub category_id: Uuid,
    pub name: String,
}

/// Activity query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct ActivityQuery {
    /// Equality filter on the parent category
    pub category_id: Option<Uuid>,
}

/// Backfill result
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BackfillResult {
    pub updated: u64,
}
