//! Equipment catalog model (items linked to events)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Equipment catalog record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Equipment {
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Normalized name used for duplicate detection
    pub name_key: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Create equipment request (create-if-not-exists)
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateEquipment {
    pub name: String,
}

/// Rename equipment request
#[derive(Debug, Deserialize, ToSchema)]
pub struct RenameEquipment {
    pub name: String,
}

/// Result of a create-if-not-exists call
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EnsuredRecord {
    pub id: Uuid,
    /// False when an existing record with the same normalized name was returned
    pub created: bool,
}
