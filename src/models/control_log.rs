//! Control log: powered equipment with an embedded usage ledger

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// One operating session of a piece of equipment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UsageEntry {
    /// `e_<millis>_<suffix>`
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub date: NaiveDate,
    /// Start time (HH:MM)
    #[serde(default)]
    pub time_from: String,
    /// End time (HH:MM)
    #[serde(default)]
    pub time_to: String,
    /// `"<h>h <m>m"` or `"—"`
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub description: String,
    /// Fuel added, free text such as "2,5 L"
    #[serde(default)]
    pub fuel_added: String,
    /// Member who operated the equipment
    pub user: String,
}

/// Equipment tracked in the control log
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LogEquipment {
    pub id: Uuid,
    pub name: String,
    pub category: Option<String>,
    #[schema(value_type = Vec<UsageEntry>)]
    pub entries: Json<Vec<UsageEntry>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Create or update log equipment (entries are left untouched on update)
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SaveLogEquipment {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Category is required"))]
    pub category: String,
}

/// Add or edit a usage entry
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SaveUsageEntry {
    #[serde(default)]
    pub title: String,
    #[validate(required(message = "Date is required"))]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub time_from: String,
    #[serde(default)]
    pub time_to: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub fuel_added: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "User is required"))]
    pub user: String,
}

/// Per-category totals
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct CategoryStats {
    pub entries: usize,
    pub minutes: i64,
    /// Human readable minutes
    pub duration: String,
    pub litres: Decimal,
}

/// One category block of the control log overview
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CategoryGroup {
    pub category: String,
    pub items: Vec<LogEquipment>,
    pub stats: CategoryStats,
}
