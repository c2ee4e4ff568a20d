//! Check-out book: stock items and the check-out records against them

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Stock item (article kept in storage)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct StockItem {
    pub id: Uuid,
    pub name: String,
    /// Total number of pieces owned
    pub total: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Stock item with its derived availability
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StockItemAvailability {
    #[serde(flatten)]
    pub item: StockItem,
    /// Pieces currently checked out
    pub checked_out: i64,
    /// `total - checked_out`, may be negative after a concurrent write
    pub available: i64,
}

/// Stock overview
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StockSummary {
    pub total_items: usize,
    pub total_pieces: i64,
    pub total_available: i64,
    /// Items with nothing left to check out
    pub critical: Vec<StockItemAvailability>,
}

/// Check-out record: one unit of a stock item assigned to a member
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Checkout {
    pub id: Uuid,
    pub member_id: Uuid,
    pub stock_item_id: Uuid,
    /// Optional tag (inventory mark, size...)
    pub tag: Option<String>,
    pub checkout_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Procurement: add pieces to an existing item (same name) or create it
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct Procure {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
}

/// Edit a stock item
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateStockItem {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(range(min = 0, message = "Total cannot be negative"))]
    pub total: i32,
}

/// Check out one unit to a member
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateCheckout {
    pub member_id: Uuid,
    pub stock_item_id: Uuid,
    pub tag: Option<String>,
    /// Defaults to today
    pub checkout_date: Option<NaiveDate>,
}

/// Edit a check-out record
pub type UpdateCheckout = CreateCheckout;

/// One row of a bulk check-out
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct BulkCheckoutRow {
    pub stock_item_id: Option<Uuid>,
    pub quantity: i32,
    pub tag: Option<String>,
}

/// Check out several items (and several units each) to one member
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct BulkCheckout {
    pub member_id: Uuid,
    pub checkout_date: Option<NaiveDate>,
    pub rows: Vec<BulkCheckoutRow>,
}

/// Validation problem on a bulk check-out row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct RowError {
    /// Zero-based row index
    pub row: usize,
    pub message: String,
}

/// Check-out list filters
#[derive(Debug, Default, Clone, Deserialize, IntoParams, ToSchema)]
pub struct CheckoutQuery {
    pub member_id: Option<Uuid>,
    pub stock_item_id: Option<Uuid>,
    /// Search in member name, item name, tag and date
    pub q: Option<String>,
}

/// Check-out joined with display names
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CheckoutDetails {
    #[serde(flatten)]
    pub checkout: Checkout,
    /// "Last First", empty when the member no longer exists
    pub member_name: String,
    /// Empty when the stock item no longer exists
    pub item_name: String,
}

/// Trim an optional tag; blank tags become `None`
pub fn clean_tag(tag: Option<&str>) -> Option<String> {
    tag.map(str::trim).filter(|t| !t.is_empty()).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_tag() {
        assert_eq!(clean_tag(Some("  XL ")), Some("XL".to_string()));
        assert_eq!(clean_tag(Some("   ")), None);
        assert_eq!(clean_tag(None), None);
    }
}
