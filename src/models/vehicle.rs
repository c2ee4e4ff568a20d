//! Vehicle model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::enums::{VehicleStatus, VehicleType};

/// Vehicle record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Vehicle {
    pub id: Uuid,
    pub vehicle_type: VehicleType,
    pub model: String,
    /// Registration plate, always upper-case
    pub plate: String,
    /// Technical inspection date
    pub inspection_date: Option<NaiveDate>,
    /// Last service date
    pub service_date: Option<NaiveDate>,
    pub status: VehicleStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Vehicle {
    /// "Model (PLATE)" as shown on event reports
    pub fn display_label(&self) -> String {
        if self.plate.is_empty() {
            self.model.clone()
        } else {
            format!("{} ({})", self.model, self.plate)
        }
    }
}

/// Create vehicle request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateVehicle {
    pub vehicle_type: VehicleType,
    #[validate(length(min = 1, message = "Model is required"))]
    pub model: String,
    #[validate(length(min = 1, message = "Plate is required"))]
    pub plate: String,
    pub inspection_date: Option<NaiveDate>,
    pub service_date: Option<NaiveDate>,
    pub status: VehicleStatus,
}

/// Update vehicle request. A `null` date clears it; an absent one is kept.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateVehicle {
    pub vehicle_type: Option<VehicleType>,
    #[validate(length(min = 1, message = "Model is required"))]
    pub model: Option<String>,
    #[validate(length(min = 1, message = "Plate is required"))]
    pub plate: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<NaiveDate>, nullable)]
    pub inspection_date: Option<Option<NaiveDate>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<NaiveDate>, nullable)]
    pub service_date: Option<Option<NaiveDate>>,
    pub status: Option<VehicleStatus>,
}

/// Normalize a registration plate (trimmed, upper-case)
pub fn normalize_plate(plate: &str) -> String {
    plate.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_plate() {
        assert_eq!(normalize_plate("  zg 1234-ab "), "ZG 1234-AB");
    }

    #[test]
    fn test_update_clears_dates() {
        let data: UpdateVehicle = serde_json::from_value(serde_json::json!({
            "inspection_date": null,
            "service_date": "2025-03-01"
        }))
        .unwrap();
        assert_eq!(data.inspection_date, Some(None));
        assert_eq!(data.service_date, NaiveDate::from_ymd_opt(2025, 3, 1).map(Some));

        let data: UpdateVehicle = serde_json::from_value(serde_json::json!({ "model": "MAN" })).unwrap();
        assert_eq!(data.inspection_date, None);
        assert_eq!(data.service_date, None);
    }

    #[test]
    fn test_display_label() {
        let v = Vehicle {
            id: Uuid::new_v4(),
            vehicle_type: VehicleType::FireEngine,
            model: "MAN TGM".to_string(),
            plate: "ZG1234AB".to_string(),
            inspection_date: None,
            service_date: None,
            status: VehicleStatus::Operational,
            created_at: Utc::now(),
            updated_at: None,
        };
        assert_eq!(v.display_label(), "MAN TGM (ZG1234AB)");
    }
}
