//! Startup import of a JSON seed file
//!
//! Each collection listed in the file is imported only when the store holds
//! no record of that collection yet. Records keep their ids when given.

use std::path::Path;

use serde::Deserialize;
use uuid::Uuid;

use super::Services;
use crate::{
    error::{AppError, AppResult},
    models::{
        control_log::{SaveLogEquipment, UsageEntry},
        event::{CreateEvent, EventQuery},
        inventory::{CheckoutQuery, CreateCheckout},
        member::CreateMember,
        vehicle::CreateVehicle,
    },
    names::{clean_name, normalize_name},
};

/// A seed record: optional id plus the create payload
#[derive(Debug, Deserialize)]
pub struct SeedRecord<T> {
    pub id: Option<Uuid>,
    #[serde(flatten)]
    pub data: T,
}

impl<T> SeedRecord<T> {
    fn id(&self) -> Uuid {
        self.id.unwrap_or_else(Uuid::new_v4)
    }
}

#[derive(Debug, Deserialize)]
pub struct SeedName {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct SeedActivity {
    pub category_id: Option<Uuid>,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct SeedStockItem {
    pub name: String,
    pub total: i32,
}

#[derive(Debug, Deserialize)]
pub struct SeedLogEquipment {
    pub name: String,
    pub category: Option<String>,
    #[serde(default)]
    pub entries: Vec<UsageEntry>,
}

/// Seed file layout, one optional list per collection
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SeedFile {
    pub members: Vec<SeedRecord<CreateMember>>,
    pub vehicles: Vec<SeedRecord<CreateVehicle>>,
    pub equipment: Vec<SeedRecord<SeedName>>,
    pub activity_categories: Vec<SeedRecord<SeedName>>,
    pub activities: Vec<SeedRecord<SeedActivity>>,
    pub events: Vec<SeedRecord<CreateEvent>>,
    pub stock_items: Vec<SeedRecord<SeedStockItem>>,
    pub checkouts: Vec<SeedRecord<CreateCheckout>>,
    pub control_log_equipment: Vec<SeedRecord<SeedLogEquipment>>,
}

/// Number of records imported per collection
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub imported: usize,
    pub skipped: usize,
}

/// Log and count the outcome of one record
fn tally<T>(report: &mut SeedReport, collection: &str, result: AppResult<T>) {
    match result {
        Ok(_) => report.imported += 1,
        Err(e) => {
            tracing::warn!(collection, error = %e, "Seed record skipped");
            report.skipped += 1;
        }
    }
}

/// Parse a seed document
pub fn parse_seed(content: &str) -> AppResult<SeedFile> {
    serde_json::from_str(content).map_err(|e| AppError::BadRequest(format!("Invalid seed file: {}", e)))
}

/// Read `path` and import every collection that is still empty
pub async fn import_file(services: &Services, path: &Path) -> AppResult<SeedReport> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| AppError::Internal(format!("Cannot read seed file {}: {}", path.display(), e)))?;
    let seed = parse_seed(&content)?;
    let report = import(services, seed).await?;
    tracing::info!(
        path = %path.display(),
        imported = report.imported,
        skipped = report.skipped,
        "Seed import finished"
    );
    Ok(report)
}

/// Import a parsed seed. Parents are imported before the records that
/// reference them.
pub async fn import(services: &Services, seed: SeedFile) -> AppResult<SeedReport> {
    let repo = &services.repository;
    let mut report = SeedReport::default();

    if !seed.members.is_empty() && repo.members.count().await? == 0 {
        for r in seed.members {
            let id = r.id();
            tally(&mut report, "members", services.members.create_with_id(id, r.data).await);
        }
    }

    if !seed.vehicles.is_empty() && repo.vehicles.count().await? == 0 {
        for r in seed.vehicles {
            let id = r.id();
            tally(&mut report, "vehicles", services.vehicles.create_with_id(id, r.data).await);
        }
    }

    if !seed.equipment.is_empty() && repo.equipment.count().await? == 0 {
        for r in seed.equipment {
            let id = r.id();
            tally(&mut report, "equipment", services.equipment.ensure(id, &r.data.name).await);
        }
    }

    if !seed.activity_categories.is_empty() && repo.categories.list().await?.is_empty() {
        for r in seed.activity_categories {
            let id = r.id();
            let result = services.activities.create_category_with_id(id, &r.data.name).await;
            tally(&mut report, "activity_categories", result);
        }
    }

    if !seed.activities.is_empty() && repo.activities.list(None).await?.is_empty() {
        for r in seed.activities {
            let id = r.id();
            let result = match r.data.category_id {
                Some(category_id) => services
                    .activities
                    .create_in_category_with_id(id, category_id, &r.data.name)
                    .await
                    .map(|_| ()),
                None => match clean_name(&r.data.name) {
                    Some(name) => repo
                        .activities
                        .create(id, None, &name, &normalize_name(&name))
                        .await
                        .map(|_| ()),
                    None => Err(AppError::Validation("Activity name is required".to_string())),
                },
            };
            tally(&mut report, "activities", result);
        }
    }

    if !seed.events.is_empty() && repo.events.list(&EventQuery::default()).await?.is_empty() {
        for r in seed.events {
            let id = r.id();
            tally(&mut report, "events", services.events.create_with_id(id, r.data).await);
        }
    }

    if !seed.stock_items.is_empty() && repo.stock_items.list().await?.is_empty() {
        for r in seed.stock_items {
            let id = r.id();
            let result = match clean_name(&r.data.name) {
                Some(name) if r.data.total >= 0 => repo.stock_items.create(id, &name, r.data.total).await,
                _ => Err(AppError::Validation("Stock item needs a name and a total".to_string())),
            };
            tally(&mut report, "stock_items", result);
        }
    }

    if !seed.checkouts.is_empty() && repo.checkouts.list(&CheckoutQuery::default()).await?.is_empty() {
        for r in seed.checkouts {
            let id = r.id();
            tally(&mut report, "checkouts", services.inventory.checkout_with_id(id, r.data).await);
        }
    }

    if !seed.control_log_equipment.is_empty() && repo.control_log.list().await?.is_empty() {
        for r in seed.control_log_equipment {
            let id = r.id();
            let data = SaveLogEquipment {
                name: r.data.name,
                category: r.data.category.unwrap_or_else(|| super::control_log::UNCATEGORIZED.to_string()),
            };
            let result = services
                .control_log
                .create_with_entries(id, data, r.data.entries)
                .await;
            tally(&mut report, "control_log_equipment", result);
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seed() {
        let seed = parse_seed(
            r#"{
                "members": [
                    {"id": "6f1c1f8e-7d1a-4a53-a3f0-0b0d3c1e2f10", "first_name": "Ivan", "last_name": "Horvat", "role": "commander"},
                    {"first_name": "Ana", "last_name": "Kovač", "role": "member"}
                ],
                "stock_items": [{"name": "Kaciga", "total": 10}],
                "control_log_equipment": [{"name": "Stihl MS 261", "category": "Motorne pile"}]
            }"#,
        )
        .unwrap();

        assert_eq!(seed.members.len(), 2);
        assert!(seed.members[0].id.is_some());
        assert!(seed.members[1].id.is_none());
        assert_eq!(seed.members[1].data.first_name, "Ana");
        assert_eq!(seed.stock_items[0].data.total, 10);
        assert!(seed.control_log_equipment[0].data.entries.is_empty());
        assert!(seed.events.is_empty());
    }

    #[test]
    fn test_parse_seed_rejects_garbage() {
        assert!(matches!(parse_seed("[1, 2"), Err(AppError::BadRequest(_))));
    }
}
