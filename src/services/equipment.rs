//! Equipment catalog service
//!
//! Names are deduplicated through their normalized key: creating a name that
//! already exists returns the existing record instead of a copy.

use uuid::Uuid;

use super::changes::{ChangeHub, Collection};
use crate::{
    error::{AppError, AppResult},
    models::{
        activity::BackfillResult,
        equipment::{EnsuredRecord, Equipment},
    },
    names::{clean_name, normalize_name},
    repository::Repository,
};

#[derive(Clone)]
pub struct EquipmentService {
    repository: Repository,
    changes: ChangeHub,
}

impl EquipmentService {
    pub fn new(repository: Repository, changes: ChangeHub) -> Self {
        Self { repository, changes }
    }

    pub async fn list(&self) -> AppResult<Vec<Equipment>> {
        self.repository.equipment.list().await
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Equipment> {
        self.repository.equipment.get_by_id(id).await
    }

    /// Return the record with the same normalized name, or create one
    pub async fn create_if_not_exists(&self, name: &str) -> AppResult<EnsuredRecord> {
        self.ensure(Uuid::new_v4(), name).await
    }

    pub(crate) async fn ensure(&self, id: Uuid, name: &str) -> AppResult<EnsuredRecord> {
        let name = clean_name(name)
            .ok_or_else(|| AppError::Validation("Equipment name is required".to_string()))?;
        let key = normalize_name(&name);

        if let Some(existing) = self.repository.equipment.find_by_key(&key).await? {
            tracing::debug!(equipment_id = %existing.id, "Equipment already exists");
            return Ok(EnsuredRecord { id: existing.id, created: false });
        }

        let created = self.repository.equipment.create(id, &name, &key).await?;
        tracing::info!(equipment_id = %created.id, name = %created.name, "Equipment created");
        self.changes.publish(Collection::Equipment);
        Ok(EnsuredRecord { id: created.id, created: true })
    }

    /// Rename, refusing a name already used by another record
    pub async fn rename(&self, id: Uuid, name: &str) -> AppResult<Equipment> {
        let name = clean_name(name)
            .ok_or_else(|| AppError::Validation("Equipment name is required".to_string()))?;
        let key = normalize_name(&name);

        if let Some(other) = self.repository.equipment.find_by_key(&key).await? {
            if other.id != id {
                return Err(AppError::Conflict(format!(
                    "Equipment \"{}\" already exists",
                    other.name
                )));
            }
        }

        let equipment = self.repository.equipment.rename(id, &name, &key).await?;
        tracing::info!(equipment_id = %id, name = %equipment.name, "Equipment renamed");
        self.changes.publish(Collection::Equipment);
        Ok(equipment)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.repository.equipment.delete(id).await?;
        tracing::info!(equipment_id = %id, "Equipment deleted");
        self.changes.publish(Collection::Equipment);
        Ok(())
    }

    /// Recompute missing or stale keys
    pub async fn backfill_name_keys(&self) -> AppResult<BackfillResult> {
        let mut updated = 0;
        for equipment in self.repository.equipment.list().await? {
            let key = normalize_name(&equipment.name);
            if equipment.name_key.as_deref() != Some(key.as_str()) {
                self.repository.equipment.set_name_key(equipment.id, &key).await?;
                updated += 1;
            }
        }

        tracing::info!(updated, "Equipment name keys backfilled");
        if updated > 0 {
            self.changes.publish(Collection::Equipment);
        }
        Ok(BackfillResult { updated })
    }
}
