//! Vehicles service

use uuid::Uuid;
use validator::Validate;

use super::changes::{ChangeHub, Collection};
use crate::{
    error::AppResult,
    models::vehicle::{normalize_plate, CreateVehicle, UpdateVehicle, Vehicle},
    repository::Repository,
};

#[derive(Clone)]
pub struct VehiclesService {
    repository: Repository,
    changes: ChangeHub,
}

impl VehiclesService {
    pub fn new(repository: Repository, changes: ChangeHub) -> Self {
        Self { repository, changes }
    }

    pub async fn list(&self) -> AppResult<Vec<Vehicle>> {
        self.repository.vehicles.list().await
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Vehicle> {
        self.repository.vehicles.get_by_id(id).await
    }

    pub async fn create(&self, data: CreateVehicle) -> AppResult<Vehicle> {
        self.create_with_id(Uuid::new_v4(), data).await
    }

    pub async fn create_with_id(&self, id: Uuid, data: CreateVehicle) -> AppResult<Vehicle> {
        let data = CreateVehicle {
            model: data.model.trim().to_string(),
            plate: normalize_plate(&data.plate),
            ..data
        };
        data.validate()?;

        let vehicle = self.repository.vehicles.create(id, &data).await?;
        tracing::info!(vehicle_id = %vehicle.id, plate = %vehicle.plate, "Vehicle created");
        self.changes.publish(Collection::Vehicles);
        Ok(vehicle)
    }

    pub async fn update(&self, id: Uuid, data: UpdateVehicle) -> AppResult<Vehicle> {
        let data = UpdateVehicle {
            model: data.model.map(|m| m.trim().to_string()),
            plate: data.plate.as_deref().map(normalize_plate),
            ..data
        };
        data.validate()?;

        let vehicle = self.repository.vehicles.update(id, &data).await?;
        tracing::info!(vehicle_id = %id, "Vehicle updated");
        self.changes.publish(Collection::Vehicles);
        Ok(vehicle)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.repository.vehicles.delete(id).await?;
        tracing::info!(vehicle_id = %id, "Vehicle deleted");
        self.changes.publish(Collection::Vehicles);
        Ok(())
    }
}
