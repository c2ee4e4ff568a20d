//! Vehicles repository

use chrono::Utc;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::vehicle::{CreateVehicle, UpdateVehicle, Vehicle},
};

#[derive(Clone)]
pub struct VehiclesRepository {
    pool: Pool<Postgres>,
}

impl VehiclesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all vehicles by plate
    pub async fn list(&self) -> AppResult<Vec<Vehicle>> {
        let rows = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles ORDER BY plate")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Get vehicle by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Vehicle> {
        sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Vehicle {} not found", id)))
    }

    /// Fetch the vehicles with the given ids (unknown ids are skipped)
    pub async fn get_many(&self, ids: &[Uuid]) -> AppResult<Vec<Vehicle>> {
        let rows = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Create a vehicle
    pub async fn create(&self, id: Uuid, data: &CreateVehicle) -> AppResult<Vehicle> {
        let row = sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (
                id, vehicle_type, model, plate, inspection_date, service_date, status, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(data.vehicle_type)
        .bind(&data.model)
        .bind(&data.plate)
        .bind(data.inspection_date)
        .bind(data.service_date)
        .bind(data.status)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Update the fields present in `data`
    pub async fn update(&self, id: Uuid, data: &UpdateVehicle) -> AppResult<Vehicle> {
        let mut sets = vec!["updated_at = $1".to_string()];
        let mut idx = 2;

        macro_rules! add_field {
            ($field:expr, $name:expr) => {
                if $field.is_some() {
                    sets.push(format!("{} = ${}", $name, idx));
                    idx += 1;
                }
            };
        }

        add_field!(data.vehicle_type, "vehicle_type");
        add_field!(data.model, "model");
        add_field!(data.plate, "plate");
        add_field!(data.inspection_date, "inspection_date");
        add_field!(data.service_date, "service_date");
        add_field!(data.status, "status");

        let query = format!(
            "UPDATE vehicles SET {} WHERE id = ${} RETURNING *",
            sets.join(", "),
            idx
        );

        let mut builder = sqlx::query_as::<_, Vehicle>(&query).bind(Utc::now());

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(data.vehicle_type);
        bind_field!(data.model);
        bind_field!(data.plate);
        bind_field!(data.inspection_date);
        bind_field!(data.service_date);
        bind_field!(data.status);

        builder
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Vehicle {} not found", id)))
    }

    /// Delete a vehicle
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM vehicles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Vehicle {} not found", id)));
        }
        Ok(())
    }

    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM vehicles")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
