//! Control log repository. Usage entries live in a JSONB column of their
//! equipment row and are always written as a whole list.

use chrono::Utc;
use sqlx::{types::Json, Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::control_log::{LogEquipment, UsageEntry},
};

#[derive(Clone)]
pub struct ControlLogRepository {
    pool: Pool<Postgres>,
}

impl ControlLogRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all log equipment, newest first
    pub async fn list(&self) -> AppResult<Vec<LogEquipment>> {
        let rows = sqlx::query_as::<_, LogEquipment>(
            "SELECT * FROM control_log_equipment ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<LogEquipment> {
        sqlx::query_as::<_, LogEquipment>("SELECT * FROM control_log_equipment WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Log equipment {} not found", id)))
    }

    /// Create log equipment, optionally with existing entries
    pub async fn create(
        &self,
        id: Uuid,
        name: &str,
        category: &str,
        entries: Vec<UsageEntry>,
    ) -> AppResult<LogEquipment> {
        let row = sqlx::query_as::<_, LogEquipment>(
            r#"
            INSERT INTO control_log_equipment (id, name, category, entries, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(category)
        .bind(Json(entries))
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Update name and category
    pub async fn update(&self, id: Uuid, name: &str, category: &str) -> AppResult<LogEquipment> {
        sqlx::query_as::<_, LogEquipment>(
            r#"
            UPDATE control_log_equipment SET name = $1, category = $2, updated_at = $3
            WHERE id = $4
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(category)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Log equipment {} not found", id)))
    }

    /// Replace the entry list
    pub async fn set_entries(&self, id: Uuid, entries: Vec<UsageEntry>) -> AppResult<LogEquipment> {
        sqlx::query_as::<_, LogEquipment>(
            r#"
            UPDATE control_log_equipment SET entries = $1, updated_at = $2
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(Json(entries))
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Log equipment {} not found", id)))
    }

    /// Delete equipment and its entries
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM control_log_equipment WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Log equipment {} not found", id)));
        }
        Ok(())
    }
}
