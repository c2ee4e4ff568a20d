//! Events repository

use chrono::Utc;
use sqlx::{types::Json, Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::event::{Event, EventFields, EventQuery, Participation},
};

#[derive(Clone)]
pub struct EventsRepository {
    pool: Pool<Postgres>,
}

impl EventsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List events with optional filters, most recent first
    pub async fn list(&self, query: &EventQuery) -> AppResult<Vec<Event>> {
        let mut conditions = Vec::new();
        let mut idx = 1;

        if query.category_id.is_some() {
            conditions.push(format!("category_id = ${}", idx));
            idx += 1;
        }
        if query.activity_id.is_some() {
            conditions.push(format!("activity_id = ${}", idx));
            idx += 1;
        }
        if query.year.is_some() {
            conditions.push(format!("EXTRACT(YEAR FROM starts_at)::int = ${}", idx));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let select_q = format!(
            "SELECT * FROM events {} ORDER BY starts_at DESC NULLS LAST, created_at DESC",
            where_clause
        );
        let mut builder = sqlx::query_as::<_, Event>(&select_q);
        if let Some(category_id) = query.category_id {
            builder = builder.bind(category_id);
        }
        if let Some(activity_id) = query.activity_id {
            builder = builder.bind(activity_id);
        }
        if let Some(year) = query.year {
            builder = builder.bind(year);
        }

        let rows = builder.fetch_all(&self.pool).await?;
        Ok(rows)
    }

    /// Get event by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Event> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Event {} not found", id)))
    }

    /// Create an event
    pub async fn create(&self, id: Uuid, data: &EventFields) -> AppResult<Event> {
        let row = sqlx::query_as::<_, Event>(
            r#"
            INSERT INTO events (
                id, title, starts_at, ends_at, location,
                category_id, category_name, activity_id, activity_name,
                leader, description, kind,
                member_ids, vehicle_ids, equipment_ids, participation, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, '[]', $16)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&data.title)
        .bind(data.starts_at)
        .bind(data.ends_at)
        .bind(&data.location)
        .bind(data.category_id)
        .bind(&data.category_name)
        .bind(data.activity_id)
        .bind(&data.activity_name)
        .bind(&data.leader)
        .bind(&data.description)
        .bind(&data.kind)
        .bind(&data.member_ids)
        .bind(&data.vehicle_ids)
        .bind(&data.equipment_ids)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Replace the editable fields of an event; participation is kept
    pub async fn update(&self, id: Uuid, data: &EventFields) -> AppResult<Event> {
        sqlx::query_as::<_, Event>(
            r#"
            UPDATE events SET
                title = $1, starts_at = $2, ends_at = $3, location = $4,
                category_id = $5, category_name = $6, activity_id = $7, activity_name = $8,
                leader = $9, description = $10, kind = $11,
                member_ids = $12, vehicle_ids = $13, equipment_ids = $14,
                updated_at = $15
            WHERE id = $16
            RETURNING *
            "#,
        )
        .bind(&data.title)
        .bind(data.starts_at)
        .bind(data.ends_at)
        .bind(&data.location)
        .bind(data.category_id)
        .bind(&data.category_name)
        .bind(data.activity_id)
        .bind(&data.activity_name)
        .bind(&data.leader)
        .bind(&data.description)
        .bind(&data.kind)
        .bind(&data.member_ids)
        .bind(&data.vehicle_ids)
        .bind(&data.equipment_ids)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Event {} not found", id)))
    }

    /// Store participation minutes and the resulting member list
    pub async fn set_participation(
        &self,
        id: Uuid,
        participation: Vec<Participation>,
        member_ids: &[Uuid],
    ) -> AppResult<Event> {
        sqlx::query_as::<_, Event>(
            r#"
            UPDATE events SET participation = $1, member_ids = $2, updated_at = $3
            WHERE id = $4
            RETURNING *
            "#,
        )
        .bind(Json(participation))
        .bind(member_ids)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Event {} not found", id)))
    }

    /// Delete an event
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Event {} not found", id)));
        }
        Ok(())
    }

    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM events")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
