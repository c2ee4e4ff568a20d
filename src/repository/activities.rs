//! Activities repository

use chrono::Utc;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::activity::Activity,
};

#[derive(Clone)]
pub struct ActivitiesRepository {
    pool: Pool<Postgres>,
}

impl ActivitiesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List activities by name, optionally restricted to one category
    pub async fn list(&self, category_id: Option<Uuid>) -> AppResult<Vec<Activity>> {
        let rows = sqlx::query_as::<_, Activity>(
            r#"
            SELECT * FROM activities
            WHERE $1::uuid IS NULL OR category_id = $1
            ORDER BY name
            "#,
        )
        .bind(category_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Get activity by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Activity> {
        sqlx::query_as::<_, Activity>("SELECT * FROM activities WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Activity {} not found", id)))
    }

    /// Any activity with this key, whatever its category
    pub async fn find_by_key(&self, key: &str) -> AppResult<Option<Activity>> {
        let row = sqlx::query_as::<_, Activity>(
            "SELECT * FROM activities WHERE name_key = $1 ORDER BY created_at LIMIT 1",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Activity with this key inside a category, optionally ignoring one record
    pub async fn find_in_category(
        &self,
        category_id: Uuid,
        key: &str,
        exclude: Option<Uuid>,
    ) -> AppResult<Option<Activity>> {
        let row = sqlx::query_as::<_, Activity>(
            r#"
            SELECT * FROM activities
            WHERE category_id = $1 AND name_key = $2 AND ($3::uuid IS NULL OR id <> $3)
            ORDER BY created_at
            LIMIT 1
            "#,
        )
        .bind(category_id)
        .bind(key)
        .bind(exclude)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Create an activity
    pub async fn create(
        &self,
        id: Uuid,
        category_id: Option<Uuid>,
        name: &str,
        name_key: &str,
    ) -> AppResult<Activity> {
        let row = sqlx::query_as::<_, Activity>(
            r#"
            INSERT INTO activities (id, category_id, name, name_key, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(category_id)
        .bind(name)
        .bind(name_key)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Create several activities in one category atomically
    pub async fn create_many(&self, category_id: Uuid, names: &[(String, String)]) -> AppResult<Vec<Activity>> {
        let mut tx = self.pool.begin().await?;
        let now = Utc::now();
        let mut created = Vec::with_capacity(names.len());

        for (name, key) in names {
            let row = sqlx::query_as::<_, Activity>(
                r#"
                INSERT INTO activities (id, category_id, name, name_key, created_at)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING *
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(category_id)
            .bind(name)
            .bind(key)
            .bind(now)
            .fetch_one(&mut *tx)
            .await?;
            created.push(row);
        }

        tx.commit().await?;
        Ok(created)
    }

    /// Rename and (re)assign category
    pub async fn rename(&self, id: Uuid, category_id: Uuid, name: &str, name_key: &str) -> AppResult<Activity> {
        sqlx::query_as::<_, Activity>(
            r#"
            UPDATE activities SET category_id = $1, name = $2, name_key = $3, updated_at = $4
            WHERE id = $5
            RETURNING *
            "#,
        )
        .bind(category_id)
        .bind(name)
        .bind(name_key)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Activity {} not found", id)))
    }

    pub async fn set_name_key(&self, id: Uuid, name_key: &str) -> AppResult<()> {
        sqlx::query("UPDATE activities SET name_key = $1 WHERE id = $2")
            .bind(name_key)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Delete an activity
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM activities WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Activity {} not found", id)));
        }
        Ok(())
    }
}
