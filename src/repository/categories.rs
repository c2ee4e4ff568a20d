//! Activity categories repository

use chrono::Utc;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::activity::ActivityCategory,
};

#[derive(Clone)]
pub struct CategoriesRepository {
    pool: Pool<Postgres>,
}

impl CategoriesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all categories by name
    pub async fn list(&self) -> AppResult<Vec<ActivityCategory>> {
        let rows = sqlx::query_as::<_, ActivityCategory>(
            "SELECT * FROM activity_categories ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Get category by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<ActivityCategory> {
        sqlx::query_as::<_, ActivityCategory>("SELECT * FROM activity_categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Category {} not found", id)))
    }

    /// Another category with the same key, if any
    pub async fn find_by_key(&self, key: &str, exclude: Option<Uuid>) -> AppResult<Option<ActivityCategory>> {
        let row = sqlx::query_as::<_, ActivityCategory>(
            r#"
            SELECT * FROM activity_categories
            WHERE name_key = $1 AND ($2::uuid IS NULL OR id <> $2)
            LIMIT 1
            "#,
        )
        .bind(key)
        .bind(exclude)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Create a category
    pub async fn create(&self, id: Uuid, name: &str, name_key: &str) -> AppResult<ActivityCategory> {
        let row = sqlx::query_as::<_, ActivityCategory>(
            r#"
            INSERT INTO activity_categories (id, name, name_key, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(name_key)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Rename a category
    pub async fn rename(&self, id: Uuid, name: &str, name_key: &str) -> AppResult<ActivityCategory> {
        sqlx::query_as::<_, ActivityCategory>(
            r#"
            UPDATE activity_categories SET name = $1, name_key = $2, updated_at = $3
            WHERE id = $4
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(name_key)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Category {} not found", id)))
    }

    /// Delete a category together with its activities. Returns the number of
    /// activities removed.
    pub async fn delete_with_activities(&self, id: Uuid) -> AppResult<u64> {
        let mut tx = self.pool.begin().await?;

        let removed = sqlx::query("DELETE FROM activities WHERE category_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let result = sqlx::query("DELETE FROM activity_categories WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Category {} not found", id)));
        }

        tx.commit().await?;
        Ok(removed)
    }

    pub async fn set_name_key(&self, id: Uuid, name_key: &str) -> AppResult<()> {
        sqlx::query("UPDATE activity_categories SET name_key = $1 WHERE id = $2")
            .bind(name_key)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
