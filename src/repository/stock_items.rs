//! Stock items repository (check-out book articles)

use chrono::Utc;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::inventory::StockItem,
};

#[derive(Clone)]
pub struct StockItemsRepository {
    pool: Pool<Postgres>,
}

impl StockItemsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all stock items by name
    pub async fn list(&self) -> AppResult<Vec<StockItem>> {
        let rows = sqlx::query_as::<_, StockItem>("SELECT * FROM stock_items ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Get stock item by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<StockItem> {
        sqlx::query_as::<_, StockItem>("SELECT * FROM stock_items WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Stock item {} not found", id)))
    }

    /// Case-insensitive lookup by name
    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<StockItem>> {
        let row = sqlx::query_as::<_, StockItem>(
            "SELECT * FROM stock_items WHERE LOWER(name) = LOWER($1) ORDER BY created_at LIMIT 1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Create a stock item
    pub async fn create(&self, id: Uuid, name: &str, total: i32) -> AppResult<StockItem> {
        let row = sqlx::query_as::<_, StockItem>(
            r#"
            INSERT INTO stock_items (id, name, total, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(total)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Add pieces to an existing item
    pub async fn add_quantity(&self, id: Uuid, quantity: i32) -> AppResult<StockItem> {
        sqlx::query_as::<_, StockItem>(
            "UPDATE stock_items SET total = total + $1, updated_at = $2 WHERE id = $3 RETURNING *",
        )
        .bind(quantity)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Stock item {} not found", id)))
    }

    /// Set name and total
    pub async fn update(&self, id: Uuid, name: &str, total: i32) -> AppResult<StockItem> {
        sqlx::query_as::<_, StockItem>(
            "UPDATE stock_items SET name = $1, total = $2, updated_at = $3 WHERE id = $4 RETURNING *",
        )
        .bind(name)
        .bind(total)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Stock item {} not found", id)))
    }

    /// Delete a stock item
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM stock_items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Stock item {} not found", id)));
        }
        Ok(())
    }
}
