//! Check-out records repository

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::inventory::{Checkout, CheckoutQuery},
};

/// Values of a single check-out row
#[derive(Debug, Clone)]
pub struct NewCheckout {
    pub member_id: Uuid,
    pub stock_item_id: Uuid,
    pub tag: Option<String>,
    pub checkout_date: NaiveDate,
}

#[derive(Clone)]
pub struct CheckoutsRepository {
    pool: Pool<Postgres>,
}

impl CheckoutsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List check-outs by date (newest first) with the equality filters of
    /// `query`. The free-text filter is applied by the caller.
    pub async fn list(&self, query: &CheckoutQuery) -> AppResult<Vec<Checkout>> {
        let mut conditions = Vec::new();
        let mut idx = 1;

        if query.member_id.is_some() {
            conditions.push(format!("member_id = ${}", idx));
            idx += 1;
        }
        if query.stock_item_id.is_some() {
            conditions.push(format!("stock_item_id = ${}", idx));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let select_q = format!(
            "SELECT * FROM checkouts {} ORDER BY checkout_date DESC, created_at DESC",
            where_clause
        );
        let mut builder = sqlx::query_as::<_, Checkout>(&select_q);
        if let Some(member_id) = query.member_id {
            builder = builder.bind(member_id);
        }
        if let Some(stock_item_id) = query.stock_item_id {
            builder = builder.bind(stock_item_id);
        }

        let rows = builder.fetch_all(&self.pool).await?;
        Ok(rows)
    }

    /// Get check-out by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Checkout> {
        sqlx::query_as::<_, Checkout>("SELECT * FROM checkouts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Checkout {} not found", id)))
    }

    /// Number of check-outs per stock item
    pub async fn counts_by_item(&self) -> AppResult<HashMap<Uuid, i64>> {
        let rows = sqlx::query(
            "SELECT stock_item_id, COUNT(*)::bigint AS count FROM checkouts GROUP BY stock_item_id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|r| (r.get("stock_item_id"), r.get("count")))
            .collect())
    }

    /// Number of check-outs of one item, optionally ignoring one record
    pub async fn count_for_item(&self, stock_item_id: Uuid, exclude: Option<Uuid>) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM checkouts
            WHERE stock_item_id = $1 AND ($2::uuid IS NULL OR id <> $2)
            "#,
        )
        .bind(stock_item_id)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Create a check-out
    pub async fn create(&self, id: Uuid, data: &NewCheckout) -> AppResult<Checkout> {
        let row = sqlx::query_as::<_, Checkout>(
            r#"
            INSERT INTO checkouts (id, member_id, stock_item_id, tag, checkout_date, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(data.member_id)
        .bind(data.stock_item_id)
        .bind(&data.tag)
        .bind(data.checkout_date)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Create several check-outs in one transaction
    pub async fn create_many(&self, rows: &[NewCheckout]) -> AppResult<Vec<Checkout>> {
        let mut tx = self.pool.begin().await?;
        let now = Utc::now();
        let mut created = Vec::with_capacity(rows.len());

        for data in rows {
            let row = sqlx::query_as::<_, Checkout>(
                r#"
                INSERT INTO checkouts (id, member_id, stock_item_id, tag, checkout_date, created_at)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING *
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(data.member_id)
            .bind(data.stock_item_id)
            .bind(&data.tag)
            .bind(data.checkout_date)
            .bind(now)
            .fetch_one(&mut *tx)
            .await?;
            created.push(row);
        }

        tx.commit().await?;
        Ok(created)
    }

    /// Replace all fields of a check-out
    pub async fn update(&self, id: Uuid, data: &NewCheckout) -> AppResult<Checkout> {
        sqlx::query_as::<_, Checkout>(
            r#"
            UPDATE checkouts SET
                member_id = $1, stock_item_id = $2, tag = $3, checkout_date = $4, updated_at = $5
            WHERE id = $6
            RETURNING *
            "#,
        )
        .bind(data.member_id)
        .bind(data.stock_item_id)
        .bind(&data.tag)
        .bind(data.checkout_date)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Checkout {} not found", id)))
    }

    /// Delete a check-out (item returned)
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM checkouts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Checkout {} not found", id)));
        }
        Ok(())
    }
}
