//! Stock service for current levels and the replenishment ledger
//!
//! Stock quantity is only ever mutated through relative adjustments
//! evaluated by the database, never by writing back a value read earlier,
//! so concurrent adjustments on the same category cannot lose updates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::models::EggCategory;

/// Number of ledger rows shown in the stock history view
pub const STOCK_HISTORY_LIMIT: i64 = 100;

/// Stock service for on-hand quantities and stock records
#[derive(Clone)]
pub struct StockService {
    db: PgPool,
}

/// Current on-hand quantity for a category
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct StockLevel {
    pub id: Uuid,
    pub category: String,
    pub quantity: i32,
    pub low_stock_threshold: i32,
    pub updated_at: DateTime<Utc>,
}

impl StockLevel {
    /// True when the on-hand quantity has fallen below the alert threshold
    pub fn is_low_stock(&self) -> bool {
        self.quantity < self.low_stock_threshold
    }
}

/// One replenishment event in the append-only stock ledger
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct StockRecord {
    pub id: Uuid,
    pub stock_id: Uuid,
    pub category: String,
    pub quantity_added: i32,
    pub recorded_at: DateTime<Utc>,
    pub recorded_by: Option<Uuid>,
    pub recorded_by_name: Option<String>,
    pub notes: String,
}

/// Input for recording a stock addition
#[derive(Debug, Deserialize)]
pub struct AddStockInput {
    pub category: EggCategory,
    pub quantity: i32,
    pub notes: Option<String>,
}

impl StockService {
    /// Create a new StockService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Get all stock levels, one row per category
    pub async fn list_stock(&self) -> AppResult<Vec<StockLevel>> {
        let levels = sqlx::query_as::<_, StockLevel>(
            r#"
            SELECT id, category, quantity, low_stock_threshold, updated_at
            FROM stock
            ORDER BY category ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(levels)
    }

    /// Get the stock level for a category
    pub async fn get_stock(&self, category: EggCategory) -> AppResult<StockLevel> {
        let level = sqlx::query_as::<_, StockLevel>(
            r#"
            SELECT id, category, quantity, low_stock_threshold, updated_at
            FROM stock
            WHERE category = $1
            "#,
        )
        .bind(category.as_str())
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Stock".to_string()))?;

        Ok(level)
    }

    /// Record a stock addition
    ///
    /// The increment and the ledger row are one atomic unit; the increment
    /// is a relative adjustment evaluated by the store.
    pub async fn add_stock(&self, input: AddStockInput, actor: &AuthUser) -> AppResult<StockRecord> {
        shared::validation::validate_quantity(input.quantity)
            .map_err(|msg| AppError::validation("quantity", msg))?;

        let mut tx = self.db.begin().await?;

        let stock_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            UPDATE stock
            SET quantity = quantity + $1, updated_at = NOW()
            WHERE category = $2
            RETURNING id
            "#,
        )
        .bind(input.quantity)
        .bind(input.category.as_str())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Stock".to_string()))?;

        let record = sqlx::query_as::<_, StockRecord>(
            r#"
            INSERT INTO stock_records (stock_id, category, quantity_added, recorded_by, recorded_by_name, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, stock_id, category, quantity_added, recorded_at,
                      recorded_by, recorded_by_name, notes
            "#,
        )
        .bind(stock_id)
        .bind(input.category.as_str())
        .bind(input.quantity)
        .bind(actor.user_id)
        .bind(&actor.username)
        .bind(input.notes.unwrap_or_default())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(record)
    }

    /// List stock additions, most recent first, bounded page size
    pub async fn list_records(&self, limit: Option<i64>) -> AppResult<Vec<StockRecord>> {
        let limit = limit
            .unwrap_or(STOCK_HISTORY_LIMIT)
            .clamp(1, STOCK_HISTORY_LIMIT);

        let records = sqlx::query_as::<_, StockRecord>(
            r#"
            SELECT id, stock_id, category, quantity_added, recorded_at,
                   recorded_by, recorded_by_name, notes
            FROM stock_records
            ORDER BY recorded_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        Ok(records)
    }
}
