//! Price catalog service
//!
//! One active price per category at any time. Updates happen in place;
//! changes are recorded as observability events, not as history rows.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::models::EggCategory;

/// Pricing service for the per-category unit prices
#[derive(Clone)]
pub struct PricingService {
    db: PgPool,
}

/// Current unit price for a category
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Price {
    pub id: Uuid,
    pub category: String,
    pub price: Decimal,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Option<Uuid>,
    pub updated_by_name: Option<String>,
}

/// Input for updating a price
#[derive(Debug, Deserialize)]
pub struct UpdatePriceInput {
    pub price: Decimal,
}

impl PricingService {
    /// Create a new PricingService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Get all current prices, one row per category
    pub async fn list_prices(&self) -> AppResult<Vec<Price>> {
        let prices = sqlx::query_as::<_, Price>(
            r#"
            SELECT id, category, price, updated_at, updated_by, updated_by_name
            FROM prices
            ORDER BY category ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(prices)
    }

    /// Get the current price for a category
    pub async fn get_price(&self, category: EggCategory) -> AppResult<Price> {
        let price = sqlx::query_as::<_, Price>(
            r#"
            SELECT id, category, price, updated_at, updated_by, updated_by_name
            FROM prices
            WHERE category = $1
            "#,
        )
        .bind(category.as_str())
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Price".to_string()))?;

        Ok(price)
    }

    /// Update the price for a category in place
    ///
    /// Existing transactions keep the unit price captured at sale time.
    pub async fn set_price(
        &self,
        category: EggCategory,
        new_price: Decimal,
        actor: &AuthUser,
    ) -> AppResult<Price> {
        shared::validation::validate_price(new_price)
            .map_err(|msg| AppError::validation("price", msg))?;

        let current = self.get_price(category).await?;

        let updated = sqlx::query_as::<_, Price>(
            r#"
            UPDATE prices
            SET price = $1, updated_at = NOW(), updated_by = $2, updated_by_name = $3
            WHERE category = $4
            RETURNING id, category, price, updated_at, updated_by, updated_by_name
            "#,
        )
        .bind(new_price)
        .bind(actor.user_id)
        .bind(&actor.username)
        .bind(category.as_str())
        .fetch_one(&self.db)
        .await?;

        if current.price != updated.price {
            tracing::info!(
                "Price changed for {}: {} -> {}",
                category.as_str(),
                current.price,
                updated.price
            );
        }

        Ok(updated)
    }
}
