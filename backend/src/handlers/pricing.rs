//! HTTP handlers for price catalog endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::models::{AuditAction, EggCategory};
use crate::services::pricing::{Price, PricingService, UpdatePriceInput};
use crate::services::AuditService;
use crate::AppState;

/// Parse a category path segment
pub(crate) fn parse_category(raw: &str) -> AppResult<EggCategory> {
    raw.parse::<EggCategory>()
        .map_err(|msg| AppError::validation("category", msg))
}

/// List current prices for all categories
pub async fn list_prices(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<Price>>> {
    let service = PricingService::new(state.db);
    let prices = service.list_prices().await?;
    Ok(Json(prices))
}

/// Get the current price for a category
pub async fn get_price(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(category): Path<String>,
) -> AppResult<Json<Price>> {
    let category = parse_category(&category)?;
    let service = PricingService::new(state.db);
    let price = service.get_price(category).await?;
    Ok(Json(price))
}

/// Update the price for a category
pub async fn update_price(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(category): Path<String>,
    Json(input): Json<UpdatePriceInput>,
) -> AppResult<Json<Price>> {
    let category = parse_category(&category)?;
    let service = PricingService::new(state.db.clone());

    let previous = service.get_price(category).await?;
    let updated = service
        .set_price(category, input.price, &current_user.0)
        .await?;

    AuditService::new(state.db)
        .record(
            Some(&current_user.0),
            AuditAction::Update,
            "Price",
            Some(updated.id),
            json!({
                "category": category.as_str(),
                "old_price": previous.price,
                "new_price": updated.price,
            }),
        )
        .await;

    Ok(Json(updated))
}
