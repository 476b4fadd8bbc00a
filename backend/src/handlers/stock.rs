//! HTTP handlers for stock level and stock ledger endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::error::AppResult;
use crate::handlers::pricing::parse_category;
use crate::middleware::CurrentUser;
use crate::models::AuditAction;
use crate::services::stock::{AddStockInput, StockLevel, StockRecord, StockService};
use crate::services::AuditService;
use crate::AppState;

/// Stock level with its low-stock flag
#[derive(Debug, serde::Serialize)]
pub struct StockStatusResponse {
    #[serde(flatten)]
    pub level: StockLevel,
    pub low_stock: bool,
}

impl From<StockLevel> for StockStatusResponse {
    fn from(level: StockLevel) -> Self {
        let low_stock = level.is_low_stock();
        Self { level, low_stock }
    }
}

#[derive(Debug, Deserialize)]
pub struct StockHistoryQuery {
    pub limit: Option<i64>,
}

/// List stock levels for all categories
pub async fn list_stock(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<StockStatusResponse>>> {
    let service = StockService::new(state.db);
    let levels = service.list_stock().await?;
    Ok(Json(levels.into_iter().map(Into::into).collect()))
}

/// Get the stock level for a category
pub async fn get_stock(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(category): Path<String>,
) -> AppResult<Json<StockStatusResponse>> {
    let category = parse_category(&category)?;
    let service = StockService::new(state.db);
    let level = service.get_stock(category).await?;
    Ok(Json(level.into()))
}

/// Record a stock addition
pub async fn add_stock(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<AddStockInput>,
) -> AppResult<Json<StockRecord>> {
    let service = StockService::new(state.db.clone());
    let record = service.add_stock(input, &current_user.0).await?;

    AuditService::new(state.db)
        .record(
            Some(&current_user.0),
            AuditAction::Create,
            "StockRecord",
            Some(record.id),
            json!({
                "category": record.category,
                "quantity_added": record.quantity_added,
            }),
        )
        .await;

    Ok(Json(record))
}

/// List stock additions, most recent first
pub async fn stock_history(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<StockHistoryQuery>,
) -> AppResult<Json<Vec<StockRecord>>> {
    let service = StockService::new(state.db);
    let records = service.list_records(query.limit).await?;
    Ok(Json(records))
}
