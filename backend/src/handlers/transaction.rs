//! HTTP handlers for sales transaction endpoints

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::error::AppResult;
use crate::handlers::pricing::parse_category;
use crate::middleware::CurrentUser;
use crate::models::AuditAction;
use crate::services::transaction::{
    CreateTransactionInput, SaleTransaction, TransactionFilter, TransactionService,
};
use crate::services::{AuditService, ReportingService};
use crate::AppState;
use shared::{PaginatedResponse, Pagination};

#[derive(Debug, Deserialize)]
pub struct TransactionListQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub category: Option<String>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// List transactions with date, category, and search filters
pub async fn list_transactions(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<TransactionListQuery>,
) -> AppResult<Json<PaginatedResponse<SaleTransaction>>> {
    let category = match query.category.as_deref() {
        Some(raw) => Some(parse_category(raw)?),
        None => None,
    };

    let filter = TransactionFilter {
        start_date: query.start_date,
        end_date: query.end_date,
        category,
        search: query.search,
    };
    let default = Pagination::default();
    let pagination = Pagination {
        page: query.page.unwrap_or(default.page),
        per_page: query.per_page.unwrap_or(default.per_page),
    };

    let service = TransactionService::new(state.db);
    let transactions = service.list_transactions(&filter, &pagination).await?;
    Ok(Json(transactions))
}

/// Record a sale
pub async fn create_transaction(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateTransactionInput>,
) -> AppResult<Json<SaleTransaction>> {
    let service = TransactionService::new(state.db.clone());
    let transaction = service.create_transaction(input, &current_user.0).await?;

    AuditService::new(state.db)
        .record(
            Some(&current_user.0),
            AuditAction::Create,
            "Transaction",
            Some(transaction.id),
            json!({
                "invoice_number": transaction.invoice_number,
                "category": transaction.category,
                "quantity": transaction.quantity,
                "total_amount": transaction.total_amount,
            }),
        )
        .await;

    Ok(Json(transaction))
}

/// Get a transaction by ID
pub async fn get_transaction(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(transaction_id): Path<Uuid>,
) -> AppResult<Json<SaleTransaction>> {
    let service = TransactionService::new(state.db);
    let transaction = service.get_transaction(transaction_id).await?;
    Ok(Json(transaction))
}

/// Download the full transaction history as CSV
pub async fn export_transactions(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<impl IntoResponse> {
    let service = TransactionService::new(state.db);
    let rows = service.list_for_export().await?;
    let csv = ReportingService::export_to_csv(&rows)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"transactions.csv\"",
            ),
        ],
        csv,
    ))
}
