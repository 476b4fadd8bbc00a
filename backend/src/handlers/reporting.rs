//! Reporting handlers for analytics and data export

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::reporting::{
    DashboardMetrics, ReportFilter, ReportingService, SalesSummary, REPORT_TOP_CUSTOMERS,
};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// "json" or "csv"
    pub format: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TopCustomersQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub limit: Option<i64>,
    pub format: Option<String>,
}

impl ReportQuery {
    fn filter(&self) -> ReportFilter {
        ReportFilter {
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

fn csv_response(csv: String, filename: &'static str) -> axum::response::Response {
    (
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        csv,
    )
        .into_response()
}

/// Get dashboard metrics
pub async fn get_dashboard(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<DashboardMetrics>> {
    let service = ReportingService::new(state.db.clone());
    let metrics = service.dashboard().await?;
    Ok(Json(metrics))
}

/// Get daily sales totals
pub async fn get_daily_sales(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<ReportQuery>,
) -> AppResult<impl IntoResponse> {
    let service = ReportingService::new(state.db.clone());
    let data = service.daily_sales(&query.filter()).await?;

    if query.format.as_deref() == Some("csv") {
        let csv = ReportingService::export_to_csv(&data)?;
        Ok(csv_response(csv, "daily_sales.csv"))
    } else {
        Ok(Json(data).into_response())
    }
}

/// Get the per-category sales breakdown
pub async fn get_category_breakdown(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<ReportQuery>,
) -> AppResult<impl IntoResponse> {
    let service = ReportingService::new(state.db.clone());
    let data = service.category_breakdown(&query.filter()).await?;

    if query.format.as_deref() == Some("csv") {
        let csv = ReportingService::export_to_csv(&data)?;
        Ok(csv_response(csv, "category_sales.csv"))
    } else {
        Ok(Json(data).into_response())
    }
}

/// Get customers ranked by spend
pub async fn get_top_customers(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<TopCustomersQuery>,
) -> AppResult<impl IntoResponse> {
    let service = ReportingService::new(state.db.clone());
    let filter = ReportFilter {
        start_date: query.start_date,
        end_date: query.end_date,
    };
    let limit = query.limit.unwrap_or(REPORT_TOP_CUSTOMERS).clamp(1, 100);
    let data = service.top_customers(&filter, limit).await?;

    if query.format.as_deref() == Some("csv") {
        let csv = ReportingService::export_to_csv(&data)?;
        Ok(csv_response(csv, "top_customers.csv"))
    } else {
        Ok(Json(data).into_response())
    }
}

/// Get summary statistics for a report window
pub async fn get_summary(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<ReportQuery>,
) -> AppResult<Json<SalesSummary>> {
    let service = ReportingService::new(state.db.clone());
    let summary = service.summary(&query.filter()).await?;
    Ok(Json(summary))
}
