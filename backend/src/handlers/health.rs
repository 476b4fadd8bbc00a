//! Health check handler

use axum::{extract::State, Json};
use serde::Serialize;

use crate::error::AppResult;
use crate::AppState;

#[derive(Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub database: &'static str,
}

/// Health check that also pings the database
pub async fn health_check(State(state): State<AppState>) -> AppResult<Json<HealthStatus>> {
    sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&state.db)
        .await?;

    Ok(Json(HealthStatus {
        status: "ok",
        database: "reachable",
    }))
}
