//! HTTP handlers for the audit trail

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::models::AuditAction;
use crate::services::audit::{AuditEntry, AuditService};
use crate::AppState;

/// Session event reported by the identity layer
#[derive(Debug, Deserialize)]
pub struct SessionEventInput {
    pub action: AuditAction,
    pub details: Option<serde_json::Value>,
}

/// List the most recent audit entries
pub async fn list_audit_log(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<AuditEntry>>> {
    let service = AuditService::new(state.db);
    let entries = service.list_recent().await?;
    Ok(Json(entries))
}

/// Record a login/logout event on behalf of the identity layer
pub async fn record_session_event(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<SessionEventInput>,
) -> AppResult<Json<()>> {
    if !input.action.is_session_event() {
        return Err(AppError::validation(
            "action",
            "Only LOGIN and LOGOUT events can be reported here",
        ));
    }

    let details = input.details.unwrap_or_else(|| serde_json::json!({}));

    AuditService::new(state.db)
        .record(Some(&current_user.0), input.action, "User", None, details)
        .await;

    Ok(Json(()))
}
