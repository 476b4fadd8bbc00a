//! Audit trail service
//!
//! Append-only log of security-relevant and data-mutating events. Writes
//! are best-effort: a failed audit insert is logged and never fails the
//! operation that triggered it.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::AuthUser;
use crate::models::AuditAction;

/// Number of entries shown in the audit log view
pub const AUDIT_LOG_LIMIT: i64 = 100;

/// Audit service for the append-only event trail
#[derive(Clone)]
pub struct AuditService {
    db: PgPool,
}

/// One tracked event
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AuditEntry {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub username: Option<String>,
    pub action: String,
    pub model_name: String,
    pub object_id: Option<Uuid>,
    pub details: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub ip_address: Option<String>,
}

impl AuditService {
    /// Create a new AuditService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Append one event to the trail
    ///
    /// Best-effort by design: the primary operation has already committed
    /// by the time this runs, so failures are logged and swallowed.
    pub async fn record(
        &self,
        actor: Option<&AuthUser>,
        action: AuditAction,
        model_name: &str,
        object_id: Option<Uuid>,
        details: serde_json::Value,
    ) {
        let result = sqlx::query(
            r#"
            INSERT INTO audit_log (user_id, username, action, model_name, object_id, details, ip_address)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(actor.map(|a| a.user_id))
        .bind(actor.map(|a| a.username.clone()))
        .bind(action.as_str())
        .bind(model_name)
        .bind(object_id)
        .bind(details)
        .bind(actor.and_then(|a| a.ip_address.clone()))
        .execute(&self.db)
        .await;

        if let Err(e) = result {
            tracing::error!(
                "Failed to write audit entry ({} {}): {}",
                action.as_str(),
                model_name,
                e
            );
        }
    }

    /// Most recent entries, newest first
    pub async fn list_recent(&self) -> AppResult<Vec<AuditEntry>> {
        let entries = sqlx::query_as::<_, AuditEntry>(
            r#"
            SELECT id, user_id, username, action, model_name, object_id,
                   details, created_at, ip_address
            FROM audit_log
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(AUDIT_LOG_LIMIT)
        .fetch_all(&self.db)
        .await?;

        Ok(entries)
    }
}
