//! Identity middleware
//!
//! Authentication itself is handled by the fronting identity provider;
//! this middleware only extracts the opaque acting-user reference it
//! forwards on each request (`X-User-Id` / `X-User-Name`) together with
//! the originating address for the audit trail.

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::AppError;

/// Acting user supplied by the identity provider
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: uuid::Uuid,
    pub username: String,
    pub ip_address: Option<String>,
}

/// Identity middleware that requires the acting-user headers on every
/// protected request
pub async fn identity_middleware(mut request: Request, next: Next) -> Response {
    let user_id = request
        .headers()
        .get("x-user-id")
        .and_then(|h| h.to_str().ok())
        .map(str::to_string);

    let user_id = match user_id {
        Some(raw) => match uuid::Uuid::parse_str(&raw) {
            Ok(id) => id,
            Err(_) => return unauthorized_response("Invalid X-User-Id header"),
        },
        None => return unauthorized_response("Missing X-User-Id header"),
    };

    let username = match request
        .headers()
        .get("x-user-name")
        .and_then(|h| h.to_str().ok())
    {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => return unauthorized_response("Missing X-User-Name header"),
    };

    // First hop of X-Forwarded-For is the client address
    let ip_address = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string());

    let auth_user = AuthUser {
        user_id,
        username,
        ip_address,
    };

    request.extensions_mut().insert(auth_user);

    next.run(request).await
}

/// Create unauthorized response
fn unauthorized_response(message: &str) -> Response {
    AppError::Unauthorized(message.to_string()).into_response()
}

/// Extractor for the acting user
/// Use this in handlers to get the current user
#[derive(Clone, Debug)]
pub struct CurrentUser(pub AuthUser);

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| AppError::Unauthorized("Acting user required".to_string()))
    }
}
