//! Route definitions for the Egg Sales Management API

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::{handlers, middleware::identity_middleware, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Protected routes - customer directory
        .nest("/customers", customer_routes())
        // Protected routes - price catalog
        .nest("/prices", price_routes())
        // Protected routes - stock levels and ledger
        .nest("/stock", stock_routes())
        // Protected routes - sales transactions
        .nest("/transactions", transaction_routes())
        // Protected routes - reporting
        .nest("/reports", report_routes())
        // Protected routes - audit trail
        .nest("/audit", audit_routes())
}

/// Customer directory routes (protected)
fn customer_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_customers).post(handlers::create_customer),
        )
        .route(
            "/:customer_id",
            get(handlers::get_customer)
                .put(handlers::update_customer)
                .delete(handlers::delete_customer),
        )
        .route_layer(middleware::from_fn(identity_middleware))
}

/// Price catalog routes (protected)
fn price_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_prices))
        .route(
            "/:category",
            get(handlers::get_price).put(handlers::update_price),
        )
        .route_layer(middleware::from_fn(identity_middleware))
}

/// Stock routes (protected)
fn stock_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_stock))
        .route("/additions", post(handlers::add_stock))
        .route("/history", get(handlers::stock_history))
        .route("/:category", get(handlers::get_stock))
        .route_layer(middleware::from_fn(identity_middleware))
}

/// Sales transaction routes (protected)
fn transaction_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_transactions).post(handlers::create_transaction),
        )
        .route("/export", get(handlers::export_transactions))
        .route("/:transaction_id", get(handlers::get_transaction))
        .route_layer(middleware::from_fn(identity_middleware))
}

/// Reporting routes (protected)
fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(handlers::get_dashboard))
        .route("/daily", get(handlers::get_daily_sales))
        .route("/categories", get(handlers::get_category_breakdown))
        .route("/top-customers", get(handlers::get_top_customers))
        .route("/summary", get(handlers::get_summary))
        .route_layer(middleware::from_fn(identity_middleware))
}

/// Audit trail routes (protected)
fn audit_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_audit_log))
        .route("/sessions", post(handlers::record_session_event))
        .route_layer(middleware::from_fn(identity_middleware))
}
