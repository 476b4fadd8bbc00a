//! HTTP handlers for customer directory endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::models::AuditAction;
use crate::services::customer::{
    CreateCustomerInput, Customer, CustomerDetail, CustomerService, UpdateCustomerInput,
};
use crate::services::AuditService;
use crate::AppState;
use shared::{PaginatedResponse, Pagination};

#[derive(Debug, Deserialize)]
pub struct CustomerListQuery {
    pub search: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

fn pagination_from(page: Option<u32>, per_page: Option<u32>) -> Pagination {
    let default = Pagination::default();
    Pagination {
        page: page.unwrap_or(default.page),
        per_page: per_page.unwrap_or(default.per_page),
    }
}

/// List customers with optional search
pub async fn list_customers(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<CustomerListQuery>,
) -> AppResult<Json<PaginatedResponse<Customer>>> {
    let service = CustomerService::new(state.db);
    let pagination = pagination_from(query.page, query.per_page);
    let customers = service
        .list_customers(query.search.as_deref(), &pagination)
        .await?;
    Ok(Json(customers))
}

/// Create a customer
pub async fn create_customer(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateCustomerInput>,
) -> AppResult<Json<Customer>> {
    let service = CustomerService::new(state.db.clone());
    let customer = service.create_customer(input).await?;

    AuditService::new(state.db)
        .record(
            Some(&current_user.0),
            AuditAction::Create,
            "Customer",
            Some(customer.id),
            json!({ "full_name": customer.full_name, "nickname": customer.nickname }),
        )
        .await;

    Ok(Json(customer))
}

/// Get a customer with transaction history and lifetime spend
pub async fn get_customer(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(customer_id): Path<Uuid>,
) -> AppResult<Json<CustomerDetail>> {
    let service = CustomerService::new(state.db);
    let detail = service.get_customer_detail(customer_id).await?;
    Ok(Json(detail))
}

/// Update a customer
pub async fn update_customer(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(customer_id): Path<Uuid>,
    Json(input): Json<UpdateCustomerInput>,
) -> AppResult<Json<Customer>> {
    let service = CustomerService::new(state.db.clone());
    let customer = service.update_customer(customer_id, input).await?;

    AuditService::new(state.db)
        .record(
            Some(&current_user.0),
            AuditAction::Update,
            "Customer",
            Some(customer.id),
            json!({ "full_name": customer.full_name }),
        )
        .await;

    Ok(Json(customer))
}

/// Delete a customer; blocked while transactions reference them
pub async fn delete_customer(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(customer_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = CustomerService::new(state.db.clone());
    service.delete_customer(customer_id).await?;

    AuditService::new(state.db)
        .record(
            Some(&current_user.0),
            AuditAction::Delete,
            "Customer",
            Some(customer_id),
            json!({}),
        )
        .await;

    Ok(Json(()))
}
