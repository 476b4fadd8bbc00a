//! Customer directory service

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::transaction::SaleTransaction;
use shared::validation::{validate_full_name, validate_nickname, validate_phone};
use shared::{PaginatedResponse, Pagination, PaginationMeta};

/// Customer service for profile records and lifetime-spend aggregation
#[derive(Clone)]
pub struct CustomerService {
    db: PgPool,
}

/// Customer profile record
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Customer {
    pub id: Uuid,
    pub full_name: String,
    pub nickname: String,
    pub address: String,
    pub phone_number: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a customer
#[derive(Debug, Deserialize)]
pub struct CreateCustomerInput {
    pub full_name: String,
    pub nickname: String,
    pub address: String,
    pub phone_number: String,
}

/// Input for updating a customer
#[derive(Debug, Deserialize)]
pub struct UpdateCustomerInput {
    pub full_name: Option<String>,
    pub nickname: Option<String>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
}

/// Customer with transaction history and lifetime spend
#[derive(Debug, Serialize)]
pub struct CustomerDetail {
    #[serde(flatten)]
    pub customer: Customer,
    pub transactions: Vec<SaleTransaction>,
    pub total_spent: Decimal,
}

fn validate_fields(full_name: &str, nickname: &str, phone_number: &str) -> AppResult<()> {
    validate_full_name(full_name).map_err(|msg| AppError::validation("full_name", msg))?;
    validate_nickname(nickname).map_err(|msg| AppError::validation("nickname", msg))?;
    validate_phone(phone_number).map_err(|msg| AppError::validation("phone_number", msg))?;
    Ok(())
}

impl CustomerService {
    /// Create a new CustomerService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a customer
    pub async fn create_customer(&self, input: CreateCustomerInput) -> AppResult<Customer> {
        validate_fields(&input.full_name, &input.nickname, &input.phone_number)?;

        let customer = sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers (full_name, nickname, address, phone_number)
            VALUES ($1, $2, $3, $4)
            RETURNING id, full_name, nickname, address, phone_number, created_at, updated_at
            "#,
        )
        .bind(input.full_name.trim())
        .bind(input.nickname.trim())
        .bind(&input.address)
        .bind(&input.phone_number)
        .fetch_one(&self.db)
        .await?;

        Ok(customer)
    }

    /// Get a customer by ID
    pub async fn get_customer(&self, customer_id: Uuid) -> AppResult<Customer> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, full_name, nickname, address, phone_number, created_at, updated_at
            FROM customers
            WHERE id = $1
            "#,
        )
        .bind(customer_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Customer".to_string()))?;

        Ok(customer)
    }

    /// Get a customer with their transaction history and lifetime spend
    pub async fn get_customer_detail(&self, customer_id: Uuid) -> AppResult<CustomerDetail> {
        let customer = self.get_customer(customer_id).await?;

        let transactions = sqlx::query_as::<_, SaleTransaction>(
            r#"
            SELECT id, customer_id, category, quantity, price_per_unit, total_amount,
                   transaction_date, recorded_by, recorded_by_name, invoice_number
            FROM transactions
            WHERE customer_id = $1
            ORDER BY transaction_date DESC
            "#,
        )
        .bind(customer_id)
        .fetch_all(&self.db)
        .await?;

        let total_spent = self.total_purchases(customer_id).await?;

        Ok(CustomerDetail {
            customer,
            transactions,
            total_spent,
        })
    }

    /// List customers, newest first, with optional name/nickname/phone search
    pub async fn list_customers(
        &self,
        search: Option<&str>,
        pagination: &Pagination,
    ) -> AppResult<PaginatedResponse<Customer>> {
        let pattern = search.map(|s| format!("%{}%", s));

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM customers
            WHERE ($1::text IS NULL OR full_name ILIKE $1
                   OR nickname ILIKE $1 OR phone_number ILIKE $1)
            "#,
        )
        .bind(&pattern)
        .fetch_one(&self.db)
        .await?;

        let customers = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, full_name, nickname, address, phone_number, created_at, updated_at
            FROM customers
            WHERE ($1::text IS NULL OR full_name ILIKE $1
                   OR nickname ILIKE $1 OR phone_number ILIKE $1)
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(&pattern)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.db)
        .await?;

        Ok(PaginatedResponse {
            data: customers,
            pagination: PaginationMeta::new(pagination, total as u64),
        })
    }

    /// Update a customer's profile fields
    pub async fn update_customer(
        &self,
        customer_id: Uuid,
        input: UpdateCustomerInput,
    ) -> AppResult<Customer> {
        let existing = self.get_customer(customer_id).await?;

        let full_name = input.full_name.unwrap_or(existing.full_name);
        let nickname = input.nickname.unwrap_or(existing.nickname);
        let address = input.address.unwrap_or(existing.address);
        let phone_number = input.phone_number.unwrap_or(existing.phone_number);

        validate_fields(&full_name, &nickname, &phone_number)?;

        let customer = sqlx::query_as::<_, Customer>(
            r#"
            UPDATE customers
            SET full_name = $1, nickname = $2, address = $3, phone_number = $4,
                updated_at = NOW()
            WHERE id = $5
            RETURNING id, full_name, nickname, address, phone_number, created_at, updated_at
            "#,
        )
        .bind(full_name.trim())
        .bind(nickname.trim())
        .bind(&address)
        .bind(&phone_number)
        .bind(customer_id)
        .fetch_one(&self.db)
        .await?;

        Ok(customer)
    }

    /// Delete a customer
    ///
    /// Customers with recorded transactions are protected, not cascaded.
    pub async fn delete_customer(&self, customer_id: Uuid) -> AppResult<()> {
        let transaction_count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM transactions WHERE customer_id = $1",
        )
        .bind(customer_id)
        .fetch_one(&self.db)
        .await?;

        if transaction_count > 0 {
            return Err(AppError::Conflict {
                resource: "customer".to_string(),
                message: format!(
                    "Customer has {} recorded transactions and cannot be deleted",
                    transaction_count
                ),
            });
        }

        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(customer_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Customer".to_string()));
        }

        Ok(())
    }

    /// Lifetime spend for a customer, zero when no transactions exist
    pub async fn total_purchases(&self, customer_id: Uuid) -> AppResult<Decimal> {
        let total = sqlx::query_scalar::<_, Decimal>(
            "SELECT COALESCE(SUM(total_amount), 0) FROM transactions WHERE customer_id = $1",
        )
        .bind(customer_id)
        .fetch_one(&self.db)
        .await?;

        Ok(total)
    }
}
