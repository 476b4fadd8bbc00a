//! Sales transaction engine
//!
//! Records a sale as one atomic unit: sufficiency check, price capture,
//! total computation, relative stock decrement, and invoice assignment
//! either all commit together or none of them do.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{is_unique_violation, AppError, AppResult};
use crate::middleware::AuthUser;
use crate::models::EggCategory;
use shared::{PaginatedResponse, Pagination, PaginationMeta};

/// Invoice-number collisions between concurrent sales are retried this
/// many times before the error is surfaced
pub const MAX_INVOICE_ATTEMPTS: u32 = 3;

const INVOICE_UNIQUE_CONSTRAINT: &str = "transactions_invoice_number_key";

/// Transaction service for recording and querying sales
#[derive(Clone)]
pub struct TransactionService {
    db: PgPool,
}

/// A completed sale
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct SaleTransaction {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub category: String,
    pub quantity: i32,
    pub price_per_unit: Decimal,
    pub total_amount: Decimal,
    pub transaction_date: DateTime<Utc>,
    pub recorded_by: Option<Uuid>,
    pub recorded_by_name: Option<String>,
    pub invoice_number: String,
}

/// Input for recording a sale
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTransactionInput {
    pub customer_id: Uuid,
    pub category: EggCategory,
    pub quantity: i32,
}

/// Filters for the transaction list view
#[derive(Debug, Default, Deserialize)]
pub struct TransactionFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub category: Option<EggCategory>,
    /// Matches customer name, nickname, or invoice number
    pub search: Option<String>,
}

/// Row of the transaction CSV export, column names match the report header
#[derive(Debug, Serialize)]
pub struct TransactionExportRow {
    #[serde(rename = "Invoice Number")]
    pub invoice_number: String,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Customer")]
    pub customer: String,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Quantity")]
    pub quantity: i32,
    #[serde(rename = "Price Per Unit")]
    pub price_per_unit: Decimal,
    #[serde(rename = "Total Amount")]
    pub total_amount: Decimal,
    #[serde(rename = "Recorded By")]
    pub recorded_by: String,
}

#[derive(Debug, sqlx::FromRow)]
struct ExportRow {
    invoice_number: String,
    date: String,
    customer: String,
    category: String,
    quantity: i32,
    price_per_unit: Decimal,
    total_amount: Decimal,
    recorded_by: Option<String>,
}

/// Format an invoice number: date plus 1-based daily sequence
pub fn invoice_number(date: NaiveDate, sequence: i64) -> String {
    format!("INV-{}-{:04}", date.format("%Y%m%d"), sequence)
}

/// Total for a sale, exact decimal arithmetic
pub fn compute_total(quantity: i32, price_per_unit: Decimal) -> Decimal {
    Decimal::from(quantity) * price_per_unit
}

impl TransactionService {
    /// Create a new TransactionService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Record a sale
    ///
    /// Retries the whole store transaction on invoice-number collisions,
    /// which can happen when two sales are created in the same instant.
    pub async fn create_transaction(
        &self,
        input: CreateTransactionInput,
        actor: &AuthUser,
    ) -> AppResult<SaleTransaction> {
        shared::validation::validate_quantity(input.quantity)
            .map_err(|msg| AppError::validation("quantity", msg))?;

        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.try_create(&input, actor).await {
                Err(AppError::DuplicateInvoice(invoice)) if attempt < MAX_INVOICE_ATTEMPTS => {
                    tracing::warn!(
                        "Invoice number collision on {}, retrying (attempt {})",
                        invoice,
                        attempt
                    );
                }
                result => return result,
            }
        }
    }

    /// One attempt at persisting the sale, all effects in one database
    /// transaction
    async fn try_create(
        &self,
        input: &CreateTransactionInput,
        actor: &AuthUser,
    ) -> AppResult<SaleTransaction> {
        let category = input.category.as_str();
        let mut tx = self.db.begin().await?;

        let customer_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM customers WHERE id = $1)")
                .bind(input.customer_id)
                .fetch_one(&mut *tx)
                .await?;

        if !customer_exists {
            return Err(AppError::NotFound("Customer".to_string()));
        }

        let available = sqlx::query_scalar::<_, i32>(
            "SELECT quantity FROM stock WHERE category = $1",
        )
        .bind(category)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Stock".to_string()))?;

        if available < input.quantity {
            return Err(AppError::InsufficientStock {
                category: input.category.display_name().to_string(),
                available,
                requested: input.quantity,
            });
        }

        // Freeze the unit price at sale time; later price updates never
        // touch this transaction
        let price_per_unit =
            sqlx::query_scalar::<_, Decimal>("SELECT price FROM prices WHERE category = $1")
                .bind(category)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| AppError::NotFound("Price".to_string()))?;

        let total_amount = compute_total(input.quantity, price_per_unit);

        // Guarded relative decrement: the sufficiency condition is
        // re-evaluated by the store at write time, so a concurrent sale
        // can never push the quantity negative
        let decremented = sqlx::query(
            r#"
            UPDATE stock
            SET quantity = quantity - $1, updated_at = NOW()
            WHERE category = $2 AND quantity >= $1
            "#,
        )
        .bind(input.quantity)
        .bind(category)
        .execute(&mut *tx)
        .await?;

        if decremented.rows_affected() == 0 {
            // A concurrent sale won the race since the check above
            let available =
                sqlx::query_scalar::<_, i32>("SELECT quantity FROM stock WHERE category = $1")
                    .bind(category)
                    .fetch_one(&mut *tx)
                    .await?;
            return Err(AppError::InsufficientStock {
                category: input.category.display_name().to_string(),
                available,
                requested: input.quantity,
            });
        }

        // One timestamp drives the stored transaction_date, the daily
        // count bucket, and the invoice label, so the invoice date always
        // matches the row's creation date even across midnight
        let now = Utc::now();
        let today = now.date_naive();
        let created_today = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM transactions WHERE transaction_date::date = $1",
        )
        .bind(today)
        .fetch_one(&mut *tx)
        .await?;

        let invoice = invoice_number(today, created_today + 1);

        let transaction = sqlx::query_as::<_, SaleTransaction>(
            r#"
            INSERT INTO transactions (
                customer_id, category, quantity, price_per_unit, total_amount,
                transaction_date, recorded_by, recorded_by_name, invoice_number
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, customer_id, category, quantity, price_per_unit, total_amount,
                      transaction_date, recorded_by, recorded_by_name, invoice_number
            "#,
        )
        .bind(input.customer_id)
        .bind(category)
        .bind(input.quantity)
        .bind(price_per_unit)
        .bind(total_amount)
        .bind(now)
        .bind(actor.user_id)
        .bind(&actor.username)
        .bind(&invoice)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e, INVOICE_UNIQUE_CONSTRAINT) {
                AppError::DuplicateInvoice(invoice.clone())
            } else {
                AppError::Database(e)
            }
        })?;

        tx.commit().await?;

        Ok(transaction)
    }

    /// Get a transaction by ID
    pub async fn get_transaction(&self, transaction_id: Uuid) -> AppResult<SaleTransaction> {
        let transaction = sqlx::query_as::<_, SaleTransaction>(
            r#"
            SELECT id, customer_id, category, quantity, price_per_unit, total_amount,
                   transaction_date, recorded_by, recorded_by_name, invoice_number
            FROM transactions
            WHERE id = $1
            "#,
        )
        .bind(transaction_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Transaction".to_string()))?;

        Ok(transaction)
    }

    /// List transactions with date, category, and search filters
    pub async fn list_transactions(
        &self,
        filter: &TransactionFilter,
        pagination: &Pagination,
    ) -> AppResult<PaginatedResponse<SaleTransaction>> {
        let category = filter.category.map(|c| c.as_str().to_string());
        let search = filter.search.as_ref().map(|s| format!("%{}%", s));

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM transactions t
            JOIN customers c ON c.id = t.customer_id
            WHERE ($1::date IS NULL OR t.transaction_date::date >= $1)
              AND ($2::date IS NULL OR t.transaction_date::date <= $2)
              AND ($3::text IS NULL OR t.category = $3)
              AND ($4::text IS NULL OR c.full_name ILIKE $4
                   OR c.nickname ILIKE $4 OR t.invoice_number ILIKE $4)
            "#,
        )
        .bind(filter.start_date)
        .bind(filter.end_date)
        .bind(&category)
        .bind(&search)
        .fetch_one(&self.db)
        .await?;

        let transactions = sqlx::query_as::<_, SaleTransaction>(
            r#"
            SELECT t.id, t.customer_id, t.category, t.quantity, t.price_per_unit,
                   t.total_amount, t.transaction_date, t.recorded_by,
                   t.recorded_by_name, t.invoice_number
            FROM transactions t
            JOIN customers c ON c.id = t.customer_id
            WHERE ($1::date IS NULL OR t.transaction_date::date >= $1)
              AND ($2::date IS NULL OR t.transaction_date::date <= $2)
              AND ($3::text IS NULL OR t.category = $3)
              AND ($4::text IS NULL OR c.full_name ILIKE $4
                   OR c.nickname ILIKE $4 OR t.invoice_number ILIKE $4)
            ORDER BY t.transaction_date DESC
            LIMIT $5 OFFSET $6
            "#,
        )
        .bind(filter.start_date)
        .bind(filter.end_date)
        .bind(&category)
        .bind(&search)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.db)
        .await?;

        Ok(PaginatedResponse {
            data: transactions,
            pagination: PaginationMeta::new(pagination, total as u64),
        })
    }

    /// All transactions joined with customer names, for the CSV export
    pub async fn list_for_export(&self) -> AppResult<Vec<TransactionExportRow>> {
        let rows = sqlx::query_as::<_, ExportRow>(
            r#"
            SELECT t.invoice_number,
                   TO_CHAR(t.transaction_date, 'YYYY-MM-DD HH24:MI') AS date,
                   c.full_name AS customer,
                   t.category,
                   t.quantity,
                   t.price_per_unit,
                   t.total_amount,
                   t.recorded_by_name AS recorded_by
            FROM transactions t
            JOIN customers c ON c.id = t.customer_id
            ORDER BY t.transaction_date DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| TransactionExportRow {
                invoice_number: r.invoice_number,
                date: r.date,
                customer: r.customer,
                category: r
                    .category
                    .parse::<EggCategory>()
                    .map(|c| c.display_name().to_string())
                    .unwrap_or(r.category),
                quantity: r.quantity,
                price_per_unit: r.price_per_unit,
                total_amount: r.total_amount,
                recorded_by: r.recorded_by.unwrap_or_else(|| "Unknown".to_string()),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn invoice_number_format() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
        assert_eq!(invoice_number(date, 1), "INV-20250309-0001");
        assert_eq!(invoice_number(date, 42), "INV-20250309-0042");
        assert_eq!(invoice_number(date, 9999), "INV-20250309-9999");
    }

    #[test]
    fn total_is_exact_decimal_product() {
        let price = Decimal::from_str("1200.00").unwrap();
        assert_eq!(compute_total(10, price), Decimal::from_str("12000.00").unwrap());

        let price = Decimal::from_str("0.10").unwrap();
        assert_eq!(compute_total(3, price), Decimal::from_str("0.30").unwrap());
    }
}
