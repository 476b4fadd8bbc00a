//! Reporting service for sales analytics and data export
//!
//! Read-only aggregation over the transaction history: daily totals,
//! category breakdown, top customers, and the dashboard metrics.

use chrono::{Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::stock::StockLevel;
use crate::services::transaction::SaleTransaction;
use shared::DateRange;

/// Top customer count on the full report
pub const REPORT_TOP_CUSTOMERS: i64 = 10;
/// Top customer count on the dashboard
pub const DASHBOARD_TOP_CUSTOMERS: i64 = 5;

/// Reporting service
#[derive(Clone)]
pub struct ReportingService {
    db: PgPool,
}

/// Sales for one calendar day
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct DailySales {
    pub date: NaiveDate,
    pub total: Decimal,
    pub count: i64,
}

/// Sales broken down by category
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct CategorySales {
    pub category: String,
    pub total: Decimal,
    pub quantity: i64,
    pub count: i64,
}

/// Customer ranked by spend in the report window
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct TopCustomer {
    pub customer_id: Uuid,
    pub full_name: String,
    pub nickname: String,
    pub total: Decimal,
    pub purchases: i64,
}

/// Summary statistics for a report window
#[derive(Debug, Serialize)]
pub struct SalesSummary {
    pub total_sales: Decimal,
    pub total_transactions: i64,
    pub total_quantity: i64,
    pub average_transaction: Decimal,
}

/// Dashboard metrics
#[derive(Debug, Serialize)]
pub struct DashboardMetrics {
    pub total_customers: i64,
    pub stock_small: i32,
    pub stock_medium: i32,
    pub stock_large: i32,
    pub total_transactions: i64,
    pub total_revenue: Decimal,
    pub today_revenue: Decimal,
    pub low_stock_alerts: Vec<StockLevel>,
    pub recent_transactions: Vec<SaleTransaction>,
    pub top_customers: Vec<TopCustomer>,
    pub sales_last_7_days: Vec<DailySales>,
}

/// Report filter parameters; defaults to the last 30 days
#[derive(Debug, Default, Deserialize)]
pub struct ReportFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl ReportFilter {
    /// Resolve the date window, defaulting to the trailing 30 days
    pub fn window(&self) -> DateRange {
        let end = self.end_date.unwrap_or_else(|| Utc::now().date_naive());
        let start = self.start_date.unwrap_or(end - Duration::days(30));
        DateRange { start, end }
    }
}

impl ReportingService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Daily totals over the window
    pub async fn daily_sales(&self, filter: &ReportFilter) -> AppResult<Vec<DailySales>> {
        let window = filter.window();

        let rows = sqlx::query_as::<_, DailySales>(
            r#"
            SELECT transaction_date::date AS date,
                   COALESCE(SUM(total_amount), 0) AS total,
                   COUNT(*) AS count
            FROM transactions
            WHERE transaction_date::date BETWEEN $1 AND $2
            GROUP BY transaction_date::date
            ORDER BY date ASC
            "#,
        )
        .bind(window.start)
        .bind(window.end)
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    /// Sales per category over the window
    pub async fn category_breakdown(&self, filter: &ReportFilter) -> AppResult<Vec<CategorySales>> {
        let window = filter.window();

        let rows = sqlx::query_as::<_, CategorySales>(
            r#"
            SELECT category,
                   COALESCE(SUM(total_amount), 0) AS total,
                   COALESCE(SUM(quantity), 0)::bigint AS quantity,
                   COUNT(*) AS count
            FROM transactions
            WHERE transaction_date::date BETWEEN $1 AND $2
            GROUP BY category
            ORDER BY category ASC
            "#,
        )
        .bind(window.start)
        .bind(window.end)
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    /// Customers ranked by spend over the window, bounded to the top N
    pub async fn top_customers(
        &self,
        filter: &ReportFilter,
        limit: i64,
    ) -> AppResult<Vec<TopCustomer>> {
        let window = filter.window();

        let rows = sqlx::query_as::<_, TopCustomer>(
            r#"
            SELECT c.id AS customer_id,
                   c.full_name,
                   c.nickname,
                   COALESCE(SUM(t.total_amount), 0) AS total,
                   COUNT(t.id) AS purchases
            FROM transactions t
            JOIN customers c ON c.id = t.customer_id
            WHERE t.transaction_date::date BETWEEN $1 AND $2
            GROUP BY c.id, c.full_name, c.nickname
            ORDER BY total DESC
            LIMIT $3
            "#,
        )
        .bind(window.start)
        .bind(window.end)
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    /// Summary statistics over the window; zeros when the window is empty
    pub async fn summary(&self, filter: &ReportFilter) -> AppResult<SalesSummary> {
        let window = filter.window();

        let row: (Decimal, i64, i64, Decimal) = sqlx::query_as(
            r#"
            SELECT COALESCE(SUM(total_amount), 0),
                   COUNT(*),
                   COALESCE(SUM(quantity), 0)::bigint,
                   COALESCE(ROUND(AVG(total_amount), 2), 0)
            FROM transactions
            WHERE transaction_date::date BETWEEN $1 AND $2
            "#,
        )
        .bind(window.start)
        .bind(window.end)
        .fetch_one(&self.db)
        .await?;

        Ok(SalesSummary {
            total_sales: row.0,
            total_transactions: row.1,
            total_quantity: row.2,
            average_transaction: row.3,
        })
    }

    /// Dashboard metrics
    pub async fn dashboard(&self) -> AppResult<DashboardMetrics> {
        let total_customers: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers")
            .fetch_one(&self.db)
            .await?;

        let stock_levels = sqlx::query_as::<_, StockLevel>(
            r#"
            SELECT id, category, quantity, low_stock_threshold, updated_at
            FROM stock
            ORDER BY category ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        let quantity_for = |category: &str| {
            stock_levels
                .iter()
                .find(|s| s.category == category)
                .map(|s| s.quantity)
                .unwrap_or(0)
        };
        let stock_small = quantity_for("SMALL");
        let stock_medium = quantity_for("MEDIUM");
        let stock_large = quantity_for("LARGE");

        let low_stock_alerts: Vec<StockLevel> = stock_levels
            .iter()
            .filter(|s| s.is_low_stock())
            .cloned()
            .collect();

        let totals: (i64, Decimal) = sqlx::query_as(
            "SELECT COUNT(*), COALESCE(SUM(total_amount), 0) FROM transactions",
        )
        .fetch_one(&self.db)
        .await?;

        let today = Utc::now().date_naive();
        let today_revenue: Decimal = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(total_amount), 0)
            FROM transactions
            WHERE transaction_date::date = $1
            "#,
        )
        .bind(today)
        .fetch_one(&self.db)
        .await?;

        let recent_transactions = sqlx::query_as::<_, SaleTransaction>(
            r#"
            SELECT id, customer_id, category, quantity, price_per_unit, total_amount,
                   transaction_date, recorded_by, recorded_by_name, invoice_number
            FROM transactions
            ORDER BY transaction_date DESC
            LIMIT 10
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        let top_customers = self
            .top_customers(&ReportFilter::default(), DASHBOARD_TOP_CUSTOMERS)
            .await?;

        let week_filter = ReportFilter {
            start_date: Some(today - Duration::days(6)),
            end_date: Some(today),
        };
        let sales_last_7_days = zero_fill_daily(
            self.daily_sales(&week_filter).await?,
            today - Duration::days(6),
            today,
        );

        Ok(DashboardMetrics {
            total_customers,
            stock_small,
            stock_medium,
            stock_large,
            total_transactions: totals.0,
            total_revenue: totals.1,
            today_revenue,
            low_stock_alerts,
            recent_transactions,
            top_customers,
            sales_last_7_days,
        })
    }

    /// Export report data as CSV, header row first
    pub fn export_to_csv<T: Serialize>(data: &[T]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in data {
            wtr.serialize(record).map_err(|e| {
                crate::error::AppError::Internal(format!("CSV serialization error: {}", e))
            })?;
        }
        let csv_data = String::from_utf8(wtr.into_inner().map_err(|e| {
            crate::error::AppError::Internal(format!("CSV writer error: {}", e))
        })?)
        .map_err(|e| crate::error::AppError::Internal(format!("UTF-8 conversion error: {}", e)))?;
        Ok(csv_data)
    }
}

/// Fill in zero rows for days with no sales, for the dashboard chart
fn zero_fill_daily(rows: Vec<DailySales>, start: NaiveDate, end: NaiveDate) -> Vec<DailySales> {
    let by_date: HashMap<NaiveDate, DailySales> =
        rows.into_iter().map(|r| (r.date, r)).collect();

    let mut filled = Vec::new();
    let mut date = start;
    while date <= end {
        filled.push(by_date.get(&date).cloned().unwrap_or(DailySales {
            date,
            total: Decimal::ZERO,
            count: 0,
        }));
        date += Duration::days(1);
    }
    filled
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_defaults_to_trailing_30_days() {
        let window = ReportFilter::default().window();
        assert_eq!(window.end - window.start, Duration::days(30));

        let explicit = ReportFilter {
            start_date: NaiveDate::from_ymd_opt(2025, 3, 1),
            end_date: NaiveDate::from_ymd_opt(2025, 3, 7),
        };
        let window = explicit.window();
        assert_eq!(window.start, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        assert_eq!(window.end, NaiveDate::from_ymd_opt(2025, 3, 7).unwrap());
    }

    #[test]
    fn zero_fill_covers_every_day() {
        let start = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        let rows = vec![DailySales {
            date: NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
            total: Decimal::from(500),
            count: 2,
        }];

        let filled = zero_fill_daily(rows, start, end);
        assert_eq!(filled.len(), 7);
        assert_eq!(filled[0].total, Decimal::ZERO);
        assert_eq!(filled[2].total, Decimal::from(500));
        assert_eq!(filled[2].count, 2);
        assert_eq!(filled[6].date, end);
    }
}
