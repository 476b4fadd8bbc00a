//! Reporting and analytics tests
//!
//! Tests for report aggregation behavior:
//! - Summary statistics over empty and populated windows
//! - Daily grouping with zero-filled gaps
//! - Top-customer ranking bounds
//! - Default trailing 30-day report window

use chrono::{Days, NaiveDate};
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::str::FromStr;

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

/// Mirror of the zero-fill used by the daily sales report
fn zero_fill(
    totals: &BTreeMap<NaiveDate, Decimal>,
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<(NaiveDate, Decimal)> {
    let mut series = Vec::new();
    let mut day = start;
    while day <= end {
        let total = totals.get(&day).copied().unwrap_or(Decimal::ZERO);
        series.push((day, total));
        day = day.checked_add_days(Days::new(1)).unwrap();
    }
    series
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Summary over an empty window is all zeros
    #[test]
    fn test_summary_empty_window() {
        let totals: Vec<Decimal> = vec![];

        let total_sales: Decimal = totals.iter().sum();
        let count = totals.len();
        let average = if count == 0 {
            Decimal::ZERO
        } else {
            total_sales / Decimal::from(count as i64)
        };

        assert_eq!(total_sales, Decimal::ZERO);
        assert_eq!(count, 0);
        assert_eq!(average, Decimal::ZERO);
    }

    /// Average transaction value over a populated window
    #[test]
    fn test_summary_average() {
        let totals = [dec("12000.00"), dec("15000.00"), dec("18000.00")];

        let total_sales: Decimal = totals.iter().sum();
        let average = total_sales / Decimal::from(totals.len() as i64);

        assert_eq!(total_sales, dec("45000.00"));
        assert_eq!(average, dec("15000.00"));
    }

    /// Sales on the same day group into one bucket
    #[test]
    fn test_daily_grouping() {
        let day = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let sales = [
            (day, dec("1200.00")),
            (day, dec("1500.00")),
            (day.succ_opt().unwrap(), dec("1800.00")),
        ];

        let mut buckets: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
        for (date, amount) in sales {
            *buckets.entry(date).or_insert(Decimal::ZERO) += amount;
        }

        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[&day], dec("2700.00"));
    }

    /// Days without sales appear in the series with a zero total
    #[test]
    fn test_zero_fill_gaps() {
        let start = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();

        let mut totals = BTreeMap::new();
        totals.insert(start, dec("5000.00"));
        totals.insert(end, dec("3000.00"));

        let series = zero_fill(&totals, start, end);

        assert_eq!(series.len(), 7);
        assert_eq!(series[0].1, dec("5000.00"));
        assert_eq!(series[6].1, dec("3000.00"));
        for (_, total) in &series[1..6] {
            assert_eq!(*total, Decimal::ZERO);
        }
    }

    /// Top-customer ranking takes at most the requested count
    #[test]
    fn test_top_customers_bounded() {
        let spend_by_customer = [
            ("c1", 100), ("c2", 500), ("c3", 250),
            ("c4", 900), ("c5", 50), ("c6", 700),
        ];

        let mut ranked: Vec<_> = spend_by_customer.to_vec();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(5);

        assert_eq!(ranked.len(), 5);
        assert_eq!(ranked[0].0, "c4");
        assert_eq!(ranked[1].0, "c6");
        // The smallest spender drops out
        assert!(!ranked.iter().any(|(id, _)| *id == "c5"));
    }

    /// Fewer customers than the limit returns them all
    #[test]
    fn test_top_customers_short_list() {
        let mut ranked = vec![("c1", 100), ("c2", 500)];
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(10);
        assert_eq!(ranked.len(), 2);
    }

    /// The default report window is the trailing 30 days
    #[test]
    fn test_default_window_span() {
        let end = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();
        let start = end.checked_sub_days(Days::new(30)).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
    }

    /// The dashboard sales series spans exactly seven days
    #[test]
    fn test_dashboard_series_span() {
        let end = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();
        let start = end.checked_sub_days(Days::new(6)).unwrap();
        let series = zero_fill(&BTreeMap::new(), start, end);
        assert_eq!(series.len(), 7);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

proptest! {
    /// Zero-filled series always cover every day in the window exactly once
    #[test]
    fn prop_zero_fill_covers_window(
        start_offset in 0u64..1000,
        span in 0u64..90,
    ) {
        let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let start = base.checked_add_days(Days::new(start_offset)).unwrap();
        let end = start.checked_add_days(Days::new(span)).unwrap();

        let series = zero_fill(&BTreeMap::new(), start, end);

        prop_assert_eq!(series.len() as u64, span + 1);
        prop_assert_eq!(series.first().unwrap().0, start);
        prop_assert_eq!(series.last().unwrap().0, end);

        // Strictly consecutive days
        for pair in series.windows(2) {
            prop_assert_eq!(pair[1].0, pair[0].0.succ_opt().unwrap());
        }
    }

    /// Zero-filling preserves the total across the window
    #[test]
    fn prop_zero_fill_preserves_total(
        amounts in prop::collection::vec((0u64..30, 1i64..100_000), 0..20),
    ) {
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let end = start.checked_add_days(Days::new(29)).unwrap();

        let mut totals: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
        for (offset, cents) in &amounts {
            let day = start.checked_add_days(Days::new(*offset)).unwrap();
            *totals.entry(day).or_insert(Decimal::ZERO) += Decimal::new(*cents, 2);
        }

        let expected: Decimal = totals.values().copied().sum();
        let series = zero_fill(&totals, start, end);
        let actual: Decimal = series.iter().map(|(_, t)| *t).sum();

        prop_assert_eq!(actual, expected);
    }

    /// Ranking by spend never returns more than the limit
    #[test]
    fn prop_ranking_bounded(
        spends in prop::collection::vec(0i64..1_000_000, 0..50),
        limit in 1usize..20,
    ) {
        let mut ranked = spends.clone();
        ranked.sort_by(|a, b| b.cmp(a));
        ranked.truncate(limit);

        prop_assert!(ranked.len() <= limit);
        // Descending order
        for pair in ranked.windows(2) {
            prop_assert!(pair[0] >= pair[1]);
        }
    }
}
