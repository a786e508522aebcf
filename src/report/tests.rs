#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;
use crate::models::EntryKind;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn txn(date: &str, kind: EntryKind, amount: Decimal, category: &str) -> Transaction {
    Transaction {
        id: None,
        date: date.into(),
        kind,
        amount,
        category: category.into(),
        note: String::new(),
        sync_hash: String::new(),
        created_at: String::new(),
    }
}

fn expense(date: &str, amount: Decimal, category: &str) -> Transaction {
    txn(date, EntryKind::Expense, amount, category)
}

// ── resolve_range ─────────────────────────────────────────────

#[test]
fn test_daily_window_is_today() {
    let today = date(2024, 6, 15);
    let w = resolve_range(Range::Daily, today).unwrap();
    assert_eq!(w.start, today);
    assert_eq!(w.end, today);
}

#[test]
fn test_week_window_monday_to_sunday() {
    // 2024-06-12 is a Wednesday
    let w = resolve_range(Range::Week, date(2024, 6, 12)).unwrap();
    assert_eq!(w.start, date(2024, 6, 10));
    assert_eq!(w.end, date(2024, 6, 16));
}

#[test]
fn test_week_window_on_monday_and_sunday() {
    let w = resolve_range(Range::Week, date(2024, 6, 10)).unwrap();
    assert_eq!(w.start, date(2024, 6, 10));
    let w = resolve_range(Range::Week, date(2024, 6, 16)).unwrap();
    assert_eq!(w.end, date(2024, 6, 16));
    assert_eq!(w.start, date(2024, 6, 10));
}

#[test]
fn test_month_window_exactly_30_days() {
    let today = date(2024, 6, 15);
    let w = resolve_range(Range::Month, today).unwrap();
    assert!(w.end >= w.start);
    assert_eq!(w.end, today);
    let width = (w.end - w.start).num_days() + 1;
    assert_eq!(width, MONTH_WINDOW_DAYS as i64);
}

#[test]
fn test_month_window_crosses_year_boundary() {
    let w = resolve_range(Range::Month, date(2024, 1, 10)).unwrap();
    assert_eq!(w.start, date(2023, 12, 12));
    assert_eq!(w.end, date(2024, 1, 10));
}

#[test]
fn test_yearly_window_twelve_months_back() {
    let w = resolve_range(Range::Yearly, date(2024, 6, 15)).unwrap();
    assert_eq!(w.start, date(2023, 6, 15));
    assert_eq!(w.end, date(2024, 6, 15));
}

#[test]
fn test_yearly_window_clamps_month_end() {
    // Feb 29 minus 12 months lands on Feb 28
    let w = resolve_range(Range::Yearly, date(2024, 2, 29)).unwrap();
    assert_eq!(w.start, date(2023, 2, 28));
}

#[test]
fn test_all_is_unbounded() {
    assert!(resolve_range(Range::All, date(2024, 6, 15)).is_none());
}

// ── aggregate ─────────────────────────────────────────────────

#[test]
fn test_aggregate_totals_and_breakdown() {
    let txns = vec![
        expense("2024-06-01", dec!(20), "Food"),
        expense("2024-06-02", dec!(30), "Food"),
        expense("2024-06-03", dec!(80), "Housing"),
        txn("2024-06-04", EntryKind::Income, dec!(500), "Salary"),
    ];
    let summary = aggregate(&txns, None);
    assert_eq!(summary.spent, dec!(130));
    assert_eq!(summary.income, dec!(500));
    assert_eq!(
        summary.by_category,
        vec![
            ("Housing".to_string(), dec!(80)),
            ("Food".to_string(), dec!(50)),
        ]
    );
}

#[test]
fn test_aggregate_total_equals_breakdown_sum() {
    let txns = vec![
        expense("2024-06-01", dec!(12.34), "A"),
        expense("2024-06-11", dec!(0.01), "B"),
        expense("2024-06-21", dec!(99.99), "C"),
        expense("bogus", dec!(7), "D"),
        txn("2024-06-05", EntryKind::Income, dec!(1000), "Salary"),
    ];
    for range in Range::all() {
        let window = resolve_range(*range, date(2024, 6, 21));
        let summary = aggregate(&txns, window.as_ref());
        let breakdown_sum: Decimal = summary.by_category.iter().map(|(_, a)| *a).sum();
        assert_eq!(summary.spent, breakdown_sum, "range {range}");
    }
}

#[test]
fn test_aggregate_window_filtering() {
    let txns = vec![
        expense("2024-06-15", dec!(10), "Food"),
        expense("2024-05-01", dec!(20), "Food"),
        expense("2023-01-01", dec!(40), "Food"),
    ];
    let w = resolve_range(Range::Month, date(2024, 6, 15));
    let summary = aggregate(&txns, w.as_ref());
    assert_eq!(summary.spent, dec!(10));

    let w = resolve_range(Range::Yearly, date(2024, 6, 15));
    let summary = aggregate(&txns, w.as_ref());
    assert_eq!(summary.spent, dec!(30));
}

#[test]
fn test_unparseable_date_excluded_from_bounded_ranges() {
    let txns = vec![
        expense("06/15/2024??", dec!(10), "Food"),
        expense("2024-06-15", dec!(5), "Food"),
    ];
    for range in [Range::Daily, Range::Week, Range::Month, Range::Yearly] {
        let w = resolve_range(range, date(2024, 6, 15));
        let summary = aggregate(&txns, w.as_ref());
        assert_eq!(summary.spent, dec!(5), "range {range}");
    }
    // "all" still counts it
    let summary = aggregate(&txns, None);
    assert_eq!(summary.spent, dec!(15));
}

#[test]
fn test_aggregate_breakdown_is_descending() {
    let txns = vec![
        expense("2024-06-01", dec!(5), "A"),
        expense("2024-06-01", dec!(50), "B"),
        expense("2024-06-01", dec!(25), "C"),
    ];
    let summary = aggregate(&txns, None);
    let amounts: Vec<Decimal> = summary.by_category.iter().map(|(_, a)| *a).collect();
    let mut sorted = amounts.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(amounts, sorted);
}

#[test]
fn test_aggregate_empty() {
    let summary = aggregate(&[], None);
    assert_eq!(summary.spent, Decimal::ZERO);
    assert_eq!(summary.income, Decimal::ZERO);
    assert!(summary.by_category.is_empty());
}

// ── scale_budget ──────────────────────────────────────────────

#[test]
fn test_scale_zero_budget_is_zero_for_every_range() {
    let txns = vec![expense("2024-01-01", dec!(10), "Food")];
    for range in Range::all() {
        assert_eq!(
            scale_budget(Decimal::ZERO, *range, &txns),
            Decimal::ZERO,
            "range {range}"
        );
    }
}

#[test]
fn test_scale_factors() {
    let monthly = dec!(300);
    assert_eq!(scale_budget(monthly, Range::Daily, &[]), dec!(10));
    assert_eq!(scale_budget(monthly, Range::Week, &[]), dec!(75));
    assert_eq!(scale_budget(monthly, Range::Month, &[]), dec!(300));
    assert_eq!(scale_budget(monthly, Range::Yearly, &[]), dec!(3600));
}

#[test]
fn test_scale_all_spans_calendar_months() {
    // Jan 31 to Mar 1 spans Jan, Feb, Mar = 3 months
    let txns = vec![
        expense("2024-01-31", dec!(1), "A"),
        expense("2024-03-01", dec!(1), "B"),
    ];
    assert_eq!(scale_budget(dec!(100), Range::All, &txns), dec!(300));
}

#[test]
fn test_scale_all_single_month() {
    let txns = vec![
        expense("2024-06-01", dec!(1), "A"),
        expense("2024-06-30", dec!(1), "B"),
    ];
    assert_eq!(scale_budget(dec!(100), Range::All, &txns), dec!(100));
}

#[test]
fn test_scale_all_across_years() {
    // Dec 2023 through Jan 2024 = 2 months
    let txns = vec![
        expense("2023-12-15", dec!(1), "A"),
        expense("2024-01-15", dec!(1), "B"),
    ];
    assert_eq!(scale_budget(dec!(100), Range::All, &txns), dec!(200));
}

#[test]
fn test_scale_all_defaults_without_transactions() {
    assert_eq!(scale_budget(dec!(100), Range::All, &[]), dec!(100));
    // Unparseable dates don't contribute to the span either
    let txns = vec![expense("???", dec!(1), "A")];
    assert_eq!(scale_budget(dec!(100), Range::All, &txns), dec!(100));
}

// ── monthly_budget_total ──────────────────────────────────────

#[test]
fn test_monthly_budget_total() {
    let budgets = vec![
        Budget::new("Food".into(), dec!(300)),
        Budget::new("Housing".into(), dec!(1200)),
    ];
    assert_eq!(monthly_budget_total(&budgets), dec!(1500));
    assert_eq!(monthly_budget_total(&[]), Decimal::ZERO);
}
