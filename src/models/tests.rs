#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;

// ── Transaction ───────────────────────────────────────────────

fn make_txn(kind: EntryKind, amount: Decimal) -> Transaction {
    Transaction {
        id: None,
        date: "2024-01-15".into(),
        kind,
        amount,
        category: "Food".into(),
        note: String::new(),
        sync_hash: String::new(),
        created_at: String::new(),
    }
}

#[test]
fn test_income() {
    let txn = make_txn(EntryKind::Income, dec!(100.00));
    assert!(txn.is_income());
    assert!(!txn.is_expense());
    assert_eq!(txn.signed(), dec!(100.00));
}

#[test]
fn test_expense() {
    let txn = make_txn(EntryKind::Expense, dec!(50.00));
    assert!(txn.is_expense());
    assert!(!txn.is_income());
    assert_eq!(txn.signed(), dec!(-50.00));
}

#[test]
fn test_amount_stays_positive() {
    // The magnitude never carries a sign; only signed() applies one
    let txn = make_txn(EntryKind::Expense, dec!(42.99));
    assert_eq!(txn.amount, dec!(42.99));
    assert_eq!(txn.signed(), dec!(-42.99));
}

#[test]
fn test_parsed_date_canonical() {
    let txn = make_txn(EntryKind::Expense, dec!(1));
    assert_eq!(
        txn.parsed_date(),
        Some(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())
    );
}

#[test]
fn test_parsed_date_spreadsheet_formats() {
    let mut txn = make_txn(EntryKind::Expense, dec!(1));
    txn.date = "01/15/2024".into();
    assert_eq!(
        txn.parsed_date(),
        Some(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())
    );

    txn.date = " 2024-02-29 ".into();
    assert_eq!(
        txn.parsed_date(),
        Some(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap())
    );
}

#[test]
fn test_parsed_date_garbage() {
    let mut txn = make_txn(EntryKind::Expense, dec!(1));
    txn.date = "not a date".into();
    assert!(txn.parsed_date().is_none());
    txn.date = String::new();
    assert!(txn.parsed_date().is_none());
}

// ── EntryKind ─────────────────────────────────────────────────

#[test]
fn test_entry_kind_parse() {
    assert_eq!(EntryKind::parse("Income"), EntryKind::Income);
    assert_eq!(EntryKind::parse("income"), EntryKind::Income);
    assert_eq!(EntryKind::parse("credit"), EntryKind::Income);
    assert_eq!(EntryKind::parse("Expense"), EntryKind::Expense);
    // Unknown kind strings fall back to expense
    assert_eq!(EntryKind::parse("whatever"), EntryKind::Expense);
    assert_eq!(EntryKind::parse(""), EntryKind::Expense);
}

#[test]
fn test_entry_kind_roundtrip() {
    for kind in [EntryKind::Expense, EntryKind::Income] {
        assert_eq!(EntryKind::parse(kind.as_str()), kind);
    }
}

#[test]
fn test_entry_kind_toggled() {
    assert_eq!(EntryKind::Expense.toggled(), EntryKind::Income);
    assert_eq!(EntryKind::Income.toggled(), EntryKind::Expense);
}

// ── Range ─────────────────────────────────────────────────────

#[test]
fn test_range_parse() {
    assert_eq!(Range::parse("daily"), Some(Range::Daily));
    assert_eq!(Range::parse("week"), Some(Range::Week));
    assert_eq!(Range::parse("MONTH"), Some(Range::Month));
    assert_eq!(Range::parse("yearly"), Some(Range::Yearly));
    assert_eq!(Range::parse("all"), Some(Range::All));
    assert_eq!(Range::parse("fortnight"), None);
}

#[test]
fn test_range_parse_aliases() {
    assert_eq!(Range::parse("today"), Some(Range::Daily));
    assert_eq!(Range::parse("weekly"), Some(Range::Week));
    assert_eq!(Range::parse("year"), Some(Range::Yearly));
}

#[test]
fn test_range_roundtrip() {
    for r in Range::all() {
        assert_eq!(Range::parse(r.as_str()), Some(*r), "roundtrip {r}");
    }
}

#[test]
fn test_range_cycle() {
    assert_eq!(Range::Daily.next(), Range::Week);
    assert_eq!(Range::All.next(), Range::Daily);
    assert_eq!(Range::Daily.prev(), Range::All);
    assert_eq!(Range::Month.prev(), Range::Week);
}

// ── Budget ────────────────────────────────────────────────────

#[test]
fn test_budget_new() {
    let budget = Budget::new("Food".into(), dec!(500));
    assert!(budget.id.is_none());
    assert_eq!(budget.category, "Food");
    assert_eq!(budget.monthly_limit, dec!(500));
}

// ── Profile ───────────────────────────────────────────────────

#[test]
fn test_profile_new_defaults() {
    let profile = Profile::new("Sam".into());
    assert_eq!(profile.display_name, "Sam");
    assert_eq!(profile.categories.len(), DEFAULT_CATEGORIES.len());
    assert_eq!(profile.monthly_income, Decimal::ZERO);
    assert_eq!(profile.savings_goal, Decimal::ZERO);
    assert!(profile.notify_key.is_none());
}

#[test]
fn test_profile_add_category() {
    let mut profile = Profile::new("Sam".into());
    assert!(profile.add_category("Pets"));
    assert!(profile.categories.contains(&"Pets".to_string()));
    // Duplicate (case-insensitive) is rejected
    assert!(!profile.add_category("pets"));
    assert!(!profile.add_category("  "));
}

#[test]
fn test_profile_remove_category() {
    let mut profile = Profile::new("Sam".into());
    assert!(profile.remove_category("food"));
    assert!(!profile.categories.iter().any(|c| c == "Food"));
    assert!(!profile.remove_category("food"));
}
