#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;
use crate::models::{EntryKind, Profile};
use crate::report::resolve_range;
use crate::models::Range;

fn make_txn(date: &str, kind: EntryKind, amount: Decimal, category: &str) -> Transaction {
    Transaction {
        id: None,
        date: date.into(),
        kind,
        amount,
        category: category.into(),
        note: String::new(),
        sync_hash: String::new(),
        created_at: "2024-01-01T00:00:00Z".into(),
    }
}

// ── Transactions ──────────────────────────────────────────────

#[test]
fn test_transaction_insert_and_list() {
    let db = Database::open_in_memory().unwrap();
    let id = db
        .insert_transaction(&make_txn("2024-01-10", EntryKind::Expense, dec!(5.25), "Food"))
        .unwrap();
    assert!(id > 0);

    let txns = db.get_transactions(None).unwrap();
    assert_eq!(txns.len(), 1);
    assert_eq!(txns[0].id, Some(id));
    assert_eq!(txns[0].kind, EntryKind::Expense);
    assert_eq!(txns[0].amount, dec!(5.25));
    assert_eq!(txns[0].category, "Food");
}

#[test]
fn test_transactions_newest_first() {
    let db = Database::open_in_memory().unwrap();
    db.insert_transaction(&make_txn("2024-01-10", EntryKind::Expense, dec!(1), "A"))
        .unwrap();
    db.insert_transaction(&make_txn("2024-03-01", EntryKind::Expense, dec!(2), "B"))
        .unwrap();
    db.insert_transaction(&make_txn("2024-02-15", EntryKind::Expense, dec!(3), "C"))
        .unwrap();

    let txns = db.get_transactions(None).unwrap();
    let dates: Vec<&str> = txns.iter().map(|t| t.date.as_str()).collect();
    assert_eq!(dates, vec!["2024-03-01", "2024-02-15", "2024-01-10"]);
}

#[test]
fn test_transaction_search() {
    let db = Database::open_in_memory().unwrap();
    let mut txn = make_txn("2024-01-10", EntryKind::Expense, dec!(5), "Coffee Shops");
    txn.note = "morning latte".into();
    db.insert_transaction(&txn).unwrap();
    db.insert_transaction(&make_txn("2024-01-11", EntryKind::Expense, dec!(9), "Groceries"))
        .unwrap();

    assert_eq!(db.get_transactions(Some("coffee")).unwrap().len(), 1);
    assert_eq!(db.get_transactions(Some("latte")).unwrap().len(), 1);
    assert_eq!(db.get_transactions(Some("pizza")).unwrap().len(), 0);
}

#[test]
fn test_transaction_delete() {
    let db = Database::open_in_memory().unwrap();
    let id = db
        .insert_transaction(&make_txn("2024-01-10", EntryKind::Expense, dec!(5), "Food"))
        .unwrap();
    assert_eq!(db.get_transaction_count().unwrap(), 1);

    db.delete_transaction(id).unwrap();
    assert_eq!(db.get_transaction_count().unwrap(), 0);
}

#[test]
fn test_batch_insert_dedupes_on_sync_hash() {
    let mut db = Database::open_in_memory().unwrap();
    let mut a = make_txn("2024-01-10", EntryKind::Expense, dec!(5), "Food");
    a.sync_hash = "hash-a".into();
    let mut b = make_txn("2024-01-11", EntryKind::Expense, dec!(7), "Food");
    b.sync_hash = "hash-b".into();

    let count = db
        .insert_transactions_batch(&[a.clone(), b.clone()])
        .unwrap();
    assert_eq!(count, 2);

    // Re-ingesting the same rows inserts nothing
    let count = db.insert_transactions_batch(&[a, b]).unwrap();
    assert_eq!(count, 0);
    assert_eq!(db.get_transaction_count().unwrap(), 2);
}

#[test]
fn test_batch_insert_empty_hash_never_dedupes() {
    let mut db = Database::open_in_memory().unwrap();
    let a = make_txn("2024-01-10", EntryKind::Expense, dec!(5), "Food");
    let count = db
        .insert_transactions_batch(&[a.clone(), a])
        .unwrap();
    // Form entries carry no hash and are always inserted
    assert_eq!(count, 2);
}

// ── Budgets ───────────────────────────────────────────────────

#[test]
fn test_budget_upsert_by_category() {
    let db = Database::open_in_memory().unwrap();
    db.upsert_budget(&Budget::new("Food".into(), dec!(300))).unwrap();
    db.upsert_budget(&Budget::new("Housing".into(), dec!(1200))).unwrap();

    let budgets = db.get_budgets().unwrap();
    assert_eq!(budgets.len(), 2);

    // Second write for the same category replaces the limit
    db.upsert_budget(&Budget::new("Food".into(), dec!(450))).unwrap();
    let budgets = db.get_budgets().unwrap();
    assert_eq!(budgets.len(), 2);
    let food = budgets.iter().find(|b| b.category == "Food").unwrap();
    assert_eq!(food.monthly_limit, dec!(450));
}

#[test]
fn test_budgets_sorted_by_category() {
    let db = Database::open_in_memory().unwrap();
    db.upsert_budget(&Budget::new("Transport".into(), dec!(100))).unwrap();
    db.upsert_budget(&Budget::new("Food".into(), dec!(300))).unwrap();

    let budgets = db.get_budgets().unwrap();
    let names: Vec<&str> = budgets.iter().map(|b| b.category.as_str()).collect();
    assert_eq!(names, vec!["Food", "Transport"]);
}

#[test]
fn test_budget_delete() {
    let db = Database::open_in_memory().unwrap();
    db.upsert_budget(&Budget::new("Food".into(), dec!(300))).unwrap();
    let id = db.get_budgets().unwrap()[0].id.unwrap();
    db.delete_budget(id).unwrap();
    assert!(db.get_budgets().unwrap().is_empty());
}

// ── Profile ───────────────────────────────────────────────────

#[test]
fn test_profile_absent_before_setup() {
    let db = Database::open_in_memory().unwrap();
    assert!(db.get_profile().unwrap().is_none());
}

#[test]
fn test_profile_roundtrip() {
    let mut db = Database::open_in_memory().unwrap();
    let mut profile = Profile::new("Sam".into());
    profile.monthly_income = dec!(4200);
    profile.savings_goal = dec!(800);
    profile.notify_key = Some("abc123".into());
    db.save_profile(&profile).unwrap();

    let back = db.get_profile().unwrap().unwrap();
    assert_eq!(back.display_name, "Sam");
    assert_eq!(back.monthly_income, dec!(4200));
    assert_eq!(back.savings_goal, dec!(800));
    assert_eq!(back.notify_key.as_deref(), Some("abc123"));
    assert_eq!(back.categories, profile.categories);
}

#[test]
fn test_profile_save_is_upsert() {
    let mut db = Database::open_in_memory().unwrap();
    db.save_profile(&Profile::new("Sam".into())).unwrap();

    let mut updated = Profile::new("Sam R.".into());
    updated.categories = vec!["Food".into(), "Rent".into()];
    db.save_profile(&updated).unwrap();

    let back = db.get_profile().unwrap().unwrap();
    assert_eq!(back.display_name, "Sam R.");
    assert_eq!(back.categories, vec!["Food".to_string(), "Rent".to_string()]);
}

// ── Subscriptions ─────────────────────────────────────────────

fn make_sub(endpoint: &str) -> Subscription {
    Subscription {
        endpoint: endpoint.into(),
        keys: SubscriptionKeys {
            auth: "auth-secret".into(),
            p256dh: "p256dh-key".into(),
        },
    }
}

#[test]
fn test_subscription_upsert_and_list() {
    let db = Database::open_in_memory().unwrap();
    db.upsert_subscription(&make_sub("https://push.example.com/send/abc"))
        .unwrap();

    let subs = db.get_subscriptions().unwrap();
    assert_eq!(subs.len(), 1);
    assert_eq!(subs[0].endpoint, "https://push.example.com/send/abc");
    assert_eq!(subs[0].keys.auth, "auth-secret");
}

#[test]
fn test_subscription_resubscribe_replaces() {
    let db = Database::open_in_memory().unwrap();
    db.upsert_subscription(&make_sub("https://push.example.com/send/abc"))
        .unwrap();

    let mut renewed = make_sub("https://push.example.com/send/abc");
    renewed.keys.auth = "new-auth".into();
    db.upsert_subscription(&renewed).unwrap();

    let subs = db.get_subscriptions().unwrap();
    assert_eq!(subs.len(), 1);
    assert_eq!(subs[0].keys.auth, "new-auth");
}

#[test]
fn test_subscription_delete_by_endpoint() {
    let db = Database::open_in_memory().unwrap();
    db.upsert_subscription(&make_sub("https://push.example.com/send/abc"))
        .unwrap();

    assert!(db
        .delete_subscription("https://push.example.com/send/abc")
        .unwrap());
    assert!(db.get_subscriptions().unwrap().is_empty());
    assert!(!db.delete_subscription("https://push.example.com/send/abc").unwrap());
}

// ── Export ────────────────────────────────────────────────────

#[test]
fn test_export_to_csv() {
    let db = Database::open_in_memory().unwrap();
    db.insert_transaction(&make_txn("2024-06-15", EntryKind::Expense, dec!(5.25), "Food"))
        .unwrap();
    db.insert_transaction(&make_txn("2023-01-01", EntryKind::Income, dec!(100), "Salary"))
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("export.csv");
    let count = db.export_to_csv(path.to_str().unwrap(), None).unwrap();
    assert_eq!(count, 2);

    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.starts_with("Date,Type,Amount,Category,Note"));
    assert!(contents.contains("2024-06-15,Expense,5.25,Food,"));
}

#[test]
fn test_export_window_filter() {
    let db = Database::open_in_memory().unwrap();
    db.insert_transaction(&make_txn("2024-06-15", EntryKind::Expense, dec!(5), "Food"))
        .unwrap();
    db.insert_transaction(&make_txn("2023-01-01", EntryKind::Expense, dec!(9), "Food"))
        .unwrap();

    let window = resolve_range(
        Range::Month,
        chrono::NaiveDate::from_ymd_opt(2024, 6, 20).unwrap(),
    );

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("export.csv");
    let count = db
        .export_to_csv(path.to_str().unwrap(), window.as_ref())
        .unwrap();
    assert_eq!(count, 1);
}
