#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::*;

fn sample_payload() -> FetchPayload {
    serde_json::from_str(
        r#"{
            "transactions": [
                { "date": "2024-06-01", "type": "Expense", "amount": "12.50", "category": "Food", "note": "lunch" },
                { "date": "2024-06-02", "type": "Income", "amount": "3000", "category": "Salary", "note": "" },
                { "date": "junk", "type": "Expense", "amount": "5", "category": "Other", "note": "" },
                { "date": "2024-06-03", "type": "Expense", "amount": "not-a-number", "category": "Food", "note": "" }
            ],
            "budgets": [
                { "category": "Food", "limit": "300" },
                { "category": "", "limit": "100" },
                { "category": "Housing", "limit": "nope" }
            ]
        }"#,
    )
    .unwrap()
}

#[test]
fn test_map_payload_transactions() {
    let data = map_payload(sample_payload());
    // The unparseable-amount row is dropped; the unparseable-date row stays
    assert_eq!(data.transactions.len(), 3);

    let lunch = &data.transactions[0];
    assert_eq!(lunch.date, "2024-06-01");
    assert_eq!(lunch.kind, EntryKind::Expense);
    assert_eq!(lunch.amount, dec!(12.50));
    assert_eq!(lunch.category, "Food");
    assert_eq!(lunch.note, "lunch");
    assert!(!lunch.sync_hash.is_empty());

    let salary = &data.transactions[1];
    assert_eq!(salary.kind, EntryKind::Income);
    assert_eq!(salary.amount, dec!(3000));

    // Bad dates survive ingest; the range filter deals with them later
    assert_eq!(data.transactions[2].date, "junk");
}

#[test]
fn test_map_payload_budgets() {
    let data = map_payload(sample_payload());
    // Blank category and unparseable limit are both dropped
    assert_eq!(data.budgets.len(), 1);
    assert_eq!(data.budgets[0].category, "Food");
    assert_eq!(data.budgets[0].monthly_limit, dec!(300));
}

#[test]
fn test_map_payload_negative_amount_normalized() {
    let payload: FetchPayload = serde_json::from_str(
        r#"{ "transactions": [
            { "date": "2024-06-01", "type": "Expense", "amount": "-9.99", "category": "Food", "note": "" }
        ] }"#,
    )
    .unwrap();
    let data = map_payload(payload);
    // Sheets that sign their amounts still land as positive magnitudes
    assert_eq!(data.transactions[0].amount, dec!(9.99));
    assert_eq!(data.transactions[0].kind, EntryKind::Expense);
}

#[test]
fn test_map_payload_missing_fields_default() {
    let payload: FetchPayload =
        serde_json::from_str(r#"{ "transactions": [ { "amount": "1" } ] }"#).unwrap();
    let data = map_payload(payload);
    assert_eq!(data.transactions.len(), 1);
    assert_eq!(data.transactions[0].kind, EntryKind::Expense);
    assert_eq!(data.transactions[0].date, "");
}

#[test]
fn test_entry_hash_stable_and_distinct() {
    let a = entry_hash("2024-06-01", EntryKind::Expense, &dec!(12.50), "Food", "x");
    let b = entry_hash("2024-06-01", EntryKind::Expense, &dec!(12.50), "Food", "x");
    assert_eq!(a, b);
    assert_eq!(a.len(), 16);

    let c = entry_hash("2024-06-01", EntryKind::Income, &dec!(12.50), "Food", "x");
    assert_ne!(a, c);
    let d = entry_hash("2024-06-02", EntryKind::Expense, &dec!(12.50), "Food", "x");
    assert_ne!(a, d);
}

#[test]
fn test_append_request_shape() {
    let txn = Transaction {
        id: None,
        date: "2024-06-01".into(),
        kind: EntryKind::Expense,
        amount: dec!(4.50),
        category: "Food".into(),
        note: "coffee".into(),
        sync_hash: String::new(),
        created_at: String::new(),
    };
    let req = AppendRequest {
        action: "append",
        transaction: WireEntry {
            date: &txn.date,
            kind: txn.kind.as_str(),
            amount: txn.amount.to_string(),
            category: &txn.category,
            note: &txn.note,
        },
    };
    let v = serde_json::to_value(&req).unwrap();
    assert_eq!(v["action"], "append");
    assert_eq!(v["transaction"]["type"], "Expense");
    assert_eq!(v["transaction"]["amount"], "4.50");
    assert_eq!(v["transaction"]["category"], "Food");
}

#[test]
fn test_cache_serves_until_ttl() {
    let mut cache = SheetCache::new(Duration::from_secs(60));
    assert!(cache.get().is_none());

    cache.put(SheetData::default());
    assert!(cache.get().is_some());

    cache.clear();
    assert!(cache.get().is_none());
}

#[test]
fn test_cache_expires() {
    let mut cache = SheetCache::new(Duration::from_millis(10));
    cache.put(SheetData::default());
    std::thread::sleep(Duration::from_millis(25));
    assert!(cache.get().is_none());
}
