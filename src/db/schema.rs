pub(crate) const SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS transactions (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    date        TEXT NOT NULL,
    kind        TEXT NOT NULL DEFAULT 'Expense',
    amount      TEXT NOT NULL,
    category    TEXT NOT NULL DEFAULT '',
    note        TEXT NOT NULL DEFAULT '',
    sync_hash   TEXT NOT NULL DEFAULT '',
    created_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);
CREATE INDEX IF NOT EXISTS idx_transactions_category ON transactions(category);
CREATE UNIQUE INDEX IF NOT EXISTS idx_transactions_sync_hash ON transactions(sync_hash) WHERE sync_hash != '';

CREATE TABLE IF NOT EXISTS budgets (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    category       TEXT NOT NULL UNIQUE,
    monthly_limit  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS profile (
    id             INTEGER PRIMARY KEY CHECK (id = 1),
    display_name   TEXT NOT NULL,
    monthly_income TEXT NOT NULL DEFAULT '0',
    savings_goal   TEXT NOT NULL DEFAULT '0',
    notify_key     TEXT
);

CREATE TABLE IF NOT EXISTS profile_categories (
    position INTEGER NOT NULL,
    name     TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS subscriptions (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    key         TEXT NOT NULL UNIQUE,
    endpoint    TEXT NOT NULL,
    auth        TEXT NOT NULL,
    p256dh      TEXT NOT NULL,
    created_at  TEXT NOT NULL
);

"#;

pub(crate) const CURRENT_VERSION: i32 = 1;

/// Migrations from version N to N+1.
/// Each entry is (from_version, sql).
pub(crate) const MIGRATIONS: &[(i32, &str)] = &[
    // Future migrations go here:
    // (1, "ALTER TABLE transactions ADD COLUMN currency TEXT NOT NULL DEFAULT 'USD';"),
];
