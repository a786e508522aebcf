mod schema;

use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use crate::models::{Budget, EntryKind, Profile, Transaction};
use crate::notify::{sanitize_endpoint, Subscription, SubscriptionKeys};
use crate::report::DateWindow;

pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&mut self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
        }

        Ok(())
    }

    // ── Transactions ──────────────────────────────────────────

    pub(crate) fn insert_transaction(&self, txn: &Transaction) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO transactions (date, kind, amount, category, note, sync_hash, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                txn.date,
                txn.kind.as_str(),
                txn.amount.to_string(),
                txn.category,
                txn.note,
                txn.sync_hash,
                txn.created_at,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Insert a batch, skipping rows whose non-empty `sync_hash` is already
    /// present. Returns the number of rows actually inserted.
    pub(crate) fn insert_transactions_batch(&mut self, txns: &[Transaction]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        let mut count = 0;
        for txn in txns {
            if !txn.sync_hash.is_empty() {
                let exists: bool = tx.query_row(
                    "SELECT EXISTS(SELECT 1 FROM transactions WHERE sync_hash = ?1 AND sync_hash != '')",
                    params![txn.sync_hash],
                    |row| row.get(0),
                )?;
                if exists {
                    continue;
                }
            }
            tx.execute(
                "INSERT INTO transactions (date, kind, amount, category, note, sync_hash, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    txn.date,
                    txn.kind.as_str(),
                    txn.amount.to_string(),
                    txn.category,
                    txn.note,
                    txn.sync_hash,
                    txn.created_at,
                ],
            )?;
            count += 1;
        }
        tx.commit()?;
        Ok(count)
    }

    /// All transactions, newest first. An optional substring search matches
    /// category and note. Window filtering happens in the report layer, over
    /// this in-memory list.
    pub(crate) fn get_transactions(&self, search: Option<&str>) -> Result<Vec<Transaction>> {
        let mut sql = String::from(
            "SELECT id, date, kind, amount, category, note, sync_hash, created_at
             FROM transactions WHERE 1=1",
        );
        let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

        if let Some(s) = search {
            sql.push_str(&format!(
                " AND (category LIKE ?{0} OR note LIKE ?{0})",
                param_values.len() + 1
            ));
            param_values.push(Box::new(format!("%{s}%")));
        }

        sql.push_str(" ORDER BY date DESC, id DESC");

        let params_ref: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(|p| p.as_ref()).collect();

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_ref.as_slice(), |row| {
            let kind_str: String = row.get(2)?;
            let amount_str: String = row.get(3)?;
            Ok(Transaction {
                id: Some(row.get(0)?),
                date: row.get(1)?,
                kind: EntryKind::parse(&kind_str),
                amount: Decimal::from_str(&amount_str).unwrap_or_default(),
                category: row.get(4)?,
                note: row.get(5)?,
                sync_hash: row.get(6)?,
                created_at: row.get(7)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn get_transaction_count(&self) -> Result<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?)
    }

    pub(crate) fn delete_transaction(&self, id: i64) -> Result<()> {
        self.conn
            .execute("DELETE FROM transactions WHERE id = ?1", params![id])?;
        Ok(())
    }

    // ── Budgets ───────────────────────────────────────────────

    pub(crate) fn get_budgets(&self) -> Result<Vec<Budget>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, category, monthly_limit FROM budgets ORDER BY category")?;
        let rows = stmt.query_map([], |row| {
            let amt_str: String = row.get(2)?;
            Ok(Budget {
                id: Some(row.get(0)?),
                category: row.get(1)?,
                monthly_limit: Decimal::from_str(&amt_str).unwrap_or_default(),
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn upsert_budget(&self, budget: &Budget) -> Result<()> {
        self.conn.execute(
            "INSERT INTO budgets (category, monthly_limit)
             VALUES (?1, ?2)
             ON CONFLICT(category) DO UPDATE SET monthly_limit = ?2",
            params![budget.category, budget.monthly_limit.to_string()],
        )?;
        Ok(())
    }

    pub(crate) fn delete_budget(&self, id: i64) -> Result<()> {
        self.conn
            .execute("DELETE FROM budgets WHERE id = ?1", params![id])?;
        Ok(())
    }

    // ── Profile ───────────────────────────────────────────────

    /// None until the setup flow has run.
    pub(crate) fn get_profile(&self) -> Result<Option<Profile>> {
        let result = self.conn.query_row(
            "SELECT display_name, monthly_income, savings_goal, notify_key FROM profile WHERE id = 1",
            [],
            |row| {
                let income_str: String = row.get(1)?;
                let goal_str: String = row.get(2)?;
                Ok(Profile {
                    display_name: row.get(0)?,
                    categories: Vec::new(),
                    monthly_income: Decimal::from_str(&income_str).unwrap_or_default(),
                    savings_goal: Decimal::from_str(&goal_str).unwrap_or_default(),
                    notify_key: row.get(3)?,
                })
            },
        );
        let mut profile = match result {
            Ok(p) => p,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut stmt = self
            .conn
            .prepare("SELECT name FROM profile_categories ORDER BY position")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        profile.categories = rows.collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Some(profile))
    }

    pub(crate) fn save_profile(&mut self, profile: &Profile) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO profile (id, display_name, monthly_income, savings_goal, notify_key)
             VALUES (1, ?1, ?2, ?3, ?4)
             ON CONFLICT(id) DO UPDATE SET
                 display_name = ?1, monthly_income = ?2, savings_goal = ?3, notify_key = ?4",
            params![
                profile.display_name,
                profile.monthly_income.to_string(),
                profile.savings_goal.to_string(),
                profile.notify_key,
            ],
        )?;
        tx.execute("DELETE FROM profile_categories", [])?;
        for (i, name) in profile.categories.iter().enumerate() {
            tx.execute(
                "INSERT OR IGNORE INTO profile_categories (position, name) VALUES (?1, ?2)",
                params![i as i64, name],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    // ── Push subscriptions ────────────────────────────────────

    pub(crate) fn get_subscriptions(&self) -> Result<Vec<Subscription>> {
        let mut stmt = self
            .conn
            .prepare("SELECT endpoint, auth, p256dh FROM subscriptions ORDER BY key")?;
        let rows = stmt.query_map([], |row| {
            Ok(Subscription {
                endpoint: row.get(0)?,
                keys: SubscriptionKeys {
                    auth: row.get(1)?,
                    p256dh: row.get(2)?,
                },
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Register or refresh a subscription. Keyed by the sanitized endpoint,
    /// so re-subscribing the same browser replaces the old keys.
    pub(crate) fn upsert_subscription(&self, sub: &Subscription) -> Result<()> {
        let key = sanitize_endpoint(&sub.endpoint);
        self.conn.execute(
            "INSERT INTO subscriptions (key, endpoint, auth, p256dh, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(key) DO UPDATE SET endpoint = ?2, auth = ?3, p256dh = ?4",
            params![
                key,
                sub.endpoint,
                sub.keys.auth,
                sub.keys.p256dh,
                chrono::Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Remove by raw endpoint. Returns true if a row was deleted.
    pub(crate) fn delete_subscription(&self, endpoint: &str) -> Result<bool> {
        let key = sanitize_endpoint(endpoint);
        let n = self
            .conn
            .execute("DELETE FROM subscriptions WHERE key = ?1", params![key])?;
        Ok(n > 0)
    }

    // ── Export ────────────────────────────────────────────────

    /// Write transactions (optionally window-filtered) to a CSV file.
    /// Returns the number of rows written.
    pub(crate) fn export_to_csv(&self, path: &str, window: Option<&DateWindow>) -> Result<usize> {
        let txns = self.get_transactions(None)?;
        let mut wtr = csv::Writer::from_path(path)
            .with_context(|| format!("Failed to create export file: {path}"))?;
        wtr.write_record(["Date", "Type", "Amount", "Category", "Note"])?;

        let mut count = 0;
        for txn in &txns {
            if let Some(w) = window {
                match txn.parsed_date() {
                    Some(d) if w.contains(d) => {}
                    _ => continue,
                }
            }
            wtr.write_record([
                txn.date.as_str(),
                txn.kind.as_str(),
                &txn.amount.to_string(),
                txn.category.as_str(),
                txn.note.as_str(),
            ])?;
            count += 1;
        }
        wtr.flush()?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests;
