use std::str::FromStr;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Budget, EntryKind, Transaction};

/// One ledger row as the spreadsheet web-app endpoint serves it. Amounts
/// travel as strings; dates come through verbatim, parseable or not.
#[derive(Debug, Clone, Deserialize)]
struct EntryRow {
    #[serde(default)]
    date: String,
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    amount: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    note: String,
}

#[derive(Debug, Clone, Deserialize)]
struct BudgetRow {
    #[serde(default)]
    category: String,
    #[serde(rename = "limit", default)]
    monthly_limit: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct FetchPayload {
    #[serde(default)]
    transactions: Vec<EntryRow>,
    #[serde(default)]
    budgets: Vec<BudgetRow>,
}

#[derive(Serialize)]
struct AppendRequest<'a> {
    action: &'static str,
    transaction: WireEntry<'a>,
}

#[derive(Serialize)]
struct WireEntry<'a> {
    date: &'a str,
    #[serde(rename = "type")]
    kind: &'a str,
    amount: String,
    category: &'a str,
    note: &'a str,
}

#[derive(Debug, Deserialize)]
struct AppendResponse {
    #[serde(default)]
    ok: bool,
}

/// Parsed fetch result, ready to merge into the store.
#[derive(Debug, Clone, Default)]
pub(crate) struct SheetData {
    pub(crate) transactions: Vec<Transaction>,
    pub(crate) budgets: Vec<Budget>,
}

fn map_payload(payload: FetchPayload) -> SheetData {
    let now = chrono::Utc::now().to_rfc3339();
    let mut transactions = Vec::with_capacity(payload.transactions.len());
    for row in payload.transactions {
        let Ok(amount) = Decimal::from_str(row.amount.trim()) else {
            log::warn!(
                "sheet row skipped: unparseable amount '{}' ({})",
                row.amount,
                row.category
            );
            continue;
        };
        let kind = EntryKind::parse(&row.kind);
        let hash = entry_hash(&row.date, kind, &amount, &row.category, &row.note);
        transactions.push(Transaction {
            id: None,
            date: row.date,
            kind,
            amount: amount.abs(),
            category: row.category,
            note: row.note,
            sync_hash: hash,
            created_at: now.clone(),
        });
    }

    let mut budgets = Vec::with_capacity(payload.budgets.len());
    for row in payload.budgets {
        if row.category.trim().is_empty() {
            continue;
        }
        let Ok(limit) = Decimal::from_str(row.monthly_limit.trim()) else {
            log::warn!(
                "sheet budget skipped: unparseable limit '{}' ({})",
                row.monthly_limit,
                row.category
            );
            continue;
        };
        budgets.push(Budget::new(row.category, limit));
    }

    SheetData {
        transactions,
        budgets,
    }
}

/// Stable dedupe key so re-fetching the sheet never duplicates rows.
/// FNV-1a (64-bit): simple and stable across Rust versions, unlike
/// DefaultHasher which can change between releases.
pub(crate) fn entry_hash(
    date: &str,
    kind: EntryKind,
    amount: &Decimal,
    category: &str,
    note: &str,
) -> String {
    let input = format!("{date}|{}|{amount}|{category}|{note}", kind.as_str());
    let hash = fnv1a(input.as_bytes());
    format!("{hash:016x}")
}

fn fnv1a(data: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf29ce484222325;
    for &byte in data {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

/// Thin client for the spreadsheet web-app endpoint.
pub(crate) struct SheetClient {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl SheetClient {
    pub(crate) fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub(crate) fn fetch(&self) -> Result<SheetData> {
        let payload: FetchPayload = self
            .client
            .get(&self.base_url)
            .query(&[("action", "fetch")])
            .send()
            .context("Sheet fetch request failed")?
            .error_for_status()
            .context("Sheet endpoint rejected the fetch")?
            .json()
            .context("Sheet fetch returned malformed JSON")?;
        let data = map_payload(payload);
        log::info!(
            "sheet fetch: {} transactions, {} budgets",
            data.transactions.len(),
            data.budgets.len()
        );
        Ok(data)
    }

    pub(crate) fn append(&self, txn: &Transaction) -> Result<()> {
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
        let resp: AppendResponse = self
            .client
            .post(&self.base_url)
            .json(&req)
            .send()
            .context("Sheet append request failed")?
            .error_for_status()
            .context("Sheet endpoint rejected the append")?
            .json()
            .context("Sheet append returned malformed JSON")?;
        if !resp.ok {
            anyhow::bail!("Sheet endpoint reported failure");
        }
        Ok(())
    }
}

/// Time-boxed in-memory cache of the last fetched payload. Repeated syncs
/// inside the TTL are served locally instead of hitting the endpoint again.
pub(crate) struct SheetCache {
    ttl: Duration,
    slot: Option<(Instant, SheetData)>,
}

impl SheetCache {
    pub(crate) fn new(ttl: Duration) -> Self {
        Self { ttl, slot: None }
    }

    pub(crate) fn get(&self) -> Option<&SheetData> {
        match &self.slot {
            Some((at, data)) if at.elapsed() < self.ttl => Some(data),
            _ => None,
        }
    }

    pub(crate) fn put(&mut self, data: SheetData) {
        self.slot = Some((Instant::now(), data));
    }

    pub(crate) fn clear(&mut self) {
        self.slot = None;
    }
}

/// Client plus cache, as the surfaces use them together.
pub(crate) struct SheetService {
    client: SheetClient,
    cache: SheetCache,
}

impl SheetService {
    pub(crate) fn new(base_url: &str, cache_ttl: Duration) -> Result<Self> {
        Ok(Self {
            client: SheetClient::new(base_url)?,
            cache: SheetCache::new(cache_ttl),
        })
    }

    /// Fetch through the cache. `force` bypasses and refreshes it.
    pub(crate) fn fetch_cached(&mut self, force: bool) -> Result<SheetData> {
        if !force {
            if let Some(data) = self.cache.get() {
                log::debug!("sheet fetch served from cache");
                return Ok(data.clone());
            }
        }
        let data = self.client.fetch()?;
        self.cache.put(data.clone());
        Ok(data)
    }

    /// Append an entry and drop the cache so the next fetch sees it.
    pub(crate) fn append(&mut self, txn: &Transaction) -> Result<()> {
        self.client.append(txn)?;
        self.cache.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests;
