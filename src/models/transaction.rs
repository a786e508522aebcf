use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Whether an entry takes money out of the pot or puts money in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EntryKind {
    Expense,
    Income,
}

impl EntryKind {
    pub(crate) fn parse(s: &str) -> EntryKind {
        match s.trim().to_lowercase().as_str() {
            "income" | "in" | "credit" => EntryKind::Income,
            _ => EntryKind::Expense,
        }
    }

    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Expense => "Expense",
            EntryKind::Income => "Income",
        }
    }

    pub(crate) fn toggled(&self) -> EntryKind {
        match self {
            EntryKind::Expense => EntryKind::Income,
            EntryKind::Income => EntryKind::Expense,
        }
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single ledger entry. `amount` is always a positive magnitude; the
/// direction lives in `kind`. Entries are immutable once created and only
/// ever deleted by explicit user action.
#[derive(Debug, Clone)]
pub(crate) struct Transaction {
    pub(crate) id: Option<i64>,
    /// Date string as entered or ingested. Entries that arrive from the
    /// sheet can carry dates that don't parse; those never match a bounded
    /// range but still count toward all-time figures.
    pub(crate) date: String,
    pub(crate) kind: EntryKind,
    pub(crate) amount: Decimal,
    pub(crate) category: String,
    pub(crate) note: String,
    /// Dedupe key for sheet ingest; empty for form entries.
    pub(crate) sync_hash: String,
    pub(crate) created_at: String,
}

impl Transaction {
    pub(crate) fn is_income(&self) -> bool {
        self.kind == EntryKind::Income
    }

    pub(crate) fn is_expense(&self) -> bool {
        self.kind == EntryKind::Expense
    }

    /// The amount with the display sign convention applied.
    pub(crate) fn signed(&self) -> Decimal {
        match self.kind {
            EntryKind::Income => self.amount,
            EntryKind::Expense => -self.amount,
        }
    }

    /// Parse the date string, trying the canonical format first and a few
    /// common spreadsheet formats after.
    pub(crate) fn parsed_date(&self) -> Option<NaiveDate> {
        let s = self.date.trim();
        for fmt in &["%Y-%m-%d", "%m/%d/%Y", "%d/%m/%Y", "%m/%d/%y"] {
            if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
                return Some(d);
            }
        }
        None
    }
}
