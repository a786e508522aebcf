use std::str::FromStr;
use std::time::Duration;

use anyhow::Result;
use chrono::Local;
use rust_decimal::Decimal;

use crate::config::Settings;
use crate::db::Database;
use crate::models::{Budget, EntryKind, Profile, Range, Transaction, DEFAULT_CATEGORIES};
use crate::notify;
use crate::report::{self, Summary};
use crate::sheet::SheetService;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Dashboard,
    Transactions,
    Entry,
    Budgets,
    Settings,
}

impl Screen {
    pub(crate) fn all() -> &'static [Screen] {
        &[
            Self::Dashboard,
            Self::Transactions,
            Self::Entry,
            Self::Budgets,
            Self::Settings,
        ]
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dashboard => write!(f, "Dashboard"),
            Self::Transactions => write!(f, "Transactions"),
            Self::Entry => write!(f, "Entry"),
            Self::Budgets => write!(f, "Budgets"),
            Self::Settings => write!(f, "Settings"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
    Search,
    Confirm,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
            Self::Search => write!(f, "SEARCH"),
            Self::Confirm => write!(f, "CONFIRM"),
        }
    }
}

/// Pending action that requires user confirmation.
#[derive(Debug, Clone)]
pub(crate) enum PendingAction {
    DeleteTransaction { id: i64, label: String },
    DeleteBudget { id: i64, category: String },
}

/// Steps of the add-entry wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EntryStep {
    Amount,
    Category,
    Note,
    Confirm,
}

impl std::fmt::Display for EntryStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Amount => write!(f, "Amount"),
            Self::Category => write!(f, "Category"),
            Self::Note => write!(f, "Note"),
            Self::Confirm => write!(f, "Confirm"),
        }
    }
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) screen: Screen,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) search_input: String,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,

    pub(crate) range: Range,
    pub(crate) profile: Option<Profile>,

    // Dashboard figures for the active range
    pub(crate) summary: Summary,
    pub(crate) scaled_budget: Decimal,
    /// Unfiltered ledger, newest first. The report layer windows over this.
    pub(crate) all_transactions: Vec<Transaction>,

    // Transactions screen (window- and search-filtered)
    pub(crate) transactions: Vec<Transaction>,
    pub(crate) transaction_index: usize,
    pub(crate) transaction_scroll: usize,
    pub(crate) transaction_count: i64,

    // Budgets
    pub(crate) budgets: Vec<Budget>,
    pub(crate) budget_index: usize,
    pub(crate) budget_scroll: usize,

    // Entry wizard
    pub(crate) entry_step: EntryStep,
    pub(crate) entry_kind: EntryKind,
    pub(crate) entry_amount: String,
    pub(crate) entry_category: String,
    pub(crate) entry_category_index: usize,
    pub(crate) entry_note: String,

    // Confirmation
    pub(crate) pending_action: Option<PendingAction>,
    pub(crate) confirm_message: String,

    // Endpoints
    pub(crate) settings: Settings,
    pub(crate) sheet: Option<SheetService>,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    pub(crate) fn new(settings: Settings) -> Self {
        let sheet = settings.sheet_url.as_deref().and_then(|url| {
            match SheetService::new(url, Duration::from_secs(settings.cache_ttl_secs)) {
                Ok(service) => Some(service),
                Err(e) => {
                    log::warn!("sheet client unavailable: {e:#}");
                    None
                }
            }
        });

        Self {
            running: true,
            screen: Screen::Dashboard,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            search_input: String::new(),
            status_message: String::new(),
            show_help: false,

            range: Range::Month,
            profile: None,

            summary: Summary::default(),
            scaled_budget: Decimal::ZERO,
            all_transactions: Vec::new(),

            transactions: Vec::new(),
            transaction_index: 0,
            transaction_scroll: 0,
            transaction_count: 0,

            budgets: Vec::new(),
            budget_index: 0,
            budget_scroll: 0,

            entry_step: EntryStep::Amount,
            entry_kind: EntryKind::Expense,
            entry_amount: String::new(),
            entry_category: String::new(),
            entry_category_index: 0,
            entry_note: String::new(),

            pending_action: None,
            confirm_message: String::new(),

            settings,
            sheet,

            visible_rows: 20,
        }
    }

    // ── Refresh ──────────────────────────────────────────────

    pub(crate) fn refresh_dashboard(&mut self, db: &Database) -> Result<()> {
        let today = Local::now().date_naive();
        self.all_transactions = db.get_transactions(None)?;
        let window = report::resolve_range(self.range, today);
        self.summary = report::aggregate(&self.all_transactions, window.as_ref());
        self.budgets = db.get_budgets()?;
        self.scaled_budget = report::scale_budget(
            report::monthly_budget_total(&self.budgets),
            self.range,
            &self.all_transactions,
        );
        self.transaction_count = db.get_transaction_count()?;
        self.refresh_transactions(db)?;
        Ok(())
    }

    pub(crate) fn refresh_transactions(&mut self, db: &Database) -> Result<()> {
        let search = if self.search_input.is_empty() {
            None
        } else {
            Some(self.search_input.as_str())
        };
        let listed = db.get_transactions(search)?;
        let window = report::resolve_range(self.range, Local::now().date_naive());
        self.transactions = match window {
            None => listed,
            Some(w) => listed
                .into_iter()
                .filter(|t| t.parsed_date().is_some_and(|d| w.contains(d)))
                .collect(),
        };
        self.transaction_count = db.get_transaction_count()?;
        if self.transaction_index >= self.transactions.len() && !self.transactions.is_empty() {
            self.transaction_index = self.transactions.len() - 1;
        }
        Ok(())
    }

    pub(crate) fn refresh_budgets(&mut self, db: &Database) -> Result<()> {
        self.budgets = db.get_budgets()?;
        if self.budget_index >= self.budgets.len() && !self.budgets.is_empty() {
            self.budget_index = self.budgets.len() - 1;
        }
        Ok(())
    }

    pub(crate) fn refresh_profile(&mut self, db: &Database) -> Result<()> {
        self.profile = db.get_profile()?;
        Ok(())
    }

    pub(crate) fn refresh_all(&mut self, db: &Database) -> Result<()> {
        self.refresh_profile(db)?;
        self.refresh_dashboard(db)?; // also refreshes transactions
        self.refresh_budgets(db)?;
        Ok(())
    }

    pub(crate) fn set_range(&mut self, db: &Database, range: Range) -> Result<()> {
        self.range = range;
        self.transaction_index = 0;
        self.transaction_scroll = 0;
        self.refresh_dashboard(db)?;
        self.set_status(format!("Range: {range}"));
        Ok(())
    }

    // ── Entry wizard ─────────────────────────────────────────

    pub(crate) fn reset_entry(&mut self) {
        self.entry_step = EntryStep::Amount;
        self.entry_kind = EntryKind::Expense;
        self.entry_amount.clear();
        self.entry_category.clear();
        self.entry_category_index = 0;
        self.entry_note.clear();
    }

    /// Categories offered by the wizard's picker.
    pub(crate) fn entry_category_options(&self) -> Vec<String> {
        match &self.profile {
            Some(p) if !p.categories.is_empty() => p.categories.clone(),
            _ => DEFAULT_CATEGORIES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Typed text wins over the picker selection.
    pub(crate) fn selected_entry_category(&self) -> String {
        let typed = self.entry_category.trim();
        if !typed.is_empty() {
            return typed.to_string();
        }
        self.entry_category_options()
            .get(self.entry_category_index)
            .cloned()
            .unwrap_or_else(|| "Other".into())
    }

    pub(crate) fn parsed_entry_amount(&self) -> Option<Decimal> {
        Decimal::from_str(self.entry_amount.trim())
            .ok()
            .filter(|a| *a > Decimal::ZERO)
    }

    /// Insert the wizard's entry, then fire the best-effort sheet append and
    /// push notification. Returns the status line to show.
    pub(crate) fn commit_entry(&mut self, db: &mut Database) -> Result<String> {
        let Some(amount) = self.parsed_entry_amount() else {
            anyhow::bail!("Enter a positive amount");
        };
        let txn = Transaction {
            id: None,
            date: Local::now().date_naive().format("%Y-%m-%d").to_string(),
            kind: self.entry_kind,
            amount,
            category: self.selected_entry_category(),
            note: self.entry_note.trim().to_string(),
            sync_hash: String::new(),
            created_at: chrono::Utc::now().to_rfc3339(),
        };
        self.reset_entry();
        self.add_entry(db, txn)
    }

    /// Shared commit path for the wizard and `:add-txn`.
    pub(crate) fn add_entry(&mut self, db: &mut Database, txn: Transaction) -> Result<String> {
        db.insert_transaction(&txn)?;

        let mut status = format!(
            "Added {} {} — {}",
            txn.kind,
            super::util::format_amount(txn.amount),
            txn.category
        );

        if let Some(service) = self.sheet.as_mut() {
            if let Err(e) = service.append(&txn) {
                log::warn!("sheet append failed: {e:#}");
                status.push_str(" (sheet append failed)");
            }
        }

        let key = self.profile.as_ref().and_then(|p| p.notify_key.as_deref());
        if let Some(note) = notify::push_entry_added(self.settings.push_url.as_deref(), key, &txn)
        {
            status.push_str(&format!(" ({note})"));
        }

        self.refresh_all(db)?;
        Ok(status)
    }

    // ── Sheet sync ───────────────────────────────────────────

    /// Pull transactions and budgets from the sheet endpoint and merge them
    /// into the store. `force` bypasses the fetch cache.
    pub(crate) fn sync(&mut self, db: &mut Database, force: bool) -> Result<String> {
        let Some(service) = self.sheet.as_mut() else {
            anyhow::bail!("No sheet endpoint configured (set sheet_url in settings.json)");
        };
        let data = service.fetch_cached(force)?;
        let inserted = db.insert_transactions_batch(&data.transactions)?;
        for budget in &data.budgets {
            db.upsert_budget(budget)?;
        }
        self.refresh_all(db)?;
        Ok(format!(
            "Synced: {inserted} new transactions, {} budgets",
            data.budgets.len()
        ))
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }
}
