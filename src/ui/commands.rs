use std::collections::HashMap;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;

use super::app::{App, InputMode, PendingAction, Screen};
use crate::db::Database;
use crate::models::{Budget, EntryKind, Profile, Range, Transaction};
use crate::notify::Notifier;
use crate::report;

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App, &mut Database) -> anyhow::Result<()>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("q", "Quit piggybank", cmd_quit, r);
    register_command!("quit", "Quit piggybank", cmd_quit, r);
    register_command!("d", "Go to Dashboard", cmd_dashboard, r);
    register_command!("dashboard", "Go to Dashboard", cmd_dashboard, r);
    register_command!("t", "Go to Transactions", cmd_transactions, r);
    register_command!("transactions", "Go to Transactions", cmd_transactions, r);
    register_command!("e", "Add an entry", cmd_entry, r);
    register_command!("entry", "Add an entry", cmd_entry, r);
    register_command!("b", "Go to Budgets", cmd_budgets, r);
    register_command!("budgets", "Go to Budgets", cmd_budgets, r);
    register_command!("settings", "Go to Settings", cmd_settings, r);
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!("h", "Show available commands", cmd_help, r);
    register_command!(
        "range",
        "Set range (e.g. :range week; daily/week/month/yearly/all)",
        cmd_range,
        r
    );
    register_command!("r", "Set range (e.g. :r month)", cmd_range, r);
    register_command!(
        "add-txn",
        "Add entry directly (e.g. :add-txn 2024-01-15 4.50 Food lunch; +amount = income)",
        cmd_add_txn,
        r
    );
    register_command!(
        "delete-txn",
        "Delete selected transaction",
        cmd_delete_txn,
        r
    );
    register_command!(
        "budget",
        "Set monthly budget (e.g. :budget Food 500)",
        cmd_budget,
        r
    );
    register_command!(
        "delete-budget",
        "Delete selected budget",
        cmd_delete_budget,
        r
    );
    register_command!(
        "name",
        "Set display name, creating the profile on first use",
        cmd_name,
        r
    );
    register_command!("income", "Set monthly income (e.g. :income 4200)", cmd_income, r);
    register_command!("goal", "Set savings goal (e.g. :goal 800)", cmd_goal, r);
    register_command!(
        "key",
        "Set the notification key (:key <key> or :key clear)",
        cmd_key,
        r
    );
    register_command!(
        "category",
        "Add a profile category (e.g. :category Pets)",
        cmd_category,
        r
    );
    register_command!(
        "delete-category",
        "Remove a profile category",
        cmd_delete_category,
        r
    );
    register_command!("sync", "Pull from the sheet (:sync force to skip cache)", cmd_sync, r);
    register_command!("push", "Send a test notification", cmd_push, r);
    register_command!(
        "export",
        "Export the current range to CSV (e.g. :export ~/piggybank.csv)",
        cmd_export,
        r
    );
    register_command!("search", "Search transactions (e.g. :search coffee)", cmd_search, r);
    register_command!("s", "Search transactions (e.g. :s coffee)", cmd_search, r);

    r
});

pub(crate) fn handle_command(input: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        (cmd.run)(args, app, db)?;
    } else {
        let suggestion = find_closest(cmd_name);
        app.set_status(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
    }

    Ok(())
}

fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 1) // skip single-letter aliases for suggestions
        .min_by_key(|k| levenshtein(input, k))
        .unwrap_or(&"help")
        .to_string()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Parse a user-typed amount. A leading `+` marks income; everything else
/// is an expense. The stored magnitude is always positive.
fn parse_entry_amount(s: &str) -> Option<(EntryKind, Decimal)> {
    let s = s.trim();
    let (kind, raw) = match s.strip_prefix('+') {
        Some(rest) => (EntryKind::Income, rest),
        None => (EntryKind::Expense, s),
    };
    let amount = Decimal::from_str(raw).ok()?;
    if amount <= Decimal::ZERO {
        return None;
    }
    Some((kind, amount))
}

// ── Navigation ───────────────────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.running = false;
    Ok(())
}

fn cmd_dashboard(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Dashboard;
    app.refresh_dashboard(db)
}

fn cmd_transactions(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Transactions;
    app.refresh_transactions(db)
}

fn cmd_entry(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Entry;
    app.reset_entry();
    app.refresh_profile(db)
}

fn cmd_budgets(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Budgets;
    app.refresh_budgets(db)
}

fn cmd_settings(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Settings;
    app.refresh_profile(db)
}

fn cmd_help(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

fn cmd_range(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    match Range::parse(args) {
        Some(range) => app.set_range(db, range),
        None => {
            app.set_status("Usage: :range <daily|week|month|yearly|all>");
            Ok(())
        }
    }
}

// ── Entries ──────────────────────────────────────────────────

fn cmd_add_txn(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let parts: Vec<&str> = args.split_whitespace().collect();
    if parts.len() < 3 {
        app.set_status("Usage: :add-txn <YYYY-MM-DD> <amount> <category> [note]");
        return Ok(());
    }

    if NaiveDate::parse_from_str(parts[0], "%Y-%m-%d").is_err() {
        app.set_status(format!("Invalid date: {} (expected YYYY-MM-DD)", parts[0]));
        return Ok(());
    }
    let Some((kind, amount)) = parse_entry_amount(parts[1]) else {
        app.set_status(format!("Invalid amount: {}", parts[1]));
        return Ok(());
    };

    let txn = Transaction {
        id: None,
        date: parts[0].to_string(),
        kind,
        amount,
        category: parts[2].to_string(),
        note: parts[3..].join(" "),
        sync_hash: String::new(),
        created_at: chrono::Utc::now().to_rfc3339(),
    };
    let status = app.add_entry(db, txn)?;
    app.set_status(status);
    Ok(())
}

fn cmd_delete_txn(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    let Some(txn) = app.transactions.get(app.transaction_index) else {
        app.set_status("No transaction selected");
        return Ok(());
    };
    let Some(id) = txn.id else {
        return Ok(());
    };
    let label = format!("{} {} ({})", txn.date, txn.category, txn.kind);
    app.confirm_message = format!("Delete {label}?");
    app.pending_action = Some(PendingAction::DeleteTransaction { id, label });
    app.input_mode = InputMode::Confirm;
    Ok(())
}

fn cmd_search(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.search_input = args.to_string();
    app.screen = Screen::Transactions;
    app.transaction_index = 0;
    app.transaction_scroll = 0;
    app.refresh_transactions(db)
}

// ── Budgets ──────────────────────────────────────────────────

fn cmd_budget(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    // Last token is the amount; everything before it is the category name
    let Some((category, amount_str)) = args.rsplit_once(' ') else {
        app.set_status("Usage: :budget <category> <amount>");
        return Ok(());
    };
    let category = category.trim();
    let Ok(amount) = Decimal::from_str(amount_str.trim()) else {
        app.set_status(format!("Invalid amount: {amount_str}"));
        return Ok(());
    };
    if category.is_empty() || amount < Decimal::ZERO {
        app.set_status("Usage: :budget <category> <amount>");
        return Ok(());
    }

    db.upsert_budget(&Budget::new(category.to_string(), amount))?;
    app.refresh_budgets(db)?;
    app.refresh_dashboard(db)?;
    app.set_status(format!(
        "Budget set: {category} = {}/month",
        super::util::format_amount(amount)
    ));
    Ok(())
}

fn cmd_delete_budget(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    let Some(budget) = app.budgets.get(app.budget_index) else {
        app.set_status("No budget selected");
        return Ok(());
    };
    let Some(id) = budget.id else {
        return Ok(());
    };
    let category = budget.category.clone();
    app.confirm_message = format!("Delete budget for {category}?");
    app.pending_action = Some(PendingAction::DeleteBudget { id, category });
    app.input_mode = InputMode::Confirm;
    Ok(())
}

// ── Profile ──────────────────────────────────────────────────

fn cmd_name(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status("Usage: :name <display name>");
        return Ok(());
    }
    let created = app.profile.is_none();
    let mut profile = match app.profile.clone() {
        Some(p) => p,
        None => Profile::new(args.to_string()),
    };
    profile.display_name = args.to_string();
    db.save_profile(&profile)?;
    app.refresh_profile(db)?;
    if created {
        app.set_status(format!(
            "Welcome, {args}! Profile created with default categories"
        ));
    } else {
        app.set_status(format!("Display name: {args}"));
    }
    Ok(())
}

fn with_profile(
    app: &mut App,
    db: &mut Database,
    edit: impl FnOnce(&mut Profile) -> String,
) -> anyhow::Result<()> {
    let Some(mut profile) = app.profile.clone() else {
        app.set_status("No profile yet — run :name <your name> first");
        return Ok(());
    };
    let status = edit(&mut profile);
    db.save_profile(&profile)?;
    app.refresh_profile(db)?;
    app.set_status(status);
    Ok(())
}

fn cmd_income(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let Ok(amount) = Decimal::from_str(args.trim()) else {
        app.set_status("Usage: :income <amount>");
        return Ok(());
    };
    with_profile(app, db, |p| {
        p.monthly_income = amount;
        format!("Monthly income: {}", super::util::format_amount(amount))
    })
}

fn cmd_goal(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let Ok(amount) = Decimal::from_str(args.trim()) else {
        app.set_status("Usage: :goal <amount>");
        return Ok(());
    };
    with_profile(app, db, |p| {
        p.savings_goal = amount;
        format!("Savings goal: {}", super::util::format_amount(amount))
    })
}

fn cmd_key(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status("Usage: :key <notification key> (or :key clear)");
        return Ok(());
    }
    let value = if args.eq_ignore_ascii_case("clear") {
        None
    } else {
        Some(args.to_string())
    };
    with_profile(app, db, |p| {
        p.notify_key = value;
        "Notification key updated".to_string()
    })
}

fn cmd_category(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status("Usage: :category <name>");
        return Ok(());
    }
    with_profile(app, db, |p| {
        if p.add_category(args) {
            format!("Category added: {args}")
        } else {
            format!("Category already exists: {args}")
        }
    })
}

fn cmd_delete_category(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status("Usage: :delete-category <name>");
        return Ok(());
    }
    with_profile(app, db, |p| {
        if p.remove_category(args) {
            format!("Category removed: {args}")
        } else {
            format!("No such category: {args}")
        }
    })
}

// ── Endpoints ────────────────────────────────────────────────

fn cmd_sync(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let force = args.eq_ignore_ascii_case("force");
    match app.sync(db, force) {
        Ok(msg) => app.set_status(msg),
        Err(e) => {
            log::warn!("sheet sync failed: {e:#}");
            app.set_status("Sync failed — check the log for details");
        }
    }
    Ok(())
}

fn cmd_push(args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    let Some(url) = app.settings.push_url.clone() else {
        app.set_status("No push provider configured (set push_url in settings.json)");
        return Ok(());
    };
    let Some(key) = app
        .profile
        .as_ref()
        .and_then(|p| p.notify_key.clone())
    else {
        app.set_status("No notification key — run :key <key> first");
        return Ok(());
    };

    let body = if args.is_empty() { "Test notification" } else { args };
    match Notifier::new(url).and_then(|n| n.send(&key, "piggybank", body)) {
        Ok(()) => app.set_status("Notification sent"),
        Err(e) => {
            log::warn!("test notification failed: {e:#}");
            app.set_status("Notification failed — check the log for details");
        }
    }
    Ok(())
}

fn cmd_export(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let path = if args.is_empty() {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/piggybank-export-{}.csv", app.range.as_str())
    } else if let Some(rest) = args.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        args.to_string()
    };

    let window = report::resolve_range(app.range, Local::now().date_naive());
    let count = db.export_to_csv(&path, window.as_ref())?;
    if count == 0 {
        app.set_status(format!("No transactions for {}", app.range));
    } else {
        app.set_status(format!("Exported {count} transactions to {path}"));
    }
    Ok(())
}
