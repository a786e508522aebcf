use std::io::Write;
use std::str::FromStr;

use anyhow::Result;
use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;

use crate::config::Settings;
use crate::db::Database;
use crate::models::{Budget, EntryKind, Profile, Range, Transaction};
use crate::notify::{self, Notifier, Subscription, SubscriptionKeys};
use crate::report;
use crate::sheet::SheetClient;
use crate::ui::util::format_amount;

pub(crate) fn as_cli(args: &[String], db: &mut Database, settings: &Settings) -> Result<()> {
    match args[1].as_str() {
        "add" => cli_add(&args[2..], db, settings),
        "summary" | "s" => cli_summary(&args[2..], db),
        "sync" => cli_sync(db, settings),
        "budgets" => cli_budgets(db),
        "budget" => cli_budget(&args[2..], db),
        "export" => cli_export(&args[2..], db),
        "setup" => cli_setup(db),
        "subscribe" => cli_subscribe(&args[2..], db),
        "unsubscribe" => cli_unsubscribe(&args[2..], db),
        "subscriptions" => cli_subscriptions(db),
        "notify" => cli_notify(&args[2..], db, settings),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("piggybank {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("piggybank — personal finance dashboard for the terminal");
    println!();
    println!("Usage: piggybank [command]");
    println!();
    println!("Commands:");
    println!("  (none)                            Launch interactive TUI");
    println!("  setup                             Create or edit your profile (interactive)");
    println!("  add <date> <amount> <cat> [note]  Add an entry (+amount = income)");
    println!("  summary [range]                   Print a summary (daily/week/month/yearly/all)");
    println!("  sync                              Pull transactions and budgets from the sheet");
    println!("  budgets                           List monthly budgets");
    println!("  budget <category> <amount>        Set a monthly budget");
    println!("  export [path] [--range <range>]   Export transactions to CSV");
    println!("  subscribe <endpoint> <auth> <p256dh>   Register a push subscription");
    println!("  unsubscribe <endpoint>            Remove a push subscription");
    println!("  subscriptions                     List push subscriptions");
    println!("  notify <message>                  Send a test notification");
    println!("  --help, -h                        Show this help");
    println!("  --version, -V                     Show version");
}

fn cli_add(args: &[String], db: &mut Database, settings: &Settings) -> Result<()> {
    if args.len() < 3 {
        anyhow::bail!("Usage: piggybank add <YYYY-MM-DD> <amount> <category> [note]");
    }

    if NaiveDate::parse_from_str(&args[0], "%Y-%m-%d").is_err() {
        anyhow::bail!("Invalid date: {} (expected YYYY-MM-DD)", args[0]);
    }

    let raw = args[1].as_str();
    let (kind, amount_str) = match raw.strip_prefix('+') {
        Some(rest) => (EntryKind::Income, rest),
        None => (EntryKind::Expense, raw),
    };
    let amount = Decimal::from_str(amount_str)
        .ok()
        .filter(|a| *a > Decimal::ZERO)
        .ok_or_else(|| anyhow::anyhow!("Invalid amount: {raw}"))?;

    let txn = Transaction {
        id: None,
        date: args[0].clone(),
        kind,
        amount,
        category: args[2].clone(),
        note: args[3..].join(" "),
        sync_hash: String::new(),
        created_at: chrono::Utc::now().to_rfc3339(),
    };
    db.insert_transaction(&txn)?;
    println!(
        "Added {} {} — {}",
        txn.kind,
        format_amount(txn.amount),
        txn.category
    );

    // Best-effort mirror to the sheet
    if let Some(url) = settings.sheet_url.as_deref() {
        match SheetClient::new(url).and_then(|c| c.append(&txn)) {
            Ok(()) => println!("Appended to sheet"),
            Err(e) => {
                log::warn!("sheet append failed: {e:#}");
                eprintln!("Warning: sheet append failed (see log)");
            }
        }
    }

    // Best-effort push notification
    let key = db.get_profile()?.and_then(|p| p.notify_key);
    if let Some(note) = notify::push_entry_added(settings.push_url.as_deref(), key.as_deref(), &txn)
    {
        println!("Push: {note}");
    }

    Ok(())
}

fn cli_summary(args: &[String], db: &mut Database) -> Result<()> {
    let range = args
        .first()
        .and_then(|a| Range::parse(a))
        .unwrap_or(Range::Month);

    let txns = db.get_transactions(None)?;
    let window = report::resolve_range(range, Local::now().date_naive());
    let summary = report::aggregate(&txns, window.as_ref());
    let budgets = db.get_budgets()?;
    let scaled = report::scale_budget(report::monthly_budget_total(&budgets), range, &txns);
    let remaining = scaled - summary.spent;

    println!("piggybank — {}", range.label());
    println!("{}", "─".repeat(40));
    println!("  Spent:      {}", format_amount(summary.spent));
    println!("  Income:     {}", format_amount(summary.income));
    println!("  Budget:     {} (scaled)", format_amount(scaled));
    println!("  Remaining:  {}", format_amount(remaining));
    println!("  Total Txns: {}", db.get_transaction_count()?);

    if !summary.by_category.is_empty() {
        println!();
        println!("Spending by Category:");
        for (name, amount) in &summary.by_category {
            println!("  {name:<24} {}", format_amount(*amount));
        }
    }

    Ok(())
}

fn cli_sync(db: &mut Database, settings: &Settings) -> Result<()> {
    let Some(url) = settings.sheet_url.as_deref() else {
        anyhow::bail!("No sheet endpoint configured (set sheet_url in settings.json)");
    };

    let data = match SheetClient::new(url).and_then(|c| c.fetch()) {
        Ok(data) => data,
        Err(e) => {
            log::warn!("sheet sync failed: {e:#}");
            anyhow::bail!("Sync failed — check the log for details");
        }
    };

    let inserted = db.insert_transactions_batch(&data.transactions)?;
    for budget in &data.budgets {
        db.upsert_budget(budget)?;
    }
    let dupes = data.transactions.len() - inserted;
    println!(
        "Synced {inserted} new transactions ({dupes} already present), {} budgets",
        data.budgets.len()
    );
    Ok(())
}

fn cli_budgets(db: &mut Database) -> Result<()> {
    let budgets = db.get_budgets()?;
    if budgets.is_empty() {
        println!("No budgets. Set one with: piggybank budget <category> <amount>");
        return Ok(());
    }

    println!("{:<24} Monthly limit", "Category");
    println!("{}", "─".repeat(40));
    for budget in &budgets {
        println!(
            "{:<24} {}",
            budget.category,
            format_amount(budget.monthly_limit)
        );
    }
    Ok(())
}

fn cli_budget(args: &[String], db: &mut Database) -> Result<()> {
    if args.len() < 2 {
        anyhow::bail!("Usage: piggybank budget <category> <amount>");
    }
    let amount_str = &args[args.len() - 1];
    let category = args[..args.len() - 1].join(" ");
    let amount = Decimal::from_str(amount_str)
        .ok()
        .filter(|a| *a >= Decimal::ZERO)
        .ok_or_else(|| anyhow::anyhow!("Invalid amount: {amount_str}"))?;

    db.upsert_budget(&Budget::new(category.clone(), amount))?;
    println!("Budget set: {category} = {}/month", format_amount(amount));
    Ok(())
}

fn cli_export(args: &[String], db: &mut Database) -> Result<()> {
    let range = args
        .windows(2)
        .find(|w| w[0] == "--range")
        .and_then(|w| Range::parse(&w[1]))
        .unwrap_or(Range::All);

    let output_path = args
        .first()
        .filter(|a| !a.starts_with('-'))
        .map(|a| shellexpand(a))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            format!("{home}/piggybank-export-{}.csv", range.as_str())
        });

    let window = report::resolve_range(range, Local::now().date_naive());
    let count = db.export_to_csv(&output_path, window.as_ref())?;
    if count == 0 {
        println!("No transactions for {}", range.label());
    } else {
        println!("Exported {count} transactions to {output_path}");
    }
    Ok(())
}

fn cli_setup(db: &mut Database) -> Result<()> {
    let existing = db.get_profile()?;
    if existing.is_some() {
        println!("Profile exists — blank answers keep the current value.");
    }

    let name = prompt("Display name")?;
    let mut profile = match existing {
        Some(mut p) => {
            if !name.is_empty() {
                p.display_name = name;
            }
            p
        }
        None => {
            if name.is_empty() {
                anyhow::bail!("A display name is required");
            }
            Profile::new(name)
        }
    };

    let income = prompt("Monthly income")?;
    if !income.is_empty() {
        profile.monthly_income = Decimal::from_str(&income)
            .map_err(|_| anyhow::anyhow!("Invalid amount: {income}"))?;
    }

    let goal = prompt("Savings goal")?;
    if !goal.is_empty() {
        profile.savings_goal =
            Decimal::from_str(&goal).map_err(|_| anyhow::anyhow!("Invalid amount: {goal}"))?;
    }

    let categories = prompt("Categories (comma-separated, blank for defaults)")?;
    if !categories.is_empty() {
        profile.categories = categories
            .split(',')
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();
    }

    let key = prompt("Notification key (blank to skip)")?;
    if !key.is_empty() {
        profile.notify_key = Some(key);
    }

    db.save_profile(&profile)?;
    println!();
    println!(
        "Profile saved. {} categories, income {}.",
        profile.categories.len(),
        format_amount(profile.monthly_income)
    );
    Ok(())
}

fn cli_subscribe(args: &[String], db: &mut Database) -> Result<()> {
    if args.len() != 3 {
        anyhow::bail!("Usage: piggybank subscribe <endpoint> <auth> <p256dh>");
    }
    let sub = Subscription {
        endpoint: args[0].clone(),
        keys: SubscriptionKeys {
            auth: args[1].clone(),
            p256dh: args[2].clone(),
        },
    };
    db.upsert_subscription(&sub)?;
    println!(
        "Subscribed (key: {})",
        notify::sanitize_endpoint(&sub.endpoint)
    );
    Ok(())
}

fn cli_unsubscribe(args: &[String], db: &mut Database) -> Result<()> {
    if args.is_empty() {
        anyhow::bail!("Usage: piggybank unsubscribe <endpoint>");
    }
    if db.delete_subscription(&args[0])? {
        println!("Unsubscribed");
    } else {
        println!("No such subscription");
    }
    Ok(())
}

fn cli_subscriptions(db: &mut Database) -> Result<()> {
    let subs = db.get_subscriptions()?;
    if subs.is_empty() {
        println!("No push subscriptions");
        return Ok(());
    }
    for sub in &subs {
        println!(
            "{}  ({})",
            sub.endpoint,
            notify::sanitize_endpoint(&sub.endpoint)
        );
    }
    Ok(())
}

fn cli_notify(args: &[String], db: &mut Database, settings: &Settings) -> Result<()> {
    let Some(url) = settings.push_url.as_deref() else {
        anyhow::bail!("No push provider configured (set push_url in settings.json)");
    };
    let Some(key) = db.get_profile()?.and_then(|p| p.notify_key) else {
        anyhow::bail!("No notification key on the profile (run: piggybank setup)");
    };

    let body = if args.is_empty() {
        "Test notification".to_string()
    } else {
        args.join(" ")
    };

    match Notifier::new(url).and_then(|n| n.send(&key, "piggybank", &body)) {
        Ok(()) => println!("Notification sent"),
        Err(e) => {
            log::warn!("test notification failed: {e:#}");
            anyhow::bail!("Notification failed — check the log for details");
        }
    }
    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    print!("{label}: ");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}
