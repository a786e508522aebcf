use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

use crate::config::Settings;
use crate::db::Database;
use crate::ui::app::{App, EntryStep, InputMode, PendingAction, Screen};
use crate::ui::commands;
use crate::ui::util::{scroll_down, scroll_to_bottom, scroll_to_top, scroll_up};

pub(crate) fn as_tui(db: &mut Database, settings: Settings) -> Result<()> {
    let mut app = App::new(settings);
    app.refresh_all(db)?;

    // First run: land on the setup screen until a profile exists
    if app.profile.is_none() {
        app.screen = Screen::Settings;
        app.set_status("Welcome! Create your profile with :name <your name>");
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, db);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        eprintln!("Error: {e:?}");
    }

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    db: &mut Database,
) -> Result<()> {
    while app.running {
        terminal.draw(|f| {
            // Tab + status + command bars, table borders and header
            let content_height = f.area().height.saturating_sub(6) as usize;
            app.visible_rows = content_height.max(1);
            crate::ui::render::render(f, app);
        })?;

        if let Event::Key(key) = event::read()? {
            if app.show_help {
                app.show_help = false;
                continue;
            }
            match app.input_mode {
                InputMode::Normal => handle_normal_input(key, app, db)?,
                InputMode::Command => handle_command_input(key, app, db)?,
                InputMode::Search => handle_search_input(key, app, db)?,
                InputMode::Confirm => handle_confirm_input(key, app, db)?,
            }
        }
    }
    Ok(())
}

// ── Input handlers ───────────────────────────────────────────

fn handle_normal_input(key: event::KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    if app.screen == Screen::Entry {
        return handle_entry_input(key, app, db);
    }

    match key.code {
        KeyCode::Char(':') => {
            app.input_mode = InputMode::Command;
            app.command_input.clear();
        }
        KeyCode::Char('/') => {
            app.input_mode = InputMode::Search;
            app.search_input.clear();
        }
        KeyCode::Char('q') | KeyCode::Char('c')
            if key.modifiers.contains(KeyModifiers::CONTROL) =>
        {
            app.running = false;
        }
        KeyCode::Char('j') | KeyCode::Down => handle_move_down(app),
        KeyCode::Char('k') | KeyCode::Up => handle_move_up(app),
        KeyCode::Char('1') => switch_screen(app, db, Screen::Dashboard)?,
        KeyCode::Char('2') => switch_screen(app, db, Screen::Transactions)?,
        KeyCode::Char('3') => switch_screen(app, db, Screen::Entry)?,
        KeyCode::Char('4') => switch_screen(app, db, Screen::Budgets)?,
        KeyCode::Char('5') => switch_screen(app, db, Screen::Settings)?,
        KeyCode::Tab => {
            let screens = Screen::all();
            let idx = screens.iter().position(|s| *s == app.screen).unwrap_or(0);
            let next = (idx + 1) % screens.len();
            switch_screen(app, db, screens[next])?;
        }
        KeyCode::BackTab => {
            let screens = Screen::all();
            let idx = screens.iter().position(|s| *s == app.screen).unwrap_or(0);
            let prev = if idx == 0 { screens.len() - 1 } else { idx - 1 };
            switch_screen(app, db, screens[prev])?;
        }
        KeyCode::Esc => {
            app.status_message.clear();
            if !app.search_input.is_empty() {
                app.search_input.clear();
                app.refresh_transactions(db)?;
            }
        }
        KeyCode::Char('g') => handle_goto_top(app),
        KeyCode::Char('G') => handle_goto_bottom(app),
        KeyCode::Char('?') => {
            app.show_help = true;
        }
        KeyCode::Char('H') => {
            let prev = app.range.prev();
            app.set_range(db, prev)?;
        }
        KeyCode::Char('L') => {
            let next = app.range.next();
            app.set_range(db, next)?;
        }
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let half_page = app.visible_rows / 2;
            for _ in 0..half_page {
                handle_move_down(app);
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let half_page = app.visible_rows / 2;
            for _ in 0..half_page {
                handle_move_up(app);
            }
        }
        KeyCode::Char('D') if app.screen == Screen::Transactions => {
            commands::handle_command("delete-txn", app, db)?;
        }
        KeyCode::Char('D') if app.screen == Screen::Budgets => {
            commands::handle_command("delete-budget", app, db)?;
        }
        _ => {}
    }
    Ok(())
}

fn handle_entry_input(key: event::KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    // The wizard owns most keys; ':' still opens command mode from any step
    if key.code == KeyCode::Char(':') && app.entry_step != EntryStep::Note {
        app.input_mode = InputMode::Command;
        app.command_input.clear();
        return Ok(());
    }
    if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.running = false;
        return Ok(());
    }

    match app.entry_step {
        EntryStep::Amount => match key.code {
            KeyCode::Esc => {
                app.reset_entry();
                switch_screen(app, db, Screen::Dashboard)?;
            }
            KeyCode::Tab => {
                app.entry_kind = app.entry_kind.toggled();
            }
            KeyCode::Enter => {
                if app.parsed_entry_amount().is_some() {
                    app.entry_step = EntryStep::Category;
                } else {
                    app.set_status("Enter a positive amount first");
                }
            }
            KeyCode::Backspace => {
                app.entry_amount.pop();
            }
            KeyCode::Char(c) if c.is_ascii_digit() || c == '.' => {
                app.entry_amount.push(c);
            }
            _ => {}
        },
        EntryStep::Category => match key.code {
            KeyCode::Esc => {
                app.entry_step = EntryStep::Amount;
            }
            KeyCode::Enter => {
                app.entry_step = EntryStep::Note;
            }
            KeyCode::Up => {
                app.entry_category_index = app.entry_category_index.saturating_sub(1);
            }
            KeyCode::Down => {
                let len = app.entry_category_options().len();
                if app.entry_category_index + 1 < len {
                    app.entry_category_index += 1;
                }
            }
            KeyCode::Backspace => {
                app.entry_category.pop();
            }
            KeyCode::Char(c) => {
                app.entry_category.push(c);
            }
            _ => {}
        },
        EntryStep::Note => match key.code {
            KeyCode::Esc => {
                app.entry_step = EntryStep::Category;
            }
            KeyCode::Enter => {
                app.entry_step = EntryStep::Confirm;
            }
            KeyCode::Backspace => {
                app.entry_note.pop();
            }
            KeyCode::Char(c) => {
                app.entry_note.push(c);
            }
            _ => {}
        },
        EntryStep::Confirm => match key.code {
            KeyCode::Esc => {
                app.entry_step = EntryStep::Note;
            }
            KeyCode::Enter => match app.commit_entry(db) {
                Ok(status) => {
                    app.screen = Screen::Dashboard;
                    app.set_status(status);
                }
                Err(e) => {
                    app.set_status(format!("{e}"));
                }
            },
            _ => {}
        },
    }
    Ok(())
}

fn handle_command_input(key: event::KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    match key.code {
        KeyCode::Enter => {
            let input = app.command_input.clone();
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
            commands::handle_command(&input, app, db)?;
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
        }
        KeyCode::Backspace => {
            app.command_input.pop();
            if app.command_input.is_empty() {
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char(c) => {
            app.command_input.push(c);
        }
        _ => {}
    }
    Ok(())
}

fn handle_search_input(key: event::KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    match key.code {
        KeyCode::Enter => {
            app.input_mode = InputMode::Normal;
            app.screen = Screen::Transactions;
            app.refresh_transactions(db)?;
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.search_input.clear();
            app.refresh_transactions(db)?;
        }
        KeyCode::Backspace => {
            app.search_input.pop();
            // Live search: filter as you type
            app.screen = Screen::Transactions;
            app.transaction_index = 0;
            app.transaction_scroll = 0;
            app.refresh_transactions(db)?;
        }
        KeyCode::Char(c) => {
            app.search_input.push(c);
            // Live search: filter as you type
            app.screen = Screen::Transactions;
            app.transaction_index = 0;
            app.transaction_scroll = 0;
            app.refresh_transactions(db)?;
        }
        _ => {}
    }
    Ok(())
}

fn handle_confirm_input(key: event::KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            if let Some(action) = app.pending_action.take() {
                match action {
                    PendingAction::DeleteTransaction { id, label } => {
                        db.delete_transaction(id)?;
                        app.refresh_dashboard(db)?;
                        if app.transaction_index > 0
                            && app.transaction_index >= app.transactions.len()
                        {
                            app.transaction_index = app.transactions.len().saturating_sub(1);
                        }
                        app.set_status(format!("Deleted: {label}"));
                    }
                    PendingAction::DeleteBudget { id, category } => {
                        db.delete_budget(id)?;
                        app.refresh_budgets(db)?;
                        app.refresh_dashboard(db)?;
                        if app.budget_index > 0 {
                            app.budget_index -= 1;
                        }
                        app.set_status(format!("Deleted budget: {category}"));
                    }
                }
            }
            app.input_mode = InputMode::Normal;
            app.confirm_message.clear();
        }
        _ => {
            // Any other key = cancel
            app.pending_action = None;
            app.input_mode = InputMode::Normal;
            app.confirm_message.clear();
            app.set_status("Cancelled");
        }
    }
    Ok(())
}

// ── Navigation helpers ───────────────────────────────────────

fn switch_screen(app: &mut App, db: &mut Database, screen: Screen) -> Result<()> {
    app.screen = screen;
    match screen {
        Screen::Dashboard => app.refresh_dashboard(db)?,
        Screen::Transactions => app.refresh_transactions(db)?,
        Screen::Entry => {
            app.reset_entry();
            app.refresh_profile(db)?;
        }
        Screen::Budgets => {
            app.refresh_budgets(db)?;
            app.refresh_dashboard(db)?;
        }
        Screen::Settings => app.refresh_profile(db)?,
    }
    Ok(())
}

fn handle_move_down(app: &mut App) {
    match app.screen {
        Screen::Transactions => scroll_down(
            &mut app.transaction_index,
            &mut app.transaction_scroll,
            app.transactions.len(),
            app.visible_rows,
        ),
        Screen::Budgets => scroll_down(
            &mut app.budget_index,
            &mut app.budget_scroll,
            app.budgets.len(),
            app.visible_rows,
        ),
        _ => {}
    }
}

fn handle_move_up(app: &mut App) {
    match app.screen {
        Screen::Transactions => scroll_up(&mut app.transaction_index, &mut app.transaction_scroll),
        Screen::Budgets => scroll_up(&mut app.budget_index, &mut app.budget_scroll),
        _ => {}
    }
}

fn handle_goto_top(app: &mut App) {
    match app.screen {
        Screen::Transactions => {
            scroll_to_top(&mut app.transaction_index, &mut app.transaction_scroll)
        }
        Screen::Budgets => scroll_to_top(&mut app.budget_index, &mut app.budget_scroll),
        _ => {}
    }
}

fn handle_goto_bottom(app: &mut App) {
    match app.screen {
        Screen::Transactions => scroll_to_bottom(
            &mut app.transaction_index,
            &mut app.transaction_scroll,
            app.transactions.len(),
            app.visible_rows,
        ),
        Screen::Budgets => scroll_to_bottom(
            &mut app.budget_index,
            &mut app.budget_scroll,
            app.budgets.len(),
            app.visible_rows,
        ),
        _ => {}
    }
}
