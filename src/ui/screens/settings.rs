use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::format_amount;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let Some(profile) = &app.profile else {
        render_welcome(f, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(9), Constraint::Length(6)])
        .split(area);

    render_profile(f, chunks[0], app, profile);
    render_endpoints(f, chunks[1], app);
}

fn field<'a>(label: &'a str, value: Span<'a>) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("  {label:<16}"), theme::dim_style()),
        value,
    ])
}

fn render_profile(f: &mut Frame, area: Rect, app: &App, profile: &crate::models::Profile) {
    let key_display = match &profile.notify_key {
        Some(_) => Span::styled("set (:key clear to remove)", theme::income_style()),
        None => Span::styled("not set (:key <key>)", theme::dim_style()),
    };

    let lines = vec![
        Line::from(""),
        field(
            "Name",
            Span::styled(
                profile.display_name.as_str(),
                Style::default()
                    .fg(theme::TEXT)
                    .add_modifier(Modifier::BOLD),
            ),
        ),
        field(
            "Monthly income",
            Span::styled(format_amount(profile.monthly_income), theme::normal_style()),
        ),
        field(
            "Savings goal",
            Span::styled(format_amount(profile.savings_goal), theme::normal_style()),
        ),
        field("Notify key", key_display),
        Line::from(""),
        field(
            "Categories",
            Span::styled(profile.categories.join(", "), theme::normal_style()),
        ),
        Line::from(""),
        Line::from(Span::styled(
            "  Edit with :name, :income, :goal, :key, :category, :delete-category",
            theme::dim_style(),
        )),
        Line::from(Span::styled(
            format!("  {} entries in the ledger", app.transaction_count),
            theme::dim_style(),
        )),
    ];

    let panel = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme::border_style())
            .title(Span::styled(" Profile ", theme::title_style())),
    );
    f.render_widget(panel, area);
}

fn render_endpoints(f: &mut Frame, area: Rect, app: &App) {
    let configured = |set: bool| {
        if set {
            Span::styled("configured", theme::income_style())
        } else {
            Span::styled("not configured", theme::dim_style())
        }
    };

    let lines = vec![
        field("Sheet endpoint", configured(app.settings.sheet_url.is_some())),
        field("Push provider", configured(app.settings.push_url.is_some())),
        field(
            "Fetch cache",
            Span::styled(
                format!("{}s", app.settings.cache_ttl_secs),
                theme::normal_style(),
            ),
        ),
        Line::from(Span::styled(
            "  Endpoints live in settings.json in the config directory",
            theme::dim_style(),
        )),
    ];

    let panel = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme::border_style())
            .title(Span::styled(" Endpoints ", theme::title_style())),
    );
    f.render_widget(panel, area);
}

fn render_welcome(f: &mut Frame, area: Rect) {
    let msg = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "Welcome to piggybank!",
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "No profile yet. Create one to get started:",
            theme::normal_style(),
        )),
        Line::from(""),
        Line::from(Span::styled("    :name <your name>", theme::income_style())),
        Line::from(""),
        Line::from(Span::styled(
            "Then set :income and :goal, and add categories with :category",
            theme::dim_style(),
        )),
    ])
    .centered()
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme::border_style())
            .title(Span::styled(" Setup ", theme::title_style())),
    );
    f.render_widget(msg, area);
}
