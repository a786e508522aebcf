use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph},
    Frame,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, progress_bar, truncate, usage_ratio};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Summary cards
            Constraint::Min(10),   // Category chart
            Constraint::Length(3), // Overall budget gauge
        ])
        .split(area);

    render_summary_cards(f, chunks[0], app);
    render_spending_chart(f, chunks[1], app);
    render_budget_gauge(f, chunks[2], app);
}

fn render_summary_cards(f: &mut Frame, area: Rect, app: &App) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    let remaining = app.scaled_budget - app.summary.spent;
    let expense_count = app.transactions.iter().filter(|t| t.is_expense()).count();
    let income_count = app.transactions.iter().filter(|t| t.is_income()).count();

    render_card(
        f,
        cards[0],
        "Spent",
        app.summary.spent,
        theme::RED,
        Some(format!("{expense_count} entries")),
    );
    render_card(
        f,
        cards[1],
        "Budget",
        app.scaled_budget,
        theme::TEAL,
        Some(format!("scaled to {}", app.range.label().to_lowercase())),
    );
    render_card(
        f,
        cards[2],
        "Remaining",
        remaining,
        if remaining >= Decimal::ZERO {
            theme::GREEN
        } else {
            theme::RED
        },
        None,
    );
    render_card(
        f,
        cards[3],
        "Income",
        app.summary.income,
        theme::GREEN,
        Some(format!("{income_count} entries")),
    );
}

fn render_card(
    f: &mut Frame,
    area: Rect,
    title: &str,
    amount: Decimal,
    color: ratatui::style::Color,
    subtitle: Option<String>,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::border_style())
        .title(Span::styled(format!(" {title} "), theme::title_style()));

    let text = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            format_amount(amount),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(subtitle.unwrap_or_default(), theme::dim_style())),
    ])
    .centered()
    .block(block);

    f.render_widget(text, area);
}

fn render_spending_chart(f: &mut Frame, area: Rect, app: &App) {
    let title = format!(" Spending by Category — {} ", app.range.label());

    if app.summary.by_category.is_empty() {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme::border_style())
            .title(Span::styled(title, theme::title_style()));
        let msg = Paragraph::new(Line::from(Span::styled(
            "No expenses in this range. Add one with :e, or pull the sheet with :sync",
            theme::dim_style(),
        )))
        .centered()
        .block(block);
        f.render_widget(msg, area);
        return;
    }

    let bars: Vec<Bar> = app
        .summary
        .by_category
        .iter()
        .take(12)
        .map(|(name, amt)| {
            Bar::default()
                .value(amt.to_u64().unwrap_or(0))
                .label(Line::from(truncate(name, 10)))
                .style(Style::default().fg(theme::ACCENT))
                .value_style(
                    Style::default()
                        .fg(theme::TEXT)
                        .add_modifier(Modifier::BOLD),
                )
        })
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme::border_style())
                .title(Span::styled(title, theme::title_style())),
        )
        .data(BarGroup::default().bars(&bars))
        .bar_width(10)
        .bar_gap(1)
        .bar_style(Style::default().fg(theme::ACCENT))
        .value_style(Style::default().fg(theme::TEXT));

    f.render_widget(chart, area);
}

fn render_budget_gauge(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::border_style())
        .title(Span::styled(" Budget Usage ", theme::title_style()));

    let line = if app.scaled_budget <= Decimal::ZERO {
        Line::from(Span::styled(
            "No budgets set — create one with :budget <category> <amount>",
            theme::dim_style(),
        ))
    } else {
        let ratio = usage_ratio(app.summary.spent, app.scaled_budget);
        let bar_width = (area.width as usize).saturating_sub(30).max(10);
        Line::from(vec![
            Span::styled(
                progress_bar(ratio, bar_width),
                Style::default().fg(theme::usage_color(ratio)),
            ),
            Span::styled(
                format!(
                    " {} / {} ({:.0}%)",
                    format_amount(app.summary.spent),
                    format_amount(app.scaled_budget),
                    ratio * 100.0
                ),
                theme::normal_style(),
            ),
        ])
    };

    f.render_widget(Paragraph::new(line).block(block), area);
}
