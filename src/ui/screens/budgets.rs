use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};
use rust_decimal::Decimal;

use crate::report;
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, progress_bar, truncate, usage_ratio};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    if app.budgets.is_empty() {
        render_empty(f, area);
        return;
    }

    let items: Vec<ListItem> = app
        .budgets
        .iter()
        .enumerate()
        .skip(app.budget_scroll)
        .take(area.height.saturating_sub(2) as usize)
        .map(|(i, budget)| {
            // Limits scale to the active range so the bars compare like
            // with like against the window's spend.
            let limit = report::scale_budget(budget.monthly_limit, app.range, &app.all_transactions);
            let spent = app
                .summary
                .by_category
                .iter()
                .find(|(name, _)| name == &budget.category)
                .map(|(_, amt)| *amt)
                .unwrap_or(Decimal::ZERO);

            let ratio = usage_ratio(spent, limit);
            let color = theme::usage_color(ratio);

            let style = if i == app.budget_index {
                theme::selected_style()
            } else if i % 2 == 0 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };

            ListItem::new(Line::from(vec![
                Span::styled(format!("{:<18}", truncate(&budget.category, 17)), style),
                Span::styled(
                    format!("{}/{} ", format_amount(spent), format_amount(limit)),
                    Style::default().fg(color),
                ),
                Span::styled(progress_bar(ratio, 20), Style::default().fg(color)),
                Span::styled(
                    format!(" {:.0}%", ratio * 100.0),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
            ]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme::border_style())
            .title(Span::styled(
                format!(" Budgets — {} ", app.range.label()),
                theme::title_style(),
            )),
    );
    f.render_widget(list, area);
}

fn render_empty(f: &mut Frame, area: Rect) {
    let msg = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("No budgets yet", theme::dim_style())),
        Line::from(""),
        Line::from(Span::styled(
            "Use :budget <category> <amount> to set a monthly limit",
            theme::dim_style(),
        )),
    ])
    .centered()
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme::border_style())
            .title(Span::styled(" Budgets ", theme::title_style())),
    );
    f.render_widget(msg, area);
}
