use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    if app.transactions.is_empty() {
        render_empty(f, area, app);
        return;
    }

    let header_cells = ["Date", "Category", "Note", "Amount"]
        .iter()
        .map(|h| Cell::from(*h).style(theme::header_style()));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = app
        .transactions
        .iter()
        .enumerate()
        .skip(app.transaction_scroll)
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, txn)| {
            let amount_style = if txn.is_income() {
                theme::income_style()
            } else {
                theme::expense_style()
            };
            let amount_str = if txn.is_income() {
                format!("+{}", format_amount(txn.amount))
            } else {
                format_amount(txn.signed())
            };

            let style = if i == app.transaction_index {
                theme::selected_style()
            } else if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };

            Row::new(vec![
                Cell::from(format!("  {}", txn.date)),
                Cell::from(truncate(&txn.category, 18)),
                Cell::from(truncate(&txn.note, 40)),
                Cell::from(Span::styled(amount_str, amount_style)),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(14),
        Constraint::Length(20),
        Constraint::Min(20),
        Constraint::Length(14),
    ];

    let search_note = if app.search_input.is_empty() {
        String::new()
    } else {
        format!("search: '{}' ", app.search_input)
    };
    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme::border_style())
            .title(Span::styled(
                format!(
                    " Transactions ({}) — {} {}",
                    app.transactions.len(),
                    app.range.label(),
                    search_note
                ),
                theme::title_style(),
            )),
    );

    f.render_widget(table, area);
}

fn render_empty(f: &mut Frame, area: Rect, app: &App) {
    let msg = if !app.search_input.is_empty() {
        vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("No transactions matching '{}'", app.search_input),
                theme::dim_style(),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Press Esc to clear the search",
                theme::dim_style(),
            )),
        ]
    } else {
        vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("No transactions for {}", app.range.label().to_lowercase()),
                theme::dim_style(),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Add one with :e, or pull the sheet with :sync",
                theme::dim_style(),
            )),
        ]
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(" Transactions (0) ", theme::title_style()));
    f.render_widget(Paragraph::new(msg).centered().block(block), area);
}
