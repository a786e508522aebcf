use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::ui::app::{App, EntryStep};
use crate::ui::theme;
use crate::ui::util::format_amount;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(5)])
        .split(area);

    render_step_indicator(f, chunks[0], app);

    match app.entry_step {
        EntryStep::Amount => render_amount(f, chunks[1], app),
        EntryStep::Category => render_category(f, chunks[1], app),
        EntryStep::Note => render_note(f, chunks[1], app),
        EntryStep::Confirm => render_confirm(f, chunks[1], app),
    }
}

fn render_step_indicator(f: &mut Frame, area: Rect, app: &App) {
    let steps = [
        (EntryStep::Amount, "1:Amount"),
        (EntryStep::Category, "2:Category"),
        (EntryStep::Note, "3:Note"),
        (EntryStep::Confirm, "4:Confirm"),
    ];
    let current_idx = steps
        .iter()
        .position(|(s, _)| *s == app.entry_step)
        .unwrap_or(0);

    let mut spans: Vec<Span> = Vec::new();
    spans.push(Span::styled(" ", Style::default().bg(theme::HEADER_BG)));
    for (i, (_, label)) in steps.iter().enumerate() {
        let style = if i == current_idx {
            Style::default()
                .fg(theme::HEADER_BG)
                .bg(theme::ACCENT)
                .add_modifier(Modifier::BOLD)
        } else if i < current_idx {
            Style::default().fg(theme::GREEN).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme::TEXT_DIM)
        };
        spans.push(Span::styled(format!(" {label} "), style));
        if i < steps.len() - 1 {
            let connector = if i < current_idx {
                Style::default().fg(theme::GREEN)
            } else {
                Style::default().fg(theme::TEXT_DIM)
            };
            spans.push(Span::styled(" > ", connector));
        }
    }

    let bar = Paragraph::new(Line::from(spans)).style(Style::default().bg(theme::HEADER_BG));
    f.render_widget(bar, area);
}

fn kind_span(app: &App) -> Span<'_> {
    let style = if app.entry_kind == crate::models::EntryKind::Income {
        theme::income_style().add_modifier(Modifier::BOLD)
    } else {
        theme::expense_style().add_modifier(Modifier::BOLD)
    };
    Span::styled(app.entry_kind.as_str(), style)
}

fn render_amount(f: &mut Frame, area: Rect, app: &App) {
    let amount_display = if app.entry_amount.is_empty() {
        Span::styled("0.00", theme::dim_style())
    } else {
        Span::styled(
            app.entry_amount.as_str(),
            Style::default()
                .fg(theme::TEXT)
                .add_modifier(Modifier::BOLD),
        )
    };

    let valid_hint = if !app.entry_amount.is_empty() && app.parsed_entry_amount().is_none() {
        Line::from(Span::styled(
            "Enter a positive number",
            Style::default().fg(theme::RED),
        ))
    } else {
        Line::from("")
    };

    let text = Paragraph::new(vec![
        Line::from(""),
        Line::from(vec![kind_span(app), Span::raw("  (Tab toggles)")]),
        Line::from(""),
        Line::from(vec![Span::raw("$ "), amount_display]),
        valid_hint,
        Line::from(""),
        Line::from(Span::styled(
            "Type the amount, Enter to continue, Esc to cancel",
            theme::dim_style(),
        )),
    ])
    .centered()
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme::border_style())
            .title(Span::styled(" New Entry — Amount ", theme::title_style())),
    );
    f.render_widget(text, area);
}

fn render_category(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5)])
        .split(area);

    let typed = Paragraph::new(Line::from(vec![
        Span::styled(" Custom: ", theme::dim_style()),
        Span::styled(
            if app.entry_category.is_empty() {
                "(type to enter your own)"
            } else {
                app.entry_category.as_str()
            },
            if app.entry_category.is_empty() {
                theme::dim_style()
            } else {
                Style::default().fg(theme::ACCENT)
            },
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme::border_style())
            .title(Span::styled(" New Entry — Category ", theme::title_style())),
    );
    f.render_widget(typed, chunks[0]);

    let options = app.entry_category_options();
    let items: Vec<ListItem> = options
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let style = if app.entry_category.is_empty() && i == app.entry_category_index {
                theme::selected_style()
            } else {
                theme::normal_style()
            };
            ListItem::new(Line::from(Span::styled(format!(" {name}"), style)))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme::border_style())
            .title(Span::styled(
                " Up/Down or type, Enter to continue, Esc to go back ",
                theme::dim_style(),
            )),
    );
    f.render_widget(list, chunks[1]);
}

fn render_note(f: &mut Frame, area: Rect, app: &App) {
    let note_display = if app.entry_note.is_empty() {
        Span::styled("(optional)", theme::dim_style())
    } else {
        Span::styled(app.entry_note.as_str(), theme::normal_style())
    };

    let text = Paragraph::new(vec![
        Line::from(""),
        Line::from(note_display),
        Line::from(""),
        Line::from(Span::styled(
            "Type a note, Enter to continue, Esc to go back",
            theme::dim_style(),
        )),
    ])
    .centered()
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme::border_style())
            .title(Span::styled(" New Entry — Note ", theme::title_style())),
    );
    f.render_widget(text, area);
}

fn render_confirm(f: &mut Frame, area: Rect, app: &App) {
    let amount = app
        .parsed_entry_amount()
        .map(format_amount)
        .unwrap_or_else(|| "?".into());

    let text = Paragraph::new(vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  Kind:     ", theme::dim_style()),
            kind_span(app),
        ]),
        Line::from(vec![
            Span::styled("  Amount:   ", theme::dim_style()),
            Span::styled(
                amount,
                Style::default()
                    .fg(theme::TEXT)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled("  Category: ", theme::dim_style()),
            Span::styled(app.selected_entry_category(), theme::normal_style()),
        ]),
        Line::from(vec![
            Span::styled("  Note:     ", theme::dim_style()),
            Span::styled(
                if app.entry_note.is_empty() {
                    "—"
                } else {
                    app.entry_note.as_str()
                },
                theme::normal_style(),
            ),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Enter to save, Esc to go back",
            theme::dim_style(),
        )),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme::border_style())
            .title(Span::styled(" New Entry — Confirm ", theme::title_style())),
    );
    f.render_widget(text, area);
}
