use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Row, Table, TableState},
};

use crate::{
    app::{AppState, Column},
    ui::{components::card::Card, theme::Theme},
};

/// The editable form: one row per entry, one column per field, and a
/// read-only `Sum` column that turns red until the splits reach 100%.
pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let schema = state.store.schema();
    let card = Card::new("Entries", theme).focused(state.entries.editing.is_some());
    let inner = card.inner(area);
    card.render_frame(frame, area);

    let mut header = vec![
        Cell::from(schema.entry_label().to_string()),
        Cell::from("Amount"),
    ];
    header.extend(schema.category_names().map(|name| Cell::from(format!("{name} %"))));
    header.push(Cell::from("Sum"));
    let header = Row::new(header).style(
        Style::default()
            .fg(theme.text_muted)
            .add_modifier(Modifier::BOLD),
    );

    let selected = state.selected_row();
    let columns = 2 + schema.len();
    let rows = (0..state.store.len()).map(|row| {
        let mut cells: Vec<Cell> = (0..columns)
            .map(|index| {
                let column = Column::from_index(index);
                let focused = row == selected && column == state.entries.column;
                cell(state, row, column, focused, theme)
            })
            .collect();

        let sum = state.store.get(row).map_or(0, |entry| entry.split_sum());
        let sum_color = if sum == 100 { theme.positive } else { theme.error };
        cells.push(Cell::from(Span::styled(
            format!("{sum}%"),
            Style::default().fg(sum_color),
        )));
        Row::new(cells)
    });

    let mut widths = vec![Constraint::Min(12), Constraint::Length(14)];
    widths.extend(
        schema
            .category_names()
            .map(|name| Constraint::Length((name.chars().count() as u16 + 3).max(6))),
    );
    widths.push(Constraint::Length(6));

    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(2)
        .row_highlight_style(Style::default().bg(theme.background));

    let mut table_state = TableState::default().with_selected(Some(selected));
    frame.render_stateful_widget(table, inner, &mut table_state);
}

fn cell<'a>(
    state: &AppState,
    row: usize,
    column: Column,
    focused: bool,
    theme: &Theme,
) -> Cell<'a> {
    if let Some(buffer) = state.entries.editing.as_ref().filter(|_| focused) {
        return Cell::from(Line::from(vec![
            Span::styled(buffer.clone(), Style::default().fg(theme.text)),
            Span::styled("│", Style::default().fg(theme.accent)),
        ]));
    }

    let text = state.cell_text(row, column);
    let style = if focused {
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::REVERSED)
    } else {
        Style::default().fg(theme.text)
    };
    if text.is_empty() && column == Column::Label {
        let placeholder = Style::default().fg(theme.dim);
        return Cell::from(Span::styled(
            "(unnamed)",
            if focused { style } else { placeholder },
        ));
    }
    Cell::from(Span::styled(text, style))
}
