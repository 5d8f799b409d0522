use engine::{Summary, money};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table},
};

use crate::{
    app::AppState,
    ui::{
        components::{
            card::{Card, StatCard},
            charts,
        },
        theme::{Theme, category_color},
    },
};

const BAR_WIDTH: usize = 16;

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let Some(summary) = &state.summary else {
        render_placeholder(frame, area, theme);
        return;
    };

    // Table on top, totals and chart side by side below it.
    let table_height = (summary.rows.len() as u16 + 3).min(area.height / 2).max(4);
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(table_height), Constraint::Min(0)])
        .split(area);
    render_table(frame, layout[0], state, summary, theme);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(layout[1]);
    render_totals(frame, bottom[0], summary, theme);

    let slices = summary.pie_slices(state.store.schema());
    charts::render_pie(frame, bottom[1], "Allocation", &slices, theme);
}

fn render_placeholder(frame: &mut Frame<'_>, area: Rect, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "No calculation yet.",
            Style::default().fg(theme.text_muted),
        )),
        Line::from(Span::styled(
            "Balance every row to 100% and press c on the Entries tab.",
            Style::default().fg(theme.dim),
        )),
    ];
    Card::new("Summary", theme).render_with(
        frame,
        area,
        Paragraph::new(text).alignment(Alignment::Center),
    );
}

fn render_table(
    frame: &mut Frame<'_>,
    area: Rect,
    state: &AppState,
    summary: &Summary,
    theme: &Theme,
) {
    let table = summary.table(state.store.schema());
    let header = Row::new(table.header.iter().cloned().map(Cell::from)).style(
        Style::default()
            .fg(theme.text_muted)
            .add_modifier(Modifier::BOLD),
    );

    let widths: Vec<Constraint> = table
        .header
        .iter()
        .enumerate()
        .map(|(i, title)| {
            let widest = table
                .rows
                .iter()
                .filter_map(|row| row.get(i))
                .map(|cell| cell.chars().count())
                .chain([title.chars().count()])
                .max()
                .unwrap_or(0);
            Constraint::Length(widest as u16)
        })
        .collect();

    let rows = table.rows.into_iter().map(|cells| {
        Row::new(cells.into_iter().map(Cell::from)).style(Style::default().fg(theme.text))
    });

    let widget = Table::new(rows, widths).header(header).column_spacing(2);
    Card::new("Breakdown", theme).render_with(frame, area, widget);
}

fn render_totals(frame: &mut Frame<'_>, area: Rect, summary: &Summary, theme: &Theme) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(0)])
        .split(area);

    let rows = summary.rows.len();
    StatCard::new("Total Amount", money::format_currency(summary.grand_total), theme)
        .caption(format!(
            "across {rows} {}",
            if rows == 1 { "row" } else { "rows" }
        ))
        .render(frame, layout[0]);

    let mut lines = Vec::with_capacity(summary.totals.len() * 2 + 1);
    let mut text_lines = summary.total_lines().into_iter();
    if let Some(first) = text_lines.next() {
        lines.push(Line::from(Span::styled(
            first,
            Style::default().fg(theme.text_muted),
        )));
    }
    for (line, total) in text_lines.zip(&summary.totals) {
        let color = category_color(total.color);
        lines.push(Line::from(Span::styled(line, Style::default().fg(theme.text))));
        lines.push(Line::from(vec![
            Span::styled(
                charts::share_bar(total.share, BAR_WIDTH),
                Style::default().fg(color),
            ),
            Span::styled(
                format!(" {}", money::format_share(total.share)),
                Style::default().fg(theme.dim),
            ),
        ]));
    }
    Card::new("Totals", theme).render_with(frame, layout[1], Paragraph::new(lines));
}
