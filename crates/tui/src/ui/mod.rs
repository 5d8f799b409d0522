pub mod components;
pub mod keymap;
pub mod screens;

mod terminal;
mod theme;

use engine::Validation;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::{AppState, Section};
use components::hints::{self, KeyHint, common};
use theme::Theme;

pub use terminal::{AppTerminal as Terminal, restore_terminal, setup_terminal};

pub fn render(frame: &mut Frame<'_>, state: &AppState) {
    let area = frame.area();
    let theme = Theme::default();

    // Main layout: info bar, tabs, content, warning, bottom bar
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Info bar
            Constraint::Length(2), // Tab bar
            Constraint::Min(0),    // Main content
            Constraint::Length(1), // Validation warning
            Constraint::Length(1), // Bottom bar
        ])
        .split(area);

    render_info_bar(frame, layout[0], state, &theme);
    components::tabs::render_tabs(
        frame,
        layout[1],
        state.section,
        state.summary.is_some(),
        &theme,
    );

    match state.section {
        Section::Entries => screens::entries::render(frame, layout[2], state, &theme),
        Section::Summary => screens::summary::render(frame, layout[2], state, &theme),
    }

    render_warning(frame, layout[3], state, &theme);
    render_bottom_bar(frame, layout[4], state, &theme);
    components::toast::render(frame, area, state.toast.as_ref());
}

fn render_info_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let calculated = state
        .calculated_at
        .map(|dt| dt.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string());
    let (status, status_style) = if state.store.validate().is_valid() {
        ("READY", Style::default().fg(theme.positive))
    } else {
        ("UNBALANCED", Style::default().fg(theme.warning))
    };

    let line = Line::from(vec![
        Span::styled("Preset", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {}  ", state.preset)),
        Span::styled("Rows", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {}  ", state.store.len())),
        Span::styled("Calculated", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {calculated}  ")),
        Span::styled(status, status_style.add_modifier(Modifier::BOLD)),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

/// Names the first unbalanced row while the entries screen is shown.
fn render_warning(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    if state.section != Section::Entries {
        return;
    }
    let Validation::Invalid { index, sum, .. } = state.store.validate() else {
        return;
    };
    let others = state.store.invalid_rows().len().saturating_sub(1);
    let mut message = format!(
        " Each row's splits must sum to 100%. Row {} sums to {sum}%.",
        index + 1
    );
    if others > 0 {
        message.push_str(&format!(" ({others} more)"));
    }
    frame.render_widget(
        Paragraph::new(Span::styled(message, Style::default().fg(theme.warning))),
        area,
    );
}

fn render_bottom_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let mut parts = components::tabs::tab_shortcuts(theme);

    let context = context_hints(state);
    if !context.is_empty() {
        parts.push(hints::hint_separator(theme));
        parts.extend(hints::hints_to_spans(&context, theme));
    }

    parts.push(hints::hint_separator(theme));
    parts.extend(hints::hints_to_spans(&[KeyHint::new("q", "quit")], theme));

    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}

fn context_hints(state: &AppState) -> Vec<KeyHint> {
    if state.entries.editing.is_some() {
        return common::form_editing();
    }
    let valid = state.store.validate().is_valid();
    match state.section {
        Section::Entries => {
            let mut hints = common::form_navigation();
            hints.extend(common::row_operations(state.store.len() > 1));
            hints.push(common::calculate(valid));
            hints
        }
        Section::Summary => vec![
            KeyHint::new("Esc", "back"),
            KeyHint::new("c", "recalculate").enabled(valid),
        ],
    }
}
