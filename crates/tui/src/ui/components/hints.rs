use ratatui::{style::Style, text::Span};

use crate::ui::theme::Theme;

/// A keyboard hint consisting of a key and its action.
#[derive(Debug, Clone)]
pub struct KeyHint {
    pub key: String,
    pub action: String,
    /// Disabled hints are shown greyed out.
    pub enabled: bool,
}

impl KeyHint {
    pub fn new(key: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            action: action.into(),
            enabled: true,
        }
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// Converts a list of key hints into styled spans for rendering.
pub fn hints_to_spans(hints: &[KeyHint], theme: &Theme) -> Vec<Span<'static>> {
    let mut spans = Vec::new();

    for (i, hint) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        let (key_color, action_color) = if hint.enabled {
            (theme.accent, theme.text)
        } else {
            (theme.dim, theme.dim)
        };
        spans.push(Span::styled(hint.key.clone(), Style::default().fg(key_color)));
        spans.push(Span::styled(
            format!(" {}", hint.action),
            Style::default().fg(action_color),
        ));
    }

    spans
}

/// Creates a separator span for dividing hint groups.
pub fn hint_separator(theme: &Theme) -> Span<'static> {
    Span::styled("  │  ", Style::default().fg(theme.border))
}

/// Hints for the form and summary screens.
pub mod common {
    use super::KeyHint;

    pub fn form_navigation() -> Vec<KeyHint> {
        vec![
            KeyHint::new("↑↓", "row"),
            KeyHint::new("Tab", "field"),
            KeyHint::new("Enter", "edit"),
        ]
    }

    pub fn form_editing() -> Vec<KeyHint> {
        vec![
            KeyHint::new("Tab", "next"),
            KeyHint::new("Enter", "save"),
            KeyHint::new("Esc", "cancel"),
        ]
    }

    /// Row management; `d` is greyed out when only one row is left.
    pub fn row_operations(can_delete: bool) -> Vec<KeyHint> {
        vec![
            KeyHint::new("a", "add row"),
            KeyHint::new("d", "delete row").enabled(can_delete),
        ]
    }

    pub fn calculate(valid: bool) -> KeyHint {
        KeyHint::new("c", "calculate").enabled(valid)
    }
}
