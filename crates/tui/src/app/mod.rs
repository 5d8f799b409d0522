use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use engine::{EngineError, EntryId, Field, RemoveOutcome, RowStore, Summary, money};

use crate::{
    config::AppConfig,
    error::{AppError, Result},
    ui::{
        self,
        keymap::{AppAction, map_key},
    },
};

const TOAST_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Entries,
    Summary,
}

impl Section {
    pub fn label(self) -> &'static str {
        match self {
            Self::Entries => "Entries",
            Self::Summary => "Summary",
        }
    }
}

/// Focused column of the entries form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Label,
    Amount,
    Split(usize),
}

impl Column {
    fn index(self) -> usize {
        match self {
            Self::Label => 0,
            Self::Amount => 1,
            Self::Split(category) => 2 + category,
        }
    }

    pub fn from_index(index: usize) -> Self {
        match index {
            0 => Self::Label,
            1 => Self::Amount,
            n => Self::Split(n - 2),
        }
    }

    fn is_numeric(self) -> bool {
        !matches!(self, Self::Label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct ToastState {
    pub message: String,
    pub level: ToastLevel,
    shown_at: Instant,
}

/// Cursor of the entries form.
///
/// The focused row is tracked by id, not by position, so it stays on the same
/// entry when rows before it are deleted.
#[derive(Debug)]
pub struct EntriesState {
    pub focus: EntryId,
    pub column: Column,
    /// Edit buffer while a cell is being edited.
    pub editing: Option<String>,
}

#[derive(Debug)]
pub struct AppState {
    pub section: Section,
    pub preset: String,
    pub store: RowStore,
    pub entries: EntriesState,
    /// Result of the last calculation; dropped on the next edit.
    pub summary: Option<Summary>,
    pub calculated_at: Option<DateTime<Local>>,
    pub toast: Option<ToastState>,
}

impl AppState {
    pub fn new(store: RowStore, preset: impl Into<String>) -> Self {
        let focus = store
            .entries()
            .first()
            .map(|entry| entry.id)
            .unwrap_or_default();
        Self {
            section: Section::Entries,
            preset: preset.into(),
            store,
            entries: EntriesState {
                focus,
                column: Column::Label,
                editing: None,
            },
            summary: None,
            calculated_at: None,
            toast: None,
        }
    }

    /// Position of the focused entry.
    pub fn selected_row(&self) -> usize {
        self.store.position(self.entries.focus).unwrap_or(0)
    }

    fn column_count(&self) -> usize {
        2 + self.store.schema().len()
    }

    /// Text shown for a cell when it is not being edited.
    pub fn cell_text(&self, row: usize, column: Column) -> String {
        let Some(entry) = self.store.get(row) else {
            return String::new();
        };
        match column {
            Column::Label => entry.label.clone(),
            Column::Amount => money::format_plain(entry.amount()),
            Column::Split(category) => entry
                .split(category)
                .map(|v| v.to_string())
                .unwrap_or_default(),
        }
    }

    fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(ToastState {
            message: message.into(),
            level,
            shown_at: Instant::now(),
        });
    }

    fn expire_toast(&mut self, now: Instant) {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| now.duration_since(toast.shown_at) >= TOAST_TTL)
        {
            self.toast = None;
        }
    }
}

pub struct App {
    pub state: AppState,
    should_quit: bool,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self> {
        let schema = config.schema()?;
        let store = RowStore::new(schema);
        Ok(Self {
            state: AppState::new(store, config.preset),
            should_quit: false,
        })
    }

    pub fn run(&mut self) -> Result<()> {
        let mut terminal = ui::setup_terminal()?;
        let result = self.event_loop(&mut terminal);
        ui::restore_terminal(&mut terminal)?;
        result
    }

    fn event_loop(&mut self, terminal: &mut ui::Terminal) -> Result<()> {
        let tick_rate = Duration::from_millis(200);

        while !self.should_quit {
            terminal
                .draw(|frame| ui::render(frame, &self.state))
                .map_err(|err| AppError::Terminal(err.to_string()))?;

            if event::poll(tick_rate)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
                    Event::Resize(_, _) => {}
                    _ => {}
                }
            }
            self.state.expire_toast(Instant::now());
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        self.apply(map_key(key));
    }

    pub fn apply(&mut self, action: AppAction) {
        if action == AppAction::Quit {
            self.should_quit = true;
            return;
        }
        if self.state.entries.editing.is_some() {
            self.apply_editing(action);
            return;
        }
        match self.state.section {
            Section::Entries => self.apply_entries(action),
            Section::Summary => self.apply_summary(action),
        }
    }

    fn apply_editing(&mut self, action: AppAction) {
        match action {
            AppAction::Input(ch) => {
                if let Some(buffer) = self.state.entries.editing.as_mut() {
                    buffer.push(ch);
                }
            }
            AppAction::Backspace => {
                if let Some(buffer) = self.state.entries.editing.as_mut() {
                    buffer.pop();
                }
            }
            AppAction::Submit => self.commit_edit(),
            AppAction::NextField => {
                self.commit_edit();
                self.next_field();
            }
            AppAction::PrevField => {
                self.commit_edit();
                self.move_column(false);
            }
            AppAction::Cancel => self.state.entries.editing = None,
            _ => {}
        }
    }

    fn apply_entries(&mut self, action: AppAction) {
        match action {
            AppAction::Up | AppAction::Input('k') => self.move_row(false),
            AppAction::Down | AppAction::Input('j') => self.move_row(true),
            AppAction::Left | AppAction::PrevField => self.move_column(false),
            AppAction::Right => self.move_column(true),
            AppAction::NextField => self.next_field(),
            AppAction::Submit => self.begin_edit(None),
            AppAction::Input(ch) => match ch {
                'a' => self.add_row(),
                'd' => self.delete_row(),
                'c' => self.calculate(),
                's' => self.state.section = Section::Summary,
                'e' => self.state.section = Section::Entries,
                'q' => self.should_quit = true,
                ch if self.state.entries.column.is_numeric()
                    && (ch.is_ascii_digit() || ch == '.') =>
                {
                    self.begin_edit(Some(ch));
                }
                _ => {}
            },
            _ => {}
        }
    }

    fn apply_summary(&mut self, action: AppAction) {
        match action {
            AppAction::Cancel | AppAction::Input('e') => self.state.section = Section::Entries,
            AppAction::Input('c') => self.calculate(),
            AppAction::Input('q') => self.should_quit = true,
            _ => {}
        }
    }

    fn move_row(&mut self, down: bool) {
        let current = self.state.selected_row();
        let last = self.state.store.len().saturating_sub(1);
        let next = if down {
            (current + 1).min(last)
        } else {
            current.saturating_sub(1)
        };
        if let Some(entry) = self.state.store.get(next) {
            self.state.entries.focus = entry.id;
        }
    }

    fn move_column(&mut self, right: bool) {
        let current = self.state.entries.column.index();
        let last = self.state.column_count() - 1;
        let next = if right {
            (current + 1).min(last)
        } else {
            current.saturating_sub(1)
        };
        self.state.entries.column = Column::from_index(next);
    }

    /// Tab order: left to right, then the first column of the next row.
    fn next_field(&mut self) {
        let current = self.state.entries.column.index();
        if current + 1 < self.state.column_count() {
            self.state.entries.column = Column::from_index(current + 1);
        } else if self.state.selected_row() + 1 < self.state.store.len() {
            self.state.entries.column = Column::Label;
            self.move_row(true);
        }
    }

    fn begin_edit(&mut self, first: Option<char>) {
        let buffer = match first {
            Some(ch) => ch.to_string(),
            None => self
                .state
                .cell_text(self.state.selected_row(), self.state.entries.column),
        };
        self.state.entries.editing = Some(buffer);
    }

    fn commit_edit(&mut self) {
        let Some(buffer) = self.state.entries.editing.take() else {
            return;
        };
        let field = match self.state.entries.column {
            Column::Label => Field::Label(buffer.trim().to_string()),
            Column::Amount => match money::parse_amount(&buffer) {
                Ok(amount) if amount >= 0.0 => Field::Amount(amount),
                Ok(amount) => {
                    tracing::warn!(amount, "negative amount coerced to zero");
                    self.state
                        .show_toast(ToastLevel::Info, "Amounts cannot be negative, set to $0.00.");
                    Field::Amount(0.0)
                }
                Err(err) => {
                    tracing::warn!("malformed amount {buffer:?}: {err}");
                    self.state
                        .show_toast(ToastLevel::Info, format!("{err}, set to $0.00."));
                    Field::Amount(0.0)
                }
            },
            Column::Split(category) => match money::parse_percent(&buffer) {
                Ok(percent) => Field::Split {
                    category,
                    percent: i64::from(percent),
                },
                Err(err) => {
                    tracing::warn!("malformed percentage {buffer:?}: {err}");
                    self.state
                        .show_toast(ToastLevel::Info, format!("{err}, set to 0%."));
                    Field::Split {
                        category,
                        percent: 0,
                    }
                }
            },
        };

        let index = self.state.selected_row();
        match self.state.store.update_field(index, field) {
            Ok(()) => self.discard_summary(),
            Err(err) => self.report(err),
        }
    }

    fn add_row(&mut self) {
        let id = self.state.store.add_row();
        self.state.entries.focus = id;
        self.state.entries.column = Column::Label;
        self.discard_summary();
    }

    fn delete_row(&mut self) {
        let index = self.state.selected_row();
        match self.state.store.remove_row(index) {
            Ok(RemoveOutcome::Removed(entry)) => {
                let next = index.min(self.state.store.len().saturating_sub(1));
                if let Some(entry) = self.state.store.get(next) {
                    self.state.entries.focus = entry.id;
                }
                let name = if entry.label.is_empty() {
                    format!("row {}", index + 1)
                } else {
                    entry.label
                };
                self.state
                    .show_toast(ToastLevel::Info, format!("Removed {name}."));
                self.discard_summary();
            }
            Ok(RemoveOutcome::KeptLastRow) => {
                self.state
                    .show_toast(ToastLevel::Info, "Cannot delete the last row.");
            }
            Err(err) => self.report(err),
        }
    }

    fn calculate(&mut self) {
        match self.state.store.calculate() {
            Ok(summary) => {
                tracing::info!(
                    rows = summary.rows.len(),
                    grand_total = summary.grand_total,
                    "calculation complete"
                );
                self.state.summary = Some(summary);
                self.state.calculated_at = Some(Local::now());
                self.state.section = Section::Summary;
                self.state
                    .show_toast(ToastLevel::Success, "Calculation complete!");
            }
            Err(EngineError::InvalidSplits { row, sum }) => {
                self.state.show_toast(
                    ToastLevel::Error,
                    format!("Row {} splits sum to {sum}%, they must sum to 100%.", row + 1),
                );
            }
            Err(err) => self.report(err),
        }
    }

    fn discard_summary(&mut self) {
        if self.state.summary.take().is_some() {
            tracing::debug!("summary discarded after edit");
        }
        self.state.calculated_at = None;
    }

    fn report(&mut self, err: EngineError) {
        tracing::error!("{err}");
        self.state.show_toast(ToastLevel::Error, err.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::new(AppConfig::default()).unwrap()
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            app.apply(AppAction::Input(ch));
        }
    }

    /// Empties the edit buffer with Backspace, one key per character.
    fn clear_buffer(app: &mut App) {
        let filled = app
            .state
            .entries
            .editing
            .as_ref()
            .map_or(0, |buffer| buffer.chars().count());
        for _ in 0..filled {
            app.apply(AppAction::Backspace);
        }
    }

    /// Edits the focused cell: Enter, clear, type, Enter.
    fn edit_cell(app: &mut App, text: &str) {
        app.apply(AppAction::Submit);
        clear_buffer(app);
        type_text(app, text);
        app.apply(AppAction::Submit);
    }

    fn toast(app: &App) -> Option<&str> {
        app.state.toast.as_ref().map(|t| t.message.as_str())
    }

    #[test]
    fn label_editing_captures_command_keys() {
        let mut app = app();
        edit_cell(&mut app, "quick ad");
        assert!(!app.should_quit);
        assert_eq!(app.state.store.entries()[0].label, "quick ad");
        assert_eq!(app.state.store.len(), 1);
    }

    #[test]
    fn escape_discards_the_edit() {
        let mut app = app();
        app.apply(AppAction::Submit);
        type_text(&mut app, "draft");
        app.apply(AppAction::Cancel);
        assert!(app.state.entries.editing.is_none());
        assert_eq!(app.state.store.entries()[0].label, "");
    }

    #[test]
    fn backspace_clears_a_prefilled_cell() {
        let mut app = app();
        app.state.entries.column = Column::Split(0);
        app.apply(AppAction::Submit);
        assert_eq!(app.state.entries.editing.as_deref(), Some("34"));

        app.apply(AppAction::Backspace);
        app.apply(AppAction::Backspace);
        app.apply(AppAction::Backspace);
        assert_eq!(app.state.entries.editing.as_deref(), Some(""));

        type_text(&mut app, "5");
        app.apply(AppAction::Submit);
        assert_eq!(app.state.store.entries()[0].split(0), Some(5));
        assert!(app.state.entries.editing.is_none());
    }

    #[test]
    fn digits_start_editing_numeric_cells() {
        let mut app = app();
        app.apply(AppAction::Right);
        type_text(&mut app, "250.5");
        app.apply(AppAction::Submit);
        assert_eq!(app.state.store.entries()[0].amount(), 250.5);
    }

    #[test]
    fn malformed_amount_becomes_zero() {
        let mut app = app();
        app.apply(AppAction::Right);
        edit_cell(&mut app, "12");
        edit_cell(&mut app, "lots");
        assert_eq!(app.state.store.entries()[0].amount(), 0.0);
        assert!(toast(&app).is_some_and(|m| m.ends_with("set to $0.00.")));
    }

    #[test]
    fn percentages_are_clamped_on_entry() {
        let mut app = app();
        app.state.entries.column = Column::Split(0);
        edit_cell(&mut app, "180");
        assert_eq!(app.state.store.entries()[0].split(0), Some(100));
    }

    #[test]
    fn tab_wraps_to_next_row() {
        let mut app = app();
        app.apply(AppAction::Input('a'));
        app.apply(AppAction::Up);
        app.state.entries.column = Column::Split(2);
        app.apply(AppAction::NextField);
        assert_eq!(app.state.selected_row(), 1);
        assert_eq!(app.state.entries.column, Column::Label);
    }

    #[test]
    fn last_row_is_never_deleted() {
        let mut app = app();
        app.apply(AppAction::Input('d'));
        assert_eq!(app.state.store.len(), 1);
        assert_eq!(toast(&app), Some("Cannot delete the last row."));
    }

    #[test]
    fn focus_follows_entry_identity() {
        let mut app = app();
        app.apply(AppAction::Input('a'));
        app.apply(AppAction::Input('a'));
        let third = app.state.entries.focus;

        app.apply(AppAction::Up);
        let second = app.state.entries.focus;
        app.apply(AppAction::Input('d'));

        assert_eq!(app.state.store.position(second), None);
        assert_eq!(app.state.entries.focus, third);
        assert_eq!(app.state.selected_row(), 1);
    }

    #[test]
    fn invalid_rows_block_calculation() {
        let mut app = app();
        for (category, value) in ["30", "30", "30"].iter().enumerate() {
            app.state.entries.column = Column::Split(category);
            edit_cell(&mut app, value);
        }
        app.apply(AppAction::Input('c'));

        assert!(app.state.summary.is_none());
        assert_eq!(app.state.section, Section::Entries);
        assert_eq!(
            toast(&app),
            Some("Row 1 splits sum to 90%, they must sum to 100%.")
        );
    }

    #[test]
    fn calculate_shows_summary_and_edits_discard_it() {
        let mut app = app();
        edit_cell(&mut app, "A");
        app.apply(AppAction::Right);
        edit_cell(&mut app, "100");
        app.apply(AppAction::Input('c'));

        let summary = app.state.summary.as_ref().unwrap();
        assert_eq!(summary.grand_total, 100.0);
        assert_eq!(app.state.section, Section::Summary);
        assert_eq!(toast(&app), Some("Calculation complete!"));
        assert!(app.state.calculated_at.is_some());

        app.apply(AppAction::Input('e'));
        edit_cell(&mut app, "200");
        assert!(app.state.summary.is_none());
    }

    #[test]
    fn quit_keys() {
        let mut ctrl_c = app();
        ctrl_c.apply(AppAction::Quit);
        assert!(ctrl_c.should_quit);

        let mut plain_q = app();
        plain_q.apply(AppAction::Input('q'));
        assert!(plain_q.should_quit);
    }

    #[test]
    fn toasts_expire() {
        let mut app = app();
        app.apply(AppAction::Input('d'));
        let shown_at = app.state.toast.as_ref().unwrap().shown_at;
        app.state.expire_toast(shown_at + Duration::from_secs(1));
        assert!(app.state.toast.is_some());
        app.state.expire_toast(shown_at + TOAST_TTL);
        assert!(app.state.toast.is_none());
    }
}
