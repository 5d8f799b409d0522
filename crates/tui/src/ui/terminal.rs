use std::{
    io::{Stdout, stdout},
    panic,
};

use crossterm::{
    cursor::Show,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::error::Result;

pub type AppTerminal = Terminal<CrosstermBackend<Stdout>>;

/// Switches to raw mode on the alternate screen.
///
/// A panic hook puts the terminal back before the default hook prints, so a
/// crash never leaves the shell in raw mode.
pub fn setup_terminal() -> Result<AppTerminal> {
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        leave_screen();
        default_hook(info);
    }));

    enable_raw_mode()?;
    let mut out = stdout();
    if let Err(err) = crossterm::execute!(out, EnterAlternateScreen) {
        leave_screen();
        return Err(err.into());
    }
    let terminal = Terminal::new(CrosstermBackend::new(out))?;
    Ok(terminal)
}

pub fn restore_terminal(terminal: &mut AppTerminal) -> Result<()> {
    disable_raw_mode()?;
    crossterm::execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Best-effort restore used on failure paths, errors are ignored.
fn leave_screen() {
    let _ = disable_raw_mode();
    let _ = crossterm::execute!(stdout(), LeaveAlternateScreen, Show);
}
