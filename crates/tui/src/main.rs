mod app;
mod config;
mod error;
mod ui;

use std::{fs::OpenOptions, sync::Mutex};

use crate::{config::AppConfig, error::Result};

fn main() -> Result<()> {
    let config = config::load()?;
    init_tracing(&config)?;

    tracing::info!(preset = %config.preset, "starting allocation form");
    let mut app = app::App::new(config)?;
    let result = app.run();
    match &result {
        Ok(()) => tracing::info!("session ended"),
        Err(err) => tracing::error!("session aborted: {err}"),
    }
    result
}

/// Logs go to a file: stdout belongs to the terminal UI.
fn init_tracing(config: &AppConfig) -> Result<()> {
    let Some(path) = config.log_file.as_deref() else {
        return Ok(());
    };
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "allocation_tui={level},engine={level}",
            level = config.log_level
        ))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}
