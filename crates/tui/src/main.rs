mod app;
mod bus;
mod client;
mod config;
mod error;
mod local_state;
mod notifications;
mod quick_add;
mod ui;

use std::{fs::OpenOptions, sync::Mutex};

use crate::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::load()?;

    // The terminal owns stdout, so logs go to a file.
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_path)?;
    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "tally={level},tally_tui={level},engine={level}",
            level = config.level
        ))
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();

    let mut app = app::App::new(config)?;
    app.run().await?;
    Ok(())
}
