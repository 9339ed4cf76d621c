//! deckview: pick a user, watch their deck of Rick and Morty cards fill in.
//!
//! ```bash
//! deckview
//!
//! # Point at a local mock of either API
//! DECKVIEW_USERS_API=http://localhost:3000 deckview
//!
//! # Logs go to <data dir>/deckview/deckview.log
//! RUST_LOG=deckview_core=debug deckview
//! ```

mod app;
mod handler;
mod tui;
mod ui;

use std::fs::{self, File, OpenOptions};
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

use app::App;
use deckview_core::Config;
use tui::{EventHandler, Tui};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let config = Config::load().unwrap_or_else(|e| {
        warn!("Ignoring config file: {:#}", e);
        Config::default().with_overrides(|key| std::env::var(key).ok())
    });
    info!(users_api = %config.users_api, character_api = %config.character_api, "Starting deckview");

    let mut app = App::start(&config)?;

    tui::install_panic_hook();
    let mut terminal = tui::init()?;

    let mut events = EventHandler::new();
    let result = run(&mut terminal, &mut app, &mut events).await;

    app.shutdown();
    tui::restore()?;
    result
}

async fn run(terminal: &mut Tui, app: &mut App, events: &mut EventHandler) -> Result<()> {
    while !app.should_quit {
        terminal
            .draw(|frame| ui::render(app, frame))
            .context("Failed to draw frame")?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event).await,
            None => break,
        }
    }
    Ok(())
}

/// The terminal belongs to the UI, so logs go to a file
fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("deckview=info,deckview_core=info"));

    let writer = match open_log_file() {
        Ok(file) => BoxMakeWriter::new(Mutex::new(file)),
        Err(_) => BoxMakeWriter::new(std::io::sink),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
}

fn open_log_file() -> Result<File> {
    let dir = dirs::data_local_dir()
        .context("Could not determine data directory")?
        .join("deckview");
    fs::create_dir_all(&dir)?;

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("deckview.log"))?;
    Ok(file)
}
