//! Nearby - browse restaurants around a point on a terminal map
//!
//! A terminal UI application that searches the Google Places service for
//! restaurants near the map center and shows them as map markers and in a
//! sortable table with expandable details.

use std::io;
use std::panic;
use std::process;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use nearby::app::App;
use nearby::cli::{Cli, StartupConfig};
use nearby::data::PlacesClient;
use nearby::worker::{self, ApiWorker};
use nearby::{logging, ui};

/// Sets up a panic hook that restores the terminal before printing the panic message.
/// This ensures the terminal is usable even if the application panics.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Attempt to restore the terminal
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        // Call the original panic hook
        original_hook(panic_info);
    }));
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse and validate before touching the terminal
    let cli = Cli::parse();
    let config = match StartupConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    // Logging is best effort; the UI works without it
    if let Some(dir) = logging::default_log_dir() {
        if let Ok(path) = logging::init(&dir, &config.log_level) {
            tracing::info!(log = %path.display(), "logging initialized");
        }
    }

    // Set up panic hook to restore terminal on crash
    setup_panic_hook();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut worker = ApiWorker::new(PlacesClient::new(config.api_key.clone()));
    let mut app = App::new(&config);

    // Initial render, then the map is ready and the first search goes out
    terminal.draw(|f| ui::render(f, &app))?;
    if let Some(command) = app.on_map_ready() {
        worker.dispatch(command);
    }

    // Main event loop
    loop {
        // Apply finished requests
        while let Some(event) = worker::try_recv(&mut worker) {
            app.apply_event(event);
        }

        // Render UI
        terminal.draw(|f| ui::render(f, &app))?;

        // Poll for keyboard events with 100ms timeout
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(command) = app.handle_key(key) {
                        worker.dispatch(command);
                    }
                }
            }
        }

        // Check if we should quit
        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    tracing::info!("exiting");
    Ok(())
}
