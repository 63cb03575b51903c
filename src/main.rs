//! Tombs of the Forgotten Kings - Entry Point
//!
//! Initializes logging and the terminal, then hands every input event to the
//! app until it asks to quit.

use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use tombs::data::{export_default_data, DataManager, DATA_DIR};
use tombs::ui::App;

fn main() -> Result<()> {
    // Initialize logging to file (to avoid interfering with TUI)
    let log_file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open("tombs.log")?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    if std::env::args().any(|arg| arg == "--export-data") {
        export_default_data(Path::new(DATA_DIR))?;
        println!("Wrote default data files to {}", DATA_DIR);
        return Ok(());
    }

    log::info!("Starting Tombs of the Forgotten Kings v{}", env!("CARGO_PKG_VERSION"));
    let data = Arc::new(DataManager::new());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(data);
    let result = run_game_loop(&mut terminal, &mut app);
    let shutdown = app.shutdown();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    // Report any errors
    if let Err(ref e) = result {
        log::error!("Game exited with error: {}", e);
        eprintln!("Error: {}", e);
    }
    if let Err(ref e) = shutdown {
        log::warn!("Could not save on exit: {}", e);
    }

    log::info!("Shut down cleanly");
    result
}

/// Draw, then block until the next input event
fn run_game_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|frame| app.render(frame))?;

        let event = event::read()?;
        if app.handle_event(&event)? {
            break;
        }
    }
    Ok(())
}
