//! AgriSmart - farmer registration in the terminal
//!
//! Walks a farmer from language choice through login or signup to a farm
//! profile and a dashboard, backed by a local JSON store or Firebase.

use std::io;
use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use agrismart::application::{App, Screen};
use agrismart::cli;
use agrismart::domain::Translator;
use agrismart::presentation::{render_ui, InputHandler};

/// Entry point for the AgriSmart terminal application.
///
/// Reads the configuration, opens the backend, then runs the event loop
/// until the user quits.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the backend cannot be
/// opened or the terminal cannot be set up.
fn main() -> Result<()> {
    let config = cli::start()?;
    let store = cli::build_store(&config)?;
    let mut app = App::new(store, Translator::default(), config.lockout);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = %err, "terminal loop failed");
        println!("{err:?}");
    }
    tracing::info!("agrismart stopped");

    Ok(())
}

/// Main application event loop.
///
/// Quits on Ctrl+C anywhere, or on 'q' from the splash and dashboard
/// screens where no text field has focus.
fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        app.guard_screen();
        terminal.draw(|f| render_ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                let quit = match key.code {
                    KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
                    KeyCode::Char('q') => {
                        matches!(app.screen(), Screen::Splash | Screen::Dashboard)
                    }
                    _ => false,
                };
                if quit {
                    return Ok(());
                }
                InputHandler::handle_key_event(app, key.code, key.modifiers);
            }
        }
    }
}
