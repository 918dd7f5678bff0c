//! Kanban TUI entry point.

use crossterm::{
    event::{self, Event as CrosstermEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use kanban_tui::api_client::RestClient;
use kanban_tui::config::TuiConfig;
use kanban_tui::dispatch::{Command, Dispatcher};
use kanban_tui::error::TuiError;
use kanban_tui::events::TuiEvent;
use kanban_tui::session::SessionStore;
use kanban_tui::state::App;
use kanban_tui::telemetry;
use kanban_tui::views::render_view;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

#[tokio::main(flavor = "current_thread")]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    run().await?;
    Ok(())
}

async fn run() -> Result<(), TuiError> {
    let config = TuiConfig::load()?;
    let _log_guard = telemetry::init(&config.log_path)?;
    let session = SessionStore::open(&config.session_path)?;
    let client = Arc::new(RestClient::new(&config)?);
    tracing::info!(api = %client.base_url(), "Starting kanban TUI");

    let (event_tx, mut event_rx) = mpsc::channel::<TuiEvent>(256);
    let dispatcher = Dispatcher::new(client.clone(), client, event_tx.clone());
    let mut app = App::new(config, session);

    let (mut terminal, _guard) = setup_terminal()?;

    spawn_input_reader(event_tx.clone());

    let tick_rate = Duration::from_millis(app.config.refresh_interval_ms);
    let mut ticker = tokio::time::interval(tick_rate);

    loop {
        if let Some(command) = app.poll_fetch() {
            dispatcher.dispatch(command, app.token());
        }
        terminal.draw(|f| render_view(f, &app))?;

        tokio::select! {
            _ = ticker.tick() => app.tick(),
            Some(event) = event_rx.recv() => {
                for command in handle_event(&mut app, event) {
                    dispatcher.dispatch(command, app.token());
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    tracing::info!("Exiting");
    Ok(())
}

fn handle_event(app: &mut App, event: TuiEvent) -> Vec<Command> {
    match event {
        TuiEvent::Input(key) => return app.handle_key(key),
        TuiEvent::Completed(completion) => app.handle_completion(completion),
        TuiEvent::Fetched(fetched) => app.handle_fetch(fetched),
        TuiEvent::Auth(outcome) => app.handle_auth(outcome),
        TuiEvent::Resize { width, height } => {
            tracing::debug!(width, height, "Terminal resized");
        }
    }
    Vec::new()
}

/// The guard exists from the moment raw mode is on, so a failure further
/// down still restores the terminal.
fn setup_terminal() -> Result<(Terminal<CrosstermBackend<Stdout>>, TerminalGuard), TuiError> {
    enable_raw_mode()?;
    let guard = TerminalGuard;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok((Terminal::new(backend)?, guard))
}

struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen);
    }
}

fn spawn_input_reader(sender: mpsc::Sender<TuiEvent>) {
    std::thread::spawn(move || loop {
        if let Ok(true) = event::poll(Duration::from_millis(200)) {
            if let Ok(evt) = event::read() {
                let event = match evt {
                    CrosstermEvent::Key(key) => TuiEvent::Input(key),
                    CrosstermEvent::Resize(width, height) => TuiEvent::Resize { width, height },
                    _ => continue,
                };
                if sender.blocking_send(event).is_err() {
                    break;
                }
            }
        }
    });
}
