//! TUI runner: main loop that wires everything together.
//!
//! Creates the terminal and the form session, starts the key reader, runs
//! the TEA loop until quit.

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::time::interval;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::form::{FormEvent, FormSession};

use super::app::TuiApp;
use super::event::TuiMessage;
use super::layout;

/// Spawn a blocking task that forwards key presses until the receiver
/// goes away.
fn spawn_key_reader() -> UnboundedReceiver<KeyEvent> {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::task::spawn_blocking(move || read_keys(tx));
    rx
}

fn read_keys(tx: UnboundedSender<KeyEvent>) {
    while !tx.is_closed() {
        match event::poll(Duration::from_millis(50)) {
            Ok(true) => match event::read() {
                Ok(Event::Key(key)) => {
                    if tx.send(key).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    debug!(error = %e, "key reader stopped");
                    break;
                }
            },
            Ok(false) => {}
            Err(e) => {
                debug!(error = %e, "key reader stopped");
                break;
            }
        }
    }
}

/// Run the TUI main loop. Blocks until quit.
pub async fn run_tui(config: &AppConfig) -> anyhow::Result<()> {
    let client = config.build_client()?;
    let (session, mut form_rx) = FormSession::new(client, config.session_options());
    let mut app = TuiApp::new(session);

    // Setup terminal
    enable_raw_mode()?;
    let mut terminal = match enter_terminal() {
        Ok(terminal) => terminal,
        Err(e) => return finish(Err(e), restore_terminal()),
    };

    let result = event_loop(&mut terminal, &mut app, &mut form_rx).await;
    let result = finish(result, restore_terminal());
    info!("TUI closed");
    result
}

fn enter_terminal() -> anyhow::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    io::stdout().execute(EnterAlternateScreen)?;
    Ok(Terminal::new(CrosstermBackend::new(io::stdout()))?)
}

fn restore_terminal() -> io::Result<()> {
    restore_with(disable_raw_mode, || {
        io::stdout().execute(LeaveAlternateScreen).map(|_| ())
    })
}

/// Run both restore steps even if the first fails; report the first error.
fn restore_with(
    disable_raw: impl FnOnce() -> io::Result<()>,
    leave_screen: impl FnOnce() -> io::Result<()>,
) -> io::Result<()> {
    let raw = disable_raw();
    let screen = leave_screen();
    raw.and(screen)
}

/// The loop's own error wins over a failure to restore the terminal.
fn finish(result: anyhow::Result<()>, restored: io::Result<()>) -> anyhow::Result<()> {
    match (result, restored) {
        (Err(e), Err(restore)) => {
            warn!(error = %restore, "failed to restore terminal");
            Err(e)
        }
        (Err(e), Ok(())) => Err(e),
        (Ok(()), restored) => Ok(restored?),
    }
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut TuiApp,
    form_rx: &mut UnboundedReceiver<FormEvent>,
) -> anyhow::Result<()> {
    let mut keys = spawn_key_reader();
    let mut render_interval = interval(Duration::from_millis(33)); // ~30fps

    loop {
        let msg = tokio::select! {
            _ = render_interval.tick() => TuiMessage::Render,
            Some(key) = keys.recv() => TuiMessage::Input(key),
            Some(event) = form_rx.recv() => TuiMessage::Form(event),
            else => TuiMessage::Quit,
        };

        if matches!(msg, TuiMessage::Render) {
            terminal.draw(|f| layout::draw(f, app))?;
        } else {
            app.update(msg);
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
