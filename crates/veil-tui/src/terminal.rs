//! Terminal driver for the TUI.
//!
//! Implements the [`Driver`] trait for terminal I/O using crossterm for
//! keyboard events and ratatui for rendering. Notifications and routes are
//! rendered from App state, so the driver only logs them.

use std::{
    io::{self, Stdout, stdout},
    time::Duration,
};

use crossterm::{
    ExecutableCommand,
    event::{Event, EventStream, KeyCode, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use thiserror::Error;
use veil_app::{App, AppEvent, Driver, KeyInput, Notification, Route};

use crate::ui;

/// Wake-up interval when no key is pressed.
const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Terminal driver errors.
#[derive(Debug, Error)]
pub enum TerminalError {
    /// I/O error from terminal operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The terminal event stream closed.
    #[error("terminal event stream closed")]
    StreamClosed,
}

/// Terminal driver implementing the [`Driver`] trait.
///
/// Owns the raw-mode alternate screen for its whole lifetime and restores
/// the terminal on drop.
pub struct TerminalDriver {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    event_stream: EventStream,
}

impl TerminalDriver {
    /// Enter raw mode and the alternate screen.
    pub fn new() -> Result<Self, TerminalError> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;

        Ok(Self { terminal, event_stream: EventStream::new() })
    }

    /// Convert crossterm `KeyCode` to `KeyInput`.
    fn convert_key(code: KeyCode) -> Option<KeyInput> {
        match code {
            KeyCode::Char(c) => Some(KeyInput::Char(c)),
            KeyCode::Enter => Some(KeyInput::Enter),
            KeyCode::Backspace => Some(KeyInput::Backspace),
            KeyCode::Delete => Some(KeyInput::Delete),
            KeyCode::Tab => Some(KeyInput::Tab),
            KeyCode::Esc => Some(KeyInput::Esc),
            KeyCode::Left => Some(KeyInput::Left),
            KeyCode::Right => Some(KeyInput::Right),
            KeyCode::Up => Some(KeyInput::Up),
            KeyCode::Down => Some(KeyInput::Down),
            KeyCode::Home => Some(KeyInput::Home),
            KeyCode::End => Some(KeyInput::End),
            _ => None,
        }
    }

    /// Map a terminal event to an App event.
    fn convert_event(event: Event) -> Option<AppEvent> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                Self::convert_key(key.code).map(AppEvent::Key)
            },
            Event::Resize(cols, rows) => Some(AppEvent::Resize(cols, rows)),
            _ => None,
        }
    }
}

impl Driver for TerminalDriver {
    type Error = TerminalError;

    async fn poll_event(&mut self) -> Result<Option<AppEvent>, Self::Error> {
        tokio::select! {
            biased;

            // Terminal events
            maybe_event = self.event_stream.next() => {
                match maybe_event {
                    Some(Ok(event)) => Ok(Self::convert_event(event)),
                    Some(Err(e)) => Err(TerminalError::Io(e)),
                    None => Err(TerminalError::StreamClosed),
                }
            }

            // Tick timeout
            () = tokio::time::sleep(TICK_INTERVAL) => Ok(None),
        }
    }

    fn render(&mut self, app: &App) -> Result<(), Self::Error> {
        self.terminal.draw(|frame| ui::render(frame, app))?;
        Ok(())
    }

    fn notify(&mut self, notification: &Notification) -> Result<(), Self::Error> {
        tracing::debug!(
            title = %notification.title,
            severity = ?notification.severity,
            "showing notification"
        );
        Ok(())
    }

    fn navigate(&mut self, route: &Route) -> Result<(), Self::Error> {
        tracing::debug!(?route, "switching screen");
        Ok(())
    }

    fn stop(&mut self) {
        if let Err(e) = self.terminal.show_cursor() {
            tracing::warn!("Failed to restore cursor: {e}");
        }
    }
}

impl Drop for TerminalDriver {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = stdout().execute(LeaveAlternateScreen);
    }
}
