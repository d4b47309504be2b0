//! Driver trait for abstracting I/O operations.
//!
//! The [`Driver`] trait decouples the application runtime from specific I/O
//! implementations. Each frontend implements the trait to provide
//! platform-specific I/O, while the generic [`crate::Runtime`] handles all
//! orchestration.

use std::future::Future;

use crate::{App, AppEvent, Notification, Route};

/// Abstracts I/O operations for the application runtime.
///
/// Implementations provide platform-specific I/O while the generic
/// [`Runtime`](crate::Runtime) handles orchestration logic. This ensures
/// the same orchestration code runs in the terminal and in simulation.
///
/// # Implementations
///
/// - **TUI**: crossterm events multiplexed with a periodic tick, ratatui
///   rendering
/// - **Simulation**: injected events and a virtual clock
pub trait Driver: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Poll for the next input event.
    ///
    /// Returns `None` when no input arrived before the driver's tick. The
    /// runtime advances the session clock after every poll either way.
    fn poll_event(&mut self) -> impl Future<Output = Result<Option<AppEvent>, Self::Error>> + Send;

    /// Render the application state.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(&mut self, app: &App) -> Result<(), Self::Error>;

    /// Surface a notification outside the rendered frame.
    ///
    /// The notification is also part of the App state, so drivers that
    /// render it from there can ignore this.
    fn notify(&mut self, notification: &Notification) -> Result<(), Self::Error>;

    /// Switch to another screen.
    fn navigate(&mut self, route: &Route) -> Result<(), Self::Error>;

    /// Release platform resources.
    fn stop(&mut self);
}
