//! Application input events.
//!
//! This module defines [`AppEvent`], the set of inputs that drive the
//! [`crate::App`] state machine: user interactions (keyboard, resize) and
//! clock ticks. Ticks are the only way simulated time moves forward.

use std::time::Duration;

use crate::KeyInput;

/// Events processed by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Keyboard input.
    Key(KeyInput),

    /// Clock tick. Fires every timer due at `now`.
    Tick {
        /// Time elapsed since the session started.
        now: Duration,
    },

    /// Terminal resize (columns, rows).
    Resize(u16, u16),
}
