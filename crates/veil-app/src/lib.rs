//! Application layer for Veil
//!
//! Pure session state machine and generic runtime, enabling deterministic
//! simulation testing with the same code that runs in the terminal.
//!
//! # Components
//!
//! - [`App`]: conversation controller (selection, composer, scripted peer
//!   replies, matchmaking, navigation, notifications)
//! - [`PresenceSimulator`]: synthetic typing indicator and connectivity drops
//! - [`Driver`]: Trait for platform-specific I/O abstraction
//! - [`Runtime`]: Generic orchestration loop using Driver

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod app;
pub mod commands;
mod config;
mod driver;
mod event;
mod input;
pub mod mock;
mod presence;
mod runtime;
mod state;
pub mod timers;

pub use action::AppAction;
pub use app::App;
pub use commands::Command;
pub use config::{ConfigError, PresenceConfig, SessionConfig};
pub use driver::Driver;
pub use event::AppEvent;
pub use input::KeyInput;
pub use presence::PresenceSimulator;
pub use runtime::Runtime;
pub use state::{
    Attachment, AttachmentKind, Conversation, JUST_NOW, Message, Notification, Route, Sender,
    Severity,
};
pub use timers::Timer;
pub use veil_core::{ConversationId, MessageId};
