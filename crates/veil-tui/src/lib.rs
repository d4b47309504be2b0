//! Terminal UI for Veil
//!
//! A thin shell over [`veil_app::Driver`] that provides terminal-specific
//! I/O. All orchestration logic lives in the generic [`veil_app::Runtime`].
//!
//! This crate only handles terminal input, rendering and the system
//! environment.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod system_env;
pub mod terminal;
pub mod ui;

pub use system_env::SystemEnv;
pub use terminal::{TerminalDriver, TerminalError};
pub use veil_app::{App, AppAction, AppEvent, Driver, KeyInput, Runtime};
