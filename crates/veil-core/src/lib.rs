//! Core primitives for the Veil session engine.
//!
//! Everything here is free of I/O so the session state machine built on top
//! of it can run unchanged under the terminal frontend and under
//! deterministic simulation.
//!
//! - [`env`]: time and randomness abstraction
//! - [`timer`]: schedulable delays with cancel handles
//! - [`ids`]: conversation and message identifiers

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod env;
pub mod ids;
pub mod timer;

pub use env::Environment;
pub use ids::{ConversationId, MessageId};
pub use timer::{Fired, TimerId, TimerQueue};
