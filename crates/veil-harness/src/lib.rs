//! Deterministic simulation harness for Veil sessions.
//!
//! Virtual-clock implementations of the Environment and Driver traits for
//! deterministic, reproducible testing of the conversation controller and the
//! generic runtime.
//!
//! # Invariant Testing
//!
//! The `invariants` module provides behavioral testing through invariant
//! checks. Invariants verify WHAT must be true across all execution paths, not
//! specific scenarios. Use [`InvariantRegistry::standard()`] for the session
//! invariants.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod invariants;
pub mod sim_driver;
pub mod sim_env;

pub use invariants::{
    ActiveConversationExists, ConversationSnapshot, DraftClearedOnSend, Invariant,
    InvariantRegistry, InvariantResult, MessageOrdering, OfflineSendBlocked, SessionSnapshot,
    SystemSnapshot, TypingRequiresActive, Violation,
};
pub use sim_driver::{SimDriver, SimDriverError};
pub use sim_env::{SimEnv, SimInstant};
