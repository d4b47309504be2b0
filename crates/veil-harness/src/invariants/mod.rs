//! Invariant checking for deterministic simulation testing.
//!
//! Invariants are properties that must always hold during a session.
//! Unlike example-based tests that check specific scenarios, invariants
//! verify behavioral properties across all possible execution paths.
//!
//! # Architecture
//!
//! The invariant system extracts observable state from the App into a
//! [`SessionSnapshot`] after every step and appends it to a
//! [`SystemSnapshot`] history, then runs registered [`Invariant`] checks
//! against that history. Violations trigger panics with detailed context for
//! debugging.
//!
//! # Usage
//!
//! ```ignore
//! let registry = InvariantRegistry::standard();
//! let mut history = SystemSnapshot::empty();
//! history.record(SessionSnapshot::from_app(&app));
//! registry.check_all(&history)?;
//! ```

mod checks;
mod snapshot;

pub use checks::{
    ActiveConversationExists, DraftClearedOnSend, MessageOrdering, OfflineSendBlocked,
    TypingRequiresActive,
};
pub use snapshot::{ConversationSnapshot, SessionSnapshot, SystemSnapshot};

/// Invariant check result.
pub type InvariantResult = Result<(), Violation>;

/// Invariant violation with context.
#[derive(Debug, Clone)]
pub struct Violation {
    /// Name of the violated invariant.
    pub invariant: &'static str,
    /// Description of what went wrong.
    pub message: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.invariant, self.message)
    }
}

impl std::error::Error for Violation {}

/// An invariant that can be checked against session history.
///
/// Invariants are behavioral properties that must always hold.
/// They capture WHAT must be true, not specific test scenarios.
pub trait Invariant: Send + Sync {
    /// Invariant name for error reporting.
    fn name(&self) -> &'static str;

    /// Check the invariant against the recorded history.
    ///
    /// Returns `Ok(())` if the invariant holds, or a [`Violation`]
    /// describing what went wrong.
    fn check(&self, state: &SystemSnapshot) -> InvariantResult;
}

/// Registry of invariants to check.
///
/// Collects multiple invariants and runs them all against session history.
/// Use [`InvariantRegistry::standard()`] for the session invariants.
pub struct InvariantRegistry {
    invariants: Vec<Box<dyn Invariant>>,
}

impl Default for InvariantRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InvariantRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<_> = self.invariants.iter().map(|inv| inv.name()).collect();
        f.debug_struct("InvariantRegistry").field("invariants", &names).finish()
    }
}

impl InvariantRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self { invariants: Vec::new() }
    }

    /// Create a registry with the standard session invariants.
    ///
    /// Includes:
    /// - [`MessageOrdering`]: message ids increase along every sequence
    /// - [`DraftClearedOnSend`]: a send empties the composer
    /// - [`OfflineSendBlocked`]: nothing is sent while offline
    /// - [`ActiveConversationExists`]: the active conversation is listed
    /// - [`TypingRequiresActive`]: no typing indicator on the welcome screen
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.add(MessageOrdering);
        registry.add(DraftClearedOnSend);
        registry.add(OfflineSendBlocked);
        registry.add(ActiveConversationExists);
        registry.add(TypingRequiresActive);
        registry
    }

    /// Add an invariant to the registry.
    pub fn add<I: Invariant + 'static>(&mut self, invariant: I) {
        self.invariants.push(Box::new(invariant));
    }

    /// Check all invariants against the given history.
    ///
    /// Returns `Ok(())` if all invariants hold, or all violations found.
    pub fn check_all(&self, state: &SystemSnapshot) -> Result<(), Vec<Violation>> {
        let violations: Vec<_> =
            self.invariants.iter().filter_map(|inv| inv.check(state).err()).collect();

        if violations.is_empty() { Ok(()) } else { Err(violations) }
    }

    /// Check all invariants, panicking on the first failing step.
    ///
    /// Use this in tests where you want immediate failure with context.
    #[allow(clippy::panic)]
    pub fn assert_all(&self, state: &SystemSnapshot, context: &str) {
        if let Err(violations) = self.check_all(state) {
            let messages: Vec<_> = violations.iter().map(ToString::to_string).collect();
            panic!("Invariant violation {context}:\n  {}", messages.join("\n  "));
        }
    }

    /// Number of registered invariants.
    pub fn len(&self) -> usize {
        self.invariants.len()
    }

    /// Check if registry is empty.
    pub fn is_empty(&self) -> bool {
        self.invariants.is_empty()
    }
}
