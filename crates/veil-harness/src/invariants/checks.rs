//! Standard invariant checks.
//!
//! These invariants capture behavioral properties that must always hold.
//! They verify WHAT must be true, not specific test scenarios.

use std::collections::HashSet;

use super::{Invariant, InvariantResult, SystemSnapshot, Violation};

/// Message ids strictly increase along every sequence and are never shared.
///
/// A message belongs to exactly one conversation, and sequences are kept in
/// send order.
pub struct MessageOrdering;

impl Invariant for MessageOrdering {
    fn name(&self) -> &'static str {
        "message_ordering"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        for session in &state.history {
            let mut seen = HashSet::new();
            for conversation in &session.conversations {
                if let Some(pair) = conversation.message_ids.windows(2).find(|w| w[1] <= w[0]) {
                    return Err(Violation {
                        invariant: self.name(),
                        message: format!(
                            "conversation {}: message {} follows {}",
                            conversation.id, pair[1], pair[0]
                        ),
                    });
                }
                if let Some(dup) = conversation.message_ids.iter().find(|id| !seen.insert(**id)) {
                    return Err(Violation {
                        invariant: self.name(),
                        message: format!(
                            "message {dup} appears in more than one conversation (again in {})",
                            conversation.id
                        ),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Appending a message from the composer leaves the draft empty.
///
/// Between two observations at most one local message may be appended.
pub struct DraftClearedOnSend;

impl Invariant for DraftClearedOnSend {
    fn name(&self) -> &'static str {
        "draft_cleared_on_send"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        for (before, after) in state.transitions() {
            let sent = after.local_message_count().saturating_sub(before.local_message_count());
            if sent > 1 {
                return Err(Violation {
                    invariant: self.name(),
                    message: format!("{sent} local messages appended in one step"),
                });
            }
            if sent == 1 && !after.draft.is_empty() {
                return Err(Violation {
                    invariant: self.name(),
                    message: format!("draft {:?} survived a send", after.draft),
                });
            }
        }
        Ok(())
    }
}

/// No local message is created while offline.
pub struct OfflineSendBlocked;

impl Invariant for OfflineSendBlocked {
    fn name(&self) -> &'static str {
        "offline_send_blocked"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        for (before, after) in state.transitions() {
            if !before.online && after.local_message_count() > before.local_message_count() {
                return Err(Violation {
                    invariant: self.name(),
                    message: "local message appended while offline".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// The active conversation is always listed.
pub struct ActiveConversationExists;

impl Invariant for ActiveConversationExists {
    fn name(&self) -> &'static str {
        "active_conversation_exists"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        for session in &state.history {
            if let Some(active) = session.active
                && !session.contains(active)
            {
                return Err(Violation {
                    invariant: self.name(),
                    message: format!(
                        "active conversation {active} not in {:?}",
                        session.conversations.iter().map(|c| c.id).collect::<Vec<_>>()
                    ),
                });
            }
        }
        Ok(())
    }
}

/// The peer never types on the welcome screen.
pub struct TypingRequiresActive;

impl Invariant for TypingRequiresActive {
    fn name(&self) -> &'static str {
        "typing_requires_active"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        for session in &state.history {
            if session.peer_typing && session.active.is_none() {
                return Err(Violation {
                    invariant: self.name(),
                    message: "peer typing with no active conversation".to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use veil_app::{ConversationId, MessageId};

    use super::*;
    use crate::invariants::{ConversationSnapshot, SessionSnapshot};

    fn session(ids: &[u64]) -> SessionSnapshot {
        SessionSnapshot {
            conversations: vec![ConversationSnapshot::new(
                ConversationId(1),
                ids.iter().copied().map(MessageId),
            )],
            online: true,
            ..SessionSnapshot::default()
        }
    }

    #[test]
    fn ordering_rejects_out_of_order_ids() {
        let state = SystemSnapshot::single(session(&[1, 3, 2]));
        let err = MessageOrdering.check(&state).unwrap_err();

        assert_eq!(err.invariant, "message_ordering");
    }

    #[test]
    fn ordering_rejects_shared_ids() {
        let mut snapshot = session(&[1, 2]);
        snapshot.conversations.push(ConversationSnapshot::new(ConversationId(2), [MessageId(2)]));

        assert!(MessageOrdering.check(&SystemSnapshot::single(snapshot)).is_err());
    }

    #[test]
    fn draft_must_clear_on_send() {
        let before = session(&[1]);
        let mut after = session(&[1, 2]);
        after.conversations[0].local_messages = 1;
        after.draft = "hi".into();

        let mut state = SystemSnapshot::single(before);
        state.record(after);

        assert!(DraftClearedOnSend.check(&state).is_err());
    }

    #[test]
    fn offline_send_is_flagged() {
        let mut before = session(&[1]);
        before.online = false;
        let mut after = session(&[1, 2]);
        after.conversations[0].local_messages = 1;

        let mut state = SystemSnapshot::single(before);
        state.record(after);

        assert!(OfflineSendBlocked.check(&state).is_err());
    }

    #[test]
    fn active_must_be_listed() {
        let mut snapshot = session(&[]);
        snapshot.active = Some(ConversationId(7));

        assert!(ActiveConversationExists.check(&SystemSnapshot::single(snapshot)).is_err());
    }

    #[test]
    fn typing_without_active_is_flagged() {
        let mut snapshot = session(&[]);
        snapshot.peer_typing = true;

        assert!(TypingRequiresActive.check(&SystemSnapshot::single(snapshot)).is_err());
    }
}
