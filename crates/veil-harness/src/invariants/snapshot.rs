//! Observable state snapshots for invariant checking.
//!
//! Snapshots capture the observable state of a session at a point in time.
//! Invariants operate on snapshots rather than live state to ensure
//! consistent, atomic checks. Transition invariants compare consecutive
//! entries of a [`SystemSnapshot`] history.

use veil_app::{App, ConversationId, MessageId, Sender};

/// History of session snapshots, oldest first.
#[derive(Debug, Clone, Default)]
pub struct SystemSnapshot {
    /// One entry per observed step.
    pub history: Vec<SessionSnapshot>,
}

impl SystemSnapshot {
    /// Create an empty history.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a history with a single observation.
    pub fn single(session: SessionSnapshot) -> Self {
        Self { history: vec![session] }
    }

    /// Append an observation.
    pub fn record(&mut self, session: SessionSnapshot) {
        self.history.push(session);
    }

    /// Most recent observation.
    pub fn latest(&self) -> Option<&SessionSnapshot> {
        self.history.last()
    }

    /// Consecutive `(before, after)` observation pairs.
    pub fn transitions(&self) -> impl Iterator<Item = (&SessionSnapshot, &SessionSnapshot)> {
        self.history.windows(2).filter_map(|w| match w {
            [before, after] => Some((before, after)),
            _ => None,
        })
    }
}

/// Snapshot of a session's observable state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Active conversation. `None` on the welcome screen.
    pub active: Option<ConversationId>,
    /// Conversations in list order.
    pub conversations: Vec<ConversationSnapshot>,
    /// Composer text.
    pub draft: String,
    /// Connectivity flag.
    pub online: bool,
    /// Peer typing flag.
    pub peer_typing: bool,
}

impl SessionSnapshot {
    /// Capture the observable state of `app`.
    pub fn from_app(app: &App) -> Self {
        Self {
            active: app.active(),
            conversations: app.conversations().iter().map(ConversationSnapshot::from).collect(),
            draft: app.draft().to_string(),
            online: app.is_online(),
            peer_typing: app.is_peer_typing(),
        }
    }

    /// Messages written by the local user across all conversations.
    pub fn local_message_count(&self) -> usize {
        self.conversations.iter().map(|c| c.local_messages).sum()
    }

    /// Whether a conversation with `id` is listed.
    pub fn contains(&self, id: ConversationId) -> bool {
        self.conversations.iter().any(|c| c.id == id)
    }
}

/// Snapshot of one conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationSnapshot {
    /// Conversation identifier.
    pub id: ConversationId,
    /// Message ids in sequence order.
    pub message_ids: Vec<MessageId>,
    /// Number of messages sent by the local user.
    pub local_messages: usize,
}

impl ConversationSnapshot {
    /// Create a snapshot with the given message ids, none of them local.
    pub fn new(id: ConversationId, message_ids: impl IntoIterator<Item = MessageId>) -> Self {
        Self { id, message_ids: message_ids.into_iter().collect(), local_messages: 0 }
    }
}

impl From<&veil_app::Conversation> for ConversationSnapshot {
    fn from(conversation: &veil_app::Conversation) -> Self {
        Self {
            id: conversation.id,
            message_ids: conversation.messages.iter().map(|m| m.id).collect(),
            local_messages: conversation.messages.iter().filter(|m| m.sender == Sender::Me).count(),
        }
    }
}
