//! Scheduled session callbacks.

use veil_core::ConversationId;

/// Payload of a scheduled session timer.
///
/// Send timers are bound to the conversation they were issued for. They are
/// cancelled when that conversation stops being active, and a bound timer
/// that fires for an inactive conversation has no effect. The welcome
/// message always lands in its conversation, active or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timer {
    /// Matchmaking finished; create and open the new conversation.
    PartnerFound,
    /// Append the welcome message to a freshly matched conversation.
    ///
    /// Not bound: switching away before it fires leaves it pending.
    Welcome {
        /// Matched conversation.
        conversation: ConversationId,
    },
    /// Peer starts typing a reply.
    PeerTyping {
        /// Conversation the message was sent in.
        conversation: ConversationId,
    },
    /// Peer reply arrives.
    PeerReply {
        /// Conversation the message was sent in.
        conversation: ConversationId,
    },
    /// Periodic ambient typing toggle.
    TypingToggle,
    /// Periodic simulated connectivity check.
    ConnectivityCheck,
    /// Restore a dropped connection.
    Reconnect,
    /// Hide the current notification.
    DismissNotification,
}

impl Timer {
    /// Conversation this timer is bound to. `None` for timers that survive
    /// a conversation switch.
    pub fn conversation(&self) -> Option<ConversationId> {
        match self {
            Self::PeerTyping { conversation } | Self::PeerReply { conversation } => {
                Some(*conversation)
            },
            Self::PartnerFound
            | Self::Welcome { .. }
            | Self::TypingToggle
            | Self::ConnectivityCheck
            | Self::Reconnect
            | Self::DismissNotification => None,
        }
    }

    /// Whether this timer belongs to an in-flight send for `conversation`.
    pub fn is_reply_for(&self, conversation: ConversationId) -> bool {
        matches!(
            self,
            Self::PeerTyping { conversation: c } | Self::PeerReply { conversation: c }
                if *c == conversation
        )
    }
}
