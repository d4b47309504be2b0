//! Observable session state types.
//!
//! This module defines the data structures that represent the session's
//! current view of the world: [`Conversation`] records with their message
//! sequences, [`Message`] and [`Attachment`] values, the current [`Route`],
//! and the transient [`Notification`].
//!
//! These structures serve as the "View Model" for presentation. Renderers
//! read them through [`crate::App`] accessors and never mutate them.

use veil_core::{ConversationId, MessageId};

/// Display time used for anything created during the session.
pub const JUST_NOW: &str = "Just now";

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sender {
    /// The local user.
    Me,
    /// The simulated peer.
    Peer,
}

/// Attachment kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttachmentKind {
    /// Still image, opened in the image viewer.
    Image,
    /// Voice recording, opened in the voice player.
    Voice,
}

/// Media attached to a message. Read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// Attachment kind.
    pub kind: AttachmentKind,
    /// Resource locator passed to the viewer.
    pub url: String,
}

impl Attachment {
    /// Create an image attachment.
    pub fn image(url: impl Into<String>) -> Self {
        Self { kind: AttachmentKind::Image, url: url.into() }
    }

    /// Create a voice attachment.
    pub fn voice(url: impl Into<String>) -> Self {
        Self { kind: AttachmentKind::Voice, url: url.into() }
    }
}

/// A message in a conversation. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Session-unique, increasing identifier.
    pub id: MessageId,
    /// Body text.
    pub content: String,
    /// Author.
    pub sender: Sender,
    /// Display timestamp.
    pub timestamp: String,
    /// Optional media.
    pub attachment: Option<Attachment>,
}

/// A chat thread with one simulated peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    /// Conversation identifier.
    pub id: ConversationId,
    /// Peer display name.
    pub name: String,
    /// Preview of the latest message.
    pub last_message: String,
    /// Display time of the latest activity.
    pub time: String,
    /// Messages received while not active.
    pub unread: u32,
    /// Peer presence shown in the list and header.
    pub online: bool,
    /// Messages in send order.
    pub messages: Vec<Message>,
}

impl Conversation {
    /// Create an empty conversation.
    pub fn new(id: ConversationId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            last_message: String::new(),
            time: JUST_NOW.to_string(),
            unread: 0,
            online: true,
            messages: Vec::new(),
        }
    }

    /// Append a message and refresh the list preview.
    pub fn push(&mut self, message: Message) {
        self.last_message.clone_from(&message.content);
        self.time.clone_from(&message.timestamp);
        self.messages.push(message);
    }

    /// Most recent message carrying an attachment.
    pub fn latest_attachment(&self) -> Option<&Attachment> {
        self.messages.iter().rev().find_map(|m| m.attachment.as_ref())
    }
}

/// Screen currently displayed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Route {
    /// Chat list and conversation view.
    #[default]
    Chat,
    /// Full-screen image viewer.
    ImageViewer {
        /// Image locator.
        url: String,
    },
    /// Voice message player.
    VoicePlayer {
        /// Audio locator.
        url: String,
    },
    /// Settings screen.
    Settings,
}

impl Route {
    /// Viewer route for an attachment.
    pub fn for_attachment(attachment: &Attachment) -> Self {
        match attachment.kind {
            AttachmentKind::Image => Self::ImageViewer { url: attachment.url.clone() },
            AttachmentKind::Voice => Self::VoicePlayer { url: attachment.url.clone() },
        }
    }
}

/// Notification severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    /// Informational.
    #[default]
    Info,
    /// Something went wrong.
    Destructive,
}

/// Transient user-facing alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Short title.
    pub title: String,
    /// Longer description.
    pub description: String,
    /// Severity.
    pub severity: Severity,
}

impl Notification {
    /// Informational notification.
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self { title: title.into(), description: description.into(), severity: Severity::Info }
    }

    /// Destructive notification.
    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Destructive,
        }
    }
}
