//! Built-in demo content.
//!
//! The session has no backend; every conversation, transcript and scripted
//! reply comes from here.

use veil_core::{ConversationId, MessageId};

use crate::{Attachment, Conversation, Message, Sender};

/// Scripted reply to every sent message.
pub const REPLY_TEXT: &str =
    "Thanks for your message! This is a prototype, so I'm just responding with a pre-written reply.";

/// First message in a freshly matched conversation.
pub const WELCOME_TEXT: &str = "You're now chatting with a random stranger. Say hi!";

/// Display name of a freshly matched peer.
pub const STRANGER_NAME: &str = "Anonymous Stranger";

/// List preview of a freshly matched conversation.
pub const WAITING_PREVIEW: &str = "Waiting for messages...";

/// Image locator used by the composer's image button.
pub const PLACEHOLDER_IMAGE_URL: &str = "/placeholder.svg";

/// Audio locator used by the composer's voice button.
pub const SAMPLE_VOICE_URL: &str = "https://www.soundhelix.com/examples/mp3/SoundHelix-Song-1.mp3";

/// First id handed out to matched conversations.
pub const FIRST_MATCHED_ID: u64 = 100;

struct SeedChat {
    id: u64,
    name: &'static str,
    preview: &'static str,
    time: &'static str,
    unread: u32,
    online: bool,
}

const SEED_CHATS: [SeedChat; 3] = [
    SeedChat {
        id: 1,
        name: "Anonymous Lynx",
        preview: "Hey there! How's it going?",
        time: "12:30 PM",
        unread: 2,
        online: true,
    },
    SeedChat {
        id: 2,
        name: "Unknown Fox",
        preview: "Did you see that news article?",
        time: "Yesterday",
        unread: 0,
        online: false,
    },
    SeedChat {
        id: 3,
        name: "Mystery Owl",
        preview: "Let's chat later today",
        time: "Monday",
        unread: 0,
        online: false,
    },
];

const LYNX_TRANSCRIPT: [(Sender, &str, &str); 7] = [
    (Sender::Peer, "Hey there! I'm using Anonymous Chat", "12:30 PM"),
    (Sender::Me, "Oh hey! Nice to meet you", "12:31 PM"),
    (Sender::Peer, "What brings you here today?", "12:32 PM"),
    (Sender::Me, "Just exploring the app. It's pretty cool to chat anonymously!", "12:33 PM"),
    (Sender::Peer, "Agreed! I like the privacy aspect of it. No history, no tracking.", "12:34 PM"),
    (Sender::Me, "Exactly. So what are your interests?", "12:35 PM"),
    (Sender::Peer, "I love photography! Check out this photo I took yesterday.", "12:36 PM"),
];

/// Seed conversations in list order.
///
/// The first conversation carries the demo transcript, ending in a photo.
/// The others hold a single peer message matching their preview. `next_id`
/// hands out message ids and is advanced past every seeded message.
pub fn seed_conversations(next_id: &mut u64) -> Vec<Conversation> {
    let mut message = |sender, content: &str, timestamp: &str| {
        let id = MessageId(*next_id);
        *next_id = next_id.saturating_add(1);
        Message {
            id,
            content: content.to_string(),
            sender,
            timestamp: timestamp.to_string(),
            attachment: None,
        }
    };

    SEED_CHATS
        .iter()
        .map(|seed| {
            let messages = if seed.id == 1 {
                let mut transcript: Vec<_> = LYNX_TRANSCRIPT
                    .iter()
                    .map(|(sender, content, time)| message(*sender, *content, *time))
                    .collect();
                if let Some(last) = transcript.last_mut() {
                    last.attachment = Some(Attachment::image(PLACEHOLDER_IMAGE_URL));
                }
                transcript
            } else {
                vec![message(Sender::Peer, seed.preview, seed.time)]
            };

            Conversation {
                id: ConversationId(seed.id),
                name: seed.name.to_string(),
                last_message: seed.preview.to_string(),
                time: seed.time.to_string(),
                unread: seed.unread,
                online: seed.online,
                messages,
            }
        })
        .collect()
}
