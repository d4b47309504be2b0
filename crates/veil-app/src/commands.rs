//! Slash commands typed into the composer.
//!
//! The terminal has no buttons, so every action the chat screen offers
//! besides sending is reachable as a command. Anything not starting with `/`
//! is message text.

use crate::AttachmentKind;

/// Parsed composer command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Find a new anonymous chat partner.
    NewChat,
    /// Leave the active conversation.
    Leave,
    /// Open the composer attachment picker for `kind`.
    Attach(AttachmentKind),
    /// Open the latest attachment in the active conversation.
    ViewAttachment,
    /// Open settings.
    Settings,
    /// Toggle the chat list overlay.
    ToggleChats,
    /// Quit the application.
    Quit,
    /// Unrecognized command.
    Unknown {
        /// Command name as typed, without the slash.
        input: String,
    },
}

/// Parse composer text as a command.
///
/// Returns `None` when the text is a plain message.
pub fn parse(text: &str) -> Option<Command> {
    let body = text.trim_start().strip_prefix('/')?;
    let name = body.split_whitespace().next().unwrap_or_default();

    let command = match name.to_ascii_lowercase().as_str() {
        "new" => Command::NewChat,
        "leave" => Command::Leave,
        "image" | "img" => Command::Attach(AttachmentKind::Image),
        "voice" | "mic" => Command::Attach(AttachmentKind::Voice),
        "view" | "open" => Command::ViewAttachment,
        "settings" => Command::Settings,
        "chats" => Command::ToggleChats,
        "quit" | "q" => Command::Quit,
        _ => Command::Unknown { input: name.to_string() },
    };
    Some(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_not_a_command() {
        assert_eq!(parse("hello"), None);
        assert_eq!(parse("a/b"), None);
    }

    #[test]
    fn parses_known_commands() {
        assert_eq!(parse("/new"), Some(Command::NewChat));
        assert_eq!(parse("/leave"), Some(Command::Leave));
        assert_eq!(parse("/image"), Some(Command::Attach(AttachmentKind::Image)));
        assert_eq!(parse("/voice"), Some(Command::Attach(AttachmentKind::Voice)));
        assert_eq!(parse("/view"), Some(Command::ViewAttachment));
        assert_eq!(parse("/settings"), Some(Command::Settings));
        assert_eq!(parse("/chats"), Some(Command::ToggleChats));
        assert_eq!(parse("/q"), Some(Command::Quit));
    }

    #[test]
    fn command_names_ignore_case_and_padding() {
        assert_eq!(parse("  /NEW  "), Some(Command::NewChat));
    }

    #[test]
    fn unknown_command_keeps_name() {
        assert_eq!(parse("/dance now"), Some(Command::Unknown { input: "dance".into() }));
        assert_eq!(parse("/"), Some(Command::Unknown { input: String::new() }));
    }
}
