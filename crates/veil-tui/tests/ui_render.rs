//! Rendering tests against ratatui's in-memory backend.
//!
//! Each test builds an App through its public API, draws one frame and
//! checks the text that reached the buffer.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use ratatui::{Terminal, backend::TestBackend};
use veil_app::{App, AppEvent, ConversationId, PresenceConfig, SessionConfig, mock};
use veil_tui::ui;

fn quiet_app() -> App {
    let config = SessionConfig {
        presence: PresenceConfig {
            typing_toggle_period: None,
            offline_probability: 0.0,
            ..PresenceConfig::default()
        },
        ..SessionConfig::default()
    };
    App::new(config, 0).unwrap()
}

/// Draw one frame and return it as lines of text.
fn draw(app: &App, width: u16, height: u16) -> Vec<String> {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    terminal.draw(|frame| ui::render(frame, app)).unwrap();

    let buffer = terminal.backend().buffer();
    let cells: Vec<&str> = buffer.content().iter().map(|cell| cell.symbol()).collect();
    cells.chunks(usize::from(width)).map(|row| row.concat()).collect()
}

fn screen(app: &App, width: u16, height: u16) -> String {
    draw(app, width, height).join("\n")
}

#[test]
fn welcome_screen_lists_seed_chats() {
    let app = quiet_app();
    let text = screen(&app, 100, 30);

    assert!(text.contains("Welcome to Anonymous Chat"));
    assert!(text.contains("Anonymous Lynx"));
    assert!(text.contains("Unknown Fox"));
    assert!(text.contains("Mystery Owl"));
    assert!(text.contains("(2)"), "unread badge for Lynx");
    assert!(text.contains("Online"));
}

#[test]
fn conversation_shows_transcript_and_attachment() {
    let mut app = quiet_app();
    app.select_conversation(ConversationId(1));
    let text = screen(&app, 100, 40);

    assert!(text.contains("I love photography!"));
    assert!(text.contains("[image]"));
    assert!(text.contains(mock::PLACEHOLDER_IMAGE_URL));
    assert!(!text.contains("(2)"), "selecting clears the unread badge");
}

#[test]
fn typing_indicator_follows_sent_message() {
    let mut app = quiet_app();
    app.select_conversation(ConversationId(2));
    app.send_message("hey");
    app.handle(AppEvent::Tick { now: Duration::from_secs(1) });

    let text = screen(&app, 100, 30);

    assert!(text.contains("hey"));
    assert!(text.contains("Unknown Fox is typing..."));
}

#[test]
fn narrow_layout_hides_chat_list_until_toggled() {
    let mut app = quiet_app();
    app.select_conversation(ConversationId(3));

    let text = screen(&app, 50, 20);
    assert!(!text.contains(" Chats "));
    assert!(text.contains("Let's chat later today"));

    app.toggle_sidebar();
    let text = screen(&app, 50, 20);
    assert!(text.contains(" Chats "));
}

#[test]
fn notification_toast_is_drawn() {
    let mut app = quiet_app();
    app.start_new_conversation();
    let text = screen(&app, 100, 30);

    assert!(text.contains("New Chat"));
    assert!(text.contains("Finding a partner..."));
}

#[test]
fn image_viewer_replaces_chat_screen() {
    let mut app = quiet_app();
    app.select_conversation(ConversationId(1));
    let attachment = app.active_conversation().and_then(|c| c.latest_attachment()).cloned().unwrap();
    app.open_attachment(&attachment);

    let text = screen(&app, 80, 20);

    assert!(text.contains("Viewing image"));
    assert!(text.contains(mock::PLACEHOLDER_IMAGE_URL));
    assert!(text.contains("Esc: back to chat"));
    assert!(!text.contains(" Chats "));
}

#[test]
fn offline_composer_is_disabled() {
    let config = SessionConfig {
        presence: PresenceConfig {
            typing_toggle_period: None,
            offline_probability: 1.0,
            ..PresenceConfig::default()
        },
        ..SessionConfig::default()
    };
    let mut app = App::new(config, 0).unwrap();
    app.handle(AppEvent::Tick { now: Duration::from_secs(30) });

    let text = screen(&app, 100, 30);

    assert!(text.contains("Reconnecting..."));
    assert!(text.contains("Connection Lost"));
}

#[test]
fn tiny_terminal_does_not_panic() {
    let mut app = quiet_app();
    app.select_conversation(ConversationId(1));
    app.start_new_conversation();

    for (w, h) in [(1, 1), (5, 3), (20, 4)] {
        let _ = draw(&app, w, h);
    }
}

#[test]
fn long_reply_wraps_to_its_last_word() {
    for (width, height) in [(80, 24), (120, 40), (50, 20)] {
        let mut app = quiet_app();
        app.select_conversation(ConversationId(2));
        app.send_message("hi");
        app.handle(AppEvent::Tick { now: Duration::from_secs(3) });

        let text = screen(&app, width, height);

        assert!(text.contains("Thanks for"), "{width}x{height}: start of reply");
        assert!(text.contains("pre-written"), "{width}x{height}: end of reply");
        assert!(text.contains("reply."), "{width}x{height}: last word of reply");
    }
}

#[test]
fn long_history_keeps_newest_message_visible() {
    let mut app = quiet_app();
    app.select_conversation(ConversationId(2));
    for i in 0..12 {
        app.send_message(&format!("message number {i} with enough words to wrap in a narrow pane"));
    }
    app.send_message("the very last one");

    let text = screen(&app, 80, 24);

    assert!(text.contains("the very last one"));
    assert!(!text.contains("message number 0 "));
}

#[test]
fn header_shows_reconnecting_while_offline() {
    let config = SessionConfig {
        presence: PresenceConfig {
            typing_toggle_period: None,
            offline_probability: 1.0,
            ..PresenceConfig::default()
        },
        ..SessionConfig::default()
    };
    let mut app = App::new(config, 0).unwrap();
    app.select_conversation(ConversationId(1));
    assert!(draw(&app, 100, 30)[0].contains("online"));

    app.handle(AppEvent::Tick { now: Duration::from_secs(30) });

    let header = &draw(&app, 100, 30)[0];
    assert!(header.contains("Anonymous Lynx"));
    assert!(header.contains("Reconnecting..."));
}
