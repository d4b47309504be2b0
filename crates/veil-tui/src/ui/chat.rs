//! Conversation view
//!
//! Displays the active conversation's messages as left/right aligned bubbles
//! with the typing indicator underneath, or the welcome screen when no
//! conversation is open.

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use veil_app::{App, AttachmentKind, Conversation, Message, Sender};

const BORDER_SIZE: u16 = 2;

/// Render the conversation view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    match app.active_conversation() {
        Some(conversation) => render_conversation(frame, app, conversation, area),
        None => render_welcome(frame, area),
    }
}

fn render_conversation(frame: &mut Frame, app: &App, conversation: &Conversation, area: Rect) {
    let presence = if !app.is_online() {
        Span::styled("Reconnecting...", Style::default().fg(Color::Yellow))
    } else if conversation.online {
        Span::styled("online", Style::default().fg(Color::Green))
    } else {
        Span::styled("offline", Style::default().fg(Color::DarkGray))
    };
    let title = Line::from(vec![
        Span::raw(" "),
        Span::styled(conversation.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" · "),
        presence,
        Span::raw(" "),
    ]);
    let block = Block::default().borders(Borders::ALL).title(title);

    let mut lines: Vec<Line> = conversation.messages.iter().flat_map(bubble).collect();
    if app.is_peer_typing() {
        lines.push(Line::from(Span::styled(
            format!("{} is typing...", conversation.name),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
    }

    // Keep the newest line at the bottom; scroll by wrapped height.
    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    let wrapped_height = paragraph.line_count(area.width.saturating_sub(BORDER_SIZE));
    let visible_height = usize::from(area.height.saturating_sub(BORDER_SIZE));
    let scroll = u16::try_from(wrapped_height.saturating_sub(visible_height)).unwrap_or(u16::MAX);

    frame.render_widget(paragraph.scroll((scroll, 0)).block(block), area);
}

/// Lines for one message: body, optional attachment, timestamp.
fn bubble(message: &Message) -> Vec<Line<'static>> {
    let (alignment, style) = match message.sender {
        Sender::Me => (Alignment::Right, Style::default().fg(Color::Black).bg(Color::Cyan)),
        Sender::Peer => (Alignment::Left, Style::default().fg(Color::White).bg(Color::DarkGray)),
    };

    let mut lines = vec![Line::from(Span::styled(format!(" {} ", message.content), style))];

    if let Some(attachment) = &message.attachment {
        let label = match attachment.kind {
            AttachmentKind::Image => "[image]",
            AttachmentKind::Voice => "[voice]",
        };
        lines.push(Line::from(vec![
            Span::styled(label, Style::default().fg(Color::Magenta)),
            Span::raw(" "),
            Span::styled(attachment.url.clone(), Style::default().add_modifier(Modifier::UNDERLINED)),
            Span::styled(" (/view)", Style::default().fg(Color::DarkGray)),
        ]));
    }

    lines.push(Line::from(Span::styled(
        message.timestamp.clone(),
        Style::default().fg(Color::DarkGray),
    )));

    lines.into_iter().map(|line| line.alignment(alignment)).collect()
}

fn render_welcome(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(
            "Welcome to Anonymous Chat",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Pick a conversation with Tab or the arrow keys,"),
        Line::from("or type /new to meet a random stranger."),
    ];

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(paragraph, area);
}
