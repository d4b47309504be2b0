//! Chat list
//!
//! Displays every conversation with its preview, last activity, presence dot
//! and unread badge.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};
use veil_app::{App, Conversation};

const ACTIVE_PREFIX: &str = ">";
const INACTIVE_PREFIX: &str = " ";
const ONLINE_DOT: &str = "●";
const OFFLINE_DOT: &str = "○";
const PREVIEW_INDENT: &str = "   ";
const BORDER_SIZE: u16 = 2;

/// Render the chat list.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let inner_width = usize::from(area.width.saturating_sub(BORDER_SIZE));

    let items: Vec<ListItem> = app
        .conversations()
        .iter()
        .map(|conversation| item(conversation, app.active() == Some(conversation.id), inner_width))
        .collect();

    let block = Block::default().borders(Borders::ALL).title(" Chats ");
    let list = List::new(items).block(block);

    frame.render_widget(list, area);
}

fn item(conversation: &Conversation, active: bool, width: usize) -> ListItem<'static> {
    let (prefix, name_style) = if active {
        (ACTIVE_PREFIX, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
    } else {
        (INACTIVE_PREFIX, Style::default().add_modifier(Modifier::BOLD))
    };

    let dot = if conversation.online {
        Span::styled(ONLINE_DOT, Style::default().fg(Color::Green))
    } else {
        Span::styled(OFFLINE_DOT, Style::default().fg(Color::DarkGray))
    };

    let mut header = vec![
        Span::raw(prefix),
        dot,
        Span::raw(" "),
        Span::styled(conversation.name.clone(), name_style),
        Span::styled(format!(" {}", conversation.time), Style::default().fg(Color::DarkGray)),
    ];
    if conversation.unread > 0 {
        header.push(Span::styled(
            format!(" ({})", conversation.unread),
            Style::default().fg(Color::Black).bg(Color::Cyan),
        ));
    }

    let preview_width = width.saturating_sub(PREVIEW_INDENT.len());
    let preview = truncate(&conversation.last_message, preview_width);

    ListItem::new(vec![
        Line::from(header),
        Line::from(vec![
            Span::raw(PREVIEW_INDENT),
            Span::styled(preview, Style::default().fg(Color::Gray)),
        ]),
    ])
}

/// Cut `text` to `width` characters, marking the cut with an ellipsis.
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(1)).collect();
    format!("{kept}…")
}
