//! Notification toast
//!
//! Floats the current notification over the top-right corner.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use veil_app::{Notification, Severity};

const TOAST_WIDTH: u16 = 44;
const TOAST_HEIGHT: u16 = 4;
const MARGIN: u16 = 1;

/// Render the notification toast.
pub fn render(frame: &mut Frame, notification: &Notification, area: Rect) {
    let width = TOAST_WIDTH.min(area.width);
    let height = TOAST_HEIGHT.min(area.height);
    let x = area.x.saturating_add(area.width.saturating_sub(width.saturating_add(MARGIN)));
    let y = area.y.saturating_add(MARGIN.min(area.height.saturating_sub(height)));
    let toast = Rect { x, y, width, height };

    let color = match notification.severity {
        Severity::Info => Color::Cyan,
        Severity::Destructive => Color::Red,
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(Span::styled(
            format!(" {} ", notification.title),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
    let paragraph = Paragraph::new(Line::from(notification.description.clone()))
        .wrap(Wrap { trim: true })
        .block(block);

    frame.render_widget(Clear, toast);
    frame.render_widget(paragraph, toast);
}
