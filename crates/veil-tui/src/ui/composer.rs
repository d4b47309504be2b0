//! Composer
//!
//! Displays the draft with cursor. Disabled while offline.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
};
use veil_app::App;

const PROMPT_WIDTH: u16 = 3; // "> "
const INPUT_LINE_OFFSET_Y: u16 = 1; // inside top border
const RIGHT_PADDING: u16 = 1; // inside right border

/// Render the composer.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL);

    if !app.is_online() {
        let paragraph = Paragraph::new("> Reconnecting...")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let paragraph = if app.draft().is_empty() {
        Paragraph::new("> Type a message...").style(Style::default().fg(Color::DarkGray))
    } else {
        Paragraph::new(format!("> {}", app.draft())).style(Style::default().fg(Color::White))
    };
    frame.render_widget(paragraph.block(block), area);

    let available_width = area.width.saturating_sub(PROMPT_WIDTH + RIGHT_PADDING);
    let cursor_offset = u16::try_from(app.cursor()).unwrap_or(u16::MAX).min(available_width);

    let cursor_x = area.x.saturating_add(PROMPT_WIDTH).saturating_add(cursor_offset);
    let cursor_y = area.y.saturating_add(INPUT_LINE_OFFSET_Y);
    let max_x = area.x.saturating_add(area.width).saturating_sub(RIGHT_PADDING);
    let cursor_x = cursor_x.min(max_x);

    frame.set_cursor_position((cursor_x, cursor_y));
}
