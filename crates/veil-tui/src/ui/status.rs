//! Status bar
//!
//! Displays connectivity, matchmaking progress and key hints.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use veil_app::App;

const KEY_HINTS: &str = " | Tab: next chat | /new /view /image /voice /settings | Esc: quit";

/// Render the status bar.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let connection = if app.is_online() {
        Span::styled("Online", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
    } else {
        Span::styled("Offline, reconnecting...", Style::default().fg(Color::Red))
    };

    let mut spans = vec![Span::raw(" "), connection];
    if app.is_matching() {
        spans.push(Span::styled(" | Finding a partner...", Style::default().fg(Color::Yellow)));
    }
    spans.push(Span::styled(KEY_HINTS, Style::default().fg(Color::Gray)));

    let paragraph = Paragraph::new(Line::from(spans))
        .style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(paragraph, area);
}
