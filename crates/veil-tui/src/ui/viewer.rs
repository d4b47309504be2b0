//! Full-screen routes
//!
//! Image viewer, voice player and settings. The terminal cannot show media,
//! so viewers name the resource and how to get back.

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use veil_app::Route;

/// Render a non-chat route.
pub fn render(frame: &mut Frame, route: &Route, area: Rect) {
    let (title, body) = match route {
        Route::ImageViewer { url } => (" Image ", vec![Line::from("Viewing image"), locator(url)]),
        Route::VoicePlayer { url } => {
            (" Voice message ", vec![Line::from("▶ Playing voice message"), locator(url)])
        },
        Route::Settings => (" Settings ", vec![Line::from("Settings are not available yet.")]),
        Route::Chat => (" Chat ", vec![]),
    };

    let mut lines = body;
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Esc: back to chat",
        Style::default().fg(Color::DarkGray),
    )));

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(title));

    frame.render_widget(paragraph, area);
}

fn locator(url: &str) -> Line<'static> {
    Line::from(Span::styled(url.to_string(), Style::default().add_modifier(Modifier::UNDERLINED)))
}
