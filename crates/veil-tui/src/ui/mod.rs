//! UI rendering
//!
//! Rendering functions that convert App state into terminal output using
//! ratatui widgets. All functions are pure (no I/O), taking state and
//! drawing into the frame.

mod chat;
mod composer;
mod sidebar;
mod status;
mod toast;
mod viewer;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
};
use veil_app::{App, Route};

/// Below this width the chat list becomes an overlay toggled with `/chats`.
pub const NARROW_WIDTH: u16 = 60;

/// Render the entire UI.
pub fn render(frame: &mut Frame, app: &App) {
    const MAIN_AREA_MIN_HEIGHT: u16 = 3;
    const COMPOSER_HEIGHT: u16 = 3;
    const STATUS_HEIGHT: u16 = 1;

    let area = frame.area();

    if *app.route() == Route::Chat {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(MAIN_AREA_MIN_HEIGHT),
                Constraint::Length(COMPOSER_HEIGHT),
                Constraint::Length(STATUS_HEIGHT),
            ])
            .split(area);

        let [main_area, composer_area, status_area] = chunks.as_ref() else {
            return;
        };

        render_main_area(frame, app, *main_area);
        composer::render(frame, app, *composer_area);
        status::render(frame, app, *status_area);
    } else {
        viewer::render(frame, app.route(), area);
    }

    if let Some(notification) = app.notification() {
        toast::render(frame, notification, area);
    }
}

/// Render the main area (chat list + conversation).
fn render_main_area(frame: &mut Frame, app: &App, area: Rect) {
    const SIDEBAR_WIDTH: u16 = 34;
    const CHAT_AREA_MIN_WIDTH: u16 = 20;

    if area.width < NARROW_WIDTH {
        if app.sidebar_open() {
            sidebar::render(frame, app, area);
        } else {
            chat::render(frame, app, area);
        }
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(CHAT_AREA_MIN_WIDTH)])
        .split(area);

    let [sidebar_area, chat_area] = chunks.as_ref() else {
        return;
    };

    sidebar::render(frame, app, *sidebar_area);
    chat::render(frame, app, *chat_area);
}
