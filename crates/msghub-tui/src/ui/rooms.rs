//! Rooms sidebar
//!
//! Every room the hub listed, in order, with the selection and unread
//! markers.

use msghub_app::App;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};

/// Left and right border columns.
const BORDER_WIDTH: usize = 2;

const ACTIVE_PREFIX: &str = ">";
const INACTIVE_PREFIX: &str = " ";
const UNREAD_MARKER: &str = "*";
const EMPTY_MARKER: &str = "";

enum RoomDisplayState {
    Active,
    Unread,
    Normal,
}

/// Columns one sidebar entry for `room` needs, borders included.
pub(super) fn entry_width(room: &str) -> usize {
    BORDER_WIDTH + ACTIVE_PREFIX.len() + Span::raw(room).width() + UNREAD_MARKER.len()
}

/// Render the rooms sidebar.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .rooms()
        .iter()
        .map(|room| {
            let state = if app.session().is_selected(room) {
                RoomDisplayState::Active
            } else if app.history().is_unread(room) {
                RoomDisplayState::Unread
            } else {
                RoomDisplayState::Normal
            };

            let (prefix, suffix, style) = match state {
                RoomDisplayState::Active => (
                    ACTIVE_PREFIX,
                    EMPTY_MARKER,
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ),
                RoomDisplayState::Unread => {
                    (INACTIVE_PREFIX, UNREAD_MARKER, Style::default().fg(Color::Cyan))
                },
                RoomDisplayState::Normal => (INACTIVE_PREFIX, EMPTY_MARKER, Style::default()),
            };

            ListItem::new(Line::from(vec![
                Span::raw(prefix),
                Span::styled(room.as_str(), style),
                Span::styled(suffix, Style::default().fg(Color::Red)),
            ]))
        })
        .collect();

    let title = format!(" Rooms ({}) ", app.rooms().len());
    let block = Block::default().borders(Borders::ALL).title(title);
    let list = List::new(items).block(block);

    frame.render_widget(list, area);
}
