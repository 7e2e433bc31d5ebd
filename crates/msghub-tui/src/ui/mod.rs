//! UI rendering
//!
//! Rendering functions that convert App state into terminal output using
//! ratatui widgets. Nothing here does I/O or mutates state.
//!
//! The screen is the room sidebar beside the selected room's history, with
//! the compose box and a status line underneath. The sidebar grows to fit
//! the longest room name, up to a third of the screen.

mod chat;
mod input;
mod rooms;
mod status;

use msghub_app::App;
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
};

use crate::InputState;

const INPUT_HEIGHT: u16 = 3;
const STATUS_HEIGHT: u16 = 1;
const SIDEBAR_MIN_WIDTH: u16 = 14;
const CHAT_MIN_WIDTH: u16 = 20;

/// Render the entire UI.
pub fn render(frame: &mut Frame, app: &App, input_state: &InputState) {
    let [main_area, input_area, status_area] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(INPUT_HEIGHT),
        Constraint::Length(STATUS_HEIGHT),
    ])
    .areas(frame.area());

    let [rooms_area, chat_area] = Layout::horizontal([
        Constraint::Length(sidebar_width(app, main_area.width)),
        Constraint::Min(CHAT_MIN_WIDTH),
    ])
    .areas(main_area);

    rooms::render(frame, app, rooms_area);
    chat::render(frame, app, chat_area);
    input::render(frame, app, input_state, input_area);
    status::render(frame, app, status_area);
}

/// Sidebar width for the current room list within `available` columns.
fn sidebar_width(app: &App, available: u16) -> u16 {
    let widest = app.rooms().iter().map(|room| rooms::entry_width(room)).max().unwrap_or(0);
    let widest = u16::try_from(widest).unwrap_or(u16::MAX);
    let ceiling = (available / 3).max(SIDEBAR_MIN_WIDTH);
    widest.clamp(SIDEBAR_MIN_WIDTH, ceiling)
}

#[cfg(test)]
mod tests {
    use msghub_app::AppEvent;
    use msghub_harness::sim_templates;
    use msghub_proto::SyncEvent;

    use super::*;

    fn app_with_rooms(rooms: &[&str]) -> App {
        let mut app = App::new("alice", sim_templates());
        app.handle(AppEvent::Sync(SyncEvent::RoomList {
            rooms: rooms.iter().map(|r| (*r).to_string()).collect(),
            error: None,
        }));
        app
    }

    #[test]
    fn sidebar_fits_longest_room_name() {
        let app = app_with_rooms(&["den", "general-discussion"]);
        // Borders, selection prefix and unread marker around the name.
        assert_eq!(sidebar_width(&app, 120), 22);
    }

    #[test]
    fn sidebar_keeps_minimum_for_short_or_no_rooms() {
        assert_eq!(sidebar_width(&app_with_rooms(&[]), 120), SIDEBAR_MIN_WIDTH);
        assert_eq!(sidebar_width(&app_with_rooms(&["a"]), 120), SIDEBAR_MIN_WIDTH);
    }

    #[test]
    fn sidebar_is_capped_at_a_third() {
        let app = app_with_rooms(&["a-very-long-room-name-that-keeps-going"]);
        assert_eq!(sidebar_width(&app, 60), 20);
    }
}
