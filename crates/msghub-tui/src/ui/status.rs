//! Status bar
//!
//! Displays the session user, room information and the latest status
//! message.

use msghub_app::{App, RoomHistory};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

/// Render the status bar.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let user = Span::styled(
        app.username().to_string(),
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
    );

    let room_info = match app.selected_room() {
        Some(room) => {
            let msg_count = app.selected_history().map_or(0, RoomHistory::len);
            format!(" | Room: {room} | Messages: {msg_count} | Rooms: {}", app.rooms().len())
        },
        None => format!(" | Rooms: {}", app.rooms().len()),
    };

    let mut spans = vec![Span::raw(" "), user, Span::raw(room_info)];
    if let Some(message) = app.status_message() {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(message, Style::default().fg(Color::Yellow)));
    }

    let paragraph =
        Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(paragraph, area);
}
