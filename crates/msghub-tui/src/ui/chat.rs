//! Chat area
//!
//! Displays the history of the selected room, newest at the bottom.

use msghub_app::{App, EntryStyle, RenderedEntry};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};

const BORDER_SIZE: u16 = 2;

/// Render the chat area.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let title = app.selected_room().map_or_else(|| " No Room ".to_string(), |room| format!(" {room} "));
    let block = Block::default().borders(Borders::ALL).title(title);

    let items: Vec<ListItem> = match (app.selected_room(), app.selected_history()) {
        (None, _) => vec![hint("Select a room with Tab or /select <room>")],
        (Some(_), None) => vec![hint("No messages yet")],
        (Some(_), Some(history)) => history.entries().iter().map(entry_item).collect(),
    };

    let visible_height = usize::from(area.height.saturating_sub(BORDER_SIZE));
    let skip = items.len().saturating_sub(visible_height);
    let visible_items: Vec<_> = items.into_iter().skip(skip).collect();

    let list = List::new(visible_items).block(block);

    frame.render_widget(list, area);
}

fn hint(text: &str) -> ListItem<'_> {
    ListItem::new(Line::from(Span::styled(text, Style::default().fg(Color::DarkGray))))
}

fn entry_item(entry: &RenderedEntry) -> ListItem<'_> {
    let name_color = match entry.style {
        EntryStyle::Own => Color::Green,
        EntryStyle::Other => Color::Cyan,
    };
    let message_style =
        if entry.is_error { Style::default().fg(Color::Red) } else { Style::default() };

    ListItem::new(Line::from(vec![
        Span::styled(
            format!("<{}>", entry.username),
            Style::default().fg(name_color).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(entry.message.as_str(), message_style),
    ]))
}
