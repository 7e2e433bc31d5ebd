//! Observable App state.

use std::collections::{BTreeMap, BTreeSet};

use msghub_app::App;

/// What a user could observe of an [`App`] at one instant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppSnapshot {
    /// Room list in display order.
    pub rooms: Vec<String>,
    /// Selected room.
    pub selected_room: Option<String>,
    /// Entry count per room with history.
    pub history_lens: BTreeMap<String, usize>,
    /// Rooms flagged unread.
    pub unread: BTreeSet<String>,
}

impl AppSnapshot {
    /// Capture `app`.
    pub fn from_app(app: &App) -> Self {
        let history = app.history();
        Self {
            rooms: app.rooms().to_vec(),
            selected_room: app.selected_room().map(str::to_string),
            history_lens: history.iter().map(|(room, h)| (room.to_string(), h.len())).collect(),
            unread: history
                .iter()
                .filter(|(_, h)| h.unread)
                .map(|(room, _)| room.to_string())
                .collect(),
        }
    }
}
