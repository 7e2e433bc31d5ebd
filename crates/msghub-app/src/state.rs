//! Session and per-room history state.

use std::collections::HashMap;

use crate::RenderedEntry;

/// Per-session identity and selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    username: String,
    selected_room: Option<String>,
}

impl Session {
    /// Start a session for `username` with nothing selected.
    pub fn new(username: impl Into<String>) -> Self {
        Self { username: username.into(), selected_room: None }
    }

    /// Name the hub assigned this client. Fixed for the session.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Currently selected room, if any.
    pub fn selected_room(&self) -> Option<&str> {
        self.selected_room.as_deref()
    }

    /// Whether `room` is the selected room.
    pub fn is_selected(&self, room: &str) -> bool {
        self.selected_room.as_deref() == Some(room)
    }

    pub(crate) fn select(&mut self, room: String) {
        self.selected_room = Some(room);
    }

    pub(crate) fn clear_selection(&mut self) {
        self.selected_room = None;
    }
}

/// Accumulated history for one room.
///
/// Entries are only ever appended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomHistory {
    entries: Vec<RenderedEntry>,
    /// Entries arrived while the room was not selected.
    pub unread: bool,
}

impl RoomHistory {
    /// Entries in arrival order.
    pub fn entries(&self) -> &[RenderedEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entries have arrived yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entry markup concatenated, oldest first.
    pub fn markup(&self) -> String {
        self.entries.iter().map(|e| e.markup.as_str()).collect()
    }

    fn push(&mut self, entry: RenderedEntry) {
        self.entries.push(entry);
    }
}

/// History for every room this session has seen an event for.
///
/// Buffers are created lazily on the first event for a room and live for the
/// rest of the session, including after the room disappears from the list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryStore {
    rooms: HashMap<String, RoomHistory>,
}

impl HistoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `entry` to `room`, creating the buffer if needed.
    pub fn append(&mut self, room: &str, entry: RenderedEntry) -> &mut RoomHistory {
        let history = self.rooms.entry(room.to_string()).or_default();
        history.push(entry);
        history
    }

    /// History for `room`, if any event for it has arrived.
    pub fn get(&self, room: &str) -> Option<&RoomHistory> {
        self.rooms.get(room)
    }

    /// Whether `room` has unseen entries.
    pub fn is_unread(&self, room: &str) -> bool {
        self.rooms.get(room).is_some_and(|h| h.unread)
    }

    /// Clear the unread flag on `room`. Returns whether it was set.
    pub fn mark_read(&mut self, room: &str) -> bool {
        self.rooms.get_mut(room).is_some_and(|h| std::mem::take(&mut h.unread))
    }

    /// Number of rooms with a buffer.
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    /// Whether no buffer exists yet.
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Iterate over `(room, history)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RoomHistory)> {
        self.rooms.iter().map(|(room, history)| (room.as_str(), history))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EntryStyle;

    fn entry(markup: &str) -> RenderedEntry {
        RenderedEntry {
            style: EntryStyle::Other,
            username: "bob".into(),
            message: markup.into(),
            is_error: false,
            markup: markup.into(),
        }
    }

    #[test]
    fn buffer_is_created_on_first_append() {
        let mut store = HistoryStore::new();
        assert!(store.get("lobby").is_none());

        store.append("lobby", entry("<a/>"));
        store.append("lobby", entry("<b/>"));

        let history = store.get("lobby").map(RoomHistory::markup);
        assert_eq!(history.as_deref(), Some("<a/><b/>"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn rooms_are_independent() {
        let mut store = HistoryStore::new();
        store.append("a", entry("1"));
        store.append("b", entry("2"));
        store.append("a", entry("3"));

        assert_eq!(store.get("a").map(RoomHistory::len), Some(2));
        assert_eq!(store.get("b").map(RoomHistory::len), Some(1));
    }

    #[test]
    fn mark_read_reports_previous_flag() {
        let mut store = HistoryStore::new();
        store.append("a", entry("1")).unread = true;

        assert!(store.is_unread("a"));
        assert!(store.mark_read("a"));
        assert!(!store.mark_read("a"));
        assert!(!store.mark_read("missing"));
    }

    #[test]
    fn session_selection() {
        let mut session = Session::new("alice");
        assert_eq!(session.selected_room(), None);

        session.select("lobby".into());
        assert!(session.is_selected("lobby"));
        assert!(!session.is_selected("other"));

        session.clear_selection();
        assert_eq!(session.selected_room(), None);
        assert_eq!(session.username(), "alice");
    }
}
