//! Application state machine.
//!
//! This module defines the [`App`] state machine, which owns everything the
//! client knows about the hub: the session, the room list and the per-room
//! history. It is completely decoupled from I/O and timing.
//!
//! This is a pure state machine: it consumes [`crate::AppEvent`] inputs and
//! user intents, and produces [`crate::AppAction`] instructions for the
//! runtime to execute.
//!
//! # Responsibilities
//!
//! - Dispatches each decoded [`SyncEvent`] by kind.
//! - Keeps the room list sorted and the selection consistent with it.
//! - Renders message-class events into the history store.
//! - Validates user intents before they become commands.

use msghub_proto::{ChatEvent, ChatKind, Command, SyncEvent, capitalize_first};

use crate::{
    AppAction, AppError, AppEvent, HistoryStore, Intent, RoomHistory, Session, Templates,
    render_entry,
};

/// Application state machine.
///
/// Pure state machine that processes events and produces actions.
/// No I/O dependencies, so it can be driven directly in tests.
#[derive(Debug, Clone)]
pub struct App {
    /// Username and selected room.
    session: Session,
    /// Markup templates fetched at bootstrap.
    templates: Templates,
    /// Per-room rendered history.
    history: HistoryStore,
    /// Last room list from the hub, sorted.
    rooms: Vec<String>,
    /// Transient status message. `None` if no message.
    status_message: Option<String>,
}

impl App {
    /// Create an App for a bootstrapped session.
    pub fn new(username: impl Into<String>, templates: Templates) -> Self {
        Self {
            session: Session::new(username),
            templates,
            history: HistoryStore::new(),
            rooms: Vec::new(),
            status_message: None,
        }
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: AppEvent) -> Vec<AppAction> {
        match event {
            AppEvent::Sync(SyncEvent::RoomList { rooms, error: None }) => {
                self.replace_rooms(rooms);
                vec![AppAction::Render]
            },
            AppEvent::Sync(SyncEvent::RoomList { error: Some(error), .. }) => {
                tracing::warn!(%error, "hub rejected room list request");
                self.status_message = Some(capitalize_first(&error));
                vec![AppAction::Render]
            },
            AppEvent::Sync(SyncEvent::Chat { kind, event }) => self.append_chat(kind, &event),
            AppEvent::Sync(SyncEvent::Unrecognized { kind }) => {
                tracing::warn!(%kind, "ignoring event of unrecognized kind");
                vec![]
            },
            AppEvent::PollFailed { message } => {
                self.status_message = Some(format!("Error: {message}"));
                vec![AppAction::Render]
            },
            AppEvent::CommandFailed { kind, message } => {
                self.status_message = Some(format!("Error: {kind} failed: {message}"));
                vec![AppAction::Render]
            },
        }
    }

    fn replace_rooms(&mut self, mut rooms: Vec<String>) {
        rooms.sort_unstable();
        rooms.dedup();
        self.rooms = rooms;

        if let Some(selected) = self.session.selected_room()
            && !self.is_listed(selected)
        {
            tracing::debug!(room = selected, "selected room no longer listed");
            self.session.clear_selection();
        }
    }

    fn append_chat(&mut self, kind: ChatKind, event: &ChatEvent) -> Vec<AppAction> {
        let entry = render_entry(event, &self.templates, self.session.username());
        let selected = self.session.is_selected(&event.room);

        let history = self.history.append(&event.room, entry);
        let newly_unread = !selected && !history.unread;
        if !selected {
            history.unread = true;
        }

        let mut actions = Vec::new();
        if selected || newly_unread {
            actions.push(AppAction::Render);
        }
        if kind.refreshes_room_list() {
            actions.push(AppAction::ScheduleListRefresh);
        }
        actions
    }

    /// Dispatch a user intent to the matching method.
    pub fn apply(&mut self, intent: Intent) -> Vec<AppAction> {
        match intent {
            Intent::RefreshRooms => self.list_rooms(),
            Intent::Join(room) => self.join_room(&room),
            Intent::Leave(room) => self.leave_room(&room),
            Intent::Create(room) => self.create_room(&room),
            Intent::Destroy(room) => self.destroy_room(&room),
            Intent::Select(room) => self.select_room(&room),
            Intent::Send(text) => self.send_message(text),
            Intent::Exit => self.exit(),
        }
    }

    /// Ask the hub for the current room list.
    pub fn list_rooms(&self) -> Vec<AppAction> {
        vec![AppAction::Send(Command::List)]
    }

    /// Subscribe to `room`.
    pub fn join_room(&mut self, room: &str) -> Vec<AppAction> {
        self.room_command("join", room, |room| Command::Join { room })
    }

    /// Unsubscribe from `room`.
    pub fn leave_room(&mut self, room: &str) -> Vec<AppAction> {
        self.room_command("leave", room, |room| Command::Leave { room })
    }

    /// Create a room named `room`.
    pub fn create_room(&mut self, room: &str) -> Vec<AppAction> {
        self.room_command("create", room, |room| Command::Create { room })
    }

    /// Destroy `room`.
    pub fn destroy_room(&mut self, room: &str) -> Vec<AppAction> {
        self.room_command("destroy", room, |room| Command::Destroy { room })
    }

    fn room_command(
        &mut self,
        command: &'static str,
        room: &str,
        build: impl FnOnce(String) -> Command,
    ) -> Vec<AppAction> {
        let room = room.trim();
        if room.is_empty() {
            return self.reject(AppError::EmptyRoomName { command });
        }
        vec![AppAction::Send(build(room.to_string()))]
    }

    /// Post `text` to the selected room.
    ///
    /// Rejected locally, without producing a command, when no room is
    /// selected.
    pub fn send_message(&mut self, text: impl Into<String>) -> Vec<AppAction> {
        let Some(room) = self.session.selected_room() else {
            return self.reject(AppError::NoRoomSelected);
        };
        vec![AppAction::Send(Command::NewMsg { room: room.to_string(), text: text.into() })]
    }

    /// Make `room` the current room.
    ///
    /// Only rooms in the last room list can be selected. Selecting clears the
    /// room's unread flag.
    pub fn select_room(&mut self, room: &str) -> Vec<AppAction> {
        if !self.is_listed(room) {
            return self.reject(AppError::UnknownRoom(room.to_string()));
        }
        self.session.select(room.to_string());
        self.history.mark_read(room);
        self.status_message = None;
        vec![AppAction::Render]
    }

    /// Select the room after (or before, if `forward` is false) the current
    /// one, wrapping around. Selects the first room if none is selected.
    pub fn cycle_room(&mut self, forward: bool) -> Vec<AppAction> {
        if self.rooms.is_empty() {
            return vec![];
        }
        let len = self.rooms.len();
        let next = match self.session.selected_room().and_then(|s| self.position(s)) {
            Some(i) if forward => (i + 1) % len,
            Some(i) => (i + len - 1) % len,
            None => 0,
        };
        let room = self.rooms[next].clone();
        self.select_room(&room)
    }

    /// End the session.
    pub fn exit(&self) -> Vec<AppAction> {
        vec![AppAction::Quit]
    }

    fn reject(&mut self, error: AppError) -> Vec<AppAction> {
        tracing::debug!(%error, "rejected locally");
        self.status_message = Some(error.to_string());
        vec![AppAction::Render]
    }

    fn is_listed(&self, room: &str) -> bool {
        self.position(room).is_some()
    }

    fn position(&self, room: &str) -> Option<usize> {
        self.rooms.binary_search_by(|r| r.as_str().cmp(room)).ok()
    }

    /// Set a status message to display to the user.
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Session username.
    pub fn username(&self) -> &str {
        self.session.username()
    }

    /// Session state.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Currently selected room.
    pub fn selected_room(&self) -> Option<&str> {
        self.session.selected_room()
    }

    /// History of the selected room, if it has any.
    pub fn selected_history(&self) -> Option<&RoomHistory> {
        self.selected_room().and_then(|room| self.history.get(room))
    }

    /// Known rooms, sorted lexicographically.
    pub fn rooms(&self) -> &[String] {
        &self.rooms
    }

    /// Room button markup for every known room, in list order.
    pub fn room_buttons(&self) -> Vec<String> {
        self.rooms.iter().map(|room| self.templates.room_button(room)).collect()
    }

    /// All room histories.
    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    /// Templates in use.
    pub fn templates(&self) -> &Templates {
        &self.templates
    }

    /// Current status message.
    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use msghub_proto::EventKind;

    use super::*;
    use crate::EntryStyle;

    fn app() -> App {
        App::new(
            "alice",
            Templates::parse(
                "<me>name_placeholder|message_placeholder</me>",
                "<other>name_placeholder|message_placeholder</other>",
                "<btn>name_placeholder</btn>",
            ),
        )
    }

    fn list(rooms: &[&str]) -> AppEvent {
        AppEvent::Sync(SyncEvent::RoomList {
            rooms: rooms.iter().map(|r| (*r).to_string()).collect(),
            error: None,
        })
    }

    fn chat(kind: ChatKind, room: &str, username: &str, text: &str) -> AppEvent {
        AppEvent::Sync(SyncEvent::Chat {
            kind,
            event: ChatEvent {
                room: room.into(),
                username: username.into(),
                text: text.into(),
                error: None,
            },
        })
    }

    #[test]
    fn room_list_is_sorted() {
        let mut app = app();
        let actions = app.handle(list(&["beta", "alpha", "gamma"]));

        assert_eq!(actions, vec![AppAction::Render]);
        assert_eq!(app.rooms(), ["alpha", "beta", "gamma"]);
        assert_eq!(app.room_buttons()[0], "<btn>alpha</btn>");
    }

    #[test]
    fn selection_survives_refresh_when_still_listed() {
        let mut app = app();
        app.handle(list(&["alpha", "beta"]));
        app.select_room("beta");

        app.handle(list(&["gamma", "beta"]));
        assert_eq!(app.selected_room(), Some("beta"));

        app.handle(list(&["gamma"]));
        assert_eq!(app.selected_room(), None);
    }

    #[test]
    fn failed_list_keeps_rooms_and_reports() {
        let mut app = app();
        app.handle(list(&["alpha"]));

        let actions = app.handle(AppEvent::Sync(SyncEvent::RoomList {
            rooms: vec![],
            error: Some("no name is associated with client ID".into()),
        }));

        assert_eq!(actions, vec![AppAction::Render]);
        assert_eq!(app.rooms(), ["alpha"]);
        assert_eq!(app.status_message(), Some("No name is associated with client ID"));
    }

    #[test]
    fn message_to_unselected_room_marks_unread_once() {
        let mut app = app();
        app.handle(list(&["alpha"]));

        let first = app.handle(chat(ChatKind::NewMsg, "alpha", "bob", "hi"));
        let second = app.handle(chat(ChatKind::NewMsg, "alpha", "bob", "again"));

        assert_eq!(first, vec![AppAction::Render]);
        assert!(second.is_empty());
        assert!(app.history().is_unread("alpha"));

        app.select_room("alpha");
        assert!(!app.history().is_unread("alpha"));
    }

    #[test]
    fn message_to_selected_room_renders() {
        let mut app = app();
        app.handle(list(&["alpha"]));
        app.select_room("alpha");

        let actions = app.handle(chat(ChatKind::Join, "alpha", "alice", "joined"));

        assert_eq!(actions, vec![AppAction::Render]);
        let history = app.selected_history().map(RoomHistory::entries).unwrap_or_default();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].style, EntryStyle::Own);
        assert!(!app.history().is_unread("alpha"));
    }

    #[test]
    fn create_and_destroy_schedule_refresh() {
        let mut app = app();
        for kind in [ChatKind::Create, ChatKind::Destroy] {
            let actions = app.handle(chat(kind, "delta", "bob", "x"));
            assert!(actions.contains(&AppAction::ScheduleListRefresh), "{kind:?}");
        }
        for kind in [ChatKind::NewMsg, ChatKind::Join, ChatKind::Leave] {
            let actions = app.handle(chat(kind, "delta", "bob", "x"));
            assert!(!actions.contains(&AppAction::ScheduleListRefresh), "{kind:?}");
        }
        assert_eq!(app.history().get("delta").map(RoomHistory::len), Some(5));
    }

    #[test]
    fn history_is_kept_for_unlisted_rooms() {
        let mut app = app();
        app.handle(chat(ChatKind::NewMsg, "ghost", "bob", "boo"));
        app.handle(list(&["alpha"]));

        assert_eq!(app.history().get("ghost").map(RoomHistory::len), Some(1));
    }

    #[test]
    fn unrecognized_kind_changes_nothing() {
        let mut app = app();
        app.handle(list(&["alpha"]));
        let before = (app.rooms().to_vec(), app.history().clone());

        let actions = app.handle(AppEvent::Sync(SyncEvent::Unrecognized { kind: "set_name".into() }));

        assert!(actions.is_empty());
        assert_eq!((app.rooms().to_vec(), app.history().clone()), before);
    }

    #[test]
    fn send_without_selection_is_rejected() {
        let mut app = app();
        let actions = app.send_message("hello");

        assert_eq!(actions, vec![AppAction::Render]);
        assert_eq!(app.status_message(), Some(AppError::NoRoomSelected.to_string().as_str()));
    }

    #[test]
    fn send_targets_selected_room() {
        let mut app = app();
        app.handle(list(&["alpha"]));
        app.select_room("alpha");

        assert_eq!(
            app.send_message("hello"),
            vec![AppAction::Send(Command::NewMsg { room: "alpha".into(), text: "hello".into() })]
        );
    }

    #[test]
    fn room_commands_require_a_name() {
        let mut app = app();
        assert_eq!(app.join_room("  "), vec![AppAction::Render]);
        assert_eq!(app.status_message(), Some("/join needs a room name"));

        assert_eq!(
            app.create_room(" lounge "),
            vec![AppAction::Send(Command::Create { room: "lounge".into() })]
        );
    }

    #[test]
    fn selecting_unknown_room_is_rejected() {
        let mut app = app();
        app.select_room("nowhere");
        assert_eq!(app.selected_room(), None);
        assert!(app.status_message().is_some());
    }

    #[test]
    fn cycle_wraps_around() {
        let mut app = app();
        app.handle(list(&["b", "a", "c"]));

        app.cycle_room(true);
        assert_eq!(app.selected_room(), Some("a"));
        app.cycle_room(false);
        assert_eq!(app.selected_room(), Some("c"));
        app.cycle_room(true);
        assert_eq!(app.selected_room(), Some("a"));
    }

    #[test]
    fn apply_maps_intents() {
        let mut app = app();
        assert_eq!(app.apply(Intent::RefreshRooms), vec![AppAction::Send(Command::List)]);
        assert_eq!(
            app.apply(Intent::Leave("a".into())),
            vec![AppAction::Send(Command::Leave { room: "a".into() })]
        );
        assert_eq!(
            app.apply(Intent::Destroy("a".into())),
            vec![AppAction::Send(Command::Destroy { room: "a".into() })]
        );
        assert_eq!(app.apply(Intent::Exit), vec![AppAction::Quit]);
    }

    #[test]
    fn failures_surface_on_status_line() {
        let mut app = app();
        app.handle(AppEvent::CommandFailed {
            kind: EventKind::List,
            message: "connection failed".into(),
        });
        assert_eq!(app.status_message(), Some("Error: list failed: connection failed"));

        app.handle(AppEvent::PollFailed { message: "timed out".into() });
        assert_eq!(app.status_message(), Some("Error: timed out"));
    }
}
