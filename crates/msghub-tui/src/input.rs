//! Input handling
//!
//! Line editing for the message box. A completed line is parsed into a
//! [`Command`] and turned into an [`Intent`] for the App.

use msghub_app::{App, AppAction, Intent};

use crate::commands::{self, Command};

/// Key input abstraction, decoupled from crossterm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// Printable character.
    Char(char),
    /// Enter key.
    Enter,
    /// Backspace key.
    Backspace,
    /// Delete key.
    Delete,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Home key.
    Home,
    /// End key.
    End,
    /// Tab key.
    Tab,
    /// Shift+Tab.
    BackTab,
    /// Escape key.
    Esc,
    /// Ctrl+C.
    Interrupt,
}

const EXIT_PROMPT: &str = "Press Esc again to exit";

/// Input line state.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    buffer: String,
    /// Cursor position, in chars.
    cursor: usize,
    confirm_exit: bool,
}

impl InputState {
    /// Create an empty input line.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current line contents.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Cursor position in chars.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Apply one key to the line and the App.
    pub fn handle_key(&mut self, key: KeyInput, app: &mut App) -> Vec<AppAction> {
        if key == KeyInput::Esc {
            return self.handle_esc(app);
        }
        self.confirm_exit = false;

        match key {
            KeyInput::Char(c) => {
                let at = self.byte_offset(self.cursor);
                self.buffer.insert(at, c);
                self.cursor += 1;
            },
            KeyInput::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let at = self.byte_offset(self.cursor);
                    self.buffer.remove(at);
                }
            },
            KeyInput::Delete => {
                if self.cursor < self.char_len() {
                    let at = self.byte_offset(self.cursor);
                    self.buffer.remove(at);
                }
            },
            KeyInput::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyInput::Right => self.cursor = (self.cursor + 1).min(self.char_len()),
            KeyInput::Home => self.cursor = 0,
            KeyInput::End => self.cursor = self.char_len(),
            KeyInput::Enter => return self.handle_enter(app),
            KeyInput::Tab | KeyInput::Down => return app.cycle_room(true),
            KeyInput::BackTab | KeyInput::Up => return app.cycle_room(false),
            KeyInput::Interrupt => return app.exit(),
            KeyInput::Esc => {},
        }
        vec![AppAction::Render]
    }

    fn handle_esc(&mut self, app: &mut App) -> Vec<AppAction> {
        if self.confirm_exit {
            return app.exit();
        }
        self.confirm_exit = true;
        app.set_status(EXIT_PROMPT);
        vec![AppAction::Render]
    }

    fn handle_enter(&mut self, app: &mut App) -> Vec<AppAction> {
        let line = std::mem::take(&mut self.buffer);
        self.cursor = 0;
        if line.trim().is_empty() {
            return vec![AppAction::Render];
        }

        let intent = match commands::parse(&line) {
            Command::List => Intent::RefreshRooms,
            Command::Join { room } => Intent::Join(room),
            Command::Leave { room: Some(room) } => Intent::Leave(room),
            Command::Leave { room: None } => match app.selected_room() {
                Some(room) => Intent::Leave(room.to_string()),
                None => return Self::status(app, "Usage: /leave <room>"),
            },
            Command::Create { room } => Intent::Create(room),
            Command::Destroy { room } => Intent::Destroy(room),
            Command::Select { room } => Intent::Select(room),
            Command::Quit => Intent::Exit,
            Command::Message { text } => Intent::Send(text),
            Command::Unknown { input } => {
                return Self::status(app, format!("Unknown command: /{input}"));
            },
            Command::InvalidArgs { command, .. } => {
                return Self::status(app, format!("Usage: /{command} <room>"));
            },
        };

        tracing::debug!(?intent, "input line parsed");
        let mut actions = app.apply(intent);
        if !actions.contains(&AppAction::Render) {
            actions.push(AppAction::Render);
        }
        actions
    }

    fn status(app: &mut App, message: impl Into<String>) -> Vec<AppAction> {
        app.set_status(message);
        vec![AppAction::Render]
    }

    fn char_len(&self) -> usize {
        self.buffer.chars().count()
    }

    fn byte_offset(&self, chars: usize) -> usize {
        self.buffer.char_indices().nth(chars).map_or(self.buffer.len(), |(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use msghub_app::AppEvent;
    use msghub_harness::sim_templates;
    use msghub_proto::{Command as HubCommand, SyncEvent};

    use super::*;

    fn app_with_rooms(rooms: &[&str]) -> App {
        let mut app = App::new("alice", sim_templates());
        app.handle(AppEvent::Sync(SyncEvent::RoomList {
            rooms: rooms.iter().map(|r| (*r).to_string()).collect(),
            error: None,
        }));
        app
    }

    fn type_line(input: &mut InputState, app: &mut App, line: &str) -> Vec<AppAction> {
        for c in line.chars() {
            input.handle_key(KeyInput::Char(c), app);
        }
        input.handle_key(KeyInput::Enter, app)
    }

    #[test]
    fn editing_handles_multibyte_chars() {
        let mut app = app_with_rooms(&[]);
        let mut input = InputState::new();

        for c in "héllo".chars() {
            input.handle_key(KeyInput::Char(c), &mut app);
        }
        input.handle_key(KeyInput::Home, &mut app);
        input.handle_key(KeyInput::Right, &mut app);
        input.handle_key(KeyInput::Delete, &mut app);
        input.handle_key(KeyInput::End, &mut app);
        input.handle_key(KeyInput::Backspace, &mut app);

        assert_eq!(input.buffer(), "hll");
        assert_eq!(input.cursor(), 3);
    }

    #[test]
    fn enter_sends_message_to_selected_room() {
        let mut app = app_with_rooms(&["lobby"]);
        app.select_room("lobby");
        let mut input = InputState::new();

        let actions = type_line(&mut input, &mut app, "hi all");

        assert!(actions.contains(&AppAction::Send(HubCommand::NewMsg {
            room: "lobby".into(),
            text: "hi all".into(),
        })));
        assert!(input.buffer().is_empty());
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn join_command_becomes_request() {
        let mut app = app_with_rooms(&["lobby"]);
        let mut input = InputState::new();

        let actions = type_line(&mut input, &mut app, "/join lobby");

        assert!(actions.contains(&AppAction::Send(HubCommand::Join { room: "lobby".into() })));
    }

    #[test]
    fn bare_leave_uses_selection() {
        let mut app = app_with_rooms(&["lobby"]);
        let mut input = InputState::new();

        type_line(&mut input, &mut app, "/leave");
        assert_eq!(app.status_message(), Some("Usage: /leave <room>"));

        app.select_room("lobby");
        let actions = type_line(&mut input, &mut app, "/leave");
        assert!(actions.contains(&AppAction::Send(HubCommand::Leave { room: "lobby".into() })));
    }

    #[test]
    fn unknown_command_sets_status() {
        let mut app = app_with_rooms(&[]);
        let mut input = InputState::new();

        let actions = type_line(&mut input, &mut app, "/dance");

        assert_eq!(actions, vec![AppAction::Render]);
        assert_eq!(app.status_message(), Some("Unknown command: /dance"));
    }

    #[test]
    fn esc_needs_confirmation() {
        let mut app = app_with_rooms(&[]);
        let mut input = InputState::new();

        assert_eq!(input.handle_key(KeyInput::Esc, &mut app), vec![AppAction::Render]);
        assert_eq!(app.status_message(), Some(EXIT_PROMPT));
        assert_eq!(input.handle_key(KeyInput::Esc, &mut app), vec![AppAction::Quit]);
    }

    #[test]
    fn other_keys_cancel_exit_confirmation() {
        let mut app = app_with_rooms(&[]);
        let mut input = InputState::new();

        input.handle_key(KeyInput::Esc, &mut app);
        input.handle_key(KeyInput::Char('x'), &mut app);

        assert_eq!(input.handle_key(KeyInput::Esc, &mut app), vec![AppAction::Render]);
    }

    #[test]
    fn tab_cycles_rooms() {
        let mut app = app_with_rooms(&["a", "b"]);
        let mut input = InputState::new();

        input.handle_key(KeyInput::Tab, &mut app);
        assert_eq!(app.selected_room(), Some("a"));
        input.handle_key(KeyInput::Tab, &mut app);
        assert_eq!(app.selected_room(), Some("b"));
        input.handle_key(KeyInput::BackTab, &mut app);
        assert_eq!(app.selected_room(), Some("a"));
    }
}
