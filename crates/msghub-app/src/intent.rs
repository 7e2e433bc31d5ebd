//! User intents.

/// Something the user asked for, independent of how they asked.
///
/// Frontends translate clicks, key presses or typed commands into intents and
/// hand them to [`crate::App::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Re-fetch the room list.
    RefreshRooms,
    /// Join the named room.
    Join(String),
    /// Leave the named room.
    Leave(String),
    /// Create a room with this name.
    Create(String),
    /// Destroy the named room.
    Destroy(String),
    /// Make the named room the current one.
    Select(String),
    /// Post a message to the current room.
    Send(String),
    /// End the session.
    Exit,
}
