//! Client-initiated commands.
//!
//! Commands are one-way. The hub's reply to the POST itself carries nothing;
//! success or failure surfaces later as a [`crate::SyncEvent`] on a
//! subsequent poll, e.g. a failed join arrives as a `join` event with `Error`
//! set.

use serde::{Deserialize, Serialize};

use crate::{
    ChatKind, EventKind,
    errors::{ProtocolError, Result},
};

/// A user intent destined for the hub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Ask for the full room list.
    List,
    /// Subscribe to a room.
    Join {
        /// Target room.
        room: String,
    },
    /// Unsubscribe from a room.
    Leave {
        /// Target room.
        room: String,
    },
    /// Create a room.
    Create {
        /// Name of the new room.
        room: String,
    },
    /// Destroy a room.
    Destroy {
        /// Target room.
        room: String,
    },
    /// Post a message to a room.
    NewMsg {
        /// Target room.
        room: String,
        /// Message body.
        text: String,
    },
}

impl Command {
    /// Kind this command is sent as.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::List => EventKind::List,
            Self::Join { .. } => EventKind::Chat(ChatKind::Join),
            Self::Leave { .. } => EventKind::Chat(ChatKind::Leave),
            Self::Create { .. } => EventKind::Chat(ChatKind::Create),
            Self::Destroy { .. } => EventKind::Chat(ChatKind::Destroy),
            Self::NewMsg { .. } => EventKind::Chat(ChatKind::NewMsg),
        }
    }

    /// Room this command targets. `None` for `list`.
    pub fn room(&self) -> Option<&str> {
        match self {
            Self::List => None,
            Self::Join { room }
            | Self::Leave { room }
            | Self::Create { room }
            | Self::Destroy { room }
            | Self::NewMsg { room, .. } => Some(room),
        }
    }

    /// Wire record for this command.
    pub fn to_request(&self) -> CommandRequest {
        let text = match self {
            Self::NewMsg { text, .. } => Some(text.clone()),
            _ => None,
        };
        CommandRequest {
            kind: self.kind().as_str().to_string(),
            room: self.room().map(str::to_string),
            text,
        }
    }
}

/// Command as posted to `/request/`.
///
/// Absent fields are omitted entirely rather than sent empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRequest {
    /// Command kind name.
    #[serde(rename = "Type")]
    pub kind: String,
    /// Target room.
    #[serde(rename = "Room", default, skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    /// Message body.
    #[serde(rename = "Text", default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl TryFrom<CommandRequest> for Command {
    type Error = ProtocolError;

    fn try_from(request: CommandRequest) -> Result<Self> {
        let kind = request.kind.parse::<EventKind>()?;
        let EventKind::Chat(chat_kind) = kind else {
            return Ok(Self::List);
        };

        let room = request
            .room
            .filter(|r| !r.is_empty())
            .ok_or(ProtocolError::MissingRoom { kind: chat_kind.as_str() })?;

        Ok(match chat_kind {
            ChatKind::Join => Self::Join { room },
            ChatKind::Leave => Self::Leave { room },
            ChatKind::Create => Self::Create { room },
            ChatKind::Destroy => Self::Destroy { room },
            ChatKind::NewMsg => Self::NewMsg { room, text: request.text.unwrap_or_default() },
        })
    }
}
