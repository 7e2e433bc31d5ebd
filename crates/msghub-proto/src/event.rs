//! Server-pushed synchronization events.
//!
//! Each `/refresh/` response carries zero or one [`EventRecord`]. The record
//! is a flat JSON object whose `Type` field selects how the remaining fields
//! are interpreted, so decoding happens in two steps: serde parses the flat
//! record, then [`SyncEvent::from_record`] lifts it into a tagged union that
//! the dispatcher can match on exhaustively.
//!
//! # Invariants
//!
//! - A [`SyncEvent::Chat`] always carries a non-empty room name. Records that
//!   violate this are rejected with [`ProtocolError::MissingRoom`].
//! - An empty `Error` string decodes to `None`, so `error.is_some()` is the
//!   only test callers need for "the server rejected something".

use std::{borrow::Cow, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::{ProtocolError, Result};

/// Separator the hub uses between names in a `list` record's `Text`.
const ROOM_LIST_SEPARATOR: &str = ", ";

/// Raw event record as it appears on the wire.
///
/// Every field defaults to the empty string so that records emitted by older
/// hubs (which omit fields they did not set) still decode. Unknown fields such
/// as `DateTime` are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventRecord {
    /// Event kind name.
    #[serde(rename = "Type")]
    pub kind: String,
    /// Room the event refers to. Empty for `list`.
    #[serde(rename = "Room")]
    pub room: String,
    /// User the event is attributed to.
    #[serde(rename = "Username")]
    pub username: String,
    /// Message body, or the room list for `list`.
    #[serde(rename = "Text")]
    pub text: String,
    /// Rejection reason. Empty when the request succeeded.
    #[serde(rename = "Error")]
    pub error: String,
}

/// Message-class event kinds.
///
/// These all share one record shape and all append an entry to a room's
/// history. `Create` and `Destroy` additionally change the set of rooms, so
/// the client follows them with a room-list refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChatKind {
    /// Chat message posted to a room.
    NewMsg,
    /// A user joined a room.
    Join,
    /// A user left a room.
    Leave,
    /// A room was created.
    Create,
    /// A room was destroyed.
    Destroy,
}

impl ChatKind {
    /// Wire name of this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NewMsg => "new_msg",
            Self::Join => "join",
            Self::Leave => "leave",
            Self::Create => "create",
            Self::Destroy => "destroy",
        }
    }

    /// Whether this kind changes the room set and should trigger a list
    /// refresh.
    pub fn refreshes_room_list(self) -> bool {
        matches!(self, Self::Create | Self::Destroy)
    }
}

impl FromStr for ChatKind {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "new_msg" => Ok(Self::NewMsg),
            "join" => Ok(Self::Join),
            "leave" => Ok(Self::Leave),
            "create" => Ok(Self::Create),
            "destroy" => Ok(Self::Destroy),
            other => Err(ProtocolError::UnknownKind(other.to_string())),
        }
    }
}

/// Every kind the hub understands, for events and commands alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Full room list.
    List,
    /// Message-class kind.
    Chat(ChatKind),
}

impl EventKind {
    /// Wire name of this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Chat(kind) => kind.as_str(),
        }
    }
}

impl FromStr for EventKind {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self> {
        if s == "list" { Ok(Self::List) } else { s.parse().map(Self::Chat) }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload of a message-class event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEvent {
    /// Room the entry belongs to. Never empty.
    pub room: String,
    /// User the entry is attributed to.
    pub username: String,
    /// Message body.
    pub text: String,
    /// Server-side rejection, if any. Takes precedence over `text`.
    pub error: Option<String>,
}

impl ChatEvent {
    /// Text shown for this event.
    ///
    /// The error string with its first character upper-cased when the server
    /// rejected the request, otherwise the message body verbatim.
    pub fn display_text(&self) -> Cow<'_, str> {
        match &self.error {
            Some(error) => Cow::Owned(capitalize_first(error)),
            None => Cow::Borrowed(&self.text),
        }
    }

    /// Whether the server attached a rejection to this event.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// One decoded unit of server-pushed state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    /// Replacement for the full set of rooms.
    RoomList {
        /// Room names in the order the hub sent them.
        rooms: Vec<String>,
        /// Server-side rejection of the `list` request, if any.
        error: Option<String>,
    },

    /// Entry for a room's history.
    Chat {
        /// Which message-class event this is.
        kind: ChatKind,
        /// Event payload.
        event: ChatEvent,
    },

    /// Record whose `Type` this client does not understand.
    Unrecognized {
        /// The unrecognized `Type` value.
        kind: String,
    },
}

impl SyncEvent {
    /// Lift a raw record into a typed event.
    pub fn from_record(record: EventRecord) -> Result<Self> {
        let error = non_empty(record.error);

        let kind = match record.kind.parse::<EventKind>() {
            Ok(kind) => kind,
            Err(_) => return Ok(Self::Unrecognized { kind: record.kind }),
        };

        match kind {
            EventKind::List => Ok(Self::RoomList { rooms: split_room_list(&record.text), error }),
            EventKind::Chat(kind) => {
                if record.room.is_empty() {
                    return Err(ProtocolError::MissingRoom { kind: kind.as_str() });
                }
                let event = ChatEvent {
                    room: record.room,
                    username: record.username,
                    text: record.text,
                    error,
                };
                Ok(Self::Chat { kind, event })
            },
        }
    }

    /// Room this event refers to, if it refers to one.
    pub fn room(&self) -> Option<&str> {
        match self {
            Self::Chat { event, .. } => Some(&event.room),
            Self::RoomList { .. } | Self::Unrecognized { .. } => None,
        }
    }
}

/// Decode one `/refresh/` response body.
///
/// Returns `Ok(None)` when the body is empty or whitespace, which is how the
/// hub says "nothing happened since the last poll".
pub fn decode_poll_body(body: &str) -> Result<Option<SyncEvent>> {
    let body = body.trim();
    if body.is_empty() {
        return Ok(None);
    }

    let record: EventRecord =
        serde_json::from_str(body).map_err(|e| ProtocolError::Malformed(e.to_string()))?;
    SyncEvent::from_record(record).map(Some)
}

/// Upper-case the first character of `s`, leaving the rest unchanged.
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn split_room_list(text: &str) -> Vec<String> {
    text.split(ROOM_LIST_SEPARATOR).filter(|name| !name.is_empty()).map(str::to_string).collect()
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn empty_and_whitespace_bodies_are_no_event() {
        assert_eq!(decode_poll_body(""), Ok(None));
        assert_eq!(decode_poll_body("\n"), Ok(None));
        assert_eq!(decode_poll_body("  \t \r\n"), Ok(None));
    }

    #[test]
    fn decodes_list_and_drops_empty_names() {
        let event = decode_poll_body(r#"{"Type":"list","Text":"beta, alpha"}"#);
        assert_eq!(
            event,
            Ok(Some(SyncEvent::RoomList { rooms: vec!["beta".into(), "alpha".into()], error: None }))
        );

        let event = decode_poll_body(r#"{"Type":"list","Room":"","Text":""}"#);
        assert_eq!(event, Ok(Some(SyncEvent::RoomList { rooms: vec![], error: None })));
    }

    #[test]
    fn decodes_chat_record_from_hub() {
        let body = r#"{"Text":"hi","Type":"new_msg","Room":"alpha","DateTime":"17/10/26 12:00","TargetUUID":"","Error":"","Username":"bob"}
"#;
        let Ok(Some(SyncEvent::Chat { kind, event })) = decode_poll_body(body) else {
            unreachable!("expected chat event");
        };
        assert_eq!(kind, ChatKind::NewMsg);
        assert_eq!(event.room, "alpha");
        assert_eq!(event.username, "bob");
        assert_eq!(event.display_text(), "hi");
        assert!(!event.is_error());
    }

    #[test]
    fn error_takes_precedence_over_text() {
        let body = r#"{"Type":"join","Room":"x","Username":"carl","Text":"","Error":"room is full"}"#;
        let Ok(Some(SyncEvent::Chat { event, .. })) = decode_poll_body(body) else {
            unreachable!("expected chat event");
        };
        assert_eq!(event.display_text(), "Room is full");
        assert!(event.is_error());
    }

    #[test]
    fn unknown_kind_is_an_event_not_an_error() {
        let event = decode_poll_body(r#"{"Type":"set_name","Text":"ok"}"#);
        assert_eq!(event, Ok(Some(SyncEvent::Unrecognized { kind: "set_name".into() })));
    }

    #[test]
    fn chat_record_without_room_is_rejected() {
        let event = decode_poll_body(r#"{"Type":"leave","Username":"bob"}"#);
        assert_eq!(event, Err(ProtocolError::MissingRoom { kind: "leave" }));
    }

    #[test]
    fn malformed_body_is_rejected() {
        assert!(matches!(decode_poll_body("{not json"), Err(ProtocolError::Malformed(_))));
        assert!(matches!(decode_poll_body("[1,2]"), Err(ProtocolError::Malformed(_))));
    }

    #[test]
    fn only_create_and_destroy_refresh() {
        let refreshing: Vec<_> =
            [ChatKind::NewMsg, ChatKind::Join, ChatKind::Leave, ChatKind::Create, ChatKind::Destroy]
                .into_iter()
                .filter(|k| k.refreshes_room_list())
                .collect();
        assert_eq!(refreshing, vec![ChatKind::Create, ChatKind::Destroy]);
    }

    #[test]
    fn capitalize_handles_edge_cases() {
        assert_eq!(capitalize_first(""), "");
        assert_eq!(capitalize_first("a"), "A");
        assert_eq!(capitalize_first("user is not subscribed."), "User is not subscribed.");
        assert_eq!(capitalize_first("éclair"), "Éclair");
        assert_eq!(capitalize_first("Already"), "Already");
    }

    proptest! {
        #[test]
        fn prop_capitalize_changes_only_first_char(s in "\\PC{0,32}") {
            let out = capitalize_first(&s);
            let mut orig = s.chars();
            if let Some(first) = orig.next() {
                let rest: String = orig.collect();
                prop_assert!(out.ends_with(&rest));
                prop_assert_eq!(&out[..out.len() - rest.len()], first.to_uppercase().collect::<String>());
            } else {
                prop_assert!(out.is_empty());
            }
        }

        #[test]
        fn prop_decode_never_panics(body in "\\PC{0,64}") {
            let _ = decode_poll_body(&body);
        }
    }
}
