//! HTTP paths served by the hub.

/// Short-poll endpoint. Answers at once with an empty body or one JSON event.
pub const REFRESH: &str = "/refresh/";

/// Command endpoint. Accepts `{Type, Room?, Text?}`; the response is ignored.
pub const REQUEST: &str = "/request/";

/// Plain-text username of this client.
pub const FETCH_NAME: &str = "/fetch/name/";

/// Tells the hub this client is going away. The response is ignored.
pub const FETCH_EXIT: &str = "/fetch/exit/";

/// Markup templates fetched once during bootstrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TemplateAsset {
    /// Entry authored by this client.
    OwnMessage,
    /// Entry authored by anyone else.
    OtherMessage,
    /// One entry in the room selector.
    RoomButton,
}

impl TemplateAsset {
    /// Every template the client needs before it can render.
    pub const ALL: [Self; 3] = [Self::OwnMessage, Self::OtherMessage, Self::RoomButton];

    /// Path the template is served from.
    pub fn path(self) -> &'static str {
        match self {
            Self::OwnMessage => "/msg_me.html",
            Self::OtherMessage => "/msg_other.html",
            Self::RoomButton => "/room_btn.html",
        }
    }
}
