//! Wire format for the msghub chat hub.
//!
//! The hub never holds a connection open to the client. Instead the client
//! polls `/refresh/` and receives at most one JSON event record per response,
//! and mutates server state by posting command requests to `/request/`. This
//! crate owns both directions of that exchange: decoding poll bodies into
//! [`SyncEvent`] and turning [`Command`] intents into [`CommandRequest`] wire
//! records.
//!
//! Nothing here performs I/O. Decoding is total: every body yields either an
//! event, "no event", or a [`ProtocolError`] describing why it was dropped.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod command;
pub mod endpoint;
pub mod errors;
pub mod event;

pub use command::{Command, CommandRequest};
pub use endpoint::TemplateAsset;
pub use errors::{ProtocolError, Result};
pub use event::{
    ChatEvent, ChatKind, EventKind, EventRecord, SyncEvent, capitalize_first, decode_poll_body,
};
