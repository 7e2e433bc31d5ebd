//! Protocol error types.

use thiserror::Error;

/// Result alias for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors produced while decoding or validating wire records.
///
/// None of these are fatal to a client. A poll body that fails to decode is
/// treated as "no event" by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// Body was not a JSON event record.
    #[error("malformed event body: {0}")]
    Malformed(String),

    /// `Type` field did not name a known event or command kind.
    #[error("unknown kind: {0:?}")]
    UnknownKind(String),

    /// A message-class record arrived without a room name.
    #[error("{kind} record has no room")]
    MissingRoom {
        /// Wire name of the offending kind.
        kind: &'static str,
    },
}
