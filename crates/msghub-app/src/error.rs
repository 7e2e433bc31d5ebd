//! Application error types.

use msghub_client::ClientError;
use msghub_proto::TemplateAsset;
use thiserror::Error;

/// Local precondition failures.
///
/// These never reach the hub. The App reports them on its status line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    /// Tried to send a message with no room selected.
    #[error("Please select a room to send a message to")]
    NoRoomSelected,

    /// A room command was issued without a room name.
    #[error("/{command} needs a room name")]
    EmptyRoomName {
        /// Command that was missing its room.
        command: &'static str,
    },

    /// Tried to select a room that is not in the room list.
    #[error("No room named {0:?}")]
    UnknownRoom(String),
}

/// Failures while establishing the session.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// A markup template could not be fetched.
    #[error("failed to fetch {asset:?} template: {source}")]
    Template {
        /// Template that failed.
        asset: TemplateAsset,
        /// Underlying failure.
        source: ClientError,
    },

    /// The username could not be fetched.
    #[error("failed to fetch username: {0}")]
    Username(#[source] ClientError),

    /// The hub returned an empty username.
    #[error("hub returned an empty username")]
    EmptyUsername,
}
