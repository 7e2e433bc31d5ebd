//! Application input events.
//!
//! This module defines [`AppEvent`], the inputs the runtime feeds into
//! [`crate::App::handle`] after talking to the hub. User intents do not go
//! through here; they call the App API directly (see [`crate::Intent`]).

use msghub_proto::{EventKind, SyncEvent};

/// Events processed by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// One event retrieved by a poll.
    Sync(SyncEvent),

    /// A poll request failed at the transport.
    PollFailed {
        /// Error description.
        message: String,
    },

    /// A command could not be delivered to the hub.
    CommandFailed {
        /// Kind of the command that failed.
        kind: EventKind,
        /// Error description.
        message: String,
    },
}
