//! Application side-effects and intents.
//!
//! This module defines the [`AppAction`] enum, which represents instructions
//! produced by the [`crate::App`] state machine for the runtime to execute.

use msghub_proto::Command;

/// Actions produced by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// Re-render from the current state.
    Render,

    /// Send a command to the hub.
    Send(Command),

    /// Send a `list` command once the refresh delay has passed.
    ScheduleListRefresh,

    /// Leave the session.
    Quit,
}
