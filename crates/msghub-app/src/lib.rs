//! Application layer for msghub
//!
//! The synchronization engine for a short-polling chat client. State lives in
//! a pure [`App`] state machine; a generic [`Runtime`] drives it from a
//! [`Driver`] (user input and presentation) and an
//! [`msghub_client::Transport`] (the hub), so the same orchestration code runs
//! against a real hub and in simulation.
//!
//! # Components
//!
//! - [`App`]: session state, room history store and event dispatcher
//! - [`Poller`]: fixed-cadence poll with at most one request in flight
//! - [`CommandSender`]: posts commands without blocking the loop
//! - [`RefreshSchedule`]: delayed room-list refresh after create/destroy
//! - [`bootstrap`]: fetches templates and username before polling starts
//! - [`Driver`]: trait for platform-specific input and rendering
//! - [`Runtime`]: orchestration loop tying the above together

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod app;
mod bootstrap;
mod driver;
mod error;
mod event;
mod intent;
mod poller;
mod render;
mod runtime;
mod schedule;
mod sender;
mod state;

pub use action::AppAction;
pub use app::App;
pub use bootstrap::{SessionBootstrap, bootstrap};
pub use driver::Driver;
pub use error::{AppError, BootstrapError};
pub use event::AppEvent;
pub use intent::Intent;
pub use poller::{PollResult, Poller, TickOutcome};
pub use render::{
    EntryStyle, MESSAGE_TOKEN, NAME_TOKEN, RenderedEntry, Slot, Template, Templates, render_entry,
};
pub use runtime::{Runtime, RuntimeConfig};
pub use schedule::RefreshSchedule;
pub use sender::CommandSender;
pub use state::{HistoryStore, RoomHistory, Session};
