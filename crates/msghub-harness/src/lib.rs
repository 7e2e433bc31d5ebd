//! Deterministic simulation harness for msghub.
//!
//! In-memory implementations of the hub and of the [`msghub_app::Driver`]
//! and [`msghub_client::Transport`] traits, so the production
//! [`msghub_app::Runtime`] can be driven end to end under tokio's paused
//! clock.
//!
//! # Components
//!
//! - [`SimHub`]: hub with room subscriptions, per-client event queues and
//!   failure injection
//! - [`SimTransport`]: one client's connection to a [`SimHub`]
//! - [`SimDriver`]: intents fed over a channel, renders recorded
//!
//! # Invariant Testing
//!
//! The `invariants` module checks behavioral properties of the App across
//! renders. Use [`InvariantRegistry::standard()`] for the common set.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod invariants;
pub mod sim_driver;
pub mod sim_hub;
pub mod sim_transport;

pub use invariants::{
    AppSnapshot, HistoryMonotonic, Invariant, InvariantKind, InvariantRegistry, InvariantResult,
    RoomListSorted, SelectedRoomListed, SelectedRoomRead, Violation,
};
pub use sim_driver::{DriverLog, SimDriver, SimDriverError, SimDriverHandle};
pub use sim_hub::{
    ClientId, ClientStats, OTHER_MESSAGE_TEMPLATE, OWN_MESSAGE_TEMPLATE, ROOM_BUTTON_TEMPLATE,
    SimHub, sim_templates,
};
pub use sim_transport::SimTransport;
