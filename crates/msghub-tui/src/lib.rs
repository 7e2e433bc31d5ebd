//! Terminal UI for msghub
//!
//! A thin shell over [`msghub_app::Driver`] that provides terminal-specific
//! I/O. All orchestration logic lives in the generic [`msghub_app::Runtime`].
//!
//! This crate only handles key input and terminal rendering.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod commands;
pub mod input;
pub mod terminal;
pub mod ui;

pub use input::{InputState, KeyInput};
pub use msghub_app::{App, AppAction, Driver, Intent, Runtime, RuntimeConfig};
pub use terminal::{TerminalDriver, TerminalError};
