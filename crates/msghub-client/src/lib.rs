//! Client
//!
//! I/O edge of the msghub client. Everything that touches the network lives
//! here so the application layer can stay a pure state machine.
//!
//! # Components
//!
//! - [`Transport`]: request/response primitive the rest of the client is
//!   generic over
//! - [`HttpTransport`]: production transport backed by `reqwest`
//! - [`Client`]: typed calls for each hub endpoint (poll, command, bootstrap
//!   fetches)

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod client;
mod error;
pub mod transport;

pub use client::Client;
pub use error::ClientError;
pub use msghub_proto::{Command, SyncEvent, TemplateAsset};
pub use transport::{HttpConfig, HttpTransport, Transport, TransportError};
