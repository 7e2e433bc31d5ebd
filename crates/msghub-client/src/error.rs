//! Client error types.

use msghub_proto::ProtocolError;
use thiserror::Error;

use crate::TransportError;

/// Errors returned by [`crate::Client`] calls.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request itself failed.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The request succeeded but the body could not be decoded.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}
