//! Typed endpoint client.

use std::sync::Arc;

use msghub_proto::{Command, SyncEvent, TemplateAsset, decode_poll_body, endpoint};

use crate::{ClientError, Transport};

/// Typed calls against a hub, generic over the [`Transport`].
///
/// Cloning is cheap and shares the underlying transport, so a clone can be
/// moved into a spawned task while the original keeps sending commands.
#[derive(Debug)]
pub struct Client<T> {
    transport: Arc<T>,
}

impl<T> Clone for Client<T> {
    fn clone(&self) -> Self {
        Self { transport: Arc::clone(&self.transport) }
    }
}

impl<T: Transport> Client<T> {
    /// Wrap a transport.
    pub fn new(transport: T) -> Self {
        Self { transport: Arc::new(transport) }
    }

    /// Underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch one markup template.
    pub async fn fetch_template(&self, asset: TemplateAsset) -> Result<String, ClientError> {
        Ok(self.transport.get(asset.path()).await?)
    }

    /// Fetch this client's username.
    ///
    /// Surrounding whitespace is stripped; the name is compared byte-for-byte
    /// against event usernames afterwards.
    pub async fn fetch_username(&self) -> Result<String, ClientError> {
        let body = self.transport.get(endpoint::FETCH_NAME).await?;
        Ok(body.trim().to_string())
    }

    /// Issue one synchronization request.
    ///
    /// `Ok(None)` means the hub had nothing to report.
    pub async fn poll(&self) -> Result<Option<SyncEvent>, ClientError> {
        let body = self.transport.get(endpoint::REFRESH).await?;
        Ok(decode_poll_body(&body)?)
    }

    /// Send a command. The response is not interpreted.
    pub async fn send(&self, command: &Command) -> Result<(), ClientError> {
        tracing::debug!(kind = %command.kind(), room = ?command.room(), "sending command");
        self.transport.post_form(endpoint::REQUEST, &command.to_request()).await?;
        Ok(())
    }

    /// Tell the hub this client is leaving.
    pub async fn exit(&self) -> Result<(), ClientError> {
        self.transport.get(endpoint::FETCH_EXIT).await?;
        Ok(())
    }
}
