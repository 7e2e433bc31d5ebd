//! Simulated transport onto a [`SimHub`].

use std::sync::Arc;

use msghub_client::{Transport, TransportError};
use msghub_proto::{CommandRequest, TemplateAsset, endpoint};

use crate::{ClientId, SimHub};

/// One client's connection to a shared [`SimHub`].
///
/// Routes paths the same way the real hub does; anything else is a 404.
#[derive(Debug, Clone)]
pub struct SimTransport {
    hub: Arc<SimHub>,
    client: ClientId,
}

impl SimTransport {
    pub(crate) fn new(hub: Arc<SimHub>, client: ClientId) -> Self {
        Self { hub, client }
    }

    /// Hub-side identity of this client.
    pub fn client_id(&self) -> ClientId {
        self.client
    }

    /// Hub this transport talks to.
    pub fn hub(&self) -> &Arc<SimHub> {
        &self.hub
    }
}

impl Transport for SimTransport {
    async fn get(&self, path: &str) -> Result<String, TransportError> {
        match path {
            endpoint::REFRESH => self.hub.poll(self.client).await,
            endpoint::FETCH_NAME => self.hub.fetch_name(self.client),
            endpoint::FETCH_EXIT => {
                self.hub.exit(self.client);
                Ok("\n".to_string())
            },
            other => match TemplateAsset::ALL.into_iter().find(|asset| asset.path() == other) {
                Some(asset) => self.hub.fetch_template(self.client, asset),
                None => Err(TransportError::Status { path: other.to_string(), status: 404 }),
            },
        }
    }

    async fn post_form(&self, path: &str, request: &CommandRequest) -> Result<(), TransportError> {
        if path != endpoint::REQUEST {
            return Err(TransportError::Status { path: path.to_string(), status: 404 });
        }
        self.hub.request(self.client, request).await;
        Ok(())
    }
}
