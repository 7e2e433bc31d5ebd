//! Session bootstrap.
//!
//! Polling must not start before the templates and the username are known:
//! an event rendered without them would be attributed to the wrong template.
//! [`bootstrap`] runs all four fetches concurrently and completes only when
//! every one has succeeded.

use msghub_client::{Client, Transport};
use msghub_proto::TemplateAsset;

use crate::{BootstrapError, Templates};

/// Everything a session needs before its first poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionBootstrap {
    /// Name the hub assigned this client.
    pub username: String,
    /// Parsed markup templates.
    pub templates: Templates,
}

/// Fetch templates and username concurrently.
///
/// Fails with the first error encountered; the remaining fetches are
/// dropped.
pub async fn bootstrap<T: Transport>(client: &Client<T>) -> Result<SessionBootstrap, BootstrapError> {
    let fetch = |asset: TemplateAsset| async move {
        client.fetch_template(asset).await.map_err(|source| BootstrapError::Template { asset, source })
    };
    let username = async { client.fetch_username().await.map_err(BootstrapError::Username) };

    let (own, other, room_button, username) = futures::try_join!(
        fetch(TemplateAsset::OwnMessage),
        fetch(TemplateAsset::OtherMessage),
        fetch(TemplateAsset::RoomButton),
        username,
    )?;

    if username.is_empty() {
        return Err(BootstrapError::EmptyUsername);
    }

    tracing::debug!(%username, "bootstrap complete");
    Ok(SessionBootstrap { username, templates: Templates::parse(&own, &other, &room_button) })
}
