//! HTTP transport for the client.
//!
//! [`Transport`] is the only way the client reaches the hub. It is a bare
//! request/response primitive: no retries and no timeout beyond what the
//! caller configures. [`HttpTransport`] implements it with `reqwest`.

use std::{future::Future, time::Duration};

use msghub_proto::CommandRequest;
use thiserror::Error;

/// Transport errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Request could not be sent or no response arrived.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Configured request timeout elapsed.
    #[error("request to {path} timed out")]
    Timeout {
        /// Requested path.
        path: String,
    },

    /// Hub answered with a non-success status.
    #[error("{path} returned status {status}")]
    Status {
        /// Requested path.
        path: String,
        /// HTTP status code.
        status: u16,
    },

    /// Response body could not be read.
    #[error("failed to read body: {0}")]
    Body(String),
}

/// Asynchronous request/response primitive.
///
/// Implementations must be shareable across tasks: the poller runs its
/// request on a spawned task while commands are sent from the main loop.
pub trait Transport: Send + Sync + 'static {
    /// GET `path` and return the body.
    fn get(&self, path: &str) -> impl Future<Output = Result<String, TransportError>> + Send;

    /// POST `request` form-encoded to `path`. The response body is discarded.
    fn post_form(
        &self,
        path: &str,
        request: &CommandRequest,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;
}

/// HTTP transport configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    /// Scheme, host and port of the hub, e.g. `http://localhost:8123`.
    pub base_url: String,
    /// Per-request timeout. `None` leaves requests unbounded.
    pub timeout: Option<Duration>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { base_url: "http://localhost:8001".to_string(), timeout: None }
    }
}

/// [`Transport`] backed by a pooled `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Build a transport for the configured hub.
    pub fn new(config: &HttpConfig) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(|e| TransportError::Connection(e.to_string()))?;

        Ok(Self { http, base_url: config.base_url.trim_end_matches('/').to_string() })
    }

    /// Base URL requests are resolved against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

impl Transport for HttpTransport {
    async fn get(&self, path: &str) -> Result<String, TransportError> {
        let response =
            self.http.get(self.url(path)).send().await.map_err(|e| request_failed(path, &e))?;
        let response = check_status(path, response)?;
        response.text().await.map_err(|e| TransportError::Body(e.to_string()))
    }

    async fn post_form(&self, path: &str, request: &CommandRequest) -> Result<(), TransportError> {
        let response = self
            .http
            .post(self.url(path))
            .form(request)
            .send()
            .await
            .map_err(|e| request_failed(path, &e))?;
        check_status(path, response)?;
        Ok(())
    }
}

fn request_failed(path: &str, error: &reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout { path: path.to_string() }
    } else {
        TransportError::Connection(error.to_string())
    }
}

fn check_status(
    path: &str,
    response: reqwest::Response,
) -> Result<reqwest::Response, TransportError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(TransportError::Status { path: path.to_string(), status: status.as_u16() })
    }
}
