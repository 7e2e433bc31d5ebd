//! Fixed-cadence polling with a single in-flight slot.

use msghub_client::{Client, ClientError, Transport, TransportError};
use msghub_proto::SyncEvent;
use tokio::task::JoinHandle;

/// Outcome of one completed poll.
pub type PollResult = Result<Option<SyncEvent>, ClientError>;

/// What a tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// A new poll was started.
    Issued,
    /// The previous poll is still outstanding; nothing was started.
    Skipped,
}

/// Issues `/refresh/` requests, never more than one at a time.
///
/// Each request runs on a spawned task so that the owning loop keeps
/// handling input while it is outstanding. Because only one request is ever
/// outstanding, results complete in the order they were issued.
#[derive(Debug)]
pub struct Poller<T> {
    client: Client<T>,
    in_flight: Option<JoinHandle<PollResult>>,
    issued: u64,
    skipped: u64,
}

impl<T: Transport> Poller<T> {
    /// Poller issuing requests through `client`.
    pub fn new(client: Client<T>) -> Self {
        Self { client, in_flight: None, issued: 0, skipped: 0 }
    }

    /// Start a poll unless one is already outstanding.
    pub fn tick(&mut self) -> TickOutcome {
        if self.in_flight.is_some() {
            self.skipped += 1;
            tracing::trace!(skipped = self.skipped, "poll still in flight, skipping tick");
            return TickOutcome::Skipped;
        }

        let client = self.client.clone();
        self.in_flight = Some(tokio::spawn(async move { client.poll().await }));
        self.issued += 1;
        TickOutcome::Issued
    }

    /// Whether a poll is outstanding.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Polls started so far.
    pub fn issued(&self) -> u64 {
        self.issued
    }

    /// Ticks skipped because a poll was outstanding.
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// Resolve with the outstanding poll's result, freeing the slot.
    ///
    /// Pends forever while idle. Cancel-safe: dropping the future leaves the
    /// request running and the slot occupied.
    pub async fn completed(&mut self) -> PollResult {
        let Some(handle) = self.in_flight.as_mut() else {
            return std::future::pending().await;
        };
        let joined = handle.await;
        self.in_flight = None;

        joined.unwrap_or_else(|e| {
            Err(ClientError::Transport(TransportError::Connection(format!("poll task failed: {e}"))))
        })
    }
}

impl<T> Drop for Poller<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}
