//! Fire-and-forget command delivery.
//!
//! Each command is posted from its own task so a slow or hung `/request/`
//! never holds up polling or input. The only thing that comes back to the
//! loop is a [`AppEvent::CommandFailed`] for a post that did not get through.

use std::time::Duration;

use msghub_client::{Client, Transport};
use msghub_proto::Command;
use tokio::task::JoinSet;

use crate::AppEvent;

/// Posts commands on spawned tasks and collects their failures.
#[derive(Debug)]
pub struct CommandSender<T> {
    client: Client<T>,
    in_flight: JoinSet<Option<AppEvent>>,
    sent: u64,
}

impl<T: Transport> CommandSender<T> {
    /// Sender posting through `client`.
    pub fn new(client: Client<T>) -> Self {
        Self { client, in_flight: JoinSet::new(), sent: 0 }
    }

    /// Start posting `command`. Returns immediately.
    pub fn send(&mut self, command: Command) {
        let client = self.client.clone();
        self.in_flight.spawn(async move {
            match client.send(&command).await {
                Ok(()) => None,
                Err(e) => {
                    tracing::warn!(kind = %command.kind(), error = %e, "command failed");
                    Some(AppEvent::CommandFailed { kind: command.kind(), message: e.to_string() })
                },
            }
        });
        self.sent += 1;
    }

    /// Posts not yet finished.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Commands handed to [`CommandSender::send`] so far.
    pub fn sent(&self) -> u64 {
        self.sent
    }

    /// Resolve when any outstanding post finishes.
    ///
    /// Yields the failure event if it did not get through, `None` if it did.
    /// Pends forever while nothing is outstanding. Cancel-safe.
    pub async fn completed(&mut self) -> Option<AppEvent> {
        match self.in_flight.join_next().await {
            Some(Ok(event)) => event,
            Some(Err(e)) => {
                tracing::warn!(error = %e, "command task ended abnormally");
                None
            },
            None => std::future::pending().await,
        }
    }

    /// Give outstanding posts up to `grace` to finish, then abort the rest.
    ///
    /// Returns how many were aborted. Failures seen while draining are only
    /// logged.
    pub async fn drain(&mut self, grace: Duration) -> usize {
        let finish = async { while self.in_flight.join_next().await.is_some() {} };
        if tokio::time::timeout(grace, finish).await.is_ok() {
            return 0;
        }
        let abandoned = self.in_flight.len();
        self.in_flight.shutdown().await;
        abandoned
    }
}
