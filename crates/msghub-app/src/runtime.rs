//! Generic runtime for application orchestration.
//!
//! The Runtime drives the application event loop, coordinating between:
//! - [`App`]: state machine and dispatcher
//! - [`Poller`]: synchronization requests to the hub
//! - [`CommandSender`]: fire-and-forget command posts
//! - [`RefreshSchedule`]: follow-up room-list refreshes
//! - [`Driver`]: platform-specific input and rendering
//!
//! All App mutation happens on the task running [`Runtime::run`]. Polls and
//! command posts run on spawned tasks and only hand their results back here,
//! so a slow hub never stalls the tick or user input.

use std::time::Duration;

use msghub_client::{Client, ClientError, Transport};
use tokio::time::{Instant, MissedTickBehavior};

use crate::{
    App, AppAction, AppEvent, BootstrapError, CommandSender, Driver, PollResult, Poller,
    RefreshSchedule, SessionBootstrap, bootstrap,
};

/// How long shutdown waits for outstanding command posts.
const COMMAND_DRAIN_GRACE: Duration = Duration::from_millis(250);

/// Upper bound on the exit notification sent during shutdown.
const EXIT_TIMEOUT: Duration = Duration::from_secs(2);

/// Loop timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Interval between poll ticks.
    pub poll_interval: Duration,
    /// Delay between a `create`/`destroy` event and the `list` it triggers.
    pub list_refresh_delay: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(100),
            list_refresh_delay: Duration::from_millis(500),
        }
    }
}

/// Generic runtime that orchestrates App, Poller, and Driver.
///
/// # Type Parameters
///
/// - `D`: Platform-specific I/O driver
/// - `T`: Transport used to reach the hub
pub struct Runtime<D, T>
where
    D: Driver,
    T: Transport,
{
    driver: D,
    app: App,
    client: Client<T>,
    poller: Poller<T>,
    commands: CommandSender<T>,
    refresh: RefreshSchedule,
    config: RuntimeConfig,
}

impl<D, T> Runtime<D, T>
where
    D: Driver,
    T: Transport,
{
    /// Bootstrap a session against the hub and build a runtime for it.
    ///
    /// # Errors
    ///
    /// Returns an error if any bootstrap fetch fails. Nothing is polled in
    /// that case.
    pub async fn start(
        driver: D,
        client: Client<T>,
        config: RuntimeConfig,
    ) -> Result<Self, BootstrapError> {
        let SessionBootstrap { username, templates } = bootstrap(&client).await?;
        tracing::info!(%username, "session established");
        Ok(Self::with_app(driver, client, App::new(username, templates), config))
    }

    /// Build a runtime around an already bootstrapped App.
    pub fn with_app(driver: D, client: Client<T>, app: App, config: RuntimeConfig) -> Self {
        Self {
            driver,
            app,
            poller: Poller::new(client.clone()),
            commands: CommandSender::new(client.clone()),
            client,
            refresh: RefreshSchedule::new(config.list_refresh_delay),
            config,
        }
    }

    /// Application state.
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Platform driver.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Poller state.
    pub fn poller(&self) -> &Poller<T> {
        &self.poller
    }

    /// Outstanding command posts.
    pub fn commands(&self) -> &CommandSender<T> {
        &self.commands
    }

    /// Run the main event loop until the App asks to quit.
    ///
    /// Renders once, requests the room list, then services whichever is
    /// ready first: user input, a finished poll, a failed command, the
    /// refresh deadline, or the next poll tick. On quit the hub is told this client is leaving
    /// and the driver is stopped.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver fails. Hub failures are never fatal.
    pub async fn run(&mut self) -> Result<(), D::Error> {
        self.driver.render(&self.app)?;

        let mut quit = self.process_actions(self.app.list_rooms())?;

        let mut ticker = tokio::time::interval(self.config.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        while !quit {
            quit = tokio::select! {
                biased;

                actions = self.driver.poll_event(&mut self.app) => {
                    self.process_actions(actions?)?
                },
                result = self.poller.completed() => self.handle_poll_result(result)?,
                event = self.commands.completed() => match event {
                    Some(event) => {
                        let actions = self.app.handle(event);
                        self.process_actions(actions)?
                    },
                    None => false,
                },
                () = self.refresh.expired() => {
                    tracing::debug!("refreshing room list");
                    self.process_actions(self.app.list_rooms())?
                },
                _ = ticker.tick() => {
                    self.poller.tick();
                    false
                },
            };
        }

        self.shutdown().await;
        Ok(())
    }

    async fn shutdown(&mut self) {
        let abandoned = self.commands.drain(COMMAND_DRAIN_GRACE).await;
        match tokio::time::timeout(EXIT_TIMEOUT, self.client.exit()).await {
            Ok(Ok(())) => {},
            Ok(Err(e)) => tracing::warn!(error = %e, "failed to notify hub of exit"),
            Err(_) => tracing::warn!(timeout = ?EXIT_TIMEOUT, "exit notification timed out"),
        }
        self.driver.stop();
        tracing::info!(
            polls = self.poller.issued(),
            skipped_ticks = self.poller.skipped(),
            commands = self.commands.sent(),
            abandoned,
            "session ended"
        );
    }

    /// Feed a finished poll into the App.
    ///
    /// Returns `true` if should quit.
    fn handle_poll_result(&mut self, result: PollResult) -> Result<bool, D::Error> {
        let event = match result {
            Ok(Some(event)) => AppEvent::Sync(event),
            Ok(None) => return Ok(false),
            Err(ClientError::Protocol(e)) => {
                tracing::debug!(error = %e, "discarding undecodable poll response");
                return Ok(false);
            },
            Err(ClientError::Transport(e)) => {
                tracing::warn!(error = %e, "poll failed");
                AppEvent::PollFailed { message: e.to_string() }
            },
        };
        let actions = self.app.handle(event);
        self.process_actions(actions)
    }

    /// Process actions returned by the App.
    ///
    /// Returns `true` if should quit.
    fn process_actions(&mut self, actions: Vec<AppAction>) -> Result<bool, D::Error> {
        for action in actions {
            match action {
                AppAction::Render => self.driver.render(&self.app)?,
                AppAction::Quit => return Ok(true),
                AppAction::ScheduleListRefresh => {
                    if self.refresh.schedule(Instant::now()) {
                        tracing::debug!(
                            delay = ?self.config.list_refresh_delay,
                            "room list refresh scheduled"
                        );
                    }
                },
                AppAction::Send(command) => self.commands.send(command),
            }
        }
        Ok(false)
    }
}
