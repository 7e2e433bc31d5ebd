//! Simulation driver implementing the Driver trait.
//!
//! `SimDriver` provides the same interface as the terminal driver but takes
//! its input from a channel. It implements [`Driver`] so the same
//! [`msghub_app::Runtime`] orchestration code runs in both production and
//! simulation.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use msghub_app::{App, AppAction, Driver, Intent};
use tokio::sync::mpsc;

use crate::invariants::{AppSnapshot, InvariantRegistry, Violation};

/// Error type for simulation driver.
#[derive(Debug, Clone)]
pub struct SimDriverError(pub String);

impl std::fmt::Display for SimDriverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SimDriverError: {}", self.0)
    }
}

impl std::error::Error for SimDriverError {}

/// What the driver observed, shared with its handle.
#[derive(Debug, Clone, Default)]
pub struct DriverLog {
    /// Number of render calls.
    pub renders: usize,
    /// State at the most recent render.
    pub last_render: Option<AppSnapshot>,
    /// Status line at the most recent render.
    pub last_status: Option<String>,
    /// Invariant violations seen at any render.
    pub violations: Vec<Violation>,
    /// Whether the runtime stopped the driver.
    pub stopped: bool,
}

/// Simulation driver for deterministic testing.
pub struct SimDriver {
    intents: mpsc::UnboundedReceiver<Intent>,
    log: Arc<Mutex<DriverLog>>,
    invariants: Option<InvariantRegistry>,
}

/// Test-side handle onto a [`SimDriver`].
#[derive(Debug, Clone)]
pub struct SimDriverHandle {
    intents: mpsc::UnboundedSender<Intent>,
    log: Arc<Mutex<DriverLog>>,
}

fn lock(log: &Mutex<DriverLog>) -> MutexGuard<'_, DriverLog> {
    log.lock().unwrap_or_else(PoisonError::into_inner)
}

impl SimDriver {
    /// Create a driver and the handle that feeds it.
    pub fn new() -> (Self, SimDriverHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let log = Arc::new(Mutex::new(DriverLog::default()));
        let driver = Self { intents: rx, log: Arc::clone(&log), invariants: None };
        (driver, SimDriverHandle { intents: tx, log })
    }

    /// Enable invariant checking at every render.
    #[must_use]
    pub fn with_invariants(mut self, registry: InvariantRegistry) -> Self {
        self.invariants = Some(registry);
        self
    }
}

impl SimDriverHandle {
    /// Queue an intent as if the user had entered it.
    ///
    /// Ignored once the driver has been dropped.
    pub fn send(&self, intent: Intent) {
        if self.intents.send(intent).is_err() {
            tracing::debug!("sim driver gone, dropping intent");
        }
    }

    /// Copy of everything recorded so far.
    pub fn log(&self) -> DriverLog {
        lock(&self.log).clone()
    }

    /// Number of renders so far.
    pub fn renders(&self) -> usize {
        lock(&self.log).renders
    }

    /// Whether the driver was stopped.
    pub fn stopped(&self) -> bool {
        lock(&self.log).stopped
    }
}

impl Driver for SimDriver {
    type Error = SimDriverError;

    async fn poll_event(&mut self, app: &mut App) -> Result<Vec<AppAction>, Self::Error> {
        match self.intents.recv().await {
            Some(intent) => Ok(app.apply(intent)),
            None => std::future::pending().await,
        }
    }

    fn render(&mut self, app: &App) -> Result<(), Self::Error> {
        let snapshot = AppSnapshot::from_app(app);
        let mut log = lock(&self.log);

        if let Some(registry) = &self.invariants
            && let Err(violations) = registry.check_all(log.last_render.as_ref(), &snapshot)
        {
            for violation in &violations {
                tracing::error!(%violation, "invariant violated");
            }
            log.violations.extend(violations);
        }

        log.renders += 1;
        log.last_render = Some(snapshot);
        log.last_status = app.status_message().map(str::to_string);
        Ok(())
    }

    fn stop(&mut self) {
        lock(&self.log).stopped = true;
    }
}
