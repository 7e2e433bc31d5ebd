//! Driver trait for abstracting user-facing I/O.
//!
//! The [`Driver`] trait decouples the runtime from a specific frontend. Each
//! frontend implements it to turn its input into App calls and to present
//! App state, while the generic [`crate::Runtime`] handles the hub.

use std::future::Future;

use crate::{App, AppAction};

/// Abstracts input and presentation for the application runtime.
///
/// # Implementations
///
/// - **TUI**: crossterm key events, ratatui rendering
/// - **Simulation**: intents fed over a channel, renders counted
pub trait Driver: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Wait for the next user input and apply it to `app`.
    ///
    /// Returns the actions the App produced. Must be cancel-safe: the runtime
    /// drops this future whenever a poll completes or a timer fires first.
    fn poll_event(
        &mut self,
        app: &mut App,
    ) -> impl Future<Output = Result<Vec<AppAction>, Self::Error>> + Send;

    /// Render the application state.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(&mut self, app: &App) -> Result<(), Self::Error>;

    /// Release frontend resources.
    fn stop(&mut self);
}
