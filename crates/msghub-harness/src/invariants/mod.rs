//! Invariant checking for simulation tests.
//!
//! Invariants are properties of the App that must hold after every step,
//! whatever sequence of hub events and user intents led there.
//!
//! # Architecture
//!
//! Observable App state is captured into an [`AppSnapshot`]. Registered
//! [`Invariant`]s check each new snapshot, optionally against the previous
//! one for properties about change over time.
//!
//! # Usage
//!
//! ```ignore
//! let registry = InvariantRegistry::standard();
//! let snapshot = AppSnapshot::from_app(&app);
//! registry.check_all(previous.as_ref(), &snapshot)?;
//! ```

mod checks;
mod snapshot;

use std::fmt;

pub use checks::{HistoryMonotonic, RoomListSorted, SelectedRoomListed, SelectedRoomRead};
pub use snapshot::AppSnapshot;

/// Invariant check result.
pub type InvariantResult = Result<(), Violation>;

/// Which invariant was violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvariantKind {
    /// Room list is sorted and free of duplicates.
    RoomListSorted,
    /// Selected room appears in the room list.
    SelectedRoomListed,
    /// No room history ever loses entries.
    HistoryMonotonic,
    /// The selected room is never flagged unread.
    SelectedRoomRead,
}

impl fmt::Display for InvariantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Invariant violation with context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// The violated invariant.
    pub invariant: InvariantKind,
    /// Description of what went wrong.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.invariant, self.message)
    }
}

impl std::error::Error for Violation {}

/// A property checked against App snapshots.
pub trait Invariant: Send + Sync {
    /// Invariant identity for error reporting.
    fn kind(&self) -> InvariantKind;

    /// Check `current`, with `previous` as the snapshot before it, if any.
    fn check(&self, previous: Option<&AppSnapshot>, current: &AppSnapshot) -> InvariantResult;
}

/// Registry of invariants to check.
pub struct InvariantRegistry {
    invariants: Vec<Box<dyn Invariant>>,
}

impl Default for InvariantRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for InvariantRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.invariants.iter().map(|i| i.kind())).finish()
    }
}

impl InvariantRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self { invariants: Vec::new() }
    }

    /// Registry with every standard invariant.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.add(RoomListSorted);
        registry.add(SelectedRoomListed);
        registry.add(HistoryMonotonic);
        registry.add(SelectedRoomRead);
        registry
    }

    /// Add an invariant to the registry.
    pub fn add<I: Invariant + 'static>(&mut self, invariant: I) {
        self.invariants.push(Box::new(invariant));
    }

    /// Check all invariants, collecting every violation.
    pub fn check_all(
        &self,
        previous: Option<&AppSnapshot>,
        current: &AppSnapshot,
    ) -> Result<(), Vec<Violation>> {
        let violations: Vec<_> = self
            .invariants
            .iter()
            .filter_map(|inv| inv.check(previous, current).err())
            .collect();

        if violations.is_empty() { Ok(()) } else { Err(violations) }
    }

    /// Number of registered invariants.
    pub fn len(&self) -> usize {
        self.invariants.len()
    }

    /// Check if registry is empty.
    pub fn is_empty(&self) -> bool {
        self.invariants.is_empty()
    }
}
