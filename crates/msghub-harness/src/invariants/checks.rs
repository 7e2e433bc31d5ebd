//! Standard invariant checks.

use super::{AppSnapshot, Invariant, InvariantKind, InvariantResult, Violation};

/// The room list is strictly increasing.
///
/// Presentation relies on it for display order and binary search.
pub struct RoomListSorted;

impl Invariant for RoomListSorted {
    fn kind(&self) -> InvariantKind {
        InvariantKind::RoomListSorted
    }

    fn check(&self, _previous: Option<&AppSnapshot>, current: &AppSnapshot) -> InvariantResult {
        match current.rooms.windows(2).find(|pair| pair[0] >= pair[1]) {
            Some(pair) => Err(Violation {
                invariant: self.kind(),
                message: format!("{:?} listed before {:?} in {:?}", pair[0], pair[1], current.rooms),
            }),
            None => Ok(()),
        }
    }
}

/// A selected room is always one the user can see in the list.
pub struct SelectedRoomListed;

impl Invariant for SelectedRoomListed {
    fn kind(&self) -> InvariantKind {
        InvariantKind::SelectedRoomListed
    }

    fn check(&self, _previous: Option<&AppSnapshot>, current: &AppSnapshot) -> InvariantResult {
        if let Some(selected) = &current.selected_room
            && !current.rooms.contains(selected)
        {
            return Err(Violation {
                invariant: self.kind(),
                message: format!("selected {selected:?} not in {:?}", current.rooms),
            });
        }
        Ok(())
    }
}

/// History buffers only grow, and are never dropped.
pub struct HistoryMonotonic;

impl Invariant for HistoryMonotonic {
    fn kind(&self) -> InvariantKind {
        InvariantKind::HistoryMonotonic
    }

    fn check(&self, previous: Option<&AppSnapshot>, current: &AppSnapshot) -> InvariantResult {
        let Some(previous) = previous else {
            return Ok(());
        };
        for (room, &before) in &previous.history_lens {
            let after = current.history_lens.get(room).copied().unwrap_or(0);
            if after < before {
                return Err(Violation {
                    invariant: self.kind(),
                    message: format!("room {room:?} history shrank {before} -> {after}"),
                });
            }
        }
        Ok(())
    }
}

/// Entries for the room being viewed are seen as they arrive.
pub struct SelectedRoomRead;

impl Invariant for SelectedRoomRead {
    fn kind(&self) -> InvariantKind {
        InvariantKind::SelectedRoomRead
    }

    fn check(&self, _previous: Option<&AppSnapshot>, current: &AppSnapshot) -> InvariantResult {
        if let Some(selected) = &current.selected_room
            && current.unread.contains(selected)
        {
            return Err(Violation {
                invariant: self.kind(),
                message: format!("selected room {selected:?} flagged unread"),
            });
        }
        Ok(())
    }
}
