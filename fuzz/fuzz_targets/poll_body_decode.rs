//! Fuzz target for decode_poll_body
//!
//! Feeds arbitrary text to the poll response decoder to find:
//! - Panics on malformed or truncated JSON
//! - Records that decode into events with inconsistent fields
//!
//! The fuzzer should NEVER panic. All invalid inputs should return an error.

#![no_main]

use libfuzzer_sys::fuzz_target;
use msghub_proto::{SyncEvent, decode_poll_body};

fuzz_target!(|data: &[u8]| {
    let Ok(body) = std::str::from_utf8(data) else {
        return;
    };

    match decode_poll_body(body) {
        Ok(Some(SyncEvent::Chat { event, .. })) => assert!(!event.room.is_empty()),
        Ok(Some(SyncEvent::RoomList { rooms, .. })) => {
            assert!(rooms.iter().all(|room| !room.is_empty()));
        },
        Ok(Some(SyncEvent::Unrecognized { .. }) | None) | Err(_) => {},
    }
});
