// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/glowbarn-rs

//! Display sink implementations

use parking_lot::Mutex;
use std::collections::HashMap;
use tracing::info;

use super::{DisplayProjection, DisplaySink, Slot};

/// Writes each projection as one log line
#[derive(Debug, Default)]
pub struct ConsoleBoard;

impl DisplaySink for ConsoleBoard {
    fn show(&self, projection: &DisplayProjection) {
        info!(
            "Session {} | alerts {} | {}",
            projection.duration_text(),
            projection.alert_count,
            projection.wall_clock
        );
    }
}

/// In-memory slot board. Only slots it was built with are written.
pub struct MemoryBoard {
    slots: Mutex<HashMap<Slot, Option<String>>>,
    updates: Mutex<u64>,
}

impl MemoryBoard {
    /// Board with all three slots present
    pub fn new() -> Self {
        Self::with_slots(&Slot::ALL)
    }

    pub fn with_slots(present: &[Slot]) -> Self {
        Self {
            slots: Mutex::new(present.iter().map(|s| (*s, None)).collect()),
            updates: Mutex::new(0),
        }
    }

    /// Text in a slot, `None` if absent or never written
    pub fn slot(&self, slot: Slot) -> Option<String> {
        self.slots.lock().get(&slot).cloned().flatten()
    }

    pub fn has_slot(&self, slot: Slot) -> bool {
        self.slots.lock().contains_key(&slot)
    }

    /// Projections received
    pub fn updates(&self) -> u64 {
        *self.updates.lock()
    }
}

impl Default for MemoryBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplaySink for MemoryBoard {
    fn show(&self, projection: &DisplayProjection) {
        let mut slots = self.slots.lock();
        for slot in Slot::ALL {
            let Some(entry) = slots.get_mut(&slot) else {
                continue;
            };
            let text = match slot {
                Slot::Duration => projection.duration_text(),
                Slot::AlertCount => projection.alert_count.to_string(),
                Slot::CurrentTime => projection.wall_clock.clone(),
            };
            *entry = Some(text);
        }
        *self.updates.lock() += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projection() -> DisplayProjection {
        DisplayProjection {
            elapsed_seconds: 3661,
            alert_count: 4,
            wall_clock: "13:45".to_string(),
        }
    }

    #[test]
    fn test_memory_board_fills_all_slots() {
        let board = MemoryBoard::new();
        board.show(&projection());

        assert_eq!(board.slot(Slot::Duration).as_deref(), Some("01:01:01"));
        assert_eq!(board.slot(Slot::AlertCount).as_deref(), Some("4"));
        assert_eq!(board.slot(Slot::CurrentTime).as_deref(), Some("13:45"));
    }

    #[test]
    fn test_missing_slot_is_skipped() {
        let board = MemoryBoard::with_slots(&[Slot::AlertCount]);
        board.show(&projection());

        assert!(!board.has_slot(Slot::Duration));
        assert_eq!(board.slot(Slot::Duration), None);
        assert_eq!(board.slot(Slot::AlertCount).as_deref(), Some("4"));
        assert_eq!(board.updates(), 1);
    }

    #[test]
    fn test_slot_ids_match_page() {
        let ids: Vec<_> = Slot::ALL.iter().map(Slot::id).collect();
        assert_eq!(ids, ["sessionDuration", "alertCount", "currentTime"]);
    }
}
