//! Sensor hand-off for the Aries robot

use std::sync::Mutex;

/// Single-slot mailbox holding the most recent sensor reading.
///
/// The producer overwrites whatever has not been consumed yet; the consumer
/// reads and clears in one step, so every reading is processed at most once
/// and stale readings never queue up.
#[derive(Debug, Default)]
pub struct LatestScan<T> {
    slot: Mutex<Option<T>>,
}

impl<T> LatestScan<T> {
    /// Create an empty slot
    pub fn new() -> Self {
        LatestScan {
            slot: Mutex::new(None),
        }
    }

    /// Store a new reading. Returns `true` if an unprocessed one was replaced.
    pub fn publish(&self, reading: T) -> bool {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        slot.replace(reading).is_some()
    }

    /// Take the latest reading, leaving the slot empty
    pub fn take(&self) -> Option<T> {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        slot.take()
    }

    /// True when a reading is waiting
    pub fn is_pending(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }
}
