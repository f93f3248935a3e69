//! Per-mode request sequencing.
//!
//! Remote calls cannot be cancelled, so two requests for the same mode may
//! resolve out of order. Every request gets a sequence number; only the
//! response carrying the latest number issued for its mode may be applied.

use std::collections::{BTreeSet, HashMap};

use super::types::Mode;

#[derive(Debug, Default)]
struct ModeRequests {
    latest: u64,
    pending: BTreeSet<u64>,
}

/// Tracks issued and outstanding requests per mode.
#[derive(Debug, Default)]
pub struct RequestTracker {
    modes: HashMap<Mode, ModeRequests>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next sequence number for `mode` and mark it in flight.
    pub fn issue(&mut self, mode: Mode) -> u64 {
        let entry = self.modes.entry(mode).or_default();
        entry.latest += 1;
        entry.pending.insert(entry.latest);
        entry.latest
    }

    /// Mark `seq` resolved. Returns true iff it is the latest issued for
    /// `mode`, i.e. its response may be applied.
    pub fn settle(&mut self, mode: Mode, seq: u64) -> bool {
        match self.modes.get_mut(&mode) {
            Some(entry) => {
                entry.pending.remove(&seq);
                entry.latest == seq
            }
            None => false,
        }
    }

    pub fn is_in_flight(&self, mode: Mode) -> bool {
        self.modes
            .get(&mode)
            .map(|e| !e.pending.is_empty())
            .unwrap_or(false)
    }

    pub fn latest(&self, mode: Mode) -> u64 {
        self.modes.get(&mode).map(|e| e.latest).unwrap_or(0)
    }

    /// Modes with at least one request outstanding.
    pub fn in_flight_modes(&self) -> Vec<Mode> {
        Mode::ALL
            .into_iter()
            .filter(|m| self.is_in_flight(*m))
            .collect()
    }
}
