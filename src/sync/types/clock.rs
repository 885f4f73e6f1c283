//! Thread-safe stamping clock for locally created operations.
//!
//! This module contains the OpClock struct which stamps every operation the
//! diff engine emits with wall-clock milliseconds and a per-peer monotonic
//! sequence number.

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{SystemTime, UNIX_EPOCH};

/// A thread-safe clock producing (timestamp, sequence) stamps.
///
/// The timestamp provides global intuition for conflict resolution; the
/// sequence disambiguates rapid local edits that land on the same
/// millisecond. Peers never consult their own clock when merging, only the
/// stamps carried in the operation records, so clock skew between processes
/// does not affect determinism.
pub struct OpClock {
    sequence: AtomicU64,
}

impl OpClock {
    /// Creates a new clock; the first stamp carries sequence 1.
    pub fn new() -> Self {
        OpClock {
            sequence: AtomicU64::new(1),
        }
    }

    /// Produces the next stamp for this peer.
    pub fn stamp(&self) -> (i64, u64) {
        let timestamp_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as i64)
            .unwrap_or(0);
        let sequence = self.sequence.fetch_add(1, AtomicOrdering::SeqCst);
        (timestamp_ms, sequence)
    }

    /// Gets the next sequence number that would be issued (for debugging).
    pub fn current_sequence(&self) -> u64 {
        self.sequence.load(AtomicOrdering::SeqCst)
    }
}

impl Default for OpClock {
    fn default() -> Self {
        Self::new()
    }
}
