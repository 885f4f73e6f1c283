//! Per-peer snapshot state shared between the four activities.
//!
//! The watcher, listener, refresher, and engine all run against this
//! structure. Buffer drains are atomic (the drain takes ownership of the
//! contents and installs a fresh container), and the seen set's
//! check-then-insert is serialized by its mutex.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::time::SystemTime;

use parking_lot::{Mutex, MutexGuard};

use crate::ipc::registry::PeerEntry;
use crate::sync::{Fingerprint, Operation};

/// Mutable state of one peer process.
pub struct PeerState {
    /// Operations created locally, awaiting the next engine drain
    local_ops: Mutex<Vec<Operation>>,
    /// Operations received from other peers, awaiting the next engine drain
    received_ops: Mutex<Vec<Operation>>,
    /// Fingerprints of every operation this peer has applied
    seen: Mutex<HashSet<Fingerprint>>,
    /// The last-applied document content the watcher diffs against
    previous: Mutex<Vec<String>>,
    /// mtime of the local file at the last observation
    last_mtime: Mutex<Option<SystemTime>>,
    /// Cached active-peer snapshot, refreshed by the refresher
    peers: Mutex<Vec<PeerEntry>>,
    /// Set while the engine writes files, so the watcher ignores the
    /// resulting mtime change
    suppress_watch: AtomicBool,
}

impl PeerState {
    /// Creates state seeded with the bootstrapped document content.
    pub fn new(previous: Vec<String>, last_mtime: Option<SystemTime>) -> Self {
        PeerState {
            local_ops: Mutex::new(Vec::new()),
            received_ops: Mutex::new(Vec::new()),
            seen: Mutex::new(HashSet::new()),
            previous: Mutex::new(previous),
            last_mtime: Mutex::new(last_mtime),
            peers: Mutex::new(Vec::new()),
            suppress_watch: AtomicBool::new(false),
        }
    }

    /// Appends locally created operations.
    pub fn push_local(&self, ops: Vec<Operation>) {
        self.local_ops.lock().extend(ops);
    }

    /// Takes ownership of the local buffer, leaving it empty.
    pub fn drain_local(&self) -> Vec<Operation> {
        std::mem::take(&mut *self.local_ops.lock())
    }

    /// Takes ownership of the received buffer, leaving it empty.
    pub fn drain_received(&self) -> Vec<Operation> {
        std::mem::take(&mut *self.received_ops.lock())
    }

    /// Buffers a remote operation unless it was already applied or is
    /// already waiting in the receive buffer. Returns true if buffered.
    pub fn observe_remote(&self, op: &Operation) -> bool {
        let fingerprint = op.fingerprint();
        if self.seen.lock().contains(&fingerprint) {
            return false;
        }
        let mut received = self.received_ops.lock();
        if received.iter().any(|r| r.fingerprint() == fingerprint) {
            return false;
        }
        received.push(op.clone());
        true
    }

    /// Locks the seen set for a merge round, keeping the check-then-insert
    /// of every applied operation atomic with respect to the listener.
    pub fn seen_lock(&self) -> MutexGuard<'_, HashSet<Fingerprint>> {
        self.seen.lock()
    }

    /// Returns true if the fingerprint was already applied.
    pub fn is_seen(&self, fingerprint: &Fingerprint) -> bool {
        self.seen.lock().contains(fingerprint)
    }

    /// Snapshot of the last-applied content.
    pub fn previous(&self) -> Vec<String> {
        self.previous.lock().clone()
    }

    /// Replaces the last-applied content.
    pub fn set_previous(&self, lines: Vec<String>) {
        *self.previous.lock() = lines;
    }

    /// Gets the last observed local-file mtime.
    pub fn last_mtime(&self) -> Option<SystemTime> {
        *self.last_mtime.lock()
    }

    /// Records a newly observed local-file mtime.
    pub fn set_last_mtime(&self, mtime: Option<SystemTime>) {
        *self.last_mtime.lock() = mtime;
    }

    /// Gets the cached active-peer snapshot.
    pub fn peers(&self) -> Vec<PeerEntry> {
        self.peers.lock().clone()
    }

    /// Replaces the cached active-peer snapshot.
    pub fn set_peers(&self, peers: Vec<PeerEntry>) {
        *self.peers.lock() = peers;
    }

    /// Turns watcher suppression on or off around self-induced writes.
    pub fn set_suppressed(&self, suppressed: bool) {
        self.suppress_watch.store(suppressed, AtomicOrdering::SeqCst);
    }

    /// Returns true while the engine is writing files.
    pub fn is_suppressed(&self) -> bool {
        self.suppress_watch.load(AtomicOrdering::SeqCst)
    }
}
