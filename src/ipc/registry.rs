//! Host-wide peer table, global operation counter, and leader election.
//!
//! The registry holds a small fixed number of peer slots plus the global
//! operation counter that triggers merge rounds. Slot activation and the
//! count adjustment happen under one lock, so observers using the count as
//! a trigger never see a half-registered peer.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering as AtomicOrdering};

use parking_lot::Mutex;
use thiserror::Error;

/// Maximum number of peers the table can hold.
pub const MAX_PEERS: usize = 5;

/// Maximum peer name length in characters.
pub const MAX_NAME_LEN: usize = 32;

/// A registered peer as seen by other peers: its name and mailbox address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerEntry {
    pub name: String,
    pub mailbox: String,
}

#[derive(Debug, Clone, Default)]
struct Slot {
    name: String,
    mailbox: String,
    active: bool,
}

/// Errors a peer can hit while joining the registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("peer table is full ({MAX_PEERS} peers)")]
    Full,
    #[error("invalid peer name {0:?}: must be 1-{MAX_NAME_LEN} printable characters")]
    InvalidName(String),
}

/// Outcome of a successful join.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    /// A free slot was claimed.
    Joined,
    /// The name was already present; its mailbox address was refreshed and
    /// neither the slot nor the count changed.
    Reconnected,
}

/// The shared peer registry.
///
/// One instance is shared by every peer of a fleet. Slots are guarded by a
/// mutex; the peer count and the global operation counter are atomics so
/// the hot paths (counter bumps, trigger checks) never block.
pub struct SharedRegistry {
    slots: Mutex<Vec<Slot>>,
    count: AtomicUsize,
    op_count: AtomicU64,
}

impl SharedRegistry {
    /// Creates an empty registry with `MAX_PEERS` free slots.
    pub fn new() -> Self {
        SharedRegistry {
            slots: Mutex::new(vec![Slot::default(); MAX_PEERS]),
            count: AtomicUsize::new(0),
            op_count: AtomicU64::new(0),
        }
    }

    /// Registers a peer, or refreshes its mailbox address if the name is
    /// already present (a reconnect).
    pub fn join(&self, name: &str, mailbox: &str) -> Result<JoinOutcome, RegistryError> {
        validate_name(name)?;

        let mut slots = self.slots.lock();
        if let Some(slot) = slots.iter_mut().find(|s| s.active && s.name == name) {
            slot.mailbox = mailbox.to_string();
            return Ok(JoinOutcome::Reconnected);
        }

        if self.count.load(AtomicOrdering::SeqCst) >= MAX_PEERS {
            return Err(RegistryError::Full);
        }
        let slot = slots
            .iter_mut()
            .find(|s| !s.active)
            .ok_or(RegistryError::Full)?;
        slot.name = name.to_string();
        slot.mailbox = mailbox.to_string();
        slot.active = true;
        self.count.fetch_add(1, AtomicOrdering::SeqCst);
        Ok(JoinOutcome::Joined)
    }

    /// Releases the peer's slot. Returns false if the name was not active.
    pub fn leave(&self, name: &str) -> bool {
        let mut slots = self.slots.lock();
        match slots.iter_mut().find(|s| s.active && s.name == name) {
            Some(slot) => {
                slot.active = false;
                slot.name.clear();
                slot.mailbox.clear();
                self.count.fetch_sub(1, AtomicOrdering::SeqCst);
                true
            }
            None => false,
        }
    }

    /// Snapshots the active peers.
    pub fn active_peers(&self) -> Vec<PeerEntry> {
        self.slots
            .lock()
            .iter()
            .filter(|s| s.active)
            .map(|s| PeerEntry {
                name: s.name.clone(),
                mailbox: s.mailbox.clone(),
            })
            .collect()
    }

    /// Gets the number of active peers.
    pub fn peer_count(&self) -> usize {
        self.count.load(AtomicOrdering::SeqCst)
    }

    /// Returns true iff `name` is the lexicographically smallest active
    /// peer name. At most one peer satisfies this at any instant.
    pub fn is_leader(&self, name: &str) -> bool {
        let slots = self.slots.lock();
        let smallest = slots
            .iter()
            .filter(|s| s.active)
            .map(|s| s.name.as_str())
            .min();
        smallest == Some(name)
    }

    /// Adds to the global operation counter, returning the new total.
    pub fn add_ops(&self, n: u64) -> u64 {
        self.op_count.fetch_add(n, AtomicOrdering::SeqCst) + n
    }

    /// Gets the global operation counter.
    pub fn op_count(&self) -> u64 {
        self.op_count.load(AtomicOrdering::SeqCst)
    }

    /// Resets the global operation counter to zero at the end of a merge
    /// round.
    pub fn reset_op_count(&self) {
        self.op_count.store(0, AtomicOrdering::SeqCst);
    }
}

impl Default for SharedRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_name(name: &str) -> Result<(), RegistryError> {
    let len = name.chars().count();
    if len == 0 || len > MAX_NAME_LEN || !name.chars().all(|c| c.is_ascii_graphic()) {
        return Err(RegistryError::InvalidName(name.to_string()));
    }
    Ok(())
}
