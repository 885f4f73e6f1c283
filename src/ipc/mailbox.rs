//! Named, bounded, point-to-point mailboxes.
//!
//! Each peer owns exactly one mailbox, keyed by an address derived from its
//! name. Any peer may open a send handle to any address; only the owner
//! holds the receive side. Delivery is FIFO within a channel, best-effort
//! across channels, and non-blocking on both ends: a send to a full or
//! missing mailbox fails immediately and the caller decides whether to
//! retry or drop.

use std::collections::HashMap;

use parking_lot::RwLock;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::{TryRecvError, TrySendError};

/// Derives a peer's mailbox address from its name.
pub fn address_for(peer: &str) -> String {
    format!("/queue_{peer}")
}

/// Non-blocking send failures.
#[derive(Debug, Error)]
pub enum SendError {
    /// The destination mailbox has not been created yet (peer not ready).
    #[error("mailbox {0} does not exist")]
    NotFound(String),
    /// The destination mailbox is at capacity.
    #[error("mailbox {0} is full")]
    Full(String),
    /// The destination mailbox was torn down while the address was resolving.
    #[error("mailbox {0} is closed")]
    Closed(String),
}

/// The host-wide set of mailboxes for one fleet.
///
/// Every peer shares one hub. Opening the receive side of an address
/// replaces any stale channel left behind by a previous incarnation of the
/// same peer.
pub struct MailboxHub {
    capacity: usize,
    senders: RwLock<HashMap<String, mpsc::Sender<Vec<u8>>>>,
}

impl MailboxHub {
    /// Creates a hub whose mailboxes each buffer up to `capacity` frames.
    pub fn new(capacity: usize) -> Self {
        MailboxHub {
            capacity,
            senders: RwLock::new(HashMap::new()),
        }
    }

    /// Opens (or re-creates) the receive side of a mailbox, exclusive to the
    /// owning peer. An existing channel under the same address is removed
    /// first, so a reconnecting peer starts with an empty mailbox.
    pub fn open_receive(&self, address: &str) -> Mailbox {
        let (sender, receiver) = mpsc::channel(self.capacity);
        self.senders.write().insert(address.to_string(), sender);
        Mailbox {
            address: address.to_string(),
            receiver,
        }
    }

    /// Sends one frame to the given address without blocking.
    pub fn try_send(&self, address: &str, frame: &[u8]) -> Result<(), SendError> {
        let sender = self
            .senders
            .read()
            .get(address)
            .cloned()
            .ok_or_else(|| SendError::NotFound(address.to_string()))?;
        sender.try_send(frame.to_vec()).map_err(|err| match err {
            TrySendError::Full(_) => SendError::Full(address.to_string()),
            TrySendError::Closed(_) => SendError::Closed(address.to_string()),
        })
    }

    /// Removes a mailbox. Returns false if the address was unknown.
    pub fn remove(&self, address: &str) -> bool {
        self.senders.write().remove(address).is_some()
    }

    /// Returns true if a mailbox exists at the given address.
    pub fn contains(&self, address: &str) -> bool {
        self.senders.read().contains_key(address)
    }

    /// Gets the per-mailbox frame capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// The owning receive side of one peer's mailbox.
pub struct Mailbox {
    address: String,
    receiver: mpsc::Receiver<Vec<u8>>,
}

impl Mailbox {
    /// Gets this mailbox's address.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Receives one frame without blocking; `None` when the mailbox is
    /// empty (or was torn down).
    pub fn try_recv(&mut self) -> Option<Vec<u8>> {
        match self.receiver.try_recv() {
            Ok(frame) => Some(frame),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }
}
