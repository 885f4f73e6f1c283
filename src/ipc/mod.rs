//! Host-local coordination capabilities.
//!
//! This module contains the shared peer registry, the per-peer bounded
//! mailboxes, and the wire codec for operation frames. The concrete
//! transports behind these capabilities are host-local by design; peers
//! address each other only through the registry and mailbox APIs.

pub mod mailbox;
pub mod protocol;
pub mod registry;

// Re-export main functionality
pub use mailbox::{Mailbox, MailboxHub, SendError};
pub use protocol::{decode_op, encode_op, ProtocolError};
pub use registry::{JoinOutcome, PeerEntry, RegistryError, SharedRegistry, MAX_NAME_LEN, MAX_PEERS};
