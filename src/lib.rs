//! # SyncText — peer-to-peer collaborative text replication
//!
//! Each participating process owns a local copy of a shared document and
//! watches it for edits made in any external editor. Peers discover each
//! other through a shared registry, exchange single-segment line operations
//! over bounded point-to-point mailboxes, and periodically converge all
//! copies through a deterministic batched merge. The active peer with the
//! lexicographically smallest name additionally persists the converged
//! state to the canonical master file.
//!
//! ## Features
//!
//! - **Deterministic convergence**: every peer fed the same batch and the
//!   same master state computes the same document
//! - **Idempotent application**: duplicated or superseded operations are
//!   harmless no-ops, so delivery may be best-effort and unordered
//! - **Batched rounds**: merges trigger on an operation-count threshold,
//!   amortizing synchronization instead of reacting to every keystroke
//! - **Single-writer master**: leadership is derived, not negotiated
//!
//! ## Example
//!
//! ```rust
//! use synctext::{DiffEngine, Document};
//!
//! let engine = DiffEngine::new("alice");
//! let before = vec!["Hello World".to_string()];
//! let after = vec!["Hello Mars".to_string()];
//!
//! let ops = engine.diff(&before, &after);
//! let mut doc = Document::from_lines(before);
//! for op in &ops {
//!     doc.apply(op);
//! }
//! assert_eq!(doc.lines(), after.as_slice());
//! ```

pub mod config;
pub mod ipc;
pub mod peer;
pub mod sync;

// Re-export the main public API
pub use config::SyncConfig;
pub use ipc::{
    JoinOutcome, Mailbox, MailboxHub, PeerEntry, RegistryError, SendError, SharedRegistry,
    MAX_PEERS,
};
pub use peer::{Peer, PeerState, StartupError};
pub use sync::{merge, DiffEngine, Document, Fingerprint, OpClock, OpKind, Operation};
