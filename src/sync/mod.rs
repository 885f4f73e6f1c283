//! Replication core: document model, diff, operations, and merge.
//!
//! This module contains the pure, deterministic heart of the system. Given
//! the same operation batch and the same master state, every peer computes
//! the same merged document here.

pub mod diff;
pub mod document;
pub mod merge;
pub mod types;

// Re-export the main public API
pub use diff::DiffEngine;
pub use document::Document;
pub use merge::merge;
pub use types::{Fingerprint, OpClock, OpKind, Operation};
