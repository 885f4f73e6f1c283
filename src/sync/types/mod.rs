//! Type definitions for the replication core.
//!
//! This module contains the fundamental types used throughout the sync
//! engine, organized into focused submodules.

pub mod clock;
pub mod fingerprint;
pub mod operation;

// Re-export all public types
pub use clock::OpClock;
pub use fingerprint::Fingerprint;
pub use operation::{OpKind, Operation};
