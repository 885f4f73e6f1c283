//! Operation identity for deduplication.
//!
//! This module contains the Fingerprint struct, the tuple that uniquely
//! identifies an operation across peers. Fingerprints are what the seen set
//! and the receive buffers key on.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::sync::types::operation::{OpKind, Operation};

/// The identity of an operation: every field that went into creating it.
///
/// Two operations with equal fingerprints are the same edit, no matter how
/// many times or over which channel they were delivered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint {
    pub author: String,
    pub sequence: u64,
    pub timestamp_ms: i64,
    pub kind: OpKind,
    pub line: usize,
    pub col_start: usize,
    pub col_end: usize,
    pub old_text: String,
    pub new_text: String,
}

impl From<&Operation> for Fingerprint {
    fn from(op: &Operation) -> Self {
        Fingerprint {
            author: op.author.clone(),
            sequence: op.sequence,
            timestamp_ms: op.timestamp_ms,
            kind: op.kind,
            line: op.line,
            col_start: op.col_start,
            col_end: op.col_end,
            old_text: op.old_text.clone(),
            new_text: op.new_text.clone(),
        }
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}|{}|{}|{:?}|{}|{}|{}|{}|{}",
            self.author,
            self.sequence,
            self.timestamp_ms,
            self.kind,
            self.line,
            self.col_start,
            self.col_end,
            self.old_text,
            self.new_text
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Operation {
        Operation {
            kind: OpKind::Replace,
            line: 2,
            col_start: 1,
            col_end: 4,
            old_text: "old".to_string(),
            new_text: "new".to_string(),
            author: "alice".to_string(),
            timestamp_ms: 1234,
            sequence: 7,
        }
    }

    #[test]
    fn test_equal_operations_share_a_fingerprint() {
        let a = sample();
        let b = sample();
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_any_field_change_alters_identity() {
        let base = sample().fingerprint();

        let mut other = sample();
        other.sequence = 8;
        assert_ne!(base, other.fingerprint());

        let mut other = sample();
        other.new_text = "mars".to_string();
        assert_ne!(base, other.fingerprint());

        let mut other = sample();
        other.author = "bob".to_string();
        assert_ne!(base, other.fingerprint());
    }

    #[test]
    fn test_display_carries_all_fields() {
        let rendered = sample().fingerprint().to_string();
        assert!(rendered.contains("alice"));
        assert!(rendered.contains("1234"));
        assert!(rendered.contains("old"));
        assert!(rendered.contains("new"));
    }
}
