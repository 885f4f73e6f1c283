//! Edit operation record and its ordering rules.
//!
//! This module contains the Operation struct describing a single-segment edit
//! to one line of the document, together with the conflict predicate and the
//! total order used to pick winners and to order application during a merge.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::sync::types::fingerprint::Fingerprint;

/// The three edit shapes a single-segment line diff can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OpKind {
    /// New text appears at the start column; the old segment is empty.
    Insert,
    /// The old segment is removed; the new segment is empty.
    Delete,
    /// The old segment is substituted with the new segment.
    Replace,
}

/// A single-segment edit to one line of the shared document.
///
/// The column range `[col_start, col_end)` is interpreted in the line's
/// pre-state for deletes and replaces, and as an insertion point for inserts
/// (`col_end` is still carried because the conflict predicate uses it).
/// Author, timestamp, and sequence are stamped at creation time and travel
/// with the operation so that every peer merges with the same inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    /// What shape of edit this is
    pub kind: OpKind,
    /// Zero-based line index in the document
    pub line: usize,
    /// First affected column, counted in characters
    pub col_start: usize,
    /// One past the last affected column of the new segment
    pub col_end: usize,
    /// The segment expected at `col_start` in the pre-state (empty for inserts)
    pub old_text: String,
    /// The segment produced (empty for deletes)
    pub new_text: String,
    /// Name of the peer that created this operation
    pub author: String,
    /// Wall-clock milliseconds at creation
    pub timestamp_ms: i64,
    /// Per-peer monotonic counter, incremented on each operation
    pub sequence: u64,
}

impl Operation {
    /// Returns the identity fingerprint used to deduplicate this operation
    /// wherever it is observed (own buffer, peer broadcast, rebroadcast).
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::from(self)
    }

    /// Returns true if the two operations target the same line with
    /// overlapping column ranges.
    ///
    /// The upper bound `col_end` participates even for inserts, matching the
    /// value the diff engine emits.
    pub fn conflicts_with(&self, other: &Operation) -> bool {
        self.line == other.line
            && !(self.col_end <= other.col_start || other.col_end <= self.col_start)
    }

    /// Returns true if this operation beats `other` in a conflict.
    ///
    /// Larger timestamp wins; on equal timestamps, larger sequence wins; on
    /// equal sequence, the lexicographically smaller author wins. Every peer
    /// evaluates this from the stamps carried in the records, so the outcome
    /// is identical everywhere.
    pub fn beats(&self, other: &Operation) -> bool {
        if self.timestamp_ms != other.timestamp_ms {
            return self.timestamp_ms > other.timestamp_ms;
        }
        if self.sequence != other.sequence {
            return self.sequence > other.sequence;
        }
        self.author < other.author
    }

    /// The order in which operations are applied during a merge: ascending
    /// by (timestamp, sequence, author), the mirror image of [`Self::beats`].
    pub fn application_order(&self, other: &Operation) -> Ordering {
        (self.timestamp_ms, self.sequence, &self.author).cmp(&(
            other.timestamp_ms,
            other.sequence,
            &other.author,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn op(author: &str, timestamp_ms: i64, sequence: u64, line: usize, cols: (usize, usize)) -> Operation {
        Operation {
            kind: OpKind::Replace,
            line,
            col_start: cols.0,
            col_end: cols.1,
            old_text: "a".to_string(),
            new_text: "b".to_string(),
            author: author.to_string(),
            timestamp_ms,
            sequence,
        }
    }

    #[test]
    fn test_conflict_requires_same_line() {
        let a = op("alice", 1, 1, 0, (0, 3));
        let b = op("bob", 1, 1, 1, (0, 3));
        assert!(!a.conflicts_with(&b));
    }

    #[test]
    fn test_conflict_requires_overlap() {
        let a = op("alice", 1, 1, 0, (0, 3));
        let b = op("bob", 1, 1, 0, (3, 6));
        let c = op("bob", 1, 1, 0, (2, 5));

        // Touching ranges do not overlap
        assert!(!a.conflicts_with(&b));
        assert!(!b.conflicts_with(&a));

        assert!(a.conflicts_with(&c));
        assert!(c.conflicts_with(&a));
    }

    #[test]
    fn test_larger_timestamp_wins() {
        let older = op("alice", 100, 9, 0, (0, 1));
        let newer = op("bob", 200, 1, 0, (0, 1));
        assert!(newer.beats(&older));
        assert!(!older.beats(&newer));
    }

    #[test]
    fn test_larger_sequence_breaks_timestamp_tie() {
        let a = op("alice", 200, 1, 0, (0, 1));
        let b = op("bob", 200, 2, 0, (0, 1));
        assert!(b.beats(&a));
        assert!(!a.beats(&b));
    }

    #[test]
    fn test_smaller_author_breaks_full_tie() {
        let a = op("alice", 200, 1, 0, (0, 1));
        let b = op("bob", 200, 1, 0, (0, 1));
        assert!(a.beats(&b));
        assert!(!b.beats(&a));
    }

    #[test]
    fn test_application_order_is_ascending() {
        let mut ops = vec![
            op("bob", 200, 1, 0, (0, 1)),
            op("alice", 100, 5, 0, (0, 1)),
            op("alice", 200, 1, 0, (0, 1)),
        ];
        ops.sort_by(|a, b| a.application_order(b));

        assert_eq!(ops[0].timestamp_ms, 100);
        assert_eq!(ops[1].author, "alice");
        assert_eq!(ops[2].author, "bob");
    }
}
