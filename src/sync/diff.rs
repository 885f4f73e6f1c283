//! Single-segment per-line diff engine.
//!
//! Given the previously applied content and the freshly read content of a
//! peer's local file, the diff engine produces one operation per differing
//! line index, stamped with the peer's name, wall-clock milliseconds, and a
//! monotonic sequence number.
//!
//! The diff deliberately tracks a single changed segment per line (common
//! prefix, common suffix, one differing span in between) rather than
//! intra-line tokens; combined with the merge policy this is sufficient for
//! convergence.

use crate::sync::types::{OpClock, OpKind, Operation};

/// Converts content changes into stamped operations for one peer.
pub struct DiffEngine {
    author: String,
    clock: OpClock,
}

impl DiffEngine {
    /// Creates a diff engine stamping operations with the given peer name.
    pub fn new(author: impl Into<String>) -> Self {
        DiffEngine {
            author: author.into(),
            clock: OpClock::new(),
        }
    }

    /// Gets the peer name this engine stamps operations with.
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Diffs two line sequences, producing one operation per differing line
    /// index in `[0, max(|before|, |after|))`. Absent lines on either side
    /// compare as empty. Identical inputs produce no operations.
    pub fn diff(&self, before: &[String], after: &[String]) -> Vec<Operation> {
        let line_count = before.len().max(after.len());
        let mut ops = Vec::new();
        for index in 0..line_count {
            let a = before.get(index).map(String::as_str).unwrap_or("");
            let b = after.get(index).map(String::as_str).unwrap_or("");
            if a != b {
                ops.push(self.diff_line(index, a, b));
            }
        }
        ops
    }

    /// Diffs a single line: greedy common prefix, then a common suffix walk
    /// from both ends, leaving one differing segment on each side.
    fn diff_line(&self, line: usize, a: &str, b: &str) -> Operation {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();

        let mut start = 0;
        while start < a.len().min(b.len()) && a[start] == b[start] {
            start += 1;
        }

        let mut a_end = a.len();
        let mut b_end = b.len();
        while a_end > start && b_end > start && a[a_end - 1] == b[b_end - 1] {
            a_end -= 1;
            b_end -= 1;
        }

        let old_text: String = a[start..a_end].iter().collect();
        let new_text: String = b[start..b_end].iter().collect();

        let kind = if old_text.is_empty() {
            OpKind::Insert
        } else if new_text.is_empty() {
            OpKind::Delete
        } else {
            OpKind::Replace
        };

        let (timestamp_ms, sequence) = self.clock.stamp();
        Operation {
            kind,
            line,
            col_start: start,
            col_end: b_end,
            old_text,
            new_text,
            author: self.author.clone(),
            timestamp_ms,
            sequence,
        }
    }
}
