//! Line-oriented document model and operation application.
//!
//! This module contains the Document struct, a sequence of lines addressed
//! by zero-based index, and the apply semantics that make re-delivered or
//! superseded operations harmless no-ops.

use crate::sync::types::{OpKind, Operation};

/// The shared document: a sequence of lines without terminators.
///
/// The document grows on demand when an operation references a line index
/// beyond the current length; missing lines are materialized as empty
/// strings. Column arithmetic counts characters, never bytes, so multi-byte
/// text cannot be split mid-scalar and every peer computes identical
/// positions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    lines: Vec<String>,
}

impl Document {
    /// Creates an empty document.
    pub fn new() -> Self {
        Document { lines: Vec::new() }
    }

    /// Creates a document from an existing line sequence.
    pub fn from_lines(lines: Vec<String>) -> Self {
        Document { lines }
    }

    /// Returns the document's lines.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Consumes the document, returning its lines.
    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    /// Returns the number of lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Returns true if the document has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Applies a single operation to the document.
    ///
    /// The document is first extended with empty lines until the target line
    /// exists; columns are then clamped to the line's current length.
    /// An operation whose expected old text no longer matches is NOT an
    /// error: it was superseded or already applied, and the apply silently
    /// no-ops. Re-applying an operation to the line it produced yields the
    /// same line.
    pub fn apply(&mut self, op: &Operation) {
        while self.lines.len() <= op.line {
            self.lines.push(String::new());
        }

        let line: Vec<char> = self.lines[op.line].chars().collect();
        let updated = apply_to_line(&line, op);
        self.lines[op.line] = updated.into_iter().collect();
    }
}

fn apply_to_line(line: &[char], op: &Operation) -> Vec<char> {
    let start = op.col_start.min(line.len());
    let old: Vec<char> = op.old_text.chars().collect();
    let new: Vec<char> = op.new_text.chars().collect();

    match op.kind {
        OpKind::Insert => insert_guarded(line, start, &new),
        OpKind::Delete => {
            if segment_matches(line, start, &old) {
                let mut out = line[..start].to_vec();
                out.extend_from_slice(&line[start + old.len()..]);
                out
            } else {
                line.to_vec()
            }
        }
        OpKind::Replace => {
            if !old.is_empty() && segment_matches(line, start, &old) {
                let mut out = line[..start].to_vec();
                out.extend_from_slice(&new);
                out.extend_from_slice(&line[start + old.len()..]);
                out
            } else {
                // Expected text is gone; fall back to a guarded insertion.
                insert_guarded(line, start, &new)
            }
        }
    }
}

/// Inserts `new` at `start` unless the identical segment is already there.
fn insert_guarded(line: &[char], start: usize, new: &[char]) -> Vec<char> {
    if segment_matches(line, start, new) {
        return line.to_vec();
    }
    let mut out = line[..start].to_vec();
    out.extend_from_slice(new);
    out.extend_from_slice(&line[start..]);
    out
}

fn segment_matches(line: &[char], start: usize, segment: &[char]) -> bool {
    !segment.is_empty()
        && start + segment.len() <= line.len()
        && line[start..start + segment.len()] == *segment
}

#[cfg(test)]
mod tests {
    use super::*;

    fn op(kind: OpKind, line: usize, col_start: usize, col_end: usize, old: &str, new: &str) -> Operation {
        Operation {
            kind,
            line,
            col_start,
            col_end,
            old_text: old.to_string(),
            new_text: new.to_string(),
            author: "alice".to_string(),
            timestamp_ms: 1,
            sequence: 1,
        }
    }

    fn doc(lines: &[&str]) -> Document {
        Document::from_lines(lines.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_replace_matching_segment() {
        let mut d = doc(&["Hello World"]);
        d.apply(&op(OpKind::Replace, 0, 6, 10, "World", "Mars"));
        assert_eq!(d.lines(), ["Hello Mars"]);
    }

    #[test]
    fn test_insert_and_delete() {
        let mut d = doc(&["Hell"]);
        d.apply(&op(OpKind::Insert, 0, 4, 5, "", "o"));
        assert_eq!(d.lines(), ["Hello"]);

        d.apply(&op(OpKind::Delete, 0, 0, 0, "He", ""));
        assert_eq!(d.lines(), ["llo"]);
    }

    #[test]
    fn test_missing_lines_are_materialized() {
        let mut d = Document::new();
        d.apply(&op(OpKind::Insert, 2, 0, 3, "", "tail"));
        assert_eq!(d.lines(), ["", "", "tail"]);
    }

    #[test]
    fn test_insert_is_idempotent_at_line_end() {
        let mut d = doc(&["abc"]);
        let o = op(OpKind::Insert, 0, 3, 5, "", "de");

        d.apply(&o);
        assert_eq!(d.lines(), ["abcde"]);

        // Re-delivery must not double the segment, even at the boundary.
        d.apply(&o);
        assert_eq!(d.lines(), ["abcde"]);
    }

    #[test]
    fn test_delete_mismatch_is_a_noop() {
        let mut d = doc(&["Hello Mars"]);
        d.apply(&op(OpKind::Delete, 0, 6, 11, "World", ""));
        assert_eq!(d.lines(), ["Hello Mars"]);
    }

    #[test]
    fn test_replace_falls_back_to_guarded_insert() {
        let mut d = doc(&["Hello"]);
        let o = op(OpKind::Replace, 0, 5, 10, " World", " Mars");

        d.apply(&o);
        assert_eq!(d.lines(), ["Hello Mars"]);

        d.apply(&o);
        assert_eq!(d.lines(), ["Hello Mars"]);
    }

    #[test]
    fn test_columns_count_characters_not_bytes() {
        let mut d = doc(&["héllo"]);
        d.apply(&op(OpKind::Replace, 0, 1, 2, "é", "e"));
        assert_eq!(d.lines(), ["hello"]);
    }

    #[test]
    fn test_columns_are_clamped_to_line_length() {
        let mut d = doc(&["ab"]);
        d.apply(&op(OpKind::Insert, 0, 50, 51, "", "c"));
        assert_eq!(d.lines(), ["abc"]);
    }
}
