//! Deterministic batched merge.
//!
//! Every peer feeds the same batch of operations and the same master state
//! through this function and obtains the same document: operations are
//! sorted into application order, conflict losers are filtered out, and the
//! survivors are applied exactly once, gated by the seen set.

use std::collections::HashSet;

use crate::sync::document::Document;
use crate::sync::types::{Fingerprint, Operation};

/// Merges a batch of operations into the given base document.
///
/// The batch may contain operations that were already applied in an earlier
/// round; those are skipped via `seen`. Within the batch, an operation
/// survives only if it beats every other operation it conflicts with
/// (losers are dropped for this round). Survivors are applied in ascending
/// (timestamp, sequence, author) order and their fingerprints are recorded
/// in `seen`.
pub fn merge(base: Document, batch: &[Operation], seen: &mut HashSet<Fingerprint>) -> Document {
    let mut ordered: Vec<&Operation> = batch.iter().collect();
    ordered.sort_by(|a, b| a.application_order(b));

    let mut doc = base;
    for (i, op) in ordered.iter().enumerate() {
        let wins = ordered
            .iter()
            .enumerate()
            .all(|(j, other)| i == j || !op.conflicts_with(other) || op.beats(other));
        if !wins {
            continue;
        }

        let fingerprint = op.fingerprint();
        if seen.contains(&fingerprint) {
            continue;
        }
        doc.apply(op);
        seen.insert(fingerprint);
    }
    doc
}
