//! Walk-through of the replication core without any runtime: diff two
//! versions of a document, inspect the operations, and merge them.
//!
//! Run with: cargo run --example simple

use std::collections::HashSet;

use synctext::{merge, DiffEngine, Document};

fn main() {
    let before = vec![
        "Hello World".to_string(),
        "This is a collaborative editor".to_string(),
    ];
    let after = vec![
        "Hello Mars".to_string(),
        "This is a collaborative editor".to_string(),
        "New closing line".to_string(),
    ];

    println!("=== Diff ===");
    let engine = DiffEngine::new("alice");
    let ops = engine.diff(&before, &after);
    for op in &ops {
        println!(
            "{:?} line {} cols [{}, {}) {:?} -> {:?} (seq {})",
            op.kind, op.line, op.col_start, op.col_end, op.old_text, op.new_text, op.sequence
        );
    }

    println!("\n=== Merge ===");
    let mut seen = HashSet::new();
    let merged = merge(Document::from_lines(before), &ops, &mut seen);
    for (index, line) in merged.lines().iter().enumerate() {
        println!("Line {index}: {line}");
    }

    // Re-delivering the same batch changes nothing.
    let again = merge(merged.clone(), &ops, &mut seen);
    assert_eq!(again, merged);
    println!("\nRe-merge of the same batch is a no-op: {} fingerprints seen", seen.len());
}
