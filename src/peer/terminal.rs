//! Terminal view of the document and fleet.
//!
//! Renders the current document with a per-line marker for lines touched in
//! the most recent change set, the active peers, and a short status line.

use chrono::Local;

use crate::ipc::registry::PeerEntry;
use crate::sync::Operation;

/// Renders the view as a string (separated from printing for testability).
pub fn render(
    file_name: &str,
    lines: &[String],
    changes: &[Operation],
    peers: &[PeerEntry],
) -> String {
    let mut out = String::new();
    out.push_str(&format!("Document: {file_name}\n"));
    out.push_str(&format!(
        "Last updated: {}\n",
        Local::now().format("%H:%M:%S")
    ));
    out.push_str("----------------------------------------\n");
    for (index, line) in lines.iter().enumerate() {
        let modified = changes.iter().any(|op| op.line == index);
        out.push_str(&format!("Line {index}: {line}"));
        if modified {
            out.push_str(" [MODIFIED]");
        }
        out.push('\n');
    }
    out.push_str("----------------------------------------\n");
    let names: Vec<&str> = peers.iter().map(|p| p.name.as_str()).collect();
    out.push_str(&format!("Active peers: {}\n", names.join(", ")));
    out.push_str("Monitoring for changes...\n");
    out
}

/// Clears the terminal and prints the rendered view.
pub fn show(file_name: &str, lines: &[String], changes: &[Operation], peers: &[PeerEntry]) {
    print!("\x1b[2J\x1b[1;1H{}", render(file_name, lines, changes, peers));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::OpKind;

    #[test]
    fn test_render_marks_changed_lines() {
        let lines = vec!["Hello Mars".to_string(), "Welcome".to_string()];
        let changes = vec![Operation {
            kind: OpKind::Replace,
            line: 0,
            col_start: 6,
            col_end: 10,
            old_text: "World".to_string(),
            new_text: "Mars".to_string(),
            author: "alice".to_string(),
            timestamp_ms: 1,
            sequence: 1,
        }];
        let peers = vec![
            PeerEntry {
                name: "alice".to_string(),
                mailbox: "/queue_alice".to_string(),
            },
            PeerEntry {
                name: "bob".to_string(),
                mailbox: "/queue_bob".to_string(),
            },
        ];

        let view = render("alice_doc.txt", &lines, &changes, &peers);
        assert!(view.contains("Line 0: Hello Mars [MODIFIED]"));
        assert!(view.contains("Line 1: Welcome\n"));
        assert!(!view.contains("Line 1: Welcome [MODIFIED]"));
        assert!(view.contains("Active peers: alice, bob"));
        assert!(view.contains("Document: alice_doc.txt"));
    }
}
