//! File watcher activity.
//!
//! Polls the local file's mtime at a fixed interval. Changes made while the
//! engine holds the suppression flag are self-writes and only refresh the
//! snapshot; external edits are diffed into operations, buffered, and
//! counted toward the global merge trigger.

use std::sync::Arc;

use tokio::time::sleep;
use tracing::{info, warn};

use crate::peer::{files, terminal, PeerCtx};
use crate::sync::DiffEngine;

pub(crate) async fn run(ctx: Arc<PeerCtx>) {
    let diff = DiffEngine::new(ctx.name.clone());
    loop {
        tokio::select! {
            _ = ctx.cancel.cancelled() => break,
            _ = sleep(ctx.config.poll_interval) => {}
        }

        let Some(mtime) = files::mtime(&ctx.local_path) else {
            continue;
        };
        let newer = match ctx.state.last_mtime() {
            Some(last) => mtime > last,
            None => true,
        };
        if !newer {
            continue;
        }

        if ctx.state.is_suppressed() {
            // Self-induced write; refresh the snapshot silently.
            match files::read_lines(&ctx.local_path) {
                Ok(lines) => {
                    ctx.state.set_previous(lines);
                    ctx.state.set_last_mtime(Some(mtime));
                }
                Err(err) => {
                    warn!(peer = %ctx.name, error = %err, "failed to refresh after self-write");
                }
            }
            continue;
        }

        let current = match files::read_lines(&ctx.local_path) {
            Ok(lines) => lines,
            Err(err) => {
                warn!(peer = %ctx.name, error = %err, "failed to read local file");
                continue;
            }
        };

        let previous = ctx.state.previous();
        let ops = diff.diff(&previous, &current);
        if !ops.is_empty() {
            for op in &ops {
                info!(
                    peer = %ctx.name,
                    line = op.line,
                    col_start = op.col_start,
                    col_end = op.col_end,
                    old = %op.old_text,
                    new = %op.new_text,
                    "local change detected"
                );
            }
            let count = ops.len() as u64;
            if ctx.config.render {
                terminal::show(&ctx.local_path.display().to_string(), &current, &ops, &ctx.state.peers());
            }
            ctx.state.push_local(ops);
            ctx.registry.add_ops(count);
        }
        ctx.state.set_previous(current);
        ctx.state.set_last_mtime(Some(mtime));
    }
}
