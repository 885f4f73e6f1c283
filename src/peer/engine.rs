//! Broadcast/merge engine activity.
//!
//! The engine batches operations and drives a merge round whenever the
//! global operation count crosses the threshold: broadcast buffered local
//! ops, wait briefly for peers' listeners to drain, aggregate late
//! arrivals, dedup by fingerprint, merge deterministically from a fresh
//! master read, write files under watcher suppression (the leader also
//! writes master), rebroadcast for convergence, and reset the counter.
//!
//! No single failure aborts a round: encode, send, and write errors are
//! logged and the protocol reconciles on subsequent rounds.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::ipc::{protocol, SendError};
use crate::peer::{files, terminal, PeerCtx};
use crate::sync::{merge, Document, Operation};

pub(crate) async fn run(ctx: Arc<PeerCtx>) {
    let mut pending: Vec<Operation> = Vec::new();
    loop {
        tokio::select! {
            _ = ctx.cancel.cancelled() => break,
            _ = sleep(ctx.config.batch_tick) => {}
        }

        pending.extend(ctx.state.drain_local());
        let early_received = ctx.state.drain_received();

        let total = ctx.registry.op_count();
        if total < ctx.config.op_threshold {
            continue;
        }

        if !pending.is_empty() {
            broadcast(&ctx, &pending).await;
            info!(peer = %ctx.name, count = pending.len(), "broadcasted local ops");
        }

        // Let the other listeners drain before aggregating.
        sleep(ctx.config.settle_delay).await;

        let late_received = ctx.state.drain_received();
        let late_local = ctx.state.drain_local();

        let mut batch: Vec<Operation> = Vec::with_capacity(
            pending.len() + early_received.len() + late_received.len() + late_local.len(),
        );
        batch.append(&mut pending);
        batch.extend(early_received);
        batch.extend(late_received);
        batch.extend(late_local);

        let unique: Vec<Operation> = {
            let seen = ctx.state.seen_lock();
            let mut in_batch = HashSet::new();
            batch
                .into_iter()
                .filter(|op| {
                    let fingerprint = op.fingerprint();
                    if seen.contains(&fingerprint) || in_batch.contains(&fingerprint) {
                        return false;
                    }
                    in_batch.insert(fingerprint);
                    true
                })
                .collect()
        };

        if unique.is_empty() {
            ctx.registry.reset_op_count();
            continue;
        }

        info!(peer = %ctx.name, ops = unique.len(), total, "merging batch");

        let base = match files::read_lines(&ctx.master_path) {
            Ok(lines) => Document::from_lines(lines),
            Err(err) => {
                warn!(peer = %ctx.name, error = %err, "failed to read master file; retrying next round");
                // Nothing was applied; carry the batch into the next round.
                pending = unique;
                continue;
            }
        };

        let merged = {
            let mut seen = ctx.state.seen_lock();
            merge(base, &unique, &mut seen)
        };

        ctx.state.set_suppressed(true);
        if ctx.registry.is_leader(&ctx.name) {
            match files::write_lines(&ctx.master_path, merged.lines()) {
                Ok(()) => info!(peer = %ctx.name, "leader wrote master file"),
                Err(err) => warn!(peer = %ctx.name, error = %err, "failed to write master file"),
            }
        }
        if let Err(err) = files::write_lines(&ctx.local_path, merged.lines()) {
            warn!(peer = %ctx.name, error = %err, "failed to write local file");
        }
        ctx.state.set_previous(merged.lines().to_vec());
        ctx.state.set_last_mtime(files::mtime(&ctx.local_path));
        ctx.state.set_suppressed(false);

        if ctx.config.render {
            terminal::show(
                &ctx.local_path.display().to_string(),
                merged.lines(),
                &unique,
                &ctx.state.peers(),
            );
        }

        // Rebroadcast the accepted batch so peers who missed the first
        // broadcast (full mailbox, late join) catch up.
        broadcast(&ctx, &unique).await;
        ctx.registry.reset_op_count();
    }
}

/// Sends every op to every other active peer, encoding each op once.
async fn broadcast(ctx: &PeerCtx, ops: &[Operation]) {
    let peers = ctx.registry.active_peers();
    for op in ops {
        let frame = match protocol::encode_op(op) {
            Ok(frame) => frame,
            Err(err) => {
                warn!(peer = %ctx.name, error = %err, "failed to encode op; skipping");
                continue;
            }
        };
        for peer in &peers {
            if peer.name == ctx.name {
                continue;
            }
            send_with_retry(ctx, &peer.mailbox, &frame).await;
        }
    }
}

/// Non-blocking send that tolerates a not-yet-created destination with a
/// bounded retry. Full or torn-down mailboxes drop the frame for this
/// round; the convergence rebroadcast covers the gap.
async fn send_with_retry(ctx: &PeerCtx, address: &str, frame: &[u8]) {
    let mut attempts = 0;
    loop {
        match ctx.hub.try_send(address, frame) {
            Ok(()) => return,
            Err(SendError::NotFound(_)) if attempts < ctx.config.send_retries => {
                attempts += 1;
                debug!(peer = %ctx.name, address, attempts, "mailbox not ready; retrying send");
                sleep(ctx.config.send_retry_backoff).await;
            }
            Err(err) => {
                warn!(peer = %ctx.name, error = %err, "dropping op for this round");
                return;
            }
        }
    }
}
