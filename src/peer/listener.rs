//! Mailbox listener activity.
//!
//! Drains the peer's mailbox with non-blocking receives, backing off
//! briefly when it runs empty. Every decoded operation is gated by the
//! seen set and the receive buffer before it counts toward the merge
//! trigger; duplicates arriving over any path are absorbed here.

use std::sync::Arc;

use tokio::time::sleep;
use tracing::{debug, warn};

use crate::ipc::{protocol, Mailbox};
use crate::peer::PeerCtx;

pub(crate) async fn run(ctx: Arc<PeerCtx>, mut mailbox: Mailbox) {
    loop {
        if ctx.cancel.is_cancelled() {
            break;
        }
        match mailbox.try_recv() {
            Some(frame) => match protocol::decode_op(&frame) {
                Ok(op) => {
                    if ctx.state.observe_remote(&op) {
                        ctx.registry.add_ops(1);
                        debug!(
                            peer = %ctx.name,
                            from = %op.author,
                            seq = op.sequence,
                            ts = op.timestamp_ms,
                            "received op"
                        );
                    }
                }
                Err(err) => {
                    warn!(peer = %ctx.name, error = %err, "dropping undecodable frame");
                }
            },
            None => {
                tokio::select! {
                    _ = ctx.cancel.cancelled() => break,
                    _ = sleep(ctx.config.listener_backoff) => {}
                }
            }
        }
    }
}
