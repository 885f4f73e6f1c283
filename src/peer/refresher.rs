//! Peer refresher activity.
//!
//! Periodically snapshots the registry's active-peer list for the terminal
//! view and probes other peers' mailboxes, surfacing channels that have not
//! been created yet (a freshly joined peer whose listener is still coming
//! up).

use std::sync::Arc;

use tokio::time::sleep;
use tracing::debug;

use crate::peer::PeerCtx;

pub(crate) async fn run(ctx: Arc<PeerCtx>) {
    loop {
        tokio::select! {
            _ = ctx.cancel.cancelled() => break,
            _ = sleep(ctx.config.refresh_interval) => {}
        }

        let peers = ctx.registry.active_peers();
        for peer in &peers {
            if peer.name == ctx.name {
                continue;
            }
            if !ctx.hub.contains(&peer.mailbox) {
                debug!(peer = %ctx.name, target = %peer.name, "peer mailbox not open yet");
            }
        }
        ctx.state.set_peers(peers);
    }
}
