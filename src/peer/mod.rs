//! Per-peer runtime: state, document bootstrap, and the four activities.
//!
//! A [`Peer`] joins the registry, opens its mailbox, bootstraps the master
//! and local document files, and runs four concurrent activities until shut
//! down: the file watcher, the mailbox listener, the peer refresher, and
//! the broadcast/merge engine.

mod engine;
mod listener;
mod refresher;
mod watcher;

pub mod files;
pub mod state;
pub mod terminal;

pub use state::PeerState;

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::SyncConfig;
use crate::ipc::{mailbox, JoinOutcome, MailboxHub, RegistryError, SharedRegistry};

/// Startup-fatal failures. Everything after startup is logged and retried.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("registry rejected peer {name}")]
    Registry {
        name: String,
        #[source]
        source: RegistryError,
    },
    #[error("document bootstrap failed")]
    Bootstrap(#[from] io::Error),
}

/// Everything the four activities share, behind one `Arc`.
pub(crate) struct PeerCtx {
    pub name: String,
    pub local_path: PathBuf,
    pub master_path: PathBuf,
    pub config: SyncConfig,
    pub registry: Arc<SharedRegistry>,
    pub hub: Arc<MailboxHub>,
    pub state: Arc<PeerState>,
    pub cancel: CancellationToken,
}

/// A running peer.
pub struct Peer {
    ctx: Arc<PeerCtx>,
    mailbox_address: String,
    tasks: Vec<JoinHandle<()>>,
}

impl Peer {
    /// Joins the fleet and starts the four activities.
    ///
    /// On a registry rejection or a bootstrap failure every partial step is
    /// rolled back (slot released, mailbox unlinked) before the error is
    /// returned.
    pub async fn spawn(
        name: &str,
        config: SyncConfig,
        registry: Arc<SharedRegistry>,
        hub: Arc<MailboxHub>,
    ) -> Result<Peer, StartupError> {
        let address = mailbox::address_for(name);
        let outcome = registry
            .join(name, &address)
            .map_err(|source| StartupError::Registry {
                name: name.to_string(),
                source,
            })?;
        match outcome {
            JoinOutcome::Joined => info!(peer = %name, "registered new peer"),
            JoinOutcome::Reconnected => info!(peer = %name, "reconnected existing peer"),
        }

        // Any stale channel from a previous incarnation is replaced.
        let peer_mailbox = hub.open_receive(&address);

        let master_path = config.master_path();
        let local_path = config.local_path(name);
        let bootstrap = (|| -> io::Result<Vec<String>> {
            files::ensure_master(&master_path)?;
            files::init_local(&local_path, &master_path)
        })();
        let content = match bootstrap {
            Ok(content) => content,
            Err(err) => {
                registry.leave(name);
                hub.remove(&address);
                return Err(err.into());
            }
        };

        let state = Arc::new(PeerState::new(content.clone(), files::mtime(&local_path)));
        state.set_peers(registry.active_peers());

        let ctx = Arc::new(PeerCtx {
            name: name.to_string(),
            local_path,
            master_path,
            config,
            registry,
            hub,
            state,
            cancel: CancellationToken::new(),
        });

        if ctx.config.render {
            terminal::show(
                &ctx.local_path.display().to_string(),
                &content,
                &[],
                &ctx.state.peers(),
            );
        }

        let tasks = vec![
            tokio::spawn(watcher::run(ctx.clone())),
            tokio::spawn(listener::run(ctx.clone(), peer_mailbox)),
            tokio::spawn(refresher::run(ctx.clone())),
            tokio::spawn(engine::run(ctx.clone())),
        ];

        Ok(Peer {
            ctx,
            mailbox_address: address,
            tasks,
        })
    }

    /// Gets this peer's name.
    pub fn name(&self) -> &str {
        &self.ctx.name
    }

    /// Gets the path of this peer's local document file.
    pub fn local_path(&self) -> &Path {
        &self.ctx.local_path
    }

    /// Returns true if this peer is currently the leader.
    pub fn is_leader(&self) -> bool {
        self.ctx.registry.is_leader(&self.ctx.name)
    }

    /// Stops the four activities, releases the registry slot, and unlinks
    /// the mailbox.
    pub async fn shutdown(mut self) {
        self.ctx.cancel.cancel();
        for task in self.tasks.drain(..) {
            let _ = task.await;
        }
        self.ctx.registry.leave(&self.ctx.name);
        self.ctx.hub.remove(&self.mailbox_address);
        info!(peer = %self.ctx.name, "peer shut down cleanly");
    }
}
