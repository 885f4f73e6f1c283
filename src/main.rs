//! Entry point for a SyncText peer process.
//!
//! Takes the peer name as its single positional argument, joins the fleet,
//! and runs the four activities until Ctrl-C. Startup failures (registry
//! full, document bootstrap) exit non-zero with a one-line diagnostic.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use eyre::{Result, WrapErr};
use tracing::info;
use tracing_subscriber::EnvFilter;

use synctext::{MailboxHub, Peer, SharedRegistry, SyncConfig};

#[derive(Debug, Parser)]
#[command(name = "synctext", about = "Peer-to-peer collaborative text editor")]
struct Args {
    /// Peer name; also keys the local document file and the mailbox address.
    name: String,
    /// Directory holding the master and per-peer document files.
    #[arg(long, default_value = ".")]
    dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("synctext=info")),
        )
        .init();

    let args = Args::parse();
    let config = SyncConfig {
        dir: args.dir,
        ..SyncConfig::default()
    };

    let registry = Arc::new(SharedRegistry::new());
    let hub = Arc::new(MailboxHub::new(config.mailbox_capacity));

    let peer = Peer::spawn(&args.name, config, registry, hub)
        .await
        .wrap_err("failed to start peer")?;
    info!(peer = %args.name, leader = peer.is_leader(), "peer running; press Ctrl-C to exit");

    tokio::signal::ctrl_c()
        .await
        .wrap_err("failed to listen for shutdown signal")?;
    peer.shutdown().await;
    Ok(())
}
