//! Two-peer collaborative session hosted in a single process.
//!
//! Spawns `alice` and `bob` over a shared registry and mailbox hub inside a
//! temporary directory, plays external edits into their document files, and
//! prints the converged result.
//!
//! Run with: cargo run --example concurrent_editing

use std::sync::Arc;
use std::time::Duration;

use tempfile::tempdir;
use tokio::time::sleep;

use synctext::peer::files::{read_lines, write_lines};
use synctext::{MailboxHub, Peer, SharedRegistry, SyncConfig};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("synctext=info")
        .init();

    let dir = tempdir()?;
    let config = SyncConfig {
        dir: dir.path().to_path_buf(),
        op_threshold: 1,
        poll_interval: Duration::from_millis(50),
        batch_tick: Duration::from_millis(20),
        settle_delay: Duration::from_millis(20),
        listener_backoff: Duration::from_millis(20),
        refresh_interval: Duration::from_millis(100),
        render: false,
        ..SyncConfig::default()
    };

    write_lines(
        &config.master_path(),
        &["The meeting is at 10".to_string(), "Agenda: TBD".to_string()],
    )?;

    let registry = Arc::new(SharedRegistry::new());
    let hub = Arc::new(MailboxHub::new(config.mailbox_capacity));

    let alice = Peer::spawn("alice", config.clone(), registry.clone(), hub.clone()).await?;
    let bob = Peer::spawn("bob", config.clone(), registry.clone(), hub.clone()).await?;
    println!("leader: {}", if alice.is_leader() { "alice" } else { "bob" });

    // Alice reschedules the meeting.
    sleep(Duration::from_millis(200)).await;
    edit_line(&config, "alice", 0, "The meeting is at 11")?;
    sleep(Duration::from_millis(500)).await;

    // Bob fills in the agenda.
    edit_line(&config, "bob", 1, "Agenda: release planning")?;
    sleep(Duration::from_millis(500)).await;

    println!("\nmaster file:");
    for line in read_lines(&config.master_path())? {
        println!("  {line}");
    }
    println!("alice's copy:");
    for line in read_lines(&config.local_path("alice"))? {
        println!("  {line}");
    }
    println!("bob's copy:");
    for line in read_lines(&config.local_path("bob"))? {
        println!("  {line}");
    }

    alice.shutdown().await;
    bob.shutdown().await;
    Ok(())
}

fn edit_line(config: &SyncConfig, peer: &str, line: usize, text: &str) -> eyre::Result<()> {
    let path = config.local_path(peer);
    let mut content = read_lines(&path)?;
    while content.len() <= line {
        content.push(String::new());
    }
    content[line] = text.to_string();
    write_lines(&path, &content)?;
    println!("{peer} edited line {line}: {text}");
    Ok(())
}
