//! Tuning knobs for a peer process.
//!
//! The protocol is correct for any positive values; these defaults trade a
//! little latency for batching and low idle cost.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Filename of the canonical converged document, written by the leader.
pub const MASTER_FILE: &str = "centeralFile.txt";

/// Per-peer runtime configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Directory holding the master and per-peer document files.
    pub dir: PathBuf,
    /// Master file name inside `dir`.
    pub master_file: String,
    /// Global operation count that triggers a merge round.
    pub op_threshold: u64,
    /// Frames buffered per mailbox before sends fail with "full".
    pub mailbox_capacity: usize,
    /// How often the watcher polls the local file's mtime.
    pub poll_interval: Duration,
    /// How often the engine checks the merge trigger.
    pub batch_tick: Duration,
    /// Pause between broadcast and aggregation, letting listeners drain.
    pub settle_delay: Duration,
    /// Listener sleep after an empty receive.
    pub listener_backoff: Duration,
    /// How often the refresher snapshots the active-peer list.
    pub refresh_interval: Duration,
    /// Extra attempts when a destination mailbox does not exist yet.
    pub send_retries: u32,
    /// Pause between those attempts.
    pub send_retry_backoff: Duration,
    /// Whether to render the terminal view (disabled in tests).
    pub render: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            dir: PathBuf::from("."),
            master_file: MASTER_FILE.to_string(),
            op_threshold: 5,
            mailbox_capacity: 10,
            poll_interval: Duration::from_secs(2),
            batch_tick: Duration::from_millis(50),
            settle_delay: Duration::from_millis(30),
            listener_backoff: Duration::from_millis(50),
            refresh_interval: Duration::from_secs(2),
            send_retries: 4,
            send_retry_backoff: Duration::from_millis(120),
            render: true,
        }
    }
}

impl SyncConfig {
    /// Path of the master file.
    pub fn master_path(&self) -> PathBuf {
        self.dir.join(&self.master_file)
    }

    /// Path of a peer's local document file.
    pub fn local_path(&self, peer: &str) -> PathBuf {
        self.dir.join(format!("{peer}_doc.txt"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths() {
        let config = SyncConfig::default();
        assert_eq!(config.master_path(), PathBuf::from("./centeralFile.txt"));
        assert_eq!(config.local_path("alice"), PathBuf::from("./alice_doc.txt"));
    }

    #[test]
    fn test_defaults_are_positive() {
        let config = SyncConfig::default();
        assert!(config.op_threshold > 0);
        assert!(config.mailbox_capacity > 0);
        assert!(config.poll_interval > Duration::ZERO);
        assert!(config.batch_tick > Duration::ZERO);
        assert!(config.settle_delay > Duration::ZERO);
    }
}
