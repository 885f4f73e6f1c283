//! Document files on disk: bootstrap, reads, writes, mtime probes.
//!
//! Files hold newline-terminated lines. A missing file reads as empty
//! content; write failures are surfaced to the caller, which logs and lets
//! the next merge round retry.

use std::fs;
use std::io;
use std::path::Path;
use std::time::SystemTime;

use tracing::info;

/// Content a fresh master file is seeded with.
pub const DEFAULT_DOCUMENT: [&str; 4] = [
    "Hello World",
    "This is a collaborative editor",
    "Welcome to SyncText",
    "Edit this document and see real-time updates",
];

/// Reads a line file; a missing file is empty content.
pub fn read_lines(path: &Path) -> io::Result<Vec<String>> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(text.lines().map(str::to_string).collect()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(err) => Err(err),
    }
}

/// Writes lines with trailing newlines, replacing the file.
pub fn write_lines(path: &Path, lines: &[String]) -> io::Result<()> {
    let mut text = String::new();
    for line in lines {
        text.push_str(line);
        text.push('\n');
    }
    fs::write(path, text)
}

/// Gets a file's modification time, or `None` if it cannot be read.
pub fn mtime(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|meta| meta.modified()).ok()
}

/// Seeds the master file with the default document if it is absent or
/// empty.
pub fn ensure_master(path: &Path) -> io::Result<()> {
    let needs_seed = match fs::metadata(path) {
        Ok(meta) => meta.len() == 0,
        Err(err) if err.kind() == io::ErrorKind::NotFound => true,
        Err(err) => return Err(err),
    };
    if needs_seed {
        let lines: Vec<String> = DEFAULT_DOCUMENT.iter().map(|s| s.to_string()).collect();
        write_lines(path, &lines)?;
        info!(path = %path.display(), "seeded master file with the default document");
    }
    Ok(())
}

/// Initializes a peer's local file and returns its content.
///
/// A missing local file is created from master; a local file strictly older
/// than master is refreshed from it (the peer was away while others
/// converged).
pub fn init_local(local: &Path, master: &Path) -> io::Result<Vec<String>> {
    let missing = !local.exists();
    let stale = matches!(
        (mtime(local), mtime(master)),
        (Some(local_mtime), Some(master_mtime)) if local_mtime < master_mtime
    );

    if missing || stale {
        let content = read_lines(master)?;
        write_lines(local, &content)?;
        info!(
            path = %local.display(),
            reason = if missing { "created" } else { "outdated" },
            "initialized local file from master"
        );
        return Ok(content);
    }
    read_lines(local)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_missing_file_reads_as_empty() {
        let dir = tempdir().unwrap();
        assert!(read_lines(&dir.path().join("absent.txt")).unwrap().is_empty());
    }

    #[test]
    fn test_write_read_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.txt");
        let content = lines(&["one", "two", ""]);

        write_lines(&path, &content).unwrap();
        assert_eq!(read_lines(&path).unwrap(), content);
    }

    #[test]
    fn test_master_is_seeded_when_absent_or_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("centeralFile.txt");

        ensure_master(&path).unwrap();
        let seeded = read_lines(&path).unwrap();
        assert_eq!(seeded, lines(&DEFAULT_DOCUMENT));

        // An empty file is re-seeded.
        fs::write(&path, "").unwrap();
        ensure_master(&path).unwrap();
        assert_eq!(read_lines(&path).unwrap(), seeded);
    }

    #[test]
    fn test_existing_master_is_left_alone() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("centeralFile.txt");
        let content = lines(&["custom"]);
        write_lines(&path, &content).unwrap();

        ensure_master(&path).unwrap();
        assert_eq!(read_lines(&path).unwrap(), content);
    }

    #[test]
    fn test_local_is_created_from_master() {
        let dir = tempdir().unwrap();
        let master = dir.path().join("centeralFile.txt");
        let local = dir.path().join("alice_doc.txt");
        let content = lines(&["X", "Y"]);
        write_lines(&master, &content).unwrap();

        let initialized = init_local(&local, &master).unwrap();
        assert_eq!(initialized, content);
        assert_eq!(read_lines(&local).unwrap(), content);
    }

    #[test]
    fn test_fresh_local_is_kept() {
        let dir = tempdir().unwrap();
        let master = dir.path().join("centeralFile.txt");
        let local = dir.path().join("alice_doc.txt");
        write_lines(&master, &lines(&["master"])).unwrap();
        write_lines(&local, &lines(&["local edits"])).unwrap();

        // Local is at least as new as master, so it survives.
        let content = init_local(&local, &master).unwrap();
        assert_eq!(content, lines(&["local edits"]));
    }
}
