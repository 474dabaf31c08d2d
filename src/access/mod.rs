//! Last-access ledger for worktrees.
//!
//! Stored as a JSON object mapping absolute worktree paths to epoch
//! milliseconds. Every write rewrites the whole file; concurrent instances
//! simply overwrite each other.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Persistent map of worktree path -> last activation time.
#[derive(Debug, Clone)]
pub struct AccessLedger {
    path: PathBuf,
}

impl AccessLedger {
    /// Ledger in the user's data directory.
    pub fn load() -> Result<Self> {
        let data_dir = dirs::data_dir()
            .context("Could not find data directory")?
            .join("worktui");
        Ok(Self::at(data_dir.join("accessed.json")))
    }

    /// Ledger backed by an explicit file.
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current access times; an absent or unreadable file reads as empty.
    pub fn access_times(&self) -> HashMap<PathBuf, i64> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(_) => return HashMap::new(),
        };
        match serde_json::from_str::<HashMap<PathBuf, i64>>(&content) {
            Ok(times) => times,
            Err(e) => {
                log::warn!("Ignoring corrupt access ledger {}: {}", self.path.display(), e);
                HashMap::new()
            }
        }
    }

    /// Record `worktree` as accessed now.
    pub fn record_access(&self, worktree: &Path) -> Result<()> {
        self.record_access_at(worktree, chrono::Utc::now().timestamp_millis())
    }

    fn record_access_at(&self, worktree: &Path, millis: i64) -> Result<()> {
        let mut times = self.access_times();
        times.insert(worktree.to_path_buf(), millis);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("Failed to create data directory")?;
        }
        let content =
            serde_json::to_string_pretty(&times).context("Failed to serialize access ledger")?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write access ledger: {}", self.path.display()))?;

        log::debug!("Recorded access to {}", worktree.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger() -> (tempfile::TempDir, AccessLedger) {
        let dir = tempfile::tempdir().unwrap();
        let ledger = AccessLedger::at(dir.path().join("state").join("accessed.json"));
        (dir, ledger)
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let (_dir, ledger) = ledger();
        assert!(ledger.access_times().is_empty());
    }

    #[test]
    fn record_creates_file_and_upserts() {
        let (_dir, ledger) = ledger();
        ledger.record_access_at(Path::new("/code/worktrees/a"), 1_000).unwrap();
        ledger.record_access_at(Path::new("/code/worktrees/b"), 2_000).unwrap();
        ledger.record_access_at(Path::new("/code/worktrees/a"), 3_000).unwrap();

        let times = ledger.access_times();
        assert_eq!(times.len(), 2);
        assert_eq!(times[Path::new("/code/worktrees/a")], 3_000);
        assert_eq!(times[Path::new("/code/worktrees/b")], 2_000);
    }

    #[test]
    fn file_is_a_plain_path_to_millis_object() {
        let (_dir, ledger) = ledger();
        ledger.record_access_at(Path::new("/w"), 42).unwrap();
        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(ledger.path()).unwrap()).unwrap();
        assert_eq!(raw["/w"], 42);
    }

    #[test]
    fn corrupt_file_reads_as_empty_and_is_replaced_on_write() {
        let (_dir, ledger) = ledger();
        fs::create_dir_all(ledger.path().parent().unwrap()).unwrap();
        fs::write(ledger.path(), "[1, 2").unwrap();
        assert!(ledger.access_times().is_empty());

        ledger.record_access(Path::new("/w")).unwrap();
        assert_eq!(ledger.access_times().len(), 1);
    }
}
