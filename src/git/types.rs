//! Snapshot types produced by the worktree manager.

use std::path::PathBuf;

use chrono::{DateTime, FixedOffset, TimeZone, Utc};

/// A git worktree as shown in the dashboard.
///
/// Snapshots are never patched in place: every refresh builds a new set.
#[derive(Debug, Clone, PartialEq)]
pub struct Worktree {
    /// Absolute path, unique per repository
    pub path: PathBuf,
    /// Branch name, empty when HEAD is detached
    pub branch: String,
    /// Abbreviated HEAD commit id
    pub head: String,
    pub commit_subject: String,
    pub commit_date: DateTime<FixedOffset>,
    /// Staged, unstaged, or untracked changes present
    pub is_dirty: bool,
    /// The repository's main working tree (exactly one per repository)
    pub is_main: bool,
    pub session_count: usize,
    /// Summary of the most recent assistant session, may be empty
    pub last_session_summary: String,
    /// Last time this worktree was activated from the dashboard
    pub last_accessed: Option<DateTime<Utc>>,
}

impl Worktree {
    /// Branch name, or `(detached)` when there is none.
    pub fn display_branch(&self) -> &str {
        if self.branch.is_empty() {
            "(detached)"
        } else {
            &self.branch
        }
    }

    /// Attach a last-access time given as epoch milliseconds.
    pub fn with_last_accessed_millis(mut self, millis: Option<i64>) -> Self {
        self.last_accessed = millis.and_then(|ms| Utc.timestamp_millis_opt(ms).single());
        self
    }
}

/// A remote-tracking branch that has no local worktree yet.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteBranch {
    /// Branch name with the remote prefix stripped
    pub name: String,
    pub date: Option<DateTime<FixedOffset>>,
    pub author: String,
}

/// Result of [`WorktreeManager::create_worktree`](super::WorktreeManager::create_worktree).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Created {
    pub path: PathBuf,
    /// The target directory already existed and was returned as is
    pub reused: bool,
    /// Non-fatal problems from best-effort follow-up steps
    pub warnings: Vec<String>,
}
