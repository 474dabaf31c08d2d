//! Parser for `git worktree list --porcelain`.
//!
//! The output is a sequence of blocks separated by blank lines:
//!
//! ```text
//! worktree /path/to/repo
//! HEAD 1a2b3c4d...
//! branch refs/heads/main
//!
//! worktree /path/to/worktrees/feature-x
//! HEAD 5e6f7a8b...
//! detached
//! ```
//!
//! Git always lists the main worktree first, so the first parsed block is
//! the main one.

use std::path::PathBuf;

/// Length of the abbreviated commit id kept for display.
const SHORT_SHA_LEN: usize = 7;

/// One worktree as listed by git, before any per-worktree queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawWorktree {
    pub path: PathBuf,
    /// Abbreviated HEAD commit (empty for an unborn branch)
    pub head: String,
    /// Branch name without `refs/heads/`, empty when detached
    pub branch: String,
    pub is_main: bool,
    /// The entry is a bare repository (no working tree to inspect)
    pub is_bare: bool,
}

/// Parse porcelain output into raw entries, preserving git's order.
///
/// Blocks without a `worktree` line are dropped; unknown lines are ignored.
pub fn parse_porcelain(output: &str) -> Vec<RawWorktree> {
    let mut worktrees = Vec::new();
    let mut block = Block::default();

    for line in output.lines().map(|l| l.trim_end_matches('\r')) {
        if line.trim().is_empty() {
            block.finish(&mut worktrees);
            continue;
        }
        if let Some(path) = line.strip_prefix("worktree ") {
            block.path = Some(PathBuf::from(path));
        } else if let Some(sha) = line.strip_prefix("HEAD ") {
            block.head = sha.chars().take(SHORT_SHA_LEN).collect();
        } else if let Some(branch) = line.strip_prefix("branch refs/heads/") {
            block.branch = branch.to_string();
        } else if line == "bare" {
            block.is_bare = true;
        }
    }
    block.finish(&mut worktrees);

    worktrees
}

/// Accumulator for the block being parsed.
#[derive(Default)]
struct Block {
    path: Option<PathBuf>,
    head: String,
    branch: String,
    is_bare: bool,
}

impl Block {
    /// Close the current block, pushing it when it named a worktree.
    fn finish(&mut self, worktrees: &mut Vec<RawWorktree>) {
        let block = std::mem::take(self);
        if let Some(path) = block.path {
            worktrees.push(RawWorktree {
                path,
                head: block.head,
                branch: block.branch,
                is_main: worktrees.is_empty(),
                is_bare: block.is_bare,
            });
        }
    }
}
