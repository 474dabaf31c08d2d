//! Git integration for worktui.
//!
//! All repository access goes through the `git` binary via [`WorktreeManager`].

mod error;
mod manager;
mod porcelain;
pub mod runner;
mod types;

pub use error::GitError;
pub use manager::{branch_to_folder, validate_branch_name, worktree_target, WorktreeManager};
pub use porcelain::{parse_porcelain, RawWorktree};
pub use runner::{CommandOutput, CommandRunner, SystemRunner};
pub use types::{Created, RemoteBranch, Worktree};

#[cfg(test)]
pub(crate) use types::fixtures;
