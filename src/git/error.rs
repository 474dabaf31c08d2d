//! Errors surfaced by git operations.

/// Errors that can occur during worktree and branch operations.
#[derive(Debug)]
pub enum GitError {
    /// The path is not inside a git repository
    NotARepository,
    /// The branch name is not a valid git ref name
    InvalidBranchName(String),
    /// `git worktree add` exited non-zero (carries stderr)
    WorktreeCreationFailed(String),
    /// `git worktree remove` exited non-zero (carries stderr)
    RemovalFailed(String),
    /// `git branch -d/-D` exited non-zero (carries stderr)
    DeletionFailed(String),
    /// `git fetch` exited non-zero (carries stderr)
    FetchFailed(String),
    /// Any other command exited non-zero
    CommandFailed { command: String, stderr: String },
    /// The command could not be started at all
    Io(std::io::Error),
}

impl std::fmt::Display for GitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GitError::NotARepository => write!(f, "Not a git repository"),
            GitError::InvalidBranchName(reason) => write!(f, "Invalid branch name: {}", reason),
            GitError::WorktreeCreationFailed(stderr) => {
                write!(f, "Failed to create worktree: {}", stderr)
            }
            GitError::RemovalFailed(stderr) => write!(f, "Failed to remove worktree: {}", stderr),
            GitError::DeletionFailed(stderr) => write!(f, "Failed to delete branch: {}", stderr),
            GitError::FetchFailed(stderr) => write!(f, "Failed to fetch: {}", stderr),
            GitError::CommandFailed { command, stderr } => {
                write!(f, "{} failed: {}", command, stderr)
            }
            GitError::Io(e) => write!(f, "Failed to run command: {}", e),
        }
    }
}

impl std::error::Error for GitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GitError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for GitError {
    fn from(err: std::io::Error) -> Self {
        GitError::Io(err)
    }
}
