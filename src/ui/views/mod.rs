//! Screens other than the worktree list. Each keeps its own state, handles
//! its own keys and renders itself; the caller maps key results to app
//! actions.

pub mod cleanup;
pub mod create;
pub mod delete;
pub mod detail;
pub mod fetch;
pub mod projects;

pub use cleanup::{CleanupKeyResult, CleanupPhase, CleanupState};
pub use create::{CreateKeyResult, CreateState};
pub use delete::{DeleteKeyResult, DeleteRow, DeleteState};
pub use detail::{DetailKeyResult, DetailState};
pub use fetch::{FetchKeyResult, FetchState};
pub use projects::{ProjectsKeyResult, ProjectsState};
