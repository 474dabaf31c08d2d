//! Fuzzy filtering for worktree, branch and project lists.

pub mod fuzzy;

pub use fuzzy::{filter_indices, score};
