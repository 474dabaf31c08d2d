//! worktui library crate.
//!
//! This library provides the core functionality for worktui, including:
//! - Git worktree listing, creation and removal
//! - Claude session discovery per worktree
//! - The dashboard state machine, its background worker and terminal UI

pub mod access;
pub mod app;
pub mod claude;
pub mod config;
pub mod event_loop;
pub mod git;
pub mod handlers;
pub mod input;
pub mod launch;
pub mod projects;
pub mod search;
pub mod ui;
pub mod worker;
