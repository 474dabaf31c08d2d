//! # Test utilities for worktui
//!
//! `TestRepo` creates an isolated git repository in a temporary directory.
//! The main checkout lives in `<tmp>/app`, so worktrees created by
//! worktui land in `<tmp>/worktrees/<folder>` inside the same temp dir.
//!
//! Paths are canonicalized to handle platforms where the temp dir is a
//! symlink.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;

use tempfile::TempDir;
use worktui::access::AccessLedger;
use worktui::claude::ClaudeSessions;
use worktui::git::WorktreeManager;
use worktui::worker::Worker;

pub struct TestRepo {
    temp_dir: TempDir, // Must keep to ensure cleanup on drop
    root: PathBuf,
}

impl TestRepo {
    /// A repository on `main` with one commit.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir
            .path()
            .canonicalize()
            .expect("Failed to canonicalize temp path");
        let root = base.join("app");
        std::fs::create_dir(&root).expect("Failed to create main repo directory");

        let repo = Self { temp_dir, root };
        repo.git(&["init", "-b", "main"]);
        repo.git(&["config", "user.name", "Test User"]);
        repo.git(&["config", "user.email", "test@example.com"]);
        repo.git(&["config", "commit.gpgsign", "false"]);
        repo.commit("Initial commit");
        repo
    }

    /// Temp directory holding the repository and its worktrees
    pub fn base(&self) -> PathBuf {
        self.root
            .parent()
            .expect("repository has a parent")
            .to_path_buf()
    }

    pub fn root_path(&self) -> &Path {
        &self.root
    }

    /// Run git in the main checkout, panicking on failure.
    pub fn git(&self, args: &[&str]) -> String {
        self.git_in(&self.root, args)
    }

    pub fn git_in(&self, dir: &Path, args: &[&str]) -> String {
        let output = git_cmd(dir, args).output().expect("Failed to run git");
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }

    /// Whether `refs/heads/<branch>` exists
    pub fn has_branch(&self, branch: &str) -> bool {
        git_cmd(
            &self.root,
            &["rev-parse", "--verify", "--quiet", &format!("refs/heads/{}", branch)],
        )
        .output()
        .expect("Failed to run git")
        .status
        .success()
    }

    /// Create a commit with the given message
    pub fn commit(&self, message: &str) {
        std::fs::write(self.root.join("file.txt"), message).expect("Failed to write file");
        self.git(&["add", "."]);
        self.git(&["commit", "-m", message]);
    }

    /// Add a bare `origin` next to the repository and push `main` to it.
    pub fn with_remote(&self) -> PathBuf {
        let remote = self.base().join("origin.git");
        self.git_in(&self.base(), &["init", "--bare", "-b", "main", "origin.git"]);
        self.git(&["remote", "add", "origin", &remote.to_string_lossy()]);
        self.git(&["push", "-u", "origin", "main"]);
        remote
    }

    /// A manager that runs the real `git` binary with an empty Claude dir.
    pub fn manager(&self) -> WorktreeManager {
        let sessions = ClaudeSessions::new(&self.base().join("claude"));
        WorktreeManager::system(Arc::new(sessions))
    }

    pub fn worker(&self) -> Worker {
        Worker::new(
            self.manager(),
            AccessLedger::at(self.base().join("accessed.json")),
        )
    }
}

fn git_cmd(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::new("git");
    cmd.args(args)
        .current_dir(dir)
        .env("GIT_CONFIG_NOSYSTEM", "1")
        .env("LC_ALL", "C");
    cmd
}
