//! Worktree and branch operations backed by the `git` binary.
//!
//! The manager is stateless: every call runs the commands it needs through
//! its [`CommandRunner`] and returns a fresh snapshot.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Local};
use rayon::prelude::*;

use super::error::GitError;
use super::porcelain::{parse_porcelain, RawWorktree};
use super::runner::{CommandOutput, CommandRunner, SystemRunner};
use super::types::{Created, RemoteBranch, Worktree};
use crate::claude::SessionSource;

/// Directory (next to the main checkout) that holds created worktrees.
const WORKTREES_DIR: &str = "worktrees";
const REMOTE: &str = "origin";

/// Convert a branch name to a folder name (`feature/auth` -> `feature-auth`).
pub fn branch_to_folder(branch: &str) -> String {
    branch.replace(['/', '\\'], "-")
}

/// Where `create_worktree` puts the worktree for `branch`.
pub fn worktree_target(root: &Path, branch: &str) -> PathBuf {
    root.parent()
        .unwrap_or(root)
        .join(WORKTREES_DIR)
        .join(branch_to_folder(branch))
}

/// Validate a branch name against git's ref naming rules.
///
/// Returns an error message if the name is invalid.
pub fn validate_branch_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("Branch name cannot be empty".to_string());
    }
    if name.starts_with('-') {
        return Err("Cannot start with '-'".to_string());
    }
    if name.starts_with('.') || name.contains("/.") {
        return Err("Components cannot start with '.'".to_string());
    }
    if name.ends_with('.') {
        return Err("Cannot end with '.'".to_string());
    }
    if name.starts_with('/') || name.ends_with('/') {
        return Err("Cannot start or end with '/'".to_string());
    }
    if name.contains("..") {
        return Err("Cannot contain '..'".to_string());
    }
    if name.contains("//") {
        return Err("Cannot contain '//'".to_string());
    }
    if name.chars().any(char::is_whitespace) {
        return Err("Cannot contain spaces".to_string());
    }
    if name.contains(['~', '^', ':', '\\', '?', '*', '[']) {
        return Err("Cannot contain ~, ^, :, ?, *, [ or \\".to_string());
    }
    if name.chars().any(|c| c.is_control()) {
        return Err("Cannot contain control characters".to_string());
    }
    if name.contains("@{") {
        return Err("Cannot contain '@{'".to_string());
    }
    if name == "@" {
        return Err("Cannot be '@'".to_string());
    }
    if name.ends_with(".lock") {
        return Err("Cannot end with '.lock'".to_string());
    }

    Ok(())
}

/// Runs git (and gh) on behalf of the dashboard and the CLI.
#[derive(Clone)]
pub struct WorktreeManager {
    runner: Arc<dyn CommandRunner>,
    sessions: Arc<dyn SessionSource>,
}

impl WorktreeManager {
    pub fn new(runner: Arc<dyn CommandRunner>, sessions: Arc<dyn SessionSource>) -> Self {
        Self { runner, sessions }
    }

    /// Manager that runs the real `git` binary.
    pub fn system(sessions: Arc<dyn SessionSource>) -> Self {
        Self::new(Arc::new(SystemRunner), sessions)
    }

    pub fn sessions(&self) -> &Arc<dyn SessionSource> {
        &self.sessions
    }

    fn git(&self, cwd: &Path, args: &[&str]) -> Result<CommandOutput, GitError> {
        Ok(self.runner.run("git", args, cwd)?)
    }

    /// Root of the main working tree for any path inside the repository
    /// (including paths inside linked worktrees).
    pub fn resolve_root(&self, cwd: &Path) -> Result<PathBuf, GitError> {
        let output = self.git(
            cwd,
            &["rev-parse", "--path-format=absolute", "--git-common-dir"],
        )?;
        if !output.success() || output.stdout.is_empty() {
            return Err(GitError::NotARepository);
        }
        PathBuf::from(&output.stdout)
            .parent()
            .map(Path::to_path_buf)
            .ok_or(GitError::NotARepository)
    }

    /// Every worktree of the repository, in git's order (main first).
    ///
    /// Per-worktree queries run in parallel. A worktree whose queries cannot
    /// run is left out of the result.
    pub fn list_worktrees(&self, root: &Path) -> Result<Vec<Worktree>, GitError> {
        let output = self.git(root, &["worktree", "list", "--porcelain"])?;
        if !output.success() {
            return Err(GitError::CommandFailed {
                command: "git worktree list".to_string(),
                stderr: output.stderr,
            });
        }

        let raw = parse_porcelain(&output.stdout);
        let inspected: Vec<Result<Worktree, GitError>> =
            raw.par_iter().map(|entry| self.inspect(entry)).collect();

        Ok(raw
            .iter()
            .zip(inspected)
            .filter_map(|(entry, result)| match result {
                Ok(worktree) => Some(worktree),
                Err(e) => {
                    log::warn!("Skipping worktree {}: {}", entry.path.display(), e);
                    None
                }
            })
            .collect())
    }

    fn inspect(&self, raw: &RawWorktree) -> Result<Worktree, GitError> {
        let (dirty, (commit, summary)) = rayon::join(
            || {
                if raw.is_bare {
                    Ok(false)
                } else {
                    self.is_dirty(&raw.path)
                }
            },
            || {
                rayon::join(
                    || self.commit_info(&raw.path, &raw.head),
                    || self.sessions.summary(&raw.path),
                )
            },
        );
        let (commit_subject, commit_date) = commit?;

        Ok(Worktree {
            path: raw.path.clone(),
            branch: raw.branch.clone(),
            head: raw.head.clone(),
            commit_subject,
            commit_date,
            is_dirty: dirty?,
            is_main: raw.is_main,
            session_count: summary.count,
            last_session_summary: summary.latest,
            last_accessed: None,
        })
    }

    /// Whether the worktree has unstaged, staged or untracked changes.
    pub fn is_dirty(&self, path: &Path) -> Result<bool, GitError> {
        let (unstaged, (staged, untracked)) = rayon::join(
            || self.git(path, &["diff", "--quiet"]),
            || {
                rayon::join(
                    || self.git(path, &["diff", "--cached", "--quiet"]),
                    || self.git(path, &["ls-files", "--others", "--exclude-standard"]),
                )
            },
        );

        let untracked = untracked?;
        if !untracked.success() {
            return Err(GitError::CommandFailed {
                command: "git ls-files".to_string(),
                stderr: untracked.stderr,
            });
        }

        Ok(diff_has_changes(&unstaged?, "git diff")?
            || diff_has_changes(&staged?, "git diff --cached")?
            || !untracked.stdout.is_empty())
    }

    /// Subject and author date of `head`.
    ///
    /// An unborn branch has no commit: the subject is empty and the date is now.
    fn commit_info(
        &self,
        path: &Path,
        head: &str,
    ) -> Result<(String, DateTime<FixedOffset>), GitError> {
        let rev = if head.is_empty() { "HEAD" } else { head };
        let output = self.git(path, &["log", "-1", "--format=%s%n%aI", rev])?;
        if !output.success() {
            log::debug!("No commit info for {}: {}", path.display(), output.stderr);
            return Ok((String::new(), Local::now().fixed_offset()));
        }

        let mut lines = output.stdout.lines();
        let subject = lines.next().unwrap_or_default().to_string();
        let date = lines
            .next()
            .and_then(|d| DateTime::parse_from_rfc3339(d.trim()).ok())
            .unwrap_or_else(|| Local::now().fixed_offset());
        Ok((subject, date))
    }

    /// Whether `reference` (a full ref name) resolves. Only the exit code counts.
    pub fn ref_exists(&self, root: &Path, reference: &str) -> Result<bool, GitError> {
        let output = self.git(root, &["rev-parse", "--verify", "--quiet", reference])?;
        Ok(output.success())
    }

    /// Create a worktree for `branch` under the `worktrees` directory.
    ///
    /// An existing target directory is returned as is, without running git.
    /// The branch is checked out if it exists locally, tracked from
    /// `origin` if it exists there, and created from HEAD otherwise.
    pub fn create_worktree(&self, root: &Path, branch: &str) -> Result<Created, GitError> {
        let branch = branch.trim();
        validate_branch_name(branch).map_err(GitError::InvalidBranchName)?;

        let path = worktree_target(root, branch);
        if path.exists() {
            log::debug!("Reusing existing worktree directory {}", path.display());
            return Ok(Created {
                path,
                reused: true,
                warnings: Vec::new(),
            });
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let path_arg = path.to_string_lossy().into_owned();
        let remote_branch = format!("{}/{}", REMOTE, branch);
        let args: Vec<&str> = if self.ref_exists(root, &format!("refs/heads/{}", branch))? {
            vec!["worktree", "add", &path_arg, branch]
        } else if self.ref_exists(root, &format!("refs/remotes/{}", remote_branch))? {
            vec!["worktree", "add", &path_arg, "-b", branch, &remote_branch]
        } else {
            vec!["worktree", "add", &path_arg, "-b", branch]
        };

        let output = self.git(root, &args)?;
        if !output.success() {
            return Err(GitError::WorktreeCreationFailed(output.stderr));
        }

        let mut warnings = Vec::new();
        if let Err(e) = copy_local_settings(root, &path) {
            log::warn!("Could not copy local settings into {}: {}", path.display(), e);
            warnings.push(format!("Could not copy local settings: {}", e));
        }

        Ok(Created {
            path,
            reused: false,
            warnings,
        })
    }

    pub fn remove_worktree(&self, root: &Path, path: &Path, force: bool) -> Result<(), GitError> {
        let path_arg = path.to_string_lossy();
        let mut args = vec!["worktree", "remove"];
        if force {
            args.push("--force");
        }
        args.push(&path_arg);

        let output = self.git(root, &args)?;
        if !output.success() {
            return Err(GitError::RemovalFailed(output.stderr));
        }
        Ok(())
    }

    pub fn delete_branch(&self, root: &Path, branch: &str, force: bool) -> Result<(), GitError> {
        if branch.is_empty() {
            return Err(GitError::InvalidBranchName(
                "Branch name cannot be empty".to_string(),
            ));
        }
        let flag = if force { "-D" } else { "-d" };
        let output = self.git(root, &["branch", flag, branch])?;
        if !output.success() {
            return Err(GitError::DeletionFailed(output.stderr));
        }
        Ok(())
    }

    pub fn fetch_remote(&self, root: &Path) -> Result<(), GitError> {
        let output = self.git(root, &["fetch", "--prune"])?;
        if !output.success() {
            return Err(GitError::FetchFailed(output.stderr));
        }
        Ok(())
    }

    /// Remote-tracking branches, most recently committed first, without the
    /// names in `exclude` (usually branches that already have a worktree).
    pub fn list_remote_branches(
        &self,
        root: &Path,
        exclude: &HashSet<String>,
    ) -> Result<Vec<RemoteBranch>, GitError> {
        let output = self.git(
            root,
            &[
                "for-each-ref",
                "--sort=-committerdate",
                "--format=%(refname:short)%09%(committerdate:iso-strict)%09%(authorname)",
                "refs/remotes",
            ],
        )?;
        if !output.success() {
            return Err(GitError::CommandFailed {
                command: "git for-each-ref".to_string(),
                stderr: output.stderr,
            });
        }
        Ok(parse_remote_branches(&output.stdout, exclude))
    }

    /// Push `branch` to origin and open a draft pull request for it.
    ///
    /// Returns whatever `gh` prints, normally the PR URL.
    pub fn create_draft_pr(&self, cwd: &Path, branch: &str) -> Result<String, GitError> {
        let push = self.git(cwd, &["push", "-u", REMOTE, branch])?;
        if !push.success() {
            return Err(GitError::CommandFailed {
                command: "git push".to_string(),
                stderr: push.stderr,
            });
        }

        let output = self
            .runner
            .run("gh", &["pr", "create", "--draft", "--fill"], cwd)?;
        if !output.success() {
            return Err(GitError::CommandFailed {
                command: "gh pr create".to_string(),
                stderr: output.stderr,
            });
        }
        Ok(output.stdout)
    }
}

/// `git diff --quiet` exits 1 when there are changes; anything else is a failure.
fn diff_has_changes(output: &CommandOutput, command: &str) -> Result<bool, GitError> {
    match output.code {
        Some(0) => Ok(false),
        Some(1) => Ok(true),
        _ => Err(GitError::CommandFailed {
            command: command.to_string(),
            stderr: output.stderr.clone(),
        }),
    }
}

fn copy_local_settings(root: &Path, worktree: &Path) -> std::io::Result<()> {
    let source = root.join(".claude").join("settings.local.json");
    if !source.exists() {
        return Ok(());
    }
    let dest_dir = worktree.join(".claude");
    fs::create_dir_all(&dest_dir)?;
    fs::copy(&source, dest_dir.join("settings.local.json"))?;
    Ok(())
}

/// Parse tab-separated `for-each-ref` lines (`origin/name`, date, author).
fn parse_remote_branches(output: &str, exclude: &HashSet<String>) -> Vec<RemoteBranch> {
    let mut seen = HashSet::new();
    output
        .lines()
        .filter_map(|line| {
            let mut fields = line.split('\t');
            let refname = fields.next()?.trim();
            // `origin/HEAD` shows up as a bare `origin` on recent git
            let (_, name) = refname.split_once('/')?;
            if name.is_empty() || name == "HEAD" || name.contains("->") {
                return None;
            }
            if exclude.contains(name) || !seen.insert(name.to_string()) {
                return None;
            }
            let date = fields
                .next()
                .and_then(|d| DateTime::parse_from_rfc3339(d.trim()).ok());
            let author = fields.next().unwrap_or_default().trim().to_string();
            Some(RemoteBranch {
                name: name.to_string(),
                date,
                author,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claude::{ClaudeSession, SessionSummary};
    use crate::git::runner::scripted::ScriptedRunner;

    struct FixedSessions;

    impl SessionSource for FixedSessions {
        fn sessions(&self, _worktree: &Path) -> Vec<ClaudeSession> {
            Vec::new()
        }

        fn summary(&self, worktree: &Path) -> SessionSummary {
            if worktree.ends_with("feature-x") {
                SessionSummary {
                    count: 2,
                    latest: "Fix login".to_string(),
                }
            } else {
                SessionSummary::default()
            }
        }
    }

    fn manager(runner: ScriptedRunner) -> (WorktreeManager, Arc<ScriptedRunner>) {
        let runner = Arc::new(runner);
        let manager = WorktreeManager::new(runner.clone(), Arc::new(FixedSessions));
        (manager, runner)
    }

    const PORCELAIN: &str = "worktree /code/app
HEAD 1111111aaaaaaa
branch refs/heads/main

worktree /code/worktrees/feature-x
HEAD 2222222bbbbbbb
branch refs/heads/feature/x

worktree /code/worktrees/gone
HEAD 3333333ccccccc
branch refs/heads/gone
";

    #[test]
    fn branch_to_folder_flattens_separators() {
        assert_eq!(branch_to_folder("feature/auth"), "feature-auth");
        assert_eq!(branch_to_folder("a\\b/c"), "a-b-c");
        assert_eq!(
            worktree_target(Path::new("/code/app"), "feature/new"),
            PathBuf::from("/code/worktrees/feature-new")
        );
    }

    #[test]
    fn validate_branch_name_follows_ref_rules() {
        assert!(validate_branch_name("feature/login").is_ok());
        assert!(validate_branch_name("fix-123").is_ok());
        assert!(validate_branch_name("").is_err());
        assert!(validate_branch_name("-x").is_err());
        assert!(validate_branch_name("a..b").is_err());
        assert!(validate_branch_name("has space").is_err());
        assert!(validate_branch_name("feature/.hidden").is_err());
        assert!(validate_branch_name("topic.lock").is_err());
        assert!(validate_branch_name("a@{b").is_err());
        assert!(validate_branch_name("@").is_err());
    }

    #[test]
    fn resolve_root_is_parent_of_common_dir() {
        let (manager, _) = manager(ScriptedRunner::new().on(
            &["git", "rev-parse"],
            0,
            "/code/app/.git",
            "",
        ));
        assert_eq!(
            manager.resolve_root(Path::new("/code/worktrees/x")).unwrap(),
            PathBuf::from("/code/app")
        );
    }

    #[test]
    fn resolve_root_outside_repository() {
        let (manager, _) = manager(ScriptedRunner::new().on(
            &["git", "rev-parse"],
            128,
            "",
            "fatal: not a git repository",
        ));
        assert!(matches!(
            manager.resolve_root(Path::new("/tmp")),
            Err(GitError::NotARepository)
        ));
    }

    #[test]
    fn list_worktrees_keeps_porcelain_order_and_drops_failed_entries() {
        let runner = ScriptedRunner::new()
            .on(&["git", "worktree", "list"], 0, PORCELAIN, "")
            .on(&["git", "log"], 0, "Initial commit\n2026-03-01T10:00:00+01:00", "")
            .on_in(Path::new("/code/worktrees/feature-x"), &["git", "diff", "--quiet"], 1, "")
            .spawn_error_in(Path::new("/code/worktrees/gone"), &["git", "diff"]);
        let (manager, _) = manager(runner);

        let worktrees = manager.list_worktrees(Path::new("/code/app")).unwrap();
        assert_eq!(worktrees.len(), 2);

        assert!(worktrees[0].is_main);
        assert_eq!(worktrees[0].branch, "main");
        assert!(!worktrees[0].is_dirty);
        assert_eq!(worktrees[0].commit_subject, "Initial commit");
        assert_eq!(worktrees[0].commit_date.to_rfc3339(), "2026-03-01T10:00:00+01:00");

        assert_eq!(worktrees[1].branch, "feature/x");
        assert!(worktrees[1].is_dirty);
        assert_eq!(worktrees[1].session_count, 2);
        assert_eq!(worktrees[1].last_session_summary, "Fix login");
    }

    #[test]
    fn untracked_files_make_a_worktree_dirty() {
        let (manager, _) = manager(ScriptedRunner::new().on(
            &["git", "ls-files"],
            0,
            "notes.txt",
            "",
        ));
        assert!(manager.is_dirty(Path::new("/code/app")).unwrap());
    }

    #[test]
    fn staged_changes_make_a_worktree_dirty() {
        let (manager, _) = manager(ScriptedRunner::new().on(
            &["git", "diff", "--cached"],
            1,
            "",
            "",
        ));
        assert!(manager.is_dirty(Path::new("/code/app")).unwrap());
    }

    #[test]
    fn unborn_branch_gets_empty_subject() {
        let (manager, _) = manager(
            ScriptedRunner::new()
                .on(&["git", "worktree", "list"], 0, "worktree /code/app\nbranch refs/heads/main\n", "")
                .on(&["git", "log"], 128, "", "fatal: bad revision"),
        );
        let worktrees = manager.list_worktrees(Path::new("/code/app")).unwrap();
        assert_eq!(worktrees.len(), 1);
        assert_eq!(worktrees[0].commit_subject, "");
    }

    #[test]
    fn create_worktree_reuses_existing_directory_without_git() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("app");
        fs::create_dir_all(dir.path().join("worktrees").join("feature-x")).unwrap();

        let (manager, runner) = manager(ScriptedRunner::new());
        let first = manager.create_worktree(&root, "feature/x").unwrap();
        let second = manager.create_worktree(&root, "feature/x").unwrap();

        assert!(first.reused && second.reused);
        assert_eq!(first.path, second.path);
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn create_worktree_checks_out_existing_local_branch() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("app");
        let (manager, runner) = manager(ScriptedRunner::new());

        let created = manager.create_worktree(&root, "feature/x").unwrap();
        assert!(!created.reused);
        assert_eq!(created.path, dir.path().join("worktrees").join("feature-x"));

        let add = runner
            .calls()
            .into_iter()
            .find(|argv| argv[1] == "worktree")
            .unwrap();
        assert_eq!(add.len(), 5);
        assert_eq!(add[4], "feature/x");
    }

    #[test]
    fn create_worktree_tracks_remote_branch() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("app");
        let (manager, runner) = manager(ScriptedRunner::new().on(
            &["git", "rev-parse", "--verify", "--quiet", "refs/heads/feature/x"],
            1,
            "",
            "",
        ));

        manager.create_worktree(&root, "feature/x").unwrap();
        let add = runner
            .calls()
            .into_iter()
            .find(|argv| argv[1] == "worktree")
            .unwrap();
        assert_eq!(&add[4..], ["-b", "feature/x", "origin/feature/x"]);
    }

    #[test]
    fn create_worktree_creates_new_branch() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("app");
        let (manager, runner) = manager(ScriptedRunner::new().on(
            &["git", "rev-parse", "--verify"],
            1,
            "",
            "",
        ));

        manager.create_worktree(&root, "  new-idea  ").unwrap();
        let add = runner
            .calls()
            .into_iter()
            .find(|argv| argv[1] == "worktree")
            .unwrap();
        assert_eq!(&add[4..], ["-b", "new-idea"]);
    }

    #[test]
    fn create_worktree_reports_git_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let (manager, _) = manager(ScriptedRunner::new().on(
            &["git", "worktree", "add"],
            128,
            "",
            "fatal: 'x' is already checked out",
        ));
        match manager.create_worktree(&dir.path().join("app"), "x") {
            Err(GitError::WorktreeCreationFailed(stderr)) => {
                assert!(stderr.contains("already checked out"))
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn create_worktree_rejects_invalid_names_before_running_git() {
        let dir = tempfile::tempdir().unwrap();
        let (manager, runner) = manager(ScriptedRunner::new());
        assert!(matches!(
            manager.create_worktree(dir.path(), "bad name"),
            Err(GitError::InvalidBranchName(_))
        ));
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn create_worktree_copies_local_settings() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("app");
        fs::create_dir_all(root.join(".claude")).unwrap();
        fs::write(root.join(".claude/settings.local.json"), "{}").unwrap();

        let (manager, _) = manager(ScriptedRunner::new());
        let created = manager.create_worktree(&root, "b").unwrap();
        assert!(created.warnings.is_empty());
        assert!(created.path.join(".claude/settings.local.json").exists());
    }

    #[test]
    fn settings_copy_failure_becomes_a_warning() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("app");
        // A directory where the settings file should be cannot be copied
        fs::create_dir_all(root.join(".claude/settings.local.json")).unwrap();

        let (manager, _) = manager(ScriptedRunner::new());
        let created = manager.create_worktree(&root, "b").unwrap();
        assert_eq!(created.warnings.len(), 1);
    }

    #[test]
    fn remove_and_delete_honor_force() {
        let (manager, runner) = manager(ScriptedRunner::new());
        let root = Path::new("/code/app");
        manager
            .remove_worktree(root, Path::new("/code/worktrees/x"), true)
            .unwrap();
        manager.delete_branch(root, "x", true).unwrap();
        manager.delete_branch(root, "y", false).unwrap();

        assert_eq!(
            runner.calls_matching(&["git", "worktree", "remove", "--force", "/code/worktrees/x"]),
            1
        );
        assert_eq!(runner.calls_matching(&["git", "branch", "-D", "x"]), 1);
        assert_eq!(runner.calls_matching(&["git", "branch", "-d", "y"]), 1);
    }

    #[test]
    fn removal_failure_carries_stderr() {
        let (manager, _) = manager(ScriptedRunner::new().on(
            &["git", "worktree", "remove"],
            128,
            "",
            "fatal: contains modified or untracked files",
        ));
        let err = manager
            .remove_worktree(Path::new("/r"), Path::new("/w"), false)
            .unwrap_err();
        assert!(matches!(err, GitError::RemovalFailed(ref s) if s.contains("modified")));
    }

    #[test]
    fn delete_branch_rejects_empty_name() {
        let (manager, runner) = manager(ScriptedRunner::new());
        assert!(manager.delete_branch(Path::new("/r"), "", false).is_err());
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn fetch_failure_is_reported() {
        let (manager, _) = manager(ScriptedRunner::new().on(
            &["git", "fetch"],
            1,
            "",
            "fatal: unable to access",
        ));
        assert!(matches!(
            manager.fetch_remote(Path::new("/r")),
            Err(GitError::FetchFailed(_))
        ));
    }

    #[test]
    fn remote_branches_strip_prefix_and_skip_head_excluded_and_duplicates() {
        let output = "origin\t2026-03-02T09:00:00+00:00\t\n\
                      origin/HEAD\t2026-03-02T09:00:00+00:00\tAda\n\
                      origin/feature/y\t2026-03-02T09:00:00+00:00\tAda\n\
                      origin/main\t2026-03-01T09:00:00+00:00\tLin\n\
                      upstream/feature/y\t2026-02-01T09:00:00+00:00\tAda\n\
                      origin/old\tnot-a-date\tSam";
        let exclude: HashSet<String> = ["main".to_string()].into_iter().collect();
        let branches = parse_remote_branches(output, &exclude);

        let names: Vec<&str> = branches.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, ["feature/y", "old"]);
        assert_eq!(branches[0].author, "Ada");
        assert!(branches[0].date.is_some());
        assert!(branches[1].date.is_none());
    }

    #[test]
    fn draft_pr_pushes_then_returns_gh_output() {
        let (manager, runner) = manager(ScriptedRunner::new().on(
            &["gh", "pr", "create"],
            0,
            "https://github.com/acme/app/pull/7",
            "",
        ));
        let url = manager
            .create_draft_pr(Path::new("/code/worktrees/x"), "x")
            .unwrap();
        assert_eq!(url, "https://github.com/acme/app/pull/7");
        assert_eq!(runner.calls_matching(&["git", "push", "-u", "origin", "x"]), 1);
    }

    #[test]
    fn draft_pr_stops_when_push_fails() {
        let (manager, runner) = manager(ScriptedRunner::new().on(
            &["git", "push"],
            1,
            "",
            "rejected",
        ));
        assert!(manager.create_draft_pr(Path::new("/w"), "x").is_err());
        assert_eq!(runner.calls_matching(&["gh"]), 0);
    }
}
