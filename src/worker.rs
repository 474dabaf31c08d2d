//! Background execution of git and filesystem work.
//!
//! The UI thread never blocks on git. It queues [`Job`]s; each job runs on
//! its own thread and sends a [`JobResult`] back over a channel that the event
//! loop drains between frames.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use crate::access::AccessLedger;
use crate::claude::ClaudeSession;
use crate::git::{Created, GitError, RemoteBranch, Worktree, WorktreeManager};
use crate::projects::{list_projects, Project};

/// Which screen asked for a worktree to be created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOrigin {
    /// Enter on an unmatched filter in the worktree list
    Filter,
    /// The create view
    CreateView,
    /// Checkout of a remote branch
    Fetch,
}

/// A unit of background work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Job {
    ListWorktrees {
        /// Increases with every listing request; stale results are dropped
        seq: u64,
        root: PathBuf,
    },
    LoadSessions {
        path: PathBuf,
    },
    CreateWorktree {
        root: PathBuf,
        branch: String,
        origin: CreateOrigin,
    },
    DeleteWorktree {
        root: PathBuf,
        path: PathBuf,
        branch: String,
        delete_branch: bool,
        force: bool,
    },
    Cleanup {
        root: PathBuf,
        /// (worktree path, branch) pairs
        targets: Vec<(PathBuf, String)>,
        delete_branches: bool,
    },
    LoadRemoteBranches {
        root: PathBuf,
    },
    ListProjects {
        base: PathBuf,
    },
    RecordAccess {
        path: PathBuf,
    },
}

/// Outcome of a bulk cleanup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupReport {
    pub removed: usize,
    /// Worktrees that could not be removed
    pub failures: Vec<String>,
    /// Branches that could not be deleted
    pub warnings: Vec<String>,
}

#[derive(Debug)]
pub enum JobResult {
    Worktrees {
        seq: u64,
        result: Result<Vec<Worktree>, GitError>,
    },
    Sessions {
        path: PathBuf,
        sessions: Vec<ClaudeSession>,
    },
    Created {
        origin: CreateOrigin,
        result: Result<Created, GitError>,
    },
    Deleted(Result<(), GitError>),
    CleanedUp(CleanupReport),
    RemoteBranches(Result<Vec<RemoteBranch>, GitError>),
    Projects(Vec<Project>),
    AccessRecorded {
        path: PathBuf,
        error: Option<String>,
    },
}

/// Runs jobs on background threads.
pub struct Worker {
    manager: WorktreeManager,
    ledger: AccessLedger,
    tx: Sender<JobResult>,
    rx: Receiver<JobResult>,
}

impl Worker {
    pub fn new(manager: WorktreeManager, ledger: AccessLedger) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            manager,
            ledger,
            tx,
            rx,
        }
    }

    /// Start `job` on a new thread.
    pub fn submit(&self, job: Job) {
        let manager = self.manager.clone();
        let ledger = self.ledger.clone();
        let tx = self.tx.clone();
        let spawned = thread::Builder::new()
            .name("worktui-job".to_string())
            .spawn(move || {
                // The receiver is gone only when the app is shutting down
                let _ = tx.send(run(&manager, &ledger, job));
            });
        if let Err(e) = spawned {
            log::error!("Failed to spawn worker thread: {}", e);
        }
    }

    /// Results that have arrived since the last call.
    pub fn drain(&self) -> Vec<JobResult> {
        self.rx.try_iter().collect()
    }

    /// Run `job` on the calling thread.
    pub fn run(&self, job: Job) -> JobResult {
        run(&self.manager, &self.ledger, job)
    }
}

fn run(manager: &WorktreeManager, ledger: &AccessLedger, job: Job) -> JobResult {
    log::debug!("Running job {:?}", job);
    match job {
        Job::ListWorktrees { seq, root } => JobResult::Worktrees {
            seq,
            result: list_with_access_times(manager, ledger, &root),
        },
        Job::LoadSessions { path } => JobResult::Sessions {
            sessions: manager.sessions().sessions(&path),
            path,
        },
        Job::CreateWorktree {
            root,
            branch,
            origin,
        } => JobResult::Created {
            origin,
            result: manager.create_worktree(&root, &branch),
        },
        Job::DeleteWorktree {
            root,
            path,
            branch,
            delete_branch,
            force,
        } => JobResult::Deleted(
            manager
                .remove_worktree(&root, &path, force)
                .and_then(|()| {
                    if delete_branch && !branch.is_empty() {
                        manager.delete_branch(&root, &branch, force)
                    } else {
                        Ok(())
                    }
                }),
        ),
        Job::Cleanup {
            root,
            targets,
            delete_branches,
        } => {
            let mut report = CleanupReport::default();
            for (path, branch) in targets {
                if let Err(e) = manager.remove_worktree(&root, &path, false) {
                    log::warn!("Cleanup could not remove {}: {}", path.display(), e);
                    report.failures.push(format!("{}: {}", path.display(), e));
                    continue;
                }
                report.removed += 1;
                if delete_branches && !branch.is_empty() {
                    if let Err(e) = manager.delete_branch(&root, &branch, false) {
                        log::warn!("Cleanup kept branch {}: {}", branch, e);
                        report.warnings.push(format!("{}: {}", branch, e));
                    }
                }
            }
            JobResult::CleanedUp(report)
        }
        Job::LoadRemoteBranches { root } => JobResult::RemoteBranches(
            manager
                .fetch_remote(&root)
                .and_then(|()| manager.list_worktrees(&root))
                .and_then(|worktrees| {
                    let local: HashSet<String> =
                        worktrees.into_iter().map(|wt| wt.branch).collect();
                    manager.list_remote_branches(&root, &local)
                }),
        ),
        Job::ListProjects { base } => JobResult::Projects(list_projects(&base)),
        Job::RecordAccess { path } => JobResult::AccessRecorded {
            error: ledger.record_access(&path).err().map(|e| format!("{:#}", e)),
            path,
        },
    }
}

fn list_with_access_times(
    manager: &WorktreeManager,
    ledger: &AccessLedger,
    root: &std::path::Path,
) -> Result<Vec<Worktree>, GitError> {
    let worktrees = manager.list_worktrees(root)?;
    let times = ledger.access_times();
    Ok(worktrees
        .into_iter()
        .map(|wt| {
            let millis = times.get(&wt.path).copied();
            wt.with_last_accessed_millis(millis)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claude::{SessionSource, SessionSummary};
    use crate::git::runner::scripted::ScriptedRunner;
    use std::path::Path;
    use std::sync::Arc;
    use std::time::Duration;

    struct NoSessions;

    impl SessionSource for NoSessions {
        fn sessions(&self, _worktree: &Path) -> Vec<ClaudeSession> {
            Vec::new()
        }

        fn summary(&self, _worktree: &Path) -> SessionSummary {
            SessionSummary::default()
        }
    }

    fn worker(runner: ScriptedRunner) -> (tempfile::TempDir, Worker, Arc<ScriptedRunner>) {
        let dir = tempfile::tempdir().unwrap();
        let runner = Arc::new(runner);
        let manager = WorktreeManager::new(runner.clone(), Arc::new(NoSessions));
        let ledger = AccessLedger::at(dir.path().join("accessed.json"));
        (dir, Worker::new(manager, ledger), runner)
    }

    #[test]
    fn listing_merges_access_times() {
        let (_dir, worker, _) = worker(ScriptedRunner::new().on(
            &["git", "worktree", "list"],
            0,
            "worktree /code/app\nHEAD 1234567890\nbranch refs/heads/main\n\nworktree /code/worktrees/b\nHEAD 1234567890\nbranch refs/heads/b\n",
            "",
        ));
        worker.ledger.record_access(Path::new("/code/worktrees/b")).unwrap();

        match worker.run(Job::ListWorktrees {
            seq: 3,
            root: PathBuf::from("/code/app"),
        }) {
            JobResult::Worktrees { seq, result } => {
                let worktrees = result.unwrap();
                assert_eq!(seq, 3);
                assert!(worktrees[0].last_accessed.is_none());
                assert!(worktrees[1].last_accessed.is_some());
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn delete_with_branch_runs_both_commands_with_force() {
        let (_dir, worker, runner) = worker(ScriptedRunner::new());
        let result = worker.run(Job::DeleteWorktree {
            root: PathBuf::from("/code/app"),
            path: PathBuf::from("/code/worktrees/x"),
            branch: "feature/x".to_string(),
            delete_branch: true,
            force: true,
        });
        assert!(matches!(result, JobResult::Deleted(Ok(()))));
        assert_eq!(runner.calls_matching(&["git", "worktree", "remove", "--force"]), 1);
        assert_eq!(runner.calls_matching(&["git", "branch", "-D", "feature/x"]), 1);
    }

    #[test]
    fn delete_keeps_branch_when_removal_fails() {
        let (_dir, worker, runner) = worker(ScriptedRunner::new().on(
            &["git", "worktree", "remove"],
            128,
            "",
            "fatal: locked",
        ));
        let result = worker.run(Job::DeleteWorktree {
            root: PathBuf::from("/code/app"),
            path: PathBuf::from("/code/worktrees/x"),
            branch: "x".to_string(),
            delete_branch: true,
            force: false,
        });
        assert!(matches!(result, JobResult::Deleted(Err(GitError::RemovalFailed(_)))));
        assert_eq!(runner.calls_matching(&["git", "branch"]), 0);
    }

    #[test]
    fn cleanup_continues_past_failures_and_downgrades_branch_errors() {
        let runner = ScriptedRunner::new()
            .on(&["git", "worktree", "remove", "/code/worktrees/locked"], 128, "", "locked")
            .on(&["git", "branch", "-d", "b"], 1, "", "not fully merged");
        let (_dir, worker, runner) = worker(runner);

        let result = worker.run(Job::Cleanup {
            root: PathBuf::from("/code/app"),
            targets: vec![
                (PathBuf::from("/code/worktrees/a"), "a".to_string()),
                (PathBuf::from("/code/worktrees/locked"), "locked".to_string()),
                (PathBuf::from("/code/worktrees/b"), "b".to_string()),
            ],
            delete_branches: true,
        });

        match result {
            JobResult::CleanedUp(report) => {
                assert_eq!(report.removed, 2);
                assert_eq!(report.failures.len(), 1);
                assert_eq!(report.warnings.len(), 1);
                assert!(report.warnings[0].starts_with("b:"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(runner.calls_matching(&["git", "branch", "-d", "locked"]), 0);
        assert_eq!(runner.calls_matching(&["git", "branch", "-d", "a"]), 1);
    }

    #[test]
    fn remote_branches_exclude_local_worktree_branches() {
        let runner = ScriptedRunner::new()
            .on(
                &["git", "worktree", "list"],
                0,
                "worktree /code/app\nHEAD 1234567890\nbranch refs/heads/main\n",
                "",
            )
            .on(
                &["git", "for-each-ref"],
                0,
                "origin/main\t2026-03-01T09:00:00+00:00\tAda\norigin/topic\t2026-03-01T09:00:00+00:00\tAda",
                "",
            );
        let (_dir, worker, runner) = worker(runner);

        match worker.run(Job::LoadRemoteBranches {
            root: PathBuf::from("/code/app"),
        }) {
            JobResult::RemoteBranches(Ok(branches)) => {
                assert_eq!(branches.len(), 1);
                assert_eq!(branches[0].name, "topic");
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(runner.calls_matching(&["git", "fetch", "--prune"]), 1);
    }

    #[test]
    fn submitted_jobs_report_back_over_the_channel() {
        let (_dir, worker, _) = worker(ScriptedRunner::new());
        worker.submit(Job::RecordAccess {
            path: PathBuf::from("/code/worktrees/a"),
        });

        let mut results = Vec::new();
        for _ in 0..200 {
            results.extend(worker.drain());
            if !results.is_empty() {
                break;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        assert!(matches!(
            results.as_slice(),
            [JobResult::AccessRecorded { error: None, .. }]
        ));
    }
}
