//! Application state for worktui.
//!
//! `App` is a synchronous state machine: key handlers and [`App::apply`]
//! mutate it, and any git or filesystem work it needs is queued as a [`Job`]
//! for the event loop to hand to the [`Worker`](crate::worker::Worker).

mod actions;
mod navigation;
mod sorting;
mod state;

use std::path::PathBuf;

use crate::git::Worktree;
use crate::input::InputMode;
use crate::launch::{LaunchTarget, WorkingDir};
use crate::search::filter_indices;
use crate::ui::toast::{ToastManager, ToastType};
use crate::ui::views::{CleanupState, ProjectsState};
use crate::worker::{CreateOrigin, Job, JobResult};

pub use navigation::{clamp_index, next_index, prev_index};
pub use sorting::{sort_indices, SortKey};
pub use state::{Exit, StartView, View, WorktreeListState};

/// Application state
pub struct App {
    /// Main working tree of the repository being shown, if any
    pub root: Option<PathBuf>,
    /// Latest worktree snapshot, in listing order
    pub worktrees: Vec<Worktree>,
    pub list: WorktreeListState,
    pub view: View,
    pub working_dir: WorkingDir,
    pub toast_manager: ToastManager,
    /// Directory the project picker scans
    pub projects_dir: PathBuf,
    /// Set when the event loop should stop
    pub exit: Option<Exit>,
    jobs: Vec<Job>,
    next_seq: u64,
    latest_list_seq: u64,
}

impl App {
    /// Create the app. Without a repository the project picker is shown.
    pub fn new(
        root: Option<PathBuf>,
        working_dir: WorkingDir,
        projects_dir: PathBuf,
        sort: SortKey,
        start: StartView,
    ) -> Self {
        let mut app = Self {
            root,
            worktrees: Vec::new(),
            list: WorktreeListState {
                sort,
                ..WorktreeListState::default()
            },
            view: View::List,
            working_dir,
            toast_manager: ToastManager::new(),
            projects_dir,
            exit: None,
            jobs: Vec::new(),
            next_seq: 0,
            latest_list_seq: 0,
        };

        if app.root.is_none() {
            app.open_projects();
            return app;
        }
        if start == StartView::Cleanup {
            app.view = View::Cleanup(CleanupState::loading());
        }
        app.refresh();
        app
    }

    /// Jobs queued since the last call
    pub fn take_jobs(&mut self) -> Vec<Job> {
        std::mem::take(&mut self.jobs)
    }

    pub(crate) fn submit(&mut self, job: Job) {
        self.jobs.push(job);
    }

    /// Request a fresh worktree listing. Older outstanding listings are
    /// discarded when they arrive.
    pub fn refresh(&mut self) {
        let Some(root) = self.root.clone() else {
            return;
        };
        self.next_seq += 1;
        self.latest_list_seq = self.next_seq;
        self.list.loading = true;
        self.submit(Job::ListWorktrees {
            seq: self.next_seq,
            root,
        });
    }

    /// Stop, handing any activated directory to the shell.
    pub fn quit(&mut self) {
        self.exit = Some(match self.working_dir.activated() {
            Some(dir) => Exit::Launch(LaunchTarget::Shell {
                cwd: dir.to_path_buf(),
            }),
            None => Exit::Quit,
        });
    }

    pub fn launch(&mut self, target: LaunchTarget) {
        self.exit = Some(Exit::Launch(target));
    }

    pub fn should_quit(&self) -> bool {
        self.exit.is_some()
    }

    /// Fold a finished job into the state.
    pub fn apply(&mut self, result: JobResult) {
        match result {
            JobResult::Worktrees { seq, result } => {
                if seq < self.latest_list_seq {
                    log::debug!("Dropping stale listing {} (latest {})", seq, self.latest_list_seq);
                    return;
                }
                self.list.loading = false;
                match result {
                    Ok(worktrees) => {
                        self.worktrees = worktrees;
                        self.list.error = None;
                        self.refresh_display();
                        if let View::Cleanup(state) = &mut self.view {
                            state.populate(&self.worktrees);
                        }
                    }
                    Err(e) => {
                        log::warn!("Listing worktrees failed: {}", e);
                        self.list.error = Some(e.to_string());
                        if let View::Cleanup(state) = &mut self.view {
                            state.populate(&self.worktrees);
                        }
                    }
                }
            }
            JobResult::Sessions { path, sessions } => {
                if let View::Detail(state) = &mut self.view {
                    if state.worktree.path == path {
                        state.set_sessions(sessions);
                    }
                }
            }
            JobResult::Created { origin, result } => {
                if let Ok(created) = &result {
                    for warning in &created.warnings {
                        self.toast_warning(warning.clone());
                    }
                }
                match origin {
                    CreateOrigin::Filter => {
                        self.list.creating = None;
                        match result {
                            Ok(created) => self.launch(LaunchTarget::Shell { cwd: created.path }),
                            Err(e) => self.toast_error(e.to_string()),
                        }
                    }
                    CreateOrigin::CreateView => {
                        if let View::Create(state) = &mut self.view {
                            state.finish(result);
                        }
                        self.refresh();
                    }
                    CreateOrigin::Fetch => match result {
                        Ok(created) => self.launch(LaunchTarget::Shell { cwd: created.path }),
                        Err(e) => {
                            if let View::Fetch(state) = &mut self.view {
                                state.fail(e.to_string());
                            } else {
                                self.toast_error(e.to_string());
                            }
                        }
                    },
                }
            }
            JobResult::Deleted(result) => {
                let ok = result.is_ok();
                if let View::Delete(state) = &mut self.view {
                    state.finish(result);
                }
                if ok {
                    self.toast_success("Worktree deleted");
                    self.refresh();
                }
            }
            JobResult::CleanedUp(report) => {
                for warning in &report.warnings {
                    self.toast_warning(warning.clone());
                }
                self.toast_success(format!("Removed {} worktrees", report.removed));
                if let View::Cleanup(state) = &mut self.view {
                    state.finish(report);
                }
                self.refresh();
            }
            JobResult::RemoteBranches(result) => {
                if let View::Fetch(state) = &mut self.view {
                    state.set_branches(result);
                }
            }
            JobResult::Projects(projects) => {
                if let View::Projects(state) = &mut self.view {
                    state.set_projects(projects);
                }
            }
            JobResult::AccessRecorded { path, error } => match error {
                Some(e) => {
                    log::warn!("Could not record access to {}: {}", path.display(), e);
                    self.toast_warning(format!("Could not record access: {}", e));
                }
                None => self.refresh(),
            },
        }
    }

    /// Show an info toast
    pub fn toast_info(&mut self, message: impl Into<String>) {
        self.toast_manager.push(message, ToastType::Info);
    }

    /// Show a success toast
    pub fn toast_success(&mut self, message: impl Into<String>) {
        self.toast_manager.push(message, ToastType::Success);
    }

    /// Show a warning toast
    pub fn toast_warning(&mut self, message: impl Into<String>) {
        self.toast_manager.push(message, ToastType::Warning);
    }

    /// Show an error toast
    pub fn toast_error(&mut self, message: impl Into<String>) {
        self.toast_manager.push(message, ToastType::Error);
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("root", &self.root)
            .field("view", &self.view.title())
            .field("worktrees", &self.worktrees.len())
            .field("exit", &self.exit)
            .finish_non_exhaustive()
    }
}
