//! User-facing actions on App: opening views and starting git work.

use std::path::{Path, PathBuf};

use super::*;
use crate::git::validate_branch_name;
use crate::ui::views::{CreateState, DeleteState, DetailState, FetchState};

impl App {
    fn open_detail(&mut self, worktree: Worktree) {
        self.submit(Job::LoadSessions {
            path: worktree.path.clone(),
        });
        self.view = View::Detail(Box::new(DetailState::new(worktree)));
    }

    pub fn open_selected_detail(&mut self) {
        if let Some(worktree) = self.selected_worktree().cloned() {
            self.open_detail(worktree);
        }
    }

    pub fn open_create(&mut self) {
        if self.root.is_some() {
            self.view = View::Create(CreateState::new());
        }
    }

    /// Open the delete confirmation for the selection. The main worktree
    /// cannot be deleted.
    pub fn open_delete(&mut self) {
        let Some(worktree) = self.selected_worktree().cloned() else {
            return;
        };
        if worktree.is_main {
            self.toast_warning("The main worktree cannot be deleted");
            return;
        }
        let blocked = self.working_dir.is_inside(&worktree.path);
        self.view = View::Delete(Box::new(DeleteState::new(worktree, blocked)));
    }

    pub fn open_cleanup(&mut self) {
        self.view = View::Cleanup(CleanupState::from_worktrees(&self.worktrees));
    }

    pub fn open_fetch(&mut self) {
        let Some(root) = self.root.clone() else {
            return;
        };
        self.view = View::Fetch(FetchState::new());
        self.submit(Job::LoadRemoteBranches { root });
    }

    pub fn open_projects(&mut self) {
        self.view = View::Projects(ProjectsState::new(self.root.is_some()));
        self.submit(Job::ListProjects {
            base: self.projects_dir.clone(),
        });
    }

    /// Return to the worktree list, optionally reloading it.
    pub fn show_list(&mut self, reload: bool) {
        self.view = View::List;
        if reload {
            self.refresh();
        }
    }

    /// Switch to another repository and show its worktrees.
    pub fn open_project(&mut self, path: PathBuf) {
        log::info!("Opening project {}", path.display());
        self.root = Some(path);
        self.worktrees.clear();
        self.list = WorktreeListState {
            sort: self.list.sort,
            ..WorktreeListState::default()
        };
        self.show_list(true);
    }

    /// Enter in the filter line.
    ///
    /// An empty filter opens the selection, a filter naming an existing
    /// branch opens that worktree, anything else becomes a new worktree.
    pub fn submit_filter(&mut self) {
        if self.list.filter.is_empty() {
            self.open_selected_detail();
            return;
        }
        if let Some(existing) = self
            .worktrees
            .iter()
            .find(|wt| wt.branch == self.list.filter)
            .cloned()
        {
            self.open_detail(existing);
            return;
        }
        if self.list.creating.is_some() {
            return;
        }
        let Some(root) = self.root.clone() else {
            return;
        };

        let branch = self.list.filter.trim().to_string();
        if let Err(e) = validate_branch_name(&branch) {
            self.toast_error(e);
            return;
        }
        self.toast_info(format!("Creating worktree for {}", branch));
        self.list.creating = Some(branch.clone());
        self.submit(Job::CreateWorktree {
            root,
            branch,
            origin: CreateOrigin::Filter,
        });
    }

    pub(crate) fn submit_create(&mut self, branch: String) {
        if let Some(root) = self.root.clone() {
            self.submit(Job::CreateWorktree {
                root,
                branch,
                origin: CreateOrigin::CreateView,
            });
        }
    }

    pub(crate) fn delete(&mut self, worktree: &Worktree, delete_branch: bool, force: bool) {
        if let Some(root) = self.root.clone() {
            self.submit(Job::DeleteWorktree {
                root,
                path: worktree.path.clone(),
                branch: worktree.branch.clone(),
                delete_branch,
                force,
            });
        }
    }

    pub(crate) fn cleanup(&mut self, targets: Vec<(PathBuf, String)>, delete_branches: bool) {
        if let Some(root) = self.root.clone() {
            self.submit(Job::Cleanup {
                root,
                targets,
                delete_branches,
            });
        }
    }

    pub(crate) fn checkout_remote(&mut self, branch: String) {
        if let Some(root) = self.root.clone() {
            self.submit(Job::CreateWorktree {
                root,
                branch,
                origin: CreateOrigin::Fetch,
            });
        }
    }

    /// Make the selection the working directory and record the access.
    pub fn activate_selected(&mut self) {
        let Some(path) = self.selected_worktree().map(|wt| wt.path.clone()) else {
            return;
        };
        self.activate(&path);
    }

    fn activate(&mut self, path: &Path) {
        match self.working_dir.activate(path) {
            Ok(()) => {
                self.toast_success(format!("Activated {}", path.display()));
                self.submit(Job::RecordAccess {
                    path: path.to_path_buf(),
                });
            }
            Err(e) => self.toast_error(format!("Cannot enter {}: {}", path.display(), e)),
        }
    }

    pub fn open_shell_in_selected(&mut self) {
        if let Some(wt) = self.selected_worktree() {
            let cwd = wt.path.clone();
            self.launch(LaunchTarget::Shell { cwd });
        }
    }
}
