//! Discovery of git repositories under a projects directory.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// A repository found under the projects directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    /// Directory name
    pub name: String,
    pub path: PathBuf,
    /// Main checkout plus linked worktrees
    pub worktree_count: usize,
}

/// Repositories directly under `base`, most recently modified first.
///
/// Hidden directories and directories without a `.git` entry are skipped, as
/// is anything that cannot be read.
pub fn list_projects(base: &Path) -> Vec<Project> {
    let entries = match fs::read_dir(base) {
        Ok(entries) => entries,
        Err(e) => {
            log::debug!("Cannot read projects directory {}: {}", base.display(), e);
            return Vec::new();
        }
    };

    let mut projects: Vec<(SystemTime, Project)> = entries
        .flatten()
        .filter_map(|entry| {
            let name = entry.file_name().to_str()?.to_string();
            if name.starts_with('.') {
                return None;
            }
            let path = entry.path();
            let meta = fs::metadata(&path).ok()?;
            if !meta.is_dir() || !path.join(".git").exists() {
                return None;
            }
            let mtime = meta.modified().unwrap_or(SystemTime::UNIX_EPOCH);
            let worktree_count = 1 + linked_worktrees(&path);
            Some((
                mtime,
                Project {
                    name,
                    path,
                    worktree_count,
                },
            ))
        })
        .collect();

    projects.sort_by(|a, b| b.0.cmp(&a.0));
    projects.into_iter().map(|(_, project)| project).collect()
}

/// Number of linked worktrees registered in `<repo>/.git/worktrees`.
fn linked_worktrees(repo: &Path) -> usize {
    fs::read_dir(repo.join(".git").join("worktrees"))
        .map(|entries| entries.flatten().count())
        .unwrap_or(0)
}
