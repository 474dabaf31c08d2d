//! Screen state owned by App.

use crate::app::SortKey;
use crate::input::InputMode;
use crate::launch::LaunchTarget;
use crate::ui::views::{
    CleanupState, CreateState, DeleteState, DetailState, FetchState, ProjectsState,
};

/// The screen currently shown.
///
/// The worktree list keeps its state in [`WorktreeListState`] across views,
/// so returning to it preserves filter, sort and selection.
pub enum View {
    List,
    Detail(Box<DetailState>),
    Create(CreateState),
    Delete(Box<DeleteState>),
    Cleanup(CleanupState),
    Fetch(FetchState),
    Projects(ProjectsState),
}

impl View {
    /// Title shown in the header
    pub fn title(&self) -> &'static str {
        match self {
            View::List => "Worktrees",
            View::Detail(_) => "Sessions",
            View::Create(_) => "Create worktree",
            View::Delete(_) => "Delete worktree",
            View::Cleanup(_) => "Cleanup",
            View::Fetch(_) => "Remote branches",
            View::Projects(_) => "Projects",
        }
    }
}

/// Filter, sort and selection of the worktree list.
#[derive(Debug, Clone, Default)]
pub struct WorktreeListState {
    pub filter: String,
    pub mode: InputMode,
    pub sort: SortKey,
    /// Indices into `App::worktrees`, in display order
    pub display: Vec<usize>,
    /// Position in `display`
    pub selected: usize,
    /// A listing request is outstanding
    pub loading: bool,
    pub error: Option<String>,
    /// Branch being created from the filter text
    pub creating: Option<String>,
}

/// Why the event loop should stop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exit {
    Quit,
    Launch(LaunchTarget),
}

/// Screen the dashboard opens on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StartView {
    #[default]
    List,
    Cleanup,
}
