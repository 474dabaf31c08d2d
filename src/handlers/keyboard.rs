use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{App, View};
use crate::input::InputMode;
use crate::ui::views::{
    CleanupKeyResult, CreateKeyResult, DeleteKeyResult, DetailKeyResult, FetchKeyResult,
    ProjectsKeyResult,
};

/// Route a key press to the current view.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.kind == KeyEventKind::Release {
        return;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.quit();
        return;
    }

    match &mut app.view {
        View::List => match app.list.mode {
            InputMode::Normal => handle_list_normal(app, key),
            InputMode::Insert => handle_list_insert(app, key),
        },
        View::Detail(state) => match state.handle_key(key) {
            DetailKeyResult::Continue => {}
            DetailKeyResult::Back => app.show_list(false),
            DetailKeyResult::Quit => app.quit(),
            DetailKeyResult::Launch(target) => app.launch(target),
        },
        View::Create(state) => match state.handle_key(key) {
            CreateKeyResult::Continue => {}
            CreateKeyResult::Back { reload } => app.show_list(reload),
            CreateKeyResult::Quit => app.quit(),
            CreateKeyResult::Submit(branch) => app.submit_create(branch),
        },
        View::Delete(state) => match state.handle_key(key) {
            DeleteKeyResult::Continue => {}
            DeleteKeyResult::Back { reload } => app.show_list(reload),
            DeleteKeyResult::Delete {
                delete_branch,
                force,
            } => {
                let worktree = state.worktree.clone();
                app.delete(&worktree, delete_branch, force);
            }
        },
        View::Cleanup(state) => match state.handle_key(key) {
            CleanupKeyResult::Continue => {}
            CleanupKeyResult::Back { reload } => app.show_list(reload),
            CleanupKeyResult::Quit => app.quit(),
            CleanupKeyResult::Run {
                targets,
                delete_branches,
            } => app.cleanup(targets, delete_branches),
        },
        View::Fetch(state) => match state.handle_key(key) {
            FetchKeyResult::Continue => {}
            FetchKeyResult::Back => app.show_list(false),
            FetchKeyResult::Quit => app.quit(),
            FetchKeyResult::Checkout(branch) => app.checkout_remote(branch),
        },
        View::Projects(state) => match state.handle_key(key) {
            ProjectsKeyResult::Continue => {}
            ProjectsKeyResult::Back => app.show_list(false),
            ProjectsKeyResult::Quit => app.quit(),
            ProjectsKeyResult::Open(path) => app.open_project(path),
        },
    }
}

/// Worktree list, Normal mode: single-key commands.
fn handle_list_normal(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.select_prev(),
        KeyCode::Char('g') => app.select_first(),
        KeyCode::Char('G') => app.select_last(),
        KeyCode::Char('/' | 'i') => app.list.mode = InputMode::Insert,
        KeyCode::Char('c') => app.open_create(),
        KeyCode::Char('d') => app.open_delete(),
        KeyCode::Char('x') => app.open_cleanup(),
        KeyCode::Char('f') => app.open_fetch(),
        KeyCode::Char('p') => app.open_projects(),
        KeyCode::Char('s') => app.cycle_sort(),
        KeyCode::Char('r') => app.refresh(),
        KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => app.open_selected_detail(),
        KeyCode::Char('o') => app.open_shell_in_selected(),
        KeyCode::Char('a') => app.activate_selected(),
        KeyCode::Esc => app.clear_filter(),
        KeyCode::Char('q') => app.quit(),
        _ => {}
    }
}

/// Worktree list, Insert mode: keys edit the filter.
fn handle_list_insert(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.list.mode = InputMode::Normal,
        KeyCode::Enter => app.submit_filter(),
        KeyCode::Up => app.select_prev(),
        KeyCode::Down => app.select_next(),
        KeyCode::Backspace => app.pop_filter_char(),
        KeyCode::Char(c) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            app.push_filter_char(c);
        }
        _ => {}
    }
}
