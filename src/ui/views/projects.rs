//! Repository picker over the projects directory.

use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::{clamp_index, next_index, prev_index};
use crate::input::TextInput;
use crate::projects::Project;
use crate::search::filter_indices;

pub struct ProjectsState {
    pub projects: Vec<Project>,
    pub filter: TextInput,
    pub display: Vec<usize>,
    pub selected: usize,
    pub loading: bool,
    /// A repository is open behind the picker
    can_go_back: bool,
}

pub enum ProjectsKeyResult {
    Continue,
    Back,
    Quit,
    Open(PathBuf),
}

impl ProjectsState {
    pub fn new(can_go_back: bool) -> Self {
        Self {
            projects: Vec::new(),
            filter: TextInput::new(),
            display: Vec::new(),
            selected: 0,
            loading: true,
            can_go_back,
        }
    }

    pub fn set_projects(&mut self, projects: Vec<Project>) {
        self.projects = projects;
        self.loading = false;
        self.refresh_display();
    }

    fn refresh_display(&mut self) {
        self.display = filter_indices(&self.projects, self.filter.as_str(), |p| p.name.as_str());
        self.selected = clamp_index(self.selected, self.display.len());
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> ProjectsKeyResult {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Down => self.selected = next_index(self.selected, self.display.len()),
            KeyCode::Up => self.selected = prev_index(self.selected, self.display.len()),
            KeyCode::Char('j') if ctrl => {
                self.selected = next_index(self.selected, self.display.len());
            }
            KeyCode::Char('k') if ctrl => {
                self.selected = prev_index(self.selected, self.display.len());
            }
            KeyCode::Enter => {
                if let Some(&i) = self.display.get(self.selected) {
                    return ProjectsKeyResult::Open(self.projects[i].path.clone());
                }
            }
            KeyCode::Esc if !self.filter.is_empty() => {
                self.filter.clear();
                self.refresh_display();
            }
            KeyCode::Esc if self.can_go_back => return ProjectsKeyResult::Back,
            KeyCode::Esc => return ProjectsKeyResult::Quit,
            _ => {
                if self.filter.handle_key(key) {
                    self.selected = 0;
                    self.refresh_display();
                }
            }
        }
        ProjectsKeyResult::Continue
    }
}

pub fn render(frame: &mut Frame, area: Rect, state: &ProjectsState) {
    let [filter_area, list_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Min(1)]).areas(area);

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("> ", Style::default().fg(Color::Yellow)),
            Span::raw(state.filter.as_str()),
        ])),
        filter_area,
    );

    if state.loading {
        frame.render_widget(Paragraph::new("Scanning projects..."), list_area);
        return;
    }
    if state.display.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled(
                "No repositories found",
                Style::default().fg(Color::DarkGray),
            )),
            list_area,
        );
        return;
    }

    let items: Vec<ListItem> = state
        .display
        .iter()
        .map(|&i| {
            let project = &state.projects[i];
            let count = match project.worktree_count {
                1 => "1 worktree".to_string(),
                n => format!("{} worktrees", n),
            };
            ListItem::new(Line::from(vec![
                Span::styled(project.name.clone(), Style::default().fg(Color::Cyan)),
                Span::styled(format!("  {}", count), Style::default().fg(Color::DarkGray)),
            ]))
        })
        .collect();
    let list = List::new(items)
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");
    let mut list_state = ListState::default().with_selected(Some(state.selected));
    frame.render_stateful_widget(list, list_area, &mut list_state);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(name: &str) -> Project {
        Project {
            name: name.to_string(),
            path: PathBuf::from("/code").join(name),
            worktree_count: 1,
        }
    }

    fn press(state: &mut ProjectsState, code: KeyCode) -> ProjectsKeyResult {
        state.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn loaded(can_go_back: bool) -> ProjectsState {
        let mut state = ProjectsState::new(can_go_back);
        state.set_projects(vec![project("api"), project("web"), project("worktui")]);
        state
    }

    #[test]
    fn typing_filters_and_enter_opens() {
        let mut state = loaded(false);
        for c in "wt".chars() {
            press(&mut state, KeyCode::Char(c));
        }
        assert_eq!(state.display.len(), 1);
        assert!(matches!(
            press(&mut state, KeyCode::Enter),
            ProjectsKeyResult::Open(ref p) if p.ends_with("worktui")
        ));
    }

    #[test]
    fn ctrl_j_moves_without_typing() {
        let mut state = loaded(false);
        state.handle_key(KeyEvent::new(KeyCode::Char('j'), KeyModifiers::CONTROL));
        assert_eq!(state.selected, 1);
        assert!(state.filter.is_empty());
    }

    #[test]
    fn esc_clears_filter_before_leaving() {
        let mut state = loaded(true);
        press(&mut state, KeyCode::Char('a'));
        assert!(matches!(press(&mut state, KeyCode::Esc), ProjectsKeyResult::Continue));
        assert_eq!(state.display.len(), 3);
        assert!(matches!(press(&mut state, KeyCode::Esc), ProjectsKeyResult::Back));

        let mut state = loaded(false);
        assert!(matches!(press(&mut state, KeyCode::Esc), ProjectsKeyResult::Quit));
    }
}
