//! Bulk removal of clean worktrees.

use std::collections::HashSet;
use std::path::PathBuf;

use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::{clamp_index, next_index, prev_index};
use crate::git::Worktree;
use crate::ui::format::{relative_time, truncate};
use crate::worker::CleanupReport;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupPhase {
    /// Waiting for the worktree listing
    Loading,
    Selecting,
    Confirming,
    Running,
    Done(CleanupReport),
}

pub struct CleanupState {
    pub phase: CleanupPhase,
    /// Non-main worktrees without changes, the only removable ones
    pub clean: Vec<Worktree>,
    /// Non-main worktrees with changes, listed for reference
    pub dirty: Vec<Worktree>,
    /// Paths of clean worktrees marked for removal
    pub toggled: HashSet<PathBuf>,
    pub delete_branches: bool,
    /// Position in `clean`
    pub selected: usize,
}

pub enum CleanupKeyResult {
    Continue,
    Back { reload: bool },
    Quit,
    Run {
        targets: Vec<(PathBuf, String)>,
        delete_branches: bool,
    },
}

impl CleanupState {
    pub fn loading() -> Self {
        Self {
            phase: CleanupPhase::Loading,
            clean: Vec::new(),
            dirty: Vec::new(),
            toggled: HashSet::new(),
            delete_branches: false,
            selected: 0,
        }
    }

    pub fn from_worktrees(worktrees: &[Worktree]) -> Self {
        let mut state = Self::loading();
        state.populate(worktrees);
        state
    }

    /// Split `worktrees` into clean and dirty, dropping toggles for
    /// worktrees that are gone or no longer clean.
    pub fn populate(&mut self, worktrees: &[Worktree]) {
        let (dirty, clean): (Vec<Worktree>, Vec<Worktree>) = worktrees
            .iter()
            .filter(|wt| !wt.is_main)
            .cloned()
            .partition(|wt| wt.is_dirty);
        self.clean = clean;
        self.dirty = dirty;
        let clean = &self.clean;
        self.toggled.retain(|path| clean.iter().any(|wt| &wt.path == path));
        self.selected = clamp_index(self.selected, self.clean.len());
        if matches!(self.phase, CleanupPhase::Loading) {
            self.phase = CleanupPhase::Selecting;
        }
    }

    pub fn finish(&mut self, report: CleanupReport) {
        self.toggled.clear();
        self.phase = CleanupPhase::Done(report);
    }

    fn toggle_selected(&mut self) {
        if let Some(wt) = self.clean.get(self.selected) {
            if !self.toggled.remove(&wt.path) {
                self.toggled.insert(wt.path.clone());
            }
        }
    }

    fn toggle_all(&mut self) {
        if self.toggled.len() == self.clean.len() {
            self.toggled.clear();
        } else {
            self.toggled = self.clean.iter().map(|wt| wt.path.clone()).collect();
        }
    }

    /// Toggled worktrees in list order as (path, branch) pairs
    pub fn targets(&self) -> Vec<(PathBuf, String)> {
        self.clean
            .iter()
            .filter(|wt| self.toggled.contains(&wt.path))
            .map(|wt| (wt.path.clone(), wt.branch.clone()))
            .collect()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> CleanupKeyResult {
        match self.phase {
            CleanupPhase::Loading | CleanupPhase::Running => match key.code {
                KeyCode::Char('q') => CleanupKeyResult::Quit,
                _ => CleanupKeyResult::Continue,
            },
            CleanupPhase::Done(_) => match key.code {
                KeyCode::Esc | KeyCode::Enter => CleanupKeyResult::Back { reload: false },
                KeyCode::Char('q') => CleanupKeyResult::Quit,
                _ => CleanupKeyResult::Continue,
            },
            CleanupPhase::Confirming => match key.code {
                KeyCode::Char('y') | KeyCode::Enter => {
                    self.phase = CleanupPhase::Running;
                    CleanupKeyResult::Run {
                        targets: self.targets(),
                        delete_branches: self.delete_branches,
                    }
                }
                KeyCode::Char('n') | KeyCode::Esc => {
                    self.phase = CleanupPhase::Selecting;
                    CleanupKeyResult::Continue
                }
                _ => CleanupKeyResult::Continue,
            },
            CleanupPhase::Selecting => {
                match key.code {
                    KeyCode::Esc => return CleanupKeyResult::Back { reload: false },
                    KeyCode::Char('q') => return CleanupKeyResult::Quit,
                    KeyCode::Char('j') | KeyCode::Down => {
                        self.selected = next_index(self.selected, self.clean.len());
                    }
                    KeyCode::Char('k') | KeyCode::Up => {
                        self.selected = prev_index(self.selected, self.clean.len());
                    }
                    KeyCode::Char(' ') => self.toggle_selected(),
                    KeyCode::Char('a') => self.toggle_all(),
                    KeyCode::Char('b') => self.delete_branches = !self.delete_branches,
                    KeyCode::Enter if !self.toggled.is_empty() => {
                        self.phase = CleanupPhase::Confirming;
                    }
                    _ => {}
                }
                CleanupKeyResult::Continue
            }
        }
    }
}

pub fn render(frame: &mut Frame, area: Rect, state: &CleanupState) {
    let [list_area, footer] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(3)]).areas(area);
    let now = Utc::now();

    if state.phase == CleanupPhase::Loading {
        frame.render_widget(Paragraph::new("Loading worktrees..."), list_area);
        return;
    }

    let mut items: Vec<ListItem> = state
        .clean
        .iter()
        .map(|wt| {
            let mark = if state.toggled.contains(&wt.path) {
                "[x]"
            } else {
                "[ ]"
            };
            ListItem::new(Line::from(vec![
                Span::raw(format!("{} ", mark)),
                Span::raw(truncate(wt.display_branch(), 50)),
                Span::styled(
                    format!("  {}", relative_time(&wt.commit_date, now)),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();
    items.extend(state.dirty.iter().map(|wt| {
        ListItem::new(Line::from(vec![
            Span::styled("    ", Style::default()),
            Span::styled(
                truncate(wt.display_branch(), 50),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled("  dirty, skipped", Style::default().fg(Color::Red)),
        ]))
    }));

    if items.is_empty() {
        frame.render_widget(Paragraph::new("No worktrees to clean up."), list_area);
    } else {
        let list = List::new(items)
            .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD));
        let selected = (!state.clean.is_empty()).then_some(state.selected);
        let mut list_state = ListState::default().with_selected(selected);
        frame.render_stateful_widget(list, list_area, &mut list_state);
    }

    let branches = if state.delete_branches { "[x]" } else { "[ ]" };
    let mut lines = vec![Line::from(format!(
        "{} Also delete branches    {} of {} selected",
        branches,
        state.toggled.len(),
        state.clean.len()
    ))];
    match &state.phase {
        CleanupPhase::Confirming => lines.push(Line::from(Span::styled(
            format!("Remove {} worktrees? (y/n)", state.toggled.len()),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ))),
        CleanupPhase::Running => lines.push(Line::from(Span::styled(
            "Removing...",
            Style::default().fg(Color::Yellow),
        ))),
        CleanupPhase::Done(report) => {
            lines.push(Line::from(Span::styled(
                format!("Removed {} worktrees", report.removed),
                Style::default().fg(Color::Green),
            )));
            for failure in &report.failures {
                lines.push(Line::from(Span::styled(
                    failure.clone(),
                    Style::default().fg(Color::Red),
                )));
            }
        }
        CleanupPhase::Loading | CleanupPhase::Selecting => {}
    }
    frame.render_widget(Paragraph::new(lines), footer);
}
