//! Worktree detail: start a new assistant session or resume an old one.

use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::{next_index, prev_index};
use crate::claude::ClaudeSession;
use crate::git::Worktree;
use crate::launch::LaunchTarget;
use crate::ui::format::{relative_time, truncate};

pub struct DetailState {
    pub worktree: Worktree,
    /// Most recent first
    pub sessions: Vec<ClaudeSession>,
    pub loading: bool,
    /// Row 0 is "New session", row `n` is `sessions[n - 1]`
    pub selected: usize,
}

pub enum DetailKeyResult {
    Continue,
    Back,
    Quit,
    Launch(LaunchTarget),
}

impl DetailState {
    pub fn new(worktree: Worktree) -> Self {
        Self {
            worktree,
            sessions: Vec::new(),
            loading: true,
            selected: 0,
        }
    }

    pub fn set_sessions(&mut self, sessions: Vec<ClaudeSession>) {
        self.sessions = sessions;
        self.loading = false;
        self.selected = self.selected.min(self.sessions.len());
    }

    fn assistant(&self, session_id: Option<&str>) -> DetailKeyResult {
        DetailKeyResult::Launch(LaunchTarget::Assistant {
            cwd: self.worktree.path.clone(),
            session_id: session_id.map(str::to_string),
        })
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> DetailKeyResult {
        let rows = self.sessions.len() + 1;
        match key.code {
            KeyCode::Esc | KeyCode::Char('h') | KeyCode::Left => DetailKeyResult::Back,
            KeyCode::Char('q') => DetailKeyResult::Quit,
            KeyCode::Char('j') | KeyCode::Down => {
                self.selected = next_index(self.selected, rows);
                DetailKeyResult::Continue
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.selected = prev_index(self.selected, rows);
                DetailKeyResult::Continue
            }
            KeyCode::Enter => match self.selected {
                0 => self.assistant(None),
                n => match self.sessions.get(n - 1) {
                    Some(session) => self.assistant(Some(&session.session_id)),
                    None => DetailKeyResult::Continue,
                },
            },
            KeyCode::Char('n') => self.assistant(None),
            KeyCode::Char('r') => match self.sessions.first() {
                Some(latest) => self.assistant(Some(&latest.session_id)),
                None => DetailKeyResult::Continue,
            },
            KeyCode::Char('o') => DetailKeyResult::Launch(LaunchTarget::Shell {
                cwd: self.worktree.path.clone(),
            }),
            _ => DetailKeyResult::Continue,
        }
    }
}

pub fn render(frame: &mut Frame, area: Rect, state: &DetailState) {
    let now = Utc::now();
    let wt = &state.worktree;
    let [header, path_line, _, body] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(1),
    ])
    .areas(area);

    let (status, status_color) = if wt.is_dirty {
        ("DIRTY", Color::Red)
    } else {
        ("clean", Color::Green)
    };
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(
                truncate(wt.display_branch(), 50),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" ({}, ", relative_time(&wt.commit_date, now)),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(status, Style::default().fg(status_color)),
            Span::styled(")", Style::default().fg(Color::DarkGray)),
        ])),
        header,
    );
    frame.render_widget(
        Paragraph::new(Span::styled(
            wt.path.display().to_string(),
            Style::default().fg(Color::DarkGray),
        )),
        path_line,
    );

    if state.loading {
        frame.render_widget(Paragraph::new("Loading sessions..."), body);
        return;
    }

    let mut items = vec![ListItem::new(Line::from(Span::styled(
        "+ New session",
        Style::default().fg(Color::Green),
    )))];
    items.extend(state.sessions.iter().map(|session| {
        let age = session
            .modified
            .map(|m| relative_time(&m, now))
            .unwrap_or_default();
        ListItem::new(Line::from(vec![
            Span::raw(truncate(session.display_summary(), 60)),
            Span::styled(
                format!("  {} msgs  {}", session.message_count, age),
                Style::default().fg(Color::DarkGray),
            ),
        ]))
    }));

    let list = List::new(items)
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");
    let mut list_state = ListState::default().with_selected(Some(state.selected));
    frame.render_stateful_widget(list, body, &mut list_state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::fixtures::worktree;
    use crossterm::event::KeyModifiers;

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    fn session(id: &str) -> ClaudeSession {
        ClaudeSession {
            session_id: id.to_string(),
            first_prompt: String::new(),
            summary: String::new(),
            message_count: 1,
            created: None,
            modified: None,
            git_branch: String::new(),
        }
    }

    fn state() -> DetailState {
        let mut state = DetailState::new(worktree("feature/x", "2026-01-01T00:00:00+00:00"));
        state.set_sessions(vec![session("newest"), session("older")]);
        state
    }

    fn launched(result: DetailKeyResult) -> LaunchTarget {
        match result {
            DetailKeyResult::Launch(target) => target,
            _ => panic!("expected a launch"),
        }
    }

    #[test]
    fn enter_on_first_row_starts_a_new_session() {
        let mut state = state();
        let target = launched(state.handle_key(KeyEvent::from(KeyCode::Enter)));
        assert!(matches!(target, LaunchTarget::Assistant { session_id: None, .. }));
    }

    #[test]
    fn enter_on_session_row_resumes_it() {
        let mut state = state();
        state.handle_key(key('j'));
        state.handle_key(key('j'));
        let target = launched(state.handle_key(KeyEvent::from(KeyCode::Enter)));
        assert_eq!(
            target,
            LaunchTarget::Assistant {
                cwd: state.worktree.path.clone(),
                session_id: Some("older".to_string()),
            }
        );
    }

    #[test]
    fn navigation_wraps_over_sessions_plus_new_row() {
        let mut state = state();
        state.handle_key(key('k'));
        assert_eq!(state.selected, 2);
        state.handle_key(key('j'));
        assert_eq!(state.selected, 0);
    }

    #[test]
    fn r_resumes_latest_and_o_opens_shell() {
        let mut state = state();
        let target = launched(state.handle_key(key('r')));
        assert!(
            matches!(target, LaunchTarget::Assistant { session_id: Some(ref id), .. } if id == "newest")
        );
        let target = launched(state.handle_key(key('o')));
        assert!(matches!(target, LaunchTarget::Shell { .. }));
    }

    #[test]
    fn r_without_sessions_does_nothing() {
        let mut state = DetailState::new(worktree("a", "2026-01-01T00:00:00+00:00"));
        state.set_sessions(Vec::new());
        assert!(matches!(state.handle_key(key('r')), DetailKeyResult::Continue));
    }
}
