//! Remote branches without a local worktree, checked out on Enter.

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
use crate::git::{GitError, RemoteBranch};
use crate::input::InputMode;
use crate::search::filter_indices;
use crate::ui::format::{relative_time, truncate};

pub struct FetchState {
    pub branches: Vec<RemoteBranch>,
    pub filter: String,
    pub mode: InputMode,
    /// Indices into `branches` matching the filter
    pub display: Vec<usize>,
    pub selected: usize,
    pub loading: bool,
    pub error: Option<String>,
    /// Branch being checked out
    pub creating: Option<String>,
}

pub enum FetchKeyResult {
    Continue,
    Back,
    Quit,
    Checkout(String),
}

impl FetchState {
    pub fn new() -> Self {
        Self {
            branches: Vec::new(),
            filter: String::new(),
            mode: InputMode::Insert,
            display: Vec::new(),
            selected: 0,
            loading: true,
            error: None,
            creating: None,
        }
    }

    pub fn set_branches(&mut self, result: Result<Vec<RemoteBranch>, GitError>) {
        self.loading = false;
        match result {
            Ok(branches) => {
                self.branches = branches;
                self.error = None;
            }
            Err(e) => self.error = Some(e.to_string()),
        }
        self.refresh_display();
    }

    /// A checkout failed; allow another attempt.
    pub fn fail(&mut self, message: String) {
        self.creating = None;
        self.error = Some(message);
    }

    fn refresh_display(&mut self) {
        self.display = filter_indices(&self.branches, &self.filter, |b| b.name.as_str());
        self.selected = clamp_index(self.selected, self.display.len());
    }

    pub fn selected_branch(&self) -> Option<&RemoteBranch> {
        self.display
            .get(self.selected)
            .map(|&i| &self.branches[i])
    }

    fn checkout(&mut self) -> FetchKeyResult {
        let Some(name) = self.selected_branch().map(|b| b.name.clone()) else {
            return FetchKeyResult::Continue;
        };
        self.creating = Some(name.clone());
        self.error = None;
        FetchKeyResult::Checkout(name)
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FetchKeyResult {
        if self.creating.is_some() {
            return FetchKeyResult::Continue;
        }

        match key.code {
            KeyCode::Up => {
                self.selected = prev_index(self.selected, self.display.len());
                return FetchKeyResult::Continue;
            }
            KeyCode::Down => {
                self.selected = next_index(self.selected, self.display.len());
                return FetchKeyResult::Continue;
            }
            KeyCode::Enter => return self.checkout(),
            _ => {}
        }

        match self.mode {
            InputMode::Insert => {
                match key.code {
                    KeyCode::Esc => self.mode = InputMode::Normal,
                    KeyCode::Backspace => {
                        self.filter.pop();
                        self.selected = 0;
                        self.refresh_display();
                    }
                    KeyCode::Char(c) => {
                        self.filter.push(c);
                        self.selected = 0;
                        self.refresh_display();
                    }
                    _ => {}
                }
                FetchKeyResult::Continue
            }
            InputMode::Normal => match key.code {
                KeyCode::Esc | KeyCode::Char('h') | KeyCode::Left => FetchKeyResult::Back,
                KeyCode::Char('q') => FetchKeyResult::Quit,
                KeyCode::Char('/' | 'i') => {
                    self.mode = InputMode::Insert;
                    FetchKeyResult::Continue
                }
                KeyCode::Char('j') => {
                    self.selected = next_index(self.selected, self.display.len());
                    FetchKeyResult::Continue
                }
                KeyCode::Char('k') => {
                    self.selected = prev_index(self.selected, self.display.len());
                    FetchKeyResult::Continue
                }
                KeyCode::Char('l') | KeyCode::Right => self.checkout(),
                _ => FetchKeyResult::Continue,
            },
        }
    }
}

impl Default for FetchState {
    fn default() -> Self {
        Self::new()
    }
}

pub fn render(frame: &mut Frame, area: Rect, state: &FetchState) {
    let [filter_area, list_area, footer] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(area);

    let prompt_style = if state.mode.is_text_input() {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("/ ", prompt_style),
            Span::raw(state.filter.as_str()),
        ])),
        filter_area,
    );

    if state.loading {
        frame.render_widget(Paragraph::new("Fetching remote branches..."), list_area);
    } else if state.display.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled(
                "No remote branches without a worktree",
                Style::default().fg(Color::DarkGray),
            )),
            list_area,
        );
    } else {
        let now = Utc::now();
        let items: Vec<ListItem> = state
            .display
            .iter()
            .map(|&i| {
                let branch = &state.branches[i];
                let age = branch
                    .date
                    .map(|d| relative_time(&d, now))
                    .unwrap_or_default();
                ListItem::new(Line::from(vec![
                    Span::raw(truncate(&branch.name, 50)),
                    Span::styled(
                        format!("  {}  {}", age, branch.author),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]))
            })
            .collect();
        let list = List::new(items)
            .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
            .highlight_symbol("> ");
        let mut list_state = ListState::default().with_selected(Some(state.selected));
        frame.render_stateful_widget(list, list_area, &mut list_state);
    }

    let status = if let Some(branch) = &state.creating {
        Span::styled(
            format!("Checking out {}...", branch),
            Style::default().fg(Color::Yellow),
        )
    } else if let Some(error) = &state.error {
        Span::styled(error.clone(), Style::default().fg(Color::Red))
    } else {
        Span::raw("")
    };
    frame.render_widget(Paragraph::new(status), footer);
}
