//! Branch name prompt for creating a worktree.

use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Layout, Position, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::git::{validate_branch_name, Created, GitError};
use crate::input::TextInput;

/// State for the create view.
#[derive(Debug, Default)]
pub struct CreateState {
    pub input: TextInput,
    /// A create job is outstanding
    pub creating: bool,
    pub error: Option<String>,
    /// Path of the worktree once created
    pub created: Option<PathBuf>,
    pub warnings: Vec<String>,
}

pub enum CreateKeyResult {
    Continue,
    Back { reload: bool },
    Quit,
    Submit(String),
}

impl CreateState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of the create job.
    pub fn finish(&mut self, result: Result<Created, GitError>) {
        self.creating = false;
        match result {
            Ok(created) => {
                self.created = Some(created.path);
                self.warnings = created.warnings;
                self.error = None;
            }
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> CreateKeyResult {
        if self.creating {
            return CreateKeyResult::Continue;
        }
        if self.created.is_some() {
            return match key.code {
                KeyCode::Esc | KeyCode::Enter => CreateKeyResult::Back { reload: true },
                KeyCode::Char('q') => CreateKeyResult::Quit,
                _ => CreateKeyResult::Continue,
            };
        }

        match key.code {
            KeyCode::Esc => CreateKeyResult::Back { reload: true },
            KeyCode::Char('q') if self.input.is_empty() => CreateKeyResult::Quit,
            KeyCode::Enter => {
                let branch = self.input.as_str().trim().to_string();
                match validate_branch_name(&branch) {
                    Ok(()) => {
                        self.creating = true;
                        self.error = None;
                        CreateKeyResult::Submit(branch)
                    }
                    Err(e) => {
                        self.error = Some(e);
                        CreateKeyResult::Continue
                    }
                }
            }
            _ => {
                if self.input.handle_key(key) {
                    self.error = None;
                }
                CreateKeyResult::Continue
            }
        }
    }

    /// Live validation message for the current input.
    fn hint(&self) -> Option<String> {
        let text = self.input.as_str().trim();
        if text.is_empty() {
            return None;
        }
        validate_branch_name(text).err()
    }
}

pub fn render(frame: &mut Frame, area: Rect, state: &CreateState) {
    let [label, input_area, message] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Min(1),
    ])
    .areas(area);

    frame.render_widget(Paragraph::new("Branch name:"), label);

    let border = if state.creating {
        Color::DarkGray
    } else {
        Color::Cyan
    };
    frame.render_widget(
        Paragraph::new(state.input.as_str()).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border)),
        ),
        input_area,
    );
    if !state.creating && state.created.is_none() {
        frame.set_cursor_position(Position::new(
            input_area.x + 1 + state.input.cursor_width() as u16,
            input_area.y + 1,
        ));
    }

    let mut lines = Vec::new();
    if state.creating {
        lines.push(Line::from(Span::styled(
            "Creating worktree...",
            Style::default().fg(Color::Yellow),
        )));
    } else if let Some(path) = &state.created {
        lines.push(Line::from(vec![
            Span::styled("Created ", Style::default().fg(Color::Green)),
            Span::raw(path.display().to_string()),
        ]));
        for warning in &state.warnings {
            lines.push(Line::from(Span::styled(
                format!("warning: {}", warning),
                Style::default().fg(Color::Yellow),
            )));
        }
        lines.push(Line::from(Span::styled(
            "Press Enter to return",
            Style::default().fg(Color::DarkGray),
        )));
    } else if let Some(error) = state.error.clone().or_else(|| state.hint()) {
        lines.push(Line::from(Span::styled(error, Style::default().fg(Color::Red))));
    }
    frame.render_widget(Paragraph::new(lines), message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn type_str(state: &mut CreateState, text: &str) {
        for c in text.chars() {
            state.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        }
    }

    fn enter(state: &mut CreateState) -> CreateKeyResult {
        state.handle_key(KeyEvent::from(KeyCode::Enter))
    }

    #[test]
    fn enter_submits_trimmed_name_once() {
        let mut state = CreateState::new();
        type_str(&mut state, " feature/x ");
        assert!(matches!(enter(&mut state), CreateKeyResult::Submit(ref b) if b == "feature/x"));
        assert!(state.creating);
        assert!(matches!(enter(&mut state), CreateKeyResult::Continue));
    }

    #[test]
    fn invalid_name_shows_error() {
        let mut state = CreateState::new();
        type_str(&mut state, "a b");
        assert!(matches!(enter(&mut state), CreateKeyResult::Continue));
        assert!(state.error.is_some());
        assert!(!state.creating);
    }

    #[test]
    fn q_is_text_unless_input_is_empty() {
        let mut state = CreateState::new();
        assert!(matches!(
            state.handle_key(KeyEvent::from(KeyCode::Char('q'))),
            CreateKeyResult::Quit
        ));
        type_str(&mut state, "fix");
        type_str(&mut state, "q");
        assert_eq!(state.input.as_str(), "fixq");
    }

    #[test]
    fn finish_shows_path_then_enter_returns() {
        let mut state = CreateState::new();
        type_str(&mut state, "x");
        enter(&mut state);
        state.finish(Ok(Created {
            path: PathBuf::from("/code/worktrees/x"),
            reused: false,
            warnings: Vec::new(),
        }));
        assert!(!state.creating);
        assert_eq!(state.created, Some(PathBuf::from("/code/worktrees/x")));
        assert!(matches!(enter(&mut state), CreateKeyResult::Back { reload: true }));
    }

    #[test]
    fn failed_create_allows_retry() {
        let mut state = CreateState::new();
        type_str(&mut state, "x");
        enter(&mut state);
        state.finish(Err(GitError::WorktreeCreationFailed("exists".to_string())));
        assert!(state.error.is_some());
        assert!(matches!(enter(&mut state), CreateKeyResult::Submit(_)));
    }
}
