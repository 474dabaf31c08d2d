//! Delete confirmation for a single worktree.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::git::{GitError, Worktree};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteRow {
    DeleteBranch,
    Force,
    Confirm,
}

impl DeleteRow {
    fn next(self) -> Self {
        match self {
            DeleteRow::DeleteBranch => DeleteRow::Force,
            DeleteRow::Force => DeleteRow::Confirm,
            DeleteRow::Confirm => DeleteRow::DeleteBranch,
        }
    }

    fn prev(self) -> Self {
        match self {
            DeleteRow::DeleteBranch => DeleteRow::Confirm,
            DeleteRow::Force => DeleteRow::DeleteBranch,
            DeleteRow::Confirm => DeleteRow::Force,
        }
    }
}

pub struct DeleteState {
    pub worktree: Worktree,
    /// The working directory is inside the worktree, so it cannot be removed
    pub blocked: bool,
    pub delete_branch: bool,
    pub force: bool,
    pub row: DeleteRow,
    /// Yes is selected on the confirm row
    pub confirm: bool,
    pub deleting: bool,
    pub error: Option<String>,
    pub done: bool,
}

pub enum DeleteKeyResult {
    Continue,
    Back { reload: bool },
    Delete { delete_branch: bool, force: bool },
}

impl DeleteState {
    pub fn new(worktree: Worktree, blocked: bool) -> Self {
        Self {
            worktree,
            blocked,
            delete_branch: false,
            force: false,
            row: DeleteRow::Confirm,
            confirm: false,
            deleting: false,
            error: None,
            done: false,
        }
    }

    pub fn finish(&mut self, result: Result<(), GitError>) {
        self.deleting = false;
        match result {
            Ok(()) => self.done = true,
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    fn toggle(&mut self) {
        match self.row {
            DeleteRow::DeleteBranch => self.delete_branch = !self.delete_branch,
            DeleteRow::Force => self.force = !self.force,
            DeleteRow::Confirm => self.confirm = !self.confirm,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> DeleteKeyResult {
        if self.blocked {
            return match key.code {
                KeyCode::Esc => DeleteKeyResult::Back { reload: false },
                _ => DeleteKeyResult::Continue,
            };
        }
        if self.done {
            return match key.code {
                KeyCode::Esc | KeyCode::Enter => DeleteKeyResult::Back { reload: true },
                _ => DeleteKeyResult::Continue,
            };
        }
        if self.deleting {
            return DeleteKeyResult::Continue;
        }

        match key.code {
            KeyCode::Esc => DeleteKeyResult::Back { reload: false },
            KeyCode::Char('j') | KeyCode::Down => {
                self.row = self.row.next();
                DeleteKeyResult::Continue
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.row = self.row.prev();
                DeleteKeyResult::Continue
            }
            KeyCode::Left | KeyCode::Right | KeyCode::Char('h' | 'l')
                if self.row == DeleteRow::Confirm =>
            {
                self.confirm = !self.confirm;
                DeleteKeyResult::Continue
            }
            KeyCode::Char(' ') => {
                self.toggle();
                DeleteKeyResult::Continue
            }
            KeyCode::Enter => match self.row {
                DeleteRow::Confirm if self.confirm => {
                    self.deleting = true;
                    self.error = None;
                    DeleteKeyResult::Delete {
                        delete_branch: self.delete_branch,
                        force: self.force,
                    }
                }
                DeleteRow::Confirm => DeleteKeyResult::Back { reload: false },
                _ => {
                    self.toggle();
                    DeleteKeyResult::Continue
                }
            },
            _ => DeleteKeyResult::Continue,
        }
    }
}

fn checkbox(label: &str, checked: bool, focused: bool) -> Line<'static> {
    let mark = if checked { "[x]" } else { "[ ]" };
    let style = if focused {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    Line::from(Span::styled(format!("{} {}", mark, label), style))
}

pub fn render(frame: &mut Frame, area: Rect, state: &DeleteState) {
    let wt = &state.worktree;
    let mut lines = vec![
        Line::from(vec![
            Span::raw("Delete worktree "),
            Span::styled(
                wt.display_branch().to_string(),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(Span::styled(
            wt.path.display().to_string(),
            Style::default().fg(Color::DarkGray),
        )),
        Line::default(),
    ];

    if state.blocked {
        lines.push(Line::from(Span::styled(
            "You are inside this worktree. Leave it before deleting it.",
            Style::default().fg(Color::Red),
        )));
        lines.push(Line::from(Span::styled(
            "Esc to go back",
            Style::default().fg(Color::DarkGray),
        )));
        frame.render_widget(Paragraph::new(lines), area);
        return;
    }

    if state.done {
        lines.push(Line::from(Span::styled(
            "Deleted.",
            Style::default().fg(Color::Green),
        )));
        frame.render_widget(Paragraph::new(lines), area);
        return;
    }

    if wt.is_dirty {
        lines.push(Line::from(Span::styled(
            "This worktree has uncommitted changes.",
            Style::default().fg(Color::Yellow),
        )));
    }
    lines.push(checkbox(
        &format!("Also delete branch {}", wt.display_branch()),
        state.delete_branch,
        state.row == DeleteRow::DeleteBranch,
    ));
    lines.push(checkbox(
        "Force (discard changes, unmerged branch)",
        state.force,
        state.row == DeleteRow::Force,
    ));
    lines.push(Line::default());

    let selected = Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD);
    let focused = state.row == DeleteRow::Confirm;
    let (no_style, yes_style) = match (focused, state.confirm) {
        (true, false) => (selected, Style::default()),
        (true, true) => (Style::default(), selected.fg(Color::Red)),
        (false, _) => (Style::default(), Style::default()),
    };
    lines.push(Line::from(vec![
        Span::styled(" No ", no_style),
        Span::raw("  "),
        Span::styled(" Yes ", yes_style),
    ]));

    if state.deleting {
        lines.push(Line::from(Span::styled(
            "Deleting...",
            Style::default().fg(Color::Yellow),
        )));
    } else if let Some(error) = &state.error {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        )));
    }
    frame.render_widget(Paragraph::new(lines), area);
}
