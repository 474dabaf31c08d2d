//! Bottom status bar: mode indicator and key hints for the current view.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, View};
use crate::input::InputMode;
use crate::ui::views::{CleanupPhase, DeleteState};

/// Draw the status bar
pub fn draw_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = Vec::new();
    if let Some(mode) = mode(app) {
        spans.push(build_mode_indicator(mode));
    }
    for (key, label) in hints(app) {
        spans.push(Span::styled(
            format!(" {} ", key),
            Style::default().fg(Color::Cyan),
        ));
        spans.push(Span::raw(format!("{} ", label)));
    }

    let bar = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    f.render_widget(bar, area);
}

/// Input mode of views that have one
fn mode(app: &App) -> Option<InputMode> {
    match &app.view {
        View::List => Some(app.list.mode),
        View::Fetch(state) => Some(state.mode),
        _ => None,
    }
}

fn build_mode_indicator(mode: InputMode) -> Span<'static> {
    let bg = match mode {
        InputMode::Normal => Color::Blue,
        InputMode::Insert => Color::Green,
    };
    Span::styled(
        format!(" -- {} -- ", mode.display_name()),
        Style::default().fg(Color::Black).bg(bg),
    )
}

fn delete_hints(state: &DeleteState) -> &'static [(&'static str, &'static str)] {
    if state.blocked {
        &[("Esc", "back")]
    } else if state.done {
        &[("Enter", "back")]
    } else {
        &[
            ("j/k", "row"),
            ("SPC", "toggle"),
            ("h/l", "no/yes"),
            ("Enter", "confirm"),
            ("Esc", "cancel"),
        ]
    }
}

fn hints(app: &App) -> &'static [(&'static str, &'static str)] {
    match &app.view {
        View::List => match app.list.mode {
            InputMode::Insert => &[
                ("Enter", "open/create"),
                ("Esc", "normal"),
                ("↑/↓", "nav"),
            ],
            InputMode::Normal => &[
                ("j/k", "nav"),
                ("Enter", "open"),
                ("/", "filter"),
                ("a", "activate"),
                ("o", "shell"),
                ("c", "create"),
                ("d", "delete"),
                ("x", "cleanup"),
                ("f", "fetch"),
                ("s", "sort"),
                ("p", "projects"),
                ("q", "quit"),
            ],
        },
        View::Detail(_) => &[
            ("j/k", "nav"),
            ("Enter", "launch"),
            ("n", "new"),
            ("r", "resume latest"),
            ("o", "shell"),
            ("Esc", "back"),
        ],
        View::Create(_) => &[("Enter", "create"), ("Esc", "back")],
        View::Delete(state) => delete_hints(state),
        View::Cleanup(state) => match state.phase {
            CleanupPhase::Confirming => &[("y", "remove"), ("n", "cancel")],
            CleanupPhase::Done(_) => &[("Enter", "back")],
            _ => &[
                ("j/k", "nav"),
                ("SPC", "toggle"),
                ("a", "all"),
                ("b", "branches"),
                ("Enter", "remove"),
                ("Esc", "back"),
            ],
        },
        View::Fetch(state) => match state.mode {
            InputMode::Insert => &[("Enter", "checkout"), ("Esc", "normal"), ("↑/↓", "nav")],
            InputMode::Normal => &[
                ("j/k", "nav"),
                ("l", "checkout"),
                ("/", "filter"),
                ("Esc", "back"),
            ],
        },
        View::Projects(_) => &[("C-j/C-k", "nav"), ("Enter", "open"), ("Esc", "back")],
    }
}
