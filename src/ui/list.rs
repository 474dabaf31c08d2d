//! The worktree list: filter row on top, one row per displayed worktree.

use chrono::Utc;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph, StatefulWidget, Widget},
};

use crate::app::App;
use crate::git::Worktree;
use crate::ui::format::{relative_time, truncate};

/// Worktree list widget
pub struct WorktreeList<'a> {
    app: &'a App,
}

impl<'a> WorktreeList<'a> {
    pub fn new(app: &'a App) -> Self {
        Self { app }
    }
}

impl Widget for WorktreeList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let list_state = &self.app.list;
        let filter_area = Rect { height: 1, ..area };
        let list_area = Rect {
            y: area.y + 1,
            height: area.height.saturating_sub(1),
            ..area
        };
        render_filter_row(
            filter_area,
            buf,
            &list_state.filter,
            list_state.mode.is_text_input(),
            list_state.sort.label(),
        );

        if let Some(branch) = &list_state.creating {
            let msg = Paragraph::new(Span::styled(
                format!("Creating worktree for {}...", branch),
                Style::default().fg(Color::Yellow),
            ));
            msg.render(list_area, buf);
            return;
        }
        if let Some(error) = &list_state.error {
            Paragraph::new(Span::styled(error.as_str(), Style::default().fg(Color::Red)))
                .render(list_area, buf);
            return;
        }
        if list_state.display.is_empty() {
            let text = if list_state.loading {
                "Loading worktrees..."
            } else if list_state.filter.is_empty() {
                "No worktrees"
            } else {
                "No match. Enter creates a worktree for this branch."
            };
            Paragraph::new(Span::styled(text, Style::default().fg(Color::DarkGray)))
                .render(list_area, buf);
            return;
        }

        let now = Utc::now();
        let items: Vec<ListItem> = self
            .app
            .displayed_worktrees()
            .map(|wt| worktree_item(wt, now))
            .collect();
        let list = List::new(items)
            .highlight_style(
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");
        // Highlight only while the list, not the filter, has focus
        let selected = (!list_state.mode.is_text_input()).then_some(list_state.selected);
        let mut state = ListState::default().with_selected(selected);
        StatefulWidget::render(list, list_area, buf, &mut state);
    }
}

fn worktree_item(wt: &Worktree, now: chrono::DateTime<Utc>) -> ListItem<'static> {
    let (marker, marker_style) = if wt.is_dirty {
        ("*", Style::default().fg(Color::Red))
    } else {
        (" ", Style::default())
    };
    let branch_style = if wt.is_main {
        Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Cyan)
    };

    let mut spans = vec![
        Span::styled(marker, marker_style),
        Span::styled(format!("{:<32}", truncate(wt.display_branch(), 32)), branch_style),
        Span::styled(
            format!(" {:>8} ", relative_time(&wt.commit_date, now)),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw(truncate(&wt.commit_subject, 50)),
    ];
    if wt.session_count > 0 {
        spans.push(Span::styled(
            format!("  [{} sessions]", wt.session_count),
            Style::default().fg(Color::Green),
        ));
    }
    ListItem::new(Line::from(spans))
}

/// Render the filter input row above the list
fn render_filter_row(area: Rect, buf: &mut Buffer, query: &str, active: bool, sort: &str) {
    let prefix_style = if active {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let mut spans = vec![Span::styled("/ ", prefix_style), Span::raw(query.to_string())];
    if active {
        // Block cursor at end of text
        spans.push(Span::styled(" ", Style::default().bg(Color::White)));
    }
    Paragraph::new(Line::from(spans)).render(area, buf);

    let sort_label = format!("sort: {} ", sort);
    let width = sort_label.len() as u16;
    if area.width > width {
        let sort_area = Rect {
            x: area.right() - width,
            width,
            ..area
        };
        Paragraph::new(Span::styled(sort_label, Style::default().fg(Color::DarkGray)))
            .render(sort_area, buf);
    }
}
