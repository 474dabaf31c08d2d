//! Terminal UI: the worktree list, the other views, the status bar and toasts.

pub mod format;
pub mod layout;
pub mod list;
pub mod status_bar;
pub mod toast;
pub mod toast_widget;
pub mod views;

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, View};

pub use list::WorktreeList;
pub use toast::{Toast, ToastManager, ToastType};
pub use toast_widget::ToastWidget;

/// Draw the whole screen for the current state
pub fn draw(f: &mut Frame, app: &App) {
    let (header_area, body_area, status_area) = layout::create_layout(f.area());
    draw_header(f, header_area, app);

    let body = layout::inset(body_area);
    match &app.view {
        View::List => f.render_widget(WorktreeList::new(app), body),
        View::Detail(state) => views::detail::render(f, body, state),
        View::Create(state) => views::create::render(f, body, state),
        View::Delete(state) => views::delete::render(f, body, state),
        View::Cleanup(state) => views::cleanup::render(f, body, state),
        View::Fetch(state) => views::fetch::render(f, body, state),
        View::Projects(state) => views::projects::render(f, body, state),
    }

    status_bar::draw_status_bar(f, status_area, app);

    let toasts = app.toast_manager.visible_toasts();
    ToastWidget::new(&toasts).render(f, body_area);
}

fn draw_header(f: &mut Frame, area: ratatui::layout::Rect, app: &App) {
    let repo = app
        .root
        .as_deref()
        .and_then(|root| root.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut spans = vec![Span::styled(
        " worktui ",
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];
    if !repo.is_empty() {
        spans.push(Span::styled(
            format!(" {} ", repo),
            Style::default().add_modifier(Modifier::BOLD),
        ));
    }
    spans.push(Span::styled(
        format!(" {}", app.view.title()),
        Style::default().fg(Color::DarkGray),
    ));
    if app.list.loading && matches!(app.view, View::List) {
        spans.push(Span::styled(" (refreshing)", Style::default().fg(Color::Yellow)));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
