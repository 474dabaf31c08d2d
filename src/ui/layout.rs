use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Split the screen into header, body and status bar
pub fn create_layout(area: Rect) -> (Rect, Rect, Rect) {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    (vertical[0], vertical[1], vertical[2])
}

/// Body area with a one-cell margin on the sides
pub fn inset(area: Rect) -> Rect {
    Rect {
        x: area.x.saturating_add(1),
        width: area.width.saturating_sub(2),
        ..area
    }
}
