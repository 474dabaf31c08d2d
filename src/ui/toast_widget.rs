use crate::ui::toast::{Toast, ToastType};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Toasts stacked upward from the bottom-right corner, newest lowest.
pub struct ToastWidget<'a> {
    toasts: &'a [&'a Toast],
}

impl<'a> ToastWidget<'a> {
    pub fn new(toasts: &'a [&'a Toast]) -> Self {
        Self { toasts }
    }

    pub fn render(self, frame: &mut Frame, area: Rect) {
        let width = 48u16.min(area.width.saturating_sub(2));
        let mut bottom = area.bottom().saturating_sub(1);

        for toast in self.toasts.iter().rev() {
            // Borders plus wrapped message lines
            let inner = width.saturating_sub(4).max(1) as usize;
            let lines = (toast.message.chars().count() + 2).div_ceil(inner).clamp(1, 4);
            let height = lines as u16 + 2;
            if bottom < area.top() + height {
                break;
            }
            let toast_area = Rect::new(
                area.right().saturating_sub(width + 1),
                bottom - height,
                width,
                height,
            );
            bottom -= height;

            frame.render_widget(Clear, toast_area);

            let color = color(toast.toast_type);
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .style(Style::default().bg(Color::Black));
            let text = Paragraph::new(Line::from(vec![
                Span::styled(
                    icon(toast.toast_type),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::raw(" "),
                Span::raw(toast.message.as_str()),
            ]))
            .block(block)
            .wrap(Wrap { trim: true })
            .alignment(Alignment::Left);

            frame.render_widget(text, toast_area);
        }
    }
}

fn icon(toast_type: ToastType) -> &'static str {
    match toast_type {
        ToastType::Info => "ℹ",
        ToastType::Success => "✓",
        ToastType::Warning => "⚠",
        ToastType::Error => "✗",
    }
}

fn color(toast_type: ToastType) -> Color {
    match toast_type {
        ToastType::Info => Color::Cyan,
        ToastType::Success => Color::Green,
        ToastType::Warning => Color::Yellow,
        ToastType::Error => Color::Red,
    }
}
