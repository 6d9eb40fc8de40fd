use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::Theme;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keybinding {
    pub key: String,
    pub description: String,
}

impl Keybinding {
    pub fn new(key: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            description: description.into(),
        }
    }
}

/// Hints as `key description` pairs separated by a dim bar.
pub fn hints_line(hints: &[Keybinding], theme: &Theme) -> Line<'static> {
    let mut spans = Vec::with_capacity(hints.len() * 3);
    for (i, hint) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" │ ", Style::default().fg(theme.surface2)));
        }
        spans.push(Span::styled(hint.key.clone(), Style::default().fg(theme.peach)));
        spans.push(Span::styled(
            format!(" {}", hint.description),
            Style::default().fg(theme.subtext0()),
        ));
    }
    Line::from(spans)
}

/// Bottom row. The left part belongs to the caller (spinner or search
/// prompt); key hints fill the rest.
pub fn split(area: Rect, left_width: u16) -> (Rect, Rect) {
    let [left, right] =
        Layout::horizontal([Constraint::Length(left_width), Constraint::Min(0)]).areas(area);
    (left, right)
}

pub fn render_hints(frame: &mut Frame, area: Rect, hints: &[Keybinding], theme: &Theme) {
    let paragraph = Paragraph::new(hints_line(hints, theme))
        .style(Style::default().bg(theme.mantle()))
        .right_aligned();
    frame.render_widget(paragraph, area);
}
