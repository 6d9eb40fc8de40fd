use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::Theme;

const APP_NAME: &str = "lazyaliyun";

/// Top row: app name, session and where the user is.
pub struct Header<'a> {
    pub profile: &'a str,
    pub region: &'a str,
    pub breadcrumbs: &'a [String],
}

impl Header<'_> {
    pub fn line(&self, theme: &Theme) -> Line<'static> {
        let separator = Span::styled(" | ", Style::default().fg(theme.overlay0()));
        let mut spans = vec![
            Span::styled(
                format!(" {APP_NAME} "),
                Style::default().fg(theme.mauve).add_modifier(Modifier::BOLD),
            ),
            separator.clone(),
            Span::styled(format!("Profile: {}", self.profile), Style::default().fg(theme.sky)),
            separator.clone(),
            Span::styled(format!("Region: {}", self.region), Style::default().fg(theme.green)),
        ];

        if !self.breadcrumbs.is_empty() {
            spans.push(separator);
            spans.push(Span::styled(
                self.breadcrumbs.join(" > "),
                Style::default().fg(theme.text()),
            ));
        }
        Line::from(spans)
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let paragraph = Paragraph::new(self.line(theme)).style(Style::default().bg(theme.mantle()));
        frame.render_widget(paragraph, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_text() {
        let crumbs = vec!["ECS Instances".to_string(), "i-1".to_string()];
        let header = Header {
            profile: "prod",
            region: "cn-hangzhou",
            breadcrumbs: &crumbs,
        };
        let line = header.line(&Theme::default());
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, " lazyaliyun  | Profile: prod | Region: cn-hangzhou | ECS Instances > i-1");
    }
}
