use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui::widgets::Paragraph;

use crate::Theme;
use crate::config::{KeyResolver, SearchAction};
use crate::ui::text_input::TextInput;
use crate::ui::{Component, EventResult, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
    Submitted(String),
    Cancelled,
}

/// Inline `/` prompt shown in the status row.
pub struct SearchPrompt {
    active: bool,
    input: TextInput,
    resolver: Arc<KeyResolver>,
}

impl SearchPrompt {
    pub fn new(resolver: Arc<KeyResolver>) -> Self {
        Self {
            active: false,
            input: TextInput::new(),
            resolver,
        }
    }

    pub fn open(&mut self) {
        self.input.clear();
        self.active = true;
    }

    pub const fn is_active(&self) -> bool {
        self.active
    }
}

impl Component for SearchPrompt {
    type Output = SearchEvent;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        if !self.active {
            return Ok(EventResult::Ignored);
        }
        if self.resolver.matches_search(&key, SearchAction::Submit) {
            self.active = false;
            return Ok(SearchEvent::Submitted(self.input.value().to_string()).into());
        }
        if self.resolver.matches_search(&key, SearchAction::Exit) {
            self.active = false;
            return Ok(SearchEvent::Cancelled.into());
        }
        self.input.edit(key);
        Ok(EventResult::Consumed)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let mut line = self.input.line(theme);
        line.spans
            .insert(0, Span::styled("/", Style::default().fg(theme.warning())));
        frame.render_widget(Paragraph::new(line), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_inactive_prompt_ignores_keys() {
        let mut prompt = SearchPrompt::new(Arc::new(KeyResolver::default()));
        assert_eq!(prompt.handle_key(key(KeyCode::Char('a'))).unwrap(), EventResult::Ignored);
    }

    #[test]
    fn test_typed_query_is_submitted() {
        let mut prompt = SearchPrompt::new(Arc::new(KeyResolver::default()));
        prompt.open();
        for c in "web".chars() {
            prompt.handle_key(key(KeyCode::Char(c))).unwrap();
        }
        assert_eq!(
            prompt.handle_key(key(KeyCode::Enter)).unwrap(),
            EventResult::Event(SearchEvent::Submitted("web".to_string()))
        );
        assert!(!prompt.is_active());
    }

    #[test]
    fn test_ctrl_c_cancels() {
        let mut prompt = SearchPrompt::new(Arc::new(KeyResolver::default()));
        prompt.open();
        let result = prompt
            .handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL))
            .unwrap();
        assert_eq!(result, EventResult::Event(SearchEvent::Cancelled));
    }
}
