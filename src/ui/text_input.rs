use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::Theme;
use crate::ui::{Component, EventResult, Result};

pub enum TextInputEvent {
    Submitted(String),
    Cancelled,
}

/// Single line editor. The cursor is a byte index that always sits on a
/// character boundary.
#[derive(Debug, Clone, Default)]
pub struct TextInput {
    value: String,
    cursor: usize,
    placeholder: Option<String>,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Replace the text and put the cursor at the end.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = self.value.len();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    fn prev_boundary(&self, from: usize) -> usize {
        self.value[..from]
            .char_indices()
            .next_back()
            .map_or(0, |(i, _)| i)
    }

    fn next_boundary(&self, from: usize) -> usize {
        self.value[from..]
            .chars()
            .next()
            .map_or(from, |c| from + c.len_utf8())
    }

    fn insert_char(&mut self, c: char) {
        self.value.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    fn delete_char_before_cursor(&mut self) {
        if self.cursor > 0 {
            let start = self.prev_boundary(self.cursor);
            self.value.drain(start..self.cursor);
            self.cursor = start;
        }
    }

    fn delete_char_at_cursor(&mut self) {
        if self.cursor < self.value.len() {
            let end = self.next_boundary(self.cursor);
            self.value.drain(self.cursor..end);
        }
    }

    fn delete_word_before_cursor(&mut self) {
        let before = &self.value[..self.cursor];
        let trimmed = before.trim_end_matches(' ');
        let start = trimmed.rfind(' ').map_or(0, |i| i + 1);
        self.value.drain(start..self.cursor);
        self.cursor = start;
    }

    /// Apply an editing key. Returns `false` when the key is not an edit.
    pub fn edit(&mut self, key: KeyEvent) -> bool {
        match (key.code, key.modifiers) {
            (KeyCode::Backspace, KeyModifiers::ALT) | (KeyCode::Char('w'), KeyModifiers::CONTROL) => {
                self.delete_word_before_cursor();
            }
            (KeyCode::Backspace, _) => self.delete_char_before_cursor(),
            (KeyCode::Delete, _) => self.delete_char_at_cursor(),
            (KeyCode::Left, _) => self.cursor = self.prev_boundary(self.cursor),
            (KeyCode::Right, _) => self.cursor = self.next_boundary(self.cursor),
            (KeyCode::Home, _) | (KeyCode::Char('a'), KeyModifiers::CONTROL) => self.cursor = 0,
            (KeyCode::End, _) | (KeyCode::Char('e'), KeyModifiers::CONTROL) => {
                self.cursor = self.value.len();
            }
            (KeyCode::Char('u'), KeyModifiers::CONTROL) => self.clear(),
            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => self.insert_char(c),
            _ => return false,
        }
        true
    }

    /// The text with a block cursor, or the placeholder when empty.
    pub fn line(&self, theme: &Theme) -> Line<'static> {
        let input_style = Style::default().fg(theme.text());
        let cursor_style = Style::default()
            .fg(theme.base())
            .bg(theme.text())
            .add_modifier(Modifier::BOLD);

        if self.value.is_empty()
            && let Some(placeholder) = &self.placeholder
        {
            return Line::from(vec![
                Span::styled(" ", cursor_style),
                Span::styled(placeholder.clone(), Style::default().fg(theme.overlay0())),
            ]);
        }

        let (before, after) = self.value.split_at(self.cursor);
        let mut rest = after.chars();
        let under_cursor = rest.next().unwrap_or(' ');
        Line::from(vec![
            Span::styled(before.to_string(), input_style),
            Span::styled(under_cursor.to_string(), cursor_style),
            Span::styled(rest.as_str().to_string(), input_style),
        ])
    }
}

impl Component for TextInput {
    type Output = TextInputEvent;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        Ok(match key.code {
            KeyCode::Enter => TextInputEvent::Submitted(self.value.clone()).into(),
            KeyCode::Esc => TextInputEvent::Cancelled.into(),
            _ => {
                self.edit(key);
                EventResult::Consumed
            }
        })
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        frame.render_widget(Paragraph::new(self.line(theme)), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(input: &mut TextInput, text: &str) {
        for c in text.chars() {
            input.edit(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_multibyte_editing() {
        let mut input = TextInput::new();
        type_str(&mut input, "héllo");
        input.edit(key(KeyCode::Left));
        input.edit(key(KeyCode::Left));
        input.edit(key(KeyCode::Left));
        input.edit(key(KeyCode::Backspace));
        assert_eq!(input.value(), "hllo");
        input.edit(key(KeyCode::Char('é')));
        assert_eq!(input.value(), "héllo");
        input.edit(key(KeyCode::Delete));
        assert_eq!(input.value(), "hélo");
    }

    #[test]
    fn test_delete_word() {
        let mut input = TextInput::new();
        type_str(&mut input, "find web server  ");
        input.edit(KeyEvent::new(KeyCode::Backspace, KeyModifiers::ALT));
        assert_eq!(input.value(), "find web ");
    }

    #[test]
    fn test_enter_submits_value() {
        let mut input = TextInput::new();
        type_str(&mut input, "10.0.0.1");
        match input.handle_key(key(KeyCode::Enter)).unwrap() {
            EventResult::Event(TextInputEvent::Submitted(v)) => assert_eq!(v, "10.0.0.1"),
            _ => panic!("expected submit"),
        }
    }

    #[test]
    fn test_set_value_moves_cursor_to_end() {
        let mut input = TextInput::new();
        input.set_value("abc");
        input.edit(key(KeyCode::Char('d')));
        assert_eq!(input.value(), "abcd");
    }
}
