use std::sync::Arc;
use std::time::Instant;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState};

use crate::Theme;
use crate::config::{DetailAction, KeyResolver, NavAction};
use crate::model::Payload;
use crate::search::{count_matches, nth_match_offset};
use crate::ui::highlight::{Token, json_line, tokenize_json_line};
use crate::ui::yank::YankGesture;
use crate::ui::{Component, EventResult, Result};

/// Pretty printed content, its tokens, scroll position and search state.
#[derive(Debug, Clone)]
pub struct ViewportState {
    raw: String,
    lines: Vec<String>,
    tokens: Vec<Vec<Token>>,
    offset: usize,
    height: usize,
    query: String,
    match_count: usize,
    current_match: Option<usize>,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            raw: String::new(),
            lines: Vec::new(),
            tokens: Vec::new(),
            offset: 0,
            height: 1,
            query: String::new(),
            match_count: 0,
            current_match: None,
        }
    }
}

impl ViewportState {
    pub fn set_content(&mut self, payload: &Payload) {
        self.set_text(payload.to_pretty_json());
    }

    /// Replace the text; scroll and search start over.
    pub fn set_text(&mut self, raw: String) {
        self.lines = raw.lines().map(str::to_string).collect();
        self.tokens = self.lines.iter().map(|l| tokenize_json_line(l)).collect();
        self.raw = raw;
        self.offset = 0;
        self.clear_search();
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub const fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub const fn offset(&self) -> usize {
        self.offset
    }

    pub fn set_height(&mut self, height: usize) {
        self.height = height.max(1);
        self.offset = self.offset.min(self.max_offset());
    }

    fn max_offset(&self) -> usize {
        self.lines.len().saturating_sub(self.height)
    }

    pub fn scroll_by(&mut self, delta: isize) {
        self.offset = self.offset.saturating_add_signed(delta).min(self.max_offset());
    }

    pub fn page_down(&mut self) {
        self.scroll_by(isize::try_from(self.height).unwrap_or(isize::MAX));
    }

    pub fn page_up(&mut self) {
        self.scroll_by(-isize::try_from(self.height).unwrap_or(isize::MAX));
    }

    pub const fn top(&mut self) {
        self.offset = 0;
    }

    pub fn bottom(&mut self) {
        self.offset = self.max_offset();
    }

    fn reveal_line(&mut self, line: usize) {
        if line < self.offset || line >= self.offset + self.height {
            self.offset = line.min(self.max_offset());
        }
    }

    /// Scroll to the `n`th occurrence, located by scanning the raw text.
    fn reveal_match(&mut self, n: usize) {
        if let Some(byte) = nth_match_offset(&self.raw, &self.query, n) {
            let line = self.raw[..byte].matches('\n').count();
            self.reveal_line(line);
        }
    }

    /// Count occurrences of `query` and scroll to the first. Returns the count.
    pub fn search(&mut self, query: &str) -> usize {
        self.query = query.to_string();
        self.match_count = count_matches(&self.raw, query);
        if self.match_count > 0 {
            self.current_match = Some(0);
            self.reveal_match(0);
        } else {
            self.current_match = None;
        }
        self.match_count
    }

    pub fn clear_search(&mut self) {
        self.query.clear();
        self.match_count = 0;
        self.current_match = None;
    }

    pub fn next_match(&mut self) {
        if let Some(current) = self.current_match {
            let next = (current + 1) % self.match_count;
            self.current_match = Some(next);
            self.reveal_match(next);
        }
    }

    pub fn prev_match(&mut self) {
        if let Some(current) = self.current_match {
            let prev = (current + self.match_count - 1) % self.match_count;
            self.current_match = Some(prev);
            self.reveal_match(prev);
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub const fn match_count(&self) -> usize {
        self.match_count
    }

    pub const fn current_match(&self) -> Option<usize> {
        self.current_match
    }

    pub fn search_summary(&self) -> Option<String> {
        if self.query.is_empty() {
            return None;
        }
        Some(match self.current_match {
            Some(i) => format!("[{}/{}] /{}", i + 1, self.match_count, self.query),
            None => format!("[no match] /{}", self.query),
        })
    }

    fn visible_lines(&self, theme: &Theme) -> Vec<Line<'static>> {
        self.lines
            .iter()
            .zip(&self.tokens)
            .skip(self.offset)
            .take(self.height)
            .map(|(line, tokens)| json_line(line, tokens, &self.query, theme))
            .collect()
    }
}

pub enum ViewportEvent {
    Yanked(String),
    Edit(String),
    Page(String),
}

/// Scrollable JSON pane.
pub struct Viewport {
    title: String,
    state: ViewportState,
    yank: YankGesture,
    resolver: Arc<KeyResolver>,
}

impl Viewport {
    pub fn new(title: impl Into<String>, payload: &Payload, resolver: Arc<KeyResolver>) -> Self {
        let mut state = ViewportState::default();
        state.set_content(payload);
        Self {
            title: title.into(),
            state,
            yank: YankGesture::default(),
            resolver,
        }
    }

    pub const fn state(&self) -> &ViewportState {
        &self.state
    }

    pub const fn state_mut(&mut self) -> &mut ViewportState {
        &mut self.state
    }

    pub fn press_yank(&mut self, now: Instant) -> EventResult<ViewportEvent> {
        if self.yank.press(now) {
            ViewportEvent::Yanked(self.state.raw().to_string()).into()
        } else {
            EventResult::Consumed
        }
    }
}

impl Component for Viewport {
    type Output = ViewportEvent;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        let r = &self.resolver;
        if r.matches_detail(&key, DetailAction::Yank) {
            return Ok(self.press_yank(Instant::now()));
        }
        if r.matches_detail(&key, DetailAction::Edit) {
            return Ok(ViewportEvent::Edit(self.state.raw().to_string()).into());
        }
        if r.matches_detail(&key, DetailAction::Pager) {
            return Ok(ViewportEvent::Page(self.state.raw().to_string()).into());
        }

        if r.matches_nav(&key, NavAction::Down) {
            self.state.scroll_by(1);
        } else if r.matches_nav(&key, NavAction::Up) {
            self.state.scroll_by(-1);
        } else if r.matches_nav(&key, NavAction::PageDown) {
            self.state.page_down();
        } else if r.matches_nav(&key, NavAction::PageUp) {
            self.state.page_up();
        } else if r.matches_nav(&key, NavAction::Home) {
            self.state.top();
        } else if r.matches_nav(&key, NavAction::End) {
            self.state.bottom();
        } else {
            return Ok(EventResult::Ignored);
        }
        Ok(EventResult::Consumed)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let mut title = vec![Span::styled(
            format!(" {} ", self.title),
            Style::default().fg(theme.mauve).add_modifier(Modifier::BOLD),
        )];
        if let Some(summary) = self.state.search_summary() {
            let color = if self.state.match_count() == 0 { theme.error() } else { theme.warning() };
            title.push(Span::styled(format!("{summary} "), Style::default().fg(color)));
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(theme.border_focused()))
            .title(Line::from(title));
        let inner = block.inner(area);
        self.state.set_height(usize::from(inner.height));

        let paragraph = Paragraph::new(self.state.visible_lines(theme)).block(block);
        frame.render_widget(paragraph, area);

        if self.state.line_count() > usize::from(inner.height) {
            let mut scrollbar =
                ScrollbarState::new(self.state.max_offset()).position(self.state.offset());
            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight),
                area,
                &mut scrollbar,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn state_with_lines(n: usize, height: usize) -> ViewportState {
        let text: Vec<String> = (0..n)
            .map(|i| if i % 10 == 5 { format!("line {i} needle") } else { format!("line {i}") })
            .collect();
        let mut state = ViewportState::default();
        state.set_text(text.join("\n"));
        state.set_height(height);
        state
    }

    #[test]
    fn test_content_is_pretty_json() {
        let mut state = ViewportState::default();
        state.set_content(&Payload::Raw(json!({"a": 1, "b": [true, null]})));
        assert!(state.line_count() > 1);
        assert!(state.raw().contains("  \"a\": 1"));
    }

    #[test]
    fn test_search_counts_and_scrolls_to_first() {
        let mut state = state_with_lines(40, 4);
        assert_eq!(state.search("NEEDLE"), 4);
        assert_eq!(state.current_match(), Some(0));
        assert!(state.offset() <= 5 && 5 < state.offset() + 4);
    }

    #[test]
    fn test_next_and_prev_wrap() {
        let mut state = state_with_lines(40, 4);
        state.search("needle");
        state.next_match();
        assert_eq!(state.current_match(), Some(1));
        assert!(state.offset() <= 15 && 15 < state.offset() + 4);
        state.prev_match();
        state.prev_match();
        assert_eq!(state.current_match(), Some(3));
        assert!(state.offset() <= 35 && 35 < state.offset() + 4);
    }

    #[test]
    fn test_no_match_keeps_position() {
        let mut state = state_with_lines(40, 4);
        state.scroll_by(7);
        assert_eq!(state.search("absent"), 0);
        assert_eq!(state.current_match(), None);
        assert_eq!(state.offset(), 7);
        state.next_match();
        assert_eq!(state.offset(), 7);
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut state = state_with_lines(10, 4);
        state.scroll_by(100);
        assert_eq!(state.offset(), 6);
        state.scroll_by(-100);
        assert_eq!(state.offset(), 0);
        state.bottom();
        state.set_height(20);
        assert_eq!(state.offset(), 0);
    }

    #[test]
    fn test_yank_copies_full_content() {
        let payload = Payload::Raw(json!({"k": "v"}));
        let mut viewport = Viewport::new("Detail", &payload, Arc::new(KeyResolver::default()));
        let now = Instant::now();
        assert!(matches!(viewport.press_yank(now), EventResult::Consumed));
        match viewport.press_yank(now + std::time::Duration::from_millis(50)) {
            EventResult::Event(ViewportEvent::Yanked(text)) => assert_eq!(text, payload.to_pretty_json()),
            _ => panic!("expected a yank"),
        }
    }
}
