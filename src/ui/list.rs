use std::sync::Arc;
use std::time::Instant;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, Cell, Paragraph, Row, Scrollbar, ScrollbarOrientation, ScrollbarState,
    Table as RatatuiTable, TableState,
};

use crate::Theme;
use crate::config::{DetailAction, KeyResolver, NavAction};
use crate::model::Payload;
use crate::search::contains_ignore_case;
use crate::ui::highlight::search_line;
use crate::ui::yank::YankGesture;
use crate::ui::{Component, EventResult, Result};

const COLUMN_PADDING: usize = 2;
const MAX_COLUMN_WIDTH: usize = 50;
const MIN_COLUMN_WIDTH: u16 = 5;

/// Rows, cursor, scroll window and search state of a table.
///
/// Every transition keeps `cursor < len` for non-empty rows and keeps the
/// cursor inside `[offset, offset + height)`.
#[derive(Debug, Clone)]
pub struct ListState {
    rows: Vec<Vec<String>>,
    payloads: Vec<Payload>,
    cursor: usize,
    offset: usize,
    height: usize,
    query: String,
    matches: Vec<usize>,
    current_match: Option<usize>,
}

impl Default for ListState {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            payloads: Vec::new(),
            cursor: 0,
            offset: 0,
            height: 1,
            query: String::new(),
            matches: Vec::new(),
            current_match: None,
        }
    }
}

impl ListState {
    /// Replace the rows; cursor, scroll and search start over.
    pub fn set_rows(&mut self, rows: Vec<Vec<String>>, payloads: Vec<Payload>) {
        self.rows = rows;
        self.payloads = payloads;
        self.cursor = 0;
        self.offset = 0;
        self.clear_search();
    }

    pub const fn len(&self) -> usize {
        self.rows.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    pub const fn offset(&self) -> usize {
        self.offset
    }

    pub const fn height(&self) -> usize {
        self.height
    }

    /// Number of rows that fit in the window. Never zero.
    pub fn set_height(&mut self, height: usize) {
        self.height = height.max(1);
        self.scroll_to_cursor();
    }

    fn scroll_to_cursor(&mut self) {
        if self.cursor < self.offset {
            self.offset = self.cursor;
        } else if self.cursor >= self.offset + self.height {
            self.offset = self.cursor + 1 - self.height;
        }
        let max_offset = self.rows.len().saturating_sub(self.height);
        self.offset = self.offset.min(max_offset);
    }

    pub fn select(&mut self, index: usize) {
        if self.rows.is_empty() {
            return;
        }
        self.cursor = index.min(self.rows.len() - 1);
        self.scroll_to_cursor();
    }

    pub fn move_by(&mut self, delta: isize) {
        let target = self.cursor.saturating_add_signed(delta);
        self.select(target);
    }

    pub fn page_down(&mut self) {
        self.move_by(isize::try_from(self.height).unwrap_or(isize::MAX));
    }

    pub fn page_up(&mut self) {
        self.move_by(-isize::try_from(self.height).unwrap_or(isize::MAX));
    }

    pub fn first(&mut self) {
        self.select(0);
    }

    pub fn last(&mut self) {
        self.select(self.rows.len().saturating_sub(1));
    }

    /// Rows in the scroll window, with their absolute index.
    pub fn visible_rows(&self) -> impl Iterator<Item = (usize, &Vec<String>)> {
        self.rows
            .iter()
            .enumerate()
            .skip(self.offset)
            .take(self.height)
    }

    pub fn selected_row(&self) -> Option<&[String]> {
        self.rows.get(self.cursor).map(Vec::as_slice)
    }

    pub fn payload(&self, index: usize) -> Option<&Payload> {
        self.payloads.get(index)
    }

    pub fn selected_payload(&self) -> Option<&Payload> {
        self.payload(self.cursor)
    }

    /// Case-insensitive search across every cell. Jumps to the first
    /// matching row; leaves the cursor alone when nothing matches.
    pub fn search(&mut self, query: &str) -> bool {
        self.query = query.to_string();
        self.matches = if query.is_empty() {
            Vec::new()
        } else {
            self.rows
                .iter()
                .enumerate()
                .filter(|(_, row)| row.iter().any(|cell| contains_ignore_case(cell, query)))
                .map(|(i, _)| i)
                .collect()
        };

        if let Some(&first) = self.matches.first() {
            self.current_match = Some(0);
            self.select(first);
            true
        } else {
            self.current_match = None;
            false
        }
    }

    pub fn clear_search(&mut self) {
        self.query.clear();
        self.matches.clear();
        self.current_match = None;
    }

    pub fn next_match(&mut self) {
        self.step_match(true);
    }

    pub fn prev_match(&mut self) {
        self.step_match(false);
    }

    fn step_match(&mut self, forward: bool) {
        let Some(current) = self.current_match else {
            return;
        };
        let count = self.matches.len();
        let next = if forward {
            (current + 1) % count
        } else {
            (current + count - 1) % count
        };
        self.current_match = Some(next);
        self.select(self.matches[next]);
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub const fn match_count(&self) -> usize {
        self.matches.len()
    }

    /// Zero-based position within the matches.
    pub const fn current_match(&self) -> Option<usize> {
        self.current_match
    }

    /// A search was made and found nothing.
    pub const fn no_match(&self) -> bool {
        !self.query.is_empty() && self.matches.is_empty()
    }

    /// Text copied by a yank: the row's record as JSON, or its cells.
    pub fn yank_text(&self) -> Option<String> {
        self.selected_payload()
            .map(Payload::to_pretty_json)
            .or_else(|| self.selected_row().map(|cells| cells.join(" | ")))
    }

    /// Short search summary for titles, e.g. `[2/5]`.
    pub fn search_summary(&self) -> Option<String> {
        if self.query.is_empty() {
            return None;
        }
        Some(match self.current_match {
            Some(i) => format!("[{}/{}] /{}", i + 1, self.matches.len(), self.query),
            None => format!("[no match] /{}", self.query),
        })
    }
}

fn text_width(text: &str) -> usize {
    Span::raw(text).width()
}

/// Column widths sized to content: at least the header, padded, capped,
/// then scaled down to fit `available` without going below a minimum.
pub fn column_widths(headers: &[String], rows: &[Vec<String>], available: u16) -> Vec<u16> {
    let natural: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            let widest = rows
                .iter()
                .filter_map(|row| row.get(i))
                .map(|cell| text_width(cell))
                .max()
                .unwrap_or(0)
                .max(text_width(header));
            (widest + COLUMN_PADDING).min(MAX_COLUMN_WIDTH)
        })
        .collect();

    let total: usize = natural.iter().sum();
    let available = usize::from(available);
    natural
        .into_iter()
        .map(|width| {
            let width = if total > available && total > 0 {
                width * available / total
            } else {
                width
            };
            u16::try_from(width).unwrap_or(u16::MAX).max(MIN_COLUMN_WIDTH)
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum YankMode {
    /// Copy the row's record as JSON.
    #[default]
    Payload,
    /// Copy the row's cells joined by ` | `.
    Cells,
}

pub enum TableEvent {
    Activated,
    Yanked(String),
}

/// Scrollable, searchable table.
pub struct Table {
    title: String,
    headers: Vec<String>,
    state: ListState,
    yank: YankGesture,
    yank_mode: YankMode,
    resolver: Arc<KeyResolver>,
}

impl Table {
    pub fn new(title: impl Into<String>, headers: &[&str], resolver: Arc<KeyResolver>) -> Self {
        Self {
            title: title.into(),
            headers: headers.iter().map(|h| (*h).to_string()).collect(),
            state: ListState::default(),
            yank: YankGesture::default(),
            yank_mode: YankMode::default(),
            resolver,
        }
    }

    #[must_use]
    pub const fn with_yank_mode(mut self, mode: YankMode) -> Self {
        self.yank_mode = mode;
        self
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_rows(&mut self, rows: Vec<Vec<String>>, payloads: Vec<Payload>) {
        self.state.set_rows(rows, payloads);
        self.yank.reset();
    }

    pub const fn state(&self) -> &ListState {
        &self.state
    }

    pub const fn state_mut(&mut self) -> &mut ListState {
        &mut self.state
    }

    fn yank_text(&self) -> Option<String> {
        match self.yank_mode {
            YankMode::Payload => self.state.yank_text(),
            YankMode::Cells => self.state.selected_row().map(|cells| cells.join(" | ")),
        }
    }

    /// Handle a yank press at `now`.
    pub fn press_yank(&mut self, now: Instant) -> EventResult<TableEvent> {
        if self.yank.press(now)
            && let Some(text) = self.yank_text()
        {
            return TableEvent::Yanked(text).into();
        }
        EventResult::Consumed
    }

    fn title_line(&self, theme: &Theme) -> Line<'static> {
        let mut spans = vec![Span::styled(
            format!(" {} ({}) ", self.title, self.state.len()),
            Style::default().fg(theme.mauve).add_modifier(Modifier::BOLD),
        )];
        if let Some(summary) = self.state.search_summary() {
            let color = if self.state.no_match() { theme.error() } else { theme.warning() };
            spans.push(Span::styled(format!("{summary} "), Style::default().fg(color)));
        }
        Line::from(spans)
    }
}

impl Component for Table {
    type Output = TableEvent;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        let r = &self.resolver;
        if r.matches_detail(&key, DetailAction::Yank) {
            return Ok(self.press_yank(Instant::now()));
        }

        if r.matches_nav(&key, NavAction::Down) {
            self.state.move_by(1);
        } else if r.matches_nav(&key, NavAction::Up) {
            self.state.move_by(-1);
        } else if r.matches_nav(&key, NavAction::PageDown) {
            self.state.page_down();
        } else if r.matches_nav(&key, NavAction::PageUp) {
            self.state.page_up();
        } else if r.matches_nav(&key, NavAction::Home) {
            self.state.first();
        } else if r.matches_nav(&key, NavAction::End) {
            self.state.last();
        } else if r.matches_nav(&key, NavAction::Select) {
            if self.state.is_empty() {
                return Ok(EventResult::Consumed);
            }
            return Ok(TableEvent::Activated.into());
        } else {
            return Ok(EventResult::Ignored);
        }
        Ok(EventResult::Consumed)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(theme.border_focused()))
            .title(self.title_line(theme));

        let inner = block.inner(area);
        // One row goes to the header.
        self.state.set_height(usize::from(inner.height.saturating_sub(1)));

        if self.state.is_empty() {
            let empty = Paragraph::new(Line::styled(
                "No resources found",
                Style::default().fg(theme.overlay0()),
            ))
            .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let widths = column_widths(&self.headers, self.state.rows(), inner.width);
        let header = Row::new(self.headers.iter().map(|h| Cell::from(h.clone())))
            .style(Style::default().fg(theme.header()).add_modifier(Modifier::BOLD));

        let query = self.state.query();
        let text_style = Style::default().fg(theme.text());
        let rows: Vec<Row> = self
            .state
            .visible_rows()
            .map(|(_, cells)| {
                Row::new(
                    cells
                        .iter()
                        .map(|cell| Cell::from(search_line(cell, query, text_style, theme))),
                )
            })
            .collect();

        let table = RatatuiTable::new(rows, widths.into_iter().map(Constraint::Length))
            .header(header)
            .block(block)
            .row_highlight_style(
                Style::default()
                    .bg(theme.selection_bg())
                    .add_modifier(Modifier::BOLD),
            );

        let mut table_state =
            TableState::default().with_selected(Some(self.state.cursor() - self.state.offset()));
        frame.render_stateful_widget(table, area, &mut table_state);

        if self.state.len() > self.state.height() {
            let mut scrollbar = ScrollbarState::new(self.state.len()).position(self.state.cursor());
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

    fn rows(names: &[&str]) -> Vec<Vec<String>> {
        names.iter().map(|n| vec![(*n).to_string(), "Running".to_string()]).collect()
    }

    fn state(n: usize, height: usize) -> ListState {
        let names: Vec<String> = (0..n).map(|i| format!("row-{i}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let mut state = ListState::default();
        state.set_rows(rows(&refs), Vec::new());
        state.set_height(height);
        state
    }

    fn assert_invariants(state: &ListState) {
        assert!(state.cursor() < state.len());
        assert!(state.cursor() >= state.offset());
        assert!(state.cursor() < state.offset() + state.height());
    }

    #[test]
    fn test_cursor_stays_in_bounds_and_visible() {
        let mut state = state(20, 5);
        let moves: [isize; 9] = [1, 7, -3, 100, -1, -100, 4, 0, 19];
        for delta in moves {
            state.move_by(delta);
            assert_invariants(&state);
        }
        state.page_down();
        state.page_down();
        assert_invariants(&state);
        state.last();
        assert_eq!(state.cursor(), 19);
        assert_eq!(state.offset(), 15);
        state.first();
        assert_eq!(state.offset(), 0);
    }

    #[test]
    fn test_minimal_scroll() {
        let mut state = state(10, 3);
        state.move_by(3);
        assert_eq!(state.offset(), 1);
        state.move_by(-1);
        assert_eq!(state.offset(), 1);
        state.move_by(-2);
        assert_eq!(state.offset(), 0);
    }

    #[test]
    fn test_shrinking_height_keeps_cursor_visible() {
        let mut state = state(10, 8);
        state.select(7);
        state.set_height(2);
        assert_invariants(&state);
    }

    #[test]
    fn test_search_jumps_and_cycles() {
        let mut state = ListState::default();
        state.set_rows(rows(&["alpha", "beta", "web-1", "gamma", "delta", "WEB-2"]), Vec::new());
        state.set_height(10);

        assert!(state.search("web"));
        assert_eq!(state.match_count(), 2);
        assert_eq!(state.cursor(), 2);
        state.next_match();
        assert_eq!(state.cursor(), 5);
        state.next_match();
        assert_eq!(state.cursor(), 2);
        state.prev_match();
        assert_eq!(state.cursor(), 5);
        assert_eq!(state.search_summary().as_deref(), Some("[2/2] /web"));
    }

    #[test]
    fn test_failed_search_leaves_cursor() {
        let mut state = state(5, 5);
        state.select(3);
        assert!(!state.search("nothing"));
        assert_eq!(state.cursor(), 3);
        assert!(state.no_match());
        state.next_match();
        assert_eq!(state.cursor(), 3);
    }

    #[test]
    fn test_set_rows_resets_search_and_cursor() {
        let mut state = state(5, 5);
        state.search("row-3");
        state.set_rows(rows(&["x"]), Vec::new());
        assert_eq!(state.cursor(), 0);
        assert_eq!(state.query(), "");
        assert!(!state.no_match());
    }

    #[test]
    fn test_empty_rows_are_safe() {
        let mut state = ListState::default();
        state.move_by(3);
        state.last();
        state.next_match();
        assert!(state.selected_row().is_none());
        assert!(state.yank_text().is_none());
    }

    #[test]
    fn test_yank_prefers_payload() {
        let mut state = ListState::default();
        state.set_rows(
            rows(&["a"]),
            vec![Payload::Raw(json!({"InstanceId": "i-1"}))],
        );
        assert!(state.yank_text().unwrap().contains("\"InstanceId\": \"i-1\""));

        state.set_rows(rows(&["b"]), Vec::new());
        assert_eq!(state.yank_text().as_deref(), Some("b | Running"));
    }

    #[test]
    fn test_column_widths() {
        let headers = vec!["ID".to_string(), "Name".to_string()];
        let rows = vec![vec!["i-1".to_string(), "x".repeat(80)]];
        assert_eq!(column_widths(&headers, &rows, 200), vec![5, 50]);

        let scaled = column_widths(&headers, &rows, 30);
        assert_eq!(scaled, vec![5, 27]);

        let empty_rows: Vec<Vec<String>> = Vec::new();
        assert_eq!(column_widths(&headers, &empty_rows, 100), vec![5, 6]);
    }

    #[test]
    fn test_double_yank_emits_once() {
        let mut table = Table::new("Instances", &["Name", "Status"], Arc::new(KeyResolver::default()))
            .with_yank_mode(YankMode::Cells);
        table.set_rows(rows(&["web"]), Vec::new());
        let now = Instant::now();

        assert!(matches!(table.press_yank(now), EventResult::Consumed));
        match table.press_yank(now + std::time::Duration::from_millis(100)) {
            EventResult::Event(TableEvent::Yanked(text)) => assert_eq!(text, "web | Running"),
            _ => panic!("expected a yank"),
        }
    }
}
