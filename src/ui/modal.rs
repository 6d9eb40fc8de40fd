//! Overlay dialogs.
//!
//! One modal is shown at a time. Select and Input dialogs carry a `purpose`
//! chosen by the caller so their results can be routed without the dialog
//! knowing what it is for.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState as RatatuiListState, Paragraph, Wrap};

use crate::Theme;
use crate::config::{DialogAction, GlobalAction, KeyResolver, NavAction};
use crate::search::Matcher;
use crate::ui::text_input::TextInput;
use crate::ui::{EventResult, Result};

/// Longest history an input dialog keeps.
pub const INPUT_HISTORY_LIMIT: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalEvent<P> {
    Dismissed,
    Cancelled(P),
    Selected { purpose: P, value: String },
    Submitted { purpose: P, value: String },
}

/// Single choice list with a live filter.
pub struct SelectModal<P> {
    purpose: P,
    title: String,
    items: Vec<String>,
    current: Option<String>,
    filter: TextInput,
    filtering: bool,
    filtered: Vec<usize>,
    selected: usize,
    loading: bool,
    matcher: Matcher,
}

impl<P: Clone> SelectModal<P> {
    pub fn new(purpose: P, title: impl Into<String>, items: Vec<String>, current: Option<&str>) -> Self {
        let mut modal = Self::loading(purpose, title);
        modal.set_items(items, current);
        modal
    }

    /// A dialog waiting for its items.
    pub fn loading(purpose: P, title: impl Into<String>) -> Self {
        Self {
            purpose,
            title: title.into(),
            items: Vec::new(),
            current: None,
            filter: TextInput::new(),
            filtering: false,
            filtered: Vec::new(),
            selected: 0,
            loading: true,
            matcher: Matcher::new(),
        }
    }

    /// Fill the list and preselect `current` when present.
    pub fn set_items(&mut self, items: Vec<String>, current: Option<&str>) {
        self.items = items;
        self.current = current.map(str::to_string);
        self.loading = false;
        self.apply_filter();
        if let Some(current) = current
            && let Some(pos) = self.filtered.iter().position(|&i| self.items[i] == current)
        {
            self.selected = pos;
        }
    }

    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    pub const fn purpose(&self) -> &P {
        &self.purpose
    }

    #[cfg(test)]
    pub const fn is_filtering(&self) -> bool {
        self.filtering
    }

    fn apply_filter(&mut self) {
        let pattern = self.filter.value();
        self.filtered = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| pattern.is_empty() || self.matcher.matches(item, pattern))
            .map(|(i, _)| i)
            .collect();
        self.selected = self.selected.min(self.filtered.len().saturating_sub(1));
    }

    pub fn selected_value(&self) -> Option<&str> {
        self.filtered
            .get(self.selected)
            .map(|&i| self.items[i].as_str())
    }

    /// Items currently shown, in order.
    #[cfg(test)]
    pub fn visible_items(&self) -> Vec<&str> {
        self.filtered.iter().map(|&i| self.items[i].as_str()).collect()
    }

    fn handle_filter_key(&mut self, key: KeyEvent, resolver: &KeyResolver) -> EventResult<ModalEvent<P>> {
        if resolver.matches_dialog(&key, DialogAction::Cancel) {
            self.filter.clear();
            self.filtering = false;
            self.apply_filter();
        } else if resolver.matches_dialog(&key, DialogAction::Confirm) {
            self.filtering = false;
        } else if self.filter.edit(key) {
            self.selected = 0;
            self.apply_filter();
        }
        EventResult::Consumed
    }

    fn handle_key(&mut self, key: KeyEvent, resolver: &KeyResolver) -> EventResult<ModalEvent<P>> {
        if self.loading {
            if resolver.matches_global(&key, GlobalAction::Back) {
                return ModalEvent::Cancelled(self.purpose.clone()).into();
            }
            return EventResult::Consumed;
        }
        if self.filtering {
            return self.handle_filter_key(key, resolver);
        }

        if resolver.matches_dialog(&key, DialogAction::Confirm) {
            return self.selected_value().map_or(EventResult::Consumed, |value| {
                ModalEvent::Selected {
                    purpose: self.purpose.clone(),
                    value: value.to_string(),
                }
                .into()
            });
        }
        if resolver.matches_dialog(&key, DialogAction::Cancel) {
            return ModalEvent::Cancelled(self.purpose.clone()).into();
        }
        if resolver.matches_global(&key, GlobalAction::Search) {
            self.filtering = true;
        } else if resolver.matches_nav(&key, NavAction::Down) {
            self.selected = (self.selected + 1).min(self.filtered.len().saturating_sub(1));
        } else if resolver.matches_nav(&key, NavAction::Up) {
            self.selected = self.selected.saturating_sub(1);
        } else if resolver.matches_nav(&key, NavAction::Home) {
            self.selected = 0;
        } else if resolver.matches_nav(&key, NavAction::End) {
            self.selected = self.filtered.len().saturating_sub(1);
        }
        EventResult::Consumed
    }

    fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let block = dialog_block(&self.title, theme.border_focused(), theme);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [filter_area, list_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Min(1)]).areas(inner);

        if self.loading {
            frame.render_widget(
                Paragraph::new(Line::styled("Loading...", Style::default().fg(theme.overlay1()))),
                list_area,
            );
            return;
        }

        let filter_line = if self.filtering {
            let mut line = self.filter.line(theme);
            line.spans.insert(0, Span::styled("/", Style::default().fg(theme.warning())));
            line
        } else if self.filter.value().is_empty() {
            Line::styled("/ to filter", Style::default().fg(theme.overlay0()))
        } else {
            Line::styled(format!("/{}", self.filter.value()), Style::default().fg(theme.warning()))
        };
        frame.render_widget(Paragraph::new(filter_line), filter_area);

        let items: Vec<ListItem> = self
            .filtered
            .iter()
            .map(|&i| {
                let item = &self.items[i];
                let mut spans = vec![Span::styled(item.clone(), Style::default().fg(theme.text()))];
                if self.current.as_deref() == Some(item.as_str()) {
                    spans.push(Span::styled(" (current)", Style::default().fg(theme.success())));
                }
                ListItem::new(Line::from(spans))
            })
            .collect();

        let list = List::new(items)
            .highlight_style(
                Style::default()
                    .bg(theme.selection_bg())
                    .fg(theme.lavender)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");
        let mut state = RatatuiListState::default().with_selected(Some(self.selected));
        frame.render_stateful_widget(list, list_area, &mut state);
    }
}

/// Free text prompt with history recall.
pub struct InputModal<P> {
    purpose: P,
    title: String,
    input: TextInput,
    history: Vec<String>,
    history_index: Option<usize>,
    draft: String,
}

impl<P: Clone> InputModal<P> {
    /// `history` is ordered most recent first.
    pub fn new(purpose: P, title: impl Into<String>, history: Vec<String>) -> Self {
        Self {
            purpose,
            title: title.into(),
            input: TextInput::new(),
            history,
            history_index: None,
            draft: String::new(),
        }
    }

    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.input = self.input.with_placeholder(placeholder);
        self
    }

    #[cfg(test)]
    pub fn value(&self) -> &str {
        self.input.value()
    }

    /// Step to an older entry. The text being typed is kept aside on the
    /// first step.
    pub fn history_prev(&mut self) {
        if self.history.is_empty() {
            return;
        }
        let next = match self.history_index {
            None => {
                self.draft = self.input.value().to_string();
                0
            }
            Some(i) => (i + 1).min(self.history.len() - 1),
        };
        self.history_index = Some(next);
        self.input.set_value(self.history[next].clone());
    }

    /// Step to a newer entry, or back to the kept-aside text.
    pub fn history_next(&mut self) {
        match self.history_index {
            None => {}
            Some(0) => {
                self.history_index = None;
                self.input.set_value(std::mem::take(&mut self.draft));
            }
            Some(i) => {
                self.history_index = Some(i - 1);
                self.input.set_value(self.history[i - 1].clone());
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent, resolver: &KeyResolver) -> EventResult<ModalEvent<P>> {
        if resolver.matches_dialog(&key, DialogAction::Confirm) {
            let value = self.input.value().trim();
            if value.is_empty() {
                return EventResult::Consumed;
            }
            return ModalEvent::Submitted {
                purpose: self.purpose.clone(),
                value: value.to_string(),
            }
            .into();
        }
        if resolver.matches_dialog(&key, DialogAction::Cancel) {
            return ModalEvent::Cancelled(self.purpose.clone()).into();
        }
        if resolver.matches_dialog(&key, DialogAction::HistoryPrev) {
            self.history_prev();
        } else if resolver.matches_dialog(&key, DialogAction::HistoryNext) {
            self.history_next();
        } else if self.input.edit(key) {
            self.history_index = None;
        }
        EventResult::Consumed
    }

    fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let block = dialog_block(&self.title, theme.border_focused(), theme);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [input_area, _, hint_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(inner);
        frame.render_widget(Paragraph::new(self.input.line(theme)), input_area);
        frame.render_widget(
            Paragraph::new(Line::styled(
                "Enter submit  Esc cancel  Ctrl-P/Ctrl-N history",
                Style::default().fg(theme.overlay0()),
            )),
            hint_area,
        );
    }
}

pub enum ModalKind<P> {
    Info(String),
    Error(String),
    Success(String),
    Select(SelectModal<P>),
    Input(InputModal<P>),
}

/// The dialog slot. Visibility is tracked apart from the dialog itself.
pub struct ModalState<P> {
    visible: bool,
    kind: Option<ModalKind<P>>,
    resolver: Arc<KeyResolver>,
}

impl<P: Clone> ModalState<P> {
    pub const fn new(resolver: Arc<KeyResolver>) -> Self {
        Self {
            visible: false,
            kind: None,
            resolver,
        }
    }

    pub fn show(&mut self, kind: ModalKind<P>) {
        self.kind = Some(kind);
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
        self.kind = None;
    }

    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    pub const fn kind(&self) -> Option<&ModalKind<P>> {
        self.kind.as_ref()
    }

    pub const fn kind_mut(&mut self) -> Option<&mut ModalKind<P>> {
        self.kind.as_mut()
    }

    /// Route a key to the visible dialog. The dialog closes itself on any
    /// terminal event.
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<ModalEvent<P>>> {
        if !self.visible {
            return Ok(EventResult::Ignored);
        }
        let resolver = &self.resolver;
        let result = match self.kind.as_mut() {
            Some(ModalKind::Info(_) | ModalKind::Error(_) | ModalKind::Success(_)) => {
                if resolver.matches_dialog(&key, DialogAction::Dismiss) {
                    ModalEvent::Dismissed.into()
                } else {
                    EventResult::Consumed
                }
            }
            Some(ModalKind::Select(select)) => select.handle_key(key, resolver),
            Some(ModalKind::Input(input)) => input.handle_key(key, resolver),
            None => EventResult::Consumed,
        };
        if matches!(result, EventResult::Event(_)) {
            self.hide();
        }
        Ok(result)
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        if !self.visible {
            return;
        }
        match &self.kind {
            Some(ModalKind::Info(message)) => render_message(frame, area, " Info ", message, theme.info(), theme),
            Some(ModalKind::Error(message)) => render_message(frame, area, " Error ", message, theme.error(), theme),
            Some(ModalKind::Success(message)) => {
                render_message(frame, area, " Success ", message, theme.success(), theme);
            }
            Some(ModalKind::Select(select)) => {
                let popup = area.centered(Constraint::Percentage(50), Constraint::Percentage(60));
                frame.render_widget(Clear, popup);
                select.render(frame, popup, theme);
            }
            Some(ModalKind::Input(input)) => {
                let popup = area.centered(Constraint::Percentage(60), Constraint::Length(5));
                frame.render_widget(Clear, popup);
                input.render(frame, popup, theme);
            }
            None => {}
        }
    }
}

fn dialog_block(title: &str, border: Color, theme: &Theme) -> Block<'static> {
    Block::default()
        .title(format!(" {title} "))
        .title_style(Style::default().fg(theme.mauve).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_type(theme.border_type)
        .border_style(Style::default().fg(border))
        .style(Style::default().bg(theme.base()))
}

fn render_message(frame: &mut Frame, area: Rect, title: &str, message: &str, color: Color, theme: &Theme) {
    let popup = area.centered(Constraint::Percentage(50), Constraint::Length(7));
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .title(title.to_string())
        .title_style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_type(theme.border_type)
        .border_style(Style::default().fg(color))
        .style(Style::default().bg(theme.base()));

    let lines = vec![
        Line::styled(message.to_string(), Style::default().fg(theme.text())),
        Line::default(),
        Line::styled("Press Enter or Esc to close", Style::default().fg(theme.overlay0())),
    ];
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }).block(block), popup);
}

/// Insert `value` at the front of a most-recent-first history, dropping any
/// older copy and the oldest entries past the limit.
pub fn remember(history: &mut Vec<String>, value: &str) {
    history.retain(|h| h != value);
    history.insert(0, value.to_string());
    history.truncate(INPUT_HISTORY_LIMIT);
}
