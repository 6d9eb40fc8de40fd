use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState as RatatuiListState};

use crate::Theme;
use crate::config::{FinderAction, KeyResolver, NavAction};
use crate::nav::Page;
use crate::pages::PageEvent;
use crate::ui::{Component, EventResult, Keybinding, Result};

pub struct MenuItem {
    pub shortcut: char,
    pub title: &'static str,
    pub description: &'static str,
    pub page: Page,
}

pub const MENU_ITEMS: &[MenuItem] = &[
    MenuItem {
        shortcut: 's',
        title: "ECS Instances",
        description: "Elastic Compute Service instances",
        page: Page::EcsInstances,
    },
    MenuItem {
        shortcut: 'g',
        title: "Security Groups",
        description: "Security groups and their rules",
        page: Page::SecurityGroups,
    },
    MenuItem {
        shortcut: 'd',
        title: "DNS",
        description: "Alibaba Cloud DNS domains and records",
        page: Page::DnsDomains,
    },
    MenuItem {
        shortcut: 'b',
        title: "SLB",
        description: "Server Load Balancer instances",
        page: Page::SlbInstances,
    },
    MenuItem {
        shortcut: 'o',
        title: "OSS",
        description: "Object Storage Service buckets",
        page: Page::OssBuckets,
    },
    MenuItem {
        shortcut: 'r',
        title: "RDS",
        description: "Relational Database Service instances",
        page: Page::RdsInstances,
    },
    MenuItem {
        shortcut: 'i',
        title: "Redis",
        description: "Tair / Redis instances",
        page: Page::RedisInstances,
    },
    MenuItem {
        shortcut: 'm',
        title: "RocketMQ",
        description: "RocketMQ instances, topics and groups",
        page: Page::RocketMqInstances,
    },
];

/// Root page: one entry per service plus the finder.
pub struct Menu {
    cursor: usize,
    resolver: Arc<KeyResolver>,
}

impl Menu {
    pub const fn new(resolver: Arc<KeyResolver>) -> Self {
        Self { cursor: 0, resolver }
    }

    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn hints(&self) -> Vec<Keybinding> {
        vec![
            Keybinding::new(self.resolver.display_nav(NavAction::Select), "Open"),
            Keybinding::new(self.resolver.display_finder(FinderAction::Open), "Find by IP/domain"),
        ]
    }

    fn open(page: Page) -> EventResult<PageEvent> {
        PageEvent::Navigate { page, payload: None }.into()
    }
}

impl Component for Menu {
    type Output = PageEvent;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        if let KeyCode::Char(c) = key.code
            && key.modifiers.difference(KeyModifiers::SHIFT).is_empty()
            && let Some(item) = MENU_ITEMS.iter().find(|item| item.shortcut == c)
        {
            return Ok(Self::open(item.page));
        }

        let r = &self.resolver;
        if r.matches_finder(&key, FinderAction::Open) {
            return Ok(PageEvent::OpenFinder.into());
        }
        if r.matches_nav(&key, NavAction::Select) {
            return Ok(Self::open(MENU_ITEMS[self.cursor].page));
        }
        if r.matches_nav(&key, NavAction::Down) {
            self.cursor = (self.cursor + 1).min(MENU_ITEMS.len() - 1);
        } else if r.matches_nav(&key, NavAction::Up) {
            self.cursor = self.cursor.saturating_sub(1);
        } else if r.matches_nav(&key, NavAction::Home) {
            self.cursor = 0;
        } else if r.matches_nav(&key, NavAction::End) {
            self.cursor = MENU_ITEMS.len() - 1;
        } else {
            return Ok(EventResult::Ignored);
        }
        Ok(EventResult::Consumed)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let items: Vec<ListItem> = MENU_ITEMS
            .iter()
            .map(|item| {
                ListItem::new(vec![
                    Line::from(vec![
                        Span::styled(format!("[{}] ", item.shortcut), Style::default().fg(theme.peach)),
                        Span::styled(
                            item.title,
                            Style::default().fg(theme.text()).add_modifier(Modifier::BOLD),
                        ),
                    ]),
                    Line::styled(
                        format!("    {}", item.description),
                        Style::default().fg(theme.subtext0()),
                    ),
                ])
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(theme.border_type)
                    .border_style(Style::default().fg(theme.border_focused()))
                    .title(Span::styled(
                        " Services ",
                        Style::default().fg(theme.mauve).add_modifier(Modifier::BOLD),
                    )),
            )
            .highlight_style(Style::default().bg(theme.selection_bg()))
            .highlight_symbol("▶ ");

        let mut state = RatatuiListState::default().with_selected(Some(self.cursor));
        frame.render_stateful_widget(list, area, &mut state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn target(result: EventResult<PageEvent>) -> Page {
        match result {
            EventResult::Event(PageEvent::Navigate { page, payload: None }) => page,
            _ => panic!("expected navigation"),
        }
    }

    #[test]
    fn test_shortcuts_open_services() {
        let mut menu = Menu::new(Arc::new(KeyResolver::default()));
        assert_eq!(target(menu.handle_key(key(KeyCode::Char('g'))).unwrap()), Page::SecurityGroups);
        assert_eq!(target(menu.handle_key(key(KeyCode::Char('m'))).unwrap()), Page::RocketMqInstances);
    }

    #[test]
    fn test_enter_opens_item_under_cursor() {
        let mut menu = Menu::new(Arc::new(KeyResolver::default()));
        menu.handle_key(key(KeyCode::Down)).unwrap();
        menu.handle_key(key(KeyCode::Down)).unwrap();
        assert_eq!(menu.cursor(), 2);
        assert_eq!(target(menu.handle_key(key(KeyCode::Enter)).unwrap()), Page::DnsDomains);
    }

    #[test]
    fn test_f_opens_finder() {
        let mut menu = Menu::new(Arc::new(KeyResolver::default()));
        assert!(matches!(
            menu.handle_key(key(KeyCode::Char('f'))).unwrap(),
            EventResult::Event(PageEvent::OpenFinder)
        ));
    }
}
