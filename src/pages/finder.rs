//! Finder results: one section per resource category.

use std::sync::Arc;
use std::time::Instant;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::Theme;
use crate::config::{DetailAction, FinderAction, KeyResolver, NavAction};
use crate::finder::{Category, FindResult};
use crate::model::Payload;
use crate::nav::Page;
use crate::pages::PageEvent;
use crate::pages::sections::SectionCursor;
use crate::ui::list::column_widths;
use crate::ui::yank::YankGesture;
use crate::ui::{Component, EventResult, Keybinding, Result};

const PAGE_STEP: usize = 10;
/// Query line plus the blank line under it.
const SUMMARY_LINES: usize = 2;

pub struct FinderSection {
    pub category: Category,
    pub headers: &'static [&'static str],
    pub rows: Vec<Vec<String>>,
    pub payloads: Vec<Payload>,
    pub target: Page,
}

impl FinderSection {
    /// Title, header, rows (or the empty notice) and a trailing blank line.
    fn line_count(&self) -> usize {
        3 + self.rows.len().max(1)
    }
}

fn dash(value: &str) -> String {
    if value.is_empty() { "-".to_string() } else { value.to_string() }
}

pub fn build_sections(result: &FindResult) -> Vec<FinderSection> {
    Category::ALL
        .iter()
        .map(|&category| {
            let (headers, rows, payloads, target): (&'static [&'static str], Vec<Vec<String>>, Vec<Payload>, Page) =
                match category {
                    Category::Compute => (
                        &["Instance ID", "Name", "Public IP", "Private IP", "Status"],
                        result
                            .instances
                            .iter()
                            .map(|i| {
                                vec![
                                    i.instance_id.clone(),
                                    i.instance_name.clone(),
                                    i.public_ip().to_string(),
                                    i.private_ip().to_string(),
                                    i.status.clone(),
                                ]
                            })
                            .collect(),
                        result.instances.iter().cloned().map(Payload::from).collect(),
                        Page::EcsDetail,
                    ),
                    Category::Interface => (
                        &["ENI ID", "Private IP", "Type", "Status", "Attached Instance"],
                        result
                            .interfaces
                            .iter()
                            .map(|n| {
                                vec![
                                    n.network_interface_id.clone(),
                                    n.primary_ip().to_string(),
                                    n.role_label().to_string(),
                                    n.status.clone(),
                                    dash(&n.instance_id),
                                ]
                            })
                            .collect(),
                        result.interfaces.iter().cloned().map(Payload::from).collect(),
                        Page::Detail,
                    ),
                    Category::LoadBalancer => (
                        &["SLB ID", "Name", "Address", "Spec", "Status"],
                        result
                            .load_balancers
                            .iter()
                            .map(|lb| {
                                vec![
                                    lb.load_balancer_id.clone(),
                                    lb.load_balancer_name.clone(),
                                    lb.address.clone(),
                                    dash(&lb.load_balancer_spec),
                                    lb.load_balancer_status.clone(),
                                ]
                            })
                            .collect(),
                        result.load_balancers.iter().cloned().map(Payload::from).collect(),
                        Page::SlbDetail,
                    ),
                    Category::Dns => (
                        &["Name", "Zone", "Type", "Value", "TTL"],
                        result
                            .dns_records
                            .iter()
                            .map(|m| {
                                vec![
                                    m.fqdn(),
                                    m.zone.clone(),
                                    m.record.kind.clone(),
                                    m.record.value.clone(),
                                    m.record.ttl.to_string(),
                                ]
                            })
                            .collect(),
                        result
                            .dns_records
                            .iter()
                            .map(|m| Payload::from(m.record.clone()))
                            .collect(),
                        Page::Detail,
                    ),
                    Category::Database => (
                        &[
                            "Instance ID",
                            "Description",
                            "Engine",
                            "Internal Addr",
                            "Public Addr",
                            "Status",
                        ],
                        result
                            .db_instances
                            .iter()
                            .map(|d| {
                                vec![
                                    d.instance.db_instance_id.clone(),
                                    dash(&d.instance.db_instance_description),
                                    format!("{} {}", d.instance.engine, d.instance.engine_version),
                                    dash(&d.internal_connection_str),
                                    dash(&d.public_connection_str),
                                    d.instance.db_instance_status.clone(),
                                ]
                            })
                            .collect(),
                        result.db_instances.iter().cloned().map(Payload::from).collect(),
                        Page::RdsDetail,
                    ),
                    Category::Cache => (
                        &["Instance ID", "Name", "Connection Domain", "Private IP", "Status"],
                        result
                            .cache_instances
                            .iter()
                            .map(|c| {
                                vec![
                                    c.instance_id.clone(),
                                    c.instance_name.clone(),
                                    c.connection_label().to_string(),
                                    dash(&c.private_ip),
                                    c.instance_status.clone(),
                                ]
                            })
                            .collect(),
                        result.cache_instances.iter().cloned().map(Payload::from).collect(),
                        Page::RedisDetail,
                    ),
                };
            FinderSection {
                category,
                headers,
                rows,
                payloads,
                target,
            }
        })
        .collect()
}

/// Cut `text` to `width` characters, marking the cut with `..`.
fn fit(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len <= width {
        return format!("{text:<width$}");
    }
    if width <= 3 {
        return text.chars().take(width).collect();
    }
    let mut cut: String = text.chars().take(width - 2).collect();
    cut.push_str("..");
    cut
}

pub struct FinderResults {
    result: FindResult,
    sections: Vec<FinderSection>,
    cursor: SectionCursor,
    offset: usize,
    yank: YankGesture,
    resolver: Arc<KeyResolver>,
}

impl FinderResults {
    pub fn new(result: FindResult, resolver: Arc<KeyResolver>) -> Self {
        let sections = build_sections(&result);
        let cursor = SectionCursor::new(sections.iter().map(|s| s.rows.len()).collect());
        Self {
            result,
            sections,
            cursor,
            offset: 0,
            yank: YankGesture::default(),
            resolver,
        }
    }

    pub const fn result(&self) -> &FindResult {
        &self.result
    }

    pub const fn cursor(&self) -> &SectionCursor {
        &self.cursor
    }

    fn selected(&self) -> Option<(&FinderSection, usize)> {
        let (section, row) = self.cursor.selected()?;
        Some((self.sections.get(section)?, row))
    }

    pub fn press_yank(&mut self, now: Instant) -> EventResult<PageEvent> {
        if self.yank.press(now)
            && let Some((section, row)) = self.selected()
            && let Some(cells) = section.rows.get(row)
        {
            return PageEvent::Copy(cells.join(" | ")).into();
        }
        EventResult::Consumed
    }

    pub fn hints(&self) -> Vec<Keybinding> {
        let r = &self.resolver;
        vec![
            Keybinding::new(r.display_nav(NavAction::Select), "Detail"),
            Keybinding::new(
                format!(
                    "{}/{}",
                    r.display_finder(FinderAction::NextSection),
                    r.display_finder(FinderAction::PrevSection)
                ),
                "Section",
            ),
            Keybinding::new(r.display_yank(), "Copy row"),
        ]
    }

    /// Summary line: query, what it resolved to and the match count.
    pub fn summary(&self) -> String {
        let resolved = match (self.result.resolved_ips.is_empty(), self.result.domain.is_empty()) {
            (false, _) => self.result.resolved_ips.join(", "),
            (true, false) => format!("{} (unresolved)", self.result.domain),
            (true, true) => "(unresolved)".to_string(),
        };
        let partial = if self.result.is_partial() { ", partial" } else { "" };
        if !self.result.has_results() {
            return format!("{} → {resolved}  (no matches{partial})", self.result.query);
        }
        let total = self.result.total_count();
        let noun = if total == 1 { "match" } else { "matches" };
        format!("{} → {resolved}  ({total} {noun}{partial})", self.result.query)
    }

    fn focused_line(&self) -> usize {
        let before: usize = self.sections[..self.cursor.section()]
            .iter()
            .map(FinderSection::line_count)
            .sum();
        SUMMARY_LINES + before + 2 + self.cursor.row()
    }

    fn lines(&self, width: u16, theme: &Theme) -> Vec<Line<'static>> {
        let mut lines = vec![
            Line::from(vec![
                Span::styled("Query: ", Style::default().fg(theme.subtext0())),
                Span::styled(
                    self.summary(),
                    Style::default().fg(theme.text()).add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::default(),
        ];

        for (i, section) in self.sections.iter().enumerate() {
            let focused = i == self.cursor.section();
            let title_color = if focused { theme.mauve } else { theme.overlay1() };
            let mut title = vec![Span::styled(
                format!("{} ({})", section.category.title(), section.rows.len()),
                Style::default().fg(title_color).add_modifier(Modifier::BOLD),
            )];
            if let Some(marker) = self.result.status(section.category).marker() {
                title.push(Span::styled(format!(" [{marker}]"), Style::default().fg(theme.warning())));
            }
            lines.push(Line::from(title));

            let headers: Vec<String> = section.headers.iter().map(|h| (*h).to_string()).collect();
            let widths = column_widths(&headers, &section.rows, width);
            let row_line = |cells: &[String], style: Style| {
                Line::from(
                    cells
                        .iter()
                        .zip(&widths)
                        .map(|(cell, w)| Span::styled(fit(cell, usize::from(*w)), style))
                        .collect::<Vec<_>>(),
                )
            };
            lines.push(row_line(
                &headers,
                Style::default().fg(theme.header()).add_modifier(Modifier::BOLD),
            ));

            if section.rows.is_empty() {
                lines.push(Line::styled("  No matches", Style::default().fg(theme.overlay0())));
            }
            for (j, cells) in section.rows.iter().enumerate() {
                let mut style = Style::default().fg(theme.text());
                if focused && j == self.cursor.row() {
                    style = style.bg(theme.selection_bg()).add_modifier(Modifier::BOLD);
                }
                lines.push(row_line(cells, style));
            }
            lines.push(Line::default());
        }
        lines
    }
}

impl Component for FinderResults {
    type Output = PageEvent;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        let r = self.resolver.clone();
        if r.matches_detail(&key, DetailAction::Yank) {
            return Ok(self.press_yank(Instant::now()));
        }
        if r.matches_nav(&key, NavAction::Select) {
            return Ok(self.selected().map_or(EventResult::Consumed, |(section, row)| {
                section.payloads.get(row).map_or(EventResult::Consumed, |payload| {
                    PageEvent::Navigate {
                        page: section.target,
                        payload: Some(payload.clone()),
                    }
                    .into()
                })
            }));
        }

        if r.matches_nav(&key, NavAction::Down) {
            self.cursor.down();
        } else if r.matches_nav(&key, NavAction::Up) {
            self.cursor.up();
        } else if r.matches_nav(&key, NavAction::PageDown) {
            self.cursor.by(PAGE_STEP, true);
        } else if r.matches_nav(&key, NavAction::PageUp) {
            self.cursor.by(PAGE_STEP, false);
        } else if r.matches_nav(&key, NavAction::Home) {
            self.cursor.first();
        } else if r.matches_nav(&key, NavAction::End) {
            self.cursor.last();
        } else if r.matches_finder(&key, FinderAction::NextSection) {
            self.cursor.next_section();
        } else if r.matches_finder(&key, FinderAction::PrevSection) {
            self.cursor.prev_section();
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
            .title(Span::styled(
                format!(" {} ", Page::FinderResults.title()),
                Style::default().fg(theme.mauve).add_modifier(Modifier::BOLD),
            ));
        let inner = block.inner(area);
        let height = usize::from(inner.height).max(1);

        let line = self.focused_line();
        if line < self.offset {
            // Show the section title along with its first row.
            self.offset = line.saturating_sub(2 + self.cursor.row());
        } else if line >= self.offset + height {
            self.offset = line + 1 - height;
        }

        let scroll = u16::try_from(self.offset).unwrap_or(u16::MAX);
        let paragraph = Paragraph::new(self.lines(inner.width, theme))
            .block(block)
            .scroll((scroll, 0));
        frame.render_widget(paragraph, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finder::{CategoryStatus, DnsMatch};
    use crate::model::{CacheInstance, DnsRecord, Instance};
    use crossterm::event::{KeyCode, KeyModifiers};
    use std::time::Duration;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn result() -> FindResult {
        let mut result = FindResult::new("web.example.com", vec!["10.0.0.5".to_string()], "web.example.com");
        result.instances = vec![
            Instance {
                instance_id: "i-1".to_string(),
                ..Instance::default()
            },
            Instance {
                instance_id: "i-2".to_string(),
                ..Instance::default()
            },
        ];
        result.dns_records = vec![DnsMatch {
            zone: "example.com".to_string(),
            record: DnsRecord {
                rr: "web".to_string(),
                kind: "A".to_string(),
                value: "10.0.0.5".to_string(),
                ..DnsRecord::default()
            },
        }];
        result.cache_instances = vec![CacheInstance {
            instance_id: "r-1".to_string(),
            ..CacheInstance::default()
        }];
        result.set_status(Category::LoadBalancer, CategoryStatus::TimedOut);
        result
    }

    #[test]
    fn test_every_category_gets_a_section() {
        let sections = build_sections(&result());
        assert_eq!(sections.len(), 6);
        assert_eq!(sections[0].rows.len(), 2);
        assert!(sections[2].rows.is_empty());
        assert_eq!(sections[3].rows[0], vec!["web.example.com", "example.com", "A", "10.0.0.5", "0"]);
        for section in &sections {
            assert_eq!(section.rows.len(), section.payloads.len());
        }
    }

    #[test]
    fn test_cursor_wraps_into_next_non_empty_section() {
        let mut view = FinderResults::new(result(), Arc::new(KeyResolver::default()));
        view.handle_key(key(KeyCode::Down)).unwrap();
        view.handle_key(key(KeyCode::Down)).unwrap();
        assert_eq!(view.cursor().selected(), Some((3, 0)));
        view.handle_key(key(KeyCode::Down)).unwrap();
        assert_eq!(view.cursor().selected(), Some((5, 0)));
        view.handle_key(key(KeyCode::Up)).unwrap();
        assert_eq!(view.cursor().selected(), Some((3, 0)));
    }

    #[test]
    fn test_enter_opens_category_detail() {
        let mut view = FinderResults::new(result(), Arc::new(KeyResolver::default()));
        view.handle_key(key(KeyCode::Char('G'))).unwrap();
        let event = view.handle_key(key(KeyCode::Enter)).unwrap();
        assert!(matches!(
            event,
            EventResult::Event(PageEvent::Navigate {
                page: Page::RedisDetail,
                payload: Some(Payload::CacheInstance(_))
            })
        ));
    }

    #[test]
    fn test_enter_on_empty_section_is_consumed() {
        let mut view = FinderResults::new(result(), Arc::new(KeyResolver::default()));
        view.handle_key(key(KeyCode::Tab)).unwrap();
        assert!(matches!(view.handle_key(key(KeyCode::Enter)).unwrap(), EventResult::Consumed));
    }

    #[test]
    fn test_yank_copies_row_cells() {
        let mut view = FinderResults::new(result(), Arc::new(KeyResolver::default()));
        let now = Instant::now();
        view.press_yank(now);
        let event = view.press_yank(now + Duration::from_millis(50));
        assert!(matches!(event, EventResult::Event(PageEvent::Copy(text)) if text == "i-1 |  | N/A | N/A | "));
    }

    #[test]
    fn test_summary_reports_partial_results() {
        let view = FinderResults::new(result(), Arc::new(KeyResolver::default()));
        assert_eq!(view.summary(), "web.example.com → 10.0.0.5  (4 matches, partial)");
    }

    #[test]
    fn test_yank_hint_follows_binding() {
        let mut bindings = crate::config::keybindings::KeybindingsConfig::default();
        bindings.detail.yank = crate::config::key::Key::char('c').into();
        let view = FinderResults::new(result(), Arc::new(KeyResolver::new(Arc::new(bindings))));
        let hints = view.hints();
        assert!(hints.iter().any(|h| h.key == "cc" && h.description == "Copy row"));
        assert!(!hints.iter().any(|h| h.key == "yy"));
    }

    #[test]
    fn test_summary_names_unresolved_domain() {
        let result = FindResult::new("db.internal", Vec::new(), "db.internal.example.com");
        let view = FinderResults::new(result, Arc::new(KeyResolver::default()));
        assert_eq!(view.summary(), "db.internal → db.internal.example.com (unresolved)  (no matches)");
    }

    #[test]
    fn test_fit_pads_and_truncates() {
        assert_eq!(fit("abc", 5), "abc  ");
        assert_eq!(fit("abcdefgh", 6), "abcd..");
        assert_eq!(fit("abcdef", 3), "abc");
    }
}
