//! Formatted ECS instance detail: labelled values grouped in sections.

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
use crate::model::{Instance, Payload};
use crate::nav::Page;
use crate::pages::PageEvent;
use crate::pages::resources::{link_for, link_hints};
use crate::pages::sections::SectionCursor;
use crate::ui::yank::YankGesture;
use crate::ui::{Component, EventResult, Keybinding, Result};

const PAGE_STEP: usize = 10;
const LABEL_WIDTH: usize = 22;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: &'static str,
    pub fields: Vec<Field>,
}

fn field(label: &'static str, value: impl Into<String>) -> Field {
    let value = value.into();
    Field {
        label,
        value: if value.trim().is_empty() { "-".to_string() } else { value },
    }
}

fn charge_type(value: &str) -> &str {
    match value {
        "PrePaid" => "Subscription",
        "PostPaid" => "Pay-As-You-Go",
        other => other,
    }
}

fn network_type(value: &str) -> &str {
    match value {
        "vpc" => "VPC",
        "classic" => "Classic",
        other => other,
    }
}

fn joined(values: &[&str]) -> String {
    values.iter().filter(|v| !v.is_empty()).copied().collect::<Vec<_>>().join(", ")
}

pub fn instance_sections(inst: &Instance) -> Vec<Section> {
    let private_ips: Vec<&str> = inst.private_ips().iter().map(String::as_str).collect();
    let tags: Vec<String> = inst
        .tags
        .tag
        .iter()
        .map(|t| format!("{}={}", t.tag_key, t.tag_value))
        .collect();

    vec![
        Section {
            title: "Basic Information",
            fields: vec![
                field("Instance ID", &inst.instance_id),
                field("Instance Name", &inst.instance_name),
                field("Status", &inst.status),
                field("Zone", &inst.zone_id),
                field("Charge Type", charge_type(&inst.instance_charge_type)),
                field("Expires", &inst.expired_time),
            ],
        },
        Section {
            title: "Configuration",
            fields: vec![
                field("Instance Type", &inst.instance_type),
                field(
                    "CPU / Memory",
                    format!("{} vCPU / {} GiB", inst.cpu, inst.memory / 1024),
                ),
                field("Public IP", inst.public_ip()),
                field("Private IP", joined(&private_ips)),
                field("Image ID", &inst.image_id),
                field("OS", &inst.os_name),
                field("VPC", &inst.vpc_attributes.vpc_id),
                field("VSwitch", &inst.vpc_attributes.vswitch_id),
                field("Network Type", network_type(&inst.instance_network_type)),
                field(
                    "Bandwidth",
                    format!(
                        "In: {} Mbps / Out: {} Mbps",
                        inst.internet_max_bandwidth_in, inst.internet_max_bandwidth_out
                    ),
                ),
                field("Bandwidth Charge", &inst.internet_charge_type),
            ],
        },
        Section {
            title: "Bound Resources",
            fields: vec![
                field(
                    "Security Groups",
                    format!("{} group(s)", inst.security_group_ids.security_group_id.len()),
                ),
                field(
                    "Network Interfaces",
                    format!("{} interface(s)", inst.network_interfaces.network_interface.len()),
                ),
                field("EIP ID", &inst.eip_address.allocation_id),
                field("Secondary IPs", joined(&inst.secondary_ips())),
            ],
        },
        Section {
            title: "Group Information",
            fields: vec![
                field("Resource Group", &inst.resource_group_id),
                field("Tags", tags.join(", ")),
            ],
        },
        Section {
            title: "Other Information",
            fields: vec![
                field("Hostname", &inst.host_name),
                field("Description", &inst.description),
                field("Created", &inst.creation_time),
                field("Key Pair", &inst.key_pair_name),
                field("Serial Number", &inst.serial_number),
            ],
        },
    ]
}

pub struct InstanceDetail {
    instance: Instance,
    sections: Vec<Section>,
    cursor: SectionCursor,
    offset: usize,
    yank: YankGesture,
    resolver: Arc<KeyResolver>,
}

impl InstanceDetail {
    pub fn new(instance: Instance, resolver: Arc<KeyResolver>) -> Self {
        let sections = instance_sections(&instance);
        let cursor = SectionCursor::new(sections.iter().map(|s| s.fields.len()).collect());
        Self {
            instance,
            sections,
            cursor,
            offset: 0,
            yank: YankGesture::default(),
            resolver,
        }
    }

    pub const fn cursor(&self) -> &SectionCursor {
        &self.cursor
    }

    pub fn focused(&self) -> Option<&Field> {
        let (section, row) = self.cursor.selected()?;
        self.sections.get(section)?.fields.get(row)
    }

    pub fn press_yank(&mut self, now: Instant) -> EventResult<PageEvent> {
        if self.yank.press(now)
            && let Some(field) = self.focused()
        {
            return PageEvent::Copy(field.value.clone()).into();
        }
        EventResult::Consumed
    }

    pub fn hints(&self) -> Vec<Keybinding> {
        let mut hints = vec![Keybinding::new(
            format!(
                "{}/{}",
                self.resolver.display_finder(FinderAction::NextSection),
                self.resolver.display_finder(FinderAction::PrevSection)
            ),
            "Section",
        )];
        hints.extend(link_hints(Page::EcsDetail, &self.resolver));
        hints.push(Keybinding::new(self.resolver.display_yank(), "Copy value"));
        hints
    }

    /// Line of the focused field within the rendered body.
    fn focused_line(&self) -> usize {
        let before: usize = self.sections[..self.cursor.section()]
            .iter()
            .map(|s| s.fields.len() + 2)
            .sum();
        before + 1 + self.cursor.row()
    }

    fn lines(&self, theme: &Theme) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        for (i, section) in self.sections.iter().enumerate() {
            let focused_section = i == self.cursor.section();
            let title_color = if focused_section { theme.mauve } else { theme.overlay1() };
            lines.push(Line::styled(
                section.title,
                Style::default().fg(title_color).add_modifier(Modifier::BOLD),
            ));
            for (j, field) in section.fields.iter().enumerate() {
                let selected = focused_section && j == self.cursor.row();
                let mut value_style = Style::default().fg(theme.text());
                if selected {
                    value_style = value_style.bg(theme.selection_bg()).add_modifier(Modifier::BOLD);
                }
                lines.push(Line::from(vec![
                    Span::styled(
                        format!("  {:<LABEL_WIDTH$}", field.label),
                        Style::default().fg(theme.subtext0()),
                    ),
                    Span::styled(field.value.clone(), value_style),
                ]));
            }
            lines.push(Line::default());
        }
        lines
    }
}

impl Component for InstanceDetail {
    type Output = PageEvent;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        let r = self.resolver.clone();
        if r.matches_detail(&key, DetailAction::Yank) {
            return Ok(self.press_yank(Instant::now()));
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
        } else if let Some(target) = link_for(Page::EcsDetail, &key, &r) {
            return Ok(PageEvent::Navigate {
                page: target,
                payload: Some(Payload::Instance(self.instance.clone())),
            }
            .into());
        } else {
            return Ok(EventResult::Ignored);
        }
        Ok(EventResult::Consumed)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let title = format!(" ECS Detail: {} ", self.instance.instance_id);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(theme.border_focused()))
            .title(Span::styled(
                title,
                Style::default().fg(theme.mauve).add_modifier(Modifier::BOLD),
            ));
        let height = usize::from(block.inner(area).height).max(1);

        let line = self.focused_line();
        if line < self.offset {
            self.offset = line;
        } else if line >= self.offset + height {
            self.offset = line + 1 - height;
        }

        let scroll = u16::try_from(self.offset).unwrap_or(u16::MAX);
        let paragraph = Paragraph::new(self.lines(theme)).block(block).scroll((scroll, 0));
        frame.render_widget(paragraph, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn instance() -> Instance {
        serde_json::from_value(serde_json::json!({
            "InstanceId": "i-1",
            "InstanceName": "web",
            "InstanceChargeType": "PostPaid",
            "Cpu": 4,
            "Memory": 8192,
            "VpcAttributes": {"PrivateIpAddress": {"IpAddress": ["10.0.0.1", "10.0.0.2"]}},
            "Tags": {"Tag": [{"TagKey": "env", "TagValue": "prod"}]}
        }))
        .unwrap()
    }

    #[test]
    fn test_sections_format_values() {
        let sections = instance_sections(&instance());
        assert_eq!(sections.len(), 5);
        let basic = &sections[0].fields;
        assert_eq!(basic[4].value, "Pay-As-You-Go");
        assert_eq!(basic[5].value, "-");
        let config = &sections[1].fields;
        assert_eq!(config[1].value, "4 vCPU / 8 GiB");
        assert_eq!(config[3].value, "10.0.0.1, 10.0.0.2");
        assert_eq!(sections[3].fields[1].value, "env=prod");
    }

    #[test]
    fn test_double_yank_copies_focused_value() {
        let mut detail = InstanceDetail::new(instance(), Arc::new(KeyResolver::default()));
        detail.cursor.down();
        let now = Instant::now();
        assert!(matches!(detail.press_yank(now), EventResult::Consumed));
        let result = detail.press_yank(now + Duration::from_millis(100));
        assert!(matches!(result, EventResult::Event(PageEvent::Copy(v)) if v == "web"));
    }

    #[test]
    fn test_tab_moves_between_sections() {
        let mut detail = InstanceDetail::new(instance(), Arc::new(KeyResolver::default()));
        let tab = KeyEvent::new(crossterm::event::KeyCode::Tab, crossterm::event::KeyModifiers::NONE);
        detail.handle_key(tab).unwrap();
        assert_eq!(detail.focused().map(|f| f.label), Some("Instance Type"));
        assert_eq!(detail.focused_line(), 9);
    }
}
