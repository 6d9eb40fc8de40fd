//! Resource list pages: columns, row cells and drill-down links.

use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;
use serde_json::Value;

use crate::Theme;
use crate::config::{KeyResolver, NavAction, ResourceAction};
use crate::model::Payload;
use crate::nav::Page;
use crate::pages::PageEvent;
use crate::ui::{Component, EventResult, Keybinding, Result, Table, TableEvent, YankMode};

const INSTANCE_COLUMNS: &[&str] = &[
    "Instance ID",
    "Status",
    "Zone",
    "CPU/RAM",
    "Private IP",
    "Public IP",
    "Name",
    "Expired",
];
const SECURITY_GROUP_COLUMNS: &[&str] = &[
    "Security Group ID",
    "Name",
    "Description",
    "VPC ID",
    "Type",
    "Created",
];

/// Column headers of a list page.
pub const fn columns(page: Page) -> &'static [&'static str] {
    match page {
        Page::EcsInstances | Page::SecurityGroupInstances => INSTANCE_COLUMNS,
        Page::EcsDisks => &[
            "Disk ID",
            "Name",
            "Attribute",
            "Status",
            "Type",
            "Size",
            "IOPS",
            "Release",
            "Charge Type",
            "Portable",
        ],
        Page::EcsInterfaces => &[
            "ENI ID",
            "Name",
            "Type",
            "Status",
            "Private IP",
            "VPC",
            "Zone",
            "MAC",
            "Created",
        ],
        Page::EcsSecurityGroups | Page::SecurityGroups => SECURITY_GROUP_COLUMNS,
        Page::SecurityGroupRules => &[
            "Direction",
            "Protocol",
            "Port Range",
            "Source/Dest",
            "Policy",
            "Priority",
            "Description",
        ],
        Page::DnsDomains => &["Domain Name", "Record Count", "Version"],
        Page::DnsRecords => &["Record ID", "RR", "Type", "Value", "TTL", "Status"],
        Page::SlbInstances => &["SLB ID", "Name", "IP Address", "Type", "Status"],
        Page::SlbListeners => &[
            "Protocol",
            "Port",
            "Backend Port",
            "Status",
            "Health Check",
            "Scheduler",
            "VServer Group",
        ],
        Page::SlbVServerGroups => &[
            "VServer Group ID",
            "Name",
            "Server Count",
            "Associated Listeners",
        ],
        Page::SlbBackendServers => &[
            "Server ID",
            "ECS Name",
            "Port",
            "Weight",
            "Type",
            "Private IP",
            "Public IP",
            "Description",
        ],
        Page::OssBuckets => &["Bucket Name", "Location", "Created", "Storage Class"],
        Page::OssObjects => &["Object Key", "Size", "Last Modified", "Storage Class", "ETag"],
        Page::RdsInstances => &[
            "Instance ID",
            "Engine",
            "Version",
            "Class",
            "Internal Addr",
            "Public Addr",
            "Status",
            "Description",
        ],
        Page::RdsDatabases => &[
            "Database Name",
            "Status",
            "Character Set",
            "Bound Accounts",
            "Description",
        ],
        Page::RdsAccounts | Page::RedisAccounts => &[
            "Account Name",
            "Type",
            "Status",
            "Privileges",
            "Description",
        ],
        Page::RedisInstances => &[
            "Instance ID",
            "Name",
            "Type",
            "Capacity",
            "Status",
            "Connection",
        ],
        Page::RocketMqInstances => &["Instance ID", "Name", "Type", "Status", "Region"],
        Page::RocketMqTopics => &["Topic Name", "Message Type", "Status", "Remark"],
        Page::RocketMqGroups => &["Group ID", "Type", "Remark"],
        _ => &["Record"],
    }
}

fn or_dash(value: &str) -> String {
    if value.is_empty() { "-".to_string() } else { value.to_string() }
}

fn yes_no(value: bool) -> String {
    if value { "Yes" } else { "No" }.to_string()
}

/// Display cells for one record, in the order of its page's columns.
pub fn cells(payload: &Payload) -> Vec<String> {
    match payload {
        Payload::Instance(i) => vec![
            i.instance_id.clone(),
            i.status.clone(),
            i.zone_id.clone(),
            i.spec_summary(),
            i.private_ip().to_string(),
            i.public_ip().to_string(),
            i.instance_name.clone(),
            or_dash(&i.expired_time),
        ],
        Payload::Disk(d) => vec![
            d.disk_id.clone(),
            or_dash(&d.disk_name),
            d.kind.clone(),
            d.status.clone(),
            d.category_label(),
            format!("{} GiB", d.size),
            d.iops.to_string(),
            if d.delete_with_instance { "With Instance" } else { "Keep" }.to_string(),
            d.disk_charge_type.clone(),
            yes_no(d.portable),
        ],
        Payload::NetworkInterface(n) => vec![
            n.network_interface_id.clone(),
            or_dash(&n.network_interface_name),
            n.role_label().to_string(),
            n.status.clone(),
            n.primary_ip().to_string(),
            or_dash(&n.vpc_id),
            n.zone_id.clone(),
            n.mac_address.clone(),
            n.creation_time.clone(),
        ],
        Payload::SecurityGroup(g) => vec![
            g.security_group_id.clone(),
            g.security_group_name.clone(),
            or_dash(&g.description),
            or_dash(&g.vpc_id),
            g.security_group_type.clone(),
            g.creation_time.clone(),
        ],
        Payload::SecurityGroupRule(r) => vec![
            r.direction_label().to_string(),
            r.ip_protocol.clone(),
            r.port_range.clone(),
            r.peer().to_string(),
            r.policy.clone(),
            r.priority.clone(),
            or_dash(&r.description),
        ],
        Payload::Domain(d) => vec![
            d.domain_name.clone(),
            d.record_count.to_string(),
            or_dash(&d.version_code),
        ],
        Payload::DnsRecord(r) => vec![
            r.record_id.clone(),
            r.rr.clone(),
            r.kind.clone(),
            r.value.clone(),
            r.ttl.to_string(),
            r.status.clone(),
        ],
        Payload::LoadBalancer(lb) => vec![
            lb.load_balancer_id.clone(),
            lb.load_balancer_name.clone(),
            lb.address.clone(),
            lb.address_type.clone(),
            lb.load_balancer_status.clone(),
        ],
        Payload::Listener(l) => vec![
            l.listener_protocol.clone(),
            l.listener_port.to_string(),
            l.backend_port_label(),
            l.status.clone(),
            l.health_check().to_string(),
            or_dash(&l.scheduler),
            or_dash(&l.vserver_group_id),
        ],
        Payload::VServerGroup(g) => vec![
            g.vserver_group_id.clone(),
            g.vserver_group_name.clone(),
            g.server_count.to_string(),
            g.listeners_label(),
        ],
        Payload::BackendServer(s) => vec![
            s.server_id.clone(),
            or_dash(&s.instance_name),
            s.port.to_string(),
            s.weight.to_string(),
            s.kind.clone(),
            or_dash(&s.private_ip_address),
            or_dash(&s.public_ip_address),
            or_dash(&s.description),
        ],
        Payload::Bucket(b) => vec![
            b.name.clone(),
            b.location.clone(),
            b.creation_date.clone(),
            b.storage_class.clone(),
        ],
        Payload::Object(o) => vec![
            o.key.clone(),
            o.size_label(),
            o.last_modified.clone(),
            o.storage_class.clone(),
            o.etag.clone(),
        ],
        Payload::DbInstance(db) => db_cells(db, "-", "-"),
        Payload::DbInstanceDetail(d) => db_cells(
            &d.instance,
            &or_dash(&d.internal_connection_str),
            &or_dash(&d.public_connection_str),
        ),
        Payload::Database(db) => vec![
            db.db_name.clone(),
            db.db_status.clone(),
            db.character_set_name.clone(),
            db.accounts_label(),
            or_dash(&db.db_description),
        ],
        Payload::DbAccount(a) => vec![
            a.account_name.clone(),
            a.account_type.clone(),
            a.account_status.clone(),
            a.privileges_label(),
            or_dash(&a.account_description),
        ],
        Payload::CacheInstance(c) => vec![
            c.instance_id.clone(),
            c.instance_name.clone(),
            c.instance_type.clone(),
            c.capacity_label(),
            c.instance_status.clone(),
            c.connection_label().to_string(),
        ],
        Payload::CacheAccount(a) => vec![
            a.account_name.clone(),
            a.account_type.clone(),
            a.account_status.clone(),
            a.extra
                .get("AccountPrivilege")
                .and_then(Value::as_str)
                .map_or_else(|| "-".to_string(), str::to_string),
            or_dash(&a.account_description),
        ],
        Payload::QueueInstance(q) => vec![
            q.instance_id.clone(),
            q.instance_name.clone(),
            q.type_label(),
            q.status_label(),
            q.region_id.clone(),
        ],
        Payload::Topic(t) => vec![
            t.topic.clone(),
            t.message_type_label(),
            t.status_label(),
            or_dash(&t.remark),
        ],
        Payload::ConsumerGroup(g) => vec![g.group_id.clone(), g.group_type.clone(), or_dash(&g.remark)],
        Payload::Raw(value) => vec![value.to_string()],
    }
}

fn db_cells(db: &crate::model::DbInstance, internal: &str, public: &str) -> Vec<String> {
    vec![
        db.db_instance_id.clone(),
        db.engine.clone(),
        db.engine_version.clone(),
        db.db_instance_class.clone(),
        internal.to_string(),
        public.to_string(),
        db.db_instance_status.clone(),
        or_dash(&db.db_instance_description),
    ]
}

/// Page opened by Enter on a row.
pub const fn activation(page: Page) -> Page {
    match page {
        Page::EcsInstances | Page::SecurityGroupInstances => Page::EcsDetail,
        Page::EcsSecurityGroups | Page::SecurityGroups => Page::SecurityGroupRules,
        Page::DnsDomains => Page::DnsRecords,
        Page::SlbInstances => Page::SlbDetail,
        Page::SlbVServerGroups => Page::SlbBackendServers,
        Page::OssBuckets => Page::OssObjects,
        Page::OssObjects => Page::OssObjectDetail,
        Page::RdsInstances => Page::RdsDetail,
        Page::RedisInstances => Page::RedisDetail,
        Page::RocketMqInstances => Page::RocketMqDetail,
        _ => Page::Detail,
    }
}

const ECS_LINKS: &[(ResourceAction, Page)] = &[
    (ResourceAction::SecurityGroups, Page::EcsSecurityGroups),
    (ResourceAction::Disks, Page::EcsDisks),
    (ResourceAction::Interfaces, Page::EcsInterfaces),
    (ResourceAction::Json, Page::EcsJson),
];
const SECURITY_GROUP_LINKS: &[(ResourceAction, Page)] =
    &[(ResourceAction::Instances, Page::SecurityGroupInstances)];
const SLB_LINKS: &[(ResourceAction, Page)] = &[
    (ResourceAction::Listeners, Page::SlbListeners),
    (ResourceAction::VServerGroups, Page::SlbVServerGroups),
];
const RDS_LINKS: &[(ResourceAction, Page)] = &[
    (ResourceAction::Databases, Page::RdsDatabases),
    (ResourceAction::Accounts, Page::RdsAccounts),
];
const REDIS_LINKS: &[(ResourceAction, Page)] = &[(ResourceAction::Accounts, Page::RedisAccounts)];
const ROCKETMQ_LINKS: &[(ResourceAction, Page)] = &[
    (ResourceAction::Topics, Page::RocketMqTopics),
    (ResourceAction::Groups, Page::RocketMqGroups),
];

/// Single-key drill-downs from a record, shared by its list and detail pages.
pub const fn links(page: Page) -> &'static [(ResourceAction, Page)] {
    match page {
        Page::EcsInstances | Page::SecurityGroupInstances | Page::EcsDetail => ECS_LINKS,
        Page::SecurityGroups | Page::EcsSecurityGroups => SECURITY_GROUP_LINKS,
        Page::SlbInstances | Page::SlbDetail => SLB_LINKS,
        Page::RdsInstances | Page::RdsDetail => RDS_LINKS,
        Page::RedisInstances | Page::RedisDetail => REDIS_LINKS,
        Page::RocketMqInstances | Page::RocketMqDetail => ROCKETMQ_LINKS,
        _ => &[],
    }
}

/// Resolve a drill-down key on `page` to its target.
pub fn link_for(page: Page, key: &KeyEvent, resolver: &KeyResolver) -> Option<Page> {
    links(page)
        .iter()
        .find(|(action, _)| resolver.matches_resource(key, *action))
        .map(|(_, target)| *target)
}

pub fn link_hints(page: Page, resolver: &KeyResolver) -> Vec<Keybinding> {
    links(page)
        .iter()
        .map(|(action, target)| Keybinding::new(resolver.display_resource(*action), target.title()))
        .collect()
}

/// A table of records with the page's drill-down keys.
pub struct ResourceList {
    page: Page,
    table: Table,
    resolver: Arc<KeyResolver>,
}

impl ResourceList {
    pub fn new(page: Page, payloads: Vec<Payload>, resolver: Arc<KeyResolver>) -> Self {
        // Rules have no id of their own, so the row itself is what gets copied.
        let yank_mode = if page == Page::SecurityGroupRules {
            YankMode::Cells
        } else {
            YankMode::Payload
        };
        let mut table =
            Table::new(page.title(), columns(page), resolver.clone()).with_yank_mode(yank_mode);
        let rows = payloads.iter().map(cells).collect();
        table.set_rows(rows, payloads);
        Self {
            page,
            table,
            resolver,
        }
    }

    pub const fn table(&self) -> &Table {
        &self.table
    }

    pub const fn table_mut(&mut self) -> &mut Table {
        &mut self.table
    }

    pub fn hints(&self) -> Vec<Keybinding> {
        let mut hints = vec![Keybinding::new(
            self.resolver.display_nav(NavAction::Select),
            activation(self.page).title(),
        )];
        hints.extend(link_hints(self.page, &self.resolver));
        hints.push(Keybinding::new(self.resolver.display_yank(), "Copy"));
        hints
    }

    fn navigate(&self, target: Page) -> EventResult<PageEvent> {
        self.table.state().selected_payload().map_or(EventResult::Consumed, |payload| {
            PageEvent::Navigate {
                page: target,
                payload: Some(payload.clone()),
            }
            .into()
        })
    }
}

impl Component for ResourceList {
    type Output = PageEvent;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult<Self::Output>> {
        match self.table.handle_key(key)? {
            EventResult::Event(TableEvent::Activated) => Ok(self.navigate(activation(self.page))),
            EventResult::Event(TableEvent::Yanked(text)) => Ok(PageEvent::Copy(text).into()),
            EventResult::Consumed => Ok(EventResult::Consumed),
            EventResult::Ignored => Ok(link_for(self.page, &key, &self.resolver)
                .map_or(EventResult::Ignored, |target| self.navigate(target))),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        self.table.render(frame, area, theme);
    }
}
