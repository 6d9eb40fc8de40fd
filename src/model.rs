//! Typed resource records.
//!
//! Records mirror the JSON the Alibaba Cloud APIs return. Fields the UI does
//! not read are kept in a flattened `extra` map so detail views still show
//! the full record.

mod cache;
mod compute;
mod database;
mod dns;
mod oss;
mod queue;
mod slb;

pub use cache::{CacheAccount, CacheInstance};
pub use compute::{Disk, Instance, NetworkInterface, SecurityGroup, SecurityGroupRule};
pub use database::{Database, DbAccount, DbInstance, DbInstanceDetail, NetInfo};
pub use dns::{DnsRecord, Domain};
pub use oss::{Bucket, ObjectPage, ObjectSummary};
pub use queue::{ConsumerGroup, QueueInstance, Topic};
pub use slb::{BackendServer, Listener, LoadBalancer, VServerGroup};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

/// Any record that can travel through page navigation.
///
/// `Raw` carries data that has no dedicated type; pages that expect a typed
/// record fall back to the JSON view when they receive it.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Instance(Instance),
    SecurityGroup(SecurityGroup),
    SecurityGroupRule(SecurityGroupRule),
    Disk(Disk),
    NetworkInterface(NetworkInterface),
    Domain(Domain),
    DnsRecord(DnsRecord),
    LoadBalancer(LoadBalancer),
    Listener(Listener),
    VServerGroup(VServerGroup),
    BackendServer(BackendServer),
    Bucket(Bucket),
    Object(ObjectSummary),
    DbInstance(DbInstance),
    DbInstanceDetail(DbInstanceDetail),
    Database(Database),
    DbAccount(DbAccount),
    CacheInstance(CacheInstance),
    CacheAccount(CacheAccount),
    QueueInstance(QueueInstance),
    Topic(Topic),
    ConsumerGroup(ConsumerGroup),
    Raw(Value),
}

impl Payload {
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Instance(_) => "ECS instance",
            Self::SecurityGroup(_) => "security group",
            Self::SecurityGroupRule(_) => "security group rule",
            Self::Disk(_) => "disk",
            Self::NetworkInterface(_) => "network interface",
            Self::Domain(_) => "DNS domain",
            Self::DnsRecord(_) => "DNS record",
            Self::LoadBalancer(_) => "load balancer",
            Self::Listener(_) => "listener",
            Self::VServerGroup(_) => "VServer group",
            Self::BackendServer(_) => "backend server",
            Self::Bucket(_) => "bucket",
            Self::Object(_) => "object",
            Self::DbInstance(_) | Self::DbInstanceDetail(_) => "RDS instance",
            Self::Database(_) => "database",
            Self::DbAccount(_) => "database account",
            Self::CacheInstance(_) => "Redis instance",
            Self::CacheAccount(_) => "Redis account",
            Self::QueueInstance(_) => "RocketMQ instance",
            Self::Topic(_) => "topic",
            Self::ConsumerGroup(_) => "consumer group",
            Self::Raw(_) => "record",
        }
    }

    /// Identifier shown in titles of pages scoped to this record.
    pub fn label(&self) -> &str {
        match self {
            Self::Instance(i) => &i.instance_id,
            Self::SecurityGroup(g) => &g.security_group_id,
            Self::Disk(d) => &d.disk_id,
            Self::NetworkInterface(n) => &n.network_interface_id,
            Self::Domain(d) => &d.domain_name,
            Self::DnsRecord(r) => &r.record_id,
            Self::LoadBalancer(lb) => &lb.load_balancer_id,
            Self::Listener(l) => &l.load_balancer_id,
            Self::VServerGroup(g) => &g.vserver_group_id,
            Self::BackendServer(s) => &s.server_id,
            Self::Bucket(b) => &b.name,
            Self::Object(o) => &o.key,
            Self::DbInstance(db) => &db.db_instance_id,
            Self::DbInstanceDetail(d) => &d.instance.db_instance_id,
            Self::Database(db) => &db.db_name,
            Self::DbAccount(a) => &a.account_name,
            Self::CacheInstance(c) => &c.instance_id,
            Self::CacheAccount(a) => &a.account_name,
            Self::QueueInstance(q) => &q.instance_id,
            Self::Topic(t) => &t.topic,
            Self::ConsumerGroup(g) => &g.group_id,
            Self::SecurityGroupRule(_) | Self::Raw(_) => "",
        }
    }

    /// Indented JSON of the record, as shown in detail views and copied by yank.
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| {
            warn!(error = %e, kind = self.kind(), "Failed to serialize payload");
            String::from("{}")
        })
    }
}

macro_rules! payload_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Payload {
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

payload_from! {
    Instance => Instance,
    SecurityGroup => SecurityGroup,
    SecurityGroupRule => SecurityGroupRule,
    Disk => Disk,
    NetworkInterface => NetworkInterface,
    Domain => Domain,
    DnsRecord => DnsRecord,
    LoadBalancer => LoadBalancer,
    Listener => Listener,
    VServerGroup => VServerGroup,
    BackendServer => BackendServer,
    Bucket => Bucket,
    ObjectSummary => Object,
    DbInstance => DbInstance,
    DbInstanceDetail => DbInstanceDetail,
    Database => Database,
    DbAccount => DbAccount,
    CacheInstance => CacheInstance,
    CacheAccount => CacheAccount,
    QueueInstance => QueueInstance,
    Topic => Topic,
    ConsumerGroup => ConsumerGroup,
    Value => Raw,
}

/// Accepts a JSON string, number or bool and keeps its text form.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// Accepts a JSON number or a numeric string. Anything else reads as zero.
pub(crate) fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or_default(),
        Value::String(s) => s.trim().parse().unwrap_or_default(),
        _ => 0,
    })
}

/// Falls back to `fallback` when every candidate is empty.
pub(crate) fn first_non_empty<'a>(candidates: &[&'a str], fallback: &'a str) -> &'a str {
    candidates
        .iter()
        .copied()
        .find(|s| !s.is_empty())
        .unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_serializes_without_tag() {
        let record: DnsRecord = serde_json::from_value(json!({
            "RecordId": "1",
            "RR": "www",
            "Type": "A",
            "Value": "1.2.3.4",
            "TTL": 600,
            "Weight": 1
        }))
        .unwrap();
        let value: Value = serde_json::from_str(&Payload::from(record).to_pretty_json()).unwrap();
        assert_eq!(value["RR"], "www");
        assert_eq!(value["TTL"], 600);
        assert_eq!(value["Weight"], 1);
    }

    #[test]
    fn test_raw_payload_passthrough() {
        let payload = Payload::from(json!({"a": [1, 2]}));
        assert_eq!(payload.kind(), "record");
        assert_eq!(payload.label(), "");
        assert!(payload.to_pretty_json().contains("\"a\""));
    }

    #[test]
    fn test_lenient_fields() {
        #[derive(Deserialize)]
        struct Probe {
            #[serde(deserialize_with = "lenient_string")]
            text: String,
            #[serde(deserialize_with = "lenient_i64")]
            number: i64,
        }
        let probe: Probe = serde_json::from_value(json!({"text": 1, "number": "42"})).unwrap();
        assert_eq!(probe.text, "1");
        assert_eq!(probe.number, 42);
    }

    #[test]
    fn test_first_non_empty() {
        assert_eq!(first_non_empty(&["", "b"], "-"), "b");
        assert_eq!(first_non_empty(&["", ""], "-"), "-");
    }
}
