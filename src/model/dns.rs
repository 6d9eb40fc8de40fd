use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{lenient_i64, lenient_string};

/// A managed zone from `DescribeDomains`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Domain {
    pub domain_id: String,
    pub domain_name: String,
    #[serde(deserialize_with = "lenient_i64")]
    pub record_count: i64,
    pub version_code: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DnsRecord {
    #[serde(deserialize_with = "lenient_string")]
    pub record_id: String,
    pub domain_name: String,
    #[serde(rename = "RR")]
    pub rr: String,
    #[serde(rename = "Type")]
    pub kind: String,
    pub value: String,
    #[serde(rename = "TTL", deserialize_with = "lenient_i64")]
    pub ttl: i64,
    pub status: String,
    pub line: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DnsRecord {
    /// Fully qualified name of the record inside `zone`.
    pub fn fqdn(&self, zone: &str) -> String {
        if self.rr.is_empty() || self.rr == "@" {
            zone.to_string()
        } else {
            format!("{}.{zone}", self.rr)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fqdn() {
        let mut record = DnsRecord {
            rr: "db.internal".to_string(),
            ..DnsRecord::default()
        };
        assert_eq!(record.fqdn("example.com"), "db.internal.example.com");
        record.rr = "@".to_string();
        assert_eq!(record.fqdn("example.com"), "example.com");
    }

    #[test]
    fn test_record_id_accepts_number() {
        let record: DnsRecord =
            serde_json::from_value(serde_json::json!({"RecordId": 12345, "TTL": "600"})).unwrap();
        assert_eq!(record.record_id, "12345");
        assert_eq!(record.ttl, 600);
    }
}
