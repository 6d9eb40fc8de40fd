use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{lenient_i64, lenient_string};

/// A Redis (KVStore) instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CacheInstance {
    pub instance_id: String,
    pub instance_name: String,
    pub instance_type: String,
    pub instance_class: String,
    pub instance_status: String,
    pub engine_version: String,
    /// MiB
    #[serde(deserialize_with = "lenient_i64")]
    pub capacity: i64,
    pub connection_domain: String,
    pub private_ip: String,
    #[serde(deserialize_with = "lenient_string")]
    pub port: String,
    pub network_type: String,
    pub region_id: String,
    pub zone_id: String,
    pub vpc_id: String,
    pub create_time: String,
    pub end_time: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CacheInstance {
    pub fn connection_label(&self) -> &str {
        if self.connection_domain.is_empty() {
            "N/A"
        } else {
            &self.connection_domain
        }
    }

    pub fn capacity_label(&self) -> String {
        if self.capacity >= 1024 && self.capacity % 1024 == 0 {
            format!("{} GB", self.capacity / 1024)
        } else {
            format!("{} MB", self.capacity)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CacheAccount {
    pub account_name: String,
    pub account_type: String,
    pub account_status: String,
    pub account_description: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_label() {
        let mut inst = CacheInstance {
            capacity: 2048,
            ..CacheInstance::default()
        };
        assert_eq!(inst.capacity_label(), "2 GB");
        inst.capacity = 256;
        assert_eq!(inst.capacity_label(), "256 MB");
        assert_eq!(inst.connection_label(), "N/A");
    }
}
