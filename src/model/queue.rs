use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::lenient_i64;

/// A RocketMQ (ONS) instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct QueueInstance {
    pub instance_id: String,
    pub instance_name: String,
    #[serde(deserialize_with = "lenient_i64")]
    pub instance_type: i64,
    #[serde(deserialize_with = "lenient_i64")]
    pub instance_status: i64,
    pub independent_naming: bool,
    #[serde(deserialize_with = "lenient_i64")]
    pub release_time: i64,
    /// Filled in from the session, the listing call does not report it.
    pub region_id: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl QueueInstance {
    pub fn type_label(&self) -> String {
        match self.instance_type {
            1 => "Standard".to_string(),
            2 => "Professional".to_string(),
            other => other.to_string(),
        }
    }

    pub fn status_label(&self) -> String {
        match self.instance_status {
            0 => "Creating".to_string(),
            5 => "Running".to_string(),
            6 => "Expired".to_string(),
            7 => "Releasing".to_string(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Topic {
    pub topic: String,
    pub instance_id: String,
    #[serde(deserialize_with = "lenient_i64")]
    pub message_type: i64,
    #[serde(deserialize_with = "lenient_i64")]
    pub status: i64,
    pub remark: String,
    #[serde(deserialize_with = "lenient_i64")]
    pub create_time: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Topic {
    pub fn message_type_label(&self) -> String {
        match self.message_type {
            0 => "Normal".to_string(),
            1 => "Partition".to_string(),
            2 => "Transaction".to_string(),
            4 => "Delay".to_string(),
            5 => "Ordered".to_string(),
            other => other.to_string(),
        }
    }

    pub fn status_label(&self) -> String {
        if self.status == 0 {
            "Active".to_string()
        } else {
            self.status.to_string()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ConsumerGroup {
    pub group_id: String,
    pub instance_id: String,
    pub group_type: String,
    pub remark: String,
    #[serde(deserialize_with = "lenient_i64")]
    pub create_time: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_queue_labels() {
        let inst: QueueInstance = serde_json::from_value(json!({
            "InstanceId": "MQ_INST_1",
            "InstanceType": 2,
            "InstanceStatus": 5
        }))
        .unwrap();
        assert_eq!(inst.type_label(), "Professional");
        assert_eq!(inst.status_label(), "Running");

        let topic = Topic {
            message_type: 4,
            ..Topic::default()
        };
        assert_eq!(topic.message_type_label(), "Delay");
        assert_eq!(topic.status_label(), "Active");
    }
}
