use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::lenient_i64;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct LoadBalancer {
    pub load_balancer_id: String,
    pub load_balancer_name: String,
    pub address: String,
    pub address_type: String,
    pub load_balancer_spec: String,
    pub load_balancer_status: String,
    pub network_type: String,
    pub vpc_id: String,
    #[serde(rename = "VSwitchId")]
    pub vswitch_id: String,
    pub create_time: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A listener from `DescribeLoadBalancerListeners`.
///
/// Protocol specific settings (`HTTPListenerConfig`, `TCPListenerConfig`, ...)
/// stay in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Listener {
    pub load_balancer_id: String,
    pub listener_protocol: String,
    #[serde(deserialize_with = "lenient_i64")]
    pub listener_port: i64,
    #[serde(deserialize_with = "lenient_i64")]
    pub backend_server_port: i64,
    pub status: String,
    pub scheduler: String,
    #[serde(rename = "VServerGroupId")]
    pub vserver_group_id: String,
    pub description: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Listener {
    pub fn health_check(&self) -> &str {
        self.extra
            .iter()
            .filter(|(key, _)| key.ends_with("ListenerConfig"))
            .find_map(|(_, config)| config.get("HealthCheck").and_then(Value::as_str))
            .unwrap_or("-")
    }

    pub fn backend_port_label(&self) -> String {
        if self.backend_server_port > 0 {
            self.backend_server_port.to_string()
        } else {
            "--".to_string()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct AssociatedListener {
    pub protocol: String,
    #[serde(deserialize_with = "lenient_i64")]
    pub port: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct AssociatedListeners {
    pub listener: Vec<AssociatedListener>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct AssociatedObjects {
    pub listeners: AssociatedListeners,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct VServerGroup {
    #[serde(rename = "VServerGroupId")]
    pub vserver_group_id: String,
    #[serde(rename = "VServerGroupName")]
    pub vserver_group_name: String,
    #[serde(deserialize_with = "lenient_i64")]
    pub server_count: i64,
    pub associated_objects: AssociatedObjects,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl VServerGroup {
    pub fn listeners_label(&self) -> String {
        let listeners = &self.associated_objects.listeners.listener;
        if listeners.is_empty() {
            return "--".to_string();
        }
        listeners
            .iter()
            .map(|l| format!("{}:{}", l.protocol.to_uppercase(), l.port))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A member of a VServer group, joined with the ECS instance it points at.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct BackendServer {
    pub server_id: String,
    #[serde(deserialize_with = "lenient_i64")]
    pub port: i64,
    #[serde(deserialize_with = "lenient_i64")]
    pub weight: i64,
    #[serde(rename = "Type")]
    pub kind: String,
    pub server_ip: String,
    pub description: String,
    pub instance_name: String,
    pub private_ip_address: String,
    pub public_ip_address: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_health_check_from_protocol_config() {
        let listener: Listener = serde_json::from_value(json!({
            "ListenerProtocol": "http",
            "ListenerPort": 80,
            "HTTPListenerConfig": {"HealthCheck": "on"}
        }))
        .unwrap();
        assert_eq!(listener.health_check(), "on");
        assert_eq!(listener.backend_port_label(), "--");
    }

    #[test]
    fn test_vserver_group_listeners_label() {
        let group: VServerGroup = serde_json::from_value(json!({
            "VServerGroupId": "rsp-1",
            "AssociatedObjects": {"Listeners": {"Listener": [
                {"Protocol": "http", "Port": 80},
                {"Protocol": "https", "Port": 443}
            ]}}
        }))
        .unwrap();
        assert_eq!(group.listeners_label(), "HTTP:80, HTTPS:443");
        assert_eq!(VServerGroup::default().listeners_label(), "--");
    }
}
