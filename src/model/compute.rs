use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{first_non_empty, lenient_i64, lenient_string};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct IpAddressSet {
    pub ip_address: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct VpcAttributes {
    pub vpc_id: String,
    #[serde(rename = "VSwitchId")]
    pub vswitch_id: String,
    pub private_ip_address: IpAddressSet,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct EipAddress {
    pub allocation_id: String,
    pub ip_address: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SecurityGroupIds {
    pub security_group_id: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Tag {
    pub tag_key: String,
    pub tag_value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct TagSet {
    pub tag: Vec<Tag>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PrivateIp {
    pub private_ip_address: String,
    pub primary: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PrivateIpSets {
    pub private_ip_set: Vec<PrivateIp>,
}

/// Interface summary embedded in an instance record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct AttachedInterface {
    pub network_interface_id: String,
    pub primary_ip_address: String,
    #[serde(rename = "Type")]
    pub kind: String,
    pub private_ip_sets: PrivateIpSets,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct AttachedInterfaces {
    pub network_interface: Vec<AttachedInterface>,
}

/// An ECS instance as returned by `DescribeInstances`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Instance {
    pub instance_id: String,
    pub instance_name: String,
    pub status: String,
    pub region_id: String,
    pub zone_id: String,
    pub instance_type: String,
    pub cpu: i64,
    /// MiB
    pub memory: i64,
    pub image_id: String,
    #[serde(rename = "OSName")]
    pub os_name: String,
    pub host_name: String,
    pub description: String,
    pub creation_time: String,
    pub expired_time: String,
    pub instance_charge_type: String,
    pub internet_charge_type: String,
    pub internet_max_bandwidth_in: i64,
    pub internet_max_bandwidth_out: i64,
    pub instance_network_type: String,
    pub resource_group_id: String,
    pub key_pair_name: String,
    pub serial_number: String,
    pub public_ip_address: IpAddressSet,
    pub inner_ip_address: IpAddressSet,
    pub vpc_attributes: VpcAttributes,
    pub eip_address: EipAddress,
    pub security_group_ids: SecurityGroupIds,
    pub network_interfaces: AttachedInterfaces,
    pub tags: TagSet,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Instance {
    /// VPC addresses, or the classic-network inner addresses when there are none.
    pub fn private_ips(&self) -> &[String] {
        let vpc = &self.vpc_attributes.private_ip_address.ip_address;
        if vpc.is_empty() {
            &self.inner_ip_address.ip_address
        } else {
            vpc
        }
    }

    pub fn private_ip(&self) -> &str {
        self.private_ips().first().map_or("N/A", String::as_str)
    }

    /// Public address, or the bound EIP.
    pub fn public_ip(&self) -> &str {
        let public = self
            .public_ip_address
            .ip_address
            .first()
            .map_or("", String::as_str);
        first_non_empty(&[public, &self.eip_address.ip_address], "N/A")
    }

    /// Every address recorded on the instance, in no particular order.
    pub fn all_ips(&self) -> impl Iterator<Item = &str> {
        self.public_ip_address
            .ip_address
            .iter()
            .chain(&self.vpc_attributes.private_ip_address.ip_address)
            .chain(&self.inner_ip_address.ip_address)
            .map(String::as_str)
            .chain(std::iter::once(self.eip_address.ip_address.as_str()))
            .filter(|ip| !ip.is_empty())
    }

    /// Non-primary addresses on the attached interfaces.
    pub fn secondary_ips(&self) -> Vec<&str> {
        self.network_interfaces
            .network_interface
            .iter()
            .flat_map(|nic| &nic.private_ip_sets.private_ip_set)
            .filter(|ip| !ip.primary)
            .map(|ip| ip.private_ip_address.as_str())
            .collect()
    }

    pub fn spec_summary(&self) -> String {
        format!("{}C/{}G", self.cpu, self.memory / 1024)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SecurityGroup {
    pub security_group_id: String,
    pub security_group_name: String,
    pub description: String,
    pub vpc_id: String,
    pub security_group_type: String,
    pub creation_time: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One permission entry from `DescribeSecurityGroupAttribute`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SecurityGroupRule {
    pub direction: String,
    pub ip_protocol: String,
    pub port_range: String,
    pub source_cidr_ip: String,
    pub source_group_id: String,
    pub dest_cidr_ip: String,
    pub dest_group_id: String,
    pub policy: String,
    #[serde(deserialize_with = "lenient_string")]
    pub priority: String,
    pub description: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SecurityGroupRule {
    pub fn direction_label(&self) -> &str {
        match self.direction.as_str() {
            "ingress" => "Ingress",
            "egress" => "Egress",
            other => other,
        }
    }

    /// Source of an ingress rule or destination of an egress rule.
    pub fn peer(&self) -> &str {
        if self.direction == "egress" {
            first_non_empty(&[&self.dest_cidr_ip, &self.dest_group_id], "")
        } else {
            first_non_empty(&[&self.source_cidr_ip, &self.source_group_id], "")
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Disk {
    pub disk_id: String,
    pub disk_name: String,
    #[serde(rename = "Type")]
    pub kind: String,
    pub category: String,
    pub performance_level: String,
    pub status: String,
    /// GiB
    #[serde(deserialize_with = "lenient_i64")]
    pub size: i64,
    #[serde(rename = "IOPS", deserialize_with = "lenient_i64")]
    pub iops: i64,
    pub delete_with_instance: bool,
    pub disk_charge_type: String,
    pub portable: bool,
    pub instance_id: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Disk {
    pub fn category_label(&self) -> String {
        if self.performance_level.is_empty() {
            self.category.clone()
        } else {
            format!("{} ({})", self.category, self.performance_level)
        }
    }
}

/// A standalone network interface from `DescribeNetworkInterfaces`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct NetworkInterface {
    pub network_interface_id: String,
    pub network_interface_name: String,
    #[serde(rename = "Type")]
    pub kind: String,
    pub status: String,
    pub private_ip_address: String,
    pub private_ip_sets: PrivateIpSets,
    pub vpc_id: String,
    #[serde(rename = "VSwitchId")]
    pub vswitch_id: String,
    pub zone_id: String,
    pub mac_address: String,
    pub instance_id: String,
    pub creation_time: String,
    pub security_group_ids: SecurityGroupIds,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NetworkInterface {
    pub fn primary_ip(&self) -> &str {
        let first = self
            .private_ip_sets
            .private_ip_set
            .first()
            .map_or("", |ip| ip.private_ip_address.as_str());
        first_non_empty(&[&self.private_ip_address, first], "-")
    }

    pub fn all_ips(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.private_ip_address.as_str())
            .chain(
                self.private_ip_sets
                    .private_ip_set
                    .iter()
                    .map(|ip| ip.private_ip_address.as_str()),
            )
            .filter(|ip| !ip.is_empty())
    }

    pub fn network_label(&self) -> &str {
        first_non_empty(&[&self.vswitch_id, &self.vpc_id], "-")
    }

    pub fn role_label(&self) -> &str {
        match self.kind.as_str() {
            "Primary" => "Primary",
            "Secondary" => "Secondary",
            "" => "-",
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn instance() -> Instance {
        serde_json::from_value(json!({
            "InstanceId": "i-1",
            "Cpu": 4,
            "Memory": 8192,
            "OSName": "Alibaba Cloud Linux",
            "PublicIpAddress": {"IpAddress": []},
            "InnerIpAddress": {"IpAddress": ["10.1.0.1"]},
            "VpcAttributes": {
                "VpcId": "vpc-1",
                "VSwitchId": "vsw-1",
                "PrivateIpAddress": {"IpAddress": ["172.16.0.10"]},
                "NatIpAddress": ""
            },
            "EipAddress": {"AllocationId": "eip-1", "IpAddress": "47.1.1.1"},
            "NetworkInterfaces": {"NetworkInterface": [{
                "NetworkInterfaceId": "eni-1",
                "PrivateIpSets": {"PrivateIpSet": [
                    {"PrivateIpAddress": "172.16.0.10", "Primary": true},
                    {"PrivateIpAddress": "172.16.0.11", "Primary": false}
                ]}
            }]},
            "DeploymentSetId": "ds-1"
        }))
        .unwrap()
    }

    #[test]
    fn test_instance_ip_preference() {
        let inst = instance();
        assert_eq!(inst.private_ip(), "172.16.0.10");
        assert_eq!(inst.public_ip(), "47.1.1.1");
        assert_eq!(inst.secondary_ips(), vec!["172.16.0.11"]);
        assert_eq!(inst.spec_summary(), "4C/8G");
        assert_eq!(inst.os_name, "Alibaba Cloud Linux");
        assert_eq!(inst.extra["DeploymentSetId"], "ds-1");
    }

    #[test]
    fn test_instance_all_ips_skips_blank() {
        let inst = instance();
        let ips: Vec<&str> = inst.all_ips().collect();
        assert_eq!(ips, vec!["172.16.0.10", "10.1.0.1", "47.1.1.1"]);
    }

    #[test]
    fn test_instance_without_addresses() {
        let inst = Instance::default();
        assert_eq!(inst.private_ip(), "N/A");
        assert_eq!(inst.public_ip(), "N/A");
    }

    #[test]
    fn test_rule_peer_by_direction() {
        let rule: SecurityGroupRule = serde_json::from_value(json!({
            "Direction": "egress",
            "SourceCidrIp": "1.1.1.1/32",
            "DestGroupId": "sg-2",
            "Priority": 1
        }))
        .unwrap();
        assert_eq!(rule.peer(), "sg-2");
        assert_eq!(rule.direction_label(), "Egress");
        assert_eq!(rule.priority, "1");
    }

    #[test]
    fn test_eni_primary_ip_falls_back_to_set() {
        let eni: NetworkInterface = serde_json::from_value(json!({
            "NetworkInterfaceId": "eni-1",
            "PrivateIpSets": {"PrivateIpSet": [{"PrivateIpAddress": "10.0.0.9", "Primary": true}]},
            "VpcId": "vpc-9"
        }))
        .unwrap();
        assert_eq!(eni.primary_ip(), "10.0.0.9");
        assert_eq!(eni.network_label(), "vpc-9");
    }
}
