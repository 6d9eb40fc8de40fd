use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::lenient_string;

/// An RDS instance from `DescribeDBInstances`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DbInstance {
    #[serde(rename = "DBInstanceId")]
    pub db_instance_id: String,
    #[serde(rename = "DBInstanceDescription")]
    pub db_instance_description: String,
    pub engine: String,
    pub engine_version: String,
    #[serde(rename = "DBInstanceClass")]
    pub db_instance_class: String,
    #[serde(rename = "DBInstanceStatus")]
    pub db_instance_status: String,
    #[serde(rename = "DBInstanceNetType")]
    pub db_instance_net_type: String,
    pub connection_string: String,
    pub region_id: String,
    pub zone_id: String,
    pub vpc_id: String,
    pub pay_type: String,
    pub create_time: String,
    pub expire_time: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One address entry from `DescribeDBInstanceNetInfo`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct NetInfo {
    pub connection_string: String,
    #[serde(rename = "IPAddress")]
    pub ip_address: String,
    #[serde(rename = "IPType")]
    pub ip_type: String,
    #[serde(deserialize_with = "lenient_string")]
    pub port: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An RDS instance with its internal and public endpoints resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DbInstanceDetail {
    #[serde(flatten)]
    pub instance: DbInstance,
    pub internal_connection_str: String,
    #[serde(rename = "InternalIP")]
    pub internal_ip: String,
    pub public_connection_str: String,
    #[serde(rename = "PublicIP")]
    pub public_ip: String,
}

impl DbInstanceDetail {
    /// Seeds the internal endpoint from the instance's connection string, then
    /// lets the net info entries override it.
    pub fn merge(instance: DbInstance, net_infos: &[NetInfo]) -> Self {
        let mut detail = Self {
            internal_connection_str: instance.connection_string.clone(),
            instance,
            ..Self::default()
        };
        for info in net_infos {
            match info.ip_type.as_str() {
                "Private" | "Inner" => {
                    detail.internal_connection_str.clone_from(&info.connection_string);
                    detail.internal_ip.clone_from(&info.ip_address);
                }
                "Public" => {
                    detail.public_connection_str.clone_from(&info.connection_string);
                    detail.public_ip.clone_from(&info.ip_address);
                }
                _ => {}
            }
        }
        detail
    }

    /// Connection strings and addresses, for matching.
    pub fn endpoints(&self) -> [&str; 4] {
        [
            &self.internal_connection_str,
            &self.public_connection_str,
            &self.internal_ip,
            &self.public_ip,
        ]
    }
}

impl From<DbInstance> for DbInstanceDetail {
    fn from(instance: DbInstance) -> Self {
        Self::merge(instance, &[])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct AccountPrivilege {
    pub account: String,
    pub account_privilege: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct AccountPrivileges {
    pub account_privilege_info: Vec<AccountPrivilege>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Database {
    #[serde(rename = "DBName")]
    pub db_name: String,
    #[serde(rename = "DBStatus")]
    pub db_status: String,
    pub character_set_name: String,
    #[serde(rename = "DBDescription")]
    pub db_description: String,
    pub accounts: AccountPrivileges,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Database {
    pub fn accounts_label(&self) -> String {
        let names: Vec<&str> = self
            .accounts
            .account_privilege_info
            .iter()
            .map(|a| a.account.as_str())
            .collect();
        if names.is_empty() {
            "-".to_string()
        } else {
            names.join(", ")
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DatabasePrivilege {
    #[serde(rename = "DBName")]
    pub db_name: String,
    pub account_privilege: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DatabasePrivileges {
    pub database_privilege: Vec<DatabasePrivilege>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DbAccount {
    pub account_name: String,
    pub account_type: String,
    pub account_status: String,
    pub account_description: String,
    pub database_privileges: DatabasePrivileges,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DbAccount {
    pub fn privileges_label(&self) -> String {
        let grants: Vec<String> = self
            .database_privileges
            .database_privilege
            .iter()
            .map(|p| format!("{}({})", p.db_name, p.account_privilege))
            .collect();
        if grants.is_empty() {
            "-".to_string()
        } else {
            grants.join(", ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn net_info(ip_type: &str, conn: &str, ip: &str) -> NetInfo {
        NetInfo {
            connection_string: conn.to_string(),
            ip_address: ip.to_string(),
            ip_type: ip_type.to_string(),
            ..NetInfo::default()
        }
    }

    #[test]
    fn test_merge_net_info() {
        let instance = DbInstance {
            db_instance_id: "rm-1".to_string(),
            connection_string: "rm-1.mysql.rds.aliyuncs.com".to_string(),
            ..DbInstance::default()
        };
        let detail = DbInstanceDetail::merge(
            instance,
            &[
                net_info("Private", "rm-1-in.mysql.rds.aliyuncs.com", "10.0.0.8"),
                net_info("Public", "rm-1-pub.mysql.rds.aliyuncs.com", "47.0.0.8"),
            ],
        );
        assert_eq!(detail.internal_connection_str, "rm-1-in.mysql.rds.aliyuncs.com");
        assert_eq!(detail.internal_ip, "10.0.0.8");
        assert_eq!(detail.public_ip, "47.0.0.8");
    }

    #[test]
    fn test_merge_without_net_info_keeps_connection_string() {
        let instance = DbInstance {
            connection_string: "rm-2.mysql.rds.aliyuncs.com".to_string(),
            ..DbInstance::default()
        };
        let detail = DbInstanceDetail::from(instance);
        assert_eq!(detail.internal_connection_str, "rm-2.mysql.rds.aliyuncs.com");
        assert!(detail.public_connection_str.is_empty());
    }

    #[test]
    fn test_detail_serializes_flat() {
        let instance: DbInstance = serde_json::from_value(json!({
            "DBInstanceId": "rm-3",
            "Engine": "MySQL"
        }))
        .unwrap();
        let value = serde_json::to_value(DbInstanceDetail::from(instance)).unwrap();
        assert_eq!(value["DBInstanceId"], "rm-3");
        assert_eq!(value["InternalIP"], "");
    }

    #[test]
    fn test_account_privileges_label() {
        let account: DbAccount = serde_json::from_value(json!({
            "AccountName": "app",
            "DatabasePrivileges": {"DatabasePrivilege": [
                {"DBName": "orders", "AccountPrivilege": "ReadWrite"}
            ]}
        }))
        .unwrap();
        assert_eq!(account.privileges_label(), "orders(ReadWrite)");
    }
}
