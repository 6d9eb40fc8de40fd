//! Per-category match predicates.
//!
//! IP matching is substring based, so `10.0.0.1` also matches a stored
//! `10.0.0.11`.

use crate::model::{CacheInstance, DbInstanceDetail, DnsRecord, Instance, LoadBalancer, NetworkInterface};
use crate::search::contains_ignore_case;

/// True when `target` contains any non-empty needle, ignoring case.
pub fn contains_any(target: &str, needles: &[String]) -> bool {
    !target.is_empty()
        && needles
            .iter()
            .any(|n| !n.is_empty() && contains_ignore_case(target, n))
}

fn contains_domain(target: &str, domain: &str) -> bool {
    !domain.is_empty() && contains_ignore_case(target, domain)
}

pub fn instance_matches(instance: &Instance, ips: &[String]) -> bool {
    instance.all_ips().any(|ip| contains_any(ip, ips))
}

pub fn interface_matches(interface: &NetworkInterface, ips: &[String]) -> bool {
    interface.all_ips().any(|ip| contains_any(ip, ips))
}

pub fn load_balancer_matches(load_balancer: &LoadBalancer, ips: &[String]) -> bool {
    contains_any(&load_balancer.address, ips)
}

pub fn database_matches(detail: &DbInstanceDetail, ips: &[String], domain: &str) -> bool {
    contains_domain(&detail.internal_connection_str, domain)
        || contains_domain(&detail.public_connection_str, domain)
        || detail.endpoints().iter().any(|e| contains_any(e, ips))
}

pub fn cache_matches(instance: &CacheInstance, ips: &[String], domain: &str) -> bool {
    contains_domain(&instance.connection_domain, domain) || contains_any(&instance.private_ip, ips)
}

/// A record matches when its value is one of the addresses, or when its value
/// or fully qualified name mentions the domain.
pub fn dns_record_matches(record: &DnsRecord, zone: &str, ips: &[String], domain: &str) -> bool {
    ips.iter()
        .any(|ip| !ip.is_empty() && record.value.eq_ignore_ascii_case(ip))
        || contains_domain(&record.value, domain)
        || contains_domain(&record.fqdn(zone), domain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DbInstance;
    use serde_json::json;

    fn ips(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_contains_any_skips_empty_needles() {
        assert!(!contains_any("10.0.0.1", &ips(&[""])));
        assert!(!contains_any("", &ips(&["10.0.0.1"])));
        assert!(contains_any("10.0.0.11", &ips(&["", "10.0.0.1"])));
    }

    #[test]
    fn test_instance_matches_any_address_field() {
        let instance: Instance = serde_json::from_value(json!({
            "VpcAttributes": {"PrivateIpAddress": {"IpAddress": ["172.16.0.4"]}},
            "EipAddress": {"IpAddress": "47.96.1.2"}
        }))
        .unwrap();
        assert!(instance_matches(&instance, &ips(&["47.96.1.2"])));
        assert!(instance_matches(&instance, &ips(&["172.16.0.4"])));
        assert!(!instance_matches(&instance, &ips(&["10.0.0.1"])));
        assert!(!instance_matches(&instance, &[]));
    }

    #[test]
    fn test_ip_substring_false_positive_is_kept() {
        let lb = LoadBalancer {
            address: "10.0.0.11".to_string(),
            ..LoadBalancer::default()
        };
        assert!(load_balancer_matches(&lb, &ips(&["10.0.0.1"])));
    }

    #[test]
    fn test_database_matches_connection_string_domain() {
        let detail = DbInstanceDetail::merge(
            DbInstance {
                connection_string: "rm-abc.mysql.rds.aliyuncs.com".to_string(),
                ..DbInstance::default()
            },
            &[],
        );
        assert!(database_matches(&detail, &[], "RM-ABC.mysql"));
        assert!(!database_matches(&detail, &[], ""));
        assert!(!database_matches(&detail, &ips(&["10.0.0.1"]), "other.com"));
    }

    #[test]
    fn test_cache_matches_domain_or_private_ip() {
        let instance = CacheInstance {
            connection_domain: "r-bp1.redis.rds.aliyuncs.com".to_string(),
            private_ip: "10.1.2.3".to_string(),
            ..CacheInstance::default()
        };
        assert!(cache_matches(&instance, &[], "r-bp1.redis"));
        assert!(cache_matches(&instance, &ips(&["10.1.2.3"]), ""));
        assert!(!cache_matches(&instance, &ips(&["10.9.9.9"]), ""));
    }

    #[test]
    fn test_dns_record_matches() {
        let record = DnsRecord {
            rr: "api".to_string(),
            kind: "A".to_string(),
            value: "10.0.0.5".to_string(),
            ..DnsRecord::default()
        };
        assert!(dns_record_matches(&record, "example.com", &ips(&["10.0.0.5"]), ""));
        assert!(!dns_record_matches(&record, "example.com", &ips(&["10.0.0.50"]), ""));
        assert!(dns_record_matches(&record, "example.com", &[], "api.example.com"));
        assert!(!dns_record_matches(&record, "example.com", &[], ""));

        let cname = DnsRecord {
            rr: "www".to_string(),
            kind: "CNAME".to_string(),
            value: "lb.example.net".to_string(),
            ..DnsRecord::default()
        };
        assert!(dns_record_matches(&cname, "example.com", &[], "lb.example.net"));
    }
}
