use std::collections::HashMap;
use std::fmt;

use crate::model::{CacheInstance, DbInstanceDetail, DnsRecord, Instance, LoadBalancer, NetworkInterface};

/// Resource categories the finder searches, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Compute,
    Interface,
    LoadBalancer,
    Dns,
    Database,
    Cache,
}

impl Category {
    pub const ALL: [Self; 6] = [
        Self::Compute,
        Self::Interface,
        Self::LoadBalancer,
        Self::Dns,
        Self::Database,
        Self::Cache,
    ];

    pub const fn title(self) -> &'static str {
        match self {
            Self::Compute => "ECS Instances",
            Self::Interface => "Network Interfaces (ENI)",
            Self::LoadBalancer => "SLB Instances",
            Self::Dns => "DNS Records",
            Self::Database => "RDS Instances",
            Self::Cache => "Redis Instances",
        }
    }
}

/// How a category's lookup ended.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryStatus {
    #[default]
    Complete,
    Failed(String),
    TimedOut,
    Cancelled,
}

impl CategoryStatus {
    /// Short marker shown next to a section whose results are partial.
    pub const fn marker(&self) -> Option<&'static str> {
        match self {
            Self::Complete => None,
            Self::Failed(_) => Some("failed"),
            Self::TimedOut => Some("timed out"),
            Self::Cancelled => Some("cancelled"),
        }
    }

    pub const fn is_complete(&self) -> bool {
        matches!(self, Self::Complete)
    }
}

impl fmt::Display for CategoryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Complete => write!(f, "complete"),
            Self::Failed(reason) => write!(f, "failed: {reason}"),
            Self::TimedOut => write!(f, "timed out"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// A DNS record together with the zone it lives in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsMatch {
    pub zone: String,
    pub record: DnsRecord,
}

impl DnsMatch {
    pub fn fqdn(&self) -> String {
        self.record.fqdn(&self.zone)
    }
}

/// Everything one finder query turned up.
#[derive(Debug, Clone, Default)]
pub struct FindResult {
    pub query: String,
    pub resolved_ips: Vec<String>,
    pub domain: String,
    pub instances: Vec<Instance>,
    pub interfaces: Vec<NetworkInterface>,
    pub load_balancers: Vec<LoadBalancer>,
    pub dns_records: Vec<DnsMatch>,
    pub db_instances: Vec<DbInstanceDetail>,
    pub cache_instances: Vec<CacheInstance>,
    statuses: HashMap<Category, CategoryStatus>,
}

impl FindResult {
    pub fn new(query: impl Into<String>, resolved_ips: Vec<String>, domain: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            resolved_ips,
            domain: domain.into(),
            ..Self::default()
        }
    }

    pub fn count(&self, category: Category) -> usize {
        match category {
            Category::Compute => self.instances.len(),
            Category::Interface => self.interfaces.len(),
            Category::LoadBalancer => self.load_balancers.len(),
            Category::Dns => self.dns_records.len(),
            Category::Database => self.db_instances.len(),
            Category::Cache => self.cache_instances.len(),
        }
    }

    pub fn total_count(&self) -> usize {
        Category::ALL.iter().map(|c| self.count(*c)).sum()
    }

    pub fn has_results(&self) -> bool {
        self.total_count() > 0
    }

    /// Categories never recorded count as complete.
    pub fn status(&self, category: Category) -> CategoryStatus {
        self.statuses.get(&category).cloned().unwrap_or_default()
    }

    pub fn set_status(&mut self, category: Category, status: CategoryStatus) {
        self.statuses.insert(category, status);
    }

    pub fn is_partial(&self) -> bool {
        self.statuses.values().any(|s| !s.is_complete())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_count_sums_sections() {
        let mut result = FindResult::new("10.0.0.5", vec!["10.0.0.5".to_string()], "");
        assert!(!result.has_results());
        result.instances.push(Instance::default());
        result.cache_instances.push(CacheInstance::default());
        result.cache_instances.push(CacheInstance::default());
        assert_eq!(result.total_count(), 3);
        assert_eq!(result.count(Category::Cache), 2);
        assert!(result.has_results());
    }

    #[test]
    fn test_status_defaults_to_complete() {
        let mut result = FindResult::default();
        assert!(result.status(Category::Dns).is_complete());
        assert!(!result.is_partial());
        result.set_status(Category::Dns, CategoryStatus::TimedOut);
        assert_eq!(result.status(Category::Dns).marker(), Some("timed out"));
        assert!(result.is_partial());
    }
}
