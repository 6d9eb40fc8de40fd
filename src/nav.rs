//! Page identifiers and back navigation.

/// One full-screen view. Pages carry no state; the router keeps it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Menu,
    EcsInstances,
    EcsDetail,
    EcsJson,
    EcsDisks,
    EcsInterfaces,
    EcsSecurityGroups,
    SecurityGroups,
    SecurityGroupRules,
    SecurityGroupInstances,
    DnsDomains,
    DnsRecords,
    SlbInstances,
    SlbDetail,
    SlbListeners,
    SlbVServerGroups,
    SlbBackendServers,
    OssBuckets,
    OssObjects,
    OssObjectDetail,
    RdsInstances,
    RdsDetail,
    RdsDatabases,
    RdsAccounts,
    RedisInstances,
    RedisDetail,
    RedisAccounts,
    RocketMqInstances,
    RocketMqDetail,
    RocketMqTopics,
    RocketMqGroups,
    FinderResults,
    Detail,
}

impl Page {
    pub const fn title(self) -> &'static str {
        match self {
            Self::Menu => "Main Menu",
            Self::EcsInstances => "ECS Instances",
            Self::EcsDetail => "ECS Detail",
            Self::EcsJson => "ECS JSON Detail",
            Self::EcsDisks => "ECS Disks",
            Self::EcsInterfaces => "ECS Network Interfaces",
            Self::EcsSecurityGroups => "ECS Security Groups",
            Self::SecurityGroups => "Security Groups",
            Self::SecurityGroupRules => "Security Group Rules",
            Self::SecurityGroupInstances => "Security Group Instances",
            Self::DnsDomains => "DNS Domains",
            Self::DnsRecords => "DNS Records",
            Self::SlbInstances => "SLB Instances",
            Self::SlbDetail => "SLB Detail",
            Self::SlbListeners => "SLB Listeners",
            Self::SlbVServerGroups => "SLB VServer Groups",
            Self::SlbBackendServers => "SLB Backend Servers",
            Self::OssBuckets => "OSS Buckets",
            Self::OssObjects => "OSS Objects",
            Self::OssObjectDetail => "OSS Object Detail",
            Self::RdsInstances => "RDS Instances",
            Self::RdsDetail => "RDS Detail",
            Self::RdsDatabases => "RDS Databases",
            Self::RdsAccounts => "RDS Accounts",
            Self::RedisInstances => "Redis Instances",
            Self::RedisDetail => "Redis Detail",
            Self::RedisAccounts => "Redis Accounts",
            Self::RocketMqInstances => "RocketMQ Instances",
            Self::RocketMqDetail => "RocketMQ Detail",
            Self::RocketMqTopics => "RocketMQ Topics",
            Self::RocketMqGroups => "RocketMQ Groups",
            Self::FinderResults => "Finder Results",
            Self::Detail => "Detail",
        }
    }

    /// Whether entering the page needs a round trip to the cloud.
    pub const fn needs_fetch(self) -> bool {
        !matches!(
            self,
            Self::Menu
                | Self::EcsDetail
                | Self::EcsJson
                | Self::SlbDetail
                | Self::OssObjectDetail
                | Self::RdsDetail
                | Self::RedisDetail
                | Self::RocketMqDetail
                | Self::Detail
        )
    }
}

/// LIFO history of suspended entries.
///
/// Generic so the router can park a whole page (identifier plus its state)
/// and get it back untouched.
#[derive(Debug)]
pub struct NavigationStack<T> {
    entries: Vec<T>,
}

impl<T> Default for NavigationStack<T> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<T> NavigationStack<T> {
    pub fn push(&mut self, entry: T) {
        self.entries.push(entry);
    }

    pub fn pop(&mut self) -> Option<T> {
        self.entries.pop()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[cfg(test)]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Oldest entry first.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal model of the router's navigate/back contract.
    struct Nav {
        current: Page,
        stack: NavigationStack<Page>,
    }

    impl Nav {
        fn navigate(&mut self, page: Page) {
            self.stack.push(self.current);
            self.current = page;
        }

        fn back(&mut self) {
            if let Some(page) = self.stack.pop() {
                self.current = page;
            }
        }
    }

    #[test]
    fn test_back_restores_in_lifo_order() {
        let mut nav = Nav {
            current: Page::Menu,
            stack: NavigationStack::default(),
        };
        nav.navigate(Page::EcsInstances);
        nav.navigate(Page::EcsDetail);
        nav.back();
        assert_eq!(nav.current, Page::EcsInstances);
        nav.back();
        assert_eq!(nav.current, Page::Menu);
        nav.back();
        assert_eq!(nav.current, Page::Menu);
        assert!(nav.stack.is_empty());
    }

    #[test]
    fn test_clear_drops_history() {
        let mut stack = NavigationStack::default();
        stack.push(Page::Menu);
        stack.push(Page::OssBuckets);
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.iter().copied().collect::<Vec<_>>(), vec![Page::Menu, Page::OssBuckets]);
        stack.clear();
        assert!(stack.pop().is_none());
    }

    #[test]
    fn test_detail_pages_build_without_fetch() {
        assert!(!Page::EcsDetail.needs_fetch());
        assert!(!Page::Detail.needs_fetch());
        assert!(Page::EcsDisks.needs_fetch());
        assert!(Page::FinderResults.needs_fetch());
    }
}
