//! In-memory [`ResourceApi`] for tests.

use std::collections::{HashMap, HashSet};
use std::net::IpAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::model::{
    BackendServer, Bucket, CacheAccount, CacheInstance, ConsumerGroup, Database, DbAccount,
    DbInstance, Disk, DnsRecord, Domain, Instance, Listener, LoadBalancer, NetInfo,
    NetworkInterface, ObjectPage, ObjectSummary, QueueInstance, SecurityGroup, SecurityGroupRule,
    Topic, VServerGroup,
};
use crate::provider::{ApiError, ApiResult, DnsZones, HostResolver, ResourceApi};

/// Canned data keyed by call. `fail` and `stall` make a call error out or
/// never finish, which is how finder tests simulate broken categories.
#[derive(Clone, Default)]
pub struct StaticApi {
    pub profile: String,
    pub region: String,
    pub regions: Vec<String>,
    pub instances: Vec<Instance>,
    pub security_groups: Vec<SecurityGroup>,
    pub rules: Vec<SecurityGroupRule>,
    pub disks: Vec<Disk>,
    pub interfaces: HashMap<String, Vec<NetworkInterface>>,
    pub load_balancers: Vec<LoadBalancer>,
    pub listeners: Vec<Listener>,
    pub vserver_groups: Vec<VServerGroup>,
    pub backend_servers: Vec<BackendServer>,
    pub buckets: Vec<Bucket>,
    pub objects: Vec<ObjectSummary>,
    pub db_instances: Vec<DbInstance>,
    pub net_infos: HashMap<String, Vec<NetInfo>>,
    pub databases: Vec<Database>,
    pub db_accounts: Vec<DbAccount>,
    pub cache_instances: Vec<CacheInstance>,
    pub cache_accounts: Vec<CacheAccount>,
    pub queue_instances: Vec<QueueInstance>,
    pub topics: Vec<Topic>,
    pub consumer_groups: Vec<ConsumerGroup>,
    pub domains: Vec<Domain>,
    pub records: HashMap<String, Vec<DnsRecord>>,
    pub failing: HashSet<&'static str>,
    pub stalled: HashSet<&'static str>,
    pub calls: Arc<AtomicUsize>,
}

impl StaticApi {
    pub fn fail(&mut self, call: &'static str) {
        self.failing.insert(call);
    }

    pub fn stall(&mut self, call: &'static str) {
        self.stalled.insert(call);
    }

    /// Number of DNS zone calls made so far, across clones.
    pub fn dns_calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn gate(&self, call: &'static str) -> ApiResult<()> {
        if self.stalled.contains(call) {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        if self.failing.contains(call) {
            return Err(ApiError::Cli {
                command: call.to_string(),
                stderr: "injected failure".to_string(),
            });
        }
        Ok(())
    }

    async fn list<T: Clone>(&self, call: &'static str, items: &[T]) -> ApiResult<Vec<T>> {
        self.gate(call).await?;
        Ok(items.to_vec())
    }
}

#[async_trait]
impl DnsZones for StaticApi {
    async fn domains(&self) -> ApiResult<Vec<Domain>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.list("domains", &self.domains).await
    }

    async fn domain_records(&self, domain: &str) -> ApiResult<Vec<DnsRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.gate("domain_records").await?;
        Ok(self.records.get(domain).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl ResourceApi for StaticApi {
    fn profile(&self) -> &str {
        &self.profile
    }

    fn region(&self) -> &str {
        &self.region
    }

    fn scoped(&self, profile: &str, region: &str) -> Arc<dyn ResourceApi> {
        let mut api = self.clone();
        api.profile = profile.to_string();
        api.region = region.to_string();
        Arc::new(api)
    }

    async fn regions(&self) -> ApiResult<Vec<String>> {
        self.list("regions", &self.regions).await
    }

    async fn instances(&self) -> ApiResult<Vec<Instance>> {
        self.list("instances", &self.instances).await
    }

    async fn security_groups(&self) -> ApiResult<Vec<SecurityGroup>> {
        self.list("security_groups", &self.security_groups).await
    }

    async fn security_groups_by_ids(&self, ids: &[String]) -> ApiResult<Vec<SecurityGroup>> {
        self.gate("security_groups_by_ids").await?;
        Ok(self
            .security_groups
            .iter()
            .filter(|g| ids.contains(&g.security_group_id))
            .cloned()
            .collect())
    }

    async fn security_group_rules(&self, _group_id: &str) -> ApiResult<Vec<SecurityGroupRule>> {
        self.list("security_group_rules", &self.rules).await
    }

    async fn security_group_instances(&self, group_id: &str) -> ApiResult<Vec<Instance>> {
        self.gate("security_group_instances").await?;
        Ok(self
            .instances
            .iter()
            .filter(|i| {
                i.security_group_ids
                    .security_group_id
                    .iter()
                    .any(|id| id == group_id)
            })
            .cloned()
            .collect())
    }

    async fn disks(&self, _instance_id: &str) -> ApiResult<Vec<Disk>> {
        self.list("disks", &self.disks).await
    }

    async fn instance_interfaces(&self, instance_id: &str) -> ApiResult<Vec<NetworkInterface>> {
        self.gate("instance_interfaces").await?;
        Ok(self.interfaces.get(instance_id).cloned().unwrap_or_default())
    }

    async fn load_balancers(&self) -> ApiResult<Vec<LoadBalancer>> {
        self.list("load_balancers", &self.load_balancers).await
    }

    async fn listeners(&self, _load_balancer_id: &str) -> ApiResult<Vec<Listener>> {
        self.list("listeners", &self.listeners).await
    }

    async fn vserver_groups(&self, _load_balancer_id: &str) -> ApiResult<Vec<VServerGroup>> {
        self.list("vserver_groups", &self.vserver_groups).await
    }

    async fn backend_servers(&self, _vserver_group_id: &str) -> ApiResult<Vec<BackendServer>> {
        self.list("backend_servers", &self.backend_servers).await
    }

    async fn buckets(&self) -> ApiResult<Vec<Bucket>> {
        self.list("buckets", &self.buckets).await
    }

    async fn objects(
        &self,
        _bucket: &str,
        marker: Option<&str>,
        limit: usize,
    ) -> ApiResult<ObjectPage> {
        self.gate("objects").await?;
        let start = marker.map_or(0, |m| {
            self.objects
                .iter()
                .position(|o| o.key == m)
                .map_or(self.objects.len(), |i| i + 1)
        });
        let objects: Vec<ObjectSummary> =
            self.objects.iter().skip(start).take(limit).cloned().collect();
        let next_marker = (objects.len() == limit)
            .then(|| objects.last().map(|o| o.key.clone()))
            .flatten();
        Ok(ObjectPage {
            objects,
            next_marker,
        })
    }

    async fn db_instances(&self) -> ApiResult<Vec<DbInstance>> {
        self.list("db_instances", &self.db_instances).await
    }

    async fn db_net_info(&self, db_instance_id: &str) -> ApiResult<Vec<NetInfo>> {
        self.gate("db_net_info").await?;
        Ok(self.net_infos.get(db_instance_id).cloned().unwrap_or_default())
    }

    async fn databases(&self, _db_instance_id: &str) -> ApiResult<Vec<Database>> {
        self.list("databases", &self.databases).await
    }

    async fn db_accounts(&self, _db_instance_id: &str) -> ApiResult<Vec<DbAccount>> {
        self.list("db_accounts", &self.db_accounts).await
    }

    async fn cache_instances(&self) -> ApiResult<Vec<CacheInstance>> {
        self.list("cache_instances", &self.cache_instances).await
    }

    async fn cache_accounts(&self, _instance_id: &str) -> ApiResult<Vec<CacheAccount>> {
        self.list("cache_accounts", &self.cache_accounts).await
    }

    async fn queue_instances(&self) -> ApiResult<Vec<QueueInstance>> {
        self.list("queue_instances", &self.queue_instances).await
    }

    async fn topics(&self, _instance_id: &str) -> ApiResult<Vec<Topic>> {
        self.list("topics", &self.topics).await
    }

    async fn consumer_groups(&self, _instance_id: &str) -> ApiResult<Vec<ConsumerGroup>> {
        self.list("consumer_groups", &self.consumer_groups).await
    }
}

/// Resolver with a fixed answer that counts how often it is asked.
#[derive(Default)]
pub struct StaticResolver {
    pub answers: HashMap<String, Vec<IpAddr>>,
    pub lookups: AtomicUsize,
}

#[async_trait]
impl HostResolver for StaticResolver {
    async fn lookup(&self, host: &str) -> std::io::Result<Vec<IpAddr>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.answers.get(host).cloned().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, format!("no answer for {host}"))
        })
    }
}
