//! Resource-fetch collaborators.
//!
//! The UI and the finder only talk to Alibaba Cloud through [`ResourceApi`]
//! and [`DnsZones`]. [`aliyun::AliyunCli`] is the production implementation.

pub mod aliyun;
#[cfg(test)]
pub mod fixture;

use std::net::IpAddr;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use tracing::debug;

use crate::model::{
    BackendServer, Bucket, CacheAccount, CacheInstance, ConsumerGroup, Database, DbAccount,
    DbInstance, DbInstanceDetail, Disk, DnsRecord, Domain, Instance, Listener, LoadBalancer,
    NetInfo, NetworkInterface, ObjectPage, QueueInstance, SecurityGroup, SecurityGroupRule, Topic,
    VServerGroup,
};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("`{binary}` was not found, install the Alibaba Cloud CLI or set aliyun.binary")]
    MissingBinary { binary: String },
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{command}` failed: {stderr}")]
    Cli { command: String, stderr: String },
    #[error("unexpected output from `{command}`: {source}")]
    Decode {
        command: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("`{0}` is not available for this profile or region")]
    Unsupported(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Managed DNS zones, the only collaborator the finder's resolve step needs.
#[async_trait]
pub trait DnsZones: Send + Sync {
    async fn domains(&self) -> ApiResult<Vec<Domain>>;

    async fn domain_records(&self, domain: &str) -> ApiResult<Vec<DnsRecord>>;
}

/// Read-only access to every resource category for one profile and region.
///
/// Listing calls return the complete, already paginated result.
#[async_trait]
pub trait ResourceApi: DnsZones {
    fn profile(&self) -> &str;

    fn region(&self) -> &str;

    /// Same backend, bound to another profile and region.
    fn scoped(&self, profile: &str, region: &str) -> Arc<dyn ResourceApi>;

    async fn regions(&self) -> ApiResult<Vec<String>>;

    async fn instances(&self) -> ApiResult<Vec<Instance>>;

    async fn security_groups(&self) -> ApiResult<Vec<SecurityGroup>>;

    async fn security_groups_by_ids(&self, ids: &[String]) -> ApiResult<Vec<SecurityGroup>>;

    async fn security_group_rules(&self, group_id: &str) -> ApiResult<Vec<SecurityGroupRule>>;

    async fn security_group_instances(&self, group_id: &str) -> ApiResult<Vec<Instance>>;

    async fn disks(&self, instance_id: &str) -> ApiResult<Vec<Disk>>;

    async fn instance_interfaces(&self, instance_id: &str) -> ApiResult<Vec<NetworkInterface>>;

    async fn load_balancers(&self) -> ApiResult<Vec<LoadBalancer>>;

    async fn listeners(&self, load_balancer_id: &str) -> ApiResult<Vec<Listener>>;

    async fn vserver_groups(&self, load_balancer_id: &str) -> ApiResult<Vec<VServerGroup>>;

    async fn backend_servers(&self, vserver_group_id: &str) -> ApiResult<Vec<BackendServer>>;

    async fn buckets(&self) -> ApiResult<Vec<Bucket>>;

    async fn objects(&self, bucket: &str, marker: Option<&str>, limit: usize)
    -> ApiResult<ObjectPage>;

    async fn db_instances(&self) -> ApiResult<Vec<DbInstance>>;

    async fn db_net_info(&self, db_instance_id: &str) -> ApiResult<Vec<NetInfo>>;

    async fn databases(&self, db_instance_id: &str) -> ApiResult<Vec<Database>>;

    async fn db_accounts(&self, db_instance_id: &str) -> ApiResult<Vec<DbAccount>>;

    async fn cache_instances(&self) -> ApiResult<Vec<CacheInstance>>;

    async fn cache_accounts(&self, instance_id: &str) -> ApiResult<Vec<CacheAccount>>;

    async fn queue_instances(&self) -> ApiResult<Vec<QueueInstance>>;

    async fn topics(&self, instance_id: &str) -> ApiResult<Vec<Topic>>;

    async fn consumer_groups(&self, instance_id: &str) -> ApiResult<Vec<ConsumerGroup>>;

    /// Database instances with their endpoints merged in. Net info lookups run
    /// concurrently; an instance whose lookup fails keeps its listing data.
    async fn db_instance_details(&self) -> ApiResult<Vec<DbInstanceDetail>> {
        let instances = self.db_instances().await?;
        let details = join_all(instances.into_iter().map(|instance| async move {
            let net_infos = self
                .db_net_info(&instance.db_instance_id)
                .await
                .unwrap_or_else(|e| {
                    debug!(instance = %instance.db_instance_id, error = %e, "Skipping net info");
                    Vec::new()
                });
            DbInstanceDetail::merge(instance, &net_infos)
        }))
        .await;
        Ok(details)
    }
}

/// System name resolution, used when no managed zone knows a domain.
#[async_trait]
pub trait HostResolver: Send + Sync {
    async fn lookup(&self, host: &str) -> std::io::Result<Vec<IpAddr>>;
}

pub struct SystemResolver;

#[async_trait]
impl HostResolver for SystemResolver {
    async fn lookup(&self, host: &str) -> std::io::Result<Vec<IpAddr>> {
        let addrs = tokio::net::lookup_host((host, 0)).await?;
        let mut ips: Vec<IpAddr> = Vec::new();
        for addr in addrs {
            if !ips.contains(&addr.ip()) {
                ips.push(addr.ip());
            }
        }
        Ok(ips)
    }
}
