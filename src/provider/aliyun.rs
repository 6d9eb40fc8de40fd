//! [`ResourceApi`] backed by the `aliyun` command line tool.
//!
//! Every call runs the CLI as a child process with the session's profile and
//! region and decodes its JSON output. Object storage listings come from
//! `aliyun oss ls`, which prints text rather than JSON.

pub mod config;

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::model::{
    BackendServer, Bucket, CacheAccount, CacheInstance, ConsumerGroup, Database, DbAccount,
    DbInstance, Disk, DnsRecord, Domain, Instance, Listener, LoadBalancer, NetInfo,
    NetworkInterface, ObjectPage, ObjectSummary, QueueInstance, SecurityGroup, SecurityGroupRule,
    Topic, VServerGroup,
};
use crate::provider::{ApiError, ApiResult, DnsZones, ResourceApi};

const PAGE_SIZE: usize = 100;
const REGION_SEARCH_PAGE_SIZE: usize = 500;

#[derive(Debug, Clone)]
pub struct AliyunCli {
    binary: String,
    profile: String,
    region: String,
}

type Args = Vec<(&'static str, String)>;

/// Error codes for APIs the product or region does not offer.
const UNSUPPORTED_CODES: &[&str] = &[
    "InvalidAction.NotFound",
    "InvalidApi.NotFound",
    "UnsupportedOperation",
    "Unsupported.Region",
];

fn cli_error(command: String, stderr: String) -> ApiError {
    if UNSUPPORTED_CODES.iter().any(|code| stderr.contains(code)) {
        ApiError::Unsupported(command)
    } else {
        ApiError::Cli { command, stderr }
    }
}

impl AliyunCli {
    pub fn new(
        binary: impl Into<String>,
        profile: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            binary: binary.into(),
            profile: profile.into(),
            region: region.into(),
        }
    }

    fn describe(&self, product: &str, api: &str) -> String {
        format!("{} {product} {api}", self.binary)
    }

    async fn run(&self, mut command: Command, description: String) -> ApiResult<Vec<u8>> {
        debug!(command = %description, profile = %self.profile, region = %self.region, "Running aliyun CLI");
        let output = command.output().await.map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ApiError::MissingBinary {
                    binary: self.binary.clone(),
                }
            } else {
                ApiError::Spawn {
                    command: description.clone(),
                    source,
                }
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let stderr = if stderr.is_empty() {
                String::from_utf8_lossy(&output.stdout).trim().to_string()
            } else {
                stderr
            };
            warn!(command = %description, status = ?output.status.code(), "aliyun CLI call failed");
            return Err(cli_error(description, stderr));
        }
        Ok(output.stdout)
    }

    /// One RPC call. Parameters are passed as `--Name value`.
    async fn call(&self, product: &str, api: &str, args: &[(&str, String)]) -> ApiResult<Value> {
        let description = self.describe(product, api);
        let mut command = Command::new(&self.binary);
        command
            .arg(product)
            .arg(api)
            .arg("--profile")
            .arg(&self.profile)
            .arg("--region")
            .arg(&self.region)
            .kill_on_drop(true);
        for (name, value) in args {
            command.arg(format!("--{name}")).arg(value);
        }
        let stdout = self.run(command, description.clone()).await?;
        serde_json::from_slice(&stdout).map_err(|source| ApiError::Decode {
            command: description,
            source,
        })
    }

    /// Call a regional API, adding `RegionId` to the parameters.
    async fn regional(&self, product: &str, api: &str, args: Args) -> ApiResult<Value> {
        self.call(product, api, &self.in_region(args)).await
    }

    fn in_region(&self, mut args: Args) -> Args {
        args.push(("RegionId", self.region.clone()));
        args
    }

    /// Walk `PageNumber`/`PageSize` until a short page or the reported total.
    /// Regional APIs must carry `RegionId` in `args` already.
    async fn paged<T: DeserializeOwned>(
        &self,
        product: &str,
        api: &str,
        args: Args,
        pointer: &str,
    ) -> ApiResult<Vec<T>> {
        let mut all = Vec::new();
        let mut page_number = 1;
        loop {
            let mut page_args = args.clone();
            page_args.push(("PageNumber", page_number.to_string()));
            page_args.push(("PageSize", PAGE_SIZE.to_string()));
            let response = self.call(product, api, &page_args).await?;

            let page: Vec<T> = items(&response, pointer, &self.describe(product, api))?;
            let count = page.len();
            all.extend(page);

            let total = ["/TotalCount", "/TotalRecordCount"]
                .iter()
                .find_map(|p| response.pointer(p).and_then(Value::as_u64));
            if count < PAGE_SIZE || total.is_some_and(|t| all.len() as u64 >= t) {
                break;
            }
            page_number += 1;
        }
        Ok(all)
    }

    async fn instances_by_ids(&self, ids: &[String]) -> ApiResult<Vec<Instance>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids = serde_json::to_string(ids).unwrap_or_default();
        self.paged(
            "ecs",
            "DescribeInstances",
            self.in_region(vec![("InstanceIds", ids)]),
            "/Instances/Instance",
        )
        .await
    }

    fn oss_command(&self) -> Command {
        let mut command = Command::new(&self.binary);
        command
            .args(["oss", "ls", "--profile"])
            .arg(&self.profile)
            .kill_on_drop(true);
        command
    }
}

/// Decode the array at `pointer`. A missing array means no items.
fn items<T: DeserializeOwned>(value: &Value, pointer: &str, command: &str) -> ApiResult<Vec<T>> {
    match value.pointer(pointer) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(array) => serde_json::from_value(array.clone()).map_err(|source| ApiError::Decode {
            command: command.to_string(),
            source,
        }),
    }
}

/// Tokens before the `oss://` URL and the URL itself.
fn split_oss_line(line: &str) -> Option<(Vec<&str>, &str)> {
    let start = line.find("oss://")?;
    let (head, url) = line.split_at(start);
    Some((head.split_whitespace().collect(), url.trim_end()))
}

/// Parse `aliyun oss ls` bucket output:
/// `CreationTime Region StorageClass BucketName`, where the time spans four
/// whitespace separated tokens.
fn parse_bucket_listing(output: &str) -> Vec<Bucket> {
    output
        .lines()
        .filter_map(split_oss_line)
        .filter(|(head, _)| head.len() >= 6)
        .map(|(head, url)| Bucket {
            name: url.trim_start_matches("oss://").trim_end_matches('/').to_string(),
            creation_date: head[..4].join(" "),
            location: head[4].to_string(),
            storage_class: head[5].to_string(),
        })
        .collect()
}

/// Parse `aliyun oss ls oss://bucket` object output:
/// `LastModifiedTime Size(B) StorageClass ETAG ObjectName`.
fn parse_object_listing(output: &str, bucket: &str) -> Vec<ObjectSummary> {
    let prefix = format!("oss://{bucket}/");
    output
        .lines()
        .filter_map(split_oss_line)
        .filter(|(head, _)| head.len() >= 7)
        .map(|(head, url)| ObjectSummary {
            bucket: bucket.to_string(),
            key: url.strip_prefix(&prefix).unwrap_or(url).to_string(),
            last_modified: head[..4].join(" "),
            size: head[4].parse().unwrap_or_default(),
            storage_class: head[5].to_string(),
            etag: head[6].to_string(),
        })
        .collect()
}

#[async_trait]
impl DnsZones for AliyunCli {
    async fn domains(&self) -> ApiResult<Vec<Domain>> {
        self.paged("alidns", "DescribeDomains", Vec::new(), "/Domains/Domain")
            .await
    }

    async fn domain_records(&self, domain: &str) -> ApiResult<Vec<DnsRecord>> {
        let mut records: Vec<DnsRecord> = self
            .paged(
                "alidns",
                "DescribeDomainRecords",
                vec![("DomainName", domain.to_string())],
                "/DomainRecords/Record",
            )
            .await?;
        for record in &mut records {
            if record.domain_name.is_empty() {
                record.domain_name = domain.to_string();
            }
        }
        Ok(records)
    }
}

#[async_trait]
impl ResourceApi for AliyunCli {
    fn profile(&self) -> &str {
        &self.profile
    }

    fn region(&self) -> &str {
        &self.region
    }

    fn scoped(&self, profile: &str, region: &str) -> Arc<dyn ResourceApi> {
        Arc::new(Self::new(self.binary.clone(), profile, region))
    }

    async fn regions(&self) -> ApiResult<Vec<String>> {
        let mut regions = BTreeSet::new();
        let mut next_token = String::new();
        loop {
            let mut args = vec![("MaxResults", REGION_SEARCH_PAGE_SIZE.to_string())];
            if !next_token.is_empty() {
                args.push(("NextToken", next_token.clone()));
            }
            let response = self.call("resourcecenter", "SearchResources", &args).await?;
            if let Some(resources) = response.pointer("/Resources").and_then(Value::as_array) {
                regions.extend(
                    resources
                        .iter()
                        .filter_map(|r| r.get("RegionId").and_then(Value::as_str))
                        .filter(|r| !r.is_empty())
                        .map(str::to_string),
                );
            }
            next_token = response
                .get("NextToken")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            if next_token.is_empty() {
                break;
            }
        }
        Ok(regions.into_iter().collect())
    }

    async fn instances(&self) -> ApiResult<Vec<Instance>> {
        self.paged(
            "ecs",
            "DescribeInstances",
            self.in_region(Vec::new()),
            "/Instances/Instance",
        )
        .await
    }

    async fn security_groups(&self) -> ApiResult<Vec<SecurityGroup>> {
        self.paged(
            "ecs",
            "DescribeSecurityGroups",
            self.in_region(Vec::new()),
            "/SecurityGroups/SecurityGroup",
        )
        .await
    }

    async fn security_groups_by_ids(&self, ids: &[String]) -> ApiResult<Vec<SecurityGroup>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids = serde_json::to_string(ids).unwrap_or_default();
        self.paged(
            "ecs",
            "DescribeSecurityGroups",
            self.in_region(vec![("SecurityGroupIds", ids)]),
            "/SecurityGroups/SecurityGroup",
        )
        .await
    }

    async fn security_group_rules(&self, group_id: &str) -> ApiResult<Vec<SecurityGroupRule>> {
        let response = self
            .regional(
                "ecs",
                "DescribeSecurityGroupAttribute",
                vec![("SecurityGroupId", group_id.to_string())],
            )
            .await?;
        items(
            &response,
            "/Permissions/Permission",
            &self.describe("ecs", "DescribeSecurityGroupAttribute"),
        )
    }

    async fn security_group_instances(&self, group_id: &str) -> ApiResult<Vec<Instance>> {
        self.paged(
            "ecs",
            "DescribeInstances",
            self.in_region(vec![("SecurityGroupId", group_id.to_string())]),
            "/Instances/Instance",
        )
        .await
    }

    async fn disks(&self, instance_id: &str) -> ApiResult<Vec<Disk>> {
        self.paged(
            "ecs",
            "DescribeDisks",
            self.in_region(vec![("InstanceId", instance_id.to_string())]),
            "/Disks/Disk",
        )
        .await
    }

    async fn instance_interfaces(&self, instance_id: &str) -> ApiResult<Vec<NetworkInterface>> {
        self.paged(
            "ecs",
            "DescribeNetworkInterfaces",
            self.in_region(vec![("InstanceId", instance_id.to_string())]),
            "/NetworkInterfaceSets/NetworkInterfaceSet",
        )
        .await
    }

    async fn load_balancers(&self) -> ApiResult<Vec<LoadBalancer>> {
        self.paged(
            "slb",
            "DescribeLoadBalancers",
            self.in_region(Vec::new()),
            "/LoadBalancers/LoadBalancer",
        )
        .await
    }

    async fn listeners(&self, load_balancer_id: &str) -> ApiResult<Vec<Listener>> {
        let api = "DescribeLoadBalancerListeners";
        let mut all = Vec::new();
        let mut next_token = String::new();
        loop {
            let mut args = vec![
                ("LoadBalancerId.1", load_balancer_id.to_string()),
                ("MaxResults", PAGE_SIZE.to_string()),
            ];
            if !next_token.is_empty() {
                args.push(("NextToken", next_token.clone()));
            }
            let response = self.regional("slb", api, args).await?;
            all.extend(items::<Listener>(&response, "/Listeners", &self.describe("slb", api))?);
            next_token = response
                .get("NextToken")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            if next_token.is_empty() {
                break;
            }
        }
        Ok(all)
    }

    async fn vserver_groups(&self, load_balancer_id: &str) -> ApiResult<Vec<VServerGroup>> {
        let api = "DescribeVServerGroups";
        let response = self
            .regional(
                "slb",
                api,
                vec![
                    ("LoadBalancerId", load_balancer_id.to_string()),
                    ("IncludeListener", "true".to_string()),
                ],
            )
            .await?;
        items(&response, "/VServerGroups/VServerGroup", &self.describe("slb", api))
    }

    /// Group members, joined with the ECS instances they point at so the
    /// table can show names and addresses.
    async fn backend_servers(&self, vserver_group_id: &str) -> ApiResult<Vec<BackendServer>> {
        let api = "DescribeVServerGroupAttribute";
        let response = self
            .regional(
                "slb",
                api,
                vec![("VServerGroupId", vserver_group_id.to_string())],
            )
            .await?;
        let mut servers: Vec<BackendServer> =
            items(&response, "/BackendServers/BackendServer", &self.describe("slb", api))?;

        let ids: Vec<String> = servers
            .iter()
            .filter(|s| s.kind.is_empty() || s.kind == "ecs")
            .map(|s| s.server_id.clone())
            .collect();
        match self.instances_by_ids(&ids).await {
            Ok(instances) => {
                for server in &mut servers {
                    if let Some(inst) = instances.iter().find(|i| i.instance_id == server.server_id)
                    {
                        server.instance_name.clone_from(&inst.instance_name);
                        server.private_ip_address = inst.private_ip().to_string();
                        server.public_ip_address = inst.public_ip().to_string();
                    }
                }
            }
            Err(e) => warn!(group = vserver_group_id, error = %e, "Could not resolve backend instances"),
        }
        Ok(servers)
    }

    async fn buckets(&self) -> ApiResult<Vec<Bucket>> {
        let stdout = self
            .run(self.oss_command(), format!("{} oss ls", self.binary))
            .await?;
        Ok(parse_bucket_listing(&String::from_utf8_lossy(&stdout)))
    }

    async fn objects(
        &self,
        bucket: &str,
        marker: Option<&str>,
        limit: usize,
    ) -> ApiResult<ObjectPage> {
        let mut command = self.oss_command();
        command
            .arg(format!("oss://{bucket}"))
            .arg("--limited-num")
            .arg(limit.to_string());
        if let Some(marker) = marker.filter(|m| !m.is_empty()) {
            command.arg("--marker").arg(marker);
        }
        let stdout = self
            .run(command, format!("{} oss ls oss://{bucket}", self.binary))
            .await?;
        let objects = parse_object_listing(&String::from_utf8_lossy(&stdout), bucket);
        let next_marker = if objects.len() >= limit {
            objects.last().map(|o| o.key.clone())
        } else {
            None
        };
        Ok(ObjectPage {
            objects,
            next_marker,
        })
    }

    async fn db_instances(&self) -> ApiResult<Vec<DbInstance>> {
        self.paged(
            "rds",
            "DescribeDBInstances",
            self.in_region(Vec::new()),
            "/Items/DBInstance",
        )
            .await
    }

    async fn db_net_info(&self, db_instance_id: &str) -> ApiResult<Vec<NetInfo>> {
        let api = "DescribeDBInstanceNetInfo";
        let response = self
            .regional("rds", api, vec![("DBInstanceId", db_instance_id.to_string())])
            .await?;
        items(
            &response,
            "/DBInstanceNetInfos/DBInstanceNetInfo",
            &self.describe("rds", api),
        )
    }

    async fn databases(&self, db_instance_id: &str) -> ApiResult<Vec<Database>> {
        let api = "DescribeDatabases";
        let response = self
            .regional("rds", api, vec![("DBInstanceId", db_instance_id.to_string())])
            .await?;
        items(&response, "/Databases/Database", &self.describe("rds", api))
    }

    async fn db_accounts(&self, db_instance_id: &str) -> ApiResult<Vec<DbAccount>> {
        let api = "DescribeAccounts";
        let response = self
            .regional("rds", api, vec![("DBInstanceId", db_instance_id.to_string())])
            .await?;
        items(&response, "/Accounts/DBInstanceAccount", &self.describe("rds", api))
    }

    async fn cache_instances(&self) -> ApiResult<Vec<CacheInstance>> {
        self.paged(
            "r-kvstore",
            "DescribeInstances",
            self.in_region(Vec::new()),
            "/Instances/KVStoreInstance",
        )
        .await
    }

    async fn cache_accounts(&self, instance_id: &str) -> ApiResult<Vec<CacheAccount>> {
        let api = "DescribeAccounts";
        let response = self
            .regional("r-kvstore", api, vec![("InstanceId", instance_id.to_string())])
            .await?;
        items(&response, "/Accounts/Account", &self.describe("r-kvstore", api))
    }

    async fn queue_instances(&self) -> ApiResult<Vec<QueueInstance>> {
        let api = "OnsInstanceInServiceList";
        let response = self.regional("ons", api, Vec::new()).await?;
        let mut instances: Vec<QueueInstance> =
            items(&response, "/Data/InstanceVO", &self.describe("ons", api))?;
        for instance in &mut instances {
            instance.region_id.clone_from(&self.region);
        }
        Ok(instances)
    }

    async fn topics(&self, instance_id: &str) -> ApiResult<Vec<Topic>> {
        let api = "OnsTopicList";
        let response = self
            .regional("ons", api, vec![("InstanceId", instance_id.to_string())])
            .await?;
        items(&response, "/Data/PublishInfoDo", &self.describe("ons", api))
    }

    async fn consumer_groups(&self, instance_id: &str) -> ApiResult<Vec<ConsumerGroup>> {
        let api = "OnsGroupList";
        let response = self
            .regional("ons", api, vec![("InstanceId", instance_id.to_string())])
            .await?;
        items(&response, "/Data/SubscribeInfoDo", &self.describe("ons", api))
    }
}
