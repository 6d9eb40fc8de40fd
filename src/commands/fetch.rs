use std::sync::Arc;

use async_trait::async_trait;
use color_eyre::Result;
use color_eyre::eyre::{bail, eyre};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

use crate::app::AppMessage;
use crate::commands::Command;
use crate::model::Payload;
use crate::nav::Page;
use crate::pages::{OBJECT_PAGE_SIZE, PageData};
use crate::provider::ResourceApi;

fn records<T: Into<Payload>>(items: Vec<T>) -> PageData {
    PageData::Records(items.into_iter().map(Into::into).collect())
}

fn missing(page: Page) -> color_eyre::Report {
    eyre!("{} needs a parent record", page.title())
}

/// Load the content of `page`, scoped to its parent record where it has one.
pub async fn fetch_page(
    api: &dyn ResourceApi,
    page: Page,
    context: Option<&Payload>,
    marker: Option<&str>,
) -> Result<PageData> {
    let data = match (page, context) {
        (Page::EcsInstances, _) => records(api.instances().await?),
        (Page::SecurityGroups, _) => records(api.security_groups().await?),
        (Page::EcsSecurityGroups, Some(Payload::Instance(instance))) => records(
            api.security_groups_by_ids(&instance.security_group_ids.security_group_id)
                .await?,
        ),
        (Page::EcsDisks, Some(Payload::Instance(instance))) => {
            records(api.disks(&instance.instance_id).await?)
        }
        (Page::EcsInterfaces, Some(Payload::Instance(instance))) => {
            records(api.instance_interfaces(&instance.instance_id).await?)
        }
        (Page::SecurityGroupRules, Some(Payload::SecurityGroup(group))) => {
            records(api.security_group_rules(&group.security_group_id).await?)
        }
        (Page::SecurityGroupInstances, Some(Payload::SecurityGroup(group))) => {
            records(api.security_group_instances(&group.security_group_id).await?)
        }
        (Page::DnsDomains, _) => records(api.domains().await?),
        (Page::DnsRecords, Some(Payload::Domain(domain))) => {
            records(api.domain_records(&domain.domain_name).await?)
        }
        (Page::SlbInstances, _) => records(api.load_balancers().await?),
        (Page::SlbListeners, Some(Payload::LoadBalancer(lb))) => {
            records(api.listeners(&lb.load_balancer_id).await?)
        }
        (Page::SlbVServerGroups, Some(Payload::LoadBalancer(lb))) => {
            records(api.vserver_groups(&lb.load_balancer_id).await?)
        }
        (Page::SlbBackendServers, Some(Payload::VServerGroup(group))) => {
            records(api.backend_servers(&group.vserver_group_id).await?)
        }
        (Page::OssBuckets, _) => records(api.buckets().await?),
        (Page::OssObjects, Some(Payload::Bucket(bucket))) => {
            PageData::Objects(api.objects(&bucket.name, marker, OBJECT_PAGE_SIZE).await?)
        }
        (Page::RdsInstances, _) => records(api.db_instance_details().await?),
        (Page::RdsDatabases, Some(db @ (Payload::DbInstance(_) | Payload::DbInstanceDetail(_)))) => {
            records(api.databases(db.label()).await?)
        }
        (Page::RdsAccounts, Some(db @ (Payload::DbInstance(_) | Payload::DbInstanceDetail(_)))) => {
            records(api.db_accounts(db.label()).await?)
        }
        (Page::RedisInstances, _) => records(api.cache_instances().await?),
        (Page::RedisAccounts, Some(Payload::CacheInstance(cache))) => {
            records(api.cache_accounts(&cache.instance_id).await?)
        }
        (Page::RocketMqInstances, _) => records(api.queue_instances().await?),
        (Page::RocketMqTopics, Some(Payload::QueueInstance(queue))) => {
            records(api.topics(&queue.instance_id).await?)
        }
        (Page::RocketMqGroups, Some(Payload::QueueInstance(queue))) => {
            records(api.consumer_groups(&queue.instance_id).await?)
        }
        (page, _) if !page.needs_fetch() || page == Page::FinderResults => {
            bail!("{} has nothing to fetch", page.title())
        }
        (page, _) => return Err(missing(page)),
    };
    Ok(data)
}

/// Fetches one page and reports back under `ticket`.
pub struct FetchPageCmd {
    api: Arc<dyn ResourceApi>,
    page: Page,
    context: Option<Payload>,
    marker: Option<String>,
    ticket: u64,
}

impl FetchPageCmd {
    pub fn new(
        api: Arc<dyn ResourceApi>,
        page: Page,
        context: Option<Payload>,
        marker: Option<String>,
        ticket: u64,
    ) -> Self {
        Self {
            api,
            page,
            context,
            marker,
            ticket,
        }
    }
}

#[async_trait]
impl Command for FetchPageCmd {
    fn name(&self) -> String {
        format!("Loading {}", self.page.title())
    }

    async fn execute(self: Box<Self>, action_tx: UnboundedSender<AppMessage>) -> Result<()> {
        debug!(page = ?self.page, ticket = self.ticket, "Fetching page");
        let result = fetch_page(
            self.api.as_ref(),
            self.page,
            self.context.as_ref(),
            self.marker.as_deref(),
        )
        .await
        .map_err(|e| {
            warn!(page = ?self.page, error = %e, "Fetch failed");
            format!("{e:#}")
        });
        action_tx.send(AppMessage::Loaded {
            ticket: self.ticket,
            result,
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Bucket, DbInstance, Instance, ObjectSummary, SecurityGroup};
    use crate::provider::fixture::StaticApi;

    fn api() -> StaticApi {
        StaticApi {
            instances: vec![Instance {
                instance_id: "i-1".to_string(),
                ..Instance::default()
            }],
            security_groups: vec![
                SecurityGroup {
                    security_group_id: "sg-1".to_string(),
                    ..SecurityGroup::default()
                },
                SecurityGroup {
                    security_group_id: "sg-2".to_string(),
                    ..SecurityGroup::default()
                },
            ],
            objects: (0..25)
                .map(|i| ObjectSummary {
                    key: format!("k{i:02}"),
                    ..ObjectSummary::default()
                })
                .collect(),
            db_instances: vec![DbInstance {
                db_instance_id: "rm-1".to_string(),
                ..DbInstance::default()
            }],
            ..StaticApi::default()
        }
    }

    #[tokio::test]
    async fn test_top_level_list() {
        let data = fetch_page(&api(), Page::EcsInstances, None, None).await.unwrap();
        assert!(matches!(data, PageData::Records(r) if r.len() == 1));
    }

    #[tokio::test]
    async fn test_instance_security_groups_follow_instance_ids() {
        let mut instance = Instance::default();
        instance.security_group_ids.security_group_id = vec!["sg-2".to_string()];
        let context = Payload::from(instance);
        let data = fetch_page(&api(), Page::EcsSecurityGroups, Some(&context), None)
            .await
            .unwrap();
        let PageData::Records(records) = data else {
            panic!("expected records");
        };
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].label(), "sg-2");
    }

    #[tokio::test]
    async fn test_objects_are_paged() {
        let bucket = Payload::from(Bucket {
            name: "logs".to_string(),
            ..Bucket::default()
        });
        let data = fetch_page(&api(), Page::OssObjects, Some(&bucket), None).await.unwrap();
        let PageData::Objects(page) = data else {
            panic!("expected objects");
        };
        assert_eq!(page.objects.len(), OBJECT_PAGE_SIZE);
        assert!(page.next_marker.is_some());
    }

    #[tokio::test]
    async fn test_rds_instances_carry_endpoints() {
        let data = fetch_page(&api(), Page::RdsInstances, None, None).await.unwrap();
        let PageData::Records(records) = data else {
            panic!("expected records");
        };
        assert!(matches!(records[0], Payload::DbInstanceDetail(_)));
    }

    #[tokio::test]
    async fn test_missing_context_is_an_error() {
        let err = fetch_page(&api(), Page::EcsDisks, None, None).await.unwrap_err();
        assert!(err.to_string().contains("ECS Disks"));
    }

    #[tokio::test]
    async fn test_detail_pages_are_not_fetched() {
        assert!(fetch_page(&api(), Page::EcsDetail, None, None).await.is_err());
    }

    #[tokio::test]
    async fn test_failed_call_reports_back() {
        let mut failing = api();
        failing.fail("instances");
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let cmd = FetchPageCmd::new(Arc::new(failing), Page::EcsInstances, None, None, 7);
        Box::new(cmd).execute(tx).await.unwrap();
        match rx.recv().await {
            Some(AppMessage::Loaded { ticket: 7, result: Err(_) }) => {}
            other => panic!("unexpected message: {other:?}"),
        }
    }
}
