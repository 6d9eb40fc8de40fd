//! Cross-resource finder.
//!
//! A query (IP or domain) is resolved to addresses, then every category is
//! searched concurrently. Each category is bounded by the configured timeout
//! and a shared cancellation token; a category that fails, times out or is
//! cancelled contributes an empty section and records why.

mod matching;
mod resolve;
mod result;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use futures::stream;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub use resolve::resolve;
pub use result::{Category, CategoryStatus, DnsMatch, FindResult};

use crate::model::NetworkInterface;
use crate::provider::{ApiResult, HostResolver, ResourceApi};

/// Interface lookups in flight at once while scanning instances.
const INTERFACE_CONCURRENCY: usize = 8;

/// Bounds applied to every category lookup.
#[derive(Debug, Clone, Default)]
pub struct Limits {
    pub timeout: Option<Duration>,
    pub cancel: CancellationToken,
}

async fn bounded<T>(
    limits: &Limits,
    fetch: impl Future<Output = ApiResult<T>>,
) -> Result<T, CategoryStatus> {
    let fetch = async {
        match limits.timeout {
            Some(duration) => match tokio::time::timeout(duration, fetch).await {
                Ok(result) => result.map_err(|e| CategoryStatus::Failed(e.to_string())),
                Err(_) => Err(CategoryStatus::TimedOut),
            },
            None => fetch.await.map_err(|e| CategoryStatus::Failed(e.to_string())),
        }
    };
    tokio::select! {
        biased;
        () = limits.cancel.cancelled() => Err(CategoryStatus::Cancelled),
        result = fetch => result,
    }
}

/// Run one category and store its outcome. The lock is only taken for the
/// write, never across the lookup.
async fn run_category<T>(
    category: Category,
    limits: &Limits,
    result: &Mutex<FindResult>,
    fetch: impl Future<Output = ApiResult<Vec<T>>>,
    store: impl FnOnce(&mut FindResult, Vec<T>),
) {
    let (found, status) = match bounded(limits, fetch).await {
        Ok(found) => (found, CategoryStatus::Complete),
        Err(status) => (Vec::new(), status),
    };

    if status.is_complete() {
        debug!(category = category.title(), matches = found.len(), "Category searched");
    } else {
        warn!(category = category.title(), status = %status, "Category incomplete");
    }

    let mut guard = result.lock().await;
    store(&mut guard, found);
    guard.set_status(category, status);
}

/// Interfaces of every instance. Instances whose lookup fails are skipped.
async fn all_interfaces(api: &dyn ResourceApi) -> ApiResult<Vec<NetworkInterface>> {
    let instances = api.instances().await?;
    let interfaces = stream::iter(instances)
        .map(|instance| async move {
            api.instance_interfaces(&instance.instance_id)
                .await
                .unwrap_or_else(|e| {
                    debug!(instance = %instance.instance_id, error = %e, "Skipping interfaces");
                    Vec::new()
                })
        })
        .buffer_unordered(INTERFACE_CONCURRENCY)
        .collect::<Vec<_>>()
        .await;
    Ok(interfaces.into_iter().flatten().collect())
}

/// Search every category for resources matching `ips` or `domain`.
pub async fn find_resources(
    api: &dyn ResourceApi,
    ips: &[String],
    domain: &str,
    limits: &Limits,
) -> FindResult {
    let result = Mutex::new(FindResult::new(domain, ips.to_vec(), domain));

    let compute = run_category(
        Category::Compute,
        limits,
        &result,
        async {
            if ips.is_empty() {
                return Ok(Vec::new());
            }
            let all = api.instances().await?;
            Ok(all.into_iter().filter(|i| matching::instance_matches(i, ips)).collect())
        },
        |r, found| r.instances = found,
    );

    let interfaces = run_category(
        Category::Interface,
        limits,
        &result,
        async {
            if ips.is_empty() {
                return Ok(Vec::new());
            }
            let all = all_interfaces(api).await?;
            Ok(all.into_iter().filter(|n| matching::interface_matches(n, ips)).collect())
        },
        |r, found| r.interfaces = found,
    );

    let load_balancers = run_category(
        Category::LoadBalancer,
        limits,
        &result,
        async {
            if ips.is_empty() {
                return Ok(Vec::new());
            }
            let all = api.load_balancers().await?;
            Ok(all.into_iter().filter(|lb| matching::load_balancer_matches(lb, ips)).collect())
        },
        |r, found| r.load_balancers = found,
    );

    let dns = run_category(
        Category::Dns,
        limits,
        &result,
        async {
            let mut matches = Vec::new();
            for zone in api.domains().await? {
                let records = match api.domain_records(&zone.domain_name).await {
                    Ok(records) => records,
                    Err(e) => {
                        debug!(zone = %zone.domain_name, error = %e, "Skipping zone");
                        continue;
                    }
                };
                matches.extend(
                    records
                        .into_iter()
                        .filter(|r| matching::dns_record_matches(r, &zone.domain_name, ips, domain))
                        .map(|record| DnsMatch {
                            zone: zone.domain_name.clone(),
                            record,
                        }),
                );
            }
            Ok(matches)
        },
        |r, found| r.dns_records = found,
    );

    let databases = run_category(
        Category::Database,
        limits,
        &result,
        async {
            let all = api.db_instance_details().await?;
            Ok(all
                .into_iter()
                .filter(|d| matching::database_matches(d, ips, domain))
                .collect())
        },
        |r, found| r.db_instances = found,
    );

    let caches = run_category(
        Category::Cache,
        limits,
        &result,
        async {
            let all = api.cache_instances().await?;
            Ok(all
                .into_iter()
                .filter(|c| matching::cache_matches(c, ips, domain))
                .collect())
        },
        |r, found| r.cache_instances = found,
    );

    tokio::join!(compute, interfaces, load_balancers, dns, databases, caches);
    result.into_inner()
}

/// Resolve `query` and search for it.
pub async fn search(
    api: Arc<dyn ResourceApi>,
    resolver: Arc<dyn HostResolver>,
    query: &str,
    limits: &Limits,
) -> FindResult {
    let resolution = resolve(query, api.as_ref(), resolver.as_ref()).await;
    info!(query, ips = ?resolution.ips, domain = %resolution.domain, "Finder query resolved");

    let mut result = find_resources(api.as_ref(), &resolution.ips, &resolution.domain, limits).await;
    result.query = query.trim().to_string();
    info!(query, total = result.total_count(), partial = result.is_partial(), "Finder query done");
    result
}
