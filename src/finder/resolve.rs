use std::net::IpAddr;

use tracing::{debug, warn};

use crate::provider::{DnsZones, HostResolver};

/// Addresses a query stands for, plus the domain it named.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub ips: Vec<String>,
    /// Empty when the query was an IP literal.
    pub domain: String,
}

/// Host record name of `query` inside `zone`, if the query lies in that zone.
fn host_record(query: &str, zone: &str) -> Option<String> {
    let query = query.to_ascii_lowercase();
    let zone = zone.trim_end_matches('.').to_ascii_lowercase();
    if zone.is_empty() {
        return None;
    }
    if query == zone {
        return Some("@".to_string());
    }
    query
        .strip_suffix(&zone)
        .and_then(|rest| rest.strip_suffix('.'))
        .filter(|rr| !rr.is_empty())
        .map(str::to_string)
}

async fn resolve_in_zones(zones: &dyn DnsZones, domain: &str) -> Vec<String> {
    let all = match zones.domains().await {
        Ok(all) => all,
        Err(e) => {
            warn!(error = %e, "Could not list DNS zones");
            return Vec::new();
        }
    };

    let mut ips: Vec<String> = Vec::new();
    for zone in all {
        let Some(rr) = host_record(domain, &zone.domain_name) else {
            continue;
        };
        match zones.domain_records(&zone.domain_name).await {
            Ok(records) => {
                for record in records {
                    if record.kind == "A" && record.rr.eq_ignore_ascii_case(&rr) && !ips.contains(&record.value) {
                        ips.push(record.value);
                    }
                }
            }
            Err(e) => debug!(zone = %zone.domain_name, error = %e, "Skipping zone"),
        }
    }
    ips
}

/// Turn a finder query into addresses.
///
/// IP literals pass through untouched. Domains are looked up in the managed
/// DNS zones first, then with the system resolver. A domain that resolves to
/// nothing is still returned so value based matching can use it.
pub async fn resolve(query: &str, zones: &dyn DnsZones, resolver: &dyn HostResolver) -> Resolution {
    let query = query.trim();
    if query.parse::<IpAddr>().is_ok() {
        return Resolution {
            ips: vec![query.to_string()],
            domain: String::new(),
        };
    }

    let domain = query.trim_end_matches('.').to_string();

    let ips = resolve_in_zones(zones, &domain).await;
    if !ips.is_empty() {
        debug!(domain = %domain, count = ips.len(), "Resolved through managed DNS");
        return Resolution { ips, domain };
    }

    let ips = match resolver.lookup(&domain).await {
        Ok(addrs) => addrs.iter().map(ToString::to_string).collect(),
        Err(e) => {
            debug!(domain = %domain, error = %e, "System lookup failed");
            Vec::new()
        }
    };
    Resolution { ips, domain }
}
