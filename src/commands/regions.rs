use std::sync::Arc;

use async_trait::async_trait;
use color_eyre::Result;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

use crate::app::AppMessage;
use crate::commands::Command;
use crate::provider::ResourceApi;
use crate::region_cache::RegionCache;

/// Loads the region list for the region picker, cache first.
pub struct RegionsCmd {
    api: Arc<dyn ResourceApi>,
    cache: Option<RegionCache>,
    ticket: u64,
}

impl RegionsCmd {
    pub fn new(api: Arc<dyn ResourceApi>, cache: Option<RegionCache>, ticket: u64) -> Self {
        Self { api, cache, ticket }
    }

    async fn load(&self) -> Result<Vec<String>, String> {
        let profile = self.api.profile();
        if let Some(regions) = self.cache.as_ref().and_then(|c| c.get(profile)) {
            debug!(profile, count = regions.len(), "Region cache hit");
            return Ok(regions);
        }
        let regions = self.api.regions().await.map_err(|e| e.to_string())?;
        if let Some(cache) = &self.cache {
            // An empty listing is never worth remembering for a week.
            let written = if regions.is_empty() {
                cache.clear(profile)
            } else {
                cache.set(profile, &regions)
            };
            if let Err(e) = written {
                warn!(profile, error = %e, "Failed to write region cache");
            }
        }
        Ok(regions)
    }
}

#[async_trait]
impl Command for RegionsCmd {
    fn name(&self) -> String {
        format!("Loading regions for {}", self.api.profile())
    }

    async fn execute(self: Box<Self>, action_tx: UnboundedSender<AppMessage>) -> Result<()> {
        let result = self.load().await;
        action_tx.send(AppMessage::RegionsLoaded {
            ticket: self.ticket,
            result,
        })?;
        Ok(())
    }
}
