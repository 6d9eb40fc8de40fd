use std::sync::Arc;

use async_trait::async_trait;
use color_eyre::Result;
use tokio::sync::mpsc::UnboundedSender;

use crate::app::AppMessage;
use crate::commands::Command;
use crate::finder::{self, Limits};
use crate::pages::PageData;
use crate::provider::{HostResolver, ResourceApi};

/// Runs a finder query. Category failures end up in the result, so this
/// always reports back with data.
pub struct FindCmd {
    api: Arc<dyn ResourceApi>,
    resolver: Arc<dyn HostResolver>,
    query: String,
    limits: Limits,
    ticket: u64,
}

impl FindCmd {
    pub fn new(
        api: Arc<dyn ResourceApi>,
        resolver: Arc<dyn HostResolver>,
        query: impl Into<String>,
        limits: Limits,
        ticket: u64,
    ) -> Self {
        Self {
            api,
            resolver,
            query: query.into(),
            limits,
            ticket,
        }
    }
}

#[async_trait]
impl Command for FindCmd {
    fn name(&self) -> String {
        format!("Finding {}", self.query)
    }

    async fn execute(self: Box<Self>, action_tx: UnboundedSender<AppMessage>) -> Result<()> {
        let found = finder::search(self.api, self.resolver, &self.query, &self.limits).await;
        action_tx.send(AppMessage::Loaded {
            ticket: self.ticket,
            result: Ok(PageData::Found(found)),
        })?;
        Ok(())
    }
}
