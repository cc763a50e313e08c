//! Publishing workflow.
//!
//! [`PublishingService`] wires the transport, the query cache, the network
//! signal and the clock together. Reads go through the cache; successful
//! mutations invalidate the entries they affect.

mod connections;
mod publish;

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used, clippy::expect_used)]
mod tests;

use std::sync::Arc;

use firekyt_core::model::{
    ConnectionId, ContentItem, PlatformConnection, PublicationHistoryEntry, ScheduledPublication,
};
use firekyt_core::{Clock, SystemClock};

pub use connections::{ConnectionCheck, ConnectionOutcome};
pub use publish::PUBLISH_INVALIDATES;

use crate::api::PublishingApi;
use crate::cache::{QueryCache, QueryKey};
use crate::error::PublishError;
use crate::network::NetworkStatus;

/// Connection management and publish orchestration over a [`PublishingApi`].
#[derive(Clone)]
pub struct PublishingService {
    api: Arc<dyn PublishingApi>,
    cache: QueryCache,
    network: NetworkStatus,
    clock: Arc<dyn Clock>,
}

impl PublishingService {
    pub fn new(api: Arc<dyn PublishingApi>, cache: QueryCache, network: NetworkStatus) -> Self {
        Self {
            api,
            cache,
            network,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the wall clock used for scheduling checks.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub const fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub const fn network(&self) -> &NetworkStatus {
        &self.network
    }

    pub async fn connections(&self) -> Result<Vec<PlatformConnection>, PublishError> {
        let api = &self.api;
        Ok(self
            .cache
            .get_or_load(QueryKey::Connections, || api.list_connections())
            .await?)
    }

    /// Look up one connection in the (possibly refetched) connection list.
    pub async fn connection(&self, id: ConnectionId) -> Result<PlatformConnection, PublishError> {
        self.connections()
            .await?
            .into_iter()
            .find(|c| c.id == id)
            .ok_or(PublishError::ConnectionNotFound(id))
    }

    pub async fn scheduled(&self) -> Result<Vec<ScheduledPublication>, PublishError> {
        let api = &self.api;
        Ok(self
            .cache
            .get_or_load(QueryKey::Scheduled, || api.list_scheduled())
            .await?)
    }

    pub async fn history(&self) -> Result<Vec<PublicationHistoryEntry>, PublishError> {
        let api = &self.api;
        Ok(self
            .cache
            .get_or_load(QueryKey::History, || api.list_history())
            .await?)
    }

    pub async fn content(&self) -> Result<Vec<ContentItem>, PublishError> {
        let api = &self.api;
        Ok(self
            .cache
            .get_or_load(QueryKey::Content, || api.list_content())
            .await?)
    }
}

impl std::fmt::Debug for PublishingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PublishingService")
            .field("cache", &self.cache)
            .field("network", &self.network)
            .finish_non_exhaustive()
    }
}
