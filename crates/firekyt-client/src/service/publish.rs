//! Publish orchestration: publish now, schedule, cancel.

use std::sync::Arc;
use std::time::Duration;

use firekyt_core::model::{
    ConnectionId, ContentId, PlatformConnection, PublicationRecord, PublishNowRequest,
    PublishSettings, ScheduledPublication,
};
use firekyt_core::{ScheduleDraft, ScheduleFloor};
use tracing::{info, warn};

use super::PublishingService;
use crate::cache::QueryKey;
use crate::error::PublishError;

/// Entries a successful publish or schedule makes stale.
pub const PUBLISH_INVALIDATES: [QueryKey; 4] = [
    QueryKey::Connections,
    QueryKey::Content,
    QueryKey::History,
    QueryKey::Scheduled,
];

impl PublishingService {
    /// Publish a content item immediately.
    ///
    /// Fails locally with [`PublishError::Offline`] when the network signal
    /// is down, and with [`PublishError::ConnectionInactive`] when the target
    /// connection is not active. Neither check sends a request while any
    /// cached connection list, stale or fresh, knows the connection; the
    /// list is fetched only when no snapshot has it.
    pub async fn publish_now(
        &self,
        content_id: ContentId,
        connection_id: ConnectionId,
        settings: Option<PublishSettings>,
    ) -> Result<PublicationRecord, PublishError> {
        if !self.network.is_online() {
            warn!(content_id, connection_id, "Publish blocked: offline");
            return Err(PublishError::Offline);
        }

        let connection = self.publish_target(connection_id).await?;
        if !connection.is_active {
            warn!(content_id, connection_id, "Publish blocked: connection inactive");
            return Err(PublishError::ConnectionInactive {
                id: connection_id,
                error: connection.error_detail().map(ToString::to_string),
            });
        }

        let request = PublishNowRequest {
            content_id,
            platform_connection_id: connection_id,
            publish_settings: settings.filter(|s| !s.is_empty()),
        };
        let record = self.api.publish_now(&request).await?;
        self.cache.invalidate_all(&PUBLISH_INVALIDATES).await;
        info!(
            content_id,
            connection_id,
            status = %record.status,
            url = ?record.platform_url,
            "Published content"
        );
        Ok(record)
    }

    async fn publish_target(
        &self,
        id: ConnectionId,
    ) -> Result<PlatformConnection, PublishError> {
        let snapshot = self
            .cache
            .peek::<Vec<PlatformConnection>>(QueryKey::Connections)
            .await
            .and_then(|list| list.into_iter().find(|c| c.id == id));
        match snapshot {
            Some(connection) => Ok(connection),
            None => self.connection(id).await,
        }
    }

    /// Schedule a deferred publish.
    ///
    /// The 5-minute floor is checked against the live clock at call time.
    pub async fn schedule(
        &self,
        draft: &ScheduleDraft,
    ) -> Result<ScheduledPublication, PublishError> {
        let request = draft.validate(self.clock.now())?;
        let scheduled = self.api.schedule(&request).await?;
        self.cache.invalidate_all(&PUBLISH_INVALIDATES).await;
        info!(
            id = scheduled.id,
            content_id = request.content_id,
            connection_id = request.platform_connection_id,
            scheduled_at = %scheduled.scheduled_at,
            "Scheduled publication"
        );
        Ok(scheduled)
    }

    /// Cancel a scheduled publication that is still pending.
    ///
    /// Items the cached list already shows as picked up are rejected
    /// locally; unknown ids are left for the backend to decide.
    pub async fn cancel_scheduled(&self, id: i64) -> Result<(), PublishError> {
        if let Some(item) = self.scheduled().await?.into_iter().find(|s| s.id == id) {
            if !item.is_cancellable() {
                return Err(PublishError::NotCancellable {
                    id,
                    status: item.status,
                });
            }
        }
        self.api.cancel_scheduled(id).await?;
        self.cache.invalidate(QueryKey::Scheduled).await;
        info!(id, "Cancelled scheduled publication");
        Ok(())
    }

    /// Start refreshing the displayed scheduling minimum every `interval`.
    pub fn schedule_floor(&self, interval: Duration) -> ScheduleFloor {
        ScheduleFloor::spawn(Arc::clone(&self.clock), interval)
    }
}
