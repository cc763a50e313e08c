//! Publishing API contract.
//!
//! [`PublishingApi`] is the seam between the workflow and the transport. The
//! production implementation is [`crate::http::HttpPublishingApi`].

use async_trait::async_trait;
use firekyt_core::model::{
    ConnectionId, ConnectionTestResult, ContentItem, PlatformConnection, PublicationHistoryEntry,
    PublicationRecord, PublishNowRequest, ScheduledPublication, ValidationReport,
};
use firekyt_core::{ConnectionRequest, ScheduleRequest};

use crate::error::ApiError;

/// Resource paths, relative to the API base URL.
pub mod paths {
    use firekyt_core::model::ConnectionId;

    pub const CONNECTIONS: &str = "/api/publishing/connections";
    pub const VALIDATE_CONNECTIONS: &str = "/api/publishing/connections/validate";
    pub const SCHEDULED: &str = "/api/publishing/scheduled";
    pub const SCHEDULE: &str = "/api/publishing/schedule";
    pub const PUBLISH_NOW: &str = "/api/publishing/publish-now";
    pub const HISTORY: &str = "/api/publishing/history";
    pub const CONTENT: &str = "/api/content";

    pub fn connection(id: ConnectionId) -> String {
        format!("{CONNECTIONS}/{id}")
    }

    pub fn test_connection(id: ConnectionId) -> String {
        format!("/api/publishing/test-wordpress-connection/{id}")
    }

    pub fn scheduled(id: i64) -> String {
        format!("{SCHEDULED}/{id}")
    }
}

/// Operations offered by the publishing backend.
#[async_trait]
pub trait PublishingApi: Send + Sync {
    async fn list_connections(&self) -> Result<Vec<PlatformConnection>, ApiError>;

    async fn create_connection(
        &self,
        request: &ConnectionRequest,
    ) -> Result<PlatformConnection, ApiError>;

    async fn update_connection(
        &self,
        id: ConnectionId,
        request: &ConnectionRequest,
    ) -> Result<PlatformConnection, ApiError>;

    async fn delete_connection(&self, id: ConnectionId) -> Result<(), ApiError>;

    /// Re-validate every stored connection against its live platform.
    async fn validate_connections(&self) -> Result<ValidationReport, ApiError>;

    /// Live-test a single connection.
    async fn test_connection(&self, id: ConnectionId) -> Result<ConnectionTestResult, ApiError>;

    async fn list_scheduled(&self) -> Result<Vec<ScheduledPublication>, ApiError>;

    async fn schedule(&self, request: &ScheduleRequest) -> Result<ScheduledPublication, ApiError>;

    async fn cancel_scheduled(&self, id: i64) -> Result<(), ApiError>;

    async fn publish_now(&self, request: &PublishNowRequest)
    -> Result<PublicationRecord, ApiError>;

    async fn list_history(&self) -> Result<Vec<PublicationHistoryEntry>, ApiError>;

    async fn list_content(&self) -> Result<Vec<ContentItem>, ApiError>;
}
