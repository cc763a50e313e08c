//! In-memory [`PublishingApi`] that records every call.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use firekyt_core::model::{
    ConnectionId, ConnectionTestResult, ContentItem, Platform, PlatformConnection,
    PublicationHistoryEntry, PublicationRecord, PublicationStatus, PublishNowRequest,
    ScheduledPublication, ValidationReport,
};
use firekyt_core::remote_error::RemoteError;
use firekyt_core::{ConnectionRequest, ScheduleRequest};

use crate::api::PublishingApi;
use crate::error::ApiError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListConnections,
    CreateConnection(Platform),
    UpdateConnection(ConnectionId),
    DeleteConnection(ConnectionId),
    ValidateConnections,
    TestConnection(ConnectionId),
    ListScheduled,
    Schedule(ScheduleRequest),
    CancelScheduled(i64),
    PublishNow(PublishNowRequest),
    ListHistory,
    ListContent,
}

#[derive(Default)]
pub struct FakeApi {
    calls: Mutex<Vec<Call>>,
    connections: Mutex<Vec<PlatformConnection>>,
    scheduled: Mutex<Vec<ScheduledPublication>>,
    history: Vec<PublicationHistoryEntry>,
    content: Vec<ContentItem>,
    validation: ValidationReport,
    test_result: ConnectionTestResult,
    /// Platform error attached to connections created or updated.
    reject_credentials: Option<String>,
    /// Every mutation fails with this response.
    failure: Option<(u16, RemoteError)>,
}

pub fn at(rfc3339: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339)
        .unwrap()
        .with_timezone(&Utc)
}

pub fn connection(id: ConnectionId, platform: Platform, active: bool) -> PlatformConnection {
    PlatformConnection {
        id,
        platform,
        access_token: None,
        platform_username: Some(format!("user{id}")),
        platform_user_id: None,
        blog_url: platform
            .requires_blog_url()
            .then(|| "https://example.com".to_string()),
        api_endpoint: None,
        is_active: active,
        last_error: (!active).then(|| "Invalid credentials".to_string()),
        validation_error: None,
        created_at: at("2026-01-01T00:00:00Z"),
    }
}

pub fn scheduled(id: i64, status: PublicationStatus) -> ScheduledPublication {
    ScheduledPublication {
        id,
        content_id: 10,
        platform_connection_id: 1,
        scheduled_at: at("2026-10-20T09:00:00Z"),
        status,
        publish_settings: None,
    }
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_connections(self, connections: Vec<PlatformConnection>) -> Self {
        *self.connections.lock().unwrap() = connections;
        self
    }

    pub fn with_scheduled(self, items: Vec<ScheduledPublication>) -> Self {
        *self.scheduled.lock().unwrap() = items;
        self
    }

    pub fn with_history(mut self, history: Vec<PublicationHistoryEntry>) -> Self {
        self.history = history;
        self
    }

    pub fn with_content(mut self, content: Vec<ContentItem>) -> Self {
        self.content = content;
        self
    }

    pub fn with_validation(mut self, report: ValidationReport) -> Self {
        self.validation = report;
        self
    }

    pub fn with_test_result(mut self, result: ConnectionTestResult) -> Self {
        self.test_result = result;
        self
    }

    pub fn rejecting_credentials(mut self, error: &str) -> Self {
        self.reject_credentials = Some(error.to_string());
        self
    }

    pub fn failing_with(mut self, status: u16, body: RemoteError) -> Self {
        self.failure = Some((status, body));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn check_failure(&self) -> Result<(), ApiError> {
        match &self.failure {
            Some((status, body)) => Err(ApiError::Api {
                status: *status,
                body: body.clone(),
            }),
            None => Ok(()),
        }
    }

    fn store(&self, id: ConnectionId, request: &ConnectionRequest) -> PlatformConnection {
        let conn = PlatformConnection {
            id,
            platform: request.platform(),
            access_token: None,
            platform_username: request.platform_username.clone(),
            platform_user_id: request.platform_user_id.clone(),
            blog_url: request.target.blog_url().map(ToString::to_string),
            api_endpoint: request.api_endpoint.clone(),
            is_active: self.reject_credentials.is_none(),
            last_error: None,
            validation_error: self.reject_credentials.clone(),
            created_at: at("2026-10-19T12:00:00Z"),
        };
        let mut connections = self.connections.lock().unwrap();
        connections.retain(|c| c.id != id);
        connections.push(conn.clone());
        conn
    }
}

#[async_trait]
impl PublishingApi for FakeApi {
    async fn list_connections(&self) -> Result<Vec<PlatformConnection>, ApiError> {
        self.record(Call::ListConnections);
        Ok(self.connections.lock().unwrap().clone())
    }

    async fn create_connection(
        &self,
        request: &ConnectionRequest,
    ) -> Result<PlatformConnection, ApiError> {
        self.record(Call::CreateConnection(request.platform()));
        self.check_failure()?;
        let next = self
            .connections
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.id)
            .max()
            .unwrap_or(0)
            + 1;
        Ok(self.store(next, request))
    }

    async fn update_connection(
        &self,
        id: ConnectionId,
        request: &ConnectionRequest,
    ) -> Result<PlatformConnection, ApiError> {
        self.record(Call::UpdateConnection(id));
        self.check_failure()?;
        Ok(self.store(id, request))
    }

    async fn delete_connection(&self, id: ConnectionId) -> Result<(), ApiError> {
        self.record(Call::DeleteConnection(id));
        self.check_failure()?;
        self.connections.lock().unwrap().retain(|c| c.id != id);
        Ok(())
    }

    async fn validate_connections(&self) -> Result<ValidationReport, ApiError> {
        self.record(Call::ValidateConnections);
        self.check_failure()?;
        Ok(self.validation.clone())
    }

    async fn test_connection(&self, id: ConnectionId) -> Result<ConnectionTestResult, ApiError> {
        self.record(Call::TestConnection(id));
        self.check_failure()?;
        Ok(self.test_result.clone())
    }

    async fn list_scheduled(&self) -> Result<Vec<ScheduledPublication>, ApiError> {
        self.record(Call::ListScheduled);
        Ok(self.scheduled.lock().unwrap().clone())
    }

    async fn schedule(&self, request: &ScheduleRequest) -> Result<ScheduledPublication, ApiError> {
        self.record(Call::Schedule(request.clone()));
        self.check_failure()?;
        let item = ScheduledPublication {
            id: 100,
            content_id: request.content_id,
            platform_connection_id: request.platform_connection_id,
            scheduled_at: request.scheduled_at,
            status: PublicationStatus::Pending,
            publish_settings: request.publish_settings.clone(),
        };
        self.scheduled.lock().unwrap().push(item.clone());
        Ok(item)
    }

    async fn cancel_scheduled(&self, id: i64) -> Result<(), ApiError> {
        self.record(Call::CancelScheduled(id));
        self.check_failure()?;
        for item in self.scheduled.lock().unwrap().iter_mut() {
            if item.id == id {
                item.status = PublicationStatus::Cancelled;
            }
        }
        Ok(())
    }

    async fn publish_now(
        &self,
        request: &PublishNowRequest,
    ) -> Result<PublicationRecord, ApiError> {
        self.record(Call::PublishNow(request.clone()));
        self.check_failure()?;
        Ok(PublicationRecord {
            id: 500,
            content_id: request.content_id,
            platform_connection_id: request.platform_connection_id,
            status: PublicationStatus::Published,
            platform_url: Some(format!("https://example.com/?p={}", request.content_id)),
            published_at: Some(at("2026-10-19T12:00:00Z")),
            message: None,
        })
    }

    async fn list_history(&self) -> Result<Vec<PublicationHistoryEntry>, ApiError> {
        self.record(Call::ListHistory);
        Ok(self.history.clone())
    }

    async fn list_content(&self) -> Result<Vec<ContentItem>, ApiError> {
        self.record(Call::ListContent);
        Ok(self.content.clone())
    }
}
