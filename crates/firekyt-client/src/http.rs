//! Publishing REST API client.
//!
//! Uses reqwest to call the `/api/publishing` endpoints with a bearer token.

use std::time::Duration;

use async_trait::async_trait;
use firekyt_core::model::{
    ConnectionId, ConnectionTestResult, ContentItem, PlatformConnection, PublicationHistoryEntry,
    PublicationRecord, PublishNowRequest, ScheduledPublication, ValidationReport,
};
use firekyt_core::remote_error::RemoteError;
use firekyt_core::{ConnectionRequest, ScheduleRequest};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::api::{PublishingApi, paths};
use crate::error::ApiError;

/// Configuration for connecting to the publishing backend.
#[derive(Clone)]
pub struct HttpConfig {
    /// Backend base URL (e.g., "<https://app.firekyt.com>").
    pub base_url: String,
    /// Session bearer token issued by the auth service.
    pub token: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for HttpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpConfig")
            .field("base_url", &self.base_url)
            .field("token", &"****")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Publishing REST API client.
#[derive(Debug)]
pub struct HttpPublishingApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpPublishingApi {
    /// Create a new publishing API client.
    pub fn new(config: &HttpConfig) -> Result<Self, ApiError> {
        if config.base_url.is_empty() {
            return Err(ApiError::Config("base_url is empty".into()));
        }
        if config.token.is_empty() {
            return Err(ApiError::Config("token is empty".into()));
        }

        let mut headers = HeaderMap::new();
        let mut token_val = HeaderValue::from_str(&format!("Bearer {}", config.token))
            .map_err(|_| ApiError::Config("Invalid token format".into()))?;
        token_val.set_sensitive(true);
        headers.insert(AUTHORIZATION, token_val);

        // reqwest is built with rustls-no-provider; `Err` means a provider is already installed.
        let _ = rustls::crypto::ring::default_provider().install_default();

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        let base_url = config.base_url.trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    /// Absolute URL for a resource path.
    pub(crate) fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Turn a non-success response into [`ApiError::Api`], keeping the
    /// structured error body when the backend sent one.
    async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let text = resp.text().await.unwrap_or_default();
        let body = parse_error_body(&text)
            .unwrap_or_else(|| RemoteError::new(status.canonical_reason().unwrap_or("Unknown")));
        warn!(status = status.as_u16(), message = %body.message, "Publishing API request failed");
        Err(ApiError::Api {
            status: status.as_u16(),
            body,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.api_url(path);
        debug!(%url, "GET");
        let resp = self.http.get(&url).send().await?;
        Ok(Self::check_status(resp).await?.json().await?)
    }

    async fn send_json<B, T>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.api_url(path);
        debug!(%url, %method, "Sending request");
        let mut req = self.http.request(method, &url);
        if let Some(body) = body {
            req = req.json(body);
        }
        let resp = req.send().await?;
        Ok(Self::check_status(resp).await?.json().await?)
    }

    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let url = self.api_url(path);
        debug!(%url, "DELETE");
        let resp = self.http.delete(&url).send().await?;
        Self::check_status(resp).await?;
        Ok(())
    }
}

/// Parse a structured error body; plain-text bodies become the message.
fn parse_error_body(text: &str) -> Option<RemoteError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    match serde_json::from_str::<RemoteError>(trimmed) {
        Ok(body) if !body.message.is_empty() || body.code.is_some() => Some(body),
        Ok(_) | Err(_) if trimmed.starts_with('{') => None,
        Ok(_) | Err(_) => Some(RemoteError::new(trimmed)),
    }
}

#[async_trait]
impl PublishingApi for HttpPublishingApi {
    async fn list_connections(&self) -> Result<Vec<PlatformConnection>, ApiError> {
        self.get_json(paths::CONNECTIONS).await
    }

    async fn create_connection(
        &self,
        request: &ConnectionRequest,
    ) -> Result<PlatformConnection, ApiError> {
        self.send_json(reqwest::Method::POST, paths::CONNECTIONS, Some(&request.body()))
            .await
    }

    async fn update_connection(
        &self,
        id: ConnectionId,
        request: &ConnectionRequest,
    ) -> Result<PlatformConnection, ApiError> {
        self.send_json(
            reqwest::Method::PUT,
            &paths::connection(id),
            Some(&request.body()),
        )
        .await
    }

    async fn delete_connection(&self, id: ConnectionId) -> Result<(), ApiError> {
        self.delete(&paths::connection(id)).await
    }

    async fn validate_connections(&self) -> Result<ValidationReport, ApiError> {
        self.send_json::<(), _>(reqwest::Method::POST, paths::VALIDATE_CONNECTIONS, None)
            .await
    }

    async fn test_connection(&self, id: ConnectionId) -> Result<ConnectionTestResult, ApiError> {
        self.send_json::<(), _>(reqwest::Method::POST, &paths::test_connection(id), None)
            .await
    }

    async fn list_scheduled(&self) -> Result<Vec<ScheduledPublication>, ApiError> {
        self.get_json(paths::SCHEDULED).await
    }

    async fn schedule(&self, request: &ScheduleRequest) -> Result<ScheduledPublication, ApiError> {
        self.send_json(reqwest::Method::POST, paths::SCHEDULE, Some(request))
            .await
    }

    async fn cancel_scheduled(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&paths::scheduled(id)).await
    }

    async fn publish_now(
        &self,
        request: &PublishNowRequest,
    ) -> Result<PublicationRecord, ApiError> {
        self.send_json(reqwest::Method::POST, paths::PUBLISH_NOW, Some(request))
            .await
    }

    async fn list_history(&self) -> Result<Vec<PublicationHistoryEntry>, ApiError> {
        self.get_json(paths::HISTORY).await
    }

    async fn list_content(&self) -> Result<Vec<ContentItem>, ApiError> {
        self.get_json(paths::CONTENT).await
    }
}
