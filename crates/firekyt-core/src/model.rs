//! Publishing data model.
//!
//! Wire structs match the JSON returned by the `/api/publishing` endpoints
//! (camelCase field names, ISO-8601 timestamps).

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Server-assigned identifier of a platform connection.
pub type ConnectionId = i64;

/// Server-assigned identifier of a content item.
pub type ContentId = i64;

/// Publishing platforms a connection can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[serde(rename = "wordpress")]
    WordPress,
    Ghost,
    Custom,
    Medium,
    Shopify,
    #[serde(rename = "linkedin")]
    LinkedIn,
    Pinterest,
    Instagram,
    /// A platform added on the backend after this client was built.
    #[serde(other)]
    Unknown,
}

impl Platform {
    pub const ALL: [Self; 8] = [
        Self::WordPress,
        Self::Ghost,
        Self::Custom,
        Self::Medium,
        Self::Shopify,
        Self::LinkedIn,
        Self::Pinterest,
        Self::Instagram,
    ];

    /// Wire identifier (`"wordpress"`, `"ghost"`, ...).
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WordPress => "wordpress",
            Self::Ghost => "ghost",
            Self::Custom => "custom",
            Self::Medium => "medium",
            Self::Shopify => "shopify",
            Self::LinkedIn => "linkedin",
            Self::Pinterest => "pinterest",
            Self::Instagram => "instagram",
            Self::Unknown => "unknown",
        }
    }

    /// Self-hosted platforms are addressed by site URL, so a blog URL is mandatory.
    pub const fn requires_blog_url(self) -> bool {
        match self {
            Self::WordPress | Self::Ghost | Self::Custom => true,
            Self::Medium
            | Self::Shopify
            | Self::LinkedIn
            | Self::Pinterest
            | Self::Instagram
            | Self::Unknown => false,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the known platform identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown platform: {0}")]
pub struct UnknownPlatform(pub String);

impl FromStr for Platform {
    type Err = UnknownPlatform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == needle)
            .ok_or_else(|| UnknownPlatform(s.to_string()))
    }
}

/// Platform access token. Never printed by `Debug`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for request bodies only.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(****)")
    }
}

/// A stored credential set for publishing to one external platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformConnection {
    pub id: ConnectionId,
    pub platform: Platform,
    /// The backend may mask or omit the token on reads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<AccessToken>,
    #[serde(default)]
    pub platform_username: Option<String>,
    #[serde(default)]
    pub platform_user_id: Option<String>,
    #[serde(default)]
    pub blog_url: Option<String>,
    #[serde(default)]
    pub api_endpoint: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub last_error: Option<String>,
    #[serde(default)]
    pub validation_error: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl PlatformConnection {
    /// The most specific error the backend attached, if any.
    pub fn error_detail(&self) -> Option<&str> {
        self.validation_error
            .as_deref()
            .or(self.last_error.as_deref())
            .filter(|e| !e.trim().is_empty())
    }

    /// Human label: username, then blog URL, then the platform name.
    pub fn label(&self) -> &str {
        self.platform_username
            .as_deref()
            .or(self.blog_url.as_deref())
            .unwrap_or_else(|| self.platform.as_str())
    }
}

/// Lifecycle status of a publication attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublicationStatus {
    Pending,
    Published,
    Failed,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl PublicationStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Published => "published",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for PublicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PublicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "published" => Ok(Self::Published),
            "failed" => Ok(Self::Failed),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            other => Err(format!("Unknown publication status: {other}")),
        }
    }
}

/// Optional per-publication overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl PublishSettings {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.excerpt.is_none() && self.tags.is_empty()
    }
}

/// A deferred request to publish a content item through a connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledPublication {
    pub id: i64,
    pub content_id: ContentId,
    pub platform_connection_id: ConnectionId,
    pub scheduled_at: DateTime<Utc>,
    pub status: PublicationStatus,
    #[serde(default)]
    pub publish_settings: Option<PublishSettings>,
}

impl ScheduledPublication {
    /// Only items the backend has not picked up yet can be cancelled.
    pub const fn is_cancellable(&self) -> bool {
        matches!(self.status, PublicationStatus::Pending)
    }
}

/// Engagement numbers reported by the platform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryMetrics {
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub shares: u64,
}

/// A completed publish attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicationHistoryEntry {
    pub id: i64,
    pub content_title: String,
    pub platform: Platform,
    pub status: PublicationStatus,
    pub published_at: DateTime<Utc>,
    #[serde(default)]
    pub platform_url: Option<String>,
    #[serde(default)]
    pub metrics: Option<HistoryMetrics>,
}

/// Record returned by an immediate publish.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicationRecord {
    pub id: i64,
    pub content_id: ContentId,
    pub platform_connection_id: ConnectionId,
    pub status: PublicationStatus,
    #[serde(default)]
    pub platform_url: Option<String>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Publishable content item (subset of fields).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    pub id: ContentId,
    pub title: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// Outcome of re-validating one connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionValidation {
    pub connection_id: ConnectionId,
    #[serde(default)]
    pub platform: Option<Platform>,
    pub is_valid: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// Response of the "validate all tokens" endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    #[serde(default)]
    pub results: Vec<ConnectionValidation>,
}

impl ValidationReport {
    pub fn invalid(&self) -> impl Iterator<Item = &ConnectionValidation> {
        self.results.iter().filter(|r| !r.is_valid)
    }
}

/// Response of the single-connection live test.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionTestResult {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub validation_error: Option<String>,
}

/// Body of `POST /api/publishing/publish-now`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishNowRequest {
    pub content_id: ContentId,
    pub platform_connection_id: ConnectionId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish_settings: Option<PublishSettings>,
}
