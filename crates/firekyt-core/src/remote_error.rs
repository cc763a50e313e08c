//! Remote error classification.
//!
//! The backend reports failed publish/schedule attempts with a structured body
//! (`{message, details?, suggestion?, retryRecommended?, technical?, code?}`).
//! [`classify`] turns that into an [`ErrorKind`] and [`UserNotice::from_remote`]
//! into the title/description/duration a user sees. Both are pure.
//!
//! An explicit `code` wins. Without one, the known message signatures are
//! matched (e.g. WordPress `rest_cannot_create`), case-insensitively, across
//! every text field of the body.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const PERMISSION_TITLE: &str = "Platform Permissions Error";
pub const NETWORK_TITLE: &str = "Network Issue";
pub const GENERIC_TITLE: &str = "Publishing Failed";

const PERMISSION_GUIDANCE: &str = "The connected account is not allowed to publish on this \
    platform. For WordPress, use an account with the Author role or higher, then reconnect.";
const NETWORK_GUIDANCE: &str =
    "The publishing platform could not be reached. Check the site URL and try again.";

/// Error codes the backend sends for insufficient platform privileges.
const PERMISSION_CODES: &[&str] = &[
    "platform_permission",
    "permission_denied",
    "rest_cannot_create",
    "rest_cannot_publish",
];

/// Error codes the backend sends when the target host is unreachable.
const NETWORK_CODES: &[&str] = &[
    "network_error",
    "dns_resolution_failed",
    "enotfound",
    "eai_again",
    "econnrefused",
    "etimedout",
];

const PERMISSION_SIGNATURES: &[&str] = &[
    "rest_cannot_create",
    "rest_cannot_publish",
    "wordpress permissions",
    "insufficient permissions",
    "not allowed to create posts",
];

const NETWORK_SIGNATURES: &[&str] = &[
    "enotfound",
    "eai_again",
    "getaddrinfo",
    "dns",
    "econnrefused",
    "etimedout",
    "network error",
];

/// Structured error body returned by the publishing API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RemoteErrorBody")]
pub struct RemoteError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_recommended: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technical: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Wire shape of [`RemoteError`]. Some routes send `error` instead of, or
/// next to, `message`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoteErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    details: Option<String>,
    #[serde(default)]
    suggestion: Option<String>,
    #[serde(default)]
    retry_recommended: Option<bool>,
    #[serde(default)]
    technical: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

impl From<RemoteErrorBody> for RemoteError {
    fn from(body: RemoteErrorBody) -> Self {
        let message = body
            .message
            .filter(|m| !m.trim().is_empty())
            .or(body.error)
            .unwrap_or_default();
        Self {
            message,
            details: body.details,
            suggestion: body.suggestion,
            retry_recommended: body.retry_recommended,
            technical: body.technical,
            code: body.code,
        }
    }
}

impl RemoteError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    fn texts(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.message.as_str())
            .chain(self.details.as_deref())
            .chain(self.technical.as_deref())
    }
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            f.write_str("Unknown error")
        } else {
            f.write_str(&self.message)
        }
    }
}

/// User-facing category of a remote failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The platform account lacks the privilege to publish.
    Permission,
    /// The target host could not be reached or resolved.
    Network,
    Generic,
}

fn code_kind(code: &str) -> Option<ErrorKind> {
    let code = code.trim().to_ascii_lowercase();
    if PERMISSION_CODES.contains(&code.as_str()) {
        Some(ErrorKind::Permission)
    } else if NETWORK_CODES.contains(&code.as_str()) {
        Some(ErrorKind::Network)
    } else {
        None
    }
}

fn matches_any(haystack: &str, needles: &[&str]) -> bool {
    let lower = haystack.to_ascii_lowercase();
    needles.iter().any(|n| lower.contains(n))
}

/// Classify a remote error body.
pub fn classify(err: &RemoteError) -> ErrorKind {
    if let Some(kind) = err.code.as_deref().and_then(code_kind) {
        return kind;
    }
    if err.texts().any(|t| matches_any(t, PERMISSION_SIGNATURES)) {
        ErrorKind::Permission
    } else if err.texts().any(|t| matches_any(t, NETWORK_SIGNATURES)) {
        ErrorKind::Network
    } else {
        ErrorKind::Generic
    }
}

/// How long a notice stays on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeDuration {
    Standard,
    Long,
    Extended,
}

impl NoticeDuration {
    pub const fn as_duration(self) -> Duration {
        match self {
            Self::Standard => Duration::from_secs(5),
            Self::Long => Duration::from_secs(8),
            Self::Extended => Duration::from_secs(10),
        }
    }
}

/// What the user is told about a failed operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserNotice {
    pub title: String,
    pub description: String,
    pub retry_recommended: bool,
    pub display: NoticeDuration,
}

fn join_suggestion(message: &str, suggestion: Option<&str>) -> String {
    match suggestion.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) if !message.is_empty() => format!("{message}\n\n{s}"),
        Some(s) => s.to_string(),
        None => message.to_string(),
    }
}

impl UserNotice {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            retry_recommended: false,
            display: NoticeDuration::Standard,
        }
    }

    /// Map a remote error body to a notice.
    pub fn from_remote(err: &RemoteError) -> Self {
        let message = err.message.trim();
        let suggestion = err.suggestion.as_deref();
        match classify(err) {
            ErrorKind::Permission => Self {
                title: PERMISSION_TITLE.into(),
                description: join_suggestion(message, suggestion.or(Some(PERMISSION_GUIDANCE))),
                retry_recommended: false,
                display: NoticeDuration::Extended,
            },
            ErrorKind::Network => Self {
                title: NETWORK_TITLE.into(),
                description: join_suggestion(message, suggestion.or(Some(NETWORK_GUIDANCE))),
                retry_recommended: err.retry_recommended.unwrap_or(true),
                display: NoticeDuration::Long,
            },
            ErrorKind::Generic => Self {
                title: GENERIC_TITLE.into(),
                description: join_suggestion(
                    if message.is_empty() {
                        "Unknown error"
                    } else {
                        message
                    },
                    suggestion,
                ),
                retry_recommended: err.retry_recommended.unwrap_or(false),
                display: NoticeDuration::Standard,
            },
        }
    }

    /// Notice for a request that never reached the backend.
    pub fn unreachable(detail: &str) -> Self {
        Self {
            title: NETWORK_TITLE.into(),
            description: join_suggestion(detail, Some(NETWORK_GUIDANCE)),
            retry_recommended: true,
            display: NoticeDuration::Long,
        }
    }
}

impl fmt::Display for UserNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.description)
    }
}
