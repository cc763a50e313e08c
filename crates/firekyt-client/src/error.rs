//! Client error types and their user-facing notices.

use firekyt_core::connection_form::FieldErrors;
use firekyt_core::model::{ConnectionId, PublicationStatus};
use firekyt_core::remote_error::{NoticeDuration, RemoteError, UserNotice};
use firekyt_core::{LifecycleError, ScheduleError};
use thiserror::Error;

pub const NETWORK_REQUIRED_TITLE: &str = "Network Required";
pub const CONNECTION_INACTIVE_TITLE: &str = "Connection Inactive";

/// Publishing API transport errors.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Publishing API error ({status}): {body}")]
    Api { status: u16, body: RemoteError },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// Structured body of a non-success response.
    pub fn remote(&self) -> Option<&RemoteError> {
        match self {
            Self::Api { body, .. } => Some(body),
            Self::Http(_) | Self::Config(_) => None,
        }
    }

    pub fn notice(&self) -> UserNotice {
        match self {
            Self::Api { body, .. } => UserNotice::from_remote(body),
            Self::Http(e) if e.is_connect() || e.is_timeout() => {
                UserNotice::unreachable(&e.to_string())
            }
            Self::Http(e) => UserNotice::new("Request Failed", e.to_string()),
            Self::Config(msg) => UserNotice::new("Configuration Error", msg.clone()),
        }
    }
}

/// Errors from the publishing workflow.
///
/// `Offline`, `ConnectionInactive`, `ConnectionNotFound`, `NotCancellable`,
/// `Form` and `Schedule` are raised locally, before any request is sent.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Network Required: you are offline")]
    Offline,

    #[error("Connection Inactive: connection {id} is not active")]
    ConnectionInactive {
        id: ConnectionId,
        error: Option<String>,
    },

    #[error("Platform connection {0} not found")]
    ConnectionNotFound(ConnectionId),

    #[error("Scheduled publication {id} is {status} and can no longer be cancelled")]
    NotCancellable { id: i64, status: PublicationStatus },

    #[error("Invalid connection form: {0}")]
    Form(#[from] FieldErrors),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl PublishError {
    /// Whether the failure was detected without contacting the backend.
    pub const fn is_local(&self) -> bool {
        !matches!(self, Self::Api(_))
    }

    pub fn notice(&self) -> UserNotice {
        match self {
            Self::Offline => UserNotice {
                title: NETWORK_REQUIRED_TITLE.into(),
                description: "You appear to be offline. Reconnect to the internet and try again."
                    .into(),
                retry_recommended: false,
                display: NoticeDuration::Standard,
            },
            Self::ConnectionInactive { error, .. } => {
                let reason = error
                    .as_deref()
                    .map(|e| format!(" ({e})"))
                    .unwrap_or_default();
                UserNotice::new(
                    CONNECTION_INACTIVE_TITLE,
                    format!(
                        "This platform connection is inactive{reason}. Test or update the \
                         connection before publishing."
                    ),
                )
            }
            Self::ConnectionNotFound(id) => UserNotice::new(
                "Connection Not Found",
                format!("Platform connection {id} does not exist or was removed."),
            ),
            Self::NotCancellable { .. } => UserNotice::new("Cannot Cancel", self.to_string()),
            Self::Form(errors) => UserNotice::new("Invalid Connection", errors.to_string()),
            Self::Schedule(e) => UserNotice::new("Invalid Schedule", e.to_string()),
            Self::Lifecycle(e) => UserNotice::new("Connection Unavailable", e.to_string()),
            Self::Api(e) => e.notice(),
        }
    }
}
