//! Connection lifecycle state machine.
//!
//! ```text
//! unconfigured --submit--> pending-validation --ok--> active
//!                                  |                    |
//!                                  +--failed--> inactive-with-error <--failed (re-check)
//! inactive-with-error --submit (edited)--> pending-validation
//! any --remove--> removed (terminal)
//! ```
//!
//! Re-validation is always user initiated (test / validate-all); the client
//! never retries on its own.

use std::fmt;

use thiserror::Error;

use crate::model::PlatformConnection;

/// Observable state of one platform connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Unconfigured,
    PendingValidation,
    Active,
    InactiveWithError { error: String },
    Removed,
}

/// Inputs that move a connection between states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    /// A validated form was submitted (create, or edit + resubmit).
    Submitted,
    /// The backend verified the credentials against the live platform.
    ValidationSucceeded,
    /// The backend rejected the credentials.
    ValidationFailed { error: String },
    /// Explicit delete.
    Removed,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("Connection has been removed")]
    Removed,

    #[error("Cannot apply {event} while {state}")]
    InvalidTransition { state: String, event: String },
}

/// Fallback message when the backend deactivates a connection without detail.
pub const INACTIVE_WITHOUT_DETAIL: &str = "Connection is inactive";

impl ConnectionState {
    /// State implied by a record the backend returned.
    pub fn observe(conn: &PlatformConnection) -> Self {
        if conn.is_active {
            Self::Active
        } else {
            Self::InactiveWithError {
                error: conn
                    .error_detail()
                    .unwrap_or(INACTIVE_WITHOUT_DETAIL)
                    .to_string(),
            }
        }
    }

    /// The event that moves a pending connection to the state the backend reported.
    pub fn validation_event(conn: &PlatformConnection) -> ConnectionEvent {
        match Self::observe(conn) {
            Self::InactiveWithError { error } => ConnectionEvent::ValidationFailed { error },
            _ => ConnectionEvent::ValidationSucceeded,
        }
    }

    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::InactiveWithError { error } => Some(error),
            _ => None,
        }
    }

    pub fn apply(&self, event: ConnectionEvent) -> Result<Self, LifecycleError> {
        use ConnectionEvent as E;

        match (self, event) {
            (Self::Removed, _) => Err(LifecycleError::Removed),
            (_, E::Removed) => Ok(Self::Removed),

            (Self::Unconfigured | Self::InactiveWithError { .. } | Self::Active, E::Submitted) => {
                Ok(Self::PendingValidation)
            }

            // A re-check of an active or failed connection can succeed again;
            // the backend is authoritative about credential validity.
            (
                Self::PendingValidation | Self::Active | Self::InactiveWithError { .. },
                E::ValidationSucceeded,
            ) => Ok(Self::Active),

            (
                Self::PendingValidation | Self::Active | Self::InactiveWithError { .. },
                E::ValidationFailed { error },
            ) => Ok(Self::InactiveWithError { error }),

            (state, event) => Err(LifecycleError::InvalidTransition {
                state: state.to_string(),
                event: event.to_string(),
            }),
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unconfigured => f.write_str("unconfigured"),
            Self::PendingValidation => f.write_str("pending-validation"),
            Self::Active => f.write_str("active"),
            Self::InactiveWithError { .. } => f.write_str("inactive-with-error"),
            Self::Removed => f.write_str("removed"),
        }
    }
}

impl fmt::Display for ConnectionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Submitted => f.write_str("submit"),
            Self::ValidationSucceeded => f.write_str("validation-succeeded"),
            Self::ValidationFailed { .. } => f.write_str("validation-failed"),
            Self::Removed => f.write_str("remove"),
        }
    }
}
