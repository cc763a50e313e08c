//! `FireKyt` Core Library
//!
//! Shared functionality for the `FireKyt` publishing client:
//! - Platform connection, scheduled publication and history models
//! - Connection form and scheduling validation
//! - Remote error classification into user-facing notices
//! - Connection lifecycle state machine
//! - Configuration resolution and tracing setup

pub mod config;
pub mod connection_form;
pub mod error;
pub mod history;
pub mod lifecycle;
pub mod model;
pub mod remote_error;
pub mod schedule;
pub mod tracing_init;

pub use config::Config;
pub use connection_form::{ConnectionDraft, ConnectionRequest, Field, FieldErrors, PlatformTarget};
pub use error::{Error, Result};
pub use lifecycle::{ConnectionEvent, ConnectionState, LifecycleError};
pub use model::{
    AccessToken, ContentItem, Platform, PlatformConnection, PublicationHistoryEntry,
    PublicationRecord, PublicationStatus, PublishSettings, ScheduledPublication,
};
pub use remote_error::{ErrorKind, NoticeDuration, RemoteError, UserNotice};
pub use schedule::{Clock, ScheduleDraft, ScheduleError, ScheduleFloor, ScheduleRequest, SystemClock};
