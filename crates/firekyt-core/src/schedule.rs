//! Scheduling validation.
//!
//! A publication may only be scheduled at least [`MIN_LEAD_MS`] into the
//! future. Two clocks are involved:
//! - [`ScheduleFloor`] keeps the *displayed* minimum (`now + 5 min`) and
//!   refreshes it on an interval so long-open forms keep an honest minimum.
//! - [`ScheduleDraft::validate`] always checks against the live clock at
//!   submission time, never against the cached floor.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::model::{ConnectionId, ContentId, PublishSettings};

/// Minimum distance between "now" and a scheduled publication.
pub const MIN_LEAD_MS: i64 = 5 * 60 * 1000;

/// Default refresh period of the displayed minimum.
pub const FLOOR_REFRESH: Duration = Duration::from_secs(60);

/// Source of the current time.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock for tests and replays.
#[derive(Debug)]
pub struct FixedClock(Mutex<DateTime<Utc>>);

impl FixedClock {
    pub const fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.0.lock().unwrap_or_else(std::sync::PoisonError::into_inner) = now;
    }

    pub fn advance(&self, by: TimeDelta) {
        let mut guard = self.0.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        *guard += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

/// Scheduling validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("Content is required")]
    MissingContent,

    #[error("Platform connection is required")]
    MissingConnection,

    #[error("Scheduled time is required")]
    MissingTime,

    #[error("Invalid scheduled time: {input}")]
    InvalidTimestamp { input: String },

    #[error("Scheduled time must be at least 5 minutes in the future")]
    TooSoon { earliest: DateTime<Utc> },
}

/// Earliest instant a publication may be scheduled for, given `now`.
pub fn earliest_allowed(now: DateTime<Utc>) -> DateTime<Utc> {
    now + TimeDelta::milliseconds(MIN_LEAD_MS)
}

/// Parse a scheduled time.
///
/// Accepts RFC 3339 (with any offset) and the `datetime-local` forms
/// `YYYY-MM-DDTHH:MM[:SS]`, which are taken as UTC.
pub fn parse_scheduled_at(input: &str) -> Result<DateTime<Utc>, ScheduleError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ScheduleError::MissingTime);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| ScheduleError::InvalidTimestamp {
            input: trimmed.to_string(),
        })
}

/// Parse `input` and require it to be at least five minutes after `now`.
pub fn validate_scheduled_at(
    input: &str,
    now: DateTime<Utc>,
) -> Result<DateTime<Utc>, ScheduleError> {
    let scheduled_at = parse_scheduled_at(input)?;
    let delta_ms = (scheduled_at - now).num_milliseconds();
    if delta_ms < MIN_LEAD_MS {
        return Err(ScheduleError::TooSoon {
            earliest: earliest_allowed(now),
        });
    }
    Ok(scheduled_at)
}

/// Raw scheduling form input.
#[derive(Debug, Clone, Default)]
pub struct ScheduleDraft {
    pub content_id: Option<ContentId>,
    pub platform_connection_id: Option<ConnectionId>,
    pub scheduled_at: String,
    pub publish_settings: Option<PublishSettings>,
}

/// Body of `POST /api/publishing/schedule`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    pub content_id: ContentId,
    pub platform_connection_id: ConnectionId,
    pub scheduled_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish_settings: Option<PublishSettings>,
}

impl ScheduleDraft {
    /// Validate against `now`, which callers take from the live clock at
    /// submission time.
    pub fn validate(&self, now: DateTime<Utc>) -> Result<ScheduleRequest, ScheduleError> {
        let content_id = self.content_id.ok_or(ScheduleError::MissingContent)?;
        let platform_connection_id = self
            .platform_connection_id
            .ok_or(ScheduleError::MissingConnection)?;
        let scheduled_at = validate_scheduled_at(&self.scheduled_at, now)?;
        Ok(ScheduleRequest {
            content_id,
            platform_connection_id,
            scheduled_at,
            publish_settings: self
                .publish_settings
                .clone()
                .filter(|s| !s.is_empty()),
        })
    }
}

/// Periodically refreshed "earliest allowed" instant for display.
pub struct ScheduleFloor {
    rx: watch::Receiver<DateTime<Utc>>,
    task: JoinHandle<()>,
}

impl ScheduleFloor {
    /// Compute the floor now and refresh it every `interval` on a tokio task.
    ///
    /// Must be called from within a tokio runtime. The task stops when the
    /// floor is dropped.
    pub fn spawn(clock: Arc<dyn Clock>, interval: Duration) -> Self {
        let (tx, rx) = watch::channel(earliest_allowed(clock.now()));
        let task = tokio::spawn(async move {
            let start = tokio::time::Instant::now() + interval;
            let mut ticker = tokio::time::interval_at(start, interval);
            loop {
                ticker.tick().await;
                let floor = earliest_allowed(clock.now());
                debug!(%floor, "Refreshed scheduling floor");
                if tx.send(floor).is_err() {
                    break;
                }
            }
        });
        Self { rx, task }
    }

    /// The minimum as of the last refresh.
    pub fn current(&self) -> DateTime<Utc> {
        *self.rx.borrow()
    }

    /// Receiver notified on every refresh.
    pub fn subscribe(&self) -> watch::Receiver<DateTime<Utc>> {
        self.rx.clone()
    }
}

impl Drop for ScheduleFloor {
    fn drop(&mut self) {
        self.task.abort();
    }
}
