//! Output formatting helpers.

use std::io::{self, Write};

use chrono::{DateTime, Utc};
use firekyt_client::{ConnectionCheck, PublishError};
use firekyt_core::history::HistorySummary;
use firekyt_core::model::{
    PlatformConnection, PublicationHistoryEntry, PublicationRecord, ScheduledPublication,
};
use firekyt_core::{ConnectionState, UserNotice};

pub fn timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M UTC").to_string()
}

pub fn truncate(s: &str, max: usize) -> String {
    let count = s.chars().count();
    if count <= max {
        s.to_string()
    } else {
        format!("{}…", s.chars().take(max - 1).collect::<String>())
    }
}

pub const fn active_str(active: bool) -> &'static str {
    if active { "active" } else { "inactive" }
}

pub fn write_connection_row(w: &mut impl Write, c: &PlatformConnection) -> io::Result<()> {
    writeln!(
        w,
        "{:<6} {:<10} {:<30} {:<9} {}",
        c.id,
        c.platform,
        truncate(c.label(), 30),
        active_str(c.is_active),
        c.error_detail().map(|e| truncate(e, 40)).unwrap_or_default(),
    )
}

pub fn write_connection_header(w: &mut impl Write) -> io::Result<()> {
    writeln!(
        w,
        "{:<6} {:<10} {:<30} {:<9} {}",
        "ID", "PLATFORM", "ACCOUNT", "STATUS", "ERROR"
    )
}

pub fn write_connection_detail(
    w: &mut impl Write,
    c: &PlatformConnection,
    state: &ConnectionState,
) -> io::Result<()> {
    writeln!(w, "  ID:       {}", c.id)?;
    writeln!(w, "  Platform: {}", c.platform)?;
    if let Some(user) = &c.platform_username {
        writeln!(w, "  Account:  {user}")?;
    }
    if let Some(url) = &c.blog_url {
        writeln!(w, "  Blog:     {url}")?;
    }
    if let Some(endpoint) = &c.api_endpoint {
        writeln!(w, "  API:      {endpoint}")?;
    }
    writeln!(w, "  State:    {state}")?;
    if let Some(error) = state.error() {
        writeln!(w, "  Error:    {error}")?;
    }
    writeln!(w, "  Created:  {}", timestamp(c.created_at))?;
    Ok(())
}

pub fn write_check(w: &mut impl Write, check: &ConnectionCheck) -> io::Result<()> {
    let marker = if check.deactivated() { "  (was active)" } else { "" };
    match check.state.error() {
        Some(error) => writeln!(
            w,
            "{:<6} {:<20} {}{marker}",
            check.connection_id, check.state, error
        ),
        None => writeln!(w, "{:<6} {}", check.connection_id, check.state),
    }
}

pub fn write_scheduled_header(w: &mut impl Write) -> io::Result<()> {
    writeln!(
        w,
        "{:<6} {:<8} {:<10} {:<20} {:<10}",
        "ID", "CONTENT", "CONNECTION", "SCHEDULED", "STATUS"
    )
}

pub fn write_scheduled_row(w: &mut impl Write, s: &ScheduledPublication) -> io::Result<()> {
    writeln!(
        w,
        "{:<6} {:<8} {:<10} {:<20} {:<10}",
        s.id,
        s.content_id,
        s.platform_connection_id,
        timestamp(s.scheduled_at),
        s.status,
    )
}

pub fn write_history_header(w: &mut impl Write) -> io::Result<()> {
    writeln!(
        w,
        "{:<6} {:<40} {:<10} {:<10} {:<20} {:>8}",
        "ID", "TITLE", "PLATFORM", "STATUS", "PUBLISHED", "VIEWS"
    )
}

pub fn write_history_row(w: &mut impl Write, e: &PublicationHistoryEntry) -> io::Result<()> {
    writeln!(
        w,
        "{:<6} {:<40} {:<10} {:<10} {:<20} {:>8}",
        e.id,
        truncate(&e.content_title, 40),
        e.platform,
        e.status,
        timestamp(e.published_at),
        e.metrics.map_or_else(|| "-".to_string(), |m| m.views.to_string()),
    )
}

pub fn write_summary(w: &mut impl Write, s: &HistorySummary) -> io::Result<()> {
    writeln!(w, "  Attempts:  {}", s.attempts)?;
    writeln!(w, "  Published: {}", s.published)?;
    writeln!(w, "  Failed:    {}", s.failed)?;
    writeln!(w, "  Views:     {}", s.views)?;
    writeln!(w, "  Likes:     {}", s.likes)?;
    writeln!(w, "  Shares:    {}", s.shares)?;
    Ok(())
}

pub fn write_record(w: &mut impl Write, r: &PublicationRecord) -> io::Result<()> {
    writeln!(w, "  Publication: {}", r.id)?;
    writeln!(w, "  Status:      {}", r.status)?;
    if let Some(url) = &r.platform_url {
        writeln!(w, "  URL:         {url}")?;
    }
    if let Some(at) = r.published_at {
        writeln!(w, "  Published:   {}", timestamp(at))?;
    }
    if let Some(message) = &r.message {
        writeln!(w, "  Message:     {message}")?;
    }
    Ok(())
}

/// Title, description and field-level errors of a failed operation.
pub fn write_notice(w: &mut impl Write, notice: &UserNotice, err: &PublishError) -> io::Result<()> {
    writeln!(w, "{}", notice.title)?;
    match err {
        PublishError::Form(errors) => {
            for e in errors.iter() {
                writeln!(w, "  {}: {}", e.field, e.message)?;
            }
        }
        _ => {
            for line in notice.description.lines() {
                writeln!(w, "  {line}")?;
            }
        }
    }
    if notice.retry_recommended {
        writeln!(w, "  You can retry this operation.")?;
    }
    Ok(())
}
