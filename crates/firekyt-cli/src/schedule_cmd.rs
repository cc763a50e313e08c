//! Schedule subcommands: create, list, cancel, floor.
//!
//! User-facing output uses writeln! to stdout (this is a CLI binary, not debug output).

use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use firekyt_client::PublishingService;
use firekyt_core::{ScheduleDraft, ScheduleFloor, SystemClock};
use firekyt_core::history::upcoming;
use firekyt_core::model::{ConnectionId, ContentId};

use crate::context::report;
use crate::fmt::{timestamp, write_scheduled_header, write_scheduled_row};
use crate::publish_cmd::SettingsArgs;

/// Schedule subcommand actions.
#[derive(clap::Subcommand, Debug)]
pub enum ScheduleAction {
    /// Schedule a publication at least 5 minutes ahead.
    Create {
        /// Content item ID.
        #[arg(long)]
        content: ContentId,
        /// Platform connection ID.
        #[arg(long)]
        connection: ConnectionId,
        /// When to publish: RFC 3339, or YYYY-MM-DDTHH:MM read as UTC.
        #[arg(long)]
        at: String,
        #[command(flatten)]
        settings: SettingsArgs,
    },
    /// List scheduled publications.
    List {
        /// Only pending items still in the future, soonest first.
        #[arg(long)]
        upcoming: bool,
    },
    /// Cancel a pending publication.
    Cancel {
        /// Scheduled publication ID.
        id: i64,
    },
    /// Show the earliest time a publication can be scheduled for.
    Floor {
        /// Keep printing the minimum as it refreshes.
        #[arg(long)]
        watch: bool,
    },
}

/// Execute a schedule subcommand.
pub async fn run(
    service: &PublishingService,
    action: ScheduleAction,
    floor_refresh: Duration,
) -> anyhow::Result<()> {
    let mut out = io::stdout();
    match action {
        ScheduleAction::Create {
            content,
            connection,
            at,
            settings,
        } => {
            let draft = ScheduleDraft {
                content_id: Some(content),
                platform_connection_id: Some(connection),
                scheduled_at: at,
                publish_settings: settings.into_settings(),
            };
            let item = service.schedule(&draft).await.map_err(report)?;
            writeln!(
                out,
                "Scheduled publication {} for {}",
                item.id,
                timestamp(item.scheduled_at)
            )?;
        }
        ScheduleAction::List { upcoming: only_upcoming } => {
            let mut items = service.scheduled().await.map_err(report)?;
            if only_upcoming {
                items = upcoming(&items, Utc::now());
            }
            if items.is_empty() {
                writeln!(out, "No scheduled publications.")?;
            } else {
                write_scheduled_header(&mut out)?;
                for item in &items {
                    write_scheduled_row(&mut out, item)?;
                }
                writeln!(out, "\n{} publication(s)", items.len())?;
            }
        }
        ScheduleAction::Cancel { id } => {
            service.cancel_scheduled(id).await.map_err(report)?;
            writeln!(out, "Cancelled scheduled publication {id}")?;
        }
        ScheduleAction::Floor { watch } => floor(watch, floor_refresh).await?,
    }
    Ok(())
}

/// Print the earliest schedulable time. Local only, so no login is needed.
pub async fn floor(watch: bool, refresh: Duration) -> anyhow::Result<()> {
    let mut out = io::stdout();
    let floor = ScheduleFloor::spawn(Arc::new(SystemClock), refresh);
    writeln!(out, "Earliest allowed: {}", timestamp(floor.current()))?;
    if watch {
        let mut rx = floor.subscribe();
        loop {
            tokio::select! {
                changed = rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let current = *rx.borrow_and_update();
                    writeln!(out, "Earliest allowed: {}", timestamp(current))?;
                }
                _ = tokio::signal::ctrl_c() => break,
            }
        }
    }
    Ok(())
}
