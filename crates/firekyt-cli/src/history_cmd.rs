//! Publication history.
//!
//! User-facing output uses writeln! to stdout (this is a CLI binary, not debug output).

use std::io::{self, Write};

use firekyt_client::PublishingService;
use firekyt_core::history::{HistoryFilter, HistorySort, HistorySummary, select};
use firekyt_core::model::{Platform, PublicationStatus};

use crate::context::report;
use crate::fmt::{write_history_header, write_history_row, write_summary};

#[derive(clap::Args, Debug)]
pub struct HistoryArgs {
    /// Only this platform.
    #[arg(long)]
    pub platform: Option<Platform>,
    /// Only this status: pending, published, failed, cancelled.
    #[arg(long)]
    pub status: Option<PublicationStatus>,
    /// Order: newest, oldest, most-viewed.
    #[arg(long, default_value = "newest")]
    pub sort: HistorySort,
    /// Print totals instead of rows.
    #[arg(long)]
    pub summary: bool,
}

impl HistoryArgs {
    const fn filter(&self) -> HistoryFilter {
        HistoryFilter {
            platform: self.platform,
            status: self.status,
        }
    }
}

pub async fn run(service: &PublishingService, args: HistoryArgs) -> anyhow::Result<()> {
    let entries = service.history().await.map_err(report)?;
    let selected = select(&entries, args.filter(), args.sort);

    let mut out = io::stdout();
    if args.summary {
        write_summary(&mut out, &HistorySummary::from_entries(&selected))?;
    } else if selected.is_empty() {
        writeln!(out, "No publication history.")?;
    } else {
        write_history_header(&mut out)?;
        for entry in &selected {
            write_history_row(&mut out, entry)?;
        }
        writeln!(out, "\n{} entries", selected.len())?;
    }
    Ok(())
}
