//! Filtering, sorting and summarising of already-fetched publication lists.

use std::cmp::Reverse;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::model::{Platform, PublicationHistoryEntry, PublicationStatus, ScheduledPublication};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistoryFilter {
    pub platform: Option<Platform>,
    pub status: Option<PublicationStatus>,
}

impl HistoryFilter {
    pub fn matches(&self, entry: &PublicationHistoryEntry) -> bool {
        self.platform.is_none_or(|p| p == entry.platform)
            && self.status.is_none_or(|s| s == entry.status)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HistorySort {
    #[default]
    Newest,
    Oldest,
    MostViewed,
}

impl FromStr for HistorySort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest" => Ok(Self::Newest),
            "oldest" => Ok(Self::Oldest),
            "most-viewed" => Ok(Self::MostViewed),
            other => Err(format!(
                "Unknown sort order: {other} (expected newest, oldest or most-viewed)"
            )),
        }
    }
}

fn views(entry: &PublicationHistoryEntry) -> u64 {
    entry.metrics.map_or(0, |m| m.views)
}

/// Apply `filter`, then order by `sort`. Ties keep the newest first.
pub fn select(
    entries: &[PublicationHistoryEntry],
    filter: HistoryFilter,
    sort: HistorySort,
) -> Vec<PublicationHistoryEntry> {
    let mut out: Vec<_> = entries.iter().filter(|e| filter.matches(e)).cloned().collect();
    match sort {
        HistorySort::Newest => out.sort_by_key(|e| Reverse(e.published_at)),
        HistorySort::Oldest => out.sort_by_key(|e| e.published_at),
        HistorySort::MostViewed => out.sort_by_key(|e| (Reverse(views(e)), Reverse(e.published_at))),
    }
    out
}

/// Totals across a list of history entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistorySummary {
    pub attempts: usize,
    pub published: usize,
    pub failed: usize,
    pub views: u64,
    pub likes: u64,
    pub shares: u64,
}

impl HistorySummary {
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a PublicationHistoryEntry>) -> Self {
        entries.into_iter().fold(Self::default(), |mut acc, e| {
            acc.attempts += 1;
            match e.status {
                PublicationStatus::Published => acc.published += 1,
                PublicationStatus::Failed => acc.failed += 1,
                PublicationStatus::Pending
                | PublicationStatus::Cancelled
                | PublicationStatus::Unknown => {}
            }
            if let Some(m) = e.metrics {
                acc.views += m.views;
                acc.likes += m.likes;
                acc.shares += m.shares;
            }
            acc
        })
    }
}

/// Pending items still in the future, soonest first.
pub fn upcoming(items: &[ScheduledPublication], now: DateTime<Utc>) -> Vec<ScheduledPublication> {
    let mut out: Vec<_> = items
        .iter()
        .filter(|i| i.is_cancellable() && i.scheduled_at > now)
        .cloned()
        .collect();
    out.sort_by_key(|i| i.scheduled_at);
    out
}
