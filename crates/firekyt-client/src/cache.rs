//! Query cache keyed by resource.
//!
//! Entries are JSON snapshots of list responses. Mutations never write into
//! another resource's entry; they only mark it stale, so the next read
//! refetches. A stale snapshot stays readable through [`QueryCache::peek`],
//! and [`QueryCache::patch`] can fold a known outcome into it without making
//! it fresh.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::api::paths;

/// Cached list resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Connections,
    Scheduled,
    History,
    Content,
}

impl QueryKey {
    pub const ALL: [Self; 4] = [
        Self::Connections,
        Self::Scheduled,
        Self::History,
        Self::Content,
    ];

    /// Resource path the entry mirrors.
    pub const fn path(self) -> &'static str {
        match self {
            Self::Connections => paths::CONNECTIONS,
            Self::Scheduled => paths::SCHEDULED,
            Self::History => paths::HISTORY,
            Self::Content => paths::CONTENT,
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Debug, Clone)]
struct Entry {
    value: serde_json::Value,
    stale: bool,
}

/// Shared, cloneable query cache.
#[derive(Debug, Clone, Default)]
pub struct QueryCache {
    entries: Arc<RwLock<HashMap<QueryKey, Entry>>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh entry for `key`, if any.
    pub async fn get<T: DeserializeOwned>(&self, key: QueryKey) -> Option<T> {
        let entries = self.entries.read().await;
        let entry = entries.get(&key).filter(|e| !e.stale)?;
        decode(key, &entry.value)
    }

    /// Entry for `key` regardless of staleness.
    pub async fn peek<T: DeserializeOwned>(&self, key: QueryKey) -> Option<T> {
        let entries = self.entries.read().await;
        decode(key, &entries.get(&key)?.value)
    }

    /// Store a fresh snapshot.
    pub async fn put<T: Serialize + ?Sized>(&self, key: QueryKey, value: &T) {
        match serde_json::to_value(value) {
            Ok(value) => {
                self.entries
                    .write()
                    .await
                    .insert(key, Entry { value, stale: false });
                debug!(%key, "Cache entry stored");
            }
            Err(e) => warn!(%key, error = %e, "Failed to cache value"),
        }
    }

    /// Mark `key` stale. The snapshot is kept for [`Self::peek`].
    pub async fn invalidate(&self, key: QueryKey) {
        if let Some(entry) = self.entries.write().await.get_mut(&key) {
            entry.stale = true;
            debug!(%key, "Cache entry invalidated");
        }
    }

    pub async fn invalidate_all(&self, keys: &[QueryKey]) {
        let mut entries = self.entries.write().await;
        for key in keys {
            if let Some(entry) = entries.get_mut(key) {
                entry.stale = true;
            }
        }
        debug!(?keys, "Cache entries invalidated");
    }

    /// Whether `key` needs a refetch (absent or stale).
    pub async fn is_stale(&self, key: QueryKey) -> bool {
        self.entries.read().await.get(&key).is_none_or(|e| e.stale)
    }

    /// Edit the snapshot for `key` in place. Staleness is unchanged.
    ///
    /// Returns `false` when there is no entry or it does not decode as `T`.
    pub async fn patch<T, F>(&self, key: QueryKey, edit: F) -> bool
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&mut T),
    {
        let mut entries = self.entries.write().await;
        let Some(entry) = entries.get_mut(&key) else {
            return false;
        };
        let Some(mut value) = decode::<T>(key, &entry.value) else {
            return false;
        };
        edit(&mut value);
        match serde_json::to_value(&value) {
            Ok(value) => {
                entry.value = value;
                true
            }
            Err(e) => {
                warn!(%key, error = %e, "Failed to re-encode patched entry");
                false
            }
        }
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    /// Return the fresh entry for `key`, or run `loader` and store its result.
    ///
    /// Loader errors are returned as-is and leave the cache untouched.
    pub async fn get_or_load<T, E, F, Fut>(&self, key: QueryKey, loader: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(hit) = self.get(key).await {
            debug!(%key, "Cache hit");
            return Ok(hit);
        }
        let value = loader().await?;
        self.put(key, &value).await;
        Ok(value)
    }
}

fn decode<T: DeserializeOwned>(key: QueryKey, value: &serde_json::Value) -> Option<T> {
    match T::deserialize(value) {
        Ok(v) => Some(v),
        Err(e) => {
            warn!(%key, error = %e, "Cached value has unexpected shape");
            None
        }
    }
}
