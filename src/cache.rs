use crate::models::LinkPageConfig;
use dashmap::DashMap;
use std::sync::Arc;

/// Thread-safe in-memory cache mapping page id -> last-loaded config.
///
/// Backed by a DashMap so reads are concurrent and lock-free for most cases.
/// Backfilled on read misses and refreshed by the save handler after every
/// successful write, so public renders rarely touch the field store.
#[derive(Clone, Debug)]
pub struct ConfigCache {
    inner: Arc<DashMap<i64, LinkPageConfig>>,
}

impl ConfigCache {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
        }
    }

    /// Insert or replace a cached config.
    pub fn set(&self, config: LinkPageConfig) {
        self.inner.insert(config.id, config);
    }

    /// Look up a page. Returns a clone of the config if present.
    pub fn get(&self, page_id: i64) -> Option<LinkPageConfig> {
        self.inner.get(&page_id).map(|v| v.clone())
    }

    /// Drop a cached entry (e.g. after a failed save leaves state unknown).
    pub fn remove(&self, page_id: i64) {
        self.inner.remove(&page_id);
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl Default for ConfigCache {
    fn default() -> Self {
        Self::new()
    }
}
