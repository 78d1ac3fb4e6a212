// In-memory cache backend.
// A concurrent map of fingerprint to entry, shared by every client in the process.

use std::time::Duration;

use chrono::Utc;
use dashmap::DashMap;
use tracing::trace;

use crate::ckan::ApiResponse;
use crate::error::Result;

use super::store::{CacheEntry, CacheStore};

/// Concurrent in-memory store. Expired entries stay until overwritten or pruned.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: DashMap<String, CacheEntry>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every expired entry and return how many were removed.
    pub fn prune_expired(&self) -> usize {
        let now = Utc::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired_at(now));
        let removed = before.saturating_sub(self.entries.len());
        trace!(removed, "pruned expired cache entries");
        removed
    }

    #[cfg(test)]
    pub(crate) fn insert_entry(&self, key: &str, entry: CacheEntry) {
        self.entries.insert(key.to_string(), entry);
    }
}

impl CacheStore for MemoryCache {
    fn get(&self, key: &str) -> Result<Option<ApiResponse>> {
        Ok(self
            .entries
            .get(key)
            .and_then(|entry| entry.value().clone().into_fresh()))
    }

    fn set(&self, key: &str, value: &ApiResponse, ttl: Duration) -> Result<()> {
        self.entries
            .insert(key.to_string(), CacheEntry::new(value.clone(), ttl));
        Ok(())
    }
}
