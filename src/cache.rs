//! Short-TTL in-memory cache for single-entity response projections.
//!
//! Keys follow the `{kind}_{id}` convention. Entries are written on
//! read-miss and on successful create/update, and removed on soft-delete
//! and counter mutations. The cache is process-local: concurrent callers
//! may race on `get_or_load` and load the same row twice; the last `put`
//! wins. The one ordering rule that matters is
//! enforced by the call sites: the backing-store write commits before the
//! cache entry is touched.

use std::future::Future;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::AppError;

struct CacheEntry {
    value: serde_json::Value,
    expires_at: Instant,
}

pub struct ResponseCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// Cache key for a single entity: `{kind}_{id}`.
    pub fn key(kind: &str, id: &str) -> String {
        format!("{kind}_{id}")
    }

    /// Return the live entry for `key`, dropping it if expired.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let expired = match self.entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => {
                return serde_json::from_value(entry.value.clone()).ok();
            }
            Some(_) => true,
            None => false,
        };
        // The read guard is released above; removing here cannot deadlock.
        if expired {
            self.entries.remove(key);
        }
        None
    }

    /// Unconditionally store `value` with a fresh TTL.
    pub fn put<T: Serialize>(&self, key: &str, value: &T) {
        let Ok(value) = serde_json::to_value(value) else {
            return;
        };
        self.entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                expires_at: Instant::now() + self.ttl,
            },
        );
    }

    /// Remove any entry for `key`; absent keys are not an error.
    pub fn invalidate(&self, key: &str) {
        self.entries.remove(key);
    }

    /// Read-through fetch: a live entry short-circuits the loader; on miss
    /// the loader runs and a `Some` result is cached. `None` (not found)
    /// is never cached, so the next request hits the store again. Loader
    /// errors propagate without touching the cache.
    pub async fn get_or_load<T, F, Fut>(&self, key: &str, loader: F) -> Result<Option<T>, AppError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<T>, AppError>>,
    {
        if let Some(hit) = self.get::<T>(key) {
            return Ok(Some(hit));
        }
        match loader().await? {
            Some(value) => {
                self.put(key, &value);
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }
}
