//! Two-layer cache manager for API responses
//!
//! Provides a `CacheManager` that keeps entries in an in-memory map and mirrors
//! them to a durable [`KeyValueStore`]. Every entry carries the time it was
//! written; an entry older than the TTL is treated as absent on read.

use chrono::Utc;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing::{debug, warn};

use super::store::{KeyValueStore, StoreError};

/// Source of the current time in Unix milliseconds
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Wrapper stored for every cache key
///
/// Serialized as `{"timestamp": <unix millis>, "data": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    /// When the entry was written (Unix milliseconds)
    pub timestamp: i64,
    /// The cached data
    pub data: T,
}

impl<T> CacheEntry<T> {
    /// An entry is valid while `now - timestamp < ttl`
    pub fn is_fresh(&self, now_millis: i64, ttl: Duration) -> bool {
        let ttl_millis = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        now_millis.saturating_sub(self.timestamp) < ttl_millis
    }
}

/// Read-through cache with an in-memory fast path and a durable store
///
/// The in-memory copy is a cache of the durable copy. Reads check memory
/// first, then the store, promoting fresh durable entries into memory.
/// Writes go to memory immediately and to the store best-effort.
pub struct CacheManager {
    memory: Mutex<HashMap<String, CacheEntry<Value>>>,
    store: Arc<dyn KeyValueStore>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for CacheManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheManager")
            .field("ttl", &self.ttl)
            .field("memory_entries", &self.memory_len())
            .finish()
    }
}

impl CacheManager {
    /// Creates a cache over `store` where entries live for `ttl`
    pub fn new(store: Arc<dyn KeyValueStore>, ttl: Duration) -> Self {
        Self {
            memory: Mutex::new(HashMap::new()),
            store,
            ttl,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replaces the clock used to stamp and age entries
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Reads a fresh entry for `key`
    ///
    /// Returns `None` when the key is missing, expired, or cannot be parsed
    /// as `T`. Store read failures are logged and treated as a miss.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let now = self.clock.now_millis();

        if let Some(value) = self.memory_lookup(key, now) {
            match serde_json::from_value(value) {
                Ok(data) => {
                    debug!(key, "memory cache hit");
                    return Some(data);
                }
                Err(e) => debug!(key, error = %e, "memory cache entry has unexpected shape"),
            }
        }

        let raw = match self.store.get_item(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key, "cache miss");
                return None;
            }
            Err(e) => {
                warn!(key, error = %e, "durable cache read failed");
                return None;
            }
        };

        let entry: CacheEntry<Value> = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                debug!(key, error = %e, "ignoring unreadable durable cache entry");
                return None;
            }
        };

        if !entry.is_fresh(now, self.ttl) {
            debug!(key, "durable cache entry expired");
            return None;
        }

        let data = match serde_json::from_value(entry.data.clone()) {
            Ok(data) => data,
            Err(e) => {
                debug!(key, error = %e, "durable cache entry has unexpected shape");
                return None;
            }
        };

        debug!(key, "durable cache hit, promoting to memory");
        self.lock_memory().insert(key.to_string(), entry);
        Some(data)
    }

    /// Writes `data` under `key` stamped with the current time
    ///
    /// The in-memory map is updated before the durable write starts. A
    /// durable write failure is logged and otherwise ignored.
    pub async fn set<T: Serialize>(&self, key: &str, data: &T) {
        let value = match serde_json::to_value(data) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "failed to serialize cache data");
                return;
            }
        };

        let entry = CacheEntry {
            timestamp: self.clock.now_millis(),
            data: value,
        };

        let raw = match serde_json::to_string(&entry) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(key, error = %e, "failed to serialize cache entry");
                return;
            }
        };

        self.lock_memory().insert(key.to_string(), entry);

        if let Err(e) = self.store.set_item(key, raw).await {
            warn!(key, error = %e, "durable cache write failed");
        }
    }

    /// Drops the in-memory layer; durable entries stay readable
    pub fn clear_memory(&self) {
        self.lock_memory().clear();
    }

    /// Drops both layers
    pub async fn clear(&self) -> Result<(), StoreError> {
        self.clear_memory();
        self.store.clear().await
    }

    fn memory_len(&self) -> usize {
        self.lock_memory().len()
    }

    fn memory_lookup(&self, key: &str, now: i64) -> Option<Value> {
        let memory = self.lock_memory();
        memory
            .get(key)
            .filter(|entry| entry.is_fresh(now, self.ttl))
            .map(|entry| entry.data.clone())
    }

    fn lock_memory(&self) -> std::sync::MutexGuard<'_, HashMap<String, CacheEntry<Value>>> {
        self.memory.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
