//! In-process TTL cache store.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use planets_core::constants::DEFAULT_MEMORY_CACHE_ENTRIES;
use planets_core::error::Result;
use planets_core::keys;
use planets_core::traits::CacheStore;

/// Cache entry with optional expiry.
#[derive(Clone)]
struct CacheEntry {
    value: Vec<u8>,
    inserted_at: Instant,
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Instant::now() >= at)
    }
}

/// Cache configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of entries
    pub max_entries: usize,
    /// Whether to drop expired entries before evicting live ones at capacity
    pub auto_cleanup: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MEMORY_CACHE_ENTRIES,
            auto_cleanup: true,
        }
    }
}

/// In-memory cache store.
///
/// Thread-safe and supports TTL-based expiration. Used in tests and as the
/// fallback when no networked store is configured; it never reports
/// `CacheUnavailable`.
pub struct MemoryStore {
    entries: RwLock<HashMap<String, CacheEntry>>,
    config: CacheConfig,
}

impl MemoryStore {
    /// Creates a new store with default configuration.
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default())
    }

    /// Creates a store with custom configuration.
    pub fn with_config(config: CacheConfig) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            config,
        }
    }

    fn insert(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) {
        let now = Instant::now();
        let mut entries = self.entries.write();

        if self.config.auto_cleanup && entries.len() >= self.config.max_entries {
            entries.retain(|_, e| !e.is_expired());
        }
        // Still at capacity? Drop the oldest entry, unless we are overwriting.
        if entries.len() >= self.config.max_entries && !entries.contains_key(key) {
            if let Some(oldest_key) = entries
                .iter()
                .min_by_key(|(_, e)| e.inserted_at)
                .map(|(k, _)| k.clone())
            {
                entries.remove(&oldest_key);
            }
        }

        entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                inserted_at: now,
                expires_at: ttl.map(|ttl| now + ttl),
            },
        );
    }

    fn lookup(&self, key: &str) -> Option<Vec<u8>> {
        let entries = self.entries.read();
        entries
            .get(key)
            .filter(|e| !e.is_expired())
            .map(|e| e.value.clone())
    }

    fn remove_prefix(&self, prefix: &str) -> u64 {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|k, _| !k.starts_with(prefix));
        (before - entries.len()) as u64
    }

    /// Returns true if `key` holds a live entry.
    pub fn contains(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    /// Removes all expired entries.
    pub fn cleanup_expired(&self) {
        self.entries.write().retain(|_, e| !e.is_expired());
    }

    /// Returns the number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Returns cache statistics.
    pub fn stats(&self) -> CacheStats {
        let entries = self.entries.read();
        let expired = entries.values().filter(|e| e.is_expired()).count();
        CacheStats {
            total_entries: entries.len(),
            expired_entries: expired,
            valid_entries: entries.len().saturating_sub(expired),
            capacity: self.config.max_entries,
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> Result<()> {
        self.insert(key, value, ttl);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.lookup(key))
    }

    async fn evict(&self, key: &str) -> Result<()> {
        self.entries.write().remove(key);
        Ok(())
    }

    async fn evict_all(&self, namespace: &str) -> Result<u64> {
        let removed = self.remove_prefix(&keys::namespace_prefix(namespace));
        debug!(namespace, removed, "Evicted namespace");
        Ok(removed)
    }
}

/// Cache statistics.
#[derive(Clone, Debug)]
pub struct CacheStats {
    pub total_entries: usize,
    pub expired_entries: usize,
    pub valid_entries: usize,
    pub capacity: usize,
}
