//! Redis-backed cache store.
//!
//! Uses a multiplexed [`ConnectionManager`], which reconnects on its own and is
//! cheap to clone per command, so no connection state is shared between calls
//! beyond the manager itself. Every command runs under a timeout.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, RedisResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use planets_core::constants::{DEFAULT_CACHE_TIMEOUT_MS, DEFAULT_SCAN_BATCH};
use planets_core::error::{PlanetsError, Result};
use planets_core::keys;
use planets_core::traits::CacheStore;

/// Redis connection configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RedisConfig {
    /// Connection URL (e.g. "redis://127.0.0.1:6379/0")
    pub url: String,
    /// Timeout applied to connecting and to every command, in milliseconds
    pub command_timeout_ms: u64,
    /// `COUNT` hint for each `SCAN` round trip during namespace eviction
    pub scan_batch: usize,
}

impl RedisConfig {
    /// Creates a config for `url` with default timeouts.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            command_timeout_ms: DEFAULT_CACHE_TIMEOUT_MS,
            scan_batch: DEFAULT_SCAN_BATCH,
        }
    }

    /// Overrides the per-command timeout.
    pub fn with_timeout_ms(mut self, command_timeout_ms: u64) -> Self {
        self.command_timeout_ms = command_timeout_ms;
        self
    }

    fn timeout(&self) -> Duration {
        Duration::from_millis(self.command_timeout_ms)
    }
}

/// Cache store backed by Redis.
pub struct RedisStore {
    connection: ConnectionManager,
    config: RedisConfig,
}

impl RedisStore {
    /// Connects to Redis.
    ///
    /// Fails with `ConfigError` for a malformed URL and `CacheUnavailable` if
    /// the server cannot be reached within the command timeout.
    #[instrument(skip(config), fields(url = %config.url))]
    pub async fn connect(config: RedisConfig) -> Result<Self> {
        let client = redis::Client::open(config.url.as_str())
            .map_err(|e| PlanetsError::ConfigError(format!("invalid redis url: {e}")))?;

        let connection = tokio::time::timeout(config.timeout(), ConnectionManager::new(client))
            .await
            .map_err(|_| {
                PlanetsError::CacheUnavailable(format!(
                    "connect timed out after {}ms",
                    config.command_timeout_ms
                ))
            })?
            .map_err(|e| PlanetsError::CacheUnavailable(format!("connect: {e}")))?;

        info!("Connected to redis");
        Ok(Self { connection, config })
    }

    /// Runs one redis command under the configured timeout.
    async fn run<T, F>(&self, op: &str, command: F) -> Result<T>
    where
        F: Future<Output = RedisResult<T>>,
    {
        match tokio::time::timeout(self.config.timeout(), command).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(PlanetsError::CacheUnavailable(format!("{op}: {e}"))),
            Err(_) => Err(PlanetsError::CacheUnavailable(format!(
                "{op}: timed out after {}ms",
                self.config.command_timeout_ms
            ))),
        }
    }
}

#[async_trait]
impl CacheStore for RedisStore {
    #[instrument(skip(self, value), fields(bytes = value.len()))]
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> Result<()> {
        let mut conn = self.connection.clone();
        match ttl {
            // SET EX rejects 0; sub-second TTLs round up to one second.
            Some(ttl) => {
                let seconds = ttl.as_secs().max(1);
                self.run("SET EX", conn.set_ex::<_, _, ()>(key, value, seconds))
                    .await
            }
            None => self.run("SET", conn.set::<_, _, ()>(key, value)).await,
        }
    }

    #[instrument(skip(self))]
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.connection.clone();
        self.run("GET", conn.get::<_, Option<Vec<u8>>>(key)).await
    }

    #[instrument(skip(self))]
    async fn evict(&self, key: &str) -> Result<()> {
        let mut conn = self.connection.clone();
        let removed: u64 = self.run("DEL", conn.del(key)).await?;
        debug!(key, removed, "Evicted key");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn evict_all(&self, namespace: &str) -> Result<u64> {
        let mut conn = self.connection.clone();
        let pattern = scan_pattern(namespace);
        let mut cursor: u64 = 0;
        let mut removed: u64 = 0;

        loop {
            let mut scan = redis::cmd("SCAN");
            scan.arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(self.config.scan_batch);
            let (next, batch): (u64, Vec<String>) =
                self.run("SCAN", scan.query_async(&mut conn)).await?;

            if !batch.is_empty() {
                let deleted: u64 = self.run("DEL", conn.del(&batch)).await?;
                removed += deleted;
            }

            if next == 0 {
                break;
            }
            cursor = next;
        }

        debug!(namespace, removed, "Evicted namespace");
        Ok(removed)
    }
}

/// `SCAN MATCH` pattern covering every key of `namespace`, with glob
/// metacharacters in the namespace escaped.
fn scan_pattern(namespace: &str) -> String {
    let prefix = keys::namespace_prefix(namespace);
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for c in prefix.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('*');
    pattern
}
