//! One-shot cache warm-up at startup.
//!
//! Pulls every planet from the external source, indexes film appearance counts
//! by name, and seeds them into the `appearances` namespace. Runs as a
//! [`ReadyHook`]: a failing source is logged and the process still becomes
//! ready.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use planets_core::error::Result;
use planets_core::traits::{CacheStore, PlanetSource, ReadyHook};
use planets_core::types::{AppearanceIndex, NamespacePolicy};

/// Outcome of one warm-up pass.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarmupReport {
    /// Records returned by the source
    pub records_fetched: usize,
    /// Index entries written to the cache
    pub entries_written: usize,
    /// Index entries the cache refused
    pub write_failures: usize,
}

impl WarmupReport {
    /// True when every index entry reached the cache.
    pub fn is_complete(&self) -> bool {
        self.write_failures == 0
    }
}

/// Seeds the appearance index into the cache.
pub struct CacheWarmer {
    source: Arc<dyn PlanetSource>,
    cache: Arc<dyn CacheStore>,
    policy: NamespacePolicy,
    fired: AtomicBool,
    last_report: Mutex<Option<WarmupReport>>,
}

impl CacheWarmer {
    /// Creates a warmer writing into the default `appearances` namespace.
    pub fn new(source: Arc<dyn PlanetSource>, cache: Arc<dyn CacheStore>) -> Self {
        Self::with_policy(source, cache, NamespacePolicy::appearances())
    }

    /// Creates a warmer with a custom namespace policy.
    pub fn with_policy(
        source: Arc<dyn PlanetSource>,
        cache: Arc<dyn CacheStore>,
        policy: NamespacePolicy,
    ) -> Self {
        Self {
            source,
            cache,
            policy,
            fired: AtomicBool::new(false),
            last_report: Mutex::new(None),
        }
    }

    /// Runs one warm-up pass.
    ///
    /// Fails only when the source fails; individual cache writes that fail are
    /// logged and counted in the report.
    #[instrument(skip(self), fields(namespace = %self.policy.name))]
    pub async fn warm(&self) -> Result<WarmupReport> {
        let records = self.source.fetch_all().await?;
        let index = AppearanceIndex::from_records(&records);

        let mut report = WarmupReport {
            records_fetched: records.len(),
            ..Default::default()
        };

        for (name, count) in index.iter() {
            let key = self.policy.key(name);
            match self
                .cache
                .set(&key, count.as_bytes().to_vec(), self.policy.ttl())
                .await
            {
                Ok(()) => report.entries_written += 1,
                Err(e) => {
                    warn!(key, error = %e, "Failed to seed appearance count");
                    report.write_failures += 1;
                }
            }
        }

        *self.last_report.lock() = Some(report.clone());
        Ok(report)
    }

    /// Reads a seeded appearance count back.
    ///
    /// Returns `None` if the name was never seeded or the entry is unreadable.
    pub async fn appearances(&self, name: &str) -> Result<Option<u32>> {
        let key = self.policy.key(name);
        let Some(bytes) = self.cache.get(&key).await? else {
            return Ok(None);
        };

        match std::str::from_utf8(&bytes).ok().and_then(|s| s.parse().ok()) {
            Some(count) => Ok(Some(count)),
            None => {
                warn!(key, "Unreadable appearance count in cache");
                Ok(None)
            }
        }
    }

    /// Report of the last successful pass, if any.
    pub fn last_report(&self) -> Option<WarmupReport> {
        self.last_report.lock().clone()
    }

    /// Namespace policy the index is written with.
    pub fn policy(&self) -> &NamespacePolicy {
        &self.policy
    }
}

#[async_trait]
impl ReadyHook for CacheWarmer {
    fn name(&self) -> &str {
        "cache-warmer"
    }

    async fn on_ready(&self) {
        if self.fired.swap(true, Ordering::SeqCst) {
            debug!("Cache warm-up already ran, skipping");
            return;
        }

        match self.warm().await {
            Ok(report) if report.is_complete() => info!(
                records = report.records_fetched,
                entries = report.entries_written,
                "Cache warm-up complete"
            ),
            Ok(report) => warn!(
                records = report.records_fetched,
                entries = report.entries_written,
                failures = report.write_failures,
                "Cache warm-up finished with write failures"
            ),
            Err(e) => warn!(error = %e, "Cache warm-up failed, starting without seeded appearances"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    use planets_cache::MemoryStore;
    use planets_core::error::PlanetsError;
    use planets_core::types::ExternalRecord;

    /// Source serving a fixed list and counting passes.
    struct StaticSource {
        records: Vec<ExternalRecord>,
        calls: AtomicUsize,
    }

    impl StaticSource {
        fn new(records: Vec<ExternalRecord>) -> Self {
            Self {
                records,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl PlanetSource for StaticSource {
        async fn fetch_all(&self) -> Result<Vec<ExternalRecord>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.records.clone())
        }
    }

    struct DownSource;

    #[async_trait]
    impl PlanetSource for DownSource {
        async fn fetch_all(&self) -> Result<Vec<ExternalRecord>> {
            Err(PlanetsError::SourceUnavailable("HTTP 500".into()))
        }
    }

    /// Store that refuses writes for one key.
    struct PickyStore {
        inner: MemoryStore,
        refused: String,
    }

    #[async_trait]
    impl CacheStore for PickyStore {
        async fn set(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> Result<()> {
            if key == self.refused {
                return Err(PlanetsError::CacheUnavailable("timed out".into()));
            }
            self.inner.set(key, value, ttl).await
        }

        async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
            self.inner.get(key).await
        }

        async fn evict(&self, key: &str) -> Result<()> {
            self.inner.evict(key).await
        }

        async fn evict_all(&self, namespace: &str) -> Result<u64> {
            self.inner.evict_all(namespace).await
        }
    }

    fn records() -> Vec<ExternalRecord> {
        vec![
            ExternalRecord::new("Tatooine", 5),
            ExternalRecord::new("Alderaan", 2),
            ExternalRecord::new("Yavin IV", 1),
        ]
    }

    #[tokio::test]
    async fn test_warm_seeds_appearances_namespace() {
        let cache = Arc::new(MemoryStore::new());
        let warmer = CacheWarmer::new(Arc::new(StaticSource::new(records())), cache.clone());

        let report = warmer.warm().await.unwrap();

        assert_eq!(
            report,
            WarmupReport {
                records_fetched: 3,
                entries_written: 3,
                write_failures: 0
            }
        );
        assert_eq!(cache.get("appearances::Tatooine").await.unwrap(), Some(b"5".to_vec()));
        assert_eq!(warmer.appearances("Alderaan").await.unwrap(), Some(2));
        assert_eq!(warmer.appearances("Kessel").await.unwrap(), None);
        assert_eq!(warmer.last_report(), Some(report));
    }

    #[tokio::test]
    async fn test_duplicate_names_last_write_wins() {
        let cache = Arc::new(MemoryStore::new());
        let source = StaticSource::new(vec![
            ExternalRecord::new("Hoth", 1),
            ExternalRecord::new("Hoth", 3),
        ]);
        let warmer = CacheWarmer::new(Arc::new(source), cache);

        let report = warmer.warm().await.unwrap();

        assert_eq!(report.records_fetched, 2);
        assert_eq!(report.entries_written, 1);
        assert_eq!(warmer.appearances("Hoth").await.unwrap(), Some(3));
    }

    #[tokio::test]
    async fn test_write_failures_are_counted() {
        let store = PickyStore {
            inner: MemoryStore::new(),
            refused: "appearances::Alderaan".into(),
        };
        let warmer = CacheWarmer::new(Arc::new(StaticSource::new(records())), Arc::new(store));

        let report = warmer.warm().await.unwrap();

        assert_eq!(report.entries_written, 2);
        assert_eq!(report.write_failures, 1);
        assert!(!report.is_complete());
        assert_eq!(warmer.appearances("Tatooine").await.unwrap(), Some(5));
    }

    #[tokio::test]
    async fn test_source_failure_propagates_from_warm() {
        let warmer = CacheWarmer::new(Arc::new(DownSource), Arc::new(MemoryStore::new()));

        let result = warmer.warm().await;

        assert!(matches!(result, Err(PlanetsError::SourceUnavailable(_))));
        assert!(warmer.last_report().is_none());
    }

    #[tokio::test]
    async fn test_on_ready_swallows_source_failure() {
        let cache = Arc::new(MemoryStore::new());
        let warmer = CacheWarmer::new(Arc::new(DownSource), cache.clone());

        warmer.on_ready().await;

        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_on_ready_runs_once() {
        let source = Arc::new(StaticSource::new(records()));
        let warmer = CacheWarmer::new(source.clone(), Arc::new(MemoryStore::new()));

        warmer.on_ready().await;
        warmer.on_ready().await;

        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        assert_eq!(warmer.appearances("Yavin IV").await.unwrap(), Some(1));
    }

    #[tokio::test]
    async fn test_unreadable_count_reads_as_none() {
        let cache = Arc::new(MemoryStore::new());
        cache.set("appearances::Hoth", vec![0xff, 0xfe], None).await.unwrap();
        let warmer = CacheWarmer::new(Arc::new(StaticSource::new(vec![])), cache);

        assert_eq!(warmer.appearances("Hoth").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_planets_namespace_untouched() {
        let cache = Arc::new(MemoryStore::new());
        cache.set("planets::name:Tatooine", b"{}".to_vec(), None).await.unwrap();
        let warmer = CacheWarmer::new(Arc::new(StaticSource::new(records())), cache.clone());

        warmer.warm().await.unwrap();

        assert_eq!(cache.get("planets::name:Tatooine").await.unwrap(), Some(b"{}".to_vec()));
    }
}
