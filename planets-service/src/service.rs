//! Cache-aside reads and invalidating writes over the planet repository.
//!
//! Reads consult the cache first and fill it from the repository on a miss.
//! Writes go to the repository and then drop the whole `planets` namespace.
//! The cache is never authoritative: any failure talking to it degrades to a
//! plain repository call.

use std::future::Future;
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use planets_core::error::Result;
use planets_core::keys;
use planets_core::traits::{CacheStore, PlanetRepository};
use planets_core::types::{NamespacePolicy, NewPlanet, PageRequest, PaginatedResult, Planet};

/// Planet lookups and mutations with a cache in front of the repository.
pub struct PlanetsService {
    repository: Arc<dyn PlanetRepository>,
    cache: Arc<dyn CacheStore>,
    policy: NamespacePolicy,
}

impl PlanetsService {
    /// Creates a service using the default `planets` namespace policy.
    pub fn new(repository: Arc<dyn PlanetRepository>, cache: Arc<dyn CacheStore>) -> Self {
        Self::with_policy(repository, cache, NamespacePolicy::planets())
    }

    /// Creates a service with a custom namespace policy.
    pub fn with_policy(
        repository: Arc<dyn PlanetRepository>,
        cache: Arc<dyn CacheStore>,
        policy: NamespacePolicy,
    ) -> Self {
        Self {
            repository,
            cache,
            policy,
        }
    }

    /// Namespace policy applied to cached planets.
    pub fn policy(&self) -> &NamespacePolicy {
        &self.policy
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // READS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Looks a planet up by id.
    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Planet>> {
        let key = self.policy.key(&keys::id_key(id));
        self.read_through(&key, || self.repository.find_by_id(id))
            .await
    }

    /// Looks a planet up by exact name.
    #[instrument(skip(self))]
    pub async fn get_by_name(&self, name: &str) -> Result<Option<Planet>> {
        let key = self.policy.key(&keys::name_key(name));
        self.read_through(&key, || self.repository.find_by_name(name))
            .await
    }

    /// Returns one page of planets, straight from the repository.
    ///
    /// Pages are never cached.
    #[instrument(skip(self))]
    pub async fn list_page(
        &self,
        page_number: u32,
        page_size: u32,
        sort: &str,
    ) -> Result<PaginatedResult<Planet>> {
        let request = PageRequest::parse(page_number, page_size, sort)?;
        let (content, total) = self.repository.find_all_paged(&request).await?;
        Ok(PaginatedResult::new(content, total, &request))
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // WRITES
    // ═══════════════════════════════════════════════════════════════════════════

    /// Stores a new planet, then evicts the namespace.
    ///
    /// A rejected save (`Conflict`, `ValidationError`) evicts nothing.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn save(&self, input: NewPlanet) -> Result<Planet> {
        let planet = self.repository.save(input).await?;
        info!(id = %planet.id, "Saved planet");
        self.evict_namespace().await;
        Ok(planet)
    }

    /// Deletes a planet. Returns false, evicting nothing, if it did not exist.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        if !self.repository.exists_by_id(id).await? {
            debug!("Planet not found, nothing to delete");
            return Ok(false);
        }

        let deleted = self.repository.delete_by_id(id).await?;
        if deleted {
            info!("Deleted planet");
        }
        self.evict_namespace().await;
        Ok(deleted)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // CACHE PLUMBING
    // ═══════════════════════════════════════════════════════════════════════════

    async fn read_through<F, Fut>(&self, key: &str, load: F) -> Result<Option<Planet>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<Planet>>>,
    {
        let cache_reachable = match self.cache.get(key).await {
            Ok(Some(bytes)) => match serde_json::from_slice::<Planet>(&bytes) {
                Ok(planet) => {
                    debug!(key, "Cache hit");
                    return Ok(Some(planet));
                }
                Err(e) => {
                    warn!(key, error = %e, "Discarding unreadable cache entry");
                    if let Err(e) = self.cache.evict(key).await {
                        warn!(key, error = %e, "Failed to evict unreadable cache entry");
                    }
                    true
                }
            },
            Ok(None) => {
                debug!(key, "Cache miss");
                true
            }
            Err(e) => {
                warn!(key, error = %e, "Cache unavailable, reading from repository");
                false
            }
        };

        let planet = load().await?;

        if cache_reachable {
            if let Some(planet) = &planet {
                self.write_back(key, planet).await;
            }
        }
        Ok(planet)
    }

    async fn write_back(&self, key: &str, planet: &Planet) {
        let bytes = match serde_json::to_vec(planet) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(key, error = %e, "Failed to encode planet for cache");
                return;
            }
        };
        if let Err(e) = self.cache.set(key, bytes, self.policy.ttl()).await {
            warn!(key, error = %e, "Cache write-back failed");
        }
    }

    async fn evict_namespace(&self) {
        match self.cache.evict_all(&self.policy.name).await {
            Ok(removed) => debug!(namespace = %self.policy.name, removed, "Evicted namespace"),
            Err(e) => warn!(
                namespace = %self.policy.name,
                error = %e,
                "Namespace eviction failed, stale entries live until TTL"
            ),
        }
    }
}
