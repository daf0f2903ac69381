//! Common traits for the planets cache layer.
//!
//! These traits are the seams between the cache-aside service and its
//! collaborators, so each side can be swapped or faked in tests.

use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::types::{ExternalRecord, NewPlanet, PageRequest, Planet};

// ═══════════════════════════════════════════════════════════════════════════════
// REPOSITORY TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Source of truth for planet records.
///
/// Implementations might use:
/// - In-memory storage (for testing/development)
/// - A relational database (for production)
#[async_trait]
pub trait PlanetRepository: Send + Sync {
    /// Stores a new planet and returns it with its assigned id.
    ///
    /// Fails with `Conflict` if the name is already taken.
    async fn save(&self, planet: NewPlanet) -> Result<Planet>;

    /// Deletes a planet. Returns false if no planet had this id.
    async fn delete_by_id(&self, id: Uuid) -> Result<bool>;

    /// Returns true if a planet with this id exists.
    async fn exists_by_id(&self, id: Uuid) -> Result<bool>;

    /// Retrieves a planet by id.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Planet>>;

    /// Retrieves a planet by its exact name.
    async fn find_by_name(&self, name: &str) -> Result<Option<Planet>>;

    /// Returns one sorted page and the total number of planets.
    async fn find_all_paged(&self, request: &PageRequest) -> Result<(Vec<Planet>, u64)>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// CACHE STORE TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Key-value cache with per-entry TTL.
///
/// Keys passed here are fully namespaced (see [`crate::keys`]). Every failure
/// to reach the store is reported as `CacheUnavailable`; callers decide whether
/// to degrade or propagate.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Stores `value` under `key`, expiring after `ttl` when given.
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> Result<()>;

    /// Returns the live value under `key`.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Removes `key`. Removing a missing key succeeds.
    async fn evict(&self, key: &str) -> Result<()>;

    /// Removes every key of `namespace` and returns how many were removed.
    async fn evict_all(&self, namespace: &str) -> Result<u64>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// EXTERNAL SOURCE TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Read-only paginated source of planet records.
#[async_trait]
pub trait PlanetSource: Send + Sync {
    /// Fetches every record, following the source's cursors from its first page.
    ///
    /// All-or-nothing: any page failure fails the whole call.
    async fn fetch_all(&self) -> Result<Vec<ExternalRecord>>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// LIFECYCLE TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Hook run once after every component is constructed and before traffic is
/// accepted.
///
/// Hooks never fail the startup: errors are handled and logged inside.
#[async_trait]
pub trait ReadyHook: Send + Sync {
    /// Short name used in startup logs.
    fn name(&self) -> &str;

    /// Runs the hook.
    async fn on_ready(&self);
}
