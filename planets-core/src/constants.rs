//! Shared constants for the planets cache layer.
//!
//! Namespaces, key prefixes, and the default bounds applied to every network call.

// ═══════════════════════════════════════════════════════════════════════════════
// CACHE NAMESPACES
// ═══════════════════════════════════════════════════════════════════════════════

/// Namespace holding cached domain records (`id:` and `name:` point lookups).
pub const PLANETS_NAMESPACE: &str = "planets";

/// Namespace holding the pre-seeded film appearance index.
/// Never shares keys with [`PLANETS_NAMESPACE`].
pub const APPEARANCES_NAMESPACE: &str = "appearances";

/// Separator between a namespace and the key inside it.
pub const NAMESPACE_SEPARATOR: &str = "::";

/// Key prefix for lookups by planet id.
pub const ID_KEY_PREFIX: &str = "id:";

/// Key prefix for lookups by planet name.
pub const NAME_KEY_PREFIX: &str = "name:";

// ═══════════════════════════════════════════════════════════════════════════════
// TTL POLICY
// ═══════════════════════════════════════════════════════════════════════════════

/// Default TTL for cached planet records (10 minutes).
pub const DEFAULT_PLANETS_TTL_SECONDS: u64 = 600;

// ═══════════════════════════════════════════════════════════════════════════════
// EXTERNAL SOURCE (SWAPI)
// ═══════════════════════════════════════════════════════════════════════════════

/// Base address of the public Star Wars API.
pub const SWAPI_BASE_URL: &str = "https://swapi.dev/api";

/// Root path of the paginated planets listing.
pub const SWAPI_PLANETS_ROOT: &str = "/planets/";

/// Upper bound on pages followed during a single ingestion pass.
/// SWAPI serves 6 pages of planets; anything far beyond that is a misbehaving source.
pub const DEFAULT_MAX_PAGES: usize = 100;

/// Per-request timeout against the external source.
pub const DEFAULT_SOURCE_TIMEOUT_SECONDS: u64 = 30;

// ═══════════════════════════════════════════════════════════════════════════════
// CACHE STORE
// ═══════════════════════════════════════════════════════════════════════════════

/// Per-command timeout against the cache store.
pub const DEFAULT_CACHE_TIMEOUT_MS: u64 = 2_000;

/// Keys requested per `SCAN` round trip during namespace eviction.
pub const DEFAULT_SCAN_BATCH: usize = 250;

/// Default capacity of the in-process cache store.
pub const DEFAULT_MEMORY_CACHE_ENTRIES: usize = 10_000;

// ═══════════════════════════════════════════════════════════════════════════════
// PAGINATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Largest page a caller may request.
pub const MAX_PAGE_SIZE: u32 = 1_000;

/// Page size used when the caller does not pick one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;
