//! Service configuration.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use planets_cache::RedisConfig;
use planets_core::constants::{
    APPEARANCES_NAMESPACE, DEFAULT_PLANETS_TTL_SECONDS, PLANETS_NAMESPACE,
};
use planets_core::error::{PlanetsError, Result};
use planets_core::types::NamespacePolicy;
use planets_swapi::SwapiConfig;

/// Everything needed to assemble the cache layer.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// External source settings
    pub swapi: SwapiConfig,
    /// Redis settings; `None` selects the in-memory store
    pub redis: Option<RedisConfig>,
    /// TTL of cached planets
    pub planets_ttl_seconds: u64,
    /// TTL of seeded appearance counts; `None` keeps them until overwritten
    pub appearances_ttl_seconds: Option<u64>,
    /// Whether the warm-up hook runs at startup
    pub warmup_enabled: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            swapi: SwapiConfig::default(),
            redis: None,
            planets_ttl_seconds: DEFAULT_PLANETS_TTL_SECONDS,
            appearances_ttl_seconds: None,
            warmup_enabled: true,
        }
    }
}

impl ServiceConfig {
    /// Reads configuration from the environment (and `.env`, if present).
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(base_url) = lookup("SWAPI_BASE_URL") {
            config.swapi.base_url = base_url;
        }
        if let Some(timeout) = parse_var(&lookup, "SWAPI_TIMEOUT_SECS")? {
            config.swapi.timeout_seconds = timeout;
        }
        if let Some(max_pages) = parse_var(&lookup, "SWAPI_MAX_PAGES")? {
            config.swapi.max_pages = max_pages;
        }

        config.redis = lookup("REDIS_URL")
            .filter(|url| !url.trim().is_empty())
            .map(RedisConfig::new);
        if let (Some(redis), Some(timeout)) =
            (config.redis.as_mut(), parse_var(&lookup, "REDIS_TIMEOUT_MS")?)
        {
            redis.command_timeout_ms = timeout;
        }

        if let Some(ttl) = parse_var(&lookup, "PLANETS_CACHE_TTL_SECS")? {
            config.planets_ttl_seconds = ttl;
        }
        config.appearances_ttl_seconds = parse_var(&lookup, "APPEARANCES_TTL_SECS")?;
        config.warmup_enabled = parse_flag(&lookup, "WARMUP_ENABLED")?.unwrap_or(true);

        Ok(config)
    }

    /// Policy for cached planets.
    pub fn planets_policy(&self) -> NamespacePolicy {
        NamespacePolicy::new(PLANETS_NAMESPACE, Some(self.planets_ttl_seconds))
    }

    /// Policy for the warm-up index.
    pub fn appearances_policy(&self) -> NamespacePolicy {
        NamespacePolicy::new(APPEARANCES_NAMESPACE, self.appearances_ttl_seconds)
    }
}

fn parse_var<T: FromStr>(lookup: impl Fn(&str) -> Option<String>, name: &str) -> Result<Option<T>> {
    match lookup(name) {
        None => Ok(None),
        Some(raw) => raw.trim().parse().map(Some).map_err(|_| {
            PlanetsError::ConfigError(format!("{name}: invalid value '{raw}'"))
        }),
    }
}

/// Accepts `true/false`, `1/0`, `yes/no` and `on/off`, case-insensitively.
fn parse_flag(lookup: impl Fn(&str) -> Option<String>, name: &str) -> Result<Option<bool>> {
    let Some(raw) = lookup(name) else {
        return Ok(None);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(Some(true)),
        "false" | "0" | "no" | "off" => Ok(Some(false)),
        _ => Err(PlanetsError::ConfigError(format!(
            "{name}: invalid value '{raw}'"
        ))),
    }
}
