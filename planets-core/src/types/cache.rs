//! Per-namespace cache policy.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{APPEARANCES_NAMESPACE, DEFAULT_PLANETS_TTL_SECONDS, PLANETS_NAMESPACE};
use crate::keys;

/// A cache namespace and the TTL applied to every entry written into it.
///
/// Each namespace has exactly one TTL policy; writers never pick a TTL per call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespacePolicy {
    /// Namespace name, used as the key prefix
    pub name: String,
    /// Entry lifetime in seconds; `None` keeps entries until evicted
    pub ttl_seconds: Option<u64>,
}

impl NamespacePolicy {
    /// Creates a policy.
    pub fn new(name: impl Into<String>, ttl_seconds: Option<u64>) -> Self {
        Self {
            name: name.into(),
            ttl_seconds,
        }
    }

    /// Domain records: fixed 10 minute TTL.
    pub fn planets() -> Self {
        Self::new(PLANETS_NAMESPACE, Some(DEFAULT_PLANETS_TTL_SECONDS))
    }

    /// Warm-up index: no TTL, entries are overwritten by the next warm-up.
    pub fn appearances() -> Self {
        Self::new(APPEARANCES_NAMESPACE, None)
    }

    /// Overrides the TTL.
    pub fn with_ttl_seconds(mut self, ttl_seconds: Option<u64>) -> Self {
        self.ttl_seconds = ttl_seconds;
        self
    }

    /// TTL to pass to the store.
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl_seconds.map(Duration::from_secs)
    }

    /// Stored key for `key` inside this namespace.
    pub fn key(&self, key: &str) -> String {
        keys::namespaced(&self.name, key)
    }
}
