//! Cache key layout.
//!
//! Every stored key is `"{namespace}::{key}"`. Namespace eviction matches on the
//! `"{namespace}::"` prefix, so a key never straddles two namespaces.

use uuid::Uuid;

use crate::constants::{ID_KEY_PREFIX, NAMESPACE_SEPARATOR, NAME_KEY_PREFIX};

/// Key of a planet looked up by id, relative to its namespace.
pub fn id_key(id: Uuid) -> String {
    format!("{ID_KEY_PREFIX}{id}")
}

/// Key of a planet looked up by name, relative to its namespace.
pub fn name_key(name: &str) -> String {
    format!("{NAME_KEY_PREFIX}{name}")
}

/// Joins a namespace and a relative key into the stored key.
pub fn namespaced(namespace: &str, key: &str) -> String {
    format!("{namespace}{NAMESPACE_SEPARATOR}{key}")
}

/// Prefix shared by every stored key of a namespace.
pub fn namespace_prefix(namespace: &str) -> String {
    format!("{namespace}{NAMESPACE_SEPARATOR}")
}
