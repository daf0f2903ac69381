//! Records ingested from the external planets source.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One planet as reported by the external source.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalRecord {
    /// Planet name
    pub name: String,
    /// Number of films the planet appears in (0 when the source omits the list)
    pub film_appearance_count: u32,
}

impl ExternalRecord {
    /// Creates a record.
    pub fn new(name: impl Into<String>, film_appearance_count: u32) -> Self {
        Self {
            name: name.into(),
            film_appearance_count,
        }
    }
}

/// One page of a paginated source.
///
/// `next_cursor` is supplied by the source; this crate never builds one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageEnvelope<T> {
    /// Items on this page, in source order
    pub items: Vec<T>,
    /// Continuation token for the following page, if any
    pub next_cursor: Option<String>,
}

impl<T> PageEnvelope<T> {
    /// Returns true if this page ends the traversal.
    pub fn is_terminal(&self) -> bool {
        self.items.is_empty() || self.next_cursor.is_none()
    }
}

/// `name -> stringified film appearance count`, built from one ingestion pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AppearanceIndex {
    entries: HashMap<String, String>,
}

impl AppearanceIndex {
    /// Builds the index. A name repeated across pages keeps its last count.
    pub fn from_records(records: &[ExternalRecord]) -> Self {
        let entries = records
            .iter()
            .map(|r| (r.name.clone(), r.film_appearance_count.to_string()))
            .collect();
        Self { entries }
    }

    /// Count recorded for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// Number of distinct names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no record was indexed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates `(name, count)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
