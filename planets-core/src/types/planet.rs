//! Planet records held by the repository and projected into the cache.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{PlanetsError, Result};

/// A stored planet.
///
/// `name` is unique across the catalog. The cached representation is the JSON
/// form of this struct.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Planet {
    /// Identifier assigned by the repository
    pub id: Uuid,
    /// Unique planet name
    pub name: String,
    /// Terrain description
    pub terrain: String,
    /// Climate description
    pub climate: String,
    /// When the record was first stored
    pub created_at: DateTime<Utc>,
    /// When the record was last written
    pub updated_at: DateTime<Utc>,
}

impl Planet {
    /// Builds a fresh record from a write payload, assigning id and timestamps.
    pub fn from_new(input: NewPlanet) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: input.name,
            terrain: input.terrain,
            climate: input.climate,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Write payload for a planet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPlanet {
    /// Planet name (must be non-blank)
    pub name: String,
    /// Terrain (must be non-blank)
    pub terrain: String,
    /// Climate (must be non-blank)
    pub climate: String,
}

impl NewPlanet {
    /// Creates a write payload.
    pub fn new(
        name: impl Into<String>,
        terrain: impl Into<String>,
        climate: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            terrain: terrain.into(),
            climate: climate.into(),
        }
    }

    /// Rejects blank fields, reporting every offending field at once.
    pub fn validate(&self) -> Result<()> {
        let blank: Vec<&str> = [
            ("name", &self.name),
            ("terrain", &self.terrain),
            ("climate", &self.climate),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect();

        if blank.is_empty() {
            Ok(())
        } else {
            Err(PlanetsError::ValidationError(
                blank
                    .iter()
                    .map(|field| format!("{field}: cannot be empty"))
                    .collect::<Vec<_>>()
                    .join("; "),
            ))
        }
    }
}
