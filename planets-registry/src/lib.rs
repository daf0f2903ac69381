//! # Planets Registry
//!
//! Storage for planet records, the source of truth behind the cache.
//!
//! - **Memory**: concurrent in-memory repository for development, tests, and
//!   single-process deployments
//!
//! ## Example
//!
//! ```rust,ignore
//! use planets_registry::{MemoryRepository, Repository};
//!
//! let repository = MemoryRepository::new();
//! let hoth = repository.save(NewPlanet::new("Hoth", "tundra", "frozen")).await?;
//! assert!(repository.exists_by_id(hoth.id).await?);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod memory;

pub use memory::MemoryRepository;

// Re-export the trait from core
pub use planets_core::traits::PlanetRepository as Repository;
