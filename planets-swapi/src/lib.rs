//! # Planets SWAPI Client
//!
//! Ingests the paginated SWAPI planets listing for the cache warm-up.
//!
//! ## Example
//!
//! ```rust,ignore
//! use planets_core::PlanetSource;
//! use planets_swapi::SwapiClient;
//!
//! let client = SwapiClient::new()?;
//! let records = client.fetch_all().await?;
//! let index = client.index_planet_appearances().await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod client;

pub use client::{SwapiClient, SwapiConfig};
