//! # Planets Service
//!
//! The cache-aside layer in front of the planet repository, plus the startup
//! sequence that seeds the cache from SWAPI.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────┐   get/set/evict   ┌──────────────┐
//! │ PlanetsService │ ────────────────▶ │  CacheStore  │
//! └───────┬────────┘                   └──────▲───────┘
//!         │ miss / write                      │ seed
//!         ▼                            ┌──────┴───────┐  fetch_all  ┌──────────────┐
//! ┌──────────────────┐                 │ CacheWarmer  │ ──────────▶ │ PlanetSource │
//! │ PlanetRepository │                 └──────────────┘             └──────────────┘
//! └──────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use planets_service::{Application, ServiceConfig};
//!
//! let app = Application::from_config(ServiceConfig::from_env()?).await?;
//! let running = app.start().await;
//! assert!(running.is_ready());
//!
//! let tatooine = running.service().get_by_name("Tatooine").await?;
//!
//! // The warm-up keeps running in the background.
//! running.wait_for_hooks().await;
//! let films = running.warmer().appearances("Tatooine").await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod bootstrap;
mod config;
mod service;
mod warmup;

pub use bootstrap::{Application, RunningApplication};
pub use config::ServiceConfig;
pub use service::PlanetsService;
pub use warmup::{CacheWarmer, WarmupReport};
