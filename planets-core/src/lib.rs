//! # Planets Core
//!
//! Core types, errors, and traits for the planets catalog cache layer.
//!
//! This crate provides the foundational building blocks used by all other crates
//! in the workspace:
//!
//! - **Types**: planets, pagination envelopes, external source records, cache policies
//! - **Errors**: the shared error taxonomy (`SourceUnavailable`, `CacheUnavailable`, `Conflict`, ...)
//! - **Keys**: cache key layout per namespace
//! - **Traits**: repository, cache store, external source, and lifecycle seams
//!
//! ## Example
//!
//! ```rust
//! use planets_core::{keys, NamespacePolicy};
//!
//! let policy = NamespacePolicy::planets();
//! assert_eq!(policy.key(&keys::name_key("Tatooine")), "planets::name:Tatooine");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod constants;
pub mod error;
pub mod keys;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use constants::*;
pub use error::{PlanetsError, Result};
pub use traits::*;
pub use types::*;
