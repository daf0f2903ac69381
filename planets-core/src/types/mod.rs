//! Domain types for the planets cache layer.
//!
//! - [`Planet`] / [`NewPlanet`]: stored records and write payloads
//! - [`PageRequest`] / [`PaginatedResult`]: page windows over the repository
//! - [`ExternalRecord`] / [`PageEnvelope`] / [`AppearanceIndex`]: external source ingestion
//! - [`NamespacePolicy`]: cache namespace plus its TTL

mod cache;
mod page;
mod planet;
mod source;

pub use cache::*;
pub use page::*;
pub use planet::*;
pub use source::*;
