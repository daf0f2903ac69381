//! Cache store adapters for the planets cache layer.
//!
//! - [`RedisStore`]: networked store, every command bounded by a timeout
//! - [`MemoryStore`]: in-process TTL store with a capacity bound

mod memory;
mod redis_store;

pub use memory::{CacheConfig, CacheStats, MemoryStore};
pub use redis_store::{RedisConfig, RedisStore};
