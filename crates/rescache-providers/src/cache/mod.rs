//! Cache Backend Implementations
//!
//! Batch I/O against the backing key-value store. Both backends lay out
//! data with the same key scheme, so an in-memory deployment and a Redis
//! deployment are interchangeable behind the backend port.
//!
//! ## Available Backends
//!
//! | Backend | Type | Description |
//! |---------|------|-------------|
//! | [`MemoryCacheBackend`] | Local | In-process store, also the test double |
//! | [`RedisCacheBackend`] | Distributed | Redis-backed for multi-instance |
//!
//! ## Backend Selection Guide
//!
//! - **Development/Testing**: Use `MemoryCacheBackend`
//! - **Multi Instance**: Use `RedisCacheBackend` so every node sees one cache

#[cfg(any(feature = "cache-memory", feature = "cache-redis"))]
mod encoding;
#[cfg(feature = "cache-memory")]
pub mod memory;
#[cfg(feature = "cache-redis")]
pub mod redis;

#[cfg(feature = "cache-memory")]
pub use memory::MemoryCacheBackend;
#[cfg(feature = "cache-redis")]
pub use redis::RedisCacheBackend;

pub use rescache_domain::ports::providers::{BackendStats, ScanPage};
