//! # Resource Cache - Backend Implementations
//!
//! This crate contains the user-selectable backing stores of the resource
//! cache. Each backend implements the `CacheBackend` port defined in
//! `rescache-domain`.
//!
//! ## Backends
//!
//! | Category | Port | Implementations |
//! |----------|------|-----------------|
//! | Cache | `CacheBackend` | Memory, Redis |
//!
//! ## Feature Flags
//!
//! ```toml
//! [dependencies]
//! rescache-providers = { version = "0.1", default-features = false, features = ["cache-memory"] }
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! use rescache_providers::cache::MemoryCacheBackend;
//! use rescache_providers::cache::RedisCacheBackend;
//! ```

// Re-export domain types commonly used with backends
pub use rescache_domain::error::{Error, Result};
pub use rescache_domain::ports::providers::CacheBackend;

/// Cache backend implementations
///
/// Implements the `CacheBackend` trait for in-memory and Redis stores.
pub mod cache;
