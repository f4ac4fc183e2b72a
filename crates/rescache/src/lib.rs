//! # rescache
//!
//! A multi-tenant resource cache: snapshots of externally observed objects
//! keyed by type and id, with typed relationships, kept current by polling
//! agents that reconcile additions, updates and evictions.
//!
//! ## Example
//!
//! ```ignore
//! use rescache::infrastructure::{ConfigLoader, build_store};
//! use rescache::{CacheData, ProviderCache, RelationshipFilter};
//!
//! let config = ConfigLoader::new().load()?;
//! let store = build_store(&config.cache)?;
//! store
//!     .merge("services", CacheData::new("svc-a").with_relationship("clusters", ["c1"]))
//!     .await?;
//! let svc = store.get("services", "svc-a", &RelationshipFilter::All).await?;
//! ```
//!
//! ## Architecture
//!
//! - `domain` - Entity model, key codecs, errors and port traits
//! - `application` - Cache store, agent execution and on-demand refresh
//! - `providers` - In-memory and Redis backends
//! - `infrastructure` - Configuration, logging, metrics and wiring
//! - `cli` - The `rescache` maintenance command

pub mod cli;

/// Domain layer - entity model, key codecs and ports
///
/// Re-exports from the domain crate for convenience
pub mod domain {
    pub use rescache_domain::*;
}

/// Application layer - store, agents and on-demand coordination
///
/// Re-exports from the application crate for convenience
pub mod application {
    pub use rescache_application::*;
}

/// Provider layer - cache backends
///
/// Re-exports from the providers crate for convenience
pub mod providers {
    pub use rescache_providers::*;
}

/// Infrastructure layer - config, logging and bootstrap
///
/// Re-exports from the infrastructure crate for convenience
pub mod infrastructure {
    pub use rescache_infrastructure::*;
}

// Re-export commonly used types at the crate root
pub use domain::error::{Error, Result};
pub use domain::ports::{CachingAgent, OnDemandHandler, ProviderCache};
pub use domain::value_objects::{CacheData, CacheResult, RelationshipFilter};
pub use application::{AgentExecution, AgentRegistry, CacheStore, CacheStoreOptions};
