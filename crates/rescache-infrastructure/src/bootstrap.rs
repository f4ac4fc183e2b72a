//! Store bootstrap
//!
//! Builds the configured backend and the cache store on top of it.

use crate::config::{CacheBackendKind, CacheConfig};
use rescache_application::{CacheStore, CacheStoreOptions};
use rescache_domain::error::{Error, Result};
use rescache_domain::ports::providers::CacheBackend;
use rescache_providers::cache::{MemoryCacheBackend, RedisCacheBackend};
use std::sync::Arc;
use tracing::info;

/// Create the backend selected by the configuration
pub fn create_backend(config: &CacheConfig) -> Result<Arc<dyn CacheBackend>> {
    let backend: Arc<dyn CacheBackend> = match config.provider {
        CacheBackendKind::Memory => Arc::new(MemoryCacheBackend::new(&config.prefix)?),
        CacheBackendKind::Redis => {
            let url = config.redis_url.as_deref().ok_or_else(|| {
                Error::configuration("cache.redis_url is required when the provider is redis")
            })?;
            Arc::new(RedisCacheBackend::new(url, &config.prefix)?)
        }
    };
    info!(
        provider = backend.provider_name(),
        prefix = %config.prefix,
        "cache backend created"
    );
    Ok(backend)
}

/// Create the store over the configured backend
pub fn build_store(config: &CacheConfig) -> Result<Arc<CacheStore>> {
    let backend = create_backend(config)?;
    let store = CacheStore::new(backend, CacheStoreOptions::from(config))?;
    Ok(Arc::new(store))
}
