//! Cache configuration types

use crate::constants::*;
use rescache_application::CacheStoreOptions;
use rescache_domain::constants::{
    DEFAULT_MAX_EVICT_BATCH_SIZE, DEFAULT_MAX_GET_BATCH_SIZE, DEFAULT_MAX_MERGE_BATCH_SIZE,
    DEFAULT_SCAN_PAGE_SIZE,
};
use serde::{Deserialize, Serialize};

/// Cache backends
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackendKind {
    /// Process-local store
    #[default]
    Memory,
    /// Shared Redis server
    Redis,
}

/// Cache configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Backend holding the cache
    pub provider: CacheBackendKind,

    /// Redis URL (for Redis provider)
    pub redis_url: Option<String>,

    /// Prefix of every key
    pub prefix: String,

    /// Maximum entities written per batch
    pub max_merge_batch_size: usize,

    /// Maximum ids removed per batch
    pub max_evict_batch_size: usize,

    /// Maximum ids read per batch
    pub max_get_batch_size: usize,

    /// Members requested per set scan page
    pub scan_page_size: usize,

    /// Skip writes of unchanged entities
    pub hashing_enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            provider: CacheBackendKind::Memory,
            redis_url: None,
            prefix: DEFAULT_KEY_PREFIX.to_string(),
            max_merge_batch_size: DEFAULT_MAX_MERGE_BATCH_SIZE,
            max_evict_batch_size: DEFAULT_MAX_EVICT_BATCH_SIZE,
            max_get_batch_size: DEFAULT_MAX_GET_BATCH_SIZE,
            scan_page_size: DEFAULT_SCAN_PAGE_SIZE,
            hashing_enabled: true,
        }
    }
}

impl From<&CacheConfig> for CacheStoreOptions {
    fn from(config: &CacheConfig) -> Self {
        Self {
            max_merge_batch_size: config.max_merge_batch_size,
            max_evict_batch_size: config.max_evict_batch_size,
            max_get_batch_size: config.max_get_batch_size,
            scan_page_size: config.scan_page_size,
            hashing_enabled: config.hashing_enabled,
        }
    }
}
