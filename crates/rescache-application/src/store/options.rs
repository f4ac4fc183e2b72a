//! Cache store tuning knobs

use rescache_domain::constants::{
    DEFAULT_MAX_EVICT_BATCH_SIZE, DEFAULT_MAX_GET_BATCH_SIZE, DEFAULT_MAX_MERGE_BATCH_SIZE,
    DEFAULT_SCAN_PAGE_SIZE,
};
use rescache_domain::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Batching and change-detection settings of a [`CacheStore`](super::CacheStore)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStoreOptions {
    /// Entities written per merge batch
    pub max_merge_batch_size: usize,
    /// Ids deleted per eviction batch
    pub max_evict_batch_size: usize,
    /// Ids resolved per read batch
    pub max_get_batch_size: usize,
    /// Members requested per set-scan page
    pub scan_page_size: usize,
    /// Global switch for hash-based change detection
    pub hashing_enabled: bool,
}

impl Default for CacheStoreOptions {
    fn default() -> Self {
        Self {
            max_merge_batch_size: DEFAULT_MAX_MERGE_BATCH_SIZE,
            max_evict_batch_size: DEFAULT_MAX_EVICT_BATCH_SIZE,
            max_get_batch_size: DEFAULT_MAX_GET_BATCH_SIZE,
            scan_page_size: DEFAULT_SCAN_PAGE_SIZE,
            hashing_enabled: true,
        }
    }
}

impl CacheStoreOptions {
    /// Use one size for merge, evict and get batches
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.max_merge_batch_size = size;
        self.max_evict_batch_size = size;
        self.max_get_batch_size = size;
        self
    }

    /// Set the scan page size
    pub fn with_scan_page_size(mut self, size: usize) -> Self {
        self.scan_page_size = size;
        self
    }

    /// Enable or disable change detection globally
    pub fn with_hashing(mut self, enabled: bool) -> Self {
        self.hashing_enabled = enabled;
        self
    }

    /// Check that every size is at least one
    pub fn validate(&self) -> Result<()> {
        let sizes = [
            ("max_merge_batch_size", self.max_merge_batch_size),
            ("max_evict_batch_size", self.max_evict_batch_size),
            ("max_get_batch_size", self.max_get_batch_size),
            ("scan_page_size", self.scan_page_size),
        ];
        for (name, value) in sizes {
            if value == 0 {
                return Err(Error::invalid_argument(format!("{name} must be at least 1")));
            }
        }
        Ok(())
    }
}
