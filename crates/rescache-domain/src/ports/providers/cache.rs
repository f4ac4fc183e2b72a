//! Cache Backend Port
//!
//! Port for the batch I/O a backing store must provide. The generic
//! batching, relationship resolution, scan pagination and change detection
//! live once in the application layer's `CacheStore`; backends only
//! implement the per-batch primitives below.
//!
//! ## Contract
//!
//! - Every `*_items` call is one batch and must be atomic from the caller's
//!   point of view: either all of its writes are visible or none are.
//! - Writes are visible to any read issued after the call returns.
//! - Keys are built with the backend's [`KeyCodec`].
//! - Unreachable stores surface as [`Error::StoreUnavailable`].
//!
//! [`Error::StoreUnavailable`]: crate::error::Error::StoreUnavailable

use crate::error::Result;
use crate::keys::KeyCodec;
use crate::value_objects::CacheData;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One page of a cursor-based set scan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanPage {
    /// Cursor for the next page; the end cursor `"0"` means exhausted
    pub cursor: String,
    /// Members returned by this page (may be empty before exhaustion)
    pub members: Vec<String>,
}

/// Round-trip counters of a backend
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendStats {
    /// Number of merge batches written
    pub batch_writes: u64,
    /// Number of eviction batches applied
    pub batch_evictions: u64,
    /// Number of read batches served
    pub batch_reads: u64,
    /// Number of scan pages served
    pub scan_calls: u64,
    /// Number of marker and hash round trips
    pub other_calls: u64,
}

impl BackendStats {
    /// Create empty statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of mutating batches
    pub fn total_writes(&self) -> u64 {
        self.batch_writes + self.batch_evictions
    }
}

/// Cache Backend Port
///
/// # Implementations
///
/// - **Memory**: in-process store with the same key layout, used for tests
///   and single-instance deployments
/// - **Redis**: shared store for multi-instance deployments
#[async_trait]
pub trait CacheBackend: Send + Sync + std::fmt::Debug {
    /// Key codec used to lay out this backend's keys
    fn codec(&self) -> &KeyCodec;

    /// Write one batch of entities
    ///
    /// For each item: replace its attributes, replace each relationship it
    /// carries, add its id to the membership set and its relationship names
    /// to the relationship-name set. `hashes` are `(id, hash)` pairs stored
    /// in the type's hash map within the same batch.
    async fn merge_items(
        &self,
        type_name: &str,
        items: &[CacheData],
        hashes: &[(String, String)],
    ) -> Result<()>;

    /// Delete one batch of entities
    ///
    /// Removes attributes, the listed relationships, membership entries and
    /// stored hashes of every id.
    async fn evict_items(
        &self,
        type_name: &str,
        ids: &[String],
        relationship_types: &[String],
    ) -> Result<()>;

    /// Read one batch of entities
    ///
    /// Ids without stored attributes are absent from the result. Only the
    /// listed relationships are resolved.
    async fn get_items(
        &self,
        type_name: &str,
        ids: &[String],
        relationship_types: &[String],
    ) -> Result<Vec<CacheData>>;

    /// Subset of `ids` that have stored attributes
    async fn existing_items(&self, type_name: &str, ids: &[String]) -> Result<Vec<String>>;

    /// Read one page of a set, optionally filtered by a glob during the scan
    async fn scan_set(
        &self,
        set_key: &str,
        cursor: &str,
        pattern: Option<&str>,
        count: usize,
    ) -> Result<ScanPage>;

    /// Stored content hashes for `ids`, positionally aligned
    async fn get_hashes(&self, type_name: &str, ids: &[String]) -> Result<Vec<Option<String>>>;

    /// Whether a plain key exists
    async fn key_exists(&self, key: &str) -> Result<bool>;

    /// Create (`present = true`) or delete a marker key
    async fn set_marker(&self, key: &str, present: bool) -> Result<()>;

    /// Round-trip counters
    async fn stats(&self) -> Result<BackendStats>;

    /// Name of this backend implementation (e.g. "memory", "redis")
    fn provider_name(&self) -> &str;
}
