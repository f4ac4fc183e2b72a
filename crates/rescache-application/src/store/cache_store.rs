//! Cache Store
//!
//! Generic storage engine over a [`CacheBackend`]. Batching, relationship
//! resolution, cursor-based set enumeration and change detection live here
//! once; backends only provide the per-batch primitives.

use crate::store::hashing::content_hash;
use crate::store::options::CacheStoreOptions;
use async_trait::async_trait;
use rescache_domain::constants::SCAN_END_CURSOR;
use rescache_domain::error::Result;
use rescache_domain::keys::KeyCodec;
use rescache_domain::ports::ProviderCache;
use rescache_domain::ports::providers::{BackendStats, CacheBackend};
use rescache_domain::value_objects::{CacheData, RelationshipFilter};
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use tracing::debug;

/// Storage engine shared by every agent
#[derive(Debug, Clone)]
pub struct CacheStore {
    backend: Arc<dyn CacheBackend>,
    options: CacheStoreOptions,
}

impl CacheStore {
    /// Create a store over a backend
    pub fn new(backend: Arc<dyn CacheBackend>, options: CacheStoreOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { backend, options })
    }

    /// The backing store
    pub fn backend(&self) -> &Arc<dyn CacheBackend> {
        &self.backend
    }

    /// Active settings
    pub fn options(&self) -> &CacheStoreOptions {
        &self.options
    }

    /// Round-trip counters of the backend
    pub async fn stats(&self) -> Result<BackendStats> {
        self.backend.stats().await
    }

    fn codec(&self) -> &KeyCodec {
        self.backend.codec()
    }

    /// Write one entity
    pub async fn merge(&self, type_name: &str, item: CacheData) -> Result<usize> {
        self.merge_all(type_name, std::slice::from_ref(&item)).await
    }

    /// Write entities batch by batch
    ///
    /// Every id and relationship name is validated before the first batch is
    /// issued. A failing batch stops the call; earlier batches stay written.
    /// Returns how many entities were actually written, which is fewer than
    /// given when change detection skipped unchanged ones.
    pub async fn merge_all(&self, type_name: &str, items: &[CacheData]) -> Result<usize> {
        KeyCodec::validate_type(type_name)?;
        for item in items {
            KeyCodec::validate_id(&item.id)?;
            for name in item.relationships.keys() {
                KeyCodec::validate_relationship(name)?;
            }
        }
        if items.is_empty() {
            return Ok(0);
        }

        let hashing = !self.is_hashing_disabled(type_name).await?;
        let mut written = 0;
        for batch in items.chunks(self.options.max_merge_batch_size) {
            if hashing {
                written += self.merge_changed(type_name, batch).await?;
            } else {
                written += self.merge_unconditionally(type_name, batch).await?;
            }
        }
        debug!(type_name, total = items.len(), written, "merged entities");
        Ok(written)
    }

    /// Write every item, still recording its hash
    ///
    /// A stored hash must always describe the stored content, otherwise a
    /// later hashed merge could skip a real change.
    async fn merge_unconditionally(&self, type_name: &str, batch: &[CacheData]) -> Result<usize> {
        let hashes = batch
            .iter()
            .map(|item| Ok((item.id.clone(), content_hash(item)?)))
            .collect::<Result<Vec<_>>>()?;
        self.backend.merge_items(type_name, batch, &hashes).await?;
        Ok(batch.len())
    }

    async fn merge_changed(&self, type_name: &str, batch: &[CacheData]) -> Result<usize> {
        let ids: Vec<String> = batch.iter().map(|item| item.id.clone()).collect();
        let stored = self.backend.get_hashes(type_name, &ids).await?;

        let mut changed = Vec::new();
        let mut hashes = Vec::new();
        for (item, previous) in batch.iter().zip(stored) {
            let hash = content_hash(item)?;
            if previous.as_deref() != Some(hash.as_str()) {
                changed.push(item.clone());
                hashes.push((item.id.clone(), hash));
            }
        }
        if changed.is_empty() {
            return Ok(0);
        }
        self.backend
            .merge_items(type_name, &changed, &hashes)
            .await?;
        Ok(changed.len())
    }

    /// Delete one entity
    pub async fn evict(&self, type_name: &str, id: &str) -> Result<usize> {
        self.evict_all(type_name, &[id.to_string()]).await
    }

    /// Delete entities batch by batch
    ///
    /// The relationship-name set is read once before the first batch.
    /// Relationship names first used while the eviction runs are not
    /// cleaned up for the evicted ids.
    pub async fn evict_all(&self, type_name: &str, ids: &[String]) -> Result<usize> {
        KeyCodec::validate_type(type_name)?;
        for id in ids {
            KeyCodec::validate_id(id)?;
        }
        if ids.is_empty() {
            return Ok(0);
        }

        let relationship_types: Vec<String> = self
            .relationship_names(type_name)
            .await?
            .into_iter()
            .collect();
        for batch in ids.chunks(self.options.max_evict_batch_size) {
            self.backend
                .evict_items(type_name, batch, &relationship_types)
                .await?;
        }
        debug!(type_name, count = ids.len(), "evicted entities");
        Ok(ids.len())
    }

    /// Relationship names ever used by a type
    pub async fn relationship_names(&self, type_name: &str) -> Result<BTreeSet<String>> {
        let key = self.codec().all_relationships_set_key(type_name)?;
        self.scan(&key, None).await
    }

    /// Whether writes of a type bypass change detection
    pub async fn is_hashing_disabled(&self, type_name: &str) -> Result<bool> {
        if !self.options.hashing_enabled {
            return Ok(true);
        }
        let key = self.codec().hashing_disabled_key(type_name)?;
        self.backend.key_exists(&key).await
    }

    /// Create or remove the per-type hashing override
    pub async fn set_hashing_disabled(&self, type_name: &str, disabled: bool) -> Result<()> {
        let key = self.codec().hashing_disabled_key(type_name)?;
        self.backend.set_marker(&key, disabled).await?;
        debug!(type_name, disabled, "updated hashing override");
        Ok(())
    }

    /// Enumerate a set page by page until the end cursor
    async fn scan(&self, set_key: &str, pattern: Option<&str>) -> Result<BTreeSet<String>> {
        let mut members = BTreeSet::new();
        let mut cursor = SCAN_END_CURSOR.to_string();
        let mut pages = 0usize;
        loop {
            let page = self
                .backend
                .scan_set(set_key, &cursor, pattern, self.options.scan_page_size)
                .await?;
            pages += 1;
            members.extend(page.members);
            if page.cursor == SCAN_END_CURSOR {
                break;
            }
            cursor = page.cursor;
        }
        debug!(set_key, pages, found = members.len(), "scanned set");
        Ok(members)
    }
}

#[async_trait]
impl ProviderCache for CacheStore {
    async fn get(
        &self,
        type_name: &str,
        id: &str,
        filter: &RelationshipFilter,
    ) -> Result<Option<CacheData>> {
        let ids = [id.to_string()];
        Ok(self
            .get_all(type_name, Some(ids.as_slice()), filter)
            .await?
            .into_iter()
            .next())
    }

    async fn get_all(
        &self,
        type_name: &str,
        ids: Option<&[String]>,
        filter: &RelationshipFilter,
    ) -> Result<Vec<CacheData>> {
        KeyCodec::validate_type(type_name)?;
        let ids: Vec<String> = match ids {
            Some(ids) => {
                let mut seen = HashSet::with_capacity(ids.len());
                let mut unique = Vec::with_capacity(ids.len());
                for id in ids {
                    KeyCodec::validate_id(id)?;
                    if seen.insert(id.as_str()) {
                        unique.push(id.clone());
                    }
                }
                unique
            }
            None => self.get_identifiers(type_name).await?.into_iter().collect(),
        };
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let relationship_types: Vec<String> = match filter {
            RelationshipFilter::All => self
                .relationship_names(type_name)
                .await?
                .into_iter()
                .collect(),
            RelationshipFilter::None => Vec::new(),
            RelationshipFilter::Include(names) => names.iter().cloned().collect(),
        };
        for name in &relationship_types {
            KeyCodec::validate_relationship(name)?;
        }

        let mut found = Vec::with_capacity(ids.len());
        for batch in ids.chunks(self.options.max_get_batch_size) {
            found.extend(
                self.backend
                    .get_items(type_name, batch, &relationship_types)
                    .await?,
            );
        }
        Ok(found)
    }

    async fn get_identifiers(&self, type_name: &str) -> Result<BTreeSet<String>> {
        let key = self.codec().members_set_key(type_name)?;
        self.scan(&key, None).await
    }

    async fn filter_identifiers(
        &self,
        type_name: &str,
        pattern: &str,
    ) -> Result<BTreeSet<String>> {
        let key = self.codec().members_set_key(type_name)?;
        self.scan(&key, Some(pattern)).await
    }

    async fn existing_identifiers(
        &self,
        type_name: &str,
        ids: &[String],
    ) -> Result<BTreeSet<String>> {
        KeyCodec::validate_type(type_name)?;
        for id in ids {
            KeyCodec::validate_id(id)?;
        }
        let mut existing = BTreeSet::new();
        for batch in ids.chunks(self.options.max_get_batch_size) {
            existing.extend(self.backend.existing_items(type_name, batch).await?);
        }
        Ok(existing)
    }
}
