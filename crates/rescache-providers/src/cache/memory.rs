//! In-memory cache backend
//!
//! In-process implementation of the backend port that lays out data with
//! the same keys, sets and hash maps a Redis deployment would use.
//!
//! ## Features
//!
//! - Each batch is applied under a single write lock, so batches are atomic
//! - Cursor-paginated set scans with glob matching during the scan
//! - Round-trip counters for observing batching behavior
//!
//! ## Example
//!
//! ```ignore
//! use rescache_providers::cache::MemoryCacheBackend;
//!
//! let backend = MemoryCacheBackend::new("rescache")?;
//! ```

use crate::cache::encoding::{decode_attributes, decode_relationship, encode_items, relationship_names};
use async_trait::async_trait;
use rescache_domain::constants::SCAN_END_CURSOR;
use rescache_domain::error::{Error, Result};
use rescache_domain::keys::KeyCodec;
use rescache_domain::ports::providers::{BackendStats, CacheBackend, ScanPage};
use rescache_domain::value_objects::CacheData;
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use tracing::trace;

/// Key space of the in-memory store
#[derive(Debug, Default)]
struct MemoryState {
    strings: HashMap<String, String>,
    sets: HashMap<String, BTreeSet<String>>,
    hashes: HashMap<String, HashMap<String, String>>,
}

impl MemoryState {
    fn set_add<I: IntoIterator<Item = String>>(&mut self, key: &str, members: I) {
        self.sets.entry(key.to_string()).or_default().extend(members);
    }

    fn set_remove(&mut self, key: &str, members: &[String]) {
        if let Some(set) = self.sets.get_mut(key) {
            for member in members {
                set.remove(member);
            }
            if set.is_empty() {
                self.sets.remove(key);
            }
        }
    }
}

#[derive(Debug, Default)]
struct Counters {
    batch_writes: AtomicU64,
    batch_evictions: AtomicU64,
    batch_reads: AtomicU64,
    scan_calls: AtomicU64,
    other_calls: AtomicU64,
}

/// In-memory backend
#[derive(Debug)]
pub struct MemoryCacheBackend {
    codec: KeyCodec,
    state: RwLock<MemoryState>,
    counters: Counters,
}

impl MemoryCacheBackend {
    /// Create an empty backend for the given key prefix
    pub fn new(prefix: &str) -> Result<Self> {
        Ok(Self::with_codec(KeyCodec::new(prefix)?))
    }

    /// Create an empty backend with an existing codec
    pub fn with_codec(codec: KeyCodec) -> Self {
        Self {
            codec,
            state: RwLock::new(MemoryState::default()),
            counters: Counters::default(),
        }
    }

    /// Number of keys currently held (strings, sets and hash maps)
    pub async fn key_count(&self) -> usize {
        let state = self.state.read().await;
        state.strings.len() + state.sets.len() + state.hashes.len()
    }

    /// Whether any key holds data
    pub async fn is_empty(&self) -> bool {
        self.key_count().await == 0
    }
}

#[async_trait]
impl CacheBackend for MemoryCacheBackend {
    fn codec(&self) -> &KeyCodec {
        &self.codec
    }

    async fn merge_items(
        &self,
        type_name: &str,
        items: &[CacheData],
        hashes: &[(String, String)],
    ) -> Result<()> {
        let encoded = encode_items(&self.codec, type_name, items)?;
        let members_key = self.codec.members_set_key(type_name)?;
        let relationships_key = self.codec.all_relationships_set_key(type_name)?;
        let hashes_key = self.codec.hashes_key(type_name)?;
        let names = relationship_names(items);

        let mut state = self.state.write().await;
        for item in encoded {
            state.strings.insert(item.attributes_key, item.attributes);
            for (key, value) in item.relationships {
                state.strings.insert(key, value);
            }
            state.set_add(&members_key, [item.id]);
        }
        if !names.is_empty() {
            state.set_add(&relationships_key, names);
        }
        if !hashes.is_empty() {
            let stored = state.hashes.entry(hashes_key).or_default();
            for (id, hash) in hashes {
                stored.insert(id.clone(), hash.clone());
            }
        }
        drop(state);

        self.counters.batch_writes.fetch_add(1, Ordering::Relaxed);
        trace!(type_name, count = items.len(), "memory merge batch applied");
        Ok(())
    }

    async fn evict_items(
        &self,
        type_name: &str,
        ids: &[String],
        relationship_types: &[String],
    ) -> Result<()> {
        let mut keys = Vec::with_capacity(ids.len() * (relationship_types.len() + 1));
        for id in ids {
            keys.push(self.codec.attributes_key(type_name, id)?);
            for relationship in relationship_types {
                keys.push(self.codec.relationship_key(type_name, id, relationship)?);
            }
        }
        let members_key = self.codec.members_set_key(type_name)?;
        let hashes_key = self.codec.hashes_key(type_name)?;

        let mut state = self.state.write().await;
        for key in &keys {
            state.strings.remove(key);
        }
        state.set_remove(&members_key, ids);
        if let Some(stored) = state.hashes.get_mut(&hashes_key) {
            for id in ids {
                stored.remove(id);
            }
            if stored.is_empty() {
                state.hashes.remove(&hashes_key);
            }
        }
        drop(state);

        self.counters.batch_evictions.fetch_add(1, Ordering::Relaxed);
        trace!(type_name, count = ids.len(), "memory evict batch applied");
        Ok(())
    }

    async fn get_items(
        &self,
        type_name: &str,
        ids: &[String],
        relationship_types: &[String],
    ) -> Result<Vec<CacheData>> {
        let state = self.state.read().await;
        let mut found = Vec::with_capacity(ids.len());
        for id in ids {
            let key = self.codec.attributes_key(type_name, id)?;
            let Some(raw) = state.strings.get(&key) else {
                continue;
            };
            let mut item = CacheData::new(id.clone()).with_attributes(decode_attributes(raw)?);
            for relationship in relationship_types {
                let key = self.codec.relationship_key(type_name, id, relationship)?;
                if let Some(raw) = state.strings.get(&key) {
                    item.relationships
                        .insert(relationship.clone(), decode_relationship(raw)?);
                }
            }
            found.push(item);
        }
        drop(state);

        self.counters.batch_reads.fetch_add(1, Ordering::Relaxed);
        Ok(found)
    }

    async fn existing_items(&self, type_name: &str, ids: &[String]) -> Result<Vec<String>> {
        let keys = ids
            .iter()
            .map(|id| -> Result<(&String, String)> {
                Ok((id, self.codec.attributes_key(type_name, id)?))
            })
            .collect::<Result<Vec<_>>>()?;
        let state = self.state.read().await;
        let existing = keys
            .into_iter()
            .filter(|(_, key)| state.strings.contains_key(key))
            .map(|(id, _)| id.clone())
            .collect();
        drop(state);

        self.counters.batch_reads.fetch_add(1, Ordering::Relaxed);
        Ok(existing)
    }

    async fn scan_set(
        &self,
        set_key: &str,
        cursor: &str,
        pattern: Option<&str>,
        count: usize,
    ) -> Result<ScanPage> {
        let offset: usize = cursor
            .parse()
            .map_err(|_| Error::invalid_argument(format!("Invalid scan cursor '{cursor}'")))?;
        let matcher = pattern
            .map(glob::Pattern::new)
            .transpose()
            .map_err(|e| Error::invalid_argument(format!("Invalid scan pattern: {e}")))?;
        let count = count.max(1);

        self.counters.scan_calls.fetch_add(1, Ordering::Relaxed);
        let state = self.state.read().await;
        let Some(set) = state.sets.get(set_key) else {
            return Ok(ScanPage {
                cursor: SCAN_END_CURSOR.to_string(),
                members: Vec::new(),
            });
        };

        let members = set
            .iter()
            .skip(offset)
            .take(count)
            .filter(|member| matcher.as_ref().is_none_or(|m| m.matches(member)))
            .cloned()
            .collect();
        let next = offset.saturating_add(count);
        let cursor = if next >= set.len() {
            SCAN_END_CURSOR.to_string()
        } else {
            next.to_string()
        };
        Ok(ScanPage { cursor, members })
    }

    async fn get_hashes(&self, type_name: &str, ids: &[String]) -> Result<Vec<Option<String>>> {
        let hashes_key = self.codec.hashes_key(type_name)?;
        let state = self.state.read().await;
        let stored = state.hashes.get(&hashes_key);
        let hashes = ids
            .iter()
            .map(|id| stored.and_then(|map| map.get(id).cloned()))
            .collect();
        drop(state);

        self.counters.other_calls.fetch_add(1, Ordering::Relaxed);
        Ok(hashes)
    }

    async fn key_exists(&self, key: &str) -> Result<bool> {
        self.counters.other_calls.fetch_add(1, Ordering::Relaxed);
        let state = self.state.read().await;
        Ok(state.strings.contains_key(key)
            || state.sets.contains_key(key)
            || state.hashes.contains_key(key))
    }

    async fn set_marker(&self, key: &str, present: bool) -> Result<()> {
        self.counters.other_calls.fetch_add(1, Ordering::Relaxed);
        let mut state = self.state.write().await;
        if present {
            state.strings.insert(key.to_string(), "true".to_string());
        } else {
            state.strings.remove(key);
        }
        Ok(())
    }

    async fn stats(&self) -> Result<BackendStats> {
        Ok(BackendStats {
            batch_writes: self.counters.batch_writes.load(Ordering::Relaxed),
            batch_evictions: self.counters.batch_evictions.load(Ordering::Relaxed),
            batch_reads: self.counters.batch_reads.load(Ordering::Relaxed),
            scan_calls: self.counters.scan_calls.load(Ordering::Relaxed),
            other_calls: self.counters.other_calls.load(Ordering::Relaxed),
        })
    }

    fn provider_name(&self) -> &str {
        "memory"
    }
}
