//! Redis cache backend
//!
//! Shared backend for multi-instance deployments.
//!
//! ## Features
//!
//! - Merge and evict batches run as `MULTI`/`EXEC` pipelines
//! - Reads use `MGET`/`HMGET`, enumeration uses `SSCAN` with `MATCH`
//! - One multiplexed connection, opened lazily and shared by all calls
//!
//! ## Example
//!
//! ```ignore
//! use rescache_providers::cache::RedisCacheBackend;
//!
//! let backend = RedisCacheBackend::new("redis://localhost:6379", "rescache")?;
//! // Or with host/port
//! let backend = RedisCacheBackend::with_host_port("localhost", 6379, "rescache")?;
//! ```

use crate::cache::encoding::{decode_attributes, decode_relationship, encode_items, relationship_names};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::MultiplexedConnection};
use rescache_domain::error::{Error, Result};
use rescache_domain::keys::KeyCodec;
use rescache_domain::ports::providers::{BackendStats, CacheBackend, ScanPage};
use rescache_domain::value_objects::CacheData;
use std::sync::{Arc, RwLock};
use tokio::sync::OnceCell;
use tracing::trace;

/// Redis backend
///
/// Uses a multiplexed connection for efficient connection reuse.
#[derive(Clone)]
pub struct RedisCacheBackend {
    client: Client,
    codec: KeyCodec,
    connection: Arc<OnceCell<MultiplexedConnection>>,
    stats: Arc<RwLock<BackendStats>>,
}

impl RedisCacheBackend {
    /// Create a new Redis backend with connection string and key prefix
    ///
    /// # Arguments
    ///
    /// * `connection_string` - Redis connection URL (e.g., "redis://localhost:6379")
    /// * `prefix` - Prefix of every key written by this backend
    pub fn new(connection_string: &str, prefix: &str) -> Result<Self> {
        let codec = KeyCodec::new(prefix)?;
        let client = Client::open(connection_string).map_err(|e| {
            Error::configuration_with_source(format!("Failed to create Redis client: {e}"), e)
        })?;

        Ok(Self {
            client,
            codec,
            connection: Arc::new(OnceCell::new()),
            stats: Arc::new(RwLock::new(BackendStats::new())),
        })
    }

    /// Create a new Redis backend with host and port
    pub fn with_host_port(host: &str, port: u16, prefix: &str) -> Result<Self> {
        Self::new(&format!("redis://{host}:{port}"), prefix)
    }

    /// Get the shared connection, opening it on first use
    async fn get_connection(&self) -> Result<MultiplexedConnection> {
        let connection = self
            .connection
            .get_or_try_init(|| async {
                self.client
                    .get_multiplexed_async_connection()
                    .await
                    .map_err(|e| unavailable("Failed to get Redis connection", e))
            })
            .await?;
        Ok(connection.clone())
    }

    fn record<F: FnOnce(&mut BackendStats)>(&self, update: F) {
        if let Ok(mut stats) = self.stats.write() {
            update(&mut stats);
        }
    }
}

fn unavailable(context: &str, e: redis::RedisError) -> Error {
    Error::store_unavailable_with_source(format!("{context}: {e}"), e)
}

#[async_trait]
impl CacheBackend for RedisCacheBackend {
    fn codec(&self) -> &KeyCodec {
        &self.codec
    }

    async fn merge_items(
        &self,
        type_name: &str,
        items: &[CacheData],
        hashes: &[(String, String)],
    ) -> Result<()> {
        if items.is_empty() && hashes.is_empty() {
            return Ok(());
        }
        let encoded = encode_items(&self.codec, type_name, items)?;
        let members_key = self.codec.members_set_key(type_name)?;
        let relationships_key = self.codec.all_relationships_set_key(type_name)?;
        let hashes_key = self.codec.hashes_key(type_name)?;
        let names: Vec<String> = relationship_names(items).into_iter().collect();

        let mut pipe = redis::pipe();
        pipe.atomic();
        let mut ids = Vec::with_capacity(encoded.len());
        for item in encoded {
            pipe.set(item.attributes_key, item.attributes).ignore();
            for (key, value) in item.relationships {
                pipe.set(key, value).ignore();
            }
            ids.push(item.id);
        }
        if !ids.is_empty() {
            pipe.sadd(&members_key, ids).ignore();
        }
        if !names.is_empty() {
            pipe.sadd(&relationships_key, names).ignore();
        }
        if !hashes.is_empty() {
            pipe.hset_multiple(&hashes_key, hashes).ignore();
        }

        let mut conn = self.get_connection().await?;
        pipe.query_async::<()>(&mut conn)
            .await
            .map_err(|e| unavailable("Redis merge batch failed", e))?;

        self.record(|stats| stats.batch_writes += 1);
        trace!(type_name, count = items.len(), "redis merge batch applied");
        Ok(())
    }

    async fn evict_items(
        &self,
        type_name: &str,
        ids: &[String],
        relationship_types: &[String],
    ) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }
        let mut keys = Vec::with_capacity(ids.len() * (relationship_types.len() + 1));
        for id in ids {
            keys.push(self.codec.attributes_key(type_name, id)?);
            for relationship in relationship_types {
                keys.push(self.codec.relationship_key(type_name, id, relationship)?);
            }
        }

        let mut pipe = redis::pipe();
        pipe.atomic()
            .del(keys)
            .ignore()
            .srem(self.codec.members_set_key(type_name)?, ids)
            .ignore()
            .hdel(self.codec.hashes_key(type_name)?, ids)
            .ignore();

        let mut conn = self.get_connection().await?;
        pipe.query_async::<()>(&mut conn)
            .await
            .map_err(|e| unavailable("Redis evict batch failed", e))?;

        self.record(|stats| stats.batch_evictions += 1);
        trace!(type_name, count = ids.len(), "redis evict batch applied");
        Ok(())
    }

    async fn get_items(
        &self,
        type_name: &str,
        ids: &[String],
        relationship_types: &[String],
    ) -> Result<Vec<CacheData>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let keys = ids
            .iter()
            .map(|id| self.codec.attributes_key(type_name, id))
            .collect::<Result<Vec<_>>>()?;

        let mut conn = self.get_connection().await?;
        let raw: Vec<Option<String>> = redis::cmd("MGET")
            .arg(&keys)
            .query_async(&mut conn)
            .await
            .map_err(|e| unavailable("Redis MGET failed", e))?;

        let mut found = Vec::new();
        for (id, value) in ids.iter().zip(raw) {
            if let Some(value) = value {
                found.push(CacheData::new(id.clone()).with_attributes(decode_attributes(&value)?));
            }
        }

        if !found.is_empty() && !relationship_types.is_empty() {
            let mut lookups = Vec::with_capacity(found.len() * relationship_types.len());
            for (index, item) in found.iter().enumerate() {
                for relationship in relationship_types {
                    lookups.push((
                        index,
                        relationship,
                        self.codec.relationship_key(type_name, &item.id, relationship)?,
                    ));
                }
            }
            let relationship_keys: Vec<&String> = lookups.iter().map(|(_, _, key)| key).collect();
            let raw: Vec<Option<String>> = redis::cmd("MGET")
                .arg(relationship_keys)
                .query_async(&mut conn)
                .await
                .map_err(|e| unavailable("Redis MGET failed", e))?;
            for ((index, relationship, _), value) in lookups.iter().zip(raw) {
                if let Some(value) = value {
                    found[*index]
                        .relationships
                        .insert((*relationship).clone(), decode_relationship(&value)?);
                }
            }
        }

        self.record(|stats| stats.batch_reads += 1);
        Ok(found)
    }

    async fn existing_items(&self, type_name: &str, ids: &[String]) -> Result<Vec<String>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut pipe = redis::pipe();
        for id in ids {
            pipe.exists(self.codec.attributes_key(type_name, id)?);
        }

        let mut conn = self.get_connection().await?;
        let flags: Vec<bool> = pipe
            .query_async(&mut conn)
            .await
            .map_err(|e| unavailable("Redis EXISTS failed", e))?;

        self.record(|stats| stats.batch_reads += 1);
        Ok(ids
            .iter()
            .zip(flags)
            .filter(|(_, exists)| *exists)
            .map(|(id, _)| id.clone())
            .collect())
    }

    async fn scan_set(
        &self,
        set_key: &str,
        cursor: &str,
        pattern: Option<&str>,
        count: usize,
    ) -> Result<ScanPage> {
        let mut cmd = redis::cmd("SSCAN");
        cmd.arg(set_key).arg(cursor);
        if let Some(pattern) = pattern {
            cmd.arg("MATCH").arg(pattern);
        }
        cmd.arg("COUNT").arg(count.max(1));

        let mut conn = self.get_connection().await?;
        let (cursor, members): (String, Vec<String>) = cmd
            .query_async(&mut conn)
            .await
            .map_err(|e| unavailable("Redis SSCAN failed", e))?;

        self.record(|stats| stats.scan_calls += 1);
        Ok(ScanPage { cursor, members })
    }

    async fn get_hashes(&self, type_name: &str, ids: &[String]) -> Result<Vec<Option<String>>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.get_connection().await?;
        let hashes: Vec<Option<String>> = redis::cmd("HMGET")
            .arg(self.codec.hashes_key(type_name)?)
            .arg(ids)
            .query_async(&mut conn)
            .await
            .map_err(|e| unavailable("Redis HMGET failed", e))?;

        self.record(|stats| stats.other_calls += 1);
        Ok(hashes)
    }

    async fn key_exists(&self, key: &str) -> Result<bool> {
        let mut conn = self.get_connection().await?;
        let exists: bool = conn
            .exists(key)
            .await
            .map_err(|e| unavailable("Redis EXISTS failed", e))?;

        self.record(|stats| stats.other_calls += 1);
        Ok(exists)
    }

    async fn set_marker(&self, key: &str, present: bool) -> Result<()> {
        let mut conn = self.get_connection().await?;
        let result: redis::RedisResult<()> = if present {
            conn.set(key, "true").await
        } else {
            conn.del(key).await
        };
        result.map_err(|e| unavailable("Redis marker update failed", e))?;

        self.record(|stats| stats.other_calls += 1);
        Ok(())
    }

    async fn stats(&self) -> Result<BackendStats> {
        self.stats
            .read()
            .map(|stats| stats.clone())
            .map_err(|_| Error::internal("Failed to read backend stats"))
    }

    fn provider_name(&self) -> &str {
        "redis"
    }
}

impl std::fmt::Debug for RedisCacheBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCacheBackend")
            .field("prefix", &self.codec.prefix())
            .field("connected", &self.connection.initialized())
            .finish()
    }
}
