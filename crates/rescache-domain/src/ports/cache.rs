//! Provider Cache Port
//!
//! Read-only view of the cache handed to agents while they build a result.
//! Agents list what they previously owned through this view; they never
//! write through it.

use crate::error::Result;
use crate::value_objects::{CacheData, RelationshipFilter};
use async_trait::async_trait;
use std::collections::BTreeSet;

/// Read-only cache view
#[async_trait]
pub trait ProviderCache: Send + Sync {
    /// Read one entity; `Ok(None)` when it does not exist
    async fn get(
        &self,
        type_name: &str,
        id: &str,
        filter: &RelationshipFilter,
    ) -> Result<Option<CacheData>>;

    /// Read entities; `None` ids means every member of the type
    async fn get_all(
        &self,
        type_name: &str,
        ids: Option<&[String]>,
        filter: &RelationshipFilter,
    ) -> Result<Vec<CacheData>>;

    /// Every id in the type's membership set
    async fn get_identifiers(&self, type_name: &str) -> Result<BTreeSet<String>>;

    /// Ids in the type's membership set matching a glob
    async fn filter_identifiers(&self, type_name: &str, pattern: &str)
    -> Result<BTreeSet<String>>;

    /// Which of `ids` currently have stored attributes
    async fn existing_identifiers(
        &self,
        type_name: &str,
        ids: &[String],
    ) -> Result<BTreeSet<String>>;
}
