//! Agent result protocol value objects
//!
//! A polling agent reports "the world as I now see it" as a [`CacheResult`]:
//! fresh entities per type plus the ids to evict per type. Eviction is only
//! ever driven by types the agent declared [`Authority::Authoritative`].

use crate::value_objects::cache_data::CacheData;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How an agent relates to an entity type it writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Authority {
    /// Output is the complete replacement set for the agent's scope
    Authoritative,
    /// Output may add or refresh entities but never drives eviction
    Informative,
}

/// An `(authority, type)` pair declared by an agent
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentDataType {
    /// Entity type name
    pub type_name: String,
    /// Authority of the agent over the type
    pub authority: Authority,
}

impl AgentDataType {
    /// Declare authoritative ownership of a type
    pub fn authoritative<S: Into<String>>(type_name: S) -> Self {
        Self {
            type_name: type_name.into(),
            authority: Authority::Authoritative,
        }
    }

    /// Declare informative contribution to a type
    pub fn informative<S: Into<String>>(type_name: S) -> Self {
        Self {
            type_name: type_name.into(),
            authority: Authority::Informative,
        }
    }

    /// Whether the declaration is authoritative
    pub fn is_authoritative(&self) -> bool {
        self.authority == Authority::Authoritative
    }
}

/// Output of one agent run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheResult {
    /// Fresh entities per type
    pub cache_results: BTreeMap<String, Vec<CacheData>>,
    /// Ids to evict per type
    pub evictions: BTreeMap<String, Vec<String>>,
}

impl CacheResult {
    /// Create an empty result
    pub fn new() -> Self {
        Self::default()
    }

    /// Add fresh entities of one type
    pub fn with_data<S: Into<String>>(mut self, type_name: S, items: Vec<CacheData>) -> Self {
        self.cache_results
            .entry(type_name.into())
            .or_default()
            .extend(items);
        self
    }

    /// Add evictions for one type
    pub fn with_evictions<S: Into<String>>(mut self, type_name: S, ids: Vec<String>) -> Self {
        self.evictions.entry(type_name.into()).or_default().extend(ids);
        self
    }

    /// Fresh entities of a type; empty when the type is absent
    pub fn data_for(&self, type_name: &str) -> &[CacheData] {
        self.cache_results
            .get(type_name)
            .map_or(&[][..], Vec::as_slice)
    }

    /// Evicted ids of a type; empty when the type is absent
    pub fn evictions_for(&self, type_name: &str) -> &[String] {
        self.evictions.get(type_name).map_or(&[][..], Vec::as_slice)
    }
}

/// The `(provider, account, region)` slice of the world an agent owns
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentScope {
    /// Provider (cloud or source system) name
    pub provider: String,
    /// Account name
    pub account: String,
    /// Region name
    pub region: String,
}

impl AgentScope {
    /// Create a scope
    pub fn new(
        provider: impl Into<String>,
        account: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            provider: provider.into(),
            account: account.into(),
            region: region.into(),
        }
    }

    /// Whether a request for `(account, region)` belongs to this scope
    pub fn matches(&self, account: &str, region: &str) -> bool {
        self.account == account && self.region == region
    }
}
