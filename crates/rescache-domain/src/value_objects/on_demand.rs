//! On-demand refresh value objects

use crate::constants::{
    ON_DEMAND_CACHE_TIME, ON_DEMAND_MONIKER, ON_DEMAND_PROCESSED_COUNT, ON_DEMAND_PROCESSED_TIME,
};
use crate::value_objects::agent::CacheResult;
use crate::value_objects::cache_data::CacheData;
use serde::{Deserialize, Serialize};

/// Externally triggered request to refresh one entity now
///
/// Broadcast to every coordinator handling the type; only the one whose
/// scope matches `(account, region)` acts on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnDemandRequest {
    /// Account of the entity
    pub account: String,
    /// Region of the entity
    pub region: String,
    /// Logical name of the entity within its scope
    pub name: String,
}

impl OnDemandRequest {
    /// Create a request
    pub fn new(
        account: impl Into<String>,
        region: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            account: account.into(),
            region: region.into(),
            name: name.into(),
        }
    }
}

/// Outcome of a handled on-demand request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnDemandResult {
    /// Agent type that performed the refresh
    pub source_agent_type: String,
    /// Data written and ids evicted by the refresh
    pub cache_result: CacheResult,
}

/// Outcome of retiring on-demand entries after a poll
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileSummary {
    /// Entries removed because a later poll has already covered them
    pub evicted: usize,
    /// Entries kept with an incremented processed count
    pub updated: usize,
}

impl std::ops::AddAssign for ReconcileSummary {
    fn add_assign(&mut self, other: Self) {
        self.evicted += other.evicted;
        self.updated += other.updated;
    }
}

/// Freshness bookkeeping kept for one refreshed entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingOnDemandRequest {
    /// Id of the refreshed entity
    pub id: String,
    /// Agent type that produced the refresh
    pub moniker: String,
    /// Epoch millis of the refresh write
    pub cache_time: i64,
    /// Number of polls that have observed the entry since
    pub processed_count: u64,
    /// Epoch millis of the last poll that observed the entry
    pub processed_time: Option<i64>,
}

impl PendingOnDemandRequest {
    /// Convert into the entity stored under the on-demand type
    pub fn to_cache_data(&self) -> CacheData {
        CacheData::new(self.id.clone())
            .with_attribute(ON_DEMAND_MONIKER, self.moniker.clone())
            .with_attribute(ON_DEMAND_CACHE_TIME, self.cache_time)
            .with_attribute(ON_DEMAND_PROCESSED_COUNT, self.processed_count)
            .with_attribute(
                ON_DEMAND_PROCESSED_TIME,
                self.processed_time
                    .map_or(serde_json::Value::Null, serde_json::Value::from),
            )
    }

    /// Read the bookkeeping back from a stored on-demand entity
    ///
    /// Returns `None` when required attributes are missing or mistyped.
    pub fn from_cache_data(data: &CacheData) -> Option<Self> {
        let attributes = &data.attributes;
        Some(Self {
            id: data.id.clone(),
            moniker: attributes.get(ON_DEMAND_MONIKER)?.as_str()?.to_string(),
            cache_time: attributes.get(ON_DEMAND_CACHE_TIME)?.as_i64()?,
            processed_count: attributes.get(ON_DEMAND_PROCESSED_COUNT)?.as_u64()?,
            processed_time: attributes
                .get(ON_DEMAND_PROCESSED_TIME)
                .and_then(serde_json::Value::as_i64),
        })
    }
}
