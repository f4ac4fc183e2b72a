//! Caching Agent Ports
//!
//! Boundary with the external scheduler: it triggers [`CachingAgent::load_data`]
//! on its own cadence and routes on-demand refresh requests to
//! [`OnDemandHandler`]s. Cadence, retries and leader election are not part
//! of this contract.

use crate::error::Result;
use crate::ports::cache::ProviderCache;
use crate::value_objects::{
    AgentDataType, CacheResult, OnDemandRequest, OnDemandResult, PendingOnDemandRequest,
    ReconcileSummary,
};
use async_trait::async_trait;

/// A polling agent that reports authoritative or informative state
#[async_trait]
pub trait CachingAgent: Send + Sync {
    /// Unique agent type, usually `{account}/{region}/{AgentName}`
    fn agent_type(&self) -> String;

    /// Name of the provider the agent observes
    fn provider_name(&self) -> &str;

    /// Types the agent writes and its authority over each
    fn provided_data_types(&self) -> Vec<AgentDataType>;

    /// Fetch current state and package it as a cache result
    ///
    /// An error means nothing may be written for this run.
    async fn load_data(&self, cache: &dyn ProviderCache) -> Result<CacheResult>;
}

/// Handles out-of-cycle refreshes of single entities
#[async_trait]
pub trait OnDemandHandler: Send + Sync {
    /// Agent type performing the refreshes
    fn agent_type(&self) -> String;

    /// Entity type this handler refreshes
    fn on_demand_type(&self) -> &str;

    /// Whether the handler serves a type
    fn handles(&self, type_name: &str) -> bool {
        self.on_demand_type() == type_name
    }

    /// Refresh one entity; `Ok(None)` when the request is outside this handler's scope
    async fn handle(&self, request: &OnDemandRequest) -> Result<Option<OnDemandResult>>;

    /// Bookkeeping of refreshes not yet retired by a normal poll
    async fn pending_on_demand_requests(&self) -> Result<Vec<PendingOnDemandRequest>>;

    /// Retire or age this handler's entries after a normal poll started at `poll_start_millis`
    ///
    /// Entries written before the poll started and already seen by an
    /// earlier poll are evicted; every other entry has its processed count
    /// incremented.
    async fn reconcile_on_demand(&self, poll_start_millis: i64) -> Result<ReconcileSummary>;
}
