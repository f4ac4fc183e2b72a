//! Agent Registry
//!
//! Explicit registry of caching agents and on-demand handlers, built once
//! at startup and handed to whatever drives the agents.

use rescache_domain::error::{Error, Result};
use rescache_domain::ports::{CachingAgent, OnDemandHandler};
use rescache_domain::value_objects::{
    OnDemandRequest, OnDemandResult, PendingOnDemandRequest, ReconcileSummary,
};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

/// Registered agents and on-demand handlers
#[derive(Default, Clone)]
pub struct AgentRegistry {
    agents: Vec<Arc<dyn CachingAgent>>,
    on_demand: Vec<Arc<dyn OnDemandHandler>>,
}

impl AgentRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a caching agent; agent types must be unique
    pub fn register_agent(&mut self, agent: Arc<dyn CachingAgent>) -> Result<()> {
        let agent_type = agent.agent_type();
        if self.agent(&agent_type).is_some() {
            return Err(Error::invalid_argument(format!(
                "Caching agent '{agent_type}' is already registered"
            )));
        }
        debug!(agent_type = %agent_type, "registered caching agent");
        self.agents.push(agent);
        Ok(())
    }

    /// Register an on-demand handler
    pub fn register_on_demand(&mut self, handler: Arc<dyn OnDemandHandler>) {
        debug!(
            agent_type = %handler.agent_type(),
            type_name = handler.on_demand_type(),
            "registered on-demand handler"
        );
        self.on_demand.push(handler);
    }

    /// Every registered caching agent
    pub fn agents(&self) -> &[Arc<dyn CachingAgent>] {
        &self.agents
    }

    /// Look up a caching agent by type
    pub fn agent(&self, agent_type: &str) -> Option<&Arc<dyn CachingAgent>> {
        self.agents
            .iter()
            .find(|agent| agent.agent_type() == agent_type)
    }

    /// Handlers serving an entity type
    pub fn on_demand_for(&self, type_name: &str) -> Vec<Arc<dyn OnDemandHandler>> {
        self.on_demand
            .iter()
            .filter(|handler| handler.handles(type_name))
            .cloned()
            .collect()
    }

    /// Entity types with at least one on-demand handler
    pub fn on_demand_types(&self) -> BTreeSet<String> {
        self.on_demand
            .iter()
            .map(|handler| handler.on_demand_type().to_string())
            .collect()
    }

    /// Offer a request to every handler of the type
    ///
    /// Handlers outside the request's scope answer `None`; the first handler
    /// that acts ends the broadcast.
    pub async fn handle_on_demand(
        &self,
        type_name: &str,
        request: &OnDemandRequest,
    ) -> Result<Option<OnDemandResult>> {
        for handler in self.on_demand_for(type_name) {
            if let Some(result) = handler.handle(request).await? {
                return Ok(Some(result));
            }
        }
        debug!(
            type_name,
            account = %request.account,
            region = %request.region,
            "no on-demand handler accepted the request"
        );
        Ok(None)
    }

    /// Pending bookkeeping of every handler of the type
    pub async fn pending_on_demand_requests(
        &self,
        type_name: &str,
    ) -> Result<Vec<PendingOnDemandRequest>> {
        let mut pending = Vec::new();
        for handler in self.on_demand_for(type_name) {
            pending.extend(handler.pending_on_demand_requests().await?);
        }
        Ok(pending)
    }

    /// Retire or age the on-demand entries of every handler of the type
    ///
    /// Run after a normal poll of the type with the poll's start time, e.g.
    /// `ExecutionSummary::started_at_millis`.
    pub async fn reconcile_on_demand(
        &self,
        type_name: &str,
        poll_start_millis: i64,
    ) -> Result<ReconcileSummary> {
        let mut summary = ReconcileSummary::default();
        for handler in self.on_demand_for(type_name) {
            summary += handler.reconcile_on_demand(poll_start_millis).await?;
        }
        debug!(
            type_name,
            evicted = summary.evicted,
            updated = summary.updated,
            "reconciled on-demand entries of type"
        );
        Ok(summary)
    }
}

impl std::fmt::Debug for AgentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentRegistry")
            .field(
                "agents",
                &self.agents.iter().map(|a| a.agent_type()).collect::<Vec<_>>(),
            )
            .field("on_demand_types", &self.on_demand_types())
            .finish()
    }
}
