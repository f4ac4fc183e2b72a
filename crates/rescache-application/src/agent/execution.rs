//! Agent Execution
//!
//! Runs one caching agent and applies its result to the store. Data is
//! merged for every type the result carries; evictions are applied only for
//! types the agent declared authoritative. A failed load writes nothing.

use crate::instrumentation::{Instrumentation, Phase};
use crate::store::CacheStore;
use chrono::{DateTime, Utc};
use rescache_domain::error::Result;
use rescache_domain::ports::{CachingAgent, MetricsRecorder, NullMetricsRecorder, StatusReporter};
use rescache_domain::value_objects::CacheResult;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::{error, info, warn};

/// What one agent run changed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionSummary {
    /// Agent that ran
    pub agent_type: String,
    /// When the run started; on-demand reconciliation compares against it
    pub started_at: DateTime<Utc>,
    /// Entities written per type
    pub merged: BTreeMap<String, usize>,
    /// Ids evicted per type
    pub evicted: BTreeMap<String, usize>,
    /// Evictions ignored because the agent is not authoritative for the type
    pub dropped_evictions: BTreeMap<String, usize>,
}

impl ExecutionSummary {
    fn new(agent_type: String, started_at: DateTime<Utc>) -> Self {
        Self {
            agent_type,
            started_at,
            merged: BTreeMap::new(),
            evicted: BTreeMap::new(),
            dropped_evictions: BTreeMap::new(),
        }
    }

    /// Start of the run in epoch milliseconds
    pub fn started_at_millis(&self) -> i64 {
        self.started_at.timestamp_millis()
    }

    /// Total entities written
    pub fn total_merged(&self) -> usize {
        self.merged.values().sum()
    }

    /// Total ids evicted
    pub fn total_evicted(&self) -> usize {
        self.evicted.values().sum()
    }
}

/// Applies agent results to a store
#[derive(Clone)]
pub struct AgentExecution {
    store: Arc<CacheStore>,
    recorder: Arc<dyn MetricsRecorder>,
}

impl AgentExecution {
    /// Create an executor without metrics
    pub fn new(store: Arc<CacheStore>) -> Self {
        Self::with_recorder(store, Arc::new(NullMetricsRecorder))
    }

    /// Create an executor reporting phase timings into `recorder`
    pub fn with_recorder(store: Arc<CacheStore>, recorder: Arc<dyn MetricsRecorder>) -> Self {
        Self { store, recorder }
    }

    /// The store results are written to
    pub fn store(&self) -> &Arc<CacheStore> {
        &self.store
    }

    /// Run an agent once and apply what it reports
    pub async fn execute(
        &self,
        agent: &dyn CachingAgent,
        status: &dyn StatusReporter,
    ) -> Result<ExecutionSummary> {
        let agent_type = agent.agent_type();
        let instrumentation = Instrumentation::new(agent_type.clone(), Arc::clone(&self.recorder));
        let mut summary = ExecutionSummary::new(agent_type.clone(), Utc::now());

        status.update("loadData", &format!("Loading data for {agent_type}"));
        let result = match instrumentation
            .timed(Phase::ReadData, || agent.load_data(&*self.store))
            .await
        {
            Ok(result) => result,
            Err(e) => {
                error!(agent_type = %agent_type, error = %e, "agent load failed, nothing written");
                instrumentation.increment("loadFailed");
                status.update("failed", &format!("Load failed for {agent_type}: {e}"));
                return Err(e);
            }
        };

        let authoritative: BTreeSet<String> = agent
            .provided_data_types()
            .into_iter()
            .filter(|data_type| data_type.is_authoritative())
            .map(|data_type| data_type.type_name)
            .collect();

        status.update("storeData", &format!("Storing data for {agent_type}"));
        self.apply(&instrumentation, &result, &authoritative, &mut summary)
            .await?;

        info!(
            agent_type = %agent_type,
            merged = summary.total_merged(),
            evicted = summary.total_evicted(),
            "agent run applied"
        );
        status.update("complete", &format!("Completed {agent_type}"));
        Ok(summary)
    }

    async fn apply(
        &self,
        instrumentation: &Instrumentation,
        result: &CacheResult,
        authoritative: &BTreeSet<String>,
        summary: &mut ExecutionSummary,
    ) -> Result<()> {
        for (type_name, items) in &result.cache_results {
            let written = instrumentation
                .timed(Phase::CacheWrite, || self.store.merge_all(type_name, items))
                .await?;
            summary.merged.insert(type_name.clone(), written);
        }

        for (type_name, ids) in &result.evictions {
            if ids.is_empty() {
                continue;
            }
            if !authoritative.contains(type_name) {
                warn!(
                    agent_type = %summary.agent_type,
                    type_name = %type_name,
                    count = ids.len(),
                    "dropping evictions for a type the agent is not authoritative for"
                );
                summary.dropped_evictions.insert(type_name.clone(), ids.len());
                continue;
            }
            let evicted = instrumentation
                .timed(Phase::CacheEvict, || self.store.evict_all(type_name, ids))
                .await?;
            summary.evicted.insert(type_name.clone(), evicted);
        }
        Ok(())
    }
}

impl std::fmt::Debug for AgentExecution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentExecution")
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}
