//! On-Demand Coordinator
//!
//! Refreshes a single entity out of the normal poll cycle. Requests are
//! broadcast to every coordinator of a type; only the one bound to the
//! request's `(account, region)` acts. The whole read, transform and store
//! pipeline for one key runs under that key's lock.

use crate::agent::ScopedCachingAgent;
use crate::instrumentation::{Instrumentation, Phase};
use crate::on_demand::locks::KeyLocks;
use crate::store::CacheStore;
use async_trait::async_trait;
use chrono::Utc;
use rescache_domain::constants::ON_DEMAND_TYPE;
use rescache_domain::error::Result;
use rescache_domain::keys::EntityKey;
use rescache_domain::ports::{
    MetricsRecorder, NullMetricsRecorder, OnDemandHandler, ProviderCache,
};
use rescache_domain::value_objects::{
    CacheData, CacheResult, OnDemandRequest, OnDemandResult, PendingOnDemandRequest,
    ReconcileSummary, RelationshipFilter,
};
use std::sync::Arc;
use tracing::{debug, info, trace};

/// A scoped agent that can also fetch one object by name
#[async_trait]
pub trait OnDemandCapable: ScopedCachingAgent {
    /// Entity type refreshed on demand
    fn on_demand_type(&self) -> &str;

    /// Fetch a single object; `Ok(None)` when it no longer exists upstream
    async fn fetch_one(&self, name: &str) -> Result<Option<Self::Item>>;
}

/// Wraps a scoped agent with scoped, serialized single-entity refreshes
pub struct OnDemandCoordinator<A> {
    agent: Arc<A>,
    store: Arc<CacheStore>,
    instrumentation: Instrumentation,
    locks: KeyLocks,
}

impl<A: OnDemandCapable> OnDemandCoordinator<A> {
    /// Create a coordinator without metrics
    pub fn new(agent: Arc<A>, store: Arc<CacheStore>) -> Self {
        Self::with_recorder(agent, store, Arc::new(NullMetricsRecorder))
    }

    /// Create a coordinator reporting phase timings into `recorder`
    pub fn with_recorder(
        agent: Arc<A>,
        store: Arc<CacheStore>,
        recorder: Arc<dyn MetricsRecorder>,
    ) -> Self {
        let instrumentation = Instrumentation::new(agent.agent_type(), recorder);
        Self {
            agent,
            store,
            instrumentation,
            locks: KeyLocks::new(),
        }
    }

    /// The wrapped agent
    pub fn agent(&self) -> &Arc<A> {
        &self.agent
    }

    /// Keys with a refresh in flight or waiting
    pub fn in_flight(&self) -> usize {
        self.locks.len()
    }

    fn scope_pattern(&self) -> String {
        let scope = self.agent.scope();
        EntityKey::scope_pattern(
            &scope.provider,
            self.agent.on_demand_type(),
            &scope.account,
            &scope.region,
        )
    }

    async fn refresh(&self, request: &OnDemandRequest, id: &str) -> Result<CacheResult> {
        let type_name = self.agent.on_demand_type();
        let fetched = self
            .instrumentation
            .timed(Phase::ReadData, || self.agent.fetch_one(&request.name))
            .await?;

        let Some(item) = fetched else {
            return self
                .instrumentation
                .timed(Phase::OnDemandStore, || self.store_missing(type_name, id))
                .await;
        };

        let data = self.instrumentation.timed_sync(Phase::TransformData, || {
            self.agent.generate_fresh_data(std::slice::from_ref(&item))
        })?;
        let result = data
            .into_iter()
            .fold(CacheResult::new(), |result, (type_name, items)| {
                result.with_data(type_name, items)
            });

        self.instrumentation
            .timed(Phase::OnDemandStore, || self.store_refreshed(type_name, &result))
            .await?;
        Ok(result)
    }

    async fn store_refreshed(&self, type_name: &str, result: &CacheResult) -> Result<()> {
        for (data_type, items) in &result.cache_results {
            self.instrumentation
                .timed(Phase::CacheWrite, || self.store.merge_all(data_type, items))
                .await?;
        }

        let cache_time = Utc::now().timestamp_millis();
        let moniker = self.agent.agent_type();
        let entries: Vec<CacheData> = result
            .data_for(type_name)
            .iter()
            .map(|item| {
                PendingOnDemandRequest {
                    id: item.id.clone(),
                    moniker: moniker.clone(),
                    cache_time,
                    processed_count: 0,
                    processed_time: None,
                }
                .to_cache_data()
            })
            .collect();
        self.instrumentation
            .timed(Phase::CacheWrite, || {
                self.store.merge_all(ON_DEMAND_TYPE, &entries)
            })
            .await?;
        Ok(())
    }

    async fn store_missing(&self, type_name: &str, id: &str) -> Result<CacheResult> {
        let ids = vec![id.to_string()];
        self.instrumentation
            .timed(Phase::CacheEvict, || self.store.evict_all(type_name, &ids))
            .await?;
        self.instrumentation
            .timed(Phase::CacheEvict, || self.store.evict_all(ON_DEMAND_TYPE, &ids))
            .await?;
        debug!(type_name, id, "entity gone upstream, evicted");
        Ok(CacheResult::new().with_evictions(type_name, ids))
    }

    async fn pending(&self) -> Result<Vec<PendingOnDemandRequest>> {
        let ids: Vec<String> = self
            .store
            .filter_identifiers(ON_DEMAND_TYPE, &self.scope_pattern())
            .await?
            .into_iter()
            .collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let entries = self
            .store
            .get_all(ON_DEMAND_TYPE, Some(ids.as_slice()), &RelationshipFilter::None)
            .await?;
        Ok(entries
            .iter()
            .filter_map(PendingOnDemandRequest::from_cache_data)
            .collect())
    }
}

#[async_trait]
impl<A: OnDemandCapable + 'static> OnDemandHandler for OnDemandCoordinator<A> {
    fn agent_type(&self) -> String {
        self.agent.agent_type()
    }

    fn on_demand_type(&self) -> &str {
        self.agent.on_demand_type()
    }

    async fn handle(&self, request: &OnDemandRequest) -> Result<Option<OnDemandResult>> {
        let scope = self.agent.scope();
        if !scope.matches(&request.account, &request.region) {
            trace!(
                agent_type = %self.instrumentation.agent_type(),
                account = %request.account,
                region = %request.region,
                "on-demand request outside scope"
            );
            return Ok(None);
        }

        let id = EntityKey::new(
            scope.provider.as_str(),
            self.agent.on_demand_type(),
            request.account.as_str(),
            request.region.as_str(),
            request.name.as_str(),
        )?
        .encode();

        let _guard = self.locks.lock(&id).await;
        self.instrumentation.increment("onDemandRequest");
        let cache_result = self.refresh(request, &id).await?;
        info!(
            agent_type = %self.instrumentation.agent_type(),
            id = %id,
            evicted = !cache_result.evictions.is_empty(),
            "on-demand refresh applied"
        );
        Ok(Some(OnDemandResult {
            source_agent_type: self.agent.agent_type(),
            cache_result,
        }))
    }

    async fn pending_on_demand_requests(&self) -> Result<Vec<PendingOnDemandRequest>> {
        self.pending().await
    }

    async fn reconcile_on_demand(&self, poll_start_millis: i64) -> Result<ReconcileSummary> {
        let pending = self.pending().await?;
        let now = Utc::now().timestamp_millis();

        let mut retired = Vec::new();
        let mut aged = Vec::new();
        for mut entry in pending {
            if entry.cache_time < poll_start_millis && entry.processed_count > 0 {
                retired.push(entry.id);
            } else {
                entry.processed_count += 1;
                entry.processed_time = Some(now);
                aged.push(entry.to_cache_data());
            }
        }

        self.store.evict_all(ON_DEMAND_TYPE, &retired).await?;
        self.store.merge_all(ON_DEMAND_TYPE, &aged).await?;
        let summary = ReconcileSummary {
            evicted: retired.len(),
            updated: aged.len(),
        };
        debug!(
            agent_type = %self.instrumentation.agent_type(),
            evicted = summary.evicted,
            updated = summary.updated,
            "reconciled on-demand entries"
        );
        Ok(summary)
    }
}

impl<A> std::fmt::Debug for OnDemandCoordinator<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnDemandCoordinator")
            .field("agent_type", &self.instrumentation.agent_type())
            .field("in_flight", &self.locks.len())
            .finish_non_exhaustive()
    }
}
