//! Scoped caching agents
//!
//! Most agents own one `(provider, account, region)` slice of the world.
//! They only fetch objects and turn them into entities; [`load_scoped`]
//! does the rest: for every authoritative type it lists what the agent
//! previously owned in its scope and stages the ids that disappeared.

use async_trait::async_trait;
use chrono::Utc;
use rescache_domain::constants::ON_DEMAND_TYPE;
use rescache_domain::error::Result;
use rescache_domain::keys::EntityKey;
use rescache_domain::ports::{CachingAgent, ProviderCache};
use rescache_domain::value_objects::{
    AgentDataType, AgentScope, CacheData, CacheResult, PendingOnDemandRequest, RelationshipFilter,
};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// An agent bound to one scope
#[async_trait]
pub trait ScopedCachingAgent: Send + Sync {
    /// Object fetched from the source system
    type Item: Send + Sync;

    /// Unique agent type, usually `{account}/{region}/{AgentName}`
    fn agent_type(&self) -> String;

    /// Scope the agent owns
    fn scope(&self) -> &AgentScope;

    /// Types the agent writes and its authority over each
    fn provided_data_types(&self) -> Vec<AgentDataType>;

    /// Fetch every object currently present in the scope
    async fn fetch(&self) -> Result<Vec<Self::Item>>;

    /// Build cache entities per type from fetched objects
    fn generate_fresh_data(&self, items: &[Self::Item]) -> Result<BTreeMap<String, Vec<CacheData>>>;
}

/// Fetch, transform and diff one scoped agent run
///
/// Ids refreshed on demand at or after `poll_start_millis` are newer than
/// this poll: they are left out of the fresh data and are never evicted by
/// it. Any error returns before evictions are computed.
pub async fn load_scoped<A>(
    agent: &A,
    cache: &dyn ProviderCache,
    poll_start_millis: i64,
) -> Result<CacheResult>
where
    A: ScopedCachingAgent + ?Sized,
{
    let items = agent.fetch().await?;
    let mut data = agent.generate_fresh_data(&items)?;
    let scope = agent.scope();
    let declared = agent.provided_data_types();

    let types: BTreeSet<String> = data
        .keys()
        .cloned()
        .chain(declared.iter().map(|data_type| data_type.type_name.clone()))
        .collect();
    let mut protected: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for type_name in &types {
        let fresher = fresher_on_demand_ids(cache, scope, type_name, poll_start_millis).await?;
        if !fresher.is_empty() {
            protected.insert(type_name.clone(), fresher);
        }
    }

    for (type_name, ids) in &protected {
        if let Some(items) = data.get_mut(type_name) {
            items.retain(|item| !ids.contains(&item.id));
        }
    }

    let mut result = CacheResult::new();
    for data_type in declared.iter().filter(|data_type| data_type.is_authoritative()) {
        let type_name = &data_type.type_name;
        let pattern =
            EntityKey::scope_pattern(&scope.provider, type_name, &scope.account, &scope.region);
        let previous = cache.filter_identifiers(type_name, &pattern).await?;
        let current: BTreeSet<&str> = data
            .get(type_name)
            .map(|items| items.iter().map(|item| item.id.as_str()).collect())
            .unwrap_or_default();
        let keep = protected.get(type_name);

        let stale: Vec<String> = previous
            .into_iter()
            .filter(|id| !current.contains(id.as_str()))
            .filter(|id| keep.is_none_or(|ids| !ids.contains(id)))
            .collect();
        debug!(
            agent_type = %agent.agent_type(),
            type_name = %type_name,
            fresh = current.len(),
            stale = stale.len(),
            "computed eviction diff"
        );
        if !stale.is_empty() {
            result = result.with_evictions(type_name.clone(), stale);
        }
    }

    for (type_name, items) in data {
        result = result.with_data(type_name, items);
    }
    Ok(result)
}

async fn fresher_on_demand_ids(
    cache: &dyn ProviderCache,
    scope: &AgentScope,
    type_name: &str,
    poll_start_millis: i64,
) -> Result<BTreeSet<String>> {
    let pattern =
        EntityKey::scope_pattern(&scope.provider, type_name, &scope.account, &scope.region);
    let ids: Vec<String> = cache
        .filter_identifiers(ON_DEMAND_TYPE, &pattern)
        .await?
        .into_iter()
        .collect();
    if ids.is_empty() {
        return Ok(BTreeSet::new());
    }
    let entries = cache
        .get_all(ON_DEMAND_TYPE, Some(ids.as_slice()), &RelationshipFilter::None)
        .await?;
    Ok(entries
        .iter()
        .filter_map(PendingOnDemandRequest::from_cache_data)
        .filter(|entry| entry.cache_time >= poll_start_millis)
        .map(|entry| entry.id)
        .collect())
}

/// Adapter exposing a [`ScopedCachingAgent`] as a [`CachingAgent`]
#[derive(Debug, Clone)]
pub struct Scoped<A> {
    agent: A,
}

impl<A: ScopedCachingAgent> Scoped<A> {
    /// Wrap a scoped agent
    pub fn new(agent: A) -> Self {
        Self { agent }
    }

    /// The wrapped agent
    pub fn inner(&self) -> &A {
        &self.agent
    }
}

#[async_trait]
impl<A: ScopedCachingAgent> CachingAgent for Scoped<A> {
    fn agent_type(&self) -> String {
        self.agent.agent_type()
    }

    fn provider_name(&self) -> &str {
        &self.agent.scope().provider
    }

    fn provided_data_types(&self) -> Vec<AgentDataType> {
        self.agent.provided_data_types()
    }

    async fn load_data(&self, cache: &dyn ProviderCache) -> Result<CacheResult> {
        let poll_start = Utc::now().timestamp_millis();
        load_scoped(&self.agent, cache, poll_start).await
    }
}
