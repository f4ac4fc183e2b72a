//! Tests for eviction-by-diff of scoped agents

use crate::support::{SERVICES, ServiceAgent, memory_store, service_id};
use rescache_application::{AgentExecution, CacheStoreOptions, Scoped, load_scoped};
use rescache_domain::constants::ON_DEMAND_TYPE;
use rescache_domain::ports::{NullStatusReporter, ProviderCache};
use rescache_domain::value_objects::{CacheData, PendingOnDemandRequest};
use std::collections::BTreeSet;

fn id_set(agent: &ServiceAgent, names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|name| agent.id(name)).collect()
}

#[tokio::test]
async fn test_diff_evicts_exactly_the_missing_ids() {
    let (_, store) = memory_store(CacheStoreOptions::default());
    let agent = Scoped::new(ServiceAgent::new("prod", "us-east-1", &["a", "b", "c"]));
    let execution = AgentExecution::new(store.clone());
    execution.execute(&agent, &NullStatusReporter).await.unwrap();

    agent.inner().set_services(&["b", "c", "d"]);
    let result = load_scoped(agent.inner(), &*store, 0).await.unwrap();
    let evicted: BTreeSet<String> = result.evictions_for(SERVICES).iter().cloned().collect();
    assert_eq!(evicted, id_set(agent.inner(), &["a"]));

    execution.execute(&agent, &NullStatusReporter).await.unwrap();
    assert_eq!(
        store.get_identifiers(SERVICES).await.unwrap(),
        id_set(agent.inner(), &["b", "c", "d"])
    );
}

#[tokio::test]
async fn test_empty_fetch_evicts_whole_scope_only() {
    let (_, store) = memory_store(CacheStoreOptions::default());
    let east = Scoped::new(ServiceAgent::new("prod", "us-east-1", &["a", "b"]));
    let west = Scoped::new(ServiceAgent::new("prod", "us-west-2", &["a"]));
    let execution = AgentExecution::new(store.clone());
    execution.execute(&east, &NullStatusReporter).await.unwrap();
    execution.execute(&west, &NullStatusReporter).await.unwrap();

    east.inner().set_services(&[]);
    let summary = execution.execute(&east, &NullStatusReporter).await.unwrap();

    assert_eq!(summary.evicted.get(SERVICES), Some(&2));
    assert_eq!(
        store.get_identifiers(SERVICES).await.unwrap(),
        BTreeSet::from([service_id("prod", "us-west-2", "a")])
    );
}

#[tokio::test]
async fn test_glob_characters_in_scope_match_literally() {
    let (_, store) = memory_store(CacheStoreOptions::default());
    let wildcard = Scoped::new(ServiceAgent::new("team*", "us-east-1", &["a"]));
    let other = Scoped::new(ServiceAgent::new("teamx", "us-east-1", &["a"]));
    let execution = AgentExecution::new(store.clone());
    execution.execute(&other, &NullStatusReporter).await.unwrap();
    execution.execute(&wildcard, &NullStatusReporter).await.unwrap();

    wildcard.inner().set_services(&[]);
    execution.execute(&wildcard, &NullStatusReporter).await.unwrap();

    assert_eq!(
        store.get_identifiers(SERVICES).await.unwrap(),
        BTreeSet::from([service_id("teamx", "us-east-1", "a")])
    );
}

#[tokio::test]
async fn test_backslash_in_scope_still_evicts() {
    let (_, store) = memory_store(CacheStoreOptions::default());
    let agent = Scoped::new(ServiceAgent::new(r"team\ops", "us-east-1", &["a", "b"]));
    let execution = AgentExecution::new(store.clone());
    execution.execute(&agent, &NullStatusReporter).await.unwrap();

    agent.inner().set_services(&["b"]);
    let summary = execution.execute(&agent, &NullStatusReporter).await.unwrap();

    assert_eq!(summary.total_evicted(), 1);
    assert_eq!(
        store.get_identifiers(SERVICES).await.unwrap(),
        BTreeSet::from([service_id(r"team\ops", "us-east-1", "b")])
    );
}

#[tokio::test]
async fn test_failed_fetch_computes_no_evictions() {
    let (_, store) = memory_store(CacheStoreOptions::default());
    let agent = ServiceAgent::new("prod", "us-east-1", &["a"]);
    store
        .merge(SERVICES, CacheData::new(agent.id("a")))
        .await
        .unwrap();
    agent.set_failing(true);

    assert!(load_scoped(&agent, &*store, 0).await.is_err());
    assert_eq!(store.get_identifiers(SERVICES).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_fresher_on_demand_entries_are_protected() {
    let (_, store) = memory_store(CacheStoreOptions::default());
    let agent = ServiceAgent::new("prod", "us-east-1", &["a", "b"]);
    let poll_start = 1_000;
    store
        .merge_all(
            SERVICES,
            &[CacheData::new(agent.id("a")), CacheData::new(agent.id("new"))],
        )
        .await
        .unwrap();
    let fresher = |name: &str| PendingOnDemandRequest {
        id: agent.id(name),
        moniker: "test".to_string(),
        cache_time: poll_start + 10,
        processed_count: 0,
        processed_time: None,
    };
    store
        .merge_all(
            ON_DEMAND_TYPE,
            &[fresher("a").to_cache_data(), fresher("new").to_cache_data()],
        )
        .await
        .unwrap();

    let result = load_scoped(&agent, &*store, poll_start).await.unwrap();

    let fresh: BTreeSet<String> = result
        .data_for(SERVICES)
        .iter()
        .map(|item| item.id.clone())
        .collect();
    assert_eq!(fresh, id_set(&agent, &["b"]));
    assert!(result.evictions_for(SERVICES).is_empty());
}

#[tokio::test]
async fn test_older_on_demand_entries_do_not_protect() {
    let (_, store) = memory_store(CacheStoreOptions::default());
    let agent = ServiceAgent::new("prod", "us-east-1", &[]);
    store
        .merge(SERVICES, CacheData::new(agent.id("gone")))
        .await
        .unwrap();
    let stale = PendingOnDemandRequest {
        id: agent.id("gone"),
        moniker: "test".to_string(),
        cache_time: 10,
        processed_count: 1,
        processed_time: Some(20),
    };
    store
        .merge(ON_DEMAND_TYPE, stale.to_cache_data())
        .await
        .unwrap();

    let result = load_scoped(&agent, &*store, 1_000).await.unwrap();
    assert_eq!(result.evictions_for(SERVICES), &[agent.id("gone")]);
}
