//! Tests for the agent registry

use crate::support::{SERVICES, ServiceAgent, memory_store};
use rescache_application::{AgentRegistry, CacheStoreOptions, OnDemandCoordinator, Scoped};
use rescache_domain::error::Error;
use rescache_domain::ports::OnDemandHandler;
use rescache_domain::value_objects::OnDemandRequest;
use std::sync::Arc;

fn registry_with_regions(regions: &[&str]) -> AgentRegistry {
    let (_, store) = memory_store(CacheStoreOptions::default());
    let mut registry = AgentRegistry::new();
    for region in regions {
        let agent = Arc::new(ServiceAgent::new("prod", region, &["svc-a"]));
        registry
            .register_agent(Arc::new(Scoped::new(ServiceAgent::new(
                "prod",
                region,
                &["svc-a"],
            ))))
            .unwrap();
        registry.register_on_demand(Arc::new(OnDemandCoordinator::new(agent, store.clone())));
    }
    registry
}

#[test]
fn test_duplicate_agent_type_is_rejected() {
    let mut registry = registry_with_regions(&["us-east-1"]);
    let result =
        registry.register_agent(Arc::new(Scoped::new(ServiceAgent::new("prod", "us-east-1", &[]))));
    assert!(matches!(result, Err(Error::InvalidArgument { .. })));
    assert_eq!(registry.agents().len(), 1);
}

#[test]
fn test_lookup_by_type() {
    let registry = registry_with_regions(&["us-east-1", "us-west-2"]);
    assert!(registry.agent("prod/us-west-2/ServiceAgent").is_some());
    assert!(registry.agent("prod/eu-west-1/ServiceAgent").is_none());
    assert_eq!(registry.on_demand_for(SERVICES).len(), 2);
    assert!(registry.on_demand_for("clusters").is_empty());
}

#[tokio::test]
async fn test_broadcast_reaches_the_matching_scope() {
    let registry = registry_with_regions(&["us-east-1", "us-west-2"]);

    let outcome = registry
        .handle_on_demand(SERVICES, &OnDemandRequest::new("prod", "us-west-2", "svc-a"))
        .await
        .unwrap()
        .expect("one handler matches");
    assert_eq!(outcome.source_agent_type, "prod/us-west-2/ServiceAgent");

    let pending = registry.pending_on_demand_requests(SERVICES).await.unwrap();
    assert_eq!(pending.len(), 1);
}

#[tokio::test]
async fn test_broadcast_without_match_is_none() {
    let registry = registry_with_regions(&["us-east-1"]);
    let outcome = registry
        .handle_on_demand(SERVICES, &OnDemandRequest::new("dev", "us-east-1", "svc-a"))
        .await
        .unwrap();
    assert!(outcome.is_none());

    let handlers = registry.on_demand_for(SERVICES);
    assert!(handlers.iter().all(|handler| handler.handles(SERVICES)));
}

#[tokio::test]
async fn test_reconcile_reaches_every_handler_of_the_type() {
    let registry = registry_with_regions(&["us-east-1", "us-west-2"]);
    for region in ["us-east-1", "us-west-2"] {
        registry
            .handle_on_demand(SERVICES, &OnDemandRequest::new("prod", region, "svc-a"))
            .await
            .unwrap()
            .expect("one handler matches");
    }

    // First poll only marks the fresh entries as seen
    let summary = registry.reconcile_on_demand(SERVICES, 0).await.unwrap();
    assert_eq!(summary.evicted, 0);
    assert_eq!(summary.updated, 2);

    // A poll started after the refreshes retires them
    let summary = registry
        .reconcile_on_demand(SERVICES, i64::MAX)
        .await
        .unwrap();
    assert_eq!(summary.evicted, 2);
    assert_eq!(summary.updated, 0);
    assert!(
        registry
            .pending_on_demand_requests(SERVICES)
            .await
            .unwrap()
            .is_empty()
    );

    let untouched = registry.reconcile_on_demand("clusters", i64::MAX).await.unwrap();
    assert_eq!(untouched, Default::default());
}
