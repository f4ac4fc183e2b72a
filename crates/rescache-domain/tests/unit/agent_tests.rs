//! Unit tests for the agent result protocol types

use rescache_domain::{AgentDataType, AgentScope, Authority, CacheData, CacheResult};

#[test]
fn test_agent_data_type() {
    let owned = AgentDataType::authoritative("services");
    assert!(owned.is_authoritative());
    assert_eq!(owned.type_name, "services");

    let side = AgentDataType::informative("targetGroups");
    assert!(!side.is_authoritative());
    assert_eq!(side.authority, Authority::Informative);
}

#[test]
fn test_cache_result_accessors() {
    let result = CacheResult::new()
        .with_data("services", vec![CacheData::new("a")])
        .with_data("services", vec![CacheData::new("b")])
        .with_evictions("services", vec!["c".to_string()]);

    assert_eq!(result.data_for("services").len(), 2);
    assert_eq!(result.evictions_for("services"), ["c".to_string()]);
    assert!(result.data_for("clusters").is_empty());
    assert!(result.evictions_for("clusters").is_empty());
}

#[test]
fn test_scope_matching() {
    let scope = AgentScope::new("ecs", "prod", "us-east-1");
    assert!(scope.matches("prod", "us-east-1"));
    assert!(!scope.matches("prod", "us-west-2"));
    assert!(!scope.matches("test", "us-east-1"));
}
