//! Tests for the Redis backend
//!
//! These need a reachable server (`REDIS_URL`, default `redis://127.0.0.1:6379`).

use rescache_domain::constants::SCAN_END_CURSOR;
use rescache_domain::keys::EntityKey;
use rescache_domain::ports::providers::CacheBackend;
use rescache_domain::value_objects::CacheData;
use rescache_providers::cache::RedisCacheBackend;
use std::time::{SystemTime, UNIX_EPOCH};

fn backend() -> RedisCacheBackend {
    let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    RedisCacheBackend::new(&url, &format!("rescache-test-{nanos}")).expect("client")
}

#[test]
fn test_invalid_url_is_configuration_error() {
    assert!(RedisCacheBackend::new("not a url", "test").is_err());
}

#[tokio::test]
#[ignore = "requires a running Redis server"]
async fn test_redis_merge_get_evict() {
    let backend = backend();
    let item = CacheData::new("svc-a")
        .with_attribute("name", "svc-a")
        .with_relationship("clusters", ["c1"]);
    backend
        .merge_items("services", &[item.clone()], &[])
        .await
        .expect("merge");

    let found = backend
        .get_items("services", &["svc-a".to_string()], &["clusters".to_string()])
        .await
        .expect("get");
    assert_eq!(found, vec![item]);

    backend
        .evict_items("services", &["svc-a".to_string()], &["clusters".to_string()])
        .await
        .expect("evict");
    let existing = backend
        .existing_items("services", &["svc-a".to_string()])
        .await
        .expect("existing");
    assert!(existing.is_empty());
}

#[tokio::test]
#[ignore = "requires a running Redis server"]
async fn test_redis_scan_with_pattern() {
    let backend = backend();
    let items: Vec<CacheData> = ["a-1", "a-2", "b-1"].into_iter().map(CacheData::new).collect();
    backend
        .merge_items("services", &items, &[])
        .await
        .expect("merge");
    let key = backend.codec().members_set_key("services").expect("key");

    let mut cursor = SCAN_END_CURSOR.to_string();
    let mut matched = Vec::new();
    loop {
        let page = backend
            .scan_set(&key, &cursor, Some("a-*"), 1)
            .await
            .expect("scan");
        matched.extend(page.members);
        if page.cursor == SCAN_END_CURSOR {
            break;
        }
        cursor = page.cursor;
    }
    matched.sort();
    assert_eq!(matched, vec!["a-1", "a-2"]);
}

#[tokio::test]
#[ignore = "requires a running Redis server"]
async fn test_redis_scope_pattern_with_backslash() {
    let backend = backend();
    let id = |account: &str| {
        EntityKey::new("aws", "services", account, "us-east-1", "api")
            .expect("key")
            .encode()
    };
    let items = vec![CacheData::new(id(r"team\ops")), CacheData::new(id("teamops"))];
    backend
        .merge_items("services", &items, &[])
        .await
        .expect("merge");
    let key = backend.codec().members_set_key("services").expect("key");
    let pattern = EntityKey::scope_pattern("aws", "services", r"team\ops", "us-east-1");

    let page = backend
        .scan_set(&key, SCAN_END_CURSOR, Some(&pattern), 1000)
        .await
        .expect("scan");
    assert_eq!(page.members, vec![id(r"team\ops")]);
}
