//! Tests for the cache store

use crate::support::{FlakyBackend, ids, memory_store};
use rescache_application::{CacheStore, CacheStoreOptions};
use rescache_domain::error::Error;
use rescache_domain::ports::ProviderCache;
use rescache_domain::ports::providers::CacheBackend;
use rescache_domain::value_objects::{CacheData, RelationshipFilter};
use serde_json::json;
use std::collections::BTreeSet;
use std::sync::Arc;

fn service(id: &str) -> CacheData {
    CacheData::new(id)
        .with_attribute("name", id)
        .with_relationship("targetGroups", [format!("tg-{id}")])
        .with_relationship("clusters", ["main"])
}

fn sorted(mut items: Vec<CacheData>) -> Vec<CacheData> {
    items.sort_by(|a, b| a.id.cmp(&b.id));
    items
}

#[tokio::test]
async fn test_merge_is_idempotent() {
    let (_, store) = memory_store(CacheStoreOptions::default().with_hashing(false));
    store.merge("services", service("svc-a")).await.unwrap();
    store.merge("services", service("svc-a")).await.unwrap();

    let all = store
        .get_all("services", None, &RelationshipFilter::All)
        .await
        .unwrap();
    assert_eq!(all, vec![service("svc-a")]);
}

#[tokio::test]
async fn test_evicting_unknown_id_is_noop() {
    let (backend, store) = memory_store(CacheStoreOptions::default());
    store.evict("services", "ghost").await.unwrap();
    assert!(backend.is_empty().await);
}

#[tokio::test]
async fn test_evict_all_of_nothing_touches_no_backend() {
    let (backend, store) = memory_store(CacheStoreOptions::default());
    assert_eq!(store.evict_all("services", &[]).await.unwrap(), 0);
    assert_eq!(backend.stats().await.unwrap().scan_calls, 0);
}

#[tokio::test]
async fn test_round_trip_preserves_shapes() {
    let (_, store) = memory_store(CacheStoreOptions::default());
    let shapes = vec![
        CacheData::new("empty"),
        CacheData::new("nested").with_attribute("config", json!({"ports": [80, 443], "tls": null})),
        CacheData::new("no-targets").with_relationship("targetGroups", Vec::<String>::new()),
        service("full"),
    ];
    store.merge_all("services", &shapes).await.unwrap();

    for shape in shapes {
        let found = store
            .get("services", &shape.id, &RelationshipFilter::All)
            .await
            .unwrap();
        assert_eq!(found, Some(shape));
    }
}

#[tokio::test]
async fn test_get_missing_is_none() {
    let (_, store) = memory_store(CacheStoreOptions::default());
    let found = store
        .get("services", "ghost", &RelationshipFilter::All)
        .await
        .unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn test_get_all_of_empty_type_is_empty() {
    let (_, store) = memory_store(CacheStoreOptions::default());
    let all = store
        .get_all("services", None, &RelationshipFilter::All)
        .await
        .unwrap();
    assert!(all.is_empty());
}

#[tokio::test]
async fn test_batching_is_transparent() {
    let items: Vec<CacheData> = (0..7).map(|i| service(&format!("svc-{i}"))).collect();
    let (_, reference) = memory_store(CacheStoreOptions::default().with_batch_size(items.len()));
    reference.merge_all("services", &items).await.unwrap();
    let expected = sorted(
        reference
            .get_all("services", None, &RelationshipFilter::All)
            .await
            .unwrap(),
    );

    for k in 1..=items.len() + 1 {
        let (backend, store) =
            memory_store(CacheStoreOptions::default().with_batch_size(k).with_hashing(false));
        assert_eq!(store.merge_all("services", &items).await.unwrap(), items.len());
        let actual = sorted(
            store
                .get_all("services", None, &RelationshipFilter::All)
                .await
                .unwrap(),
        );
        assert_eq!(actual, expected, "batch size {k}");
        let batches = items.len().div_ceil(k) as u64;
        assert_eq!(backend.stats().await.unwrap().batch_writes, batches);
    }
}

#[tokio::test]
async fn test_scan_pagination_returns_every_member_once() {
    let m = 9;
    let items: Vec<CacheData> = (0..m).map(|i| CacheData::new(format!("svc-{i}"))).collect();
    for p in [1, m - 1, m, m + 1] {
        let (backend, store) = memory_store(CacheStoreOptions::default().with_scan_page_size(p));
        store.merge_all("services", &items).await.unwrap();

        let before = backend.stats().await.unwrap().scan_calls;
        let found = store.get_identifiers("services").await.unwrap();
        let pages = backend.stats().await.unwrap().scan_calls - before;

        assert_eq!(found.len(), m, "page size {p}");
        assert!(pages >= m.div_ceil(p) as u64, "page size {p} used {pages} pages");
    }
}

#[tokio::test]
async fn test_include_filter_limits_relationships() {
    let (_, store) = memory_store(CacheStoreOptions::default());
    store
        .merge_all("services", &[service("svc-a"), service("svc-b")])
        .await
        .unwrap();

    let found = store
        .get_all(
            "services",
            Some(ids(&["svc-a", "svc-b"]).as_slice()),
            &RelationshipFilter::include(["targetGroups"]),
        )
        .await
        .unwrap();
    assert_eq!(found.len(), 2);
    for item in found {
        let names: Vec<&String> = item.relationships.keys().collect();
        assert_eq!(names, vec!["targetGroups"]);
    }
}

#[tokio::test]
async fn test_none_filter_skips_relationships() {
    let (_, store) = memory_store(CacheStoreOptions::default());
    store.merge("services", service("svc-a")).await.unwrap();

    let found = store
        .get("services", "svc-a", &RelationshipFilter::None)
        .await
        .unwrap()
        .unwrap();
    assert!(found.relationships.is_empty());
    assert_eq!(found.attributes.get("name"), Some(&json!("svc-a")));
}

#[tokio::test]
async fn test_merge_keeps_relationships_not_carried() {
    let (_, store) = memory_store(CacheStoreOptions::default());
    store.merge("services", service("svc-a")).await.unwrap();
    store
        .merge(
            "services",
            CacheData::new("svc-a").with_relationship("targetGroups", ["tg-new"]),
        )
        .await
        .unwrap();

    let found = store
        .get("services", "svc-a", &RelationshipFilter::All)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        found.relationships["targetGroups"],
        BTreeSet::from(["tg-new".to_string()])
    );
    assert!(found.relationships["clusters"].contains("main"));
    assert!(found.attributes.is_empty());
}

#[tokio::test]
async fn test_evict_removes_entity_and_membership() {
    let (_, store) = memory_store(CacheStoreOptions::default().with_batch_size(2));
    let items: Vec<CacheData> = ["a", "b", "c", "d", "e"].into_iter().map(service).collect();
    store.merge_all("services", &items).await.unwrap();

    store
        .evict_all("services", &ids(&["a", "c", "e"]))
        .await
        .unwrap();

    let remaining = store.get_identifiers("services").await.unwrap();
    assert_eq!(remaining, BTreeSet::from(["b".to_string(), "d".to_string()]));
    assert!(
        store
            .get("services", "a", &RelationshipFilter::All)
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_filter_identifiers_uses_glob() {
    let (_, store) = memory_store(CacheStoreOptions::default());
    let items: Vec<CacheData> = ["prod;svc-a", "prod;svc-b", "test;svc-a"]
        .into_iter()
        .map(CacheData::new)
        .collect();
    store.merge_all("services", &items).await.unwrap();

    let prod = store.filter_identifiers("services", "prod;*").await.unwrap();
    assert_eq!(
        prod,
        BTreeSet::from(["prod;svc-a".to_string(), "prod;svc-b".to_string()])
    );
}

#[tokio::test]
async fn test_existing_identifiers() {
    let (_, store) = memory_store(CacheStoreOptions::default().with_batch_size(1));
    store
        .merge_all("services", &[service("a"), service("b")])
        .await
        .unwrap();

    let existing = store
        .existing_identifiers("services", &ids(&["a", "b", "z"]))
        .await
        .unwrap();
    assert_eq!(existing, BTreeSet::from(["a".to_string(), "b".to_string()]));
}

#[tokio::test]
async fn test_delimiter_in_id_fails_before_any_write() {
    let (backend, store) = memory_store(CacheStoreOptions::default().with_batch_size(1));
    let items = vec![service("ok"), CacheData::new("bad:id")];

    let result = store.merge_all("services", &items).await;
    assert!(matches!(result, Err(Error::Encoding { .. })));
    assert!(backend.is_empty().await);

    let result = store
        .get("services", "bad:id", &RelationshipFilter::All)
        .await;
    assert!(matches!(result, Err(Error::Encoding { .. })));
}

#[tokio::test]
async fn test_delimiter_in_relationship_name_is_rejected() {
    let (backend, store) = memory_store(CacheStoreOptions::default());
    let item = CacheData::new("svc-a").with_relationship("bad:rel", ["x"]);

    let result = store.merge("services", item).await;
    assert!(matches!(result, Err(Error::Encoding { .. })));
    assert!(backend.is_empty().await);
}

#[tokio::test]
async fn test_partial_merge_failure_keeps_earlier_batches() {
    let backend = Arc::new(FlakyBackend::failing_merge(2));
    let store = CacheStore::new(
        backend.clone(),
        CacheStoreOptions::default().with_batch_size(2).with_hashing(false),
    )
    .unwrap();
    let items: Vec<CacheData> = ["a", "b", "c", "d", "e"].into_iter().map(service).collect();

    let result = store.merge_all("services", &items).await;
    assert!(result.as_ref().is_err_and(Error::is_store_unavailable));

    let existing = store
        .existing_identifiers("services", &ids(&["a", "b", "c", "d", "e"]))
        .await
        .unwrap();
    assert_eq!(existing, BTreeSet::from(["a".to_string(), "b".to_string()]));

    // Retrying the whole call converges
    store.merge_all("services", &items).await.unwrap();
    assert_eq!(store.get_identifiers("services").await.unwrap().len(), 5);
}

#[tokio::test]
async fn test_partial_evict_failure_stops_later_batches() {
    let backend = Arc::new(FlakyBackend::failing_evict(2));
    let store = CacheStore::new(
        backend.clone(),
        CacheStoreOptions::default().with_batch_size(2),
    )
    .unwrap();
    let items: Vec<CacheData> = ["a", "b", "c", "d", "e"].into_iter().map(service).collect();
    store.merge_all("services", &items).await.unwrap();

    let result = store
        .evict_all("services", &ids(&["a", "b", "c", "d", "e"]))
        .await;
    assert!(result.is_err());
    assert_eq!(
        store.get_identifiers("services").await.unwrap(),
        BTreeSet::from(["c".to_string(), "d".to_string(), "e".to_string()])
    );
}

#[tokio::test]
async fn test_unchanged_entities_are_skipped() {
    let (backend, store) = memory_store(CacheStoreOptions::default());
    assert_eq!(store.merge("services", service("svc-a")).await.unwrap(), 1);
    assert_eq!(store.merge("services", service("svc-a")).await.unwrap(), 0);
    assert_eq!(backend.stats().await.unwrap().batch_writes, 1);

    let changed = service("svc-a").with_attribute("replicas", 3);
    assert_eq!(store.merge("services", changed).await.unwrap(), 1);
}

#[tokio::test]
async fn test_hashing_override_forces_writes() {
    let (_, store) = memory_store(CacheStoreOptions::default());
    assert!(!store.is_hashing_disabled("services").await.unwrap());
    store.merge("services", service("svc-a")).await.unwrap();

    store.set_hashing_disabled("services", true).await.unwrap();
    assert!(store.is_hashing_disabled("services").await.unwrap());
    assert!(!store.is_hashing_disabled("clusters").await.unwrap());
    assert_eq!(store.merge("services", service("svc-a")).await.unwrap(), 1);

    store.set_hashing_disabled("services", false).await.unwrap();
    assert!(!store.is_hashing_disabled("services").await.unwrap());
}

fn versioned(version: i64) -> CacheData {
    CacheData::new("svc-a").with_attribute("v", version)
}

async fn stored_version(store: &CacheStore) -> serde_json::Value {
    store
        .get("services", "svc-a", &RelationshipFilter::None)
        .await
        .unwrap()
        .expect("stored")
        .attributes["v"]
        .clone()
}

#[tokio::test]
async fn test_unhashed_write_refreshes_stored_hash() {
    let (_, store) = memory_store(CacheStoreOptions::default());
    store.merge("services", versioned(1)).await.unwrap();

    store.set_hashing_disabled("services", true).await.unwrap();
    assert_eq!(store.merge("services", versioned(2)).await.unwrap(), 1);
    store.set_hashing_disabled("services", false).await.unwrap();

    // Going back to the first content is a change, not a skip
    assert_eq!(store.merge("services", versioned(1)).await.unwrap(), 1);
    assert_eq!(stored_version(&store).await, json!(1));
    assert_eq!(store.merge("services", versioned(1)).await.unwrap(), 0);
}

#[tokio::test]
async fn test_globally_unhashed_writer_keeps_hashes_current() {
    let (backend, hashed) = memory_store(CacheStoreOptions::default());
    let unhashed =
        CacheStore::new(backend.clone(), CacheStoreOptions::default().with_hashing(false)).unwrap();

    hashed.merge("services", versioned(1)).await.unwrap();
    assert_eq!(unhashed.merge("services", versioned(2)).await.unwrap(), 1);

    assert_eq!(hashed.merge("services", versioned(1)).await.unwrap(), 1);
    assert_eq!(stored_version(&hashed).await, json!(1));
}

#[tokio::test]
async fn test_global_hashing_switch_wins() {
    let (backend, store) = memory_store(CacheStoreOptions::default().with_hashing(false));
    assert!(store.is_hashing_disabled("services").await.unwrap());
    assert_eq!(backend.stats().await.unwrap().other_calls, 0);
}

#[tokio::test]
async fn test_eviction_clears_hash() {
    let (_, store) = memory_store(CacheStoreOptions::default());
    store.merge("services", service("svc-a")).await.unwrap();
    store.evict("services", "svc-a").await.unwrap();

    assert_eq!(store.merge("services", service("svc-a")).await.unwrap(), 1);
    assert!(
        store
            .get("services", "svc-a", &RelationshipFilter::All)
            .await
            .unwrap()
            .is_some()
    );
}

#[test]
fn test_zero_batch_size_is_rejected() {
    let backend = Arc::new(rescache_providers::cache::MemoryCacheBackend::new("test").unwrap());
    let result = CacheStore::new(backend, CacheStoreOptions::default().with_batch_size(0));
    assert!(matches!(result, Err(Error::InvalidArgument { .. })));
}
