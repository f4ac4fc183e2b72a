//! Unit tests for the backing-store key codec

use rescache_domain::{Error, KeyCodec};

fn codec() -> KeyCodec {
    KeyCodec::new("rescache").unwrap()
}

#[test]
fn test_key_formats() {
    let codec = codec();
    assert_eq!(
        codec.attributes_key("services", "svc-a").unwrap(),
        "rescache:services:attributes:svc-a"
    );
    assert_eq!(
        codec
            .relationship_key("services", "svc-a", "targetGroups")
            .unwrap(),
        "rescache:services:relationships:svc-a:targetGroups"
    );
    assert_eq!(
        codec.all_relationships_set_key("services").unwrap(),
        "rescache:services:relationships"
    );
    assert_eq!(
        codec.members_set_key("services").unwrap(),
        "rescache:services:members"
    );
    assert_eq!(
        codec.hashing_disabled_key("services").unwrap(),
        "rescache:services:hashes.disabled"
    );
    assert_eq!(codec.hashes_key("services").unwrap(), "rescache:services:hashes");
}

#[test]
fn test_delimiter_in_components_is_rejected() {
    let codec = codec();
    assert!(matches!(
        codec.attributes_key("services", "a:b"),
        Err(Error::Encoding { .. })
    ));
    assert!(matches!(
        codec.attributes_key("ser:vices", "a"),
        Err(Error::Encoding { .. })
    ));
    assert!(matches!(
        codec.relationship_key("services", "a", "target:groups"),
        Err(Error::Encoding { .. })
    ));
    assert!(matches!(
        codec.members_set_key(""),
        Err(Error::Encoding { .. })
    ));
    assert!(matches!(KeyCodec::new("bad:prefix"), Err(Error::Encoding { .. })));
    assert!(matches!(KeyCodec::new(""), Err(Error::Encoding { .. })));
}

#[test]
fn test_types_sharing_a_prefix_do_not_collide() {
    let codec = codec();
    let keys = [
        codec.attributes_key("services", "x").unwrap(),
        codec.attributes_key("clusters", "x").unwrap(),
        codec.relationship_key("services", "x", "members").unwrap(),
        codec.members_set_key("services").unwrap(),
        codec.all_relationships_set_key("services").unwrap(),
        codec.hashes_key("services").unwrap(),
        codec.hashing_disabled_key("services").unwrap(),
    ];
    let unique: std::collections::HashSet<_> = keys.iter().collect();
    assert_eq!(unique.len(), keys.len());
}

#[test]
fn test_parse_attributes_key_inverts_encoding() {
    let codec = codec();
    let key = codec.attributes_key("tasks", "ecs;tasks;prod;us-east-1;t-1").unwrap();
    assert_eq!(
        codec.parse_attributes_key(&key),
        Some(("tasks".to_string(), "ecs;tasks;prod;us-east-1;t-1".to_string()))
    );

    assert_eq!(codec.parse_attributes_key("other:tasks:attributes:x"), None);
    assert_eq!(
        codec.parse_attributes_key("rescache:tasks:relationships:x"),
        None
    );
    assert_eq!(codec.parse_attributes_key("rescache:tasks:members"), None);
}

#[test]
fn test_validation_helpers() {
    assert!(KeyCodec::validate_id("svc-a").is_ok());
    assert!(KeyCodec::validate_id("a:b").is_err());
    assert!(KeyCodec::validate_type("services").is_ok());
    assert!(KeyCodec::validate_relationship("targetGroups").is_ok());
    assert!(KeyCodec::validate_relationship("").is_err());
}
