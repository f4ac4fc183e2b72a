//! Value encoding shared by all backends
//!
//! Attributes are stored as a JSON object, each relationship as a JSON
//! array of related ids. Empty maps and empty sets are stored as `{}` and
//! `[]` so they survive a round trip.

use rescache_domain::error::Result;
use rescache_domain::keys::KeyCodec;
use rescache_domain::value_objects::{Attributes, CacheData};
use std::collections::BTreeSet;

/// Serialized writes of one entity
pub(crate) struct EncodedItem {
    pub id: String,
    pub attributes_key: String,
    pub attributes: String,
    pub relationships: Vec<(String, String)>,
}

/// Serialize a batch and build its keys before anything is written
pub(crate) fn encode_items(
    codec: &KeyCodec,
    type_name: &str,
    items: &[CacheData],
) -> Result<Vec<EncodedItem>> {
    items
        .iter()
        .map(|item| -> Result<EncodedItem> {
            let relationships = item
                .relationships
                .iter()
                .map(|(name, ids)| -> Result<(String, String)> {
                    Ok((
                        codec.relationship_key(type_name, &item.id, name)?,
                        serde_json::to_string(ids)?,
                    ))
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(EncodedItem {
                id: item.id.clone(),
                attributes_key: codec.attributes_key(type_name, &item.id)?,
                attributes: serde_json::to_string(&item.attributes)?,
                relationships,
            })
        })
        .collect()
}

/// Relationship names used anywhere in a batch
pub(crate) fn relationship_names(items: &[CacheData]) -> BTreeSet<String> {
    items
        .iter()
        .flat_map(|item| item.relationships.keys().cloned())
        .collect()
}

pub(crate) fn decode_attributes(raw: &str) -> Result<Attributes> {
    Ok(serde_json::from_str(raw)?)
}

pub(crate) fn decode_relationship(raw: &str) -> Result<BTreeSet<String>> {
    Ok(serde_json::from_str(raw)?)
}
