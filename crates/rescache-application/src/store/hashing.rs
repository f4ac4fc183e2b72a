//! Content hashes for change detection

use rescache_domain::error::Result;
use rescache_domain::value_objects::CacheData;
use sha2::{Digest, Sha256};

/// SHA-256 of an entity's attributes and relationships, hex encoded
///
/// Both maps are ordered, so equal entities always hash equally.
pub fn content_hash(item: &CacheData) -> Result<String> {
    let bytes = serde_json::to_vec(&(&item.attributes, &item.relationships))?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}
