//! Backing-store key codec
//!
//! Maps `(prefix, type, id, relationship)` onto the flat, colon-delimited
//! keys used by every backend:
//!
//! | Key | Holds |
//! |-----|-------|
//! | `{prefix}:{type}:attributes:{id}` | entity attributes (JSON object) |
//! | `{prefix}:{type}:relationships:{id}:{rel}` | related ids (JSON array) |
//! | `{prefix}:{type}:relationships` | set of relationship names used by the type |
//! | `{prefix}:{type}:members` | set of all ids of the type |
//! | `{prefix}:{type}:hashes` | hash map id -> content hash |
//! | `{prefix}:{type}:hashes.disabled` | marker key |
//!
//! No component may contain the delimiter, so two distinct inputs can never
//! produce the same key.

use crate::constants::{
    ATTRIBUTES_SEGMENT, HASHES_DISABLED_SEGMENT, HASHES_SEGMENT, MEMBERS_SEGMENT,
    RELATIONSHIPS_SEGMENT, STORE_KEY_DELIMITER,
};
use crate::error::{Error, Result};

/// Deterministic encoder for backing-store keys under one prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCodec {
    prefix: String,
}

impl KeyCodec {
    /// Create a codec for the given key prefix
    pub fn new<S: Into<String>>(prefix: S) -> Result<Self> {
        let prefix = prefix.into();
        check_component("prefix", &prefix)?;
        Ok(Self { prefix })
    }

    /// Key prefix shared by every key this codec produces
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Key of the serialized attributes of one entity
    pub fn attributes_key(&self, type_name: &str, id: &str) -> Result<String> {
        check_component("type", type_name)?;
        check_component("id", id)?;
        Ok(self.join(&[type_name, ATTRIBUTES_SEGMENT, id]))
    }

    /// Key of one relationship of one entity
    pub fn relationship_key(
        &self,
        type_name: &str,
        id: &str,
        relationship_name: &str,
    ) -> Result<String> {
        check_component("type", type_name)?;
        check_component("id", id)?;
        check_component("relationship", relationship_name)?;
        Ok(self.join(&[type_name, RELATIONSHIPS_SEGMENT, id, relationship_name]))
    }

    /// Key of the set of every relationship name used by a type
    pub fn all_relationships_set_key(&self, type_name: &str) -> Result<String> {
        check_component("type", type_name)?;
        Ok(self.join(&[type_name, RELATIONSHIPS_SEGMENT]))
    }

    /// Key of the membership set of a type
    pub fn members_set_key(&self, type_name: &str) -> Result<String> {
        check_component("type", type_name)?;
        Ok(self.join(&[type_name, MEMBERS_SEGMENT]))
    }

    /// Key of the stored content hashes of a type
    pub fn hashes_key(&self, type_name: &str) -> Result<String> {
        check_component("type", type_name)?;
        Ok(self.join(&[type_name, HASHES_SEGMENT]))
    }

    /// Key of the marker that disables hash comparison for a type
    pub fn hashing_disabled_key(&self, type_name: &str) -> Result<String> {
        check_component("type", type_name)?;
        Ok(self.join(&[type_name, HASHES_DISABLED_SEGMENT]))
    }

    /// Recover `(type, id)` from an attributes key produced by this codec
    pub fn parse_attributes_key(&self, key: &str) -> Option<(String, String)> {
        let rest = key
            .strip_prefix(self.prefix.as_str())?
            .strip_prefix(STORE_KEY_DELIMITER)?;
        let mut parts = rest.split(STORE_KEY_DELIMITER);
        let type_name = parts.next()?;
        let segment = parts.next()?;
        let id = parts.next()?;
        if segment != ATTRIBUTES_SEGMENT || parts.next().is_some() || type_name.is_empty() {
            return None;
        }
        Some((type_name.to_string(), id.to_string()))
    }

    /// Check that an entity id can be embedded in store keys
    pub fn validate_id(id: &str) -> Result<()> {
        check_component("id", id)
    }

    /// Check that a type name can be embedded in store keys
    pub fn validate_type(type_name: &str) -> Result<()> {
        check_component("type", type_name)
    }

    /// Check that a relationship name can be embedded in store keys
    pub fn validate_relationship(relationship_name: &str) -> Result<()> {
        check_component("relationship", relationship_name)
    }

    fn join(&self, parts: &[&str]) -> String {
        let mut key = self.prefix.clone();
        for part in parts {
            key.push(STORE_KEY_DELIMITER);
            key.push_str(part);
        }
        key
    }
}

fn check_component(kind: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::encoding(format!("{kind} must not be empty")));
    }
    if value.contains(STORE_KEY_DELIMITER) {
        return Err(Error::encoding(format!(
            "{kind} '{value}' contains reserved delimiter '{STORE_KEY_DELIMITER}'"
        )));
    }
    Ok(())
}
