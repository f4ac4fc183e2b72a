//! Cached entity value objects

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Attribute payload of a cached entity
///
/// Ordered so the serialized form is deterministic.
pub type Attributes = BTreeMap<String, Value>;

/// Relationships of a cached entity: related type -> related ids
pub type Relationships = BTreeMap<String, BTreeSet<String>>;

/// Snapshot of one externally observed object
///
/// The type is not part of the value; every store operation takes it
/// alongside the entity. Relationship targets are ids in the foreign type's
/// id space and are never validated by the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheData {
    /// Identifier, unique within the entity type
    pub id: String,
    /// Arbitrary payload
    #[serde(default)]
    pub attributes: Attributes,
    /// Related type -> set of related ids
    #[serde(default)]
    pub relationships: Relationships,
}

impl CacheData {
    /// Create an entity with no attributes and no relationships
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self {
            id: id.into(),
            attributes: Attributes::new(),
            relationships: Relationships::new(),
        }
    }

    /// Add or replace one attribute
    pub fn with_attribute<K: Into<String>, V: Into<Value>>(mut self, key: K, value: V) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Replace the attribute payload
    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Add related ids of one type, keeping ids already present
    pub fn with_relationship<K, I, S>(mut self, related_type: K, ids: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.relationships
            .entry(related_type.into())
            .or_default()
            .extend(ids.into_iter().map(Into::into));
        self
    }

    /// Keep only the relationships allowed by a filter
    pub fn retain_relationships(&mut self, filter: &RelationshipFilter) {
        self.relationships.retain(|name, _| filter.allows(name));
    }
}

/// Selects which relationships a read resolves
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelationshipFilter {
    /// Every relationship name ever used by the type
    #[default]
    All,
    /// No relationships at all
    None,
    /// Only the listed relationship names
    Include(BTreeSet<String>),
}

impl RelationshipFilter {
    /// Resolve every known relationship
    pub fn all() -> Self {
        Self::All
    }

    /// Resolve no relationships
    pub fn none() -> Self {
        Self::None
    }

    /// Resolve only the given relationship names
    pub fn include<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Include(names.into_iter().map(Into::into).collect())
    }

    /// Whether a relationship name passes this filter
    pub fn allows(&self, name: &str) -> bool {
        match self {
            Self::All => true,
            Self::None => false,
            Self::Include(names) => names.contains(name),
        }
    }
}
