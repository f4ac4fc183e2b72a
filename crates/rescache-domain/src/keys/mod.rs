//! Key codecs
//!
//! Two deterministic encodings are used throughout the cache:
//!
//! - [`KeyCodec`] maps `(prefix, type, id, relationship)` onto backing-store keys
//! - [`EntityKey`] maps semantic identity (provider, account, region, name) onto
//!   the opaque entity id stored under those keys

/// Semantic entity identity
pub mod entity_key;
/// Backing-store key layout
pub mod store_key;

pub use entity_key::EntityKey;
pub use store_key::KeyCodec;
