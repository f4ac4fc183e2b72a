//! Cache store
//!
//! | Item | Description |
//! |------|-------------|
//! | [`CacheStore`] | Batched merge/evict/get over a backend |
//! | [`CacheStoreOptions`] | Batch sizes, scan page size, hashing switch |
//! | [`content_hash`] | Change-detection hash of an entity |

mod cache_store;
mod hashing;
mod options;

pub use cache_store::CacheStore;
pub use hashing::content_hash;
pub use options::CacheStoreOptions;
