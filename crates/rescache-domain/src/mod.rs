//! # Domain Layer
//!
//! Core types and contracts of the resource cache: the cached entity model,
//! the key codecs, the agent result protocol and the ports every other
//! layer implements or consumes.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`keys`] | Store-key and entity-identity codecs |
//! | [`value_objects`] | `CacheData`, `CacheResult`, on-demand types |
//! | [`ports`] | Backend, agent, metrics and status traits |
//! | [`error`] | Domain error taxonomy |

pub mod constants;
pub mod error;
pub mod keys;
pub mod ports;
pub mod value_objects;

pub use error::{Error, Result};
pub use keys::{EntityKey, KeyCodec};
pub use value_objects::*;
