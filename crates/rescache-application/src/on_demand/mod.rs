//! On-demand refresh
//!
//! | Item | Description |
//! |------|-------------|
//! | [`OnDemandCoordinator`] | Scoped single-entity refresh with bookkeeping |
//! | [`OnDemandCapable`] | Agents that can fetch one object by name |
//! | [`KeyLocks`] | Per-key serialization of refreshes |

mod coordinator;
mod locks;

pub use coordinator::{OnDemandCapable, OnDemandCoordinator};
pub use locks::{KeyGuard, KeyLocks};
