//! Agent synchronization
//!
//! | Item | Description |
//! |------|-------------|
//! | [`AgentExecution`] | Applies an agent's result to the store |
//! | [`ScopedCachingAgent`] | Agent bound to one `(provider, account, region)` scope |
//! | [`load_scoped`] | Eviction-by-diff for scoped agents |
//! | [`Scoped`] | Adapter from scoped agent to `CachingAgent` |

mod execution;
mod scoped;

pub use execution::{AgentExecution, ExecutionSummary};
pub use scoped::{Scoped, ScopedCachingAgent, load_scoped};
