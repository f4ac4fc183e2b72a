//! Value objects shared by every layer

/// Agent result protocol types
pub mod agent;
/// Cached entity and relationship filter
pub mod cache_data;
/// On-demand refresh types
pub mod on_demand;

pub use agent::{AgentDataType, AgentScope, Authority, CacheResult};
pub use cache_data::{Attributes, CacheData, RelationshipFilter, Relationships};
pub use on_demand::{OnDemandRequest, OnDemandResult, PendingOnDemandRequest, ReconcileSummary};
