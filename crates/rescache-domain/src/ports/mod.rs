//! Domain Port Interfaces
//!
//! Defines all boundary contracts between domain and external layers.
//!
//! ## Organization
//!
//! - **agent** - Caching agents and on-demand handlers driven by the scheduler
//! - **cache** - Read-only cache view handed to agents
//! - **infrastructure/** - Metrics and status reporting
//! - **providers/** - Backing-store batch I/O

/// Agent ports
pub mod agent;
/// Read-only cache view
pub mod cache;
/// Infrastructure service ports
pub mod infrastructure;
/// External provider ports
pub mod providers;

pub use agent::{CachingAgent, OnDemandHandler};
pub use cache::ProviderCache;
pub use infrastructure::{MetricsRecorder, NullMetricsRecorder, NullStatusReporter, StatusReporter};
pub use providers::{BackendStats, CacheBackend, ScanPage};
