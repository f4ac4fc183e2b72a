//! Application Layer - Resource Cache
//!
//! Storage engine and agent reconciliation built on the domain ports.
//!
//! ## Architecture
//!
//! The application layer:
//! - Implements batching, set enumeration and change detection once over
//!   the `CacheBackend` port ([`store`])
//! - Applies agent results with authoritative eviction ([`agent`])
//! - Serializes single-entity refreshes per key ([`on_demand`])
//! - Times processing phases through the `MetricsRecorder` port
//!   ([`instrumentation`])
//!
//! ## Dependencies
//!
//! This crate depends only on:
//! - `rescache-domain`: For value objects, key codecs and ports
//! - Pure Rust libraries for async, hashing and timestamps

pub mod agent;
pub mod instrumentation;
pub mod on_demand;
pub mod registry;
pub mod status;
pub mod store;

pub use agent::{AgentExecution, ExecutionSummary, Scoped, ScopedCachingAgent, load_scoped};
pub use instrumentation::{InMemoryMetricsRecorder, Instrumentation, Phase};
pub use on_demand::{OnDemandCapable, OnDemandCoordinator};
pub use registry::AgentRegistry;
pub use status::TracingStatusReporter;
pub use store::{CacheStore, CacheStoreOptions};
