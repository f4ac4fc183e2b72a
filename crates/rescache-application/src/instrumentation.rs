//! Instrumentation shim
//!
//! Higher-order wrappers that run one phase of agent work and record how
//! long it took. The wrapped value is returned unchanged, errors included.

use dashmap::DashMap;
use rescache_domain::ports::MetricsRecorder;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Timed phase of on-demand and agent processing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Fetching from the source system
    ReadData,
    /// Turning fetched objects into cache entities
    TransformData,
    /// The whole store step of an on-demand refresh
    OnDemandStore,
    /// Merging entities
    CacheWrite,
    /// Evicting entities
    CacheEvict,
}

impl Phase {
    /// Metric label of the phase
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ReadData => "readData",
            Self::TransformData => "transformData",
            Self::OnDemandStore => "onDemandStore",
            Self::CacheWrite => "cacheWrite",
            Self::CacheEvict => "cacheEvict",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Phase timer bound to one agent type
#[derive(Clone)]
pub struct Instrumentation {
    agent_type: String,
    recorder: Arc<dyn MetricsRecorder>,
}

impl Instrumentation {
    /// Create a timer reporting into `recorder`
    pub fn new(agent_type: impl Into<String>, recorder: Arc<dyn MetricsRecorder>) -> Self {
        Self {
            agent_type: agent_type.into(),
            recorder,
        }
    }

    /// Agent type used as the metric label
    pub fn agent_type(&self) -> &str {
        &self.agent_type
    }

    /// Run an async phase and record its duration
    pub async fn timed<F, Fut, T>(&self, phase: Phase, operation: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let start = Instant::now();
        let output = operation().await;
        self.recorder
            .record_duration(&self.agent_type, phase.as_str(), start.elapsed());
        output
    }

    /// Run a synchronous phase and record its duration
    pub fn timed_sync<F, T>(&self, phase: Phase, operation: F) -> T
    where
        F: FnOnce() -> T,
    {
        let start = Instant::now();
        let output = operation();
        self.recorder
            .record_duration(&self.agent_type, phase.as_str(), start.elapsed());
        output
    }

    /// Count one event for this agent type
    pub fn increment(&self, event: &str) {
        self.recorder.increment(&self.agent_type, event);
    }
}

impl fmt::Debug for Instrumentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instrumentation")
            .field("agent_type", &self.agent_type)
            .finish_non_exhaustive()
    }
}

/// Recorder that keeps every observation in memory
#[derive(Debug, Default)]
pub struct InMemoryMetricsRecorder {
    durations: DashMap<(String, String), Vec<Duration>>,
    counters: DashMap<(String, String), u64>,
}

impl InMemoryMetricsRecorder {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Durations recorded for an agent type and phase
    pub fn durations(&self, agent_type: &str, phase: &str) -> Vec<Duration> {
        self.durations
            .get(&(agent_type.to_string(), phase.to_string()))
            .map(|entry| entry.clone())
            .unwrap_or_default()
    }

    /// Count of an event for an agent type
    pub fn count(&self, agent_type: &str, event: &str) -> u64 {
        self.counters
            .get(&(agent_type.to_string(), event.to_string()))
            .map_or(0, |entry| *entry)
    }
}

impl MetricsRecorder for InMemoryMetricsRecorder {
    fn record_duration(&self, agent_type: &str, phase: &str, duration: Duration) {
        self.durations
            .entry((agent_type.to_string(), phase.to_string()))
            .or_default()
            .push(duration);
    }

    fn increment(&self, agent_type: &str, event: &str) {
        *self
            .counters
            .entry((agent_type.to_string(), event.to_string()))
            .or_default() += 1;
    }
}
