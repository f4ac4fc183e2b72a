//! Metrics Recorder Port
//!
//! Defines the contract used by the instrumentation shim to record phase
//! durations and event counts of agent and on-demand processing.

use std::time::Duration;

/// Metrics recorder interface
pub trait MetricsRecorder: Send + Sync {
    /// Record how long one phase of an agent's work took
    fn record_duration(&self, agent_type: &str, phase: &str, duration: Duration);

    /// Count one occurrence of an event
    fn increment(&self, agent_type: &str, event: &str);
}

/// Recorder that drops everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullMetricsRecorder;

impl MetricsRecorder for NullMetricsRecorder {
    fn record_duration(&self, _agent_type: &str, _phase: &str, _duration: Duration) {}

    fn increment(&self, _agent_type: &str, _event: &str) {}
}
