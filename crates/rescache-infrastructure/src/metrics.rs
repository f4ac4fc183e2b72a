//! Metrics facade recorder
//!
//! Forwards agent phase timings and event counts to whatever exporter the
//! process installed for the `metrics` crate. Without an installed exporter
//! every call is a no-op.

use crate::constants::{METRIC_EVENTS_TOTAL, METRIC_PHASE_SECONDS};
use metrics::{counter, histogram};
use rescache_domain::ports::MetricsRecorder;
use std::time::Duration;
use tracing::trace;

/// Records into the `metrics` facade with `agent` and `phase`/`event` labels
#[derive(Debug, Clone, Copy, Default)]
pub struct PrometheusStyleRecorder;

impl PrometheusStyleRecorder {
    /// Create a recorder
    pub fn new() -> Self {
        Self
    }
}

impl MetricsRecorder for PrometheusStyleRecorder {
    fn record_duration(&self, agent_type: &str, phase: &str, duration: Duration) {
        histogram!(
            METRIC_PHASE_SECONDS,
            "agent" => agent_type.to_string(),
            "phase" => phase.to_string()
        )
        .record(duration.as_secs_f64());
        trace!(agent_type, phase, seconds = duration.as_secs_f64(), "recorded phase duration");
    }

    fn increment(&self, agent_type: &str, event: &str) {
        counter!(
            METRIC_EVENTS_TOTAL,
            "agent" => agent_type.to_string(),
            "event" => event.to_string()
        )
        .increment(1);
    }
}
