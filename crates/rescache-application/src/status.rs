//! Status reporting through `tracing`

use rescache_domain::ports::StatusReporter;
use tracing::info;

/// Reporter that emits every update as a structured `tracing` event
#[derive(Debug, Clone)]
pub struct TracingStatusReporter {
    source: String,
}

impl TracingStatusReporter {
    /// Create a reporter tagging events with `source`
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

impl StatusReporter for TracingStatusReporter {
    fn update(&self, phase: &str, status: &str) {
        info!(source = %self.source, phase, status, "agent status");
    }
}
