//! Status Reporter Port
//!
//! Progress of an agent run is reported through an explicit reporter passed
//! into the operation, never through ambient state.

/// Progress reporting interface
pub trait StatusReporter: Send + Sync {
    /// Report the current phase and a human-readable status line
    fn update(&self, phase: &str, status: &str);
}

/// Reporter that drops every update
#[derive(Debug, Clone, Copy, Default)]
pub struct NullStatusReporter;

impl StatusReporter for NullStatusReporter {
    fn update(&self, _phase: &str, _status: &str) {}
}
