//! Infrastructure Ports
//!
//! Cross-cutting services the application layer reports into.

/// Metrics recorder port
pub mod metrics;
/// Status reporter port
pub mod status;

pub use metrics::{MetricsRecorder, NullMetricsRecorder};
pub use status::{NullStatusReporter, StatusReporter};
