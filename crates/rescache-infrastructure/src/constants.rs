//! Infrastructure layer constants
//!
//! Defaults for configuration discovery, logging and metrics. Constants that
//! are part of the cache contract live in `rescache_domain::constants`.

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "rescache.toml";

/// Default configuration directory name
pub const DEFAULT_CONFIG_DIR: &str = "rescache";

/// Environment variable prefix for configuration
pub const CONFIG_ENV_PREFIX: &str = "RESCACHE";

/// Separator between nested keys in environment variable names
pub const ENV_NESTING_SEPARATOR: &str = "__";

// ============================================================================
// CACHE CONSTANTS
// ============================================================================

/// Default prefix of every backing-store key
pub const DEFAULT_KEY_PREFIX: &str = "rescache";

// ============================================================================
// LOGGING CONSTANTS
// ============================================================================

/// Environment variable whose filter directives override the configured level
pub const LOG_ENV_VAR: &str = "RESCACHE_LOG";

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Default log file name stem when the configured path has none
pub const DEFAULT_LOG_FILE_STEM: &str = "rescache";

/// Maximum number of rotated log files to keep
pub const LOG_MAX_FILES: usize = 7;

// ============================================================================
// METRICS CONSTANTS
// ============================================================================

/// Histogram of agent phase durations in seconds
pub const METRIC_PHASE_SECONDS: &str = "rescache_agent_phase_seconds";

/// Counter of agent events
pub const METRIC_EVENTS_TOTAL: &str = "rescache_agent_events_total";
