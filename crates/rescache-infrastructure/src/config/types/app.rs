//! Application configuration root

use crate::config::types::{CacheConfig, LoggingConfig};
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Backend selection, key prefix, batching and change detection
    pub cache: CacheConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}
