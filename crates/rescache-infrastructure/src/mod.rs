//! # Infrastructure Layer
//!
//! Cross-cutting technical concerns around the cache engine.
//!
//! ## Module Categories
//!
//! ### Configuration
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Layered TOML and environment configuration |
//! | [`constants`] | Configuration, logging and metrics defaults |
//!
//! ### Wiring
//! | Module | Description |
//! |--------|-------------|
//! | [`bootstrap`] | Backend selection and store construction |
//! | [`error_ext`] | Context helpers converting foreign errors |
//!
//! ### Observability
//! | Module | Description |
//! |--------|-------------|
//! | [`logging`] | Structured logging with tracing |
//! | [`metrics`] | `metrics` facade recorder for agent phases |

pub mod bootstrap;
pub mod config;
pub mod constants;
pub mod error_ext;
pub mod logging;
pub mod metrics;

// Re-export commonly used types
pub use bootstrap::{build_store, create_backend};
pub use config::{AppConfig, CacheBackendKind, CacheConfig, ConfigLoader, LoggingConfig};
pub use error_ext::ErrorContext;
pub use crate::metrics::PrometheusStyleRecorder;
