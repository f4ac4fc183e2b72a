//! External Provider Ports
//!
//! | Port | Description |
//! |------|-------------|
//! | CacheBackend | Batch I/O against the backing key-value store |

/// Cache backend port
pub mod cache;

pub use cache::{BackendStats, CacheBackend, ScanPage};
